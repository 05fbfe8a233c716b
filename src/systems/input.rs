//! The per-tick input vector and its application to the viewpoint.

use std::f32::consts::{FRAC_PI_4, TAU};

use bevy_ecs::resource::Resource;
use bevy_ecs::system::{Res, ResMut};
use glam::{UVec2, Vec2};
use strum_macros::AsRefStr;
use tracing::trace;

use crate::constants::TURN_AXIS_DEADZONE;
use crate::map::grid::{GridMap, Occupancy};
use crate::systems::actor::ActorSet;
use crate::systems::viewpoint::Viewpoint;
use crate::texture::frame::FrameBuffer;

/// Input sampled by the host for a single tick.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Default)]
pub struct TickInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    /// Turns left/right into sidesteps.
    pub strafe: bool,
    /// Analog turn axis in `[-1, 1]`; negative turns left.
    pub turn_axis: f32,
    /// Whether the last input came from a gamepad, which strafes by default.
    pub gamepad: bool,
    /// Interact with the actor here or ahead.
    pub action: bool,
    /// Toggle the pause state.
    pub pause: bool,
    /// Pressed pointer or touch position, in frame pixels.
    pub pointer: Option<Vec2>,
    /// Frames per second measured by the host.
    pub fps_sample: Option<f32>,
}

impl TickInput {
    /// Whether left/right sidestep rather than turn.
    pub fn strafing(&self) -> bool {
        self.strafe != self.gamepad
    }
}

/// Pointer fallback: the centre disc interacts, the four surrounding quadrants move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
pub enum Gesture {
    Action,
    Forward,
    Backward,
    Left,
    Right,
}

impl Gesture {
    /// Classifies a pointer position on a frame of `screen` pixels.
    ///
    /// Positions exactly on a quadrant diagonal produce no gesture.
    pub fn from_pointer(pointer: Vec2, screen: UVec2) -> Option<Gesture> {
        let screen = screen.as_vec2();
        let delta = pointer - screen / 2.0;
        if delta.length() < screen.min_element() / 4.0 {
            return Some(Gesture::Action);
        }

        let mut angle = delta.y.atan2(delta.x);
        if angle < 0.0 {
            angle += TAU;
        }

        if angle > FRAC_PI_4 && angle < 3.0 * FRAC_PI_4 {
            Some(Gesture::Backward)
        } else if angle > 5.0 * FRAC_PI_4 && angle < 7.0 * FRAC_PI_4 {
            Some(Gesture::Forward)
        } else if angle > 3.0 * FRAC_PI_4 && angle < 5.0 * FRAC_PI_4 {
            Some(Gesture::Left)
        } else if angle > 7.0 * FRAC_PI_4 || angle < FRAC_PI_4 {
            Some(Gesture::Right)
        } else {
            None
        }
    }
}

/// Moves and turns the viewpoint from the tick's input.
///
/// Movement is resolved against the map with non-through actors blocking. A centre-disc gesture
/// is folded into the action flag for the completion check.
pub fn apply_input(input: &mut TickInput, viewpoint: &mut Viewpoint, occupancy: &Occupancy, screen: UVec2) {
    let strafing = input.strafing();

    if input.turn_axis.abs() >= TURN_AXIS_DEADZONE {
        if input.turn_axis < 0.0 {
            viewpoint.rotate_left();
        } else {
            viewpoint.rotate_right();
        }
    }

    if input.forward {
        viewpoint.move_forward(occupancy);
    } else if input.backward {
        viewpoint.move_backward(occupancy);
    }

    if input.left {
        turn_or_strafe_left(viewpoint, occupancy, strafing);
    } else if input.right {
        turn_or_strafe_right(viewpoint, occupancy, strafing);
    }

    if let Some(gesture) = input.pointer.and_then(|pointer| Gesture::from_pointer(pointer, screen)) {
        trace!(gesture = gesture.as_ref(), "Pointer gesture");
        match gesture {
            Gesture::Action => input.action = true,
            Gesture::Forward => {
                viewpoint.move_forward(occupancy);
            }
            Gesture::Backward => {
                viewpoint.move_backward(occupancy);
            }
            Gesture::Left => turn_or_strafe_left(viewpoint, occupancy, strafing),
            Gesture::Right => turn_or_strafe_right(viewpoint, occupancy, strafing),
        }
    }
}

fn turn_or_strafe_left(viewpoint: &mut Viewpoint, occupancy: &Occupancy, strafing: bool) {
    if strafing {
        viewpoint.strafe_left(occupancy);
    } else {
        viewpoint.rotate_left();
    }
}

fn turn_or_strafe_right(viewpoint: &mut Viewpoint, occupancy: &Occupancy, strafing: bool) {
    if strafing {
        viewpoint.strafe_right(occupancy);
    } else {
        viewpoint.rotate_right();
    }
}

pub fn input_system(
    mut input: ResMut<TickInput>,
    mut viewpoint: ResMut<Viewpoint>,
    map: Res<GridMap>,
    actors: Res<ActorSet>,
    frame: Res<FrameBuffer>,
) {
    let occupancy = Occupancy {
        map: &map,
        actors: actors.actors(),
    };
    apply_input(&mut input, &mut viewpoint, &occupancy, frame.size());
}
