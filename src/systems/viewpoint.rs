//! The moving first-person viewpoint.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use bevy_ecs::resource::Resource;
use glam::{IVec2, Vec2};
use tracing::trace;

use crate::constants::{BLOCK_WIDTH, CAMERA_DISTANCE, CAMERA_WIDTH, MOVE_SPEED, ROTATION_SPEED};
use crate::helpers::wrap_angle;
use crate::map::direction::Direction;
use crate::map::grid::Passability;

/// Movement and camera parameters of a viewpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewParams {
    /// Distance from the eye to the camera plane.
    pub camera_distance: f32,
    /// Half-width of the camera plane.
    pub camera_width: f32,
    /// World units covered per movement step.
    pub speed: f32,
    /// Radians covered per rotation step.
    pub rotation_speed: f32,
    /// World units per tile.
    pub block_width: f32,
}

impl Default for ViewParams {
    fn default() -> Self {
        Self {
            camera_distance: CAMERA_DISTANCE,
            camera_width: CAMERA_WIDTH,
            speed: MOVE_SPEED,
            rotation_speed: ROTATION_SPEED,
            block_width: BLOCK_WIDTH,
        }
    }
}

/// Continuous position and facing of the viewer, kept in sync with a discrete tile.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct Viewpoint {
    position: Vec2,
    tile: IVec2,
    facing: f32,
    params: ViewParams,
}

impl Viewpoint {
    /// Creates a viewpoint at the centre of `tile`, facing `direction`.
    pub fn new(params: ViewParams, tile: IVec2, direction: Direction) -> Self {
        let mut viewpoint = Self {
            position: Vec2::ZERO,
            tile,
            facing: 0.0,
            params,
        };
        viewpoint.teleport(tile, direction);
        viewpoint
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Position in tile units.
    pub fn grid_position(&self) -> Vec2 {
        self.position / self.params.block_width
    }

    pub fn tile(&self) -> IVec2 {
        self.tile
    }

    /// Facing angle in `[0, 2π)`.
    pub fn facing(&self) -> f32 {
        self.facing
    }

    pub fn params(&self) -> &ViewParams {
        &self.params
    }

    /// The facing quantized to a cardinal direction.
    pub fn direction(&self) -> Direction {
        Direction::from_angle(self.facing)
    }

    /// Angular width of the rendered view.
    pub fn field_of_view(&self) -> f32 {
        self.params.camera_width.atan2(self.params.camera_distance) * 2.0
    }

    /// Low and high angles of the view. The high bound is lifted past `2π` when the view
    /// straddles the zero angle, so `low <= high` always holds.
    pub fn view_bounds(&self) -> (f32, f32) {
        let half = self.params.camera_width.atan2(self.params.camera_distance);
        let low = wrap_angle(self.facing - half);
        let mut high = wrap_angle(self.facing + half);
        if high < low {
            high += TAU;
        }
        (low, high)
    }

    /// Snaps to the centre of `tile` and faces `direction`.
    pub fn teleport(&mut self, tile: IVec2, direction: Direction) {
        self.position = (tile.as_vec2() + Vec2::splat(0.5)) * self.params.block_width;
        self.tile = tile;
        self.facing = direction.angle();
        trace!(tile = ?tile, direction = direction.as_ref(), "Viewpoint teleported");
    }

    /// Places the viewpoint at an arbitrary world position and facing, without a passability check.
    pub fn place(&mut self, position: Vec2, facing: f32) {
        self.position = position;
        self.tile = (position / self.params.block_width).floor().as_ivec2();
        self.facing = wrap_angle(facing);
    }

    pub fn rotate_left(&mut self) {
        self.facing = wrap_angle(self.facing - self.params.rotation_speed);
    }

    pub fn rotate_right(&mut self) {
        self.facing = wrap_angle(self.facing + self.params.rotation_speed);
    }

    pub fn move_forward(&mut self, map: &impl Passability) -> bool {
        self.step(self.facing, map)
    }

    pub fn move_backward(&mut self, map: &impl Passability) -> bool {
        self.step(self.facing + PI, map)
    }

    pub fn strafe_left(&mut self, map: &impl Passability) -> bool {
        self.step(self.facing - FRAC_PI_2, map)
    }

    pub fn strafe_right(&mut self, map: &impl Passability) -> bool {
        self.step(self.facing + FRAC_PI_2, map)
    }

    /// Moves one step along `angle` if the destination tile is passable.
    ///
    /// Only the endpoint is tested, so a fast enough step can clip a wall corner.
    fn step(&mut self, angle: f32, map: &impl Passability) -> bool {
        let destination = self.position + Vec2::from_angle(angle) * self.params.speed;
        let tile = (destination / self.params.block_width).floor().as_ivec2();

        if !map.passable(tile) {
            trace!(from = ?self.tile, to = ?tile, "Movement blocked");
            return false;
        }

        self.position = destination;
        self.tile = tile;
        true
    }
}
