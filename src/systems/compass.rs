//! The compass: a steering angle pulled toward goals and decoys.

use bevy_ecs::resource::Resource;
use bevy_ecs::system::{Res, ResMut};
use glam::Vec2;
use tracing::trace;

use crate::helpers::wrap_angle;
use crate::systems::actor::{Actor, ActorSet};
use crate::systems::viewpoint::Viewpoint;

/// Heading of the compass relative to the viewer's facing, in `[0, 2π)`.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Default)]
pub struct Compass {
    pub heading: f32,
}

/// Sums an inverse-square pull toward every goal and decoy.
///
/// Each contributor pulls with magnitude `strength / distance²` along the direction from the
/// viewpoint to the actor. Returns the angle of the sum relative to the facing, or `None` when
/// nothing contributes or the pulls cancel out. Actors at zero distance are skipped.
pub fn compass_heading(viewpoint: &Viewpoint, actors: &[Actor]) -> Option<f32> {
    let origin = viewpoint.position();
    let pull = actors
        .iter()
        .filter_map(|actor| actor.role.strength().map(|strength| (actor, strength)))
        .filter_map(|(actor, strength)| {
            let delta = actor.position() - origin;
            let distance_squared = delta.length_squared();
            (distance_squared > 0.0).then(|| delta.normalize() * (strength / distance_squared))
        })
        .fold(Vec2::ZERO, |sum, pull| sum + pull);

    if pull == Vec2::ZERO || !pull.is_finite() {
        return None;
    }

    Some(wrap_angle(pull.y.atan2(pull.x) - viewpoint.facing()))
}

/// Refreshes the compass, holding the previous heading when no pull exists.
pub fn compass_system(viewpoint: Res<Viewpoint>, actors: Res<ActorSet>, mut compass: ResMut<Compass>) {
    match compass_heading(&viewpoint, actors.actors()) {
        Some(heading) => compass.heading = heading,
        None => trace!(heading = compass.heading, "No compass pull, holding heading"),
    }
}
