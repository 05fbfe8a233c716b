//! The completion check: interacting with a triggering actor ends the session.

use bevy_ecs::resource::Resource;
use bevy_ecs::system::{Res, ResMut};
use tracing::debug;

use crate::systems::actor::{Actor, ActorSet, TriggerAction};
use crate::systems::input::TickInput;
use crate::systems::viewpoint::Viewpoint;

/// Outcome requests raised during a tick, applied by the session once the tick completes.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionSignals {
    pub pending: Option<TriggerAction>,
    /// Actor whose trigger raised the pending outcome.
    pub source: Option<u32>,
}

impl SessionSignals {
    /// Records an outcome; the first one raised within a tick wins.
    pub fn raise(&mut self, action: TriggerAction, source: Option<u32>) {
        if self.pending.is_none() {
            self.pending = Some(action);
            self.source = source;
        }
    }

    pub fn take(&mut self) -> Option<TriggerAction> {
        self.source = None;
        self.pending.take()
    }
}

/// The triggering actor the viewer can interact with: the one on the viewer's tile, otherwise
/// the one on the tile ahead.
pub fn find_trigger<'a>(viewpoint: &Viewpoint, actors: &'a [Actor]) -> Option<&'a Actor> {
    let here = viewpoint.tile();
    let ahead = here + viewpoint.direction().as_ivec2();

    [here, ahead].into_iter().find_map(|tile| {
        actors
            .iter()
            .find(|actor| actor.tile == tile && actor.trigger.is_some())
    })
}

pub fn trigger_system(
    input: Res<TickInput>,
    viewpoint: Res<Viewpoint>,
    actors: Res<ActorSet>,
    mut signals: ResMut<SessionSignals>,
) {
    if !input.action {
        return;
    }

    let Some(actor) = find_trigger(&viewpoint, actors.actors()) else {
        return;
    };
    if let Some(action) = actor.trigger {
        debug!(id = actor.id, ?action, "Actor triggered");
        signals.raise(action, Some(actor.id));
    }
}
