//! Dynamic actors inside the maze and their projection relative to the viewpoint.

use bevy_ecs::resource::Resource;
use bevy_ecs::system::{Res, ResMut};
use glam::{IVec2, Vec2};
use tracing::{trace, warn};

use crate::error::ParseError;
use crate::helpers::wrap_angle;
use crate::map::direction::Direction;
use crate::systems::viewpoint::Viewpoint;

/// What an actor does when the viewer interacts with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerAction {
    /// Ends the session as cleared.
    Succeed,
    /// Ends the session as failed.
    Fail,
}

/// Which character of which sheet an actor is drawn with.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpriteRef {
    pub sheet: String,
    pub index: u32,
    /// Animation column within the character block.
    pub pattern: u32,
}

impl SpriteRef {
    pub fn new(sheet: impl Into<String>, index: u32, pattern: u32) -> Self {
        Self {
            sheet: sheet.into(),
            index,
            pattern,
        }
    }
}

/// An actor as supplied by the host when a session starts.
#[derive(Debug, Clone, PartialEq)]
pub struct ActorFeed {
    pub id: u32,
    pub tile: IVec2,
    pub facing: Direction,
    pub sprite: SpriteRef,
    /// When set, the same sprite row is shown from every viewing angle.
    pub direction_fixed: bool,
    /// When set, the actor does not block movement.
    pub through: bool,
    /// Free-text annotation carrying `<goal>` or `<fake:N>` markers.
    pub note: String,
    pub trigger: Option<TriggerAction>,
}

/// A per-tick movement update for an actor, in tile units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorPose {
    /// Continuous position, fractional while the actor walks between tiles.
    pub real: Vec2,
    pub tile: IVec2,
    pub facing: Direction,
    pub pattern: Option<u32>,
}

/// The role an actor plays for the compass.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ActorRole {
    #[default]
    Plain,
    /// The true goal; pulls with unit strength.
    Goal,
    /// A decoy pulling with the given strength.
    Decoy { strength: f32 },
}

impl ActorRole {
    /// Pull strength on the compass, if any.
    pub fn strength(self) -> Option<f32> {
        match self {
            ActorRole::Plain => None,
            ActorRole::Goal => Some(1.0),
            ActorRole::Decoy { strength } => Some(strength),
        }
    }
}

/// Parser for the markers in an actor's note.
pub struct NoteTags;

impl NoteTags {
    const GOAL: &'static str = "<goal>";
    const DECOY: &'static str = "<fake:";

    /// Reads the role from a note. A goal marker wins over a decoy marker.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidStrength` for a decoy marker whose strength is missing,
    /// unterminated, non-numeric or not strictly positive.
    pub fn parse(note: &str) -> Result<ActorRole, ParseError> {
        if note.contains(Self::GOAL) {
            return Ok(ActorRole::Goal);
        }

        let Some(start) = note.find(Self::DECOY) else {
            return Ok(ActorRole::Plain);
        };

        let rest = &note[start + Self::DECOY.len()..];
        let Some(end) = rest.find('>') else {
            return Err(ParseError::InvalidStrength(rest.to_string()));
        };

        let text = rest[..end].trim();
        match text.parse::<f32>() {
            Ok(strength) if strength.is_finite() && strength > 0.0 => Ok(ActorRole::Decoy { strength }),
            _ => Err(ParseError::InvalidStrength(text.to_string())),
        }
    }
}

/// Sprite row shown for each true facing (rows) seen from each viewing bucket (columns).
///
/// Buckets are the cardinal quantization of the angle from viewer to actor, in the order
/// up, left, down, right.
const VIEW_ROWS: [[usize; 4]; 4] = [
    [0, 1, 3, 2], // facing down
    [1, 3, 2, 0], // facing left
    [2, 0, 1, 3], // facing right
    [3, 2, 0, 1], // facing up
];

/// A dynamic actor projected relative to the viewpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    pub id: u32,
    pub role: ActorRole,
    pub tile: IVec2,
    /// Continuous position in tile units.
    pub real: Vec2,
    pub facing: Direction,
    pub sprite: SpriteRef,
    pub direction_fixed: bool,
    pub through: bool,
    pub trigger: Option<TriggerAction>,
    position: Vec2,
    distance: f32,
    angle: f32,
    view_row: usize,
}

impl Actor {
    /// Ingests an actor, parsing its note once. Malformed markers degrade to a plain actor.
    pub fn from_feed(feed: &ActorFeed) -> Actor {
        let role = NoteTags::parse(&feed.note).unwrap_or_else(|error| {
            warn!(id = feed.id, %error, "Ignoring malformed note marker");
            ActorRole::Plain
        });

        Actor {
            id: feed.id,
            role,
            tile: feed.tile,
            real: feed.tile.as_vec2(),
            facing: feed.facing,
            sprite: feed.sprite.clone(),
            direction_fixed: feed.direction_fixed,
            through: feed.through,
            trigger: feed.trigger,
            position: Vec2::ZERO,
            distance: 0.0,
            angle: 0.0,
            view_row: feed.facing.sprite_row(),
        }
    }

    pub fn apply_pose(&mut self, pose: ActorPose) {
        self.real = pose.real;
        self.tile = pose.tile;
        self.facing = pose.facing;
        if let Some(pattern) = pose.pattern {
            self.sprite.pattern = pattern;
        }
    }

    /// World position of the actor's centre, as of the last update.
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Distance to the viewpoint, as of the last update.
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Angle from the viewpoint to the actor in `[0, 2π)`, as of the last update.
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Sprite sheet row to draw.
    pub fn view_row(&self) -> usize {
        self.view_row
    }

    /// Recomputes position, distance, angle and displayed row against `viewpoint`.
    pub fn update(&mut self, viewpoint: &Viewpoint) {
        let block = viewpoint.params().block_width;
        self.position = (self.real + Vec2::splat(0.5)) * block;

        let delta = self.position - viewpoint.position();
        self.angle = wrap_angle(delta.y.atan2(delta.x));
        self.distance = delta.length();

        let row = self.facing.sprite_row();
        self.view_row = if self.direction_fixed {
            row
        } else {
            let bucket = match Direction::from_angle(self.angle) {
                Direction::Up => 0,
                Direction::Left => 1,
                Direction::Down => 2,
                Direction::Right => 3,
            };
            VIEW_ROWS[row][bucket]
        };
    }
}

/// Every actor of the session, kept sorted far-to-near after each update.
#[derive(Resource, Debug, Clone, Default)]
pub struct ActorSet {
    actors: Vec<Actor>,
}

impl ActorSet {
    pub fn from_feeds<'a>(feeds: impl IntoIterator<Item = &'a ActorFeed>) -> Self {
        Self {
            actors: feeds.into_iter().map(Actor::from_feed).collect(),
        }
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn get(&self, id: u32) -> Option<&Actor> {
        self.actors.iter().find(|actor| actor.id == id)
    }

    /// Applies a movement update. Returns `false` if no actor has `id`.
    pub fn apply_pose(&mut self, id: u32, pose: ActorPose) -> bool {
        match self.actors.iter_mut().find(|actor| actor.id == id) {
            Some(actor) => {
                actor.apply_pose(pose);
                true
            }
            None => false,
        }
    }

    /// Updates every actor against `viewpoint` and re-sorts far-to-near.
    pub fn update(&mut self, viewpoint: &Viewpoint) {
        for actor in &mut self.actors {
            actor.update(viewpoint);
        }
        self.actors.sort_by(|a, b| b.distance.total_cmp(&a.distance));
    }
}

/// Projects actors from the already moved viewpoint.
pub fn actor_system(viewpoint: Res<Viewpoint>, mut actors: ResMut<ActorSet>) {
    actors.update(&viewpoint);
    trace!(count = actors.actors().len(), "Actors updated");
}
