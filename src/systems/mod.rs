//! The Entity-Component-System (ECS) module.
//!
//! This module contains the per-tick systems of a maze session and the resources they share.

pub mod actor;
pub mod compass;
pub mod input;
pub mod quality;
pub mod raycast;
pub mod render;
pub mod trigger;
pub mod viewpoint;

pub use self::actor::{actor_system, Actor, ActorFeed, ActorPose, ActorRole, ActorSet, NoteTags, SpriteRef, TriggerAction};
pub use self::compass::{compass_heading, compass_system, Compass};
pub use self::input::{input_system, Gesture, TickInput};
pub use self::quality::{quality_system, QualityController, QualityMode};
pub use self::raycast::{cast_ray, RayHit, WallSide};
pub use self::render::{render_system, Palette, Raycaster};
pub use self::trigger::{trigger_system, SessionSignals};
pub use self::viewpoint::{ViewParams, Viewpoint};
