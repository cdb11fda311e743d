//! Gameplay logic for the rewind platformer.
//!
//! The engine-facing surface is three traits: [`raycast::Raycaster`] answers
//! segment queries against level geometry, [`presentation::Presentation`]
//! receives fire-and-forget sound/animation side effects, and
//! [`level::LevelSource`] instantiates level assets. Everything else is owned
//! state driven by [`session::Session`] one frame at a time.

pub mod actor;
pub mod collision;
pub mod config;
pub mod controller;
pub mod level;
pub mod presentation;
pub mod raycast;
pub mod replay;
pub mod session;
pub mod snapshot;

pub use actor::{Actor, ActorConfig, ActorState, StepContext};
pub use collision::{Aabb, CollisionGrid, CollisionWorld};
pub use config::GameConfig;
pub use controller::{GameController, GameEvent, LoadPhase};
pub use level::{LevelDirectory, LevelFile, LevelSource};
pub use presentation::{LogPresentation, Presentation, SoundId};
pub use raycast::{ColliderId, RayHit, Raycaster};
pub use session::Session;
pub use snapshot::{RewindBuffer, RewindOutcome, RewindRecorder, Snapshot, TimeDirection};
