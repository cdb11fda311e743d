//! Everything that makes up one frame of actor simulation state.
//!
//! `ActorState` is plain data with value semantics: cloning it is a complete
//! snapshot, and two states compare equal exactly when the actor would behave
//! identically from here on.

use glam::Vec2;
use rwd_core::AnimationState;

use super::config::ActorConfig;

/// Contact along one axis for a single move.
///
/// A moving sweep casts toward one side only, so it yields at most one of
/// `Negative`/`Positive`. A sweep at exactly zero velocity casts both ways and
/// can report `Both` when the actor is wedged between two surfaces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AxisContact {
    #[default]
    Clear,
    /// Left on X, up on Y.
    Negative,
    /// Right on X, down on Y.
    Positive,
    Both,
}

impl AxisContact {
    pub fn negative(self) -> bool {
        matches!(self, Self::Negative | Self::Both)
    }

    pub fn positive(self) -> bool {
        matches!(self, Self::Positive | Self::Both)
    }

    pub fn with_negative(self) -> Self {
        match self {
            Self::Clear | Self::Negative => Self::Negative,
            Self::Positive | Self::Both => Self::Both,
        }
    }

    pub fn with_positive(self) -> Self {
        match self {
            Self::Clear | Self::Positive => Self::Positive,
            Self::Negative | Self::Both => Self::Both,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Contacts {
    pub x: AxisContact,
    pub y: AxisContact,
}

impl Contacts {
    pub fn left(&self) -> bool {
        self.x.negative()
    }

    pub fn right(&self) -> bool {
        self.x.positive()
    }

    pub fn up(&self) -> bool {
        self.y.negative()
    }

    pub fn down(&self) -> bool {
        self.y.positive()
    }
}

/// Contacts from the latest move and the one before it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionFlags {
    pub current: Contacts,
    pub previous: Contacts,
}

impl CollisionFlags {
    /// Start a new move: current contacts become previous, current clears.
    pub fn begin_move(&mut self) {
        self.previous = self.current;
        self.current = Contacts::default();
    }
}

/// Per-stage switches for the tick pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeFlags {
    pub apply_gravity: bool,
    pub clamp_velocity: bool,
    pub input_enabled: bool,
    pub collision_enabled: bool,
    pub update_animation: bool,
}

impl ModeFlags {
    /// Turn off everything a dying actor must not do. Clamping stays on.
    pub fn freeze(&mut self) {
        self.apply_gravity = false;
        self.input_enabled = false;
        self.collision_enabled = false;
        self.update_animation = false;
    }

    pub fn thaw(&mut self) {
        self.apply_gravity = true;
        self.input_enabled = true;
        self.collision_enabled = true;
        self.update_animation = true;
    }
}

impl Default for ModeFlags {
    fn default() -> Self {
        Self {
            apply_gravity: true,
            clamp_velocity: true,
            input_enabled: true,
            collision_enabled: true,
            update_animation: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Lifecycle {
    pub jumping: bool,
    pub falling: bool,
    pub dying: bool,
}

/// Polled intent plus the jump edge detector.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Intent {
    pub direction: Vec2,
    pub jump_held: bool,
    pub jump_was_held: bool,
    pub jump_queued: bool,
}

/// Tunables. Copied into every snapshot so a rewind also rewinds retuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorTuning {
    pub acceleration: f32,
    pub deceleration: f32,
    pub gravity: f32,
    pub max_velocity: Vec2,
    pub jump_height: f32,
    pub jump_limit: u32,
    pub ray_count: u32,
    pub margin: f32,
    pub resolve_input_x: bool,
    pub resolve_input_y: bool,
}

impl From<&ActorConfig> for ActorTuning {
    fn from(config: &ActorConfig) -> Self {
        Self {
            acceleration: config.acceleration,
            deceleration: config.deceleration,
            gravity: config.gravity,
            max_velocity: config.max_velocity,
            jump_height: config.jump_height,
            jump_limit: config.jump_limit,
            ray_count: config.ray_count,
            margin: config.margin,
            resolve_input_x: config.resolve_input_x,
            resolve_input_y: config.resolve_input_y,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActorState {
    pub position: Vec2,
    pub velocity: Vec2,
    pub intent: Intent,
    pub jump_count: u32,
    pub collisions: CollisionFlags,
    pub tuning: ActorTuning,
    pub modes: ModeFlags,
    pub lifecycle: Lifecycle,
    pub facing_left: bool,
    pub animation: AnimationState,
}

impl ActorState {
    pub fn new(config: &ActorConfig, position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            intent: Intent::default(),
            jump_count: 0,
            collisions: CollisionFlags::default(),
            tuning: ActorTuning::from(config),
            modes: ModeFlags::default(),
            lifecycle: Lifecycle::default(),
            facing_left: false,
            animation: AnimationState::default(),
        }
    }
}
