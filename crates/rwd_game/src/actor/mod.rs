//! The player actor: a kinematic body with its own collision sweep.
//!
//! One physics tick runs a split-step pipeline:
//!
//!   gravity(dt/2) -> clamp -> input(dt/2) -> clamp -> move(dt) -> animate
//!   -> gravity(dt/2) -> clamp -> input(dt/2) -> clamp
//!
//! Each stage is gated by its `ModeFlags` switch. Movement (`move_and_collide`)
//! is the only stage that changes position; it resolves X fully before Y.
//! Reordering any of this changes jump arcs and landing frames, and replays
//! recorded against one order will not reproduce under another.
//!
//! Input polling happens separately, once per presentation frame, through
//! `process`. A queued jump is consumed by the next tick's input stage.

mod config;
mod input;
mod state;
mod sweep;

pub use config::ActorConfig;
pub use state::{
    ActorState, ActorTuning, AxisContact, CollisionFlags, Contacts, Intent, Lifecycle, ModeFlags,
};
pub use sweep::{select_nearest_hit, SweepDirection};

use glam::Vec2;
use rwd_core::animation::AnimationFile;
use rwd_core::InputSource;

use crate::collision::Aabb;
use crate::presentation::Presentation;
use crate::raycast::{ColliderId, Raycaster};

pub mod clips {
    pub const IDLE: &str = "idle";
    pub const RUN: &str = "run";
    pub const JUMP: &str = "jump";
    pub const FALL: &str = "fall";
    pub const DEATH: &str = "death";
}

/// Collaborators for one physics tick.
pub struct StepContext<'a> {
    pub raycaster: &'a dyn Raycaster,
    pub presentation: &'a mut dyn Presentation,
}

#[derive(Debug, Clone)]
pub struct Actor {
    pub state: ActorState,
    pub collider: ColliderId,
    pub half_extents: Vec2,
    /// Whether the actor is placed in a level at all.
    pub attached: bool,
    pub visible: bool,
    /// Autonomous update (input polling + physics). Suspended while the level
    /// controller drives the actor from snapshots.
    processing: bool,
}

impl Actor {
    pub fn new(config: &ActorConfig, collider: ColliderId) -> Self {
        Self {
            state: ActorState::new(config, Vec2::ZERO),
            collider,
            half_extents: config.half_extents,
            attached: false,
            visible: true,
            processing: true,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.state.position, self.half_extents)
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    pub fn set_processing(&mut self, processing: bool) {
        self.processing = processing;
    }

    /// Clear motion, intent, jumps and contacts, and return to the idle pose.
    /// Position, tuning, mode flags and lifecycle are left alone.
    pub fn reset(&mut self, presentation: &mut dyn Presentation) {
        let state = &mut self.state;
        state.velocity = Vec2::ZERO;
        state.intent = Intent::default();
        state.jump_count = 0;
        state.collisions = CollisionFlags::default();
        state.facing_left = false;
        self.play_animation(clips::IDLE, presentation);
    }

    /// Presentation-rate update: poll input when enabled.
    pub fn process(&mut self, input: &dyn InputSource) {
        if self.processing && self.state.modes.input_enabled {
            self.update_input(input);
        }
    }

    /// One fixed physics tick.
    pub fn physics_tick(&mut self, dt: f32, ctx: &mut StepContext<'_>) {
        if !self.processing {
            return;
        }
        let half_dt = dt / 2.0;

        self.half_step(half_dt, ctx.presentation);

        if self.state.modes.collision_enabled {
            self.move_and_collide(dt, ctx.raycaster);
        }
        if self.state.modes.update_animation {
            self.resolve_animations(ctx.presentation);
        }

        self.half_step(half_dt, ctx.presentation);
    }

    fn half_step(&mut self, half_dt: f32, presentation: &mut dyn Presentation) {
        if self.state.modes.apply_gravity {
            self.apply_gravity(half_dt);
        }
        if self.state.modes.clamp_velocity {
            self.clamp_velocity();
        }
        if self.state.modes.input_enabled {
            self.resolve_input(half_dt, presentation);
        }
        if self.state.modes.clamp_velocity {
            self.clamp_velocity();
        }
    }

    pub fn apply_gravity(&mut self, dt: f32) {
        self.state.velocity.y += self.state.tuning.gravity * dt;
    }

    pub fn clamp_velocity(&mut self) {
        let max = self.state.tuning.max_velocity;
        let velocity = &mut self.state.velocity;
        velocity.x = velocity.x.clamp(-max.x, max.x);
        velocity.y = velocity.y.clamp(-max.y, max.y);
    }

    /// Switch clip if it differs from the current one and tell the host.
    pub fn play_animation(&mut self, clip: &str, presentation: &mut dyn Presentation) {
        if self.state.animation.play(clip) {
            presentation.play_animation(clip);
        }
    }

    /// Advance the current clip by `dt_us`. Clips missing from `clips` hold.
    pub fn advance_animation(&mut self, dt_us: u64, clips: &AnimationFile) {
        if let Some(clip) = clips.clip(&self.state.animation.clip_name) {
            self.state.animation.tick(dt_us, clip);
        }
    }

    fn resolve_animations(&mut self, presentation: &mut dyn Presentation) {
        let velocity = self.state.velocity;
        let grounded = self.state.collisions.current.down();

        let clip = if velocity.y < 0.0 {
            if grounded {
                clips::IDLE
            } else {
                clips::JUMP
            }
        } else if velocity.y > 0.0 {
            if grounded {
                clips::IDLE
            } else {
                clips::FALL
            }
        } else if velocity.x == 0.0 {
            clips::IDLE
        } else {
            clips::RUN
        };
        self.play_animation(clip, presentation);

        // Pushing into a wall still turns the actor to face it.
        let facing_x = if velocity.x == 0.0 {
            self.state.intent.direction.x
        } else {
            velocity.x
        };
        if facing_x < 0.0 {
            self.state.facing_left = true;
        } else if facing_x > 0.0 {
            self.state.facing_left = false;
        }

        let lifecycle = &mut self.state.lifecycle;
        lifecycle.jumping = velocity.y < 0.0 && !grounded;
        lifecycle.falling = velocity.y > 0.0 && !grounded;
    }
}
