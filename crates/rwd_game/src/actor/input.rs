//! Input resolution: turning held direction and jump edges into velocity.

use rwd_core::InputSource;

use super::Actor;
use crate::presentation::{Presentation, SoundId};

impl Actor {
    /// Poll the input source. The jump is queued on the rising edge only, so
    /// holding the button across frames queues a single jump.
    pub(super) fn update_input(&mut self, input: &dyn InputSource) {
        let intent = &mut self.state.intent;
        intent.direction = input.direction();

        intent.jump_was_held = intent.jump_held;
        intent.jump_held = input.jump_held();
        if intent.jump_held && !intent.jump_was_held {
            intent.jump_queued = true;
        }
    }

    pub fn resolve_input(&mut self, dt: f32, presentation: &mut dyn Presentation) {
        self.resolve_direction(dt);
        self.resolve_jump(presentation);
    }

    pub fn resolve_direction(&mut self, dt: f32) {
        let state = &mut self.state;
        let tuning = state.tuning;
        let direction = state.intent.direction;

        if tuning.resolve_input_x {
            state.velocity.x = resolve_axis(
                state.velocity.x,
                direction.x,
                tuning.acceleration,
                tuning.deceleration,
                dt,
            );
        }
        if tuning.resolve_input_y {
            state.velocity.y = resolve_axis(
                state.velocity.y,
                direction.y,
                tuning.acceleration,
                tuning.deceleration,
                dt,
            );
        }
    }

    /// Consume a queued jump. Requests beyond the jump limit are dropped.
    pub fn resolve_jump(&mut self, presentation: &mut dyn Presentation) {
        let state = &mut self.state;
        if !state.intent.jump_queued {
            return;
        }
        state.intent.jump_queued = false;

        if state.jump_count < state.tuning.jump_limit {
            state.jump_count += 1;
            state.velocity.y = -(2.0 * state.tuning.gravity * state.tuning.jump_height).sqrt();
            state.lifecycle.jumping = true;
            presentation.play_sound(SoundId::Jump);
        }
    }
}

/// One axis of input resolution.
///
/// No input: brake toward zero, landing exactly on zero rather than crossing.
/// Input with (or from rest): accelerate. Input against motion: brake at the
/// deceleration rate, which may carry through zero into the new direction.
fn resolve_axis(velocity: f32, input: f32, acceleration: f32, deceleration: f32, dt: f32) -> f32 {
    if input == 0.0 {
        if velocity < 0.0 {
            (velocity + deceleration * dt).min(0.0)
        } else if velocity > 0.0 {
            (velocity - deceleration * dt).max(0.0)
        } else {
            velocity
        }
    } else if velocity == 0.0 || velocity.signum() == input.signum() {
        velocity + input * acceleration * dt
    } else {
        velocity + input * deceleration * dt
    }
}
