//! Couples the fixed-step clock with the level controller.
//!
//! Per presentation frame:
//!
//!   1. `begin_frame(real_dt)` feeds the accumulator
//!   2. `while should_step()` runs one controller physics tick per slice
//!   3. `process_frame` runs load phases, death, rewind and input polling
//!   4. the actor's animation cursor advances by the clamped `real_dt` in
//!      microseconds

use rwd_core::animation::AnimationFile;
use rwd_core::{FixedStepClock, InputSource};

use crate::config::GameConfig;
use crate::controller::{GameController, GameEvent};
use crate::level::LevelSource;
use crate::presentation::Presentation;

pub struct Session<L: LevelSource> {
    pub clock: FixedStepClock,
    pub controller: GameController<L>,
    clips: Option<AnimationFile>,
}

impl<L: LevelSource> Session<L> {
    pub fn new(config: GameConfig, levels: L, start_level: &str) -> Self {
        let clock = FixedStepClock::new(config.fixed_dt);
        Self {
            clock,
            controller: GameController::new(config, levels, start_level),
            clips: None,
        }
    }

    /// Install animation clips so the actor's cursor advances each frame.
    pub fn with_clips(mut self, clips: AnimationFile) -> Self {
        self.clips = Some(clips);
        self
    }

    pub fn frame(
        &mut self,
        real_dt: f64,
        input: &dyn InputSource,
        presentation: &mut dyn Presentation,
    ) -> Result<Vec<GameEvent>, String> {
        self.clock.begin_frame(real_dt);

        let fixed_dt = self.clock.fixed_dt as f32;
        let mut events = Vec::new();
        while self.clock.should_step() {
            events.extend(self.controller.physics_tick(fixed_dt, presentation));
        }

        events.extend(self.controller.process_frame(real_dt, input, presentation)?);

        // A suspended actor shows whatever frame the last restore set.
        if let Some(clips) = &self.clips {
            let actor = self.controller.actor_mut();
            if actor.is_processing() {
                let dt_us = (self.clock.real_dt * 1_000_000.0).round() as u64;
                actor.advance_animation(dt_us, clips);
            }
        }

        for event in &events {
            log::trace!("frame {}: {:?}", self.controller.frame_counter(), event);
        }
        Ok(events)
    }
}
