//! Fixed-timestep accumulator.
//!
//! A frame's real delta is banked with `begin_frame`; `should_step` then
//! withdraws one `fixed_dt` per physics tick. The remainder stays banked.

/// Longest real delta a single frame may bank, in seconds.
pub const DEFAULT_FRAME_CAP: f64 = 0.25;

#[derive(Debug, Clone)]
pub struct FixedStepClock {
    pub fixed_dt: f64,
    pub frame_cap: f64,
    banked: f64,
    /// Real delta of the current frame after clamping.
    pub real_dt: f64,
    pub frame_count: u64,
    pub fixed_step_count: u64,
    pub steps_this_frame: u32,
}

impl FixedStepClock {
    pub fn new(fixed_dt: f64) -> Self {
        Self {
            fixed_dt,
            frame_cap: DEFAULT_FRAME_CAP,
            banked: 0.0,
            real_dt: 0.0,
            frame_count: 0,
            fixed_step_count: 0,
            steps_this_frame: 0,
        }
    }

    pub fn begin_frame(&mut self, real_dt: f64) {
        let clamped = real_dt.clamp(0.0, self.frame_cap);
        if real_dt > self.frame_cap {
            log::warn!(
                "Frame delta {:.1}ms over cap, banking {:.1}ms",
                real_dt * 1000.0,
                clamped * 1000.0
            );
        }
        self.real_dt = clamped;
        self.banked += clamped;
        self.frame_count += 1;
        self.steps_this_frame = 0;
    }

    pub fn should_step(&mut self) -> bool {
        if self.banked < self.fixed_dt {
            return false;
        }
        self.banked -= self.fixed_dt;
        self.fixed_step_count += 1;
        self.steps_this_frame += 1;
        true
    }

    /// Fraction of a tick left banked once the frame's ticks are drained.
    pub fn leftover_fraction(&self) -> f64 {
        self.banked / self.fixed_dt
    }
}

impl Default for FixedStepClock {
    fn default() -> Self {
        Self::new(1.0 / 60.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(clock: &mut FixedStepClock) -> u32 {
        let mut ticks = 0;
        while clock.should_step() {
            ticks += 1;
        }
        ticks
    }

    #[test]
    fn exact_delta_runs_one_tick() {
        let mut clock = FixedStepClock::new(0.5);
        clock.begin_frame(0.5);
        assert_eq!(drain(&mut clock), 1);
        assert_eq!(clock.steps_this_frame, 1);
        assert!(clock.leftover_fraction().abs() < 1e-12);
    }

    #[test]
    fn remainder_carries_to_the_next_frame() {
        let mut clock = FixedStepClock::new(0.5);
        clock.begin_frame(0.25);
        assert_eq!(drain(&mut clock), 0);
        assert!((clock.leftover_fraction() - 0.5).abs() < 1e-12);

        clock.begin_frame(0.375);
        assert_eq!(drain(&mut clock), 1);
        assert!((clock.leftover_fraction() - 0.25).abs() < 1e-12);
        assert_eq!((clock.frame_count, clock.fixed_step_count), (2, 1));
    }

    #[test]
    fn oversized_delta_is_clamped_to_the_cap() {
        let mut clock = FixedStepClock::new(0.0625);
        clock.begin_frame(10.0);
        assert_eq!(drain(&mut clock), 4);
        assert_eq!(clock.real_dt, DEFAULT_FRAME_CAP);
    }

    #[test]
    fn negative_delta_banks_nothing() {
        let mut clock = FixedStepClock::default();
        clock.begin_frame(-1.0);
        assert_eq!(drain(&mut clock), 0);
        assert_eq!(clock.real_dt, 0.0);
    }
}
