//! Action-level input state and the per-frame input contract gameplay reads.
//!
//! Input is tracked as **level-triggered** held state only. Edge detection
//! (e.g. the jump button's rising edge) belongs to the consumer, which keeps
//! its own "was held last frame" copy so that the edge survives in snapshots
//! and replays byte-for-byte.
//!
//! Direction is derived from opposing action pairs: holding both or neither of
//! `MoveLeft`/`MoveRight` yields 0 on that axis.

use std::collections::HashSet;

use glam::Vec2;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    Jump,
    Rewind,
}

/// Read-only snapshot of one frame of player intent.
pub trait InputSource {
    /// Per-axis direction, each component in {-1, 0, 1}. +Y points down.
    fn direction(&self) -> Vec2;
    fn jump_held(&self) -> bool;
    fn rewind_held(&self) -> bool;
}

#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashSet<Action>,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            held: HashSet::new(),
        }
    }

    pub fn press(&mut self, action: Action) {
        self.held.insert(action);
    }

    pub fn release(&mut self, action: Action) {
        self.held.remove(&action);
    }

    pub fn set(&mut self, action: Action, held: bool) {
        if held {
            self.press(action);
        } else {
            self.release(action);
        }
    }

    pub fn release_all(&mut self) {
        self.held.clear();
    }

    pub fn is_held(&self, action: Action) -> bool {
        self.held.contains(&action)
    }

    fn axis(&self, negative: Action, positive: Action) -> f32 {
        match (self.is_held(negative), self.is_held(positive)) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

impl InputSource for InputState {
    fn direction(&self) -> Vec2 {
        Vec2::new(
            self.axis(Action::MoveLeft, Action::MoveRight),
            self.axis(Action::MoveUp, Action::MoveDown),
        )
    }

    fn jump_held(&self) -> bool {
        self.is_held(Action::Jump)
    }

    fn rewind_held(&self) -> bool {
        self.is_held(Action::Rewind)
    }
}
