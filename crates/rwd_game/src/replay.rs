//! Recorded input: runs of presentation frames that hold a fixed set of
//! actions.
//!
//! ```json
//! { "frame_dt": 0.0166, "steps": [{ "hold": ["move_right", "jump"], "frames": 12 }] }
//! ```

use std::fs;
use std::path::Path;

use rwd_core::{Action, InputState};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ReplaySequence {
    /// Presentation frame length the replay was captured at.
    #[serde(default = "sixty_hz")]
    pub frame_dt: f64,
    pub steps: Vec<ReplayStep>,
}

/// `frames` consecutive frames holding exactly `hold`. An empty `hold` idles.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplayStep {
    #[serde(default)]
    pub hold: Vec<Action>,
    #[serde(default = "one_frame")]
    pub frames: u32,
}

impl ReplayStep {
    pub fn input(&self) -> InputState {
        self.hold.iter().fold(InputState::new(), |mut input, &action| {
            input.press(action);
            input
        })
    }
}

impl ReplaySequence {
    pub fn expanded_inputs(&self) -> Vec<InputState> {
        self.steps
            .iter()
            .flat_map(|step| std::iter::repeat(step.input()).take(step.frames as usize))
            .collect()
    }

    pub fn frame_count(&self) -> usize {
        self.steps.iter().map(|step| step.frames as usize).sum()
    }
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplaySequence, String> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read replay {}: {e}", path.display()))?;
    let replay: ReplaySequence = serde_json::from_str(&text)
        .map_err(|e| format!("Failed to parse replay {}: {e}", path.display()))?;
    check_replay(&replay)?;
    Ok(replay)
}

fn check_replay(replay: &ReplaySequence) -> Result<(), String> {
    if !(replay.frame_dt.is_finite() && replay.frame_dt > 0.0) {
        return Err(format!(
            "Replay rejected: frame_dt {} is not a positive duration",
            replay.frame_dt
        ));
    }
    if let Some(index) = replay.steps.iter().position(|step| step.frames == 0) {
        return Err(format!("Replay rejected: step {index} covers zero frames"));
    }
    if replay.steps.is_empty() {
        return Err("Replay rejected: no steps".to_string());
    }
    Ok(())
}

fn sixty_hz() -> f64 {
    1.0 / 60.0
}

fn one_frame() -> u32 {
    1
}
