use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::actor::ActorConfig;

/// One hour of history at 60 frames per second.
pub const MAX_REVERSE_LIMIT: usize = 216_000;
/// Ten minutes at 60 frames per second.
pub const MAX_DEATH_FREEZE_FRAMES: u64 = 36_000;

/// Game-wide tunables. Every field is optional in the JSON file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Physics tick length in seconds.
    pub fixed_dt: f64,
    /// Rewind history length in frames; the buffer holds one fewer.
    pub reverse_limit: usize,
    /// Presentation frames the actor stays frozen after dying.
    pub death_freeze_frames: u64,
    pub actor: ActorConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            reverse_limit: 300,
            death_freeze_frames: 120,
            actor: ActorConfig::default(),
        }
    }
}

pub fn load_config_from_path(path: &Path) -> Result<GameConfig, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config file {}: {e}", path.display()))?;
    let config: GameConfig = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse config JSON {}: {e}", path.display()))?;
    validate_config(&config)?;
    Ok(config)
}

pub fn validate_config(config: &GameConfig) -> Result<(), String> {
    if !(config.fixed_dt > 0.0 && config.fixed_dt.is_finite()) {
        return Err(format!(
            "Config validation failed: fixed_dt must be a positive number, got {}",
            config.fixed_dt
        ));
    }
    if config.reverse_limit > MAX_REVERSE_LIMIT {
        return Err(format!(
            "Config validation failed: reverse_limit {} exceeds {}",
            config.reverse_limit, MAX_REVERSE_LIMIT
        ));
    }
    if config.death_freeze_frames > MAX_DEATH_FREEZE_FRAMES {
        return Err(format!(
            "Config validation failed: death_freeze_frames {} exceeds {}",
            config.death_freeze_frames, MAX_DEATH_FREEZE_FRAMES
        ));
    }
    if config.reverse_limit < 2 {
        log::warn!(
            "reverse_limit {} leaves no room for snapshots; rewind is disabled.",
            config.reverse_limit
        );
    }
    config.actor.validate()
}
