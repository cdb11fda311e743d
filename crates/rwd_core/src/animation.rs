//! Sprite clips and the playback cursor the actor carries around.
//!
//! Timing is whole microseconds so a cursor advanced by the same ticks always
//! lands on the same frame; the cursor is restored verbatim on rewind. Clip
//! files store `duration_ms`, converted to microseconds while deserializing.

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub const ANIMATION_FORMAT_VERSION: &str = "0.1";

#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawFrame")]
pub struct AnimationFrame {
    pub sprite_id: String,
    pub duration_us: u64,
}

#[derive(Deserialize)]
struct RawFrame {
    sprite_id: String,
    duration_ms: u64,
}

impl TryFrom<RawFrame> for AnimationFrame {
    type Error = String;

    fn try_from(raw: RawFrame) -> Result<Self, Self::Error> {
        if raw.sprite_id.is_empty() {
            return Err("frame has an empty sprite_id".to_string());
        }
        if raw.duration_ms == 0 {
            return Err(format!("frame '{}' lasts 0ms", raw.sprite_id));
        }
        Ok(Self {
            sprite_id: raw.sprite_id,
            duration_us: raw.duration_ms * 1000,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnimationClip {
    pub frames: Vec<AnimationFrame>,
    #[serde(default)]
    pub looping: bool,
}

impl AnimationClip {
    pub fn total_duration_us(&self) -> u64 {
        self.frames.iter().map(|frame| frame.duration_us).sum()
    }

    fn sprite_at(&self, index: usize) -> &str {
        &self.frames[index].sprite_id
    }
}

/// Every clip for one sprite sheet, keyed by clip name.
#[derive(Debug, Clone, Deserialize)]
pub struct AnimationFile {
    pub version: String,
    pub animation_id: String,
    pub animations: HashMap<String, AnimationClip>,
}

impl AnimationFile {
    pub fn clip(&self, name: &str) -> Option<&AnimationClip> {
        self.animations.get(name)
    }

    /// Names from `wanted` that have no clip, in the order given.
    pub fn missing_clips<'a>(&self, wanted: &[&'a str]) -> Vec<&'a str> {
        wanted
            .iter()
            .copied()
            .filter(|name| !self.animations.contains_key(*name))
            .collect()
    }
}

/// Playback cursor: which clip, which frame, and how far into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationState {
    pub clip_name: String,
    pub frame_index: usize,
    pub elapsed_us: u64,
    pub finished: bool,
}

impl AnimationState {
    pub fn new(clip_name: &str) -> Self {
        Self {
            clip_name: clip_name.to_string(),
            frame_index: 0,
            elapsed_us: 0,
            finished: false,
        }
    }

    /// Restart on `clip_name` unless it is already playing. Returns whether the
    /// clip changed.
    pub fn play(&mut self, clip_name: &str) -> bool {
        let switched = self.clip_name != clip_name;
        if switched {
            *self = Self::new(clip_name);
        }
        switched
    }

    pub fn seek(&mut self, frame_index: usize) {
        self.frame_index = frame_index;
        self.elapsed_us = 0;
        self.finished = false;
    }

    /// Advance by `dt_us` and return the sprite now showing. An out-of-range
    /// index left by `seek` is pulled back to the last frame first.
    pub fn tick<'a>(&mut self, dt_us: u64, clip: &'a AnimationClip) -> &'a str {
        let Some(last) = clip.frames.len().checked_sub(1) else {
            return "";
        };
        self.frame_index = self.frame_index.min(last);
        if self.finished {
            return clip.sprite_at(self.frame_index);
        }

        self.elapsed_us += dt_us;
        while self.elapsed_us >= clip.frames[self.frame_index].duration_us {
            self.elapsed_us -= clip.frames[self.frame_index].duration_us;
            if self.frame_index < last {
                self.frame_index += 1;
            } else if clip.looping {
                self.frame_index = 0;
            } else {
                self.elapsed_us = 0;
                self.finished = true;
                break;
            }
        }

        clip.sprite_at(self.frame_index)
    }
}

impl Default for AnimationState {
    fn default() -> Self {
        Self::new("idle")
    }
}

pub fn load_animation_file(path: &Path) -> Result<AnimationFile, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read animation file {}: {e}", path.display()))?;
    let file: AnimationFile = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse animation file {}: {e}", path.display()))?;
    check_animation_file(&file)?;
    Ok(file)
}

fn check_animation_file(file: &AnimationFile) -> Result<(), String> {
    if file.version != ANIMATION_FORMAT_VERSION {
        return Err(format!(
            "Animation file rejected: version '{}' is not '{}'",
            file.version, ANIMATION_FORMAT_VERSION
        ));
    }
    if file.animation_id.is_empty() {
        return Err("Animation file rejected: missing animation_id".to_string());
    }
    let mut names: Vec<&String> = file.animations.keys().collect();
    names.sort();
    for name in names {
        if file.animations[name].frames.is_empty() {
            return Err(format!("Animation file rejected: clip '{name}' is empty"));
        }
    }
    Ok(())
}
