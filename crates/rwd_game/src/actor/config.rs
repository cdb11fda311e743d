use glam::Vec2;
use serde::Deserialize;

/// Spawn-time tunables for an actor. Units are pixels and seconds, +Y down.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ActorConfig {
    pub acceleration: f32,
    pub deceleration: f32,
    pub gravity: f32,
    pub max_velocity: Vec2,
    /// Apex height of a jump launched from rest.
    pub jump_height: f32,
    pub jump_limit: u32,
    pub ray_count: u32,
    /// Inset of the outermost sweep rays from the box corners.
    pub margin: f32,
    pub resolve_input_x: bool,
    /// Vertical input resolution decelerates vertical velocity toward zero
    /// whenever no vertical input is held, which fights gravity. Only
    /// free-flying actors want it.
    pub resolve_input_y: bool,
    pub half_extents: Vec2,
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            acceleration: 2000.0,
            deceleration: 4000.0,
            gravity: 200.0,
            max_velocity: Vec2::new(400.0, 1000.0),
            jump_height: 32.0,
            jump_limit: 2,
            ray_count: 3,
            margin: 0.1,
            resolve_input_x: true,
            resolve_input_y: false,
            half_extents: Vec2::new(6.0, 8.0),
        }
    }
}

impl ActorConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.half_extents.x <= 0.0 || self.half_extents.y <= 0.0 {
            return Err("Actor validation failed: half_extents must be > 0".to_string());
        }
        if self.max_velocity.x < 0.0 || self.max_velocity.y < 0.0 {
            return Err("Actor validation failed: max_velocity must be >= 0".to_string());
        }
        if self.acceleration < 0.0 || self.deceleration < 0.0 {
            return Err(
                "Actor validation failed: acceleration and deceleration must be >= 0".to_string(),
            );
        }
        if self.gravity < 0.0 || self.jump_height < 0.0 {
            return Err("Actor validation failed: gravity and jump_height must be >= 0".to_string());
        }
        if self.margin < 0.0 || self.margin > self.half_extents.min_element() {
            return Err(format!(
                "Actor validation failed: margin {} does not fit inside the actor box",
                self.margin
            ));
        }
        Ok(())
    }
}
