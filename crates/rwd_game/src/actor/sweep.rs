//! Axis-separated ray sweep.
//!
//! Each side of the actor box carries a fan of `ray_count` parallel rays cast
//! from the box centre line outward. A ray reaches half the box plus the
//! distance the actor would travel this tick, so any surface the box would
//! enter is found before the move is committed.

use glam::Vec2;

use super::Actor;
use crate::raycast::Raycaster;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepDirection {
    Left,
    Right,
    Up,
    Down,
}

impl SweepDirection {
    fn unit(self) -> Vec2 {
        match self {
            Self::Left => Vec2::NEG_X,
            Self::Right => Vec2::X,
            Self::Up => Vec2::NEG_Y,
            Self::Down => Vec2::Y,
        }
    }

    fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }
}

/// Pick the hit closest to its own ray origin. `candidates` yields
/// `(origin, hit_point)` pairs; on equal distance the earliest pair wins.
pub fn select_nearest_hit(candidates: impl IntoIterator<Item = (Vec2, Vec2)>) -> Option<Vec2> {
    let mut nearest: Option<(f32, Vec2)> = None;
    for (origin, point) in candidates {
        let distance = origin.distance_squared(point);
        let closer = match nearest {
            Some((best, _)) => distance < best,
            None => true,
        };
        if closer {
            nearest = Some((distance, point));
        }
    }
    nearest.map(|(_, point)| point)
}

impl Actor {
    /// Resolve X fully, then Y. An axis at exactly zero velocity is swept both
    /// ways so a resting actor still reports the surfaces it touches.
    pub(super) fn move_and_collide(&mut self, dt: f32, raycaster: &dyn Raycaster) {
        self.state.collisions.begin_move();

        let vx = self.state.velocity.x;
        if vx < 0.0 {
            self.sweep(SweepDirection::Left, dt, raycaster);
        } else if vx > 0.0 {
            self.sweep(SweepDirection::Right, dt, raycaster);
        } else {
            self.sweep(SweepDirection::Left, dt, raycaster);
            self.sweep(SweepDirection::Right, dt, raycaster);
        }
        self.state.position.x += self.state.velocity.x * dt;

        let vy = self.state.velocity.y;
        if vy < 0.0 {
            self.sweep(SweepDirection::Up, dt, raycaster);
        } else if vy > 0.0 {
            self.sweep(SweepDirection::Down, dt, raycaster);
        } else {
            self.sweep(SweepDirection::Up, dt, raycaster);
            self.sweep(SweepDirection::Down, dt, raycaster);
        }
        self.state.position.y += self.state.velocity.y * dt;
    }

    /// Ray origins for one side, evenly spaced along the perpendicular axis
    /// between the margin-inset corners. A single ray runs through the centre.
    fn ray_origins(&self, direction: SweepDirection) -> Vec<Vec2> {
        let count = self.state.tuning.ray_count;
        let margin = self.state.tuning.margin;
        let position = self.state.position;
        let half = self.half_extents;

        let (start, end) = if direction.is_horizontal() {
            (
                Vec2::new(position.x, position.y - half.y + margin),
                Vec2::new(position.x, position.y + half.y - margin),
            )
        } else {
            (
                Vec2::new(position.x - half.x + margin, position.y),
                Vec2::new(position.x + half.x - margin, position.y),
            )
        };

        match count {
            0 => Vec::new(),
            1 => vec![position],
            _ => (0..count)
                .map(|i| start.lerp(end, i as f32 / (count - 1) as f32))
                .collect(),
        }
    }

    fn sweep(&mut self, direction: SweepDirection, dt: f32, raycaster: &dyn Raycaster) {
        let half = self.half_extents;
        let velocity = self.state.velocity;
        let length = if direction.is_horizontal() {
            half.x + (velocity.x * dt).abs()
        } else {
            half.y + (velocity.y * dt).abs()
        };
        let step = direction.unit() * length;

        let mut hits = Vec::new();
        for origin in self.ray_origins(direction) {
            if let Some(hit) = raycaster.cast_ray(origin, origin + step, self.collider) {
                hits.push((origin, hit.point));
            }
        }
        let Some(point) = select_nearest_hit(hits) else {
            return;
        };

        let state = &mut self.state;
        match direction {
            SweepDirection::Left => {
                state.position.x = point.x + half.x;
                state.velocity.x = 0.0;
                state.collisions.current.x = state.collisions.current.x.with_negative();
            }
            SweepDirection::Right => {
                state.position.x = point.x - half.x;
                state.velocity.x = 0.0;
                state.collisions.current.x = state.collisions.current.x.with_positive();
            }
            SweepDirection::Up => {
                state.position.y = point.y + half.y;
                state.velocity.y = 0.0;
                state.collisions.current.y = state.collisions.current.y.with_negative();
            }
            SweepDirection::Down => {
                state.position.y = point.y - half.y;
                state.velocity.y = 0.0;
                state.collisions.current.y = state.collisions.current.y.with_positive();
                state.jump_count = 0;
            }
        }
    }
}
