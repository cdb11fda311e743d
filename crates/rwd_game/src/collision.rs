//! Level geometry: a tile grid plus removable rectangular bodies, queried by
//! segment raycasts.
//!
//! Gameplay truth for solidity lives here, independent of how a level is
//! drawn. The grid answers "is this cell solid" in O(1); bodies are the few
//! colliders that can disappear at runtime (locks opened by keys) and are
//! tagged with a `ColliderId` so a caster can exclude itself.
//!
//! Ray queries use the slab method against every candidate box and keep the
//! entry with the smallest parametric distance. The entry point's hit axis is
//! snapped to the exact face coordinate so callers that align an edge to the
//! hit land on the face with no floating-point residue.

use std::collections::HashSet;

use glam::Vec2;
use serde::Deserialize;

use crate::raycast::{ColliderId, RayHit, Raycaster};

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct GridOrigin {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCell {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            center,
            half_extents,
        }
    }

    pub fn from_min_size(min: Vec2, size: Vec2) -> Self {
        let half_extents = size * 0.5;
        Self {
            center: min + half_extents,
            half_extents,
        }
    }

    pub fn min(&self) -> Vec2 {
        self.center - self.half_extents
    }

    pub fn max(&self) -> Vec2 {
        self.center + self.half_extents
    }

    /// Strict overlap: boxes that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());
        a_min.x < b_max.x && a_max.x > b_min.x && a_min.y < b_max.y && a_max.y > b_min.y
    }
}

#[derive(Debug, Clone)]
pub struct CollisionGrid {
    pub cell_size: i32,
    pub origin: GridOrigin,
    pub width: i32,
    pub height: i32,
    solids: HashSet<GridCell>,
}

impl CollisionGrid {
    pub fn new(
        cell_size: i32,
        origin: GridOrigin,
        width: i32,
        height: i32,
        solids: impl IntoIterator<Item = GridCell>,
    ) -> Self {
        Self {
            cell_size,
            origin,
            width,
            height,
            solids: solids.into_iter().collect(),
        }
    }

    pub fn is_solid(&self, x: i32, y: i32) -> bool {
        if x < 0 || x >= self.width || y < 0 || y >= self.height {
            return false;
        }
        self.solids.contains(&GridCell { x, y })
    }

    pub fn solid_count(&self) -> usize {
        self.solids.len()
    }

    pub fn cell_aabb(&self, x: i32, y: i32) -> Aabb {
        let size = self.cell_size as f32;
        let min = Vec2::new(
            self.origin.x as f32 + (x * self.cell_size) as f32,
            self.origin.y as f32 + (y * self.cell_size) as f32,
        );
        Aabb::from_min_size(min, Vec2::splat(size))
    }

    /// Pixel-space rectangle covered by a block of cells.
    pub fn cells_to_world(&self, x: i32, y: i32, width: i32, height: i32) -> Aabb {
        let min = self.cell_aabb(x, y).min();
        let size = Vec2::new(
            (width * self.cell_size) as f32,
            (height * self.cell_size) as f32,
        );
        Aabb::from_min_size(min, size)
    }

    fn world_to_cell(&self, world: Vec2) -> (i32, i32) {
        let size = self.cell_size as f32;
        (
            ((world.x - self.origin.x as f32) / size).floor() as i32,
            ((world.y - self.origin.y as f32) / size).floor() as i32,
        )
    }

    /// Nearest solid cell entry along `from -> to` as `(t, point)`.
    fn cast_segment(&self, from: Vec2, to: Vec2) -> Option<(f32, Vec2)> {
        // One cell of slack on every side so segments ending exactly on a
        // cell face still test the cell behind that face.
        let (x0, y0) = self.world_to_cell(from.min(to));
        let (x1, y1) = self.world_to_cell(from.max(to));
        let (x0, x1) = ((x0 - 1).max(0), (x1 + 1).min(self.width - 1));
        let (y0, y1) = ((y0 - 1).max(0), (y1 + 1).min(self.height - 1));

        let mut nearest: Option<(f32, Vec2)> = None;
        for y in y0..=y1 {
            for x in x0..=x1 {
                if !self.is_solid(x, y) {
                    continue;
                }
                if let Some(hit) = segment_entry(from, to, &self.cell_aabb(x, y)) {
                    keep_nearest(&mut nearest, hit);
                }
            }
        }
        nearest
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub id: ColliderId,
    pub aabb: Aabb,
}

/// Everything a ray can hit in a loaded level.
#[derive(Debug, Clone)]
pub struct CollisionWorld {
    pub grid: CollisionGrid,
    bodies: Vec<Body>,
}

impl CollisionWorld {
    pub fn new(grid: CollisionGrid) -> Self {
        Self {
            grid,
            bodies: Vec::new(),
        }
    }

    pub fn add_body(&mut self, id: ColliderId, aabb: Aabb) {
        self.bodies.push(Body { id, aabb });
    }

    /// Remove every body whose id is in `ids`. Returns how many were removed.
    pub fn remove_bodies(&mut self, ids: &[ColliderId]) -> usize {
        let before = self.bodies.len();
        self.bodies.retain(|body| !ids.contains(&body.id));
        before - self.bodies.len()
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }
}

impl Raycaster for CollisionWorld {
    fn cast_ray(&self, from: Vec2, to: Vec2, exclude: ColliderId) -> Option<RayHit> {
        let mut nearest = if exclude == ColliderId::TILEMAP {
            None
        } else {
            self.grid.cast_segment(from, to)
        };

        for body in self.bodies.iter().filter(|body| body.id != exclude) {
            if let Some(hit) = segment_entry(from, to, &body.aabb) {
                keep_nearest(&mut nearest, hit);
            }
        }

        nearest.map(|(_, point)| RayHit { point })
    }
}

fn keep_nearest(nearest: &mut Option<(f32, Vec2)>, candidate: (f32, Vec2)) {
    let closer = match nearest {
        Some((best_t, _)) => candidate.0 < *best_t,
        None => true,
    };
    if closer {
        *nearest = Some(candidate);
    }
}

/// Slab test of the segment `from -> to` against a closed box.
///
/// Returns the parametric entry `t` in `[0, 1]` and the entry point. A segment
/// starting inside the box hits at `from`.
fn segment_entry(from: Vec2, to: Vec2, aabb: &Aabb) -> Option<(f32, Vec2)> {
    let delta = to - from;
    let (min, max) = (aabb.min(), aabb.max());

    let mut t_enter = 0.0f32;
    let mut t_exit = 1.0f32;
    let mut entry_face: Option<(usize, f32)> = None;

    for axis in 0..2 {
        let origin = from[axis];
        let dir = delta[axis];
        if dir == 0.0 {
            if origin < min[axis] || origin > max[axis] {
                return None;
            }
            continue;
        }

        let inv = 1.0 / dir;
        let mut t0 = (min[axis] - origin) * inv;
        let mut t1 = (max[axis] - origin) * inv;
        let mut face = min[axis];
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
            face = max[axis];
        }
        if t0 > t_enter {
            t_enter = t0;
            entry_face = Some((axis, face));
        }
        t_exit = t_exit.min(t1);
        if t_enter > t_exit {
            return None;
        }
    }

    let mut point = from + delta * t_enter;
    if let Some((axis, face)) = entry_face {
        point[axis] = face;
    }
    Some((t_enter, point))
}
