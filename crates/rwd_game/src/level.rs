//! Level assets: the on-disk format, its validation, and the runtime form a
//! controller plays in.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::Deserialize;

use crate::collision::{Aabb, CollisionGrid, CollisionWorld, GridCell, GridOrigin};
use crate::raycast::ColliderId;

#[derive(Debug, Deserialize, Clone)]
pub struct LevelFile {
    pub version: String,
    pub level_id: String,
    pub cell_size: i32,
    #[serde(default)]
    pub origin: GridOrigin,
    pub width: i32,
    pub height: i32,
    pub solids: Vec<GridCell>,
    pub spawn: LevelPoint,
    /// Camera limits as a cell rectangle. Defaults to the whole grid.
    #[serde(default)]
    pub camera_bounds: Option<CellRect>,
    #[serde(default)]
    pub coins: Vec<LevelPoint>,
    #[serde(default)]
    pub keys: Vec<KeyPlacement>,
    #[serde(default)]
    pub locks: Vec<LockPlacement>,
    #[serde(default)]
    pub zones: Vec<ZonePlacement>,
    /// Half size of the square pickup area around each coin and key.
    #[serde(default = "default_pickup_half_extent")]
    pub pickup_half_extent: f32,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct LevelPoint {
    pub x: f32,
    pub y: f32,
}

impl From<LevelPoint> for Vec2 {
    fn from(point: LevelPoint) -> Self {
        Vec2::new(point.x, point.y)
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct CellRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LockColor {
    Silver,
    Gold,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct KeyPlacement {
    pub color: LockColor,
    pub x: f32,
    pub y: f32,
}

/// A lock is a solid block of cells that disappears when its key is taken.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct LockPlacement {
    pub color: LockColor,
    pub x: i32,
    pub y: i32,
    #[serde(default = "default_cell_span")]
    pub width: i32,
    #[serde(default = "default_cell_span")]
    pub height: i32,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ZoneKind {
    Death,
    Credits,
    LoadLevel { level: String },
}

/// Pixel-space trigger rectangle, `x`/`y` at its top-left corner.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ZonePlacement {
    #[serde(flatten)]
    pub kind: ZoneKind,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

pub fn load_level_from_path(path: &Path) -> Result<LevelFile, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read level file {}: {e}", path.display()))?;
    let level: LevelFile = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse level JSON {}: {e}", path.display()))?;
    validate_level(&level)?;
    Ok(level)
}

pub fn validate_level(level: &LevelFile) -> Result<(), String> {
    if level.version != "0.1" {
        return Err(format!(
            "Level validation failed: unsupported version '{}'",
            level.version
        ));
    }
    if level.level_id.is_empty() {
        return Err("Level validation failed: level_id is empty".to_string());
    }
    if level.cell_size <= 0 {
        return Err("Level validation failed: cell_size must be > 0".to_string());
    }
    if level.width <= 0 || level.height <= 0 {
        return Err("Level validation failed: width and height must be > 0".to_string());
    }
    if level.pickup_half_extent <= 0.0 {
        return Err("Level validation failed: pickup_half_extent must be > 0".to_string());
    }

    let in_grid = |x: i32, y: i32| x >= 0 && x < level.width && y >= 0 && y < level.height;

    let mut seen = HashSet::new();
    for cell in &level.solids {
        if !in_grid(cell.x, cell.y) {
            return Err(format!(
                "Level validation failed: solid cell out of bounds ({}, {})",
                cell.x, cell.y
            ));
        }
        if !seen.insert(*cell) {
            return Err(format!(
                "Level validation failed: duplicate solid cell ({}, {})",
                cell.x, cell.y
            ));
        }
    }

    for lock in &level.locks {
        if lock.width <= 0 || lock.height <= 0 {
            return Err(format!(
                "Level validation failed: lock at ({}, {}) has an empty size",
                lock.x, lock.y
            ));
        }
        if !in_grid(lock.x, lock.y) || !in_grid(lock.x + lock.width - 1, lock.y + lock.height - 1)
        {
            return Err(format!(
                "Level validation failed: lock at ({}, {}) is out of bounds",
                lock.x, lock.y
            ));
        }
    }

    if let Some(rect) = level.camera_bounds {
        if rect.width <= 0 || rect.height <= 0 {
            return Err("Level validation failed: camera_bounds must not be empty".to_string());
        }
    }

    for zone in &level.zones {
        if zone.width <= 0.0 || zone.height <= 0.0 {
            return Err(format!(
                "Level validation failed: zone at ({}, {}) has an empty size",
                zone.x, zone.y
            ));
        }
        if let ZoneKind::LoadLevel { level: target } = &zone.kind {
            if target.is_empty() {
                return Err("Level validation failed: load_level zone has no target".to_string());
            }
        }
    }

    for key in &level.keys {
        if !level.locks.iter().any(|lock| lock.color == key.color) {
            log::warn!(
                "Level '{}' has a {:?} key but no {:?} locks.",
                level.level_id,
                key.color,
                key.color
            );
        }
    }

    Ok(())
}

/// Where level assets come from. Called once per load, in the load phase
/// that instantiates geometry.
pub trait LevelSource {
    fn load_level(&mut self, name: &str) -> Result<LevelFile, String>;
}

/// Levels stored as `<root>/<name>.json`.
#[derive(Debug, Clone)]
pub struct LevelDirectory {
    root: PathBuf,
}

impl LevelDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn level_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.json"))
    }
}

impl LevelSource for LevelDirectory {
    fn load_level(&mut self, name: &str) -> Result<LevelFile, String> {
        load_level_from_path(&self.level_path(name))
    }
}

/// In-memory levels keyed by name.
impl LevelSource for HashMap<String, LevelFile> {
    fn load_level(&mut self, name: &str) -> Result<LevelFile, String> {
        let level = self
            .get(name)
            .cloned()
            .ok_or_else(|| format!("Failed to load level '{name}': no such level"))?;
        validate_level(&level)?;
        Ok(level)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TriggerKind {
    Coin,
    Key(LockColor),
    Death,
    Credits,
    LoadLevel(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trigger {
    pub kind: TriggerKind,
    pub area: Aabb,
    /// Cleared once a pickup is collected.
    pub active: bool,
    /// Whether the actor overlapped this trigger after the last check.
    occupied: bool,
}

impl Trigger {
    fn new(kind: TriggerKind, area: Aabb) -> Self {
        Self {
            kind,
            area,
            active: true,
            occupied: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lock {
    pub color: LockColor,
    pub collider: ColliderId,
}

/// A level instantiated for play.
#[derive(Debug, Clone)]
pub struct LoadedLevel {
    pub name: String,
    pub world: CollisionWorld,
    pub triggers: Vec<Trigger>,
    pub locks: Vec<Lock>,
    pub spawn: Vec2,
    pub camera_bounds: Aabb,
    pub coin_total: u32,
}

impl LoadedLevel {
    pub fn instantiate(name: &str, file: LevelFile) -> Self {
        let grid = CollisionGrid::new(
            file.cell_size,
            file.origin,
            file.width,
            file.height,
            file.solids,
        );
        let camera = file.camera_bounds.unwrap_or(CellRect {
            x: 0,
            y: 0,
            width: file.width,
            height: file.height,
        });
        let camera_bounds = grid.cells_to_world(camera.x, camera.y, camera.width, camera.height);

        let mut world = CollisionWorld::new(grid);
        let mut locks = Vec::with_capacity(file.locks.len());
        for (i, placement) in file.locks.iter().enumerate() {
            let collider = ColliderId(ColliderId::FIRST_DYNAMIC + i as u32);
            let aabb = world.grid.cells_to_world(
                placement.x,
                placement.y,
                placement.width,
                placement.height,
            );
            world.add_body(collider, aabb);
            locks.push(Lock {
                color: placement.color,
                collider,
            });
        }

        let pickup = Vec2::splat(file.pickup_half_extent);
        let mut triggers = Vec::new();
        for coin in &file.coins {
            triggers.push(Trigger::new(
                TriggerKind::Coin,
                Aabb::new(Vec2::from(*coin), pickup),
            ));
        }
        for key in &file.keys {
            triggers.push(Trigger::new(
                TriggerKind::Key(key.color),
                Aabb::new(Vec2::new(key.x, key.y), pickup),
            ));
        }
        for zone in file.zones {
            let kind = match zone.kind {
                ZoneKind::Death => TriggerKind::Death,
                ZoneKind::Credits => TriggerKind::Credits,
                ZoneKind::LoadLevel { level } => TriggerKind::LoadLevel(level),
            };
            let area = Aabb::from_min_size(
                Vec2::new(zone.x, zone.y),
                Vec2::new(zone.width, zone.height),
            );
            triggers.push(Trigger::new(kind, area));
        }

        Self {
            name: name.to_string(),
            world,
            triggers,
            locks,
            spawn: Vec2::from(file.spawn),
            camera_bounds,
            coin_total: file.coins.len() as u32,
        }
    }

    /// Update overlap state against `actor` and return the indices of active
    /// triggers the actor has just entered, in level order.
    pub fn entered_triggers(&mut self, actor: &Aabb) -> Vec<usize> {
        let mut entered = Vec::new();
        for (i, trigger) in self.triggers.iter_mut().enumerate() {
            let overlapping = trigger.active && trigger.area.overlaps(actor);
            if overlapping && !trigger.occupied {
                entered.push(i);
            }
            trigger.occupied = overlapping;
        }
        entered
    }

    /// Remove every lock body of `color` from the world.
    pub fn open_locks(&mut self, color: LockColor) -> usize {
        let ids: Vec<ColliderId> = self
            .locks
            .iter()
            .filter(|lock| lock.color == color)
            .map(|lock| lock.collider)
            .collect();
        self.locks.retain(|lock| lock.color != color);
        self.world.remove_bodies(&ids)
    }

    pub fn coins_remaining(&self) -> u32 {
        self.triggers
            .iter()
            .filter(|trigger| trigger.active && trigger.kind == TriggerKind::Coin)
            .count() as u32
    }
}

const fn default_pickup_half_extent() -> f32 {
    4.0
}

const fn default_cell_span() -> i32 {
    1
}
