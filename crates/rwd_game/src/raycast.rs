use glam::Vec2;

/// Identity of a collider the raycaster knows about. The actor passes its own
/// id as the exclusion so its rays never report the actor itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColliderId(pub u32);

impl ColliderId {
    /// The level's static tile geometry.
    pub const TILEMAP: ColliderId = ColliderId(0);
    pub const PLAYER: ColliderId = ColliderId(1);
    /// First id handed out to per-level bodies (locks).
    pub const FIRST_DYNAMIC: u32 = 2;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub point: Vec2,
}

/// Nearest-hit segment query against scene geometry.
///
/// Must be synchronous: the actor's sweep issues every query for a tick
/// before committing any position change.
pub trait Raycaster {
    fn cast_ray(&self, from: Vec2, to: Vec2, exclude: ColliderId) -> Option<RayHit>;
}
