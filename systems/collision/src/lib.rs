#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Axis-separated movement validation against the level grid.
//!
//! Characters are treated as square boxes. A proposed displacement is split into
//! its horizontal and vertical parts, and each part is accepted only when none of
//! the box corners at the candidate position land on a solid tile. Rejecting one
//! axis never cancels the other, which lets characters slide along walls.

use dungeon_crawler_world::TileGrid;
use glam::Vec2;

/// Half the side length of the collision box shared by the player and enemies.
pub const DEFAULT_HALF_EXTENT: f32 = 14.0;

/// Outcome of resolving a displacement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Resolution {
    /// Position after the accepted parts of the displacement were applied.
    pub position: Vec2,
    /// Whether the horizontal part was rejected.
    pub blocked_x: bool,
    /// Whether the vertical part was rejected.
    pub blocked_y: bool,
}

impl Resolution {
    /// Displacement actually applied, relative to `from`.
    #[must_use]
    pub fn applied(&self, from: Vec2) -> Vec2 {
        self.position - from
    }
}

/// Validates proposed moves for boxes of a fixed size.
#[derive(Clone, Copy, Debug)]
pub struct CollisionResolver {
    half_extent: f32,
}

impl Default for CollisionResolver {
    fn default() -> Self {
        Self::new(DEFAULT_HALF_EXTENT)
    }
}

impl CollisionResolver {
    /// Creates a resolver for boxes with the provided half extent.
    #[must_use]
    pub const fn new(half_extent: f32) -> Self {
        Self { half_extent }
    }

    /// Half extent of the boxes checked by this resolver.
    #[must_use]
    pub const fn half_extent(&self) -> f32 {
        self.half_extent
    }

    /// Reports whether a box centred on `center` overlaps a solid tile.
    #[must_use]
    pub fn collides(&self, grid: &TileGrid, center: Vec2) -> bool {
        let extent = self.half_extent;
        [
            Vec2::new(center.x - extent, center.y - extent),
            Vec2::new(center.x + extent, center.y - extent),
            Vec2::new(center.x - extent, center.y + extent),
            Vec2::new(center.x + extent, center.y + extent),
        ]
        .into_iter()
        .any(|corner| grid.is_solid_at(corner))
    }

    /// Applies `displacement` to `position`, one axis at a time.
    ///
    /// The horizontal part is tested first. The vertical part is then tested from
    /// the horizontally resolved position.
    #[must_use]
    pub fn resolve(&self, grid: &TileGrid, position: Vec2, displacement: Vec2) -> Resolution {
        let mut resolved = position;

        let blocked_x = if displacement.x == 0.0 {
            false
        } else {
            let candidate = Vec2::new(position.x + displacement.x, resolved.y);
            let blocked = self.collides(grid, candidate);
            if !blocked {
                resolved = candidate;
            }
            blocked
        };

        let blocked_y = if displacement.y == 0.0 {
            false
        } else {
            let candidate = Vec2::new(resolved.x, position.y + displacement.y);
            let blocked = self.collides(grid, candidate);
            if !blocked {
                resolved = candidate;
            }
            blocked
        };

        Resolution {
            position: resolved,
            blocked_x,
            blocked_y,
        }
    }
}
