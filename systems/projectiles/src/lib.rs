#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Flight of the player's projectiles.

use std::time::Duration;

use dungeon_crawler_core::{Command, ProjectileSnapshot};
use dungeon_crawler_world::TileGrid;
use glam::Vec2;
use log::debug;

/// Distance a projectile covers per second.
pub const PROJECTILE_SPEED: f32 = 500.0;

/// Visual spin of a projectile in degrees per second.
pub const PROJECTILE_SPIN: f32 = 400.0;

/// Unit direction from the screen centre toward `target`.
///
/// Returns `None` when the target sits on the centre itself.
#[must_use]
pub fn direction_toward(target: Vec2, screen_center: Vec2) -> Option<Vec2> {
    (target - screen_center).try_normalize()
}

/// Pure system advancing projectiles and retiring those that left the floor.
#[derive(Debug, Default)]
pub struct Projectiles;

impl Projectiles {
    /// Emits a move or removal for every projectile in flight.
    pub fn handle(
        &mut self,
        grid: &TileGrid,
        projectiles: &[ProjectileSnapshot],
        dt: Duration,
        out: &mut Vec<Command>,
    ) {
        let seconds = dt.as_secs_f32();
        for projectile in projectiles {
            let position = projectile.position + projectile.direction * PROJECTILE_SPEED * seconds;
            if !grid.is_floor_at(position) {
                debug!("projectile {} hit a wall", projectile.id.get());
                out.push(Command::RemoveProjectile {
                    projectile: projectile.id,
                });
                continue;
            }

            out.push(Command::MoveProjectile {
                projectile: projectile.id,
                position,
                rotation: (projectile.rotation + PROJECTILE_SPIN * seconds).rem_euclid(360.0),
            });
        }
    }
}
