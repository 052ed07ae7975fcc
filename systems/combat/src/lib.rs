#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Combat resolution between projectiles, enemies, and the player.
//!
//! Every tick the system walks the enemies from the most recently spawned to the
//! oldest. Projectiles sharing a tile with an enemy are consumed and wound it,
//! enemies without health are removed and drop loot, and survivors move according
//! to an [`EnemyBehavior`]. An enemy standing on the player's tile deals contact
//! damage, at most once per tick.

use std::{collections::BTreeMap, f32::consts::FRAC_1_SQRT_2, ops::RangeInclusive, time::Duration};

use dungeon_crawler_core::{
    Command, EnemyId, EnemySnapshot, ItemKind, PlayerSnapshot, ProjectileSnapshot, TileCoord,
};
use dungeon_crawler_system_collision::CollisionResolver;
use dungeon_crawler_world::TileGrid;
use glam::Vec2;
use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Health removed from an enemy by a single projectile.
pub const PROJECTILE_DAMAGE: u32 = 25;

/// Health removed from the player by touching an enemy.
pub const CONTACT_DAMAGE: u32 = 10;

/// Gold or gem drops left behind by every slain enemy.
pub const LOOT_DROPS: usize = 5;

/// Per-axis distance between a slain enemy and each of its drops.
pub const LOOT_OFFSET: RangeInclusive<f32> = 15.0..=30.0;

/// Distance under which [`ChaseOrWander`] heads straight for the player.
pub const CHASE_RADIUS: f32 = 300.0;

/// Simulated time between two wander direction changes.
pub const WANDER_INTERVAL: Duration = Duration::from_secs(2);

const WANDER_DIRECTIONS: [Vec2; 8] = [
    Vec2::new(0.0, -1.0),
    Vec2::new(FRAC_1_SQRT_2, -FRAC_1_SQRT_2),
    Vec2::new(1.0, 0.0),
    Vec2::new(FRAC_1_SQRT_2, FRAC_1_SQRT_2),
    Vec2::new(0.0, 1.0),
    Vec2::new(-FRAC_1_SQRT_2, FRAC_1_SQRT_2),
    Vec2::new(-1.0, 0.0),
    Vec2::new(-FRAC_1_SQRT_2, -FRAC_1_SQRT_2),
];

/// Policy deciding how live enemies want to move.
pub trait EnemyBehavior {
    /// Velocity in world units per second the enemy wants for this tick.
    fn steer(
        &mut self,
        enemy: &EnemySnapshot,
        player: Option<&PlayerSnapshot>,
        dt: Duration,
    ) -> Vec2;

    /// Drops any per-enemy state once the enemy leaves the level.
    fn forget(&mut self, _enemy: EnemyId) {}

    /// Drops every per-enemy state, for example when a new level replaces the old one.
    fn reset(&mut self) {}
}

/// Chases a nearby player and otherwise wanders in periodically re-rolled directions.
#[derive(Debug)]
pub struct ChaseOrWander {
    rng: ChaCha8Rng,
    wander: BTreeMap<EnemyId, Wander>,
}

#[derive(Clone, Copy, Debug)]
struct Wander {
    direction: Vec2,
    remaining: Duration,
}

impl ChaseOrWander {
    /// Creates the behaviour with a deterministic wander generator.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            wander: BTreeMap::new(),
        }
    }
}

impl EnemyBehavior for ChaseOrWander {
    fn steer(
        &mut self,
        enemy: &EnemySnapshot,
        player: Option<&PlayerSnapshot>,
        dt: Duration,
    ) -> Vec2 {
        let speed = enemy.stats.speed as f32;
        if let Some(player) = player {
            let offset = player.position - enemy.position;
            if offset.length() < CHASE_RADIUS {
                return offset.normalize_or_zero() * speed;
            }
        }

        let rng = &mut self.rng;
        let wander = self.wander.entry(enemy.id).or_insert(Wander {
            direction: Vec2::ZERO,
            remaining: Duration::ZERO,
        });
        wander.remaining = wander.remaining.saturating_sub(dt);
        if wander.remaining.is_zero() {
            wander.direction = WANDER_DIRECTIONS[rng.gen_range(0..WANDER_DIRECTIONS.len())];
            wander.remaining = WANDER_INTERVAL;
        }
        wander.direction * speed
    }

    fn forget(&mut self, enemy: EnemyId) {
        let _ = self.wander.remove(&enemy);
    }

    fn reset(&mut self) {
        self.wander.clear();
    }
}

/// Pure system resolving hits, deaths, loot, enemy movement, and contact damage.
#[derive(Debug)]
pub struct Combat<B = ChaseOrWander> {
    rng: ChaCha8Rng,
    behavior: B,
    collision: CollisionResolver,
}

impl Combat<ChaseOrWander> {
    /// Creates a combat system using the default behaviour, both seeded from `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_behavior(seed, ChaseOrWander::new(seed.wrapping_add(1)))
    }
}

impl<B: EnemyBehavior> Combat<B> {
    /// Creates a combat system driving enemies through the provided behaviour.
    #[must_use]
    pub fn with_behavior(seed: u64, behavior: B) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            behavior,
            collision: CollisionResolver::default(),
        }
    }

    /// Read-only access to the enemy behaviour.
    #[must_use]
    pub fn behavior(&self) -> &B {
        &self.behavior
    }

    /// Forgets every enemy seen so far; called when a level is (re)loaded.
    pub fn reset(&mut self) {
        self.behavior.reset();
    }

    /// Resolves one tick of combat and emits the resulting commands.
    pub fn handle(
        &mut self,
        grid: &TileGrid,
        player: Option<&PlayerSnapshot>,
        enemies: &[EnemySnapshot],
        projectiles: &[ProjectileSnapshot],
        dt: Duration,
        out: &mut Vec<Command>,
    ) {
        let projectile_tiles: Vec<Option<TileCoord>> = projectiles
            .iter()
            .map(|projectile| grid.tile_at_position(projectile.position).coord())
            .collect();
        let mut consumed = vec![false; projectiles.len()];
        let player_tile = player.and_then(|player| grid.tile_at_position(player.position).coord());
        let mut player_hit = false;

        for enemy in enemies.iter().rev() {
            let enemy_tile = grid.tile_at_position(enemy.position).coord();
            let mut health = enemy.stats.health;

            for (index, projectile) in projectiles.iter().enumerate() {
                if consumed[index] || enemy_tile.is_none() || projectile_tiles[index] != enemy_tile
                {
                    continue;
                }
                consumed[index] = true;
                health = health.saturating_sub(PROJECTILE_DAMAGE);
                out.push(Command::RemoveProjectile {
                    projectile: projectile.id,
                });
                out.push(Command::DamageEnemy {
                    enemy: enemy.id,
                    amount: PROJECTILE_DAMAGE,
                });
            }

            if health == 0 {
                debug!("enemy {} slain", enemy.id.get());
                out.push(Command::RemoveEnemy { enemy: enemy.id });
                self.behavior.forget(enemy.id);
                self.drop_loot(enemy.position, out);
            } else {
                let velocity = self.behavior.steer(enemy, player, dt);
                let displacement = velocity * dt.as_secs_f32();
                let resolution = self.collision.resolve(grid, enemy.position, displacement);
                out.push(Command::MoveEnemy {
                    enemy: enemy.id,
                    position: resolution.position,
                    velocity,
                });
            }

            let touching = enemy_tile.is_some() && enemy_tile == player_tile;
            let vulnerable = player.map_or(false, |player| player.can_take_damage);
            if touching && vulnerable && !player_hit {
                player_hit = true;
                out.push(Command::DamagePlayer {
                    amount: CONTACT_DAMAGE,
                });
            }
        }
    }

    fn drop_loot(&mut self, position: Vec2, out: &mut Vec<Command>) {
        for _ in 0..LOOT_DROPS {
            let kind = if self.rng.gen_bool(0.5) {
                ItemKind::GOLD
            } else {
                ItemKind::GEM
            };
            let position = position + self.loot_offset();
            out.push(Command::SpawnItem { kind, position });
        }

        if self.rng.gen_ratio(1, 5) {
            let position = position + self.loot_offset();
            out.push(Command::SpawnItem {
                kind: ItemKind::HEART,
                position,
            });
        }
        if self.rng.gen_ratio(1, 5) {
            let position = position + self.loot_offset();
            out.push(Command::SpawnItem {
                kind: ItemKind::Potion,
                position,
            });
        }
    }

    fn loot_offset(&mut self) -> Vec2 {
        Vec2::new(
            self.rng.gen_range(LOOT_OFFSET),
            self.rng.gen_range(LOOT_OFFSET),
        )
    }
}
