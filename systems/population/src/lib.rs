#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic population of freshly loaded levels.
//!
//! When a level finishes loading the player is placed on the floor tile closest
//! to the grid centre. Enemies, the key, and the starting treasure are then
//! scattered over distinct floor tiles away from the player.

use dungeon_crawler_core::{Command, EnemyKind, Event, ItemKind, Stats, TileCoord};
use dungeon_crawler_world::TileGrid;
use log::{info, warn};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Tiles (Chebyshev distance) kept free of enemies and loot around the player.
pub const SAFE_RADIUS: u32 = 3;

/// Configuration parameters required to construct the population system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
    enemies: usize,
    gold: usize,
    gems: usize,
    player_stats: Stats,
}

impl Config {
    /// Creates a configuration describing what every level starts with.
    #[must_use]
    pub const fn new(
        rng_seed: u64,
        enemies: usize,
        gold: usize,
        gems: usize,
        player_stats: Stats,
    ) -> Self {
        Self {
            rng_seed,
            enemies,
            gold,
            gems,
            player_stats,
        }
    }
}

/// Rolls stats for a new enemy.
///
/// Health lies in 40..=80, speed in 50..=150, and every other rating in 5..=10.
pub fn roll_enemy_stats<R: Rng + ?Sized>(rng: &mut R) -> Stats {
    let health = rng.gen_range(40..=80);
    Stats {
        health,
        max_health: health,
        mana: 0,
        max_mana: 0,
        attack: rng.gen_range(5..=10),
        defense: rng.gen_range(5..=10),
        strength: rng.gen_range(5..=10),
        dexterity: rng.gen_range(5..=10),
        stamina: rng.gen_range(5..=10),
        speed: rng.gen_range(50..=150),
    }
}

/// Pure system that reacts to level loads by spawning the player, enemies, and items.
#[derive(Debug)]
pub struct Population {
    config: Config,
    rng: ChaCha8Rng,
}

impl Population {
    /// Creates a new population system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Consumes world events and populates every level that finished loading.
    pub fn handle(&mut self, events: &[Event], grid: &TileGrid, out: &mut Vec<Command>) {
        for event in events {
            if matches!(event, Event::LevelLoaded { .. }) {
                self.populate(grid, out);
            }
        }
    }

    fn populate(&mut self, grid: &TileGrid, out: &mut Vec<Command>) {
        let floors: Vec<TileCoord> = grid
            .iter()
            .filter(|tile| tile.is_floor())
            .filter_map(|tile| tile.coord())
            .collect();

        let Some(start) = closest_to_center(grid, &floors) else {
            warn!("level has no floor tiles; nothing to populate");
            return;
        };
        out.push(Command::SpawnPlayer {
            position: grid.tile_center(start),
            stats: self.config.player_stats,
        });

        let mut candidates: Vec<TileCoord> = floors
            .into_iter()
            .filter(|coord| {
                coord.column().abs_diff(start.column()) > SAFE_RADIUS
                    || coord.row().abs_diff(start.row()) > SAFE_RADIUS
            })
            .collect();
        candidates.shuffle(&mut self.rng);

        let wanted = self.config.enemies + 1 + self.config.gold + self.config.gems;
        if candidates.len() < wanted {
            warn!(
                "only {} free floor tiles for {wanted} spawns",
                candidates.len()
            );
        }
        let mut tiles = candidates.into_iter();

        let mut enemies = 0;
        for coord in tiles.by_ref().take(self.config.enemies) {
            let kind = EnemyKind::ALL[self.rng.gen_range(0..EnemyKind::ALL.len())];
            out.push(Command::SpawnEnemy {
                kind,
                position: grid.tile_center(coord),
                stats: roll_enemy_stats(&mut self.rng),
            });
            enemies += 1;
        }

        let loot = std::iter::once(ItemKind::Key)
            .chain(std::iter::repeat(ItemKind::GOLD).take(self.config.gold))
            .chain(std::iter::repeat(ItemKind::GEM).take(self.config.gems));
        let mut items = 0;
        for (kind, coord) in loot.zip(tiles) {
            out.push(Command::SpawnItem {
                kind,
                position: grid.tile_center(coord),
            });
            items += 1;
        }

        info!(
            "populated level: player at ({}, {}), {enemies} enemies, {items} items",
            start.column(),
            start.row()
        );
    }
}

fn closest_to_center(grid: &TileGrid, floors: &[TileCoord]) -> Option<TileCoord> {
    let center_column = grid.columns() / 2;
    let center_row = grid.rows() / 2;
    floors.iter().copied().min_by_key(|coord| {
        let dx = coord.column().abs_diff(center_column);
        let dy = coord.row().abs_diff(center_row);
        dx * dx + dy * dy
    })
}
