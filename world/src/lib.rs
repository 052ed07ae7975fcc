#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for the dungeon crawler.

mod grid;

use std::time::Duration;

use dungeon_crawler_core::{
    Animation, AnimationState, Command, EnemyId, EnemyKind, Event, ItemId, ItemKind,
    ProjectileId, Progress, Stats, TileCoord, TorchId,
};
use glam::Vec2;
use log::{debug, info};

pub use grid::{LevelLoadError, Tile, TileGrid};

/// Layout of the level shipped with the game, in the textual level format.
pub const REFERENCE_LEVEL: &str = include_str!("../levels/reference.lvl");

/// Tiles whose centres hold a torch once a level is loaded.
pub const TORCH_TILES: [TileCoord; 5] = [
    TileCoord::new(3, 9),
    TileCoord::new(7, 7),
    TileCoord::new(11, 11),
    TileCoord::new(13, 15),
    TileCoord::new(15, 3),
];

/// Time the player stays invulnerable after taking contact damage.
///
/// Damage is accepted again once strictly more than this has elapsed.
pub const DAMAGE_COOLDOWN: Duration = Duration::from_secs(1);

/// Time that must pass between two player attacks unless configured otherwise.
pub const DEFAULT_ATTACK_COOLDOWN: Duration = Duration::from_millis(250);

const CHARACTER_FRAMES: u32 = 8;
const ITEM_FRAMES: u32 = 8;
const TORCH_FRAMES: u32 = 5;

/// Represents the authoritative dungeon world state.
#[derive(Debug)]
pub struct World {
    grid: TileGrid,
    torches: Vec<Torch>,
    player: Option<Player>,
    enemies: Vec<Enemy>,
    items: Vec<Item>,
    projectiles: Vec<Projectile>,
    progress: Progress,
    attack_cooldown: Duration,
    next_enemy_id: u32,
    next_item_id: u32,
    next_projectile_id: u32,
    tick_index: u64,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Creates an empty world awaiting a level.
    #[must_use]
    pub fn new() -> Self {
        Self {
            grid: TileGrid::new(),
            torches: Vec::new(),
            player: None,
            enemies: Vec::new(),
            items: Vec::new(),
            projectiles: Vec::new(),
            progress: Progress::default(),
            attack_cooldown: DEFAULT_ATTACK_COOLDOWN,
            next_enemy_id: 0,
            next_item_id: 0,
            next_projectile_id: 0,
            tick_index: 0,
        }
    }

    /// Creates an empty world whose player attacks at the provided interval.
    #[must_use]
    pub fn with_attack_cooldown(attack_cooldown: Duration) -> Self {
        Self {
            attack_cooldown,
            ..Self::new()
        }
    }

    fn reset_level_state(&mut self) {
        self.player = None;
        self.enemies.clear();
        self.items.clear();
        self.projectiles.clear();
        self.progress = Progress::default();
        self.place_torches();
    }

    fn place_torches(&mut self) {
        self.torches = TORCH_TILES
            .iter()
            .zip(0_u32..)
            .map(|(coord, id)| Torch {
                id: TorchId::new(id),
                position: self.grid.tile_center(*coord),
                brightness: 1.0,
                animation: Animation::new(TORCH_FRAMES),
            })
            .collect();
    }

    fn enemy_index(&self, enemy: EnemyId) -> Option<usize> {
        self.enemies.iter().position(|candidate| candidate.id == enemy)
    }

    fn item_index(&self, item: ItemId) -> Option<usize> {
        self.items.iter().position(|candidate| candidate.id == item)
    }

    fn projectile_index(&self, projectile: ProjectileId) -> Option<usize> {
        self.projectiles
            .iter()
            .position(|candidate| candidate.id == projectile)
    }

    fn advance_timers(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        if let Some(player) = self.player.as_mut() {
            player.since_attack = player.since_attack.saturating_add(dt);
            if !player.can_take_damage {
                player.since_damage = player.since_damage.saturating_add(dt);
                if player.since_damage > DAMAGE_COOLDOWN {
                    player.can_take_damage = true;
                    out_events.push(Event::PlayerVulnerable);
                }
            }
            player
                .animation
                .advance(dt, player.animation_state.is_walking());
        }

        for enemy in &mut self.enemies {
            enemy
                .animation
                .advance(dt, enemy.animation_state.is_walking());
        }
        for item in &mut self.items {
            item.animation.advance(dt, true);
        }
        for torch in &mut self.torches {
            torch.animation.advance(dt, true);
        }
    }

    fn collect_item(&mut self, index: usize, out_events: &mut Vec<Event>) {
        let item = self.items.remove(index);
        match item.kind {
            ItemKind::Gold { value } => {
                self.progress.gold = self.progress.gold.saturating_add(value);
            }
            ItemKind::Gem { value } => {
                self.progress.score = self.progress.score.saturating_add(value);
            }
            ItemKind::Heart { value } => {
                if let Some(player) = self.player.as_mut() {
                    let stats = &mut player.stats;
                    stats.health = stats
                        .health
                        .saturating_add(value)
                        .min(stats.max_health.max(stats.health));
                }
            }
            ItemKind::Potion => {}
            ItemKind::Key => {
                self.progress.key_collected = true;
                if let Some(coord) = self.grid.unlock_door() {
                    info!(
                        "door at ({}, {}) unlocked",
                        coord.column(),
                        coord.row()
                    );
                    out_events.push(Event::DoorUnlocked { coord });
                }
            }
        }

        out_events.push(Event::ItemCollected {
            item: item.id,
            kind: item.kind,
        });
        if item.kind == ItemKind::Key {
            out_events.push(Event::KeyCollected);
        }
    }
}

/// Replaces the current level with the layout described by `source`.
///
/// On success every entity is cleared, torches are placed at their fixed tiles and
/// [`Event::LevelLoaded`] is emitted. On failure the world is left untouched.
pub fn load_level(
    world: &mut World,
    source: &str,
    out_events: &mut Vec<Event>,
) -> Result<(), LevelLoadError> {
    world.grid.load_from_source(source)?;
    world.reset_level_state();

    let door = world.grid.door();
    info!(
        "level loaded with door {:?} and {} torches",
        door,
        world.torches.len()
    );
    out_events.push(Event::LevelLoaded {
        door,
        torches: world.torches.len(),
    });
    Ok(())
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureLevel { origin } => {
            world.grid.set_origin(origin);
            let positions: Vec<Vec2> = TORCH_TILES
                .iter()
                .map(|coord| world.grid.tile_center(*coord))
                .collect();
            for (torch, position) in world.torches.iter_mut().zip(positions) {
                torch.position = position;
            }
        }
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced { dt });
            world.advance_timers(dt, out_events);
        }
        Command::SetTile { column, row, kind } => {
            if world.grid.set_tile(column, row, kind) {
                if let Some(coord) = world.grid.tile_at(column, row).and_then(|tile| tile.coord())
                {
                    out_events.push(Event::TileChanged { coord, kind });
                }
            }
        }
        Command::UnlockDoor => {
            if let Some(coord) = world.grid.unlock_door() {
                out_events.push(Event::DoorUnlocked { coord });
            }
        }
        Command::SpawnPlayer { position, stats } => {
            world.player = Some(Player {
                position,
                velocity: Vec2::ZERO,
                stats,
                animation_state: AnimationState::IdleDown,
                animation: Animation::new(CHARACTER_FRAMES),
                can_take_damage: true,
                since_damage: Duration::ZERO,
                since_attack: world.attack_cooldown,
            });
            out_events.push(Event::PlayerSpawned { position });
        }
        Command::MovePlayer { position, velocity } => {
            if let Some(player) = world.player.as_mut() {
                player.position = position;
                player.velocity = velocity;
                player.animation_state = player.animation_state.from_velocity(velocity);
            }
        }
        Command::DamagePlayer { amount } => {
            let Some(player) = world.player.as_mut() else {
                return;
            };
            if !player.can_take_damage || player.stats.health == 0 {
                return;
            }

            player.stats.health = player.stats.health.saturating_sub(amount);
            player.can_take_damage = false;
            player.since_damage = Duration::ZERO;
            debug!("player took {amount} damage, {} left", player.stats.health);
            out_events.push(Event::PlayerDamaged {
                amount,
                health: player.stats.health,
            });

            if player.stats.health == 0 {
                info!("player died on tick {}", world.tick_index);
                out_events.push(Event::PlayerDied);
            }
        }
        Command::SpawnEnemy {
            kind,
            position,
            stats,
        } => {
            let id = EnemyId::new(world.next_enemy_id);
            world.next_enemy_id = world.next_enemy_id.saturating_add(1);
            world.enemies.push(Enemy {
                id,
                kind,
                position,
                velocity: Vec2::ZERO,
                stats,
                animation_state: AnimationState::IdleDown,
                animation: Animation::new(CHARACTER_FRAMES),
            });
            out_events.push(Event::EnemySpawned {
                enemy: id,
                kind,
                position,
            });
        }
        Command::MoveEnemy {
            enemy,
            position,
            velocity,
        } => {
            if let Some(index) = world.enemy_index(enemy) {
                let enemy = &mut world.enemies[index];
                enemy.position = position;
                enemy.velocity = velocity;
                enemy.animation_state = enemy.animation_state.from_velocity(velocity);
            }
        }
        Command::DamageEnemy { enemy, amount } => {
            if let Some(index) = world.enemy_index(enemy) {
                let target = &mut world.enemies[index];
                target.stats.health = target.stats.health.saturating_sub(amount);
                out_events.push(Event::EnemyDamaged {
                    enemy,
                    amount,
                    health: target.stats.health,
                });
            }
        }
        Command::RemoveEnemy { enemy } => {
            if let Some(index) = world.enemy_index(enemy) {
                let removed = world.enemies.remove(index);
                let slain = removed.stats.health == 0;
                if slain {
                    world.progress.enemies_slain = world.progress.enemies_slain.saturating_add(1);
                }
                debug!("enemy {} removed (slain: {slain})", enemy.get());
                out_events.push(Event::EnemyRemoved {
                    enemy,
                    kind: removed.kind,
                    position: removed.position,
                    slain,
                });
            }
        }
        Command::SpawnItem { kind, position } => {
            let id = ItemId::new(world.next_item_id);
            world.next_item_id = world.next_item_id.saturating_add(1);
            world.items.push(Item {
                id,
                kind,
                position,
                animation: Animation::new(ITEM_FRAMES),
            });
            out_events.push(Event::ItemSpawned {
                item: id,
                kind,
                position,
            });
        }
        Command::CollectItem { item } => {
            if let Some(index) = world.item_index(item) {
                world.collect_item(index, out_events);
            }
        }
        Command::FireProjectile { origin, direction } => {
            let attack_cooldown = world.attack_cooldown;
            let Some(player) = world.player.as_mut() else {
                return;
            };
            if player.since_attack < attack_cooldown {
                return;
            }
            player.since_attack = Duration::ZERO;

            let id = ProjectileId::new(world.next_projectile_id);
            world.next_projectile_id = world.next_projectile_id.saturating_add(1);
            world.projectiles.push(Projectile {
                id,
                position: origin,
                direction,
                rotation: direction.y.atan2(direction.x).to_degrees(),
            });
            out_events.push(Event::ProjectileFired {
                projectile: id,
                position: origin,
            });
        }
        Command::MoveProjectile {
            projectile,
            position,
            rotation,
        } => {
            if let Some(index) = world.projectile_index(projectile) {
                let projectile = &mut world.projectiles[index];
                projectile.position = position;
                projectile.rotation = rotation;
            }
        }
        Command::RemoveProjectile { projectile } => {
            if let Some(index) = world.projectile_index(projectile) {
                let _ = world.projectiles.remove(index);
                out_events.push(Event::ProjectileRemoved { projectile });
            }
        }
        Command::SetTorchBrightness { torch, brightness } => {
            if let Some(target) = world.torches.iter_mut().find(|candidate| candidate.id == torch)
            {
                target.brightness = brightness;
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use dungeon_crawler_core::{
        EnemySnapshot, ItemSnapshot, PlayerSnapshot, ProjectileSnapshot, Progress,
        TorchSnapshot,
    };

    use super::{TileGrid, World};

    /// Provides read-only access to the level grid.
    #[must_use]
    pub fn grid(world: &World) -> &TileGrid {
        &world.grid
    }

    /// Captures the player, if one has been spawned.
    #[must_use]
    pub fn player(world: &World) -> Option<PlayerSnapshot> {
        world.player.as_ref().map(|player| PlayerSnapshot {
            position: player.position,
            velocity: player.velocity,
            stats: player.stats,
            animation: player.animation_state,
            frame: player.animation.frame(),
            can_take_damage: player.can_take_damage,
            can_attack: player.since_attack >= world.attack_cooldown,
        })
    }

    /// Captures every enemy in storage order.
    #[must_use]
    pub fn enemies(world: &World) -> Vec<EnemySnapshot> {
        world
            .enemies
            .iter()
            .map(|enemy| EnemySnapshot {
                id: enemy.id,
                kind: enemy.kind,
                position: enemy.position,
                velocity: enemy.velocity,
                stats: enemy.stats,
                animation: enemy.animation_state,
                frame: enemy.animation.frame(),
            })
            .collect()
    }

    /// Captures every item lying in the level in storage order.
    #[must_use]
    pub fn items(world: &World) -> Vec<ItemSnapshot> {
        world
            .items
            .iter()
            .map(|item| ItemSnapshot {
                id: item.id,
                kind: item.kind,
                position: item.position,
                frame: item.animation.frame(),
            })
            .collect()
    }

    /// Captures every projectile in flight in storage order.
    #[must_use]
    pub fn projectiles(world: &World) -> Vec<ProjectileSnapshot> {
        world
            .projectiles
            .iter()
            .map(|projectile| ProjectileSnapshot {
                id: projectile.id,
                position: projectile.position,
                direction: projectile.direction,
                rotation: projectile.rotation,
            })
            .collect()
    }

    /// Captures every torch.
    #[must_use]
    pub fn torches(world: &World) -> Vec<TorchSnapshot> {
        world
            .torches
            .iter()
            .map(|torch| TorchSnapshot {
                id: torch.id,
                position: torch.position,
                brightness: torch.brightness,
                frame: torch.animation.frame(),
            })
            .collect()
    }

    /// Running totals collected since the level was loaded.
    #[must_use]
    pub fn progress(world: &World) -> Progress {
        world.progress
    }

    /// Number of ticks processed since the world was created.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }
}

#[derive(Clone, Debug)]
struct Player {
    position: Vec2,
    velocity: Vec2,
    stats: Stats,
    animation_state: AnimationState,
    animation: Animation,
    can_take_damage: bool,
    since_damage: Duration,
    since_attack: Duration,
}

#[derive(Clone, Debug)]
struct Enemy {
    id: EnemyId,
    kind: EnemyKind,
    position: Vec2,
    velocity: Vec2,
    stats: Stats,
    animation_state: AnimationState,
    animation: Animation,
}

#[derive(Clone, Debug)]
struct Item {
    id: ItemId,
    kind: ItemKind,
    position: Vec2,
    animation: Animation,
}

#[derive(Clone, Debug)]
struct Projectile {
    id: ProjectileId,
    position: Vec2,
    direction: Vec2,
    rotation: f32,
}

#[derive(Clone, Debug)]
struct Torch {
    id: TorchId,
    position: Vec2,
    brightness: f32,
    animation: Animation,
}

#[cfg(test)]
mod tests {
    use super::*;
    use dungeon_crawler_core::TileKind;

    fn loaded_world() -> (World, Vec<Event>) {
        let mut world = World::new();
        let mut events = Vec::new();
        load_level(&mut world, REFERENCE_LEVEL, &mut events).expect("reference level parses");
        (world, events)
    }

    fn player_stats(health: u32) -> Stats {
        Stats {
            health,
            max_health: 100,
            ..Stats::default()
        }
    }

    #[test]
    fn reference_level_has_locked_door_and_torches() {
        let (world, events) = loaded_world();
        let grid = query::grid(&world);

        assert_eq!(grid.door(), Some(TileCoord::new(9, 0)));
        assert_eq!(
            grid.tile_at(9, 0).map(|tile| tile.kind),
            Some(TileKind::WallDoorLocked)
        );
        assert!(grid.is_floor(9, 9));
        assert_eq!(
            events,
            vec![Event::LevelLoaded {
                door: Some(TileCoord::new(9, 0)),
                torches: TORCH_TILES.len(),
            }]
        );
        assert_eq!(query::torches(&world).len(), 5);
    }

    #[test]
    fn configure_level_moves_torches_with_origin() {
        let (mut world, mut events) = loaded_world();
        apply(
            &mut world,
            Command::ConfigureLevel {
                origin: Vec2::new(165.0, 65.0),
            },
            &mut events,
        );

        let torch = query::torches(&world)[0];
        assert_eq!(torch.position, Vec2::new(165.0 + 175.0, 65.0 + 475.0));
    }

    #[test]
    fn failed_load_keeps_previous_level() {
        let (mut world, mut events) = loaded_world();
        events.clear();

        let result = load_level(&mut world, "[19]", &mut events);

        assert_eq!(result, Err(LevelLoadError::Truncated { cells_read: 1 }));
        assert!(events.is_empty());
        assert!(query::grid(&world).is_floor(9, 9));
    }

    #[test]
    fn contact_damage_respects_cooldown() {
        let (mut world, mut events) = loaded_world();
        apply(
            &mut world,
            Command::SpawnPlayer {
                position: Vec2::new(475.0, 475.0),
                stats: player_stats(100),
            },
            &mut events,
        );
        events.clear();

        apply(&mut world, Command::DamagePlayer { amount: 10 }, &mut events);
        apply(&mut world, Command::DamagePlayer { amount: 10 }, &mut events);
        assert_eq!(
            events,
            vec![Event::PlayerDamaged {
                amount: 10,
                health: 90
            }]
        );

        events.clear();
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(600),
            },
            &mut events,
        );
        assert!(!query::player(&world).expect("player").can_take_damage);

        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(400),
            },
            &mut events,
        );
        assert!(!events.contains(&Event::PlayerVulnerable));
        assert!(!query::player(&world).expect("player").can_take_damage);

        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(1),
            },
            &mut events,
        );
        assert!(events.contains(&Event::PlayerVulnerable));
        assert!(query::player(&world).expect("player").can_take_damage);
    }

    #[test]
    fn lethal_damage_announces_death() {
        let (mut world, mut events) = loaded_world();
        apply(
            &mut world,
            Command::SpawnPlayer {
                position: Vec2::new(475.0, 475.0),
                stats: player_stats(5),
            },
            &mut events,
        );
        events.clear();

        apply(&mut world, Command::DamagePlayer { amount: 10 }, &mut events);

        assert_eq!(
            events,
            vec![
                Event::PlayerDamaged {
                    amount: 10,
                    health: 0
                },
                Event::PlayerDied,
            ]
        );
    }

    #[test]
    fn key_unlocks_door_and_heart_caps_health() {
        let (mut world, mut events) = loaded_world();
        apply(
            &mut world,
            Command::SpawnPlayer {
                position: Vec2::new(475.0, 475.0),
                stats: player_stats(95),
            },
            &mut events,
        );
        for kind in [ItemKind::Key, ItemKind::HEART, ItemKind::GOLD, ItemKind::GEM] {
            apply(
                &mut world,
                Command::SpawnItem {
                    kind,
                    position: Vec2::new(475.0, 475.0),
                },
                &mut events,
            );
        }
        events.clear();

        for item in query::items(&world) {
            apply(&mut world, Command::CollectItem { item: item.id }, &mut events);
        }

        assert!(events.contains(&Event::DoorUnlocked {
            coord: TileCoord::new(9, 0)
        }));
        assert!(events.contains(&Event::KeyCollected));
        assert!(!query::grid(&world).is_solid(9, 0));
        assert!(query::items(&world).is_empty());
        assert_eq!(query::player(&world).expect("player").stats.health, 100);
        assert_eq!(
            query::progress(&world),
            Progress {
                gold: 15,
                score: 50,
                key_collected: true,
                enemies_slain: 0,
            }
        );
    }

    #[test]
    fn heart_never_lowers_health_above_maximum() {
        let (mut world, mut events) = loaded_world();
        apply(
            &mut world,
            Command::SpawnPlayer {
                position: Vec2::new(475.0, 475.0),
                stats: Stats {
                    health: 80,
                    max_health: 0,
                    ..Stats::default()
                },
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::SpawnItem {
                kind: ItemKind::HEART,
                position: Vec2::new(475.0, 475.0),
            },
            &mut events,
        );
        let item = query::items(&world)[0].id;
        events.clear();

        apply(&mut world, Command::CollectItem { item }, &mut events);

        assert_eq!(query::player(&world).expect("player").stats.health, 80);
        assert!(!events.contains(&Event::PlayerDied));
    }

    #[test]
    fn slain_enemies_are_counted() {
        let (mut world, mut events) = loaded_world();
        apply(
            &mut world,
            Command::SpawnEnemy {
                kind: EnemyKind::Slime,
                position: Vec2::new(300.0, 300.0),
                stats: Stats {
                    health: 20,
                    ..Stats::default()
                },
            },
            &mut events,
        );
        let enemy = query::enemies(&world)[0].id;

        apply(&mut world, Command::DamageEnemy { enemy, amount: 25 }, &mut events);
        apply(&mut world, Command::RemoveEnemy { enemy }, &mut events);

        assert!(query::enemies(&world).is_empty());
        assert_eq!(query::progress(&world).enemies_slain, 1);
    }

    #[test]
    fn attack_cooldown_gates_projectiles() {
        let mut world = World::with_attack_cooldown(Duration::from_millis(250));
        let mut events = Vec::new();
        load_level(&mut world, REFERENCE_LEVEL, &mut events).expect("reference level parses");
        apply(
            &mut world,
            Command::SpawnPlayer {
                position: Vec2::new(475.0, 475.0),
                stats: player_stats(100),
            },
            &mut events,
        );

        let fire = Command::FireProjectile {
            origin: Vec2::new(475.0, 475.0),
            direction: Vec2::new(1.0, 0.0),
        };
        apply(&mut world, fire.clone(), &mut events);
        apply(&mut world, fire.clone(), &mut events);
        assert_eq!(query::projectiles(&world).len(), 1);

        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(250),
            },
            &mut events,
        );
        apply(&mut world, fire, &mut events);
        assert_eq!(query::projectiles(&world).len(), 2);
    }
}
