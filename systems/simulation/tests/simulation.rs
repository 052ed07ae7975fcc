use std::time::Duration;

use dungeon_crawler_assets::{catalog, AssetCache, AssetError, AssetProvider};
use dungeon_crawler_core::{
    Action, Command, EnemyKind, EnemySnapshot, Event, FrameInput, ItemKind, ItemSnapshot,
    ProjectileSnapshot, Progress, Stats, TileKind,
};
use dungeon_crawler_rendering::{Renderer, Scene, SpriteLayer};
use dungeon_crawler_simulation::{
    run, FixedClock, InputProvider, Simulation, SimulationConfig, WindowConfig,
};
use dungeon_crawler_world::{query, REFERENCE_LEVEL};
use glam::Vec2;

const STEP: Duration = Duration::from_millis(100);

fn config(seed: u64) -> SimulationConfig {
    SimulationConfig {
        seed,
        window: WindowConfig {
            width: 950.0,
            height: 950.0,
        },
        ..SimulationConfig::default()
    }
}

fn loaded(config: SimulationConfig) -> Simulation {
    let mut simulation = Simulation::new(config);
    simulation.load_level(REFERENCE_LEVEL).expect("reference level parses");
    simulation
}

fn player_position(simulation: &Simulation) -> Vec2 {
    query::player(simulation.world())
        .expect("player spawned")
        .position
}

#[test]
fn loading_centres_the_level_and_spawns_the_player() {
    let simulation = loaded(config(1));

    let (origin, _) = query::grid(simulation.world()).bounds();
    assert_eq!(origin, Vec2::ZERO);
    assert_eq!(player_position(&simulation), Vec2::new(475.0, 475.0));
    assert_eq!(query::enemies(simulation.world()).len(), 6);
    assert_eq!(query::items(simulation.world()).len(), 9);
    assert_eq!(query::torches(simulation.world()).len(), 5);
    assert!(simulation.is_running());
}

#[test]
fn movement_scales_with_speed_and_time() {
    let mut simulation = loaded(config(2));

    simulation.step(&FrameInput::default().with_action(Action::MoveRight), STEP);

    assert_eq!(player_position(&simulation), Vec2::new(495.0, 475.0));
    assert_eq!(query::tick_index(simulation.world()), 1);
}

#[test]
fn escape_stops_before_the_tick() {
    let mut simulation = loaded(config(3));

    simulation.step(&FrameInput::default().with_action(Action::Escape), STEP);
    assert!(!simulation.is_running());
    assert_eq!(query::tick_index(simulation.world()), 0);

    simulation.step(&FrameInput::default().with_action(Action::MoveRight), STEP);
    assert_eq!(query::tick_index(simulation.world()), 0);
    assert_eq!(player_position(&simulation), Vec2::new(475.0, 475.0));
}

#[test]
fn attack_fires_toward_the_cursor() {
    let mut simulation = loaded(config(4));
    let center = simulation.config().screen_center();
    let input = FrameInput::default()
        .with_action(Action::Attack)
        .with_cursor(center + Vec2::new(100.0, 0.0));

    simulation.step(&input, STEP);

    let projectiles = query::projectiles(simulation.world());
    assert_eq!(projectiles.len(), 1);
    assert_eq!(projectiles[0].direction, Vec2::new(1.0, 0.0));
    assert!((projectiles[0].position.x - 525.0).abs() < 1e-3);

    simulation.step(&input, Duration::from_millis(50));
    assert_eq!(query::projectiles(simulation.world()).len(), 1);
}

#[test]
fn attack_without_cursor_follows_facing() {
    let mut simulation = loaded(config(5));

    simulation.step(
        &FrameInput::default()
            .with_action(Action::MoveUp)
            .with_action(Action::Attack),
        STEP,
    );

    let projectiles = query::projectiles(simulation.world());
    assert_eq!(projectiles.len(), 1);
    assert_eq!(projectiles[0].direction, Vec2::new(0.0, -1.0));
}

#[test]
fn player_death_stops_the_run() {
    let mut settings = config(6);
    settings.player.stats.health = 10;
    let mut simulation = loaded(settings);
    let position = player_position(&simulation);

    simulation.submit([Command::SpawnEnemy {
        kind: EnemyKind::Slime,
        position,
        stats: Stats {
            health: 50,
            max_health: 50,
            ..Stats::default()
        },
    }]);
    simulation.step(&FrameInput::default(), STEP);

    assert!(simulation.events().contains(&Event::PlayerDied));
    assert!(!simulation.is_running());
    let player = query::player(simulation.world()).expect("player still present");
    assert_eq!(player.stats.health, 0);
}

#[test]
fn collecting_the_key_unlocks_the_door() {
    let mut simulation = loaded(config(7));
    let key = query::items(simulation.world())
        .into_iter()
        .find(|item| item.kind == ItemKind::Key)
        .expect("key spawned");

    simulation.submit([Command::MovePlayer {
        position: key.position,
        velocity: Vec2::ZERO,
    }]);
    simulation.step(&FrameInput::default(), STEP);

    assert!(simulation.events().contains(&Event::KeyCollected));
    assert!(query::progress(simulation.world()).key_collected);
    let grid = query::grid(simulation.world());
    let door = grid.door().expect("reference level has a door");
    let tile = grid
        .tile_at(door.column() as i32, door.row() as i32)
        .expect("door inside grid");
    assert_eq!(tile.kind, TileKind::WallDoorUnlocked);
}

#[test]
fn light_follows_the_player() {
    let mut simulation = loaded(config(8));
    assert!(simulation.light().is_none());

    simulation.step(&FrameInput::default(), STEP);

    let field = simulation.light().expect("light computed");
    let position = player_position(&simulation);
    assert_eq!(field.alpha_at(position), Some(0));
    assert_eq!(field.alpha(0, 0), Some(255));
}

#[test]
fn config_loaded_from_toml_drives_the_run() {
    let settings = SimulationConfig::from_toml_str(
        r#"
        seed = 11

        [window]
        width = 950.0
        height = 950.0

        [population]
        enemies = 2
        gold = 1
        gems = 0
        "#,
    )
    .expect("config parses");
    let simulation = loaded(settings);

    assert_eq!(query::enemies(simulation.world()).len(), 2);
    assert_eq!(query::items(simulation.world()).len(), 2);
}

#[test]
fn partial_player_stats_keep_a_playable_player() {
    let settings = SimulationConfig::from_toml_str(
        r#"
        [window]
        width = 950.0
        height = 950.0

        [player.stats]
        health = 80
        speed = 200
        "#,
    )
    .expect("config parses");
    let mut simulation = loaded(settings);
    let position = player_position(&simulation);
    simulation.submit([Command::SpawnItem {
        kind: ItemKind::HEART,
        position,
    }]);

    simulation.step(&FrameInput::default().with_action(Action::MoveRight), STEP);

    let player = query::player(simulation.world()).expect("player spawned");
    assert_eq!(player.stats.health, 95);
    assert_eq!(player.stats.max_health, 100);
    assert_eq!(player.position, Vec2::new(495.0, 475.0));
    assert!(simulation.is_running());
}

#[derive(Debug, PartialEq)]
struct Outcome {
    player: Vec2,
    enemies: Vec<EnemySnapshot>,
    items: Vec<ItemSnapshot>,
    projectiles: Vec<ProjectileSnapshot>,
    progress: Progress,
}

fn replay(seed: u64) -> Outcome {
    let mut simulation = loaded(config(seed));
    let center = simulation.config().screen_center();
    let script = [
        FrameInput::default().with_action(Action::MoveRight),
        FrameInput::default()
            .with_action(Action::MoveDown)
            .with_action(Action::Attack)
            .with_cursor(center + Vec2::new(0.0, 80.0)),
        FrameInput::default().with_action(Action::MoveLeft),
        FrameInput::default()
            .with_action(Action::Attack)
            .with_cursor(center - Vec2::new(60.0, 20.0)),
        FrameInput::default(),
    ];

    for input in script.iter().cycle().take(150) {
        simulation.step(input, Duration::from_millis(16));
    }

    let world = simulation.world();
    Outcome {
        player: player_position(&simulation),
        enemies: query::enemies(world),
        items: query::items(world),
        projectiles: query::projectiles(world),
        progress: query::progress(world),
    }
}

#[test]
fn deterministic_replay_produces_identical_worlds() {
    let first = replay(42);
    let second = replay(42);

    assert_eq!(first, second, "replay diverged between runs");
}

#[derive(Debug, Default)]
struct AcceptAll;

impl AssetProvider for AcceptAll {
    fn load(&mut self, _path: &str) -> Result<(), AssetError> {
        Ok(())
    }
}

#[derive(Debug, Default)]
struct HoldRight;

impl InputProvider for HoldRight {
    fn is_active(&self, action: Action) -> bool {
        action == Action::MoveRight
    }
}

#[derive(Debug, Default)]
struct RecordingRenderer {
    scenes: Vec<Scene>,
}

impl Renderer for RecordingRenderer {
    fn present(&mut self, scene: &Scene) -> anyhow::Result<()> {
        self.scenes.push(scene.clone());
        Ok(())
    }
}

#[test]
fn run_presents_every_tick_until_the_limit() {
    let mut simulation = loaded(config(9));
    let mut assets = AssetCache::new(AcceptAll);
    assert_eq!(assets.preload(catalog()), 0);
    let mut renderer = RecordingRenderer::default();

    let ticks = run(
        &mut simulation,
        &mut HoldRight,
        &mut FixedClock::new(Duration::from_millis(10)),
        &mut renderer,
        &assets,
        Some(30),
    )
    .expect("run succeeds");

    assert_eq!(ticks, 30);
    assert_eq!(renderer.scenes.len(), 30);

    let scene = renderer.scenes.last().expect("scene presented");
    assert_eq!(scene.tile_grid.tiles.len(), 19 * 19);
    let textured = scene
        .tile_grid
        .tiles
        .iter()
        .filter(|tile| tile.texture.is_valid())
        .count();
    let empty = scene
        .tile_grid
        .tiles
        .iter()
        .filter(|tile| tile.kind == TileKind::Empty)
        .count();
    assert_eq!(textured + empty, 19 * 19);
    assert!(scene.light.is_some());

    let players: Vec<_> = scene
        .sprites
        .iter()
        .filter(|sprite| sprite.layer == SpriteLayer::Player)
        .collect();
    assert_eq!(players.len(), 1);
    assert!(players[0].texture.is_valid());
    assert_eq!(scene.hud.health, 100);
    assert_eq!(scene.sprites.len(), scene.drawable_sprites().count());
}
