#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tick orchestration for the dungeon crawler.
//!
//! A [`Simulation`] owns the authoritative [`World`] together with every pure
//! system. Each call to [`Simulation::step`] samples one [`FrameInput`], runs the
//! systems in a fixed order and applies every command batch before the next
//! system observes the world, so later passes see earlier results of the same
//! tick.

mod config;
mod runtime;
mod scene;

use std::time::Duration;

use dungeon_crawler_assets::{AssetCache, AssetProvider};
use dungeon_crawler_core::{Action, Command, Event, FrameInput};
use dungeon_crawler_rendering::Scene;
use dungeon_crawler_system_collision::CollisionResolver;
use dungeon_crawler_system_combat::Combat;
use dungeon_crawler_system_lighting::{LightField, Lighting};
use dungeon_crawler_system_pickup::Pickup;
use dungeon_crawler_system_population::{Config as PopulationSetup, Population};
use dungeon_crawler_system_projectiles::{direction_toward, Projectiles};
use dungeon_crawler_world::{self as world, query, LevelLoadError, World};
use log::{debug, info};

pub use config::{ConfigError, PlayerConfig, PopulationConfig, SimulationConfig, WindowConfig};
pub use runtime::{run, Clock, FixedClock, InputProvider, WallClock};

/// Dungeon simulation driven one tick at a time.
#[derive(Debug)]
pub struct Simulation {
    config: SimulationConfig,
    world: World,
    population: Population,
    lighting: Lighting,
    combat: Combat,
    projectiles: Projectiles,
    pickup: Pickup,
    collision: CollisionResolver,
    running: bool,
    events: Vec<Event>,
}

impl Simulation {
    /// Creates a simulation with an empty world awaiting a level.
    #[must_use]
    pub fn new(config: SimulationConfig) -> Self {
        let seed = config.seed;
        let population = Population::new(PopulationSetup::new(
            seed,
            config.population.enemies,
            config.population.gold,
            config.population.gems,
            config.player.stats,
        ));

        Self {
            world: World::with_attack_cooldown(config.attack_cooldown()),
            population,
            lighting: Lighting::new(seed.wrapping_add(3)),
            combat: Combat::new(seed.wrapping_add(1)),
            projectiles: Projectiles,
            pickup: Pickup,
            collision: CollisionResolver::default(),
            running: true,
            events: Vec::new(),
            config,
        }
    }

    /// Loads a level, centres it in the window and populates it.
    ///
    /// On failure the previous level stays in place.
    pub fn load_level(&mut self, source: &str) -> Result<(), LevelLoadError> {
        let mut events = Vec::new();
        world::load_level(&mut self.world, source, &mut events)?;
        world::apply(
            &mut self.world,
            Command::ConfigureLevel {
                origin: self.config.level_origin(),
            },
            &mut events,
        );

        self.combat.reset();

        let mut commands = Vec::new();
        self.population
            .handle(&events, query::grid(&self.world), &mut commands);
        self.events = events;
        self.apply_all(commands);
        self.running = true;
        Ok(())
    }

    /// Advances the simulation by one tick.
    ///
    /// Does nothing once the run has stopped. `Escape` stops the run before any
    /// state changes.
    pub fn step(&mut self, input: &FrameInput, dt: Duration) {
        self.events.clear();
        if !self.running {
            return;
        }
        if input.is_active(Action::Escape) {
            info!("escape requested on tick {}", query::tick_index(&self.world));
            self.running = false;
            return;
        }

        self.apply_all(vec![Command::Tick { dt }]);
        self.move_player(input, dt);
        self.attack(input);

        let mut commands = Vec::new();
        let player = query::player(&self.world);
        self.pickup
            .handle(player.as_ref(), &query::items(&self.world), &mut commands);
        self.apply_all(commands);

        let mut commands = Vec::new();
        self.lighting
            .flicker(&query::torches(&self.world), &mut commands);
        self.apply_all(commands);
        if let Some(player) = query::player(&self.world) {
            self.lighting.recompute(
                query::grid(&self.world),
                player.position,
                &query::torches(&self.world),
            );
        }

        let mut commands = Vec::new();
        let player = query::player(&self.world);
        self.combat.handle(
            query::grid(&self.world),
            player.as_ref(),
            &query::enemies(&self.world),
            &query::projectiles(&self.world),
            dt,
            &mut commands,
        );
        self.apply_all(commands);

        let mut commands = Vec::new();
        self.projectiles.handle(
            query::grid(&self.world),
            &query::projectiles(&self.world),
            dt,
            &mut commands,
        );
        self.apply_all(commands);

        if self.events.contains(&Event::PlayerDied) {
            self.running = false;
        }
    }

    /// Applies externally issued commands, such as scripted spawns.
    pub fn submit(&mut self, commands: impl IntoIterator<Item = Command>) {
        self.apply_all(commands);
    }

    /// Stops the run.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Reports whether the run loop should keep stepping.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Read-only access to the world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Configuration the simulation was created with.
    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Light field of the last tick, once the player exists.
    #[must_use]
    pub fn light(&self) -> Option<&LightField> {
        self.lighting.field()
    }

    /// Events emitted by the last step, level load or submission.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Describes the current state for a renderer.
    #[must_use]
    pub fn scene<P: AssetProvider>(&self, assets: &AssetCache<P>) -> Scene {
        scene::build(&self.world, self.lighting.field(), assets)
    }

    fn move_player(&mut self, input: &FrameInput, dt: Duration) {
        let Some(player) = query::player(&self.world) else {
            return;
        };

        let velocity = input.movement_axis().normalize_or_zero() * player.stats.speed as f32;
        let resolution = self.collision.resolve(
            query::grid(&self.world),
            player.position,
            velocity * dt.as_secs_f32(),
        );
        self.apply_all(vec![Command::MovePlayer {
            position: resolution.position,
            velocity,
        }]);
    }

    fn attack(&mut self, input: &FrameInput) {
        if !input.is_active(Action::Attack) {
            return;
        }
        let Some(player) = query::player(&self.world) else {
            return;
        };
        if !player.can_attack {
            return;
        }

        let direction = input
            .cursor()
            .and_then(|cursor| direction_toward(cursor, self.config.screen_center()))
            .unwrap_or_else(|| player.animation.facing());
        debug!("player attacks toward {direction}");
        self.apply_all(vec![Command::FireProjectile {
            origin: player.position,
            direction,
        }]);
    }

    fn apply_all(&mut self, commands: impl IntoIterator<Item = Command>) {
        for command in commands {
            world::apply(&mut self.world, command, &mut self.events);
        }
    }
}
