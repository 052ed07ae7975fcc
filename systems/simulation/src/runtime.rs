//! Outer run loop and the collaborators it polls.

use std::time::{Duration, Instant};

use anyhow::Result;
use dungeon_crawler_assets::{AssetCache, AssetProvider};
use dungeon_crawler_core::{Action, FrameInput};
use dungeon_crawler_rendering::Renderer;
use dungeon_crawler_world::query;
use glam::Vec2;
use log::info;

use crate::Simulation;

/// Source of logical player input.
pub trait InputProvider {
    /// Refreshes device state; called once before every tick.
    fn poll(&mut self) {}

    /// Reports whether `action` is held.
    fn is_active(&self, action: Action) -> bool;

    /// Aim cursor in screen coordinates, if the device has one.
    fn cursor(&self) -> Option<Vec2> {
        None
    }

    /// Captures the current state as a per-tick snapshot.
    fn sample(&self) -> FrameInput {
        let input = Action::ALL
            .into_iter()
            .filter(|action| self.is_active(*action))
            .fold(FrameInput::default(), FrameInput::with_action);
        match self.cursor() {
            Some(cursor) => input.with_cursor(cursor),
            None => input,
        }
    }
}

/// Source of the time elapsed between ticks.
pub trait Clock {
    /// Time elapsed since the previous call.
    fn delta(&mut self) -> Duration;
}

/// Clock measuring real elapsed time.
#[derive(Debug)]
pub struct WallClock {
    last: Instant,
}

impl WallClock {
    /// Starts measuring from now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for WallClock {
    fn delta(&mut self) -> Duration {
        let now = Instant::now();
        let delta = now.saturating_duration_since(self.last);
        self.last = now;
        delta
    }
}

/// Clock returning the same step every tick, for headless and replayed runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedClock {
    step: Duration,
}

impl FixedClock {
    /// Creates a clock advancing by `step` per tick.
    #[must_use]
    pub const fn new(step: Duration) -> Self {
        Self { step }
    }
}

impl Clock for FixedClock {
    fn delta(&mut self) -> Duration {
        self.step
    }
}

/// Steps `simulation` until it stops or `max_ticks` ticks have run, presenting
/// every tick.
///
/// Returns the number of ticks the world advanced.
pub fn run<I, C, R, P>(
    simulation: &mut Simulation,
    input: &mut I,
    clock: &mut C,
    renderer: &mut R,
    assets: &AssetCache<P>,
    max_ticks: Option<u64>,
) -> Result<u64>
where
    I: InputProvider,
    C: Clock,
    R: Renderer,
    P: AssetProvider,
{
    let first_tick = query::tick_index(simulation.world());
    let ticks = |simulation: &Simulation| query::tick_index(simulation.world()) - first_tick;

    while simulation.is_running() && max_ticks.map_or(true, |limit| ticks(simulation) < limit) {
        input.poll();
        let frame = input.sample();
        let dt = clock.delta();
        simulation.step(&frame, dt);
        renderer.present(&simulation.scene(assets))?;
    }

    let elapsed = ticks(simulation);
    info!("run finished after {elapsed} ticks");
    Ok(elapsed)
}
