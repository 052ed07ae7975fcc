#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Dynamic lighting: per-cell darkness derived from the player and torches.
//!
//! The level is covered by square light cells half the size of a tile. Each cell
//! stores the alpha of the darkness overlay drawn on top of it, where 0 is fully
//! lit and 255 is pitch black.

use std::ops::RangeInclusive;

use dungeon_crawler_core::{Command, TorchSnapshot};
use dungeon_crawler_world::TileGrid;
use glam::Vec2;
use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Side length of a light cell in world units.
pub const LIGHT_CELL_SIZE: f32 = 25.0;

/// Distance from the player inside which cells are fully lit.
pub const LIT_RADIUS: f32 = 200.0;

/// Distance from the player beyond which cells are fully dark.
pub const DARK_RADIUS: f32 = 250.0;

/// Distance from a torch inside which it brightens cells.
pub const TORCH_RADIUS: f32 = 100.0;

/// Range of the per-tick torch brightness multiplier.
pub const FLICKER_RANGE: RangeInclusive<f32> = 0.8..=1.2;

/// Darkness contributed by the player's distance alone.
#[must_use]
pub fn base_alpha(distance: f32) -> f32 {
    if distance < LIT_RADIUS {
        0.0
    } else if distance < DARK_RADIUS {
        51.0 * (distance - LIT_RADIUS) / 10.0
    } else {
        255.0
    }
}

/// Darkness left after a torch at `distance` with `brightness` lit the cell.
///
/// The result is not clamped; strong flicker may push it below zero.
#[must_use]
pub fn apply_torch(alpha: f32, distance: f32, brightness: f32) -> f32 {
    if distance >= TORCH_RADIUS {
        return alpha;
    }
    alpha - (alpha - alpha * distance / TORCH_RADIUS) * brightness
}

/// Darkness overlay covering the level.
#[derive(Clone, Debug, PartialEq)]
pub struct LightField {
    origin: Vec2,
    columns: u32,
    rows: u32,
    alphas: Vec<u8>,
}

impl LightField {
    /// Creates a fully dark field covering the bounds of `grid`.
    #[must_use]
    pub fn covering(grid: &TileGrid) -> Self {
        let (origin, size) = grid.bounds();
        let columns = (size.x / LIGHT_CELL_SIZE).ceil() as u32;
        let rows = (size.y / LIGHT_CELL_SIZE).ceil() as u32;
        Self {
            origin,
            columns,
            rows,
            alphas: vec![u8::MAX; (columns * rows) as usize],
        }
    }

    /// Number of light cells per row.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of light cell rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// World-space position of the field's top-left corner.
    #[must_use]
    pub const fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Darkness of a single cell.
    #[must_use]
    pub fn alpha(&self, column: u32, row: u32) -> Option<u8> {
        if column >= self.columns || row >= self.rows {
            return None;
        }
        self.alphas.get((row * self.columns + column) as usize).copied()
    }

    /// Darkness of the cell under a world-space position.
    #[must_use]
    pub fn alpha_at(&self, position: Vec2) -> Option<u8> {
        let local = (position - self.origin) / LIGHT_CELL_SIZE;
        if local.x < 0.0 || local.y < 0.0 {
            return None;
        }
        self.alpha(local.x as u32, local.y as u32)
    }

    /// Darkness values in row-major order.
    #[must_use]
    pub fn alphas(&self) -> &[u8] {
        &self.alphas
    }

    /// World-space centre of a cell, used as its sample point.
    #[must_use]
    pub fn cell_center(&self, column: u32, row: u32) -> Vec2 {
        self.origin
            + Vec2::new(
                (column as f32 + 0.5) * LIGHT_CELL_SIZE,
                (row as f32 + 0.5) * LIGHT_CELL_SIZE,
            )
    }

    /// Recomputes every cell from the player position and the torches.
    pub fn recompute(&mut self, player: Vec2, torches: &[TorchSnapshot]) {
        for row in 0..self.rows {
            for column in 0..self.columns {
                let sample = self.cell_center(column, row);
                let mut alpha = base_alpha(sample.distance(player));
                for torch in torches {
                    alpha = apply_torch(alpha, sample.distance(torch.position), torch.brightness);
                }
                self.alphas[(row * self.columns + column) as usize] =
                    alpha.clamp(0.0, 255.0) as u8;
            }
        }
    }
}

/// Lighting system owning the torch flicker generator and the light field.
#[derive(Debug)]
pub struct Lighting {
    rng: ChaCha8Rng,
    field: Option<LightField>,
}

impl Lighting {
    /// Creates a lighting system whose flicker is driven by `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            field: None,
        }
    }

    /// Rolls a fresh brightness for every torch.
    pub fn flicker(&mut self, torches: &[TorchSnapshot], out: &mut Vec<Command>) {
        for torch in torches {
            let brightness = self.rng.gen_range(FLICKER_RANGE);
            out.push(Command::SetTorchBrightness {
                torch: torch.id,
                brightness,
            });
        }
    }

    /// Rebuilds the light field for the current frame.
    pub fn recompute(&mut self, grid: &TileGrid, player: Vec2, torches: &[TorchSnapshot]) {
        let (origin, _) = grid.bounds();
        let stale = self
            .field
            .as_ref()
            .map_or(true, |field| field.origin != origin);
        if stale {
            debug!("light field rebuilt at {origin}");
            self.field = Some(LightField::covering(grid));
        }
        if let Some(field) = self.field.as_mut() {
            field.recompute(player, torches);
        }
    }

    /// Light field computed by the last call to [`Lighting::recompute`].
    #[must_use]
    pub fn field(&self) -> Option<&LightField> {
        self.field.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_alpha_ramps_between_radii() {
        assert_eq!(base_alpha(0.0), 0.0);
        assert_eq!(base_alpha(199.9), 0.0);
        assert_eq!(base_alpha(200.0), 0.0);
        assert_eq!(base_alpha(210.0), 51.0);
        assert_eq!(base_alpha(250.0), 255.0);
        assert_eq!(base_alpha(1_000.0), 255.0);

        let mut previous = base_alpha(200.0);
        let mut distance = 200.0;
        while distance < 250.0 {
            let alpha = base_alpha(distance);
            assert!(alpha >= previous);
            assert!(alpha <= 255.0);
            previous = alpha;
            distance += 0.5;
        }
    }

    #[test]
    fn torch_brightens_nearby_cells_only() {
        assert_eq!(apply_torch(255.0, 100.0, 1.0), 255.0);
        assert_eq!(apply_torch(255.0, 0.0, 1.0), 0.0);
        assert_eq!(apply_torch(200.0, 50.0, 1.0), 100.0);
        assert!(apply_torch(255.0, 0.0, 1.2) < 0.0);
    }

    #[test]
    fn reference_bounds_yield_thirty_eight_cells_per_axis() {
        let grid = TileGrid::new();
        let field = LightField::covering(&grid);
        assert_eq!((field.columns(), field.rows()), (38, 38));
        assert_eq!(field.alphas().len(), 38 * 38);
    }
}
