//! Text renderer drawing the level as a character grid.

use std::io::Write;

use anyhow::{Context, Result};
use dungeon_crawler_core::TileKind;
use dungeon_crawler_rendering::{Renderer, Scene, SpriteLayer};

/// Renderer printing every `interval`-th scene to a writer.
#[derive(Debug)]
pub(crate) struct AsciiRenderer<W> {
    out: W,
    interval: u64,
    frames: u64,
}

impl<W: Write> AsciiRenderer<W> {
    /// Creates a renderer; an interval of zero never prints.
    pub(crate) fn new(out: W, interval: u64) -> Self {
        Self {
            out,
            interval,
            frames: 0,
        }
    }

    pub(crate) fn frames(&self) -> u64 {
        self.frames
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

fn tile_glyph(kind: TileKind) -> char {
    match kind {
        TileKind::Floor | TileKind::FloorAlt => '.',
        TileKind::WallDoorLocked => '+',
        TileKind::WallDoorUnlocked => '/',
        TileKind::Empty => ' ',
        _ => '#',
    }
}

fn sprite_glyph(layer: SpriteLayer) -> char {
    match layer {
        SpriteLayer::Item => '$',
        SpriteLayer::Torch => 't',
        SpriteLayer::Enemy => 'e',
        SpriteLayer::Player => '@',
        SpriteLayer::Projectile => '*',
    }
}

/// Draws the scene as rows of characters, sprites over tiles.
pub(crate) fn draw(scene: &Scene) -> Vec<String> {
    let grid = &scene.tile_grid;
    let mut rows: Vec<Vec<char>> = (0..grid.rows)
        .map(|row| {
            (0..grid.columns)
                .map(|column| grid.tile(column, row).map_or(' ', |tile| tile_glyph(tile.kind)))
                .collect()
        })
        .collect();

    for sprite in &scene.sprites {
        let local = (sprite.position - grid.origin) / grid.tile_length;
        if local.x < 0.0 || local.y < 0.0 {
            continue;
        }
        let (column, row) = (local.x as usize, local.y as usize);
        if let Some(cell) = rows.get_mut(row).and_then(|cells| cells.get_mut(column)) {
            *cell = sprite_glyph(sprite.layer);
        }
    }

    rows.into_iter().map(String::from_iter).collect()
}

impl<W: Write> Renderer for AsciiRenderer<W> {
    fn present(&mut self, scene: &Scene) -> Result<()> {
        self.frames += 1;
        if self.interval == 0 || self.frames % self.interval != 0 {
            return Ok(());
        }

        let hud = scene.hud;
        writeln!(
            self.out,
            "frame {} | hp {}/{} | mana {}/{} | gold {} | score {} | key {}",
            self.frames,
            hud.health,
            hud.max_health,
            hud.mana,
            hud.max_mana,
            hud.gold,
            hud.score,
            if hud.key_collected { "yes" } else { "no" },
        )
        .context("failed to write frame header")?;
        for line in draw(scene) {
            writeln!(self.out, "{line}").context("failed to write frame")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dungeon_crawler_assets::AssetHandle;
    use dungeon_crawler_rendering::{
        Hud, SpritePresentation, TileGridPresentation, TilePresentation,
    };
    use glam::Vec2;

    fn scene() -> Scene {
        let kinds = [TileKind::WallSide, TileKind::Floor, TileKind::WallDoorLocked];
        let tiles = kinds
            .into_iter()
            .zip(0..)
            .map(|(kind, column)| TilePresentation {
                column,
                row: 0,
                kind,
                texture: AssetHandle::INVALID,
            })
            .collect();
        Scene::new(
            TileGridPresentation {
                origin: Vec2::new(100.0, 0.0),
                columns: 3,
                rows: 1,
                tile_length: 50.0,
                tiles,
            },
            None,
            vec![SpritePresentation::new(
                SpriteLayer::Player,
                Vec2::new(175.0, 25.0),
                AssetHandle::INVALID,
            )],
            Hud::default(),
        )
    }

    #[test]
    fn sprites_are_drawn_over_tiles() {
        assert_eq!(draw(&scene()), vec!["#@+".to_owned()]);
    }

    #[test]
    fn only_every_interval_frame_is_printed() {
        let mut renderer = AsciiRenderer::new(Vec::new(), 2);
        let scene = scene();

        renderer.present(&scene).expect("write succeeds");
        renderer.present(&scene).expect("write succeeds");
        renderer.present(&scene).expect("write succeeds");

        assert_eq!(renderer.frames(), 3);
        let text = String::from_utf8(renderer.into_inner()).expect("utf-8 output");
        assert_eq!(text.lines().count(), 2);
        assert!(text.starts_with("frame 2 |"));
    }
}
