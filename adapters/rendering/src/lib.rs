#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for dungeon crawler adapters.

use anyhow::Result as AnyResult;
use dungeon_crawler_assets::AssetHandle;
use dungeon_crawler_core::{AnimationState, TileKind};
use glam::Vec2;

/// Single tile of the level ready to be drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TilePresentation {
    /// Zero-based column of the tile.
    pub column: u32,
    /// Zero-based row of the tile.
    pub row: u32,
    /// Kind of the tile.
    pub kind: TileKind,
    /// Texture drawn for the tile; invalid handles are skipped.
    pub texture: AssetHandle,
}

/// Describes the tile layout that can be rendered by adapters.
#[derive(Clone, Debug, PartialEq)]
pub struct TileGridPresentation {
    /// World-space position of the top-left corner.
    pub origin: Vec2,
    /// Number of columns contained in the grid.
    pub columns: u32,
    /// Number of rows contained in the grid.
    pub rows: u32,
    /// Side length of a single tile expressed in world units.
    pub tile_length: f32,
    /// Tiles in row-major order.
    pub tiles: Vec<TilePresentation>,
}

impl TileGridPresentation {
    /// Calculates the total width of the grid.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.columns as f32 * self.tile_length
    }

    /// Calculates the total height of the grid.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.tile_length
    }

    /// Retrieves the tile at the provided column and row.
    #[must_use]
    pub fn tile(&self, column: u32, row: u32) -> Option<&TilePresentation> {
        if column >= self.columns || row >= self.rows {
            return None;
        }
        self.tiles.get((row * self.columns + column) as usize)
    }
}

/// Darkness drawn over the level, one alpha per light cell.
#[derive(Clone, Debug, PartialEq)]
pub struct LightOverlay {
    /// World-space position of the top-left corner.
    pub origin: Vec2,
    /// Side length of a light cell in world units.
    pub cell_length: f32,
    /// Number of light cells per row.
    pub columns: u32,
    /// Number of light cell rows.
    pub rows: u32,
    /// Alpha values in row-major order; 0 is fully lit.
    pub alphas: Vec<u8>,
}

impl LightOverlay {
    /// Alpha of a single light cell.
    #[must_use]
    pub fn alpha(&self, column: u32, row: u32) -> Option<u8> {
        if column >= self.columns || row >= self.rows {
            return None;
        }
        self.alphas.get((row * self.columns + column) as usize).copied()
    }
}

/// Draw layers, listed bottom to top.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SpriteLayer {
    /// Loot lying on the floor.
    Item,
    /// Wall torches.
    Torch,
    /// Enemies.
    Enemy,
    /// The player character.
    Player,
    /// Projectiles in flight.
    Projectile,
}

/// Animated or static sprite positioned in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpritePresentation {
    /// Layer the sprite is drawn on.
    pub layer: SpriteLayer,
    /// World-space centre of the sprite.
    pub position: Vec2,
    /// Texture strip the frame is cut from.
    pub texture: AssetHandle,
    /// Orientation of characters; `None` for sprites without facing.
    pub animation: Option<AnimationState>,
    /// Zero-based frame within the texture strip.
    pub frame: u32,
    /// Rotation in degrees around the sprite centre.
    pub rotation: f32,
}

impl SpritePresentation {
    /// Creates an unrotated sprite showing the first frame.
    #[must_use]
    pub const fn new(layer: SpriteLayer, position: Vec2, texture: AssetHandle) -> Self {
        Self {
            layer,
            position,
            texture,
            animation: None,
            frame: 0,
            rotation: 0.0,
        }
    }

    /// Overrides the animation state shown by the sprite.
    #[must_use]
    pub fn with_animation(mut self, animation: AnimationState) -> Self {
        self.animation = Some(animation);
        self
    }

    /// Overrides the frame shown by the sprite.
    #[must_use]
    pub fn with_frame(mut self, frame: u32) -> Self {
        self.frame = frame;
        self
    }

    /// Overrides the rotation applied to the sprite.
    #[must_use]
    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }
}

/// Numbers the heads-up display shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Hud {
    /// Current player health.
    pub health: u32,
    /// Maximum player health.
    pub max_health: u32,
    /// Current player mana.
    pub mana: u32,
    /// Maximum player mana.
    pub max_mana: u32,
    /// Gold collected.
    pub gold: u32,
    /// Score accumulated.
    pub score: u32,
    /// Whether the key was collected.
    pub key_collected: bool,
}

/// Scene description combining the level, its inhabitants and the light overlay.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Tile grid that composes the level.
    pub tile_grid: TileGridPresentation,
    /// Darkness drawn above every sprite, if lighting ran.
    pub light: Option<LightOverlay>,
    /// Sprites sorted by layer.
    pub sprites: Vec<SpritePresentation>,
    /// Heads-up display values.
    pub hud: Hud,
}

impl Scene {
    /// Creates a new scene descriptor, ordering sprites bottom to top.
    #[must_use]
    pub fn new(
        tile_grid: TileGridPresentation,
        light: Option<LightOverlay>,
        mut sprites: Vec<SpritePresentation>,
        hud: Hud,
    ) -> Self {
        sprites.sort_by_key(|sprite| sprite.layer);
        Self {
            tile_grid,
            light,
            sprites,
            hud,
        }
    }

    /// Sprites whose texture is loaded, in draw order.
    pub fn drawable_sprites(&self) -> impl Iterator<Item = &SpritePresentation> {
        self.sprites
            .iter()
            .filter(|sprite| sprite.texture.is_valid())
    }
}

/// Rendering backend capable of presenting dungeon scenes.
pub trait Renderer {
    /// Draws a single frame.
    fn present(&mut self, scene: &Scene) -> AnyResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_grid() -> TileGridPresentation {
        TileGridPresentation {
            origin: Vec2::ZERO,
            columns: 2,
            rows: 1,
            tile_length: 50.0,
            tiles: vec![
                TilePresentation {
                    column: 0,
                    row: 0,
                    kind: TileKind::Floor,
                    texture: AssetHandle::INVALID,
                },
                TilePresentation {
                    column: 1,
                    row: 0,
                    kind: TileKind::WallSide,
                    texture: AssetHandle::INVALID,
                },
            ],
        }
    }

    #[test]
    fn sprites_are_sorted_by_layer() {
        let missing = AssetHandle::INVALID;
        let scene = Scene::new(
            empty_grid(),
            None,
            vec![
                SpritePresentation::new(SpriteLayer::Projectile, Vec2::ZERO, missing),
                SpritePresentation::new(SpriteLayer::Item, Vec2::ZERO, missing),
                SpritePresentation::new(SpriteLayer::Player, Vec2::ZERO, missing),
            ],
            Hud::default(),
        );

        let layers: Vec<SpriteLayer> = scene.sprites.iter().map(|sprite| sprite.layer).collect();
        assert_eq!(
            layers,
            vec![SpriteLayer::Item, SpriteLayer::Player, SpriteLayer::Projectile]
        );
        assert_eq!(scene.drawable_sprites().count(), 0);
    }

    #[test]
    fn grid_lookup_respects_bounds() {
        let grid = empty_grid();
        assert_eq!(grid.width(), 100.0);
        assert_eq!(grid.tile(1, 0).map(|tile| tile.kind), Some(TileKind::WallSide));
        assert!(grid.tile(2, 0).is_none());
    }
}
