//! Translation of the world into a renderer-facing [`Scene`].

use dungeon_crawler_assets::{AssetCache, AssetHandle, AssetProvider};
use dungeon_crawler_core::{PLAYER_ANIMATIONS, PROJECTILE_ASSET, TILE_SIZE, TORCH_ASSET};
use dungeon_crawler_rendering::{
    Hud, LightOverlay, Scene, SpriteLayer, SpritePresentation, TileGridPresentation,
    TilePresentation,
};
use dungeon_crawler_system_lighting::{LightField, LIGHT_CELL_SIZE};
use dungeon_crawler_world::{query, World};

pub(crate) fn build<P: AssetProvider>(
    world: &World,
    light: Option<&LightField>,
    assets: &AssetCache<P>,
) -> Scene {
    let grid = query::grid(world);
    let (origin, _) = grid.bounds();
    let tiles = grid
        .iter()
        .filter_map(|tile| {
            let coord = tile.coord()?;
            Some(TilePresentation {
                column: coord.column(),
                row: coord.row(),
                kind: tile.kind,
                texture: tile
                    .kind
                    .asset_path()
                    .map_or(AssetHandle::INVALID, |path| assets.handle(path)),
            })
        })
        .collect();
    let tile_grid = TileGridPresentation {
        origin,
        columns: grid.columns(),
        rows: grid.rows(),
        tile_length: TILE_SIZE,
        tiles,
    };

    let mut sprites = Vec::new();
    for item in query::items(world) {
        sprites.push(
            SpritePresentation::new(
                SpriteLayer::Item,
                item.position,
                assets.handle(item.kind.asset_path()),
            )
            .with_frame(item.frame),
        );
    }
    for torch in query::torches(world) {
        sprites.push(
            SpritePresentation::new(SpriteLayer::Torch, torch.position, assets.handle(TORCH_ASSET))
                .with_frame(torch.frame),
        );
    }
    for enemy in query::enemies(world) {
        let texture = assets.handle(enemy.kind.animation_assets()[enemy.animation.index()]);
        sprites.push(
            SpritePresentation::new(SpriteLayer::Enemy, enemy.position, texture)
                .with_animation(enemy.animation)
                .with_frame(enemy.frame),
        );
    }
    let player = query::player(world);
    if let Some(player) = player {
        let texture = assets.handle(PLAYER_ANIMATIONS[player.animation.index()]);
        sprites.push(
            SpritePresentation::new(SpriteLayer::Player, player.position, texture)
                .with_animation(player.animation)
                .with_frame(player.frame),
        );
    }
    for projectile in query::projectiles(world) {
        sprites.push(
            SpritePresentation::new(
                SpriteLayer::Projectile,
                projectile.position,
                assets.handle(PROJECTILE_ASSET),
            )
            .with_rotation(projectile.rotation),
        );
    }

    let light = light.map(|field| LightOverlay {
        origin: field.origin(),
        cell_length: LIGHT_CELL_SIZE,
        columns: field.columns(),
        rows: field.rows(),
        alphas: field.alphas().to_vec(),
    });

    let progress = query::progress(world);
    let stats = player.map(|player| player.stats).unwrap_or_default();
    let hud = Hud {
        health: stats.health,
        max_health: stats.max_health,
        mana: stats.mana,
        max_mana: stats.max_mana,
        gold: progress.gold,
        score: progress.score,
        key_collected: progress.key_collected,
    };

    Scene::new(tile_grid, light, sprites, hud)
}
