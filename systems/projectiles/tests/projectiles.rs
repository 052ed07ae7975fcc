use std::time::Duration;

use dungeon_crawler_core::{Command, ProjectileId, ProjectileSnapshot};
use dungeon_crawler_system_projectiles::Projectiles;
use dungeon_crawler_world::{TileGrid, REFERENCE_LEVEL};
use glam::Vec2;

fn reference_grid() -> TileGrid {
    let mut grid = TileGrid::new();
    grid.load_from_source(REFERENCE_LEVEL).expect("reference level parses");
    grid
}

fn projectile(position: Vec2, direction: Vec2) -> ProjectileSnapshot {
    ProjectileSnapshot {
        id: ProjectileId::new(0),
        position,
        direction,
        rotation: 350.0,
    }
}

#[test]
fn projectile_advances_and_spins() {
    let grid = reference_grid();
    let mut commands = Vec::new();

    Projectiles.handle(
        &grid,
        &[projectile(Vec2::new(300.0, 300.0), Vec2::new(1.0, 0.0))],
        Duration::from_millis(100),
        &mut commands,
    );

    let [Command::MoveProjectile {
        position, rotation, ..
    }] = commands.as_slice()
    else {
        panic!("expected a single move, got {commands:?}");
    };
    assert!((position.x - 350.0).abs() < 1e-3);
    assert!((position.y - 300.0).abs() < 1e-3);
    assert!((rotation - 30.0).abs() < 1e-3);
}

#[test]
fn projectile_leaving_the_floor_is_removed() {
    let grid = reference_grid();
    let mut commands = Vec::new();

    Projectiles.handle(
        &grid,
        &[projectile(Vec2::new(60.0, 300.0), Vec2::new(-1.0, 0.0))],
        Duration::from_millis(100),
        &mut commands,
    );

    assert_eq!(
        commands,
        vec![Command::RemoveProjectile {
            projectile: ProjectileId::new(0)
        }]
    );
}

#[test]
fn unlocked_door_is_not_floor_for_projectiles() {
    let mut grid = reference_grid();
    assert!(grid.unlock_door().is_some());
    let mut commands = Vec::new();

    Projectiles.handle(
        &grid,
        &[projectile(Vec2::new(475.0, 60.0), Vec2::new(0.0, -1.0))],
        Duration::from_millis(50),
        &mut commands,
    );

    assert!(matches!(
        commands.as_slice(),
        [Command::RemoveProjectile { .. }]
    ));
}
