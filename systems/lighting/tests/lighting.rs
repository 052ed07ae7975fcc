use dungeon_crawler_core::{Command, TorchId, TorchSnapshot};
use dungeon_crawler_system_lighting::{Lighting, FLICKER_RANGE};
use dungeon_crawler_world::{TileGrid, REFERENCE_LEVEL};
use glam::Vec2;

fn reference_grid() -> TileGrid {
    let mut grid = TileGrid::new();
    grid.load_from_source(REFERENCE_LEVEL).expect("reference level parses");
    grid
}

fn torch(id: u32, position: Vec2, brightness: f32) -> TorchSnapshot {
    TorchSnapshot {
        id: TorchId::new(id),
        position,
        brightness,
        frame: 0,
    }
}

#[test]
fn cells_near_player_are_lit_and_far_cells_dark() {
    let grid = reference_grid();
    let mut lighting = Lighting::new(7);
    let player = Vec2::new(475.0, 475.0);

    lighting.recompute(&grid, player, &[]);
    let field = lighting.field().expect("field computed");

    assert_eq!(field.alpha_at(player), Some(0));
    assert_eq!(field.alpha_at(Vec2::new(10.0, 10.0)), Some(255));
    assert_eq!(field.alpha_at(Vec2::new(-1.0, 10.0)), None);
}

#[test]
fn torch_lights_distant_cells() {
    let grid = reference_grid();
    let mut lighting = Lighting::new(7);
    let torch_position = Vec2::new(87.5, 87.5);

    lighting.recompute(
        &grid,
        Vec2::new(900.0, 900.0),
        &[torch(0, torch_position, 1.0)],
    );
    let field = lighting.field().expect("field computed");

    assert_eq!(field.alpha(3, 3), Some(0));
    let next_to_torch = field.alpha(4, 3).expect("cell in range");
    assert!(next_to_torch < 255);
    assert_eq!(field.alpha(12, 3), Some(255));
}

#[test]
fn strong_flicker_clamps_to_zero() {
    let grid = reference_grid();
    let mut lighting = Lighting::new(7);
    let position = Vec2::new(87.5, 87.5);

    lighting.recompute(&grid, Vec2::new(900.0, 900.0), &[torch(0, position, 1.2)]);
    let field = lighting.field().expect("field computed");

    assert_eq!(field.alpha(3, 3), Some(0));
    assert_eq!(field.alpha(37, 0), Some(255));
}

#[test]
fn flicker_is_seeded_and_bounded() {
    let torches = [
        torch(0, Vec2::ZERO, 1.0),
        torch(1, Vec2::ZERO, 1.0),
        torch(2, Vec2::ZERO, 1.0),
    ];
    let roll = |seed| {
        let mut lighting = Lighting::new(seed);
        let mut commands = Vec::new();
        for _ in 0..20 {
            lighting.flicker(&torches, &mut commands);
        }
        commands
    };

    let first = roll(11);
    let second = roll(11);
    assert_eq!(first, second);
    assert_eq!(first.len(), 60);

    for command in first {
        let Command::SetTorchBrightness { brightness, .. } = command else {
            panic!("unexpected command {command:?}");
        };
        assert!(FLICKER_RANGE.contains(&brightness));
    }
}
