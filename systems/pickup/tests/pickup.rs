use dungeon_crawler_core::{Command, Event, ItemKind, Stats};
use dungeon_crawler_system_pickup::Pickup;
use dungeon_crawler_world::{self as world, query, World, REFERENCE_LEVEL};
use glam::Vec2;

fn level_with_player(position: Vec2) -> World {
    let mut world = World::new();
    let mut events = Vec::new();
    world::load_level(&mut world, REFERENCE_LEVEL, &mut events).expect("reference level parses");
    world::apply(
        &mut world,
        Command::SpawnPlayer {
            position,
            stats: Stats {
                health: 80,
                max_health: 100,
                ..Stats::default()
            },
        },
        &mut events,
    );
    world
}

fn drop_item(world: &mut World, kind: ItemKind, position: Vec2) {
    let mut events = Vec::new();
    world::apply(world, Command::SpawnItem { kind, position }, &mut events);
}

fn collect(world: &mut World) -> Vec<Event> {
    let mut commands = Vec::new();
    Pickup.handle(
        query::player(world).as_ref(),
        &query::items(world),
        &mut commands,
    );
    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

#[test]
fn nearby_items_apply_their_effects() {
    let player = Vec2::new(475.0, 475.0);
    let mut world = level_with_player(player);
    drop_item(&mut world, ItemKind::GOLD, player + Vec2::new(20.0, 0.0));
    drop_item(&mut world, ItemKind::GEM, player + Vec2::new(0.0, -30.0));
    drop_item(&mut world, ItemKind::HEART, player + Vec2::new(10.0, 10.0));
    drop_item(&mut world, ItemKind::Potion, player + Vec2::new(-5.0, 0.0));
    drop_item(&mut world, ItemKind::GOLD, player + Vec2::new(150.0, 0.0));

    let events = collect(&mut world);

    let collected = events
        .iter()
        .filter(|event| matches!(event, Event::ItemCollected { .. }))
        .count();
    assert_eq!(collected, 4);
    assert_eq!(query::items(&world).len(), 1);

    let progress = query::progress(&world);
    assert_eq!(progress.gold, 15);
    assert_eq!(progress.score, 50);
    assert!(!progress.key_collected);
    assert_eq!(query::player(&world).expect("player").stats.health, 95);
}

#[test]
fn key_opens_the_door() {
    let player = Vec2::new(475.0, 475.0);
    let mut world = level_with_player(player);
    drop_item(&mut world, ItemKind::Key, player + Vec2::new(0.0, 39.0));

    let events = collect(&mut world);

    assert!(events.contains(&Event::KeyCollected));
    assert!(query::progress(&world).key_collected);
    let grid = query::grid(&world);
    let door = grid.door().expect("reference level has a door");
    assert!(!grid.is_solid(door.column() as i32, door.row() as i32));
}

#[test]
fn items_at_the_radius_stay_put() {
    let player = Vec2::new(475.0, 475.0);
    let mut world = level_with_player(player);
    drop_item(&mut world, ItemKind::GEM, player + Vec2::new(-40.0, 0.0));

    let events = collect(&mut world);

    assert!(events.is_empty());
    assert_eq!(query::items(&world).len(), 1);
}
