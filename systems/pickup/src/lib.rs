#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Collects items the player walks over.

use dungeon_crawler_core::{Command, ItemSnapshot, PlayerSnapshot};

/// Items closer than this to the player's centre are picked up.
pub const PICKUP_RADIUS: f32 = 40.0;

/// Pure system emitting a collection command for every item within reach.
#[derive(Debug, Default)]
pub struct Pickup;

impl Pickup {
    /// Scans the items lying in the level against the player's position.
    pub fn handle(
        &mut self,
        player: Option<&PlayerSnapshot>,
        items: &[ItemSnapshot],
        out: &mut Vec<Command>,
    ) {
        let Some(player) = player else {
            return;
        };

        out.extend(
            items
                .iter()
                .filter(|item| item.position.distance(player.position) < PICKUP_RADIUS)
                .map(|item| Command::CollectItem { item: item.id }),
        );
    }
}
