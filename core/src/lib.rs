#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the dungeon crawler simulation.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Systems inspect immutable snapshots
//! and describe desired mutations as [`Command`] values; the world executes those
//! commands via its `apply` entry point and reports what happened as [`Event`]
//! values.

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Number of tile columns in every level.
pub const GRID_COLUMNS: u32 = 19;

/// Number of tile rows in every level.
pub const GRID_ROWS: u32 = 19;

/// Side length of a single square tile expressed in world units (pixels).
pub const TILE_SIZE: f32 = 50.0;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Moves the level grid so that its top-left corner sits at `origin`.
    ConfigureLevel {
        /// World-space position of the grid's top-left corner.
        origin: Vec2,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Overwrites the kind of a single tile.
    SetTile {
        /// Column of the tile to change.
        column: i32,
        /// Row of the tile to change.
        row: i32,
        /// Kind the tile should take.
        kind: TileKind,
    },
    /// Unlocks the level door remembered by the grid.
    UnlockDoor,
    /// Places the player into the level with a fresh set of stats.
    SpawnPlayer {
        /// World-space position of the player's centre.
        position: Vec2,
        /// Stats assigned to the player.
        stats: Stats,
    },
    /// Moves the player to a position already validated against the grid.
    MovePlayer {
        /// Resolved world-space position.
        position: Vec2,
        /// Velocity that produced the move, used to pick the animation.
        velocity: Vec2,
    },
    /// Applies contact damage to the player if the damage cooldown elapsed.
    DamagePlayer {
        /// Health points to subtract.
        amount: u32,
    },
    /// Creates an enemy of the provided kind.
    SpawnEnemy {
        /// Variant of enemy to create.
        kind: EnemyKind,
        /// World-space position of the enemy's centre.
        position: Vec2,
        /// Stats rolled for the enemy.
        stats: Stats,
    },
    /// Moves an enemy to a position already validated against the grid.
    MoveEnemy {
        /// Identifier of the enemy to move.
        enemy: EnemyId,
        /// Resolved world-space position.
        position: Vec2,
        /// Velocity that produced the move, used to pick the animation.
        velocity: Vec2,
    },
    /// Subtracts health from an enemy, clamping at zero.
    DamageEnemy {
        /// Identifier of the enemy to damage.
        enemy: EnemyId,
        /// Health points to subtract.
        amount: u32,
    },
    /// Removes an enemy from the level.
    RemoveEnemy {
        /// Identifier of the enemy to remove.
        enemy: EnemyId,
    },
    /// Drops an item into the level.
    SpawnItem {
        /// Kind of item to drop.
        kind: ItemKind,
        /// World-space position of the item.
        position: Vec2,
    },
    /// Collects an item, applying its effect and removing it from the level.
    CollectItem {
        /// Identifier of the item being collected.
        item: ItemId,
    },
    /// Launches a player projectile.
    FireProjectile {
        /// World-space position the projectile starts from.
        origin: Vec2,
        /// Unit vector describing the direction of travel.
        direction: Vec2,
    },
    /// Moves a projectile to its next position.
    MoveProjectile {
        /// Identifier of the projectile to move.
        projectile: ProjectileId,
        /// New world-space position.
        position: Vec2,
        /// New visual rotation in degrees.
        rotation: f32,
    },
    /// Removes a projectile from the level.
    RemoveProjectile {
        /// Identifier of the projectile to remove.
        projectile: ProjectileId,
    },
    /// Updates the flicker multiplier of a torch.
    SetTorchBrightness {
        /// Identifier of the torch to update.
        torch: TorchId,
        /// Brightness multiplier for the current tick.
        brightness: f32,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a level source was parsed into the grid.
    LevelLoaded {
        /// Location of the locked door, if the level contains one.
        door: Option<TileCoord>,
        /// Number of torches placed into the level.
        torches: usize,
    },
    /// Announces that a tile changed kind.
    TileChanged {
        /// Location of the changed tile.
        coord: TileCoord,
        /// Kind the tile holds after the change.
        kind: TileKind,
    },
    /// Announces that the level door became passable.
    DoorUnlocked {
        /// Location of the door tile.
        coord: TileCoord,
    },
    /// Confirms that the player entered the level.
    PlayerSpawned {
        /// Position the player occupies after spawning.
        position: Vec2,
    },
    /// Reports that the player took damage.
    PlayerDamaged {
        /// Health points removed.
        amount: u32,
        /// Health remaining after the hit.
        health: u32,
    },
    /// Reports that the player may take contact damage again.
    PlayerVulnerable,
    /// Reports that the player's health reached zero.
    PlayerDied,
    /// Confirms that an enemy was created.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Variant of the enemy.
        kind: EnemyKind,
        /// Position of the enemy after spawning.
        position: Vec2,
    },
    /// Reports that an enemy lost health.
    EnemyDamaged {
        /// Identifier of the damaged enemy.
        enemy: EnemyId,
        /// Health points removed.
        amount: u32,
        /// Health remaining after the hit.
        health: u32,
    },
    /// Confirms that an enemy left the level.
    EnemyRemoved {
        /// Identifier of the removed enemy.
        enemy: EnemyId,
        /// Variant of the removed enemy.
        kind: EnemyKind,
        /// Position the enemy occupied when it was removed.
        position: Vec2,
        /// Whether the enemy was removed because its health reached zero.
        slain: bool,
    },
    /// Confirms that an item was dropped into the level.
    ItemSpawned {
        /// Identifier assigned to the item.
        item: ItemId,
        /// Kind of the item.
        kind: ItemKind,
        /// Position of the item.
        position: Vec2,
    },
    /// Confirms that the player collected an item.
    ItemCollected {
        /// Identifier of the collected item.
        item: ItemId,
        /// Kind of the collected item.
        kind: ItemKind,
    },
    /// Signals that the key was collected, for UI consumption.
    KeyCollected,
    /// Confirms that a projectile was launched.
    ProjectileFired {
        /// Identifier assigned to the projectile.
        projectile: ProjectileId,
        /// Starting position of the projectile.
        position: Vec2,
    },
    /// Confirms that a projectile left the level.
    ProjectileRemoved {
        /// Identifier of the removed projectile.
        projectile: ProjectileId,
    },
}

/// Closed set of tile kinds. The discriminant is the level-file code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum TileKind {
    /// Free-standing wall block.
    WallSingle = 0,
    /// Horizontal wall segment.
    WallTop = 1,
    /// Horizontal wall with a junction below.
    WallTopT = 2,
    /// Top-right wall corner.
    WallTopRight = 3,
    /// Top-left wall corner.
    WallTopLeft = 4,
    /// End cap of a horizontal wall.
    WallTopEnd = 5,
    /// Vertical wall segment.
    WallSide = 6,
    /// Vertical wall ending on the right.
    WallSideRightEnd = 7,
    /// Vertical wall ending on the left.
    WallSideLeftEnd = 8,
    /// Vertical wall with a junction to the right.
    WallSideRightT = 9,
    /// Vertical wall with a junction to the left.
    WallSideLeftT = 10,
    /// Bottom-right wall corner.
    WallBottomRight = 11,
    /// Bottom-left wall corner.
    WallBottomLeft = 12,
    /// End cap of a wall seen from below.
    WallBottomEnd = 13,
    /// Horizontal wall with a junction above.
    WallBottomT = 14,
    /// Four-way wall junction.
    WallIntersection = 15,
    /// Exit door that blocks movement until unlocked.
    WallDoorLocked = 16,
    /// Exit door after the key was collected.
    WallDoorUnlocked = 17,
    /// Decorative entrance in the wall.
    WallEntrance = 18,
    /// Walkable floor.
    Floor = 19,
    /// Walkable floor with an alternative texture.
    FloorAlt = 20,
    /// Void outside the playable area.
    Empty = 21,
}

impl TileKind {
    /// Every tile kind ordered by level-file code.
    pub const ALL: [TileKind; 22] = [
        TileKind::WallSingle,
        TileKind::WallTop,
        TileKind::WallTopT,
        TileKind::WallTopRight,
        TileKind::WallTopLeft,
        TileKind::WallTopEnd,
        TileKind::WallSide,
        TileKind::WallSideRightEnd,
        TileKind::WallSideLeftEnd,
        TileKind::WallSideRightT,
        TileKind::WallSideLeftT,
        TileKind::WallBottomRight,
        TileKind::WallBottomLeft,
        TileKind::WallBottomEnd,
        TileKind::WallBottomT,
        TileKind::WallIntersection,
        TileKind::WallDoorLocked,
        TileKind::WallDoorUnlocked,
        TileKind::WallEntrance,
        TileKind::Floor,
        TileKind::FloorAlt,
        TileKind::Empty,
    ];

    /// Resolves a level-file code into a tile kind.
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(usize::from(code)).copied()
    }

    /// Level-file code of the tile kind.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Reports whether the tile blocks movement.
    ///
    /// Everything except the two floor variants and an unlocked door is solid,
    /// including `Empty`.
    #[must_use]
    pub const fn is_solid(self) -> bool {
        !matches!(
            self,
            TileKind::Floor | TileKind::FloorAlt | TileKind::WallDoorUnlocked
        )
    }

    /// Reports whether the tile is open floor. Projectiles only travel over floor.
    #[must_use]
    pub const fn is_floor(self) -> bool {
        matches!(self, TileKind::Floor | TileKind::FloorAlt)
    }

    /// Logical texture path used to draw the tile, if it has one.
    #[must_use]
    pub const fn asset_path(self) -> Option<&'static str> {
        let path = match self {
            TileKind::WallSingle => "Resources/Textures/tiles/spr_tile_wall_single.png",
            TileKind::WallTop => "Resources/Textures/tiles/spr_tile_wall_top.png",
            TileKind::WallTopT => "Resources/Textures/tiles/spr_tile_wall_top_t.png",
            TileKind::WallTopRight => "Resources/Textures/tiles/spr_tile_wall_top_right.png",
            TileKind::WallTopLeft => "Resources/Textures/tiles/spr_tile_wall_top_left.png",
            TileKind::WallTopEnd => "Resources/Textures/tiles/spr_tile_wall_top_end.png",
            TileKind::WallSide => "Resources/Textures/tiles/spr_tile_wall_side.png",
            TileKind::WallSideRightEnd => {
                "Resources/Textures/tiles/spr_tile_wall_side_right_end.png"
            }
            TileKind::WallSideLeftEnd => "Resources/Textures/tiles/spr_tile_wall_side_left_end.png",
            TileKind::WallSideRightT => "Resources/Textures/tiles/spr_tile_wall_side_right_t.png",
            TileKind::WallSideLeftT => "Resources/Textures/tiles/spr_tile_wall_side_left_t.png",
            TileKind::WallBottomRight => "Resources/Textures/tiles/spr_tile_wall_bottom_right.png",
            TileKind::WallBottomLeft => "Resources/Textures/tiles/spr_tile_wall_bottom_left.png",
            TileKind::WallBottomEnd => "Resources/Textures/tiles/spr_tile_wall_bottom_end.png",
            TileKind::WallBottomT => "Resources/Textures/tiles/spr_tile_wall_bottom_t.png",
            TileKind::WallIntersection => {
                "Resources/Textures/tiles/spr_tile_wall_intersection.png"
            }
            TileKind::WallDoorLocked => "Resources/Textures/tiles/spr_tile_door_locked.png",
            TileKind::WallDoorUnlocked => "Resources/Textures/tiles/spr_tile_door_unlocked.png",
            TileKind::WallEntrance => "Resources/Textures/tiles/spr_tile_wall_entrance.png",
            TileKind::Floor => "Resources/Textures/tiles/spr_tile_floor.png",
            TileKind::FloorAlt => "Resources/Textures/tiles/spr_tile_floor_alt.png",
            TileKind::Empty => return None,
        };
        Some(path)
    }
}

/// Location of a single tile expressed as column and row indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    column: u32,
    row: u32,
}

impl TileCoord {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the tile.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the tile.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an item lying in the level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(u32);

impl ItemId {
    /// Creates a new item identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a torch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TorchId(u32);

impl TorchId {
    /// Creates a new torch identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Attributes shared by the player and enemies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    /// Current health; never drops below zero.
    pub health: u32,
    /// Upper bound for healing.
    pub max_health: u32,
    /// Current mana.
    pub mana: u32,
    /// Upper bound for mana.
    pub max_mana: u32,
    /// Attack rating.
    pub attack: u32,
    /// Defense rating.
    pub defense: u32,
    /// Strength rating.
    pub strength: u32,
    /// Dexterity rating.
    pub dexterity: u32,
    /// Stamina rating.
    pub stamina: u32,
    /// Movement speed in world units per second.
    pub speed: u32,
}

/// Variants of enemies inhabiting the dungeon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Slow-witted blob.
    Slime,
    /// Skeleton warrior.
    Humanoid,
}

const SLIME_ANIMATIONS: [&str; AnimationState::COUNT] = [
    "Resources/Textures/enemies/slime/spr_slime_walk_up.png",
    "Resources/Textures/enemies/slime/spr_slime_walk_down.png",
    "Resources/Textures/enemies/slime/spr_slime_walk_right.png",
    "Resources/Textures/enemies/slime/spr_slime_walk_left.png",
    "Resources/Textures/enemies/slime/spr_slime_idle_up.png",
    "Resources/Textures/enemies/slime/spr_slime_idle_down.png",
    "Resources/Textures/enemies/slime/spr_slime_idle_right.png",
    "Resources/Textures/enemies/slime/spr_slime_idle_left.png",
];

const HUMANOID_ANIMATIONS: [&str; AnimationState::COUNT] = [
    "Resources/Textures/enemies/skeleton/spr_skeleton_walk_up.png",
    "Resources/Textures/enemies/skeleton/spr_skeleton_walk_down.png",
    "Resources/Textures/enemies/skeleton/spr_skeleton_walk_right.png",
    "Resources/Textures/enemies/skeleton/spr_skeleton_walk_left.png",
    "Resources/Textures/enemies/skeleton/spr_skeleton_idle_up.png",
    "Resources/Textures/enemies/skeleton/spr_skeleton_idle_down.png",
    "Resources/Textures/enemies/skeleton/spr_skeleton_idle_right.png",
    "Resources/Textures/enemies/skeleton/spr_skeleton_idle_left.png",
];

/// Animation table for the player character, indexed by [`AnimationState::index`].
pub const PLAYER_ANIMATIONS: [&str; AnimationState::COUNT] = [
    "Resources/Textures/players/warrior/spr_warrior_walk_up.png",
    "Resources/Textures/players/warrior/spr_warrior_walk_down.png",
    "Resources/Textures/players/warrior/spr_warrior_walk_right.png",
    "Resources/Textures/players/warrior/spr_warrior_walk_left.png",
    "Resources/Textures/players/warrior/spr_warrior_idle_up.png",
    "Resources/Textures/players/warrior/spr_warrior_idle_down.png",
    "Resources/Textures/players/warrior/spr_warrior_idle_right.png",
    "Resources/Textures/players/warrior/spr_warrior_idle_left.png",
];

/// Logical texture path of the player's projectile.
pub const PROJECTILE_ASSET: &str = "Resources/Textures/projectiles/spr_sword.png";

/// Logical texture path of a torch.
pub const TORCH_ASSET: &str = "Resources/Textures/spr_torch.png";

impl EnemyKind {
    /// Every enemy variant.
    pub const ALL: [EnemyKind; 2] = [EnemyKind::Slime, EnemyKind::Humanoid];

    /// Per-state animation textures, indexed by [`AnimationState::index`].
    #[must_use]
    pub const fn animation_assets(self) -> &'static [&'static str; AnimationState::COUNT] {
        match self {
            EnemyKind::Slime => &SLIME_ANIMATIONS,
            EnemyKind::Humanoid => &HUMANOID_ANIMATIONS,
        }
    }
}

/// Pickups lying in the level together with their kind-specific value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    /// Currency.
    Gold {
        /// Gold added to the running total.
        value: u32,
    },
    /// Score gem.
    Gem {
        /// Points added to the running score.
        value: u32,
    },
    /// Healing pickup.
    Heart {
        /// Health restored to the player.
        value: u32,
    },
    /// Potion without a numeric effect.
    Potion,
    /// Key that unlocks the level door.
    Key,
}

impl ItemKind {
    /// Gold pile with its standard value.
    pub const GOLD: ItemKind = ItemKind::Gold { value: 15 };
    /// Gem with its standard value.
    pub const GEM: ItemKind = ItemKind::Gem { value: 50 };
    /// Heart with its standard value.
    pub const HEART: ItemKind = ItemKind::Heart { value: 15 };

    /// Logical texture path used to draw the item.
    #[must_use]
    pub const fn asset_path(self) -> &'static str {
        match self {
            ItemKind::Gold { .. } => "Resources/Textures/loot/gold/spr_pickup_gold_medium.png",
            ItemKind::Gem { .. } => "Resources/Textures/loot/gem/spr_pickup_gem.png",
            ItemKind::Heart { .. } => "Resources/Textures/loot/heart/spr_pickup_heart.png",
            ItemKind::Potion => "Resources/Textures/loot/potions/spr_potion_stamina.png",
            ItemKind::Key => "Resources/Textures/loot/key/spr_pickup_key.png",
        }
    }
}

/// Animation states shared by every character sprite sheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnimationState {
    /// Walking toward decreasing rows.
    WalkUp,
    /// Walking toward increasing rows.
    WalkDown,
    /// Walking toward increasing columns.
    WalkRight,
    /// Walking toward decreasing columns.
    WalkLeft,
    /// Standing still, facing up.
    IdleUp,
    /// Standing still, facing down.
    IdleDown,
    /// Standing still, facing right.
    IdleRight,
    /// Standing still, facing left.
    IdleLeft,
}

impl AnimationState {
    /// Number of animation states.
    pub const COUNT: usize = 8;

    /// Index into per-state asset tables.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Picks the state matching a velocity.
    ///
    /// The dominant axis decides the walking direction, with ties resolved
    /// vertically. A zero velocity keeps the current facing but switches to the
    /// idle variant.
    #[must_use]
    pub fn from_velocity(self, velocity: Vec2) -> Self {
        if velocity == Vec2::ZERO {
            return self.idle();
        }

        if velocity.x.abs() > velocity.y.abs() {
            if velocity.x <= 0.0 {
                AnimationState::WalkLeft
            } else {
                AnimationState::WalkRight
            }
        } else if velocity.y <= 0.0 {
            AnimationState::WalkUp
        } else {
            AnimationState::WalkDown
        }
    }

    /// Idle variant facing the same way.
    #[must_use]
    pub const fn idle(self) -> Self {
        match self {
            AnimationState::WalkUp | AnimationState::IdleUp => AnimationState::IdleUp,
            AnimationState::WalkDown | AnimationState::IdleDown => AnimationState::IdleDown,
            AnimationState::WalkRight | AnimationState::IdleRight => AnimationState::IdleRight,
            AnimationState::WalkLeft | AnimationState::IdleLeft => AnimationState::IdleLeft,
        }
    }

    /// Reports whether the state belongs to the walking cycle.
    #[must_use]
    pub const fn is_walking(self) -> bool {
        matches!(
            self,
            AnimationState::WalkUp
                | AnimationState::WalkDown
                | AnimationState::WalkRight
                | AnimationState::WalkLeft
        )
    }

    /// Unit vector pointing the way the state faces.
    #[must_use]
    pub fn facing(self) -> Vec2 {
        match self.idle() {
            AnimationState::IdleUp => Vec2::new(0.0, -1.0),
            AnimationState::IdleRight => Vec2::new(1.0, 0.0),
            AnimationState::IdleLeft => Vec2::new(-1.0, 0.0),
            _ => Vec2::new(0.0, 1.0),
        }
    }
}

/// Frame cursor for a horizontally laid-out sprite strip.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Animation {
    frame_count: u32,
    frame_duration: Duration,
    elapsed: Duration,
    frame: u32,
}

impl Animation {
    /// Frame rate shared by every animated sprite.
    pub const FRAMES_PER_SECOND: u32 = 12;

    /// Creates an animation cycling through `frame_count` frames.
    #[must_use]
    pub fn new(frame_count: u32) -> Self {
        Self {
            frame_count: frame_count.max(1),
            frame_duration: Duration::from_secs(1) / Self::FRAMES_PER_SECOND,
            elapsed: Duration::ZERO,
            frame: 0,
        }
    }

    /// Advances the cursor when `playing`; otherwise rests on the first frame.
    pub fn advance(&mut self, dt: Duration, playing: bool) {
        if !playing || self.frame_count == 1 {
            self.elapsed = Duration::ZERO;
            self.frame = 0;
            return;
        }

        self.elapsed = self.elapsed.saturating_add(dt);
        while self.elapsed >= self.frame_duration {
            self.elapsed -= self.frame_duration;
            self.frame = (self.frame + 1) % self.frame_count;
        }
    }

    /// Zero-based index of the frame currently shown.
    #[must_use]
    pub const fn frame(&self) -> u32 {
        self.frame
    }

    /// Number of frames in the strip.
    #[must_use]
    pub const fn frame_count(&self) -> u32 {
        self.frame_count
    }
}

/// Logical actions the input collaborator reports each tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    /// Move toward decreasing columns.
    MoveLeft,
    /// Move toward increasing columns.
    MoveRight,
    /// Move toward decreasing rows.
    MoveUp,
    /// Move toward increasing rows.
    MoveDown,
    /// Fire a projectile.
    Attack,
    /// Leave the game.
    Escape,
}

impl Action {
    /// Number of logical actions.
    pub const COUNT: usize = 6;

    /// Every logical action.
    pub const ALL: [Action; Action::COUNT] = [
        Action::MoveLeft,
        Action::MoveRight,
        Action::MoveUp,
        Action::MoveDown,
        Action::Attack,
        Action::Escape,
    ];

    const fn index(self) -> usize {
        self as usize
    }
}

/// Input snapshot sampled once at the top of every tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInput {
    active: [bool; Action::COUNT],
    cursor: Option<Vec2>,
}

impl FrameInput {
    /// Returns a copy of the input with `action` marked active.
    #[must_use]
    pub fn with_action(mut self, action: Action) -> Self {
        self.active[action.index()] = true;
        self
    }

    /// Returns a copy of the input with the aim cursor set to a screen position.
    #[must_use]
    pub fn with_cursor(mut self, cursor: Vec2) -> Self {
        self.cursor = Some(cursor);
        self
    }

    /// Reports whether the action is held this tick.
    #[must_use]
    pub const fn is_active(&self, action: Action) -> bool {
        self.active[action.index()]
    }

    /// Screen position of the aim cursor, if the collaborator tracks one.
    #[must_use]
    pub const fn cursor(&self) -> Option<Vec2> {
        self.cursor
    }

    /// Unnormalised movement direction built from the four move actions.
    #[must_use]
    pub fn movement_axis(&self) -> Vec2 {
        let mut axis = Vec2::ZERO;
        if self.is_active(Action::MoveLeft) {
            axis.x -= 1.0;
        }
        if self.is_active(Action::MoveRight) {
            axis.x += 1.0;
        }
        if self.is_active(Action::MoveUp) {
            axis.y -= 1.0;
        }
        if self.is_active(Action::MoveDown) {
            axis.y += 1.0;
        }
        axis
    }
}

/// Immutable representation of the player used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Centre of the player in world space.
    pub position: Vec2,
    /// Velocity applied during the last move.
    pub velocity: Vec2,
    /// Current stats.
    pub stats: Stats,
    /// Animation state, which doubles as the facing direction.
    pub animation: AnimationState,
    /// Animation frame currently shown.
    pub frame: u32,
    /// Whether contact damage can currently land.
    pub can_take_damage: bool,
    /// Whether the attack cooldown has elapsed.
    pub can_attack: bool,
}

/// Immutable representation of a single enemy used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Variant of the enemy.
    pub kind: EnemyKind,
    /// Centre of the enemy in world space.
    pub position: Vec2,
    /// Velocity applied during the last move.
    pub velocity: Vec2,
    /// Current stats.
    pub stats: Stats,
    /// Animation state, which doubles as the facing direction.
    pub animation: AnimationState,
    /// Animation frame currently shown.
    pub frame: u32,
}

/// Immutable representation of a single item used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ItemSnapshot {
    /// Unique identifier assigned to the item.
    pub id: ItemId,
    /// Kind of the item.
    pub kind: ItemKind,
    /// Position of the item in world space.
    pub position: Vec2,
    /// Animation frame currently shown.
    pub frame: u32,
}

/// Immutable representation of a single projectile used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Unique identifier assigned to the projectile.
    pub id: ProjectileId,
    /// Position of the projectile in world space.
    pub position: Vec2,
    /// Unit vector describing the direction of travel.
    pub direction: Vec2,
    /// Visual rotation in degrees.
    pub rotation: f32,
}

/// Immutable representation of a torch used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TorchSnapshot {
    /// Unique identifier assigned to the torch.
    pub id: TorchId,
    /// Position of the flame in world space.
    pub position: Vec2,
    /// Flicker multiplier for the current tick.
    pub brightness: f32,
    /// Animation frame currently shown.
    pub frame: u32,
}

/// Running totals accumulated while the player explores the level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Progress {
    /// Gold collected.
    pub gold: u32,
    /// Score accumulated from gems.
    pub score: u32,
    /// Whether the key was picked up.
    pub key_collected: bool,
    /// Enemies whose health reached zero.
    pub enemies_slain: u32,
}
