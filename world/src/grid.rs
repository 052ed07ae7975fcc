//! Fixed-size tile grid backing every dungeon level.

use dungeon_crawler_core::{TileCoord, TileKind, GRID_COLUMNS, GRID_ROWS, TILE_SIZE};
use glam::Vec2;
use thiserror::Error;

const CELL_COUNT: usize = (GRID_COLUMNS * GRID_ROWS) as usize;

/// Errors reported while parsing a level source.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LevelLoadError {
    /// The source did not contain a single tile code.
    #[error("level source is empty")]
    Empty,
    /// The source ended before every cell of the grid was described.
    #[error("level source ended after {cells_read} of {CELL_COUNT} cells")]
    Truncated {
        /// Number of complete cells parsed before the source ran out.
        cells_read: usize,
    },
    /// A cell held something other than a known two-digit tile code.
    #[error("cell {index} holds invalid tile code `{code}`")]
    InvalidCode {
        /// Row-major index of the offending cell.
        index: usize,
        /// Raw text found in the cell.
        code: String,
    },
}

/// Single cell of the grid as seen by queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tile {
    /// Kind currently held by the cell.
    pub kind: TileKind,
    /// Column index, `-1` for the invalid sentinel.
    pub column: i32,
    /// Row index, `-1` for the invalid sentinel.
    pub row: i32,
}

impl Tile {
    /// Sentinel returned for positions outside the grid.
    pub const INVALID: Tile = Tile {
        kind: TileKind::Empty,
        column: -1,
        row: -1,
    };

    /// Reports whether the tile lies inside the grid.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.column >= 0 && self.row >= 0
    }

    /// Reports whether the tile blocks movement. The sentinel never does.
    #[must_use]
    pub const fn is_solid(&self) -> bool {
        self.is_valid() && self.kind.is_solid()
    }

    /// Reports whether the tile is open floor. The sentinel never is.
    #[must_use]
    pub const fn is_floor(&self) -> bool {
        self.is_valid() && self.kind.is_floor()
    }

    /// Grid coordinate of the tile, absent for the sentinel.
    #[must_use]
    pub fn coord(&self) -> Option<TileCoord> {
        let column = u32::try_from(self.column).ok()?;
        let row = u32::try_from(self.row).ok()?;
        Some(TileCoord::new(column, row))
    }
}

/// Describes the tile layout of the current level.
#[derive(Clone, Debug)]
pub struct TileGrid {
    origin: Vec2,
    kinds: Vec<TileKind>,
    door: Option<TileCoord>,
}

impl Default for TileGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl TileGrid {
    /// Creates a grid filled with `Empty` tiles anchored at the world origin.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Vec2::ZERO,
            kinds: vec![TileKind::Empty; CELL_COUNT],
            door: None,
        }
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        GRID_COLUMNS
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        GRID_ROWS
    }

    /// Side length of a single square tile expressed in world units.
    #[must_use]
    pub const fn tile_size(&self) -> f32 {
        TILE_SIZE
    }

    /// World-space position of the grid's top-left corner.
    #[must_use]
    pub const fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Moves the grid so that its top-left corner sits at `origin`.
    pub fn set_origin(&mut self, origin: Vec2) {
        self.origin = origin;
    }

    /// Origin and extent of the grid in world space.
    #[must_use]
    pub fn bounds(&self) -> (Vec2, Vec2) {
        let size = Vec2::new(
            self.columns() as f32 * TILE_SIZE,
            self.rows() as f32 * TILE_SIZE,
        );
        (self.origin, size)
    }

    /// Location of the level door, if the loaded level has one.
    #[must_use]
    pub const fn door(&self) -> Option<TileCoord> {
        self.door
    }

    /// Retrieves the tile at the provided column and row.
    #[must_use]
    pub fn tile_at(&self, column: i32, row: i32) -> Option<Tile> {
        let index = self.index(column, row)?;
        Some(Tile {
            kind: self.kinds[index],
            column,
            row,
        })
    }

    /// Retrieves the tile under a world-space position, or [`Tile::INVALID`].
    #[must_use]
    pub fn tile_at_position(&self, position: Vec2) -> Tile {
        let local = (position - self.origin) / TILE_SIZE;
        let column = local.x.floor() as i32;
        let row = local.y.floor() as i32;
        self.tile_at(column, row).unwrap_or(Tile::INVALID)
    }

    /// Reports whether the tile at the column and row blocks movement.
    #[must_use]
    pub fn is_solid(&self, column: i32, row: i32) -> bool {
        self.tile_at(column, row)
            .map_or(false, |tile| tile.kind.is_solid())
    }

    /// Reports whether the tile at the column and row is open floor.
    #[must_use]
    pub fn is_floor(&self, column: i32, row: i32) -> bool {
        self.tile_at(column, row)
            .map_or(false, |tile| tile.kind.is_floor())
    }

    /// Reports whether the tile under a world-space position blocks movement.
    #[must_use]
    pub fn is_solid_at(&self, position: Vec2) -> bool {
        self.tile_at_position(position).is_solid()
    }

    /// Reports whether the tile under a world-space position is open floor.
    #[must_use]
    pub fn is_floor_at(&self, position: Vec2) -> bool {
        self.tile_at_position(position).is_floor()
    }

    /// World-space centre of a tile.
    #[must_use]
    pub fn tile_center(&self, coord: TileCoord) -> Vec2 {
        self.origin
            + Vec2::new(
                (coord.column() as f32 + 0.5) * TILE_SIZE,
                (coord.row() as f32 + 0.5) * TILE_SIZE,
            )
    }

    /// Iterates over every tile in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = Tile> + '_ {
        self.kinds.iter().enumerate().map(|(index, kind)| Tile {
            kind: *kind,
            column: (index % GRID_COLUMNS as usize) as i32,
            row: (index / GRID_COLUMNS as usize) as i32,
        })
    }

    /// Overwrites the kind of a tile. Out-of-range coordinates are ignored.
    ///
    /// Returns `true` when the stored kind changed.
    pub fn set_tile(&mut self, column: i32, row: i32, kind: TileKind) -> bool {
        let Some(index) = self.index(column, row) else {
            return false;
        };
        let changed = self.kinds[index] != kind;
        self.kinds[index] = kind;
        changed
    }

    /// Turns the remembered locked door into an unlocked one.
    ///
    /// Returns the door location when the call changed the grid.
    pub fn unlock_door(&mut self) -> Option<TileCoord> {
        let door = self.door?;
        let changed = self.set_tile(
            door.column() as i32,
            door.row() as i32,
            TileKind::WallDoorUnlocked,
        );
        changed.then_some(door)
    }

    /// Replaces the layout with the one described by `source`.
    ///
    /// The grid is left untouched when parsing fails.
    pub fn load_from_source(&mut self, source: &str) -> Result<(), LevelLoadError> {
        let kinds = parse_cells(source)?;
        self.door = kinds
            .iter()
            .rposition(|kind| *kind == TileKind::WallDoorLocked)
            .map(|index| {
                TileCoord::new(
                    (index % GRID_COLUMNS as usize) as u32,
                    (index / GRID_COLUMNS as usize) as u32,
                )
            });
        self.kinds = kinds;
        Ok(())
    }

    fn index(&self, column: i32, row: i32) -> Option<usize> {
        let column = u32::try_from(column).ok()?;
        let row = u32::try_from(row).ok()?;
        if column >= GRID_COLUMNS || row >= GRID_ROWS {
            return None;
        }
        Some((row * GRID_COLUMNS + column) as usize)
    }
}

fn is_delimiter(byte: u8) -> bool {
    matches!(byte, b'[' | b']') || byte.is_ascii_whitespace()
}

fn parse_cells(source: &str) -> Result<Vec<TileKind>, LevelLoadError> {
    let bytes = source.as_bytes();
    let mut kinds = Vec::with_capacity(CELL_COUNT);
    let mut cursor = 0;

    while kinds.len() < CELL_COUNT {
        while cursor < bytes.len() && is_delimiter(bytes[cursor]) {
            cursor += 1;
        }
        if cursor >= bytes.len() {
            break;
        }

        let index = kinds.len();
        let Some(pair) = bytes.get(cursor..cursor + 2) else {
            return Err(LevelLoadError::Truncated { cells_read: index });
        };
        cursor += 2;

        let invalid = || LevelLoadError::InvalidCode {
            index,
            code: String::from_utf8_lossy(pair).into_owned(),
        };
        if !pair.iter().all(u8::is_ascii_digit) {
            return Err(invalid());
        }
        let code = (pair[0] - b'0') * 10 + (pair[1] - b'0');
        kinds.push(TileKind::from_code(code).ok_or_else(invalid)?);
    }

    match kinds.len() {
        0 => Err(LevelLoadError::Empty),
        CELL_COUNT => Ok(kinds),
        cells_read => Err(LevelLoadError::Truncated { cells_read }),
    }
}
