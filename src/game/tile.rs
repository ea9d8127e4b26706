//! Board Tiles
//!
//! Fixed cells of the grid. Only breakable durability ever changes.

use serde::{Serialize, Deserialize};

use crate::core::coord::Coord;

/// Kind of grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum TileKind {
    /// Plain cell
    #[default]
    Normal = 0,
    /// Never holds a piece
    Obstacle = 1,
    /// Cracks on every clear, reverting to Normal at zero durability
    Breakable = 2,
}

/// A grid cell.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    /// Position (never changes)
    pub coord: Coord,
    /// Current kind
    pub kind: TileKind,
    /// Remaining breakable durability (0 for non-breakable tiles)
    pub durability: u8,
}

impl Tile {
    /// Create a normal tile.
    pub fn normal(coord: Coord) -> Self {
        Self {
            coord,
            kind: TileKind::Normal,
            durability: 0,
        }
    }

    /// Create an obstacle tile.
    pub fn obstacle(coord: Coord) -> Self {
        Self {
            coord,
            kind: TileKind::Obstacle,
            durability: 0,
        }
    }

    /// Create a breakable tile.
    pub fn breakable(coord: Coord, durability: u8) -> Self {
        Self {
            coord,
            kind: TileKind::Breakable,
            durability,
        }
    }

    /// True if a piece may occupy this tile.
    #[inline]
    pub fn can_hold_piece(&self) -> bool {
        self.kind != TileKind::Obstacle
    }

    /// Apply one clear to this tile.
    ///
    /// Returns the new durability if the tile was breakable, None otherwise.
    /// Reaching zero turns the tile Normal, so later clears are no-ops.
    pub fn crack(&mut self) -> Option<u8> {
        if self.kind != TileKind::Breakable {
            return None;
        }

        self.durability = self.durability.saturating_sub(1);
        if self.durability == 0 {
            self.kind = TileKind::Normal;
        }
        Some(self.durability)
    }
}
