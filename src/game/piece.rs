//! Game Pieces
//!
//! Movable tokens: a colour (`MatchValue`) and an optional bomb payload.

use std::fmt;
use serde::{Serialize, Deserialize};

use crate::core::coord::Coord;

// =============================================================================
// PIECE ID
// =============================================================================

/// Unique piece identifier (monotonic counter per board).
///
/// Identity, not colour, is what match sets deduplicate on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct PieceId(pub u32);

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// =============================================================================
// MATCH VALUE
// =============================================================================

/// Piece colour. Pieces match when their values are equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum MatchValue {
    /// `b`
    Blue = 0,
    /// `g`
    Green = 1,
    /// `i`
    Indigo = 2,
    /// `l`
    Lilac = 3,
    /// `o`
    Orange = 4,
    /// `p`
    Pink = 5,
    /// `u`
    Purple = 6,
}

impl MatchValue {
    /// Full palette in declaration order.
    pub const ALL: [MatchValue; 7] = [
        MatchValue::Blue,
        MatchValue::Green,
        MatchValue::Indigo,
        MatchValue::Lilac,
        MatchValue::Orange,
        MatchValue::Pink,
        MatchValue::Purple,
    ];

    /// Single-character glyph for ASCII dumps.
    pub fn glyph(self) -> char {
        match self {
            MatchValue::Blue => 'b',
            MatchValue::Green => 'g',
            MatchValue::Indigo => 'i',
            MatchValue::Lilac => 'l',
            MatchValue::Orange => 'o',
            MatchValue::Pink => 'p',
            MatchValue::Purple => 'u',
        }
    }

    /// Inverse of [`MatchValue::glyph`], case-insensitive.
    pub fn from_glyph(c: char) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.glyph() == c.to_ascii_lowercase())
    }
}

// =============================================================================
// BOMB KIND
// =============================================================================

/// Detonation pattern carried by a bomb piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum BombKind {
    /// Clears the bomb's whole row
    Row = 1,
    /// Clears the bomb's whole column
    Column = 2,
    /// Clears the 3x3 block around the bomb
    Adjacent = 3,
    /// Colour-wide clear; no detonation policy yet
    Color = 4,
}

// =============================================================================
// PIECE
// =============================================================================

/// A movable token on the board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    /// Identity
    pub id: PieceId,
    /// Current slot; rewritten on every move
    pub coord: Coord,
    /// Colour
    pub value: MatchValue,
    /// Bomb payload, if any
    pub bomb: Option<BombKind>,
}

impl Piece {
    /// Create a plain piece.
    pub fn new(id: PieceId, coord: Coord, value: MatchValue) -> Self {
        Self {
            id,
            coord,
            value,
            bomb: None,
        }
    }

    /// Create a bomb piece.
    pub fn bomb(id: PieceId, coord: Coord, value: MatchValue, kind: BombKind) -> Self {
        Self {
            id,
            coord,
            value,
            bomb: Some(kind),
        }
    }

    /// True if this piece carries a bomb.
    #[inline]
    pub fn is_bomb(&self) -> bool {
        self.bomb.is_some()
    }

    /// True if both pieces share a colour.
    #[inline]
    pub fn matches(&self, other: &Piece) -> bool {
        self.value == other.value
    }

    /// Glyph for ASCII dumps; bombs are upper-case.
    pub fn glyph(&self) -> char {
        let c = self.value.glyph();
        if self.is_bomb() {
            c.to_ascii_uppercase()
        } else {
            c
        }
    }
}

// =============================================================================
// PIECE FACTORY
// =============================================================================

/// Hands out fresh piece ids.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PieceFactory {
    next_id: u32,
}

impl PieceFactory {
    /// Create a factory starting at id 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the next id.
    pub fn next_id(&mut self) -> PieceId {
        let id = PieceId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Create a plain piece with a fresh id.
    pub fn make(&mut self, coord: Coord, value: MatchValue) -> Piece {
        Piece::new(self.next_id(), coord, value)
    }

    /// Create a bomb piece with a fresh id.
    pub fn make_bomb(&mut self, coord: Coord, value: MatchValue, kind: BombKind) -> Piece {
        Piece::bomb(self.next_id(), coord, value, kind)
    }

    /// Number of ids handed out so far.
    pub fn issued(&self) -> u32 {
        self.next_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_ids_are_unique() {
        let mut factory = PieceFactory::new();
        let a = factory.make(Coord::new(0, 0), MatchValue::Blue);
        let b = factory.make(Coord::new(0, 0), MatchValue::Blue);
        let c = factory.make_bomb(Coord::new(1, 0), MatchValue::Pink, BombKind::Row);

        assert_ne!(a.id, b.id);
        assert_ne!(b.id, c.id);
        assert_eq!(factory.issued(), 3);
    }

    #[test]
    fn test_matches_compares_value_only() {
        let a = Piece::new(PieceId(1), Coord::new(0, 0), MatchValue::Green);
        let b = Piece::bomb(PieceId(2), Coord::new(5, 5), MatchValue::Green, BombKind::Column);
        let c = Piece::new(PieceId(3), Coord::new(0, 0), MatchValue::Orange);

        assert!(a.matches(&b));
        assert!(!a.matches(&c));
    }

    #[test]
    fn test_glyph_marks_bombs() {
        let plain = Piece::new(PieceId(0), Coord::new(0, 0), MatchValue::Blue);
        let bomb = Piece::bomb(PieceId(1), Coord::new(0, 0), MatchValue::Blue, BombKind::Adjacent);
        assert_eq!(plain.glyph(), 'b');
        assert_eq!(bomb.glyph(), 'B');
    }

    #[test]
    fn test_match_value_serde_names() {
        let json = serde_json::to_string(&MatchValue::Lilac).unwrap();
        assert_eq!(json, "\"lilac\"");
        let kind: BombKind = serde_json::from_str("\"adjacent\"").unwrap();
        assert_eq!(kind, BombKind::Adjacent);
    }
}
