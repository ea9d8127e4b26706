//! Board Configuration
//!
//! Everything a board needs at setup: dimensions, match rules, the
//! palette, the starting layout and motion timing hints. Loaded from JSON
//! with defaults for every missing field.

use std::collections::BTreeSet;
use serde::{Serialize, Deserialize};

use crate::core::coord::Coord;
use crate::game::bomb::DEFAULT_BOMB_THRESHOLD;
use crate::game::error::{BoardError, BoardResult};
use crate::game::piece::{BombKind, MatchValue};
use crate::game::sink::MotionCurve;

/// Default board width.
pub const DEFAULT_WIDTH: i32 = 8;
/// Default board height.
pub const DEFAULT_HEIGHT: i32 = 8;
/// Default minimum match length.
pub const DEFAULT_MIN_MATCH: usize = 3;
/// Default ceiling on re-rolls per filled slot.
pub const DEFAULT_MAX_FILL_RETRIES: u32 = 100;
/// Default points per cleared piece.
pub const DEFAULT_POINTS_PER_PIECE: u64 = 20;
/// Largest board accepted, in cells.
pub const MAX_BOARD_CELLS: i32 = 1 << 16;

// =============================================================================
// MOTION TIMING
// =============================================================================

/// Duration hints passed to the presentation sink.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionTiming {
    /// Swap and swap-back duration
    pub swap_ms: u32,
    /// Collapse duration per row fallen
    pub fall_ms_per_row: u32,
    /// Drop-in duration for filled pieces
    pub fill_ms: u32,
    /// Rows above its slot a filled piece drops in from
    pub fill_drop_offset: i32,
    /// Suggested easing
    pub curve: MotionCurve,
}

impl Default for MotionTiming {
    fn default() -> Self {
        Self {
            swap_ms: 500,
            fall_ms_per_row: 100,
            fill_ms: 500,
            fill_drop_offset: 10,
            curve: MotionCurve::default(),
        }
    }
}

impl MotionTiming {
    /// Collapse duration for a fall of `rows` rows.
    pub fn fall_duration(&self, rows: i32) -> u32 {
        self.fall_ms_per_row.saturating_mul(rows.max(0) as u32)
    }
}

// =============================================================================
// LAYOUT
// =============================================================================

/// What a starting layout entry puts on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutKind {
    /// Plain tile (the default for every cell)
    Normal,
    /// Cell that never holds a piece
    Obstacle,
    /// Cell with a durability counter
    Breakable,
    /// Starting piece
    Piece,
    /// Starting bomb piece
    Bomb,
}

/// One entry of the starting layout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutEntry {
    /// Entry kind
    pub kind: LayoutKind,
    /// Column
    pub x: i32,
    /// Row (0 = bottom)
    pub y: i32,
    /// Breakable durability (defaults to 1)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub durability: Option<u8>,
    /// Piece colour (pieces and bombs)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<MatchValue>,
    /// Bomb payload (bombs only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bomb: Option<BombKind>,
}

impl LayoutEntry {
    /// Obstacle at (x, y).
    pub fn obstacle(x: i32, y: i32) -> Self {
        Self::bare(LayoutKind::Obstacle, x, y)
    }

    /// Breakable tile at (x, y).
    pub fn breakable(x: i32, y: i32, durability: u8) -> Self {
        Self {
            durability: Some(durability),
            ..Self::bare(LayoutKind::Breakable, x, y)
        }
    }

    /// Starting piece at (x, y).
    pub fn piece(x: i32, y: i32, value: MatchValue) -> Self {
        Self {
            value: Some(value),
            ..Self::bare(LayoutKind::Piece, x, y)
        }
    }

    /// Starting bomb at (x, y).
    pub fn bomb(x: i32, y: i32, value: MatchValue, kind: BombKind) -> Self {
        Self {
            value: Some(value),
            bomb: Some(kind),
            ..Self::bare(LayoutKind::Bomb, x, y)
        }
    }

    fn bare(kind: LayoutKind, x: i32, y: i32) -> Self {
        Self {
            kind,
            x,
            y,
            durability: None,
            value: None,
            bomb: None,
        }
    }

    /// Cell this entry targets.
    pub fn coord(&self) -> Coord {
        Coord::new(self.x, self.y)
    }
}

// =============================================================================
// BOARD CONFIG
// =============================================================================

/// Board setup configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Columns
    pub width: i32,
    /// Rows
    pub height: i32,
    /// Minimum run length that counts as a match
    pub min_match: usize,
    /// Re-rolls per slot before a matching fill is accepted
    pub max_fill_retries: u32,
    /// Match size at which a swap drops a bomb
    pub bomb_threshold: usize,
    /// Palette the fill draws from
    pub match_values: Vec<MatchValue>,
    /// Starting tiles and pieces
    pub layout: Vec<LayoutEntry>,
    /// Seed for the fill RNG
    pub seed: u64,
    /// Score per cleared piece
    pub points_per_piece: u64,
    /// Motion hints
    pub timing: MotionTiming,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            min_match: DEFAULT_MIN_MATCH,
            max_fill_retries: DEFAULT_MAX_FILL_RETRIES,
            bomb_threshold: DEFAULT_BOMB_THRESHOLD,
            match_values: MatchValue::ALL.to_vec(),
            layout: Vec::new(),
            seed: 0,
            points_per_piece: DEFAULT_POINTS_PER_PIECE,
            timing: MotionTiming::default(),
        }
    }
}

impl BoardConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> BoardResult<Self> {
        let config: BoardConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Same config with a different seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Distinct palette values in a stable order.
    pub fn palette(&self) -> Vec<MatchValue> {
        self.match_values
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Reject configurations the board cannot run with.
    pub fn validate(&self) -> BoardResult<()> {
        if self.width <= 0 || self.height <= 0 {
            return Err(invalid(format!(
                "dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        match self.width.checked_mul(self.height) {
            Some(cells) if cells <= MAX_BOARD_CELLS => {}
            _ => {
                return Err(invalid(format!(
                    "{}x{} board exceeds {} cells",
                    self.width, self.height, MAX_BOARD_CELLS
                )));
            }
        }
        if self.min_match < 2 {
            return Err(invalid(format!("min_match must be at least 2, got {}", self.min_match)));
        }
        if self.bomb_threshold < self.min_match {
            return Err(invalid(format!(
                "bomb_threshold {} is below min_match {}",
                self.bomb_threshold, self.min_match
            )));
        }
        if self.palette().len() < 2 {
            return Err(invalid("at least two distinct match values are required".into()));
        }

        self.validate_layout(&self.layout)
    }

    /// Check a starting layout against this config's dimensions.
    pub fn validate_layout(&self, layout: &[LayoutEntry]) -> BoardResult<()> {
        for entry in layout {
            let at = entry.coord();
            if at.x < 0 || at.x >= self.width || at.y < 0 || at.y >= self.height {
                return Err(BoardError::OutOfBounds {
                    at,
                    width: self.width,
                    height: self.height,
                });
            }
            match entry.kind {
                LayoutKind::Piece if entry.value.is_none() => {
                    return Err(invalid(format!("piece at {} has no value", at)));
                }
                LayoutKind::Bomb if entry.value.is_none() || entry.bomb.is_none() => {
                    return Err(invalid(format!("bomb at {} needs a value and a kind", at)));
                }
                LayoutKind::Breakable if entry.durability == Some(0) => {
                    return Err(invalid(format!("breakable at {} has zero durability", at)));
                }
                _ => {}
            }
        }

        Ok(())
    }
}

fn invalid(reason: String) -> BoardError {
    BoardError::InvalidConfig(reason)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BoardConfig::default();
        assert_eq!(config.width, 8);
        assert_eq!(config.height, 8);
        assert_eq!(config.min_match, 3);
        assert_eq!(config.max_fill_retries, 100);
        assert_eq!(config.bomb_threshold, 4);
        assert_eq!(config.match_values.len(), 7);
        assert_eq!(config.timing.swap_ms, 500);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = BoardConfig::from_json_str(
            r#"{
                "width": 6,
                "seed": 42,
                "match_values": ["blue", "green", "pink"],
                "layout": [
                    { "kind": "obstacle", "x": 0, "y": 0 },
                    { "kind": "breakable", "x": 1, "y": 0, "durability": 2 },
                    { "kind": "bomb", "x": 2, "y": 0, "value": "pink", "bomb": "row" }
                ],
                "timing": { "fall_ms_per_row": 80 }
            }"#,
        )
        .unwrap();

        assert_eq!(config.width, 6);
        assert_eq!(config.height, 8);
        assert_eq!(config.seed, 42);
        assert_eq!(config.layout.len(), 3);
        assert_eq!(config.layout[2], LayoutEntry::bomb(2, 0, MatchValue::Pink, BombKind::Row));
        assert_eq!(config.timing.fall_ms_per_row, 80);
        assert_eq!(config.timing.fill_drop_offset, 10);
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = BoardConfig::from_json_str("{ width: }").unwrap_err();
        assert!(matches!(err, BoardError::ConfigParse(_)));
    }

    #[test]
    fn test_validation_rejects_bad_configs() {
        let bad = [
            BoardConfig { width: 0, ..Default::default() },
            BoardConfig { min_match: 1, ..Default::default() },
            BoardConfig { bomb_threshold: 2, ..Default::default() },
            BoardConfig {
                match_values: vec![MatchValue::Blue, MatchValue::Blue],
                ..Default::default()
            },
            BoardConfig {
                layout: vec![LayoutEntry { value: None, ..LayoutEntry::piece(0, 0, MatchValue::Blue) }],
                ..Default::default()
            },
            BoardConfig {
                layout: vec![LayoutEntry::breakable(0, 0, 0)],
                ..Default::default()
            },
            BoardConfig {
                layout: vec![LayoutEntry { bomb: None, ..LayoutEntry::bomb(0, 0, MatchValue::Blue, BombKind::Row) }],
                ..Default::default()
            },
            // Cell count overflows i32
            BoardConfig { width: 65536, height: 65536, ..Default::default() },
            BoardConfig { width: 257, height: 256, ..Default::default() },
        ];
        for config in bad {
            let err = config.validate().unwrap_err();
            assert!(matches!(err, BoardError::InvalidConfig(_)), "{:?}", err);
        }

        let outside = BoardConfig {
            layout: vec![LayoutEntry::obstacle(8, 0)],
            ..Default::default()
        };
        assert!(matches!(outside.validate(), Err(BoardError::OutOfBounds { .. })));
    }

    #[test]
    fn test_largest_board_is_accepted() {
        let config = BoardConfig { width: 256, height: 256, ..Default::default() };
        assert!(config.validate().is_ok());
        assert!(BoardConfig::from_json_str(r#"{ "width": 65536, "height": 65536 }"#).is_err());
    }

    #[test]
    fn test_palette_is_deduplicated() {
        let config = BoardConfig {
            match_values: vec![MatchValue::Pink, MatchValue::Blue, MatchValue::Pink],
            ..Default::default()
        };
        assert_eq!(config.palette(), vec![MatchValue::Blue, MatchValue::Pink]);
    }

    #[test]
    fn test_fall_duration_scales_with_distance() {
        let timing = MotionTiming::default();
        assert_eq!(timing.fall_duration(3), 300);
        assert_eq!(timing.fall_duration(0), 0);
    }
}
