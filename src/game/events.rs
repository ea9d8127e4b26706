//! Board Events
//!
//! Logical events the board reports to its presentation layer, in the
//! order they happened. `RecordingSink` keeps them for replay, logging
//! and tests.

use std::collections::BTreeSet;
use serde::{Serialize, Deserialize};

use crate::core::coord::Coord;
use crate::game::piece::{BombKind, MatchValue, Piece, PieceId};
use crate::game::sink::PresentationSink;

/// Board event data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BoardEvent {
    /// A piece was created by fill or refill and drops into its slot
    PieceSpawned {
        piece: PieceId,
        value: MatchValue,
        bomb: Option<BombKind>,
        at: Coord,
        drop_from: Coord,
        duration_ms: u32,
    },

    /// A piece moved (swap, swap-back or collapse)
    PieceMoved {
        piece: PieceId,
        from: Coord,
        to: Coord,
        duration_ms: u32,
    },

    /// A piece was destroyed
    PieceCleared { at: Coord },

    /// A breakable tile cracked
    TileBroken { at: Coord, durability: u8 },

    /// A freshly dropped bomb was put on the board
    BombActivated {
        bomb: PieceId,
        at: Coord,
        kind: BombKind,
    },

    /// A bomb went off
    BombDetonated {
        bomb: PieceId,
        at: Coord,
        kind: BombKind,
        affected: usize,
    },

    /// Score total changed
    ScoreChanged { total: u64, delta: u64 },

    /// The board waited for these pieces to come to rest
    Settled { pieces: Vec<PieceId> },
}

/// Sink that records every event and tracks which pieces are in motion.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    /// Events in arrival order
    pub events: Vec<BoardEvent>,
    in_motion: BTreeSet<PieceId>,
}

impl RecordingSink {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take recorded events (consumes them).
    pub fn take_events(&mut self) -> Vec<BoardEvent> {
        std::mem::take(&mut self.events)
    }

    /// Pieces reported moving but not yet settled.
    pub fn in_motion(&self) -> &BTreeSet<PieceId> {
        &self.in_motion
    }

    /// Number of recorded events matching a predicate.
    pub fn count(&self, pred: impl Fn(&BoardEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl PresentationSink for RecordingSink {
    fn on_piece_spawned(&mut self, piece: &Piece, drop_from: Coord, duration_ms: u32) {
        self.in_motion.insert(piece.id);
        self.events.push(BoardEvent::PieceSpawned {
            piece: piece.id,
            value: piece.value,
            bomb: piece.bomb,
            at: piece.coord,
            drop_from,
            duration_ms,
        });
    }

    fn on_piece_moved(&mut self, piece: PieceId, from: Coord, to: Coord, duration_ms: u32) {
        self.in_motion.insert(piece);
        self.events.push(BoardEvent::PieceMoved {
            piece,
            from,
            to,
            duration_ms,
        });
    }

    fn on_piece_cleared(&mut self, at: Coord) {
        self.events.push(BoardEvent::PieceCleared { at });
    }

    fn on_tile_broken(&mut self, at: Coord, durability: u8) {
        self.events.push(BoardEvent::TileBroken { at, durability });
    }

    fn on_bomb_activated(&mut self, bomb: PieceId, at: Coord, kind: BombKind) {
        self.events.push(BoardEvent::BombActivated { bomb, at, kind });
    }

    fn on_bomb_detonated(&mut self, bomb: PieceId, at: Coord, kind: BombKind, affected: usize) {
        self.events.push(BoardEvent::BombDetonated {
            bomb,
            at,
            kind,
            affected,
        });
    }

    fn on_score_changed(&mut self, total: u64, delta: u64) {
        self.events.push(BoardEvent::ScoreChanged { total, delta });
    }

    fn settle(&mut self, batch: &[PieceId]) {
        for id in batch {
            self.in_motion.remove(id);
        }
        self.events.push(BoardEvent::Settled {
            pieces: batch.to_vec(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settle_clears_motion() {
        let mut sink = RecordingSink::new();
        sink.on_piece_moved(PieceId(1), Coord::new(0, 1), Coord::new(0, 0), 100);
        sink.on_piece_moved(PieceId(2), Coord::new(1, 1), Coord::new(1, 0), 100);
        assert_eq!(sink.in_motion().len(), 2);

        sink.settle(&[PieceId(1), PieceId(2)]);
        assert!(sink.in_motion().is_empty());
        assert_eq!(sink.count(|e| matches!(e, BoardEvent::Settled { .. })), 1);
    }

    #[test]
    fn test_event_json_shape() {
        let event = BoardEvent::TileBroken {
            at: Coord::new(2, 3),
            durability: 1,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "tile_broken");
        assert_eq!(json["durability"], 1);
        assert_eq!(json["at"]["x"], 2);
    }
}
