//! Presentation Sink
//!
//! The board's only view of rendering. The engine calls these hooks as
//! logical events happen and never holds a presentation object.
//!
//! ## Settling
//!
//! `settle` is the barrier between motion and logic: after issuing a batch
//! of moves the board calls it and does not look for matches until it
//! returns. A sink driving real animation blocks there until every piece
//! in the batch has arrived; a headless sink returns immediately.

use serde::{Serialize, Deserialize};

use crate::core::coord::Coord;
use crate::game::piece::{BombKind, Piece, PieceId};

/// Receiver for board events. Every hook defaults to a no-op.
pub trait PresentationSink {
    /// A new piece appeared at `piece.coord`, dropping in from `drop_from`.
    fn on_piece_spawned(&mut self, _piece: &Piece, _drop_from: Coord, _duration_ms: u32) {}

    /// A piece moved between slots. `duration_ms` scales with distance.
    fn on_piece_moved(&mut self, _piece: PieceId, _from: Coord, _to: Coord, _duration_ms: u32) {}

    /// The piece at `at` was destroyed.
    fn on_piece_cleared(&mut self, _at: Coord) {}

    /// The breakable tile at `at` cracked down to `durability`.
    fn on_tile_broken(&mut self, _at: Coord, _durability: u8) {}

    /// A freshly dropped bomb was written onto the board.
    fn on_bomb_activated(&mut self, _bomb: PieceId, _at: Coord, _kind: BombKind) {}

    /// A bomb went off, taking `affected` pieces with it.
    fn on_bomb_detonated(&mut self, _bomb: PieceId, _at: Coord, _kind: BombKind, _affected: usize) {}

    /// Score total changed by `delta`.
    fn on_score_changed(&mut self, _total: u64, _delta: u64) {}

    /// Block until every piece in `batch` is at rest in its logical slot.
    fn settle(&mut self, _batch: &[PieceId]) {}
}

/// Sink that ignores everything (headless simulation).
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl PresentationSink for NullSink {}

// =============================================================================
// MOTION CURVES
// =============================================================================

/// Easing applied by a presentation layer to piece motion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionCurve {
    /// Constant speed
    Linear,
    /// Fast start, slow arrival
    EaseOut,
    /// Slow start, fast arrival
    EaseIn,
    /// Cubic smoothstep
    SmoothStep,
    /// Quintic smootherstep
    #[default]
    SmootherStep,
}

impl MotionCurve {
    /// Map linear progress `t` in [0, 1] to eased progress.
    pub fn sample(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            MotionCurve::Linear => t,
            MotionCurve::EaseOut => (t * std::f32::consts::FRAC_PI_2).sin(),
            MotionCurve::EaseIn => 1.0 - (t * std::f32::consts::FRAC_PI_2).cos(),
            MotionCurve::SmoothStep => t * t * (3.0 - 2.0 * t),
            MotionCurve::SmootherStep => t * t * t * (t * (t * 6.0 - 15.0) + 10.0),
        }
    }
}
