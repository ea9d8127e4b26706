//! Game Logic Module
//!
//! The board simulation. Deterministic for a given seed and input sequence.
//!
//! ## Module Structure
//!
//! - `grid`, `tile`, `piece`: board storage and its contents
//! - `matcher`: run scans and match sets
//! - `bomb`: bomb drop policy and blast expansion
//! - `fill`: random fill without immediate matches
//! - `cascade`: clear, collapse, refill loop
//! - `board`: public facade and swap handling
//! - `input`: press/drag/release gesture
//! - `sink`, `events`: presentation hooks and recorded events
//! - `config`, `state`, `error`: setup, mutable state, errors

pub mod error;
pub mod piece;
pub mod tile;
pub mod grid;
pub mod matcher;
pub mod bomb;
pub mod config;
pub mod sink;
pub mod events;
pub mod state;
pub mod fill;
pub mod cascade;
pub mod input;
pub mod board;

// Re-export key types
pub use board::{Board, SwapOutcome};
pub use cascade::CascadeReport;
pub use config::{BoardConfig, LayoutEntry, LayoutKind, MotionTiming};
pub use error::{BoardError, BoardResult};
pub use events::{BoardEvent, RecordingSink};
pub use grid::Grid;
pub use input::{SwapGesture, SwapRejection, SwapRequest};
pub use matcher::{MatchFinder, MatchSet};
pub use piece::{BombKind, MatchValue, Piece, PieceId};
pub use sink::{MotionCurve, NullSink, PresentationSink};
pub use state::{BoardState, CascadePhase};
pub use tile::{Tile, TileKind};
