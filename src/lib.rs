//! # Match-3 Engine
//!
//! Deterministic board simulation for match-3 games: match detection,
//! bombs, cascades and refills, with rendering left to a presentation sink.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      MATCH-3 ENGINE                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── coord.rs    - Cell coordinates and directions           │
//! │  ├── rng.rs      - Deterministic Xorshift128+ PRNG           │
//! │  └── hash.rs     - State hashing for comparison              │
//! │                                                              │
//! │  game/           - Board logic                               │
//! │  ├── grid.rs     - Tile and piece storage                    │
//! │  ├── matcher.rs  - Run scans and match sets                  │
//! │  ├── bomb.rs     - Bomb policy and blasts                    │
//! │  ├── fill.rs     - No-match random fill                      │
//! │  ├── cascade.rs  - Clear/collapse/refill loop                │
//! │  ├── board.rs    - Public facade, swaps, gestures            │
//! │  └── sink.rs     - Presentation hooks                        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism
//!
//! - No HashMap (match sets use BTreeMap for sorted iteration)
//! - No system time dependencies
//! - All randomness from seeded Xorshift128+
//!
//! Given the same config and the same swaps, a board produces the same
//! pieces, the same events and the same state hash.
//!
//! ## Example
//!
//! ```
//! use match3::game::{Board, BoardConfig, NullSink};
//!
//! let board = Board::setup(BoardConfig::default().with_seed(7), NullSink).unwrap();
//! assert!(board.all_matches().is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;

// Re-export commonly used types
pub use crate::core::coord::{Coord, Direction};
pub use crate::core::rng::DeterministicRng;
pub use crate::game::board::{Board, SwapOutcome};
pub use crate::game::config::BoardConfig;
pub use crate::game::sink::{NullSink, PresentationSink};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
