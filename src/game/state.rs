//! Board State
//!
//! Everything that changes during play, in one place: the grid, the
//! fill RNG, the piece id counter, score and the cascade phase.

use serde::{Serialize, Deserialize};

use crate::core::hash::{compute_state_hash, StateHash};
use crate::core::rng::DeterministicRng;
use crate::game::grid::Grid;
use crate::game::piece::PieceFactory;

// =============================================================================
// CASCADE PHASE
// =============================================================================

/// Where the board is in a swap resolution.
///
/// `Idle -> Resolving -> Collapsing -> (Resolving | Refilling)`,
/// `Refilling -> Rechecking -> (Resolving | Idle)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CascadePhase {
    /// Waiting for input
    #[default]
    Idle,
    /// Expanding bombs and clearing the working set
    Resolving,
    /// Compacting columns after a clear
    Collapsing,
    /// Filling empty slots
    Refilling,
    /// Looking for matches after a refill
    Rechecking,
}

// =============================================================================
// BOARD STATE
// =============================================================================

/// Mutable board state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BoardState {
    /// Tiles and pieces
    pub grid: Grid,

    /// Seed the RNG started from
    pub rng_seed: u64,

    /// Fill RNG
    pub rng: DeterministicRng,

    /// Piece id source
    pub factory: PieceFactory,

    /// Cascade phase
    pub phase: CascadePhase,

    /// Accumulated score
    pub score: u64,

    /// Swaps are accepted only while set
    pub input_enabled: bool,
}

impl BoardState {
    /// Create an empty board of Normal tiles.
    pub fn new(width: i32, height: i32, rng_seed: u64) -> Self {
        Self {
            grid: Grid::new(width, height),
            rng_seed,
            rng: DeterministicRng::new(rng_seed),
            factory: PieceFactory::new(),
            phase: CascadePhase::Idle,
            score: 0,
            input_enabled: true,
        }
    }

    /// True when no cascade is running.
    pub fn is_idle(&self) -> bool {
        self.phase == CascadePhase::Idle
    }

    /// Compute hash of current state for comparison.
    ///
    /// Covers tiles, durability, piece identity, colour and bombs, and
    /// score. RNG state is left out so boards built from different seeds
    /// can still compare equal.
    pub fn compute_hash(&self) -> StateHash {
        let grid = &self.grid;
        compute_state_hash(grid.width(), grid.height(), |hasher| {
            for tile in grid.tiles() {
                hasher.update_coord(tile.coord);
                hasher.update_u8(tile.kind as u8);
                hasher.update_u8(tile.durability);
                match grid.piece_at(tile.coord) {
                    Some(piece) => {
                        hasher.update_bool(true);
                        hasher.update_u32(piece.id.0);
                        hasher.update_u8(piece.value as u8);
                        hasher.update_u8(piece.bomb.map_or(0, |b| b as u8));
                    }
                    None => hasher.update_bool(false),
                }
            }

            hasher.update_u64(self.score);
        })
    }
}
