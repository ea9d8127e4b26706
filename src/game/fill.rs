//! Random Fill
//!
//! Puts a random piece into every open slot, column by column from the
//! bottom, re-rolling any piece that would complete a match with the
//! pieces already settled to its left or below. Setup also looks right
//! and up, where starting pieces from the layout may already sit.

use tracing::{debug, warn};

use crate::core::coord::Coord;
use crate::game::config::BoardConfig;
use crate::game::error::{BoardError, BoardResult};
use crate::game::matcher::MatchFinder;
use crate::game::piece::{MatchValue, Piece, PieceId};
use crate::game::sink::PresentationSink;
use crate::game::state::BoardState;

/// Which neighbours a new piece must not complete a run with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FillCheck {
    /// Pieces to the left or below, already placed in fill order
    #[default]
    Settled,
    /// Runs through the slot along either axis
    Surrounding,
}

/// Parameters of a fill pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FillRules {
    /// Distinct values to draw from
    pub palette: Vec<MatchValue>,
    /// Minimum match length
    pub min_match: usize,
    /// Re-rolls per slot before a matching piece is accepted
    pub max_retries: u32,
    /// Drop-in duration hint
    pub fill_ms: u32,
    /// Rows above the slot a piece drops in from
    pub drop_offset: i32,
    /// Neighbourhood checked for matches
    pub check: FillCheck,
}

impl FillRules {
    /// Rules for a board config.
    pub fn from_config(config: &BoardConfig) -> Self {
        Self {
            palette: config.palette(),
            min_match: config.min_match,
            max_retries: config.max_fill_retries,
            fill_ms: config.timing.fill_ms,
            drop_offset: config.timing.fill_drop_offset,
            check: FillCheck::Settled,
        }
    }

    /// Same rules, checking runs in every direction.
    pub fn surrounding(mut self) -> Self {
        self.check = FillCheck::Surrounding;
        self
    }
}

/// Fill every open slot and report each new piece to the sink.
///
/// Returns the ids of the spawned pieces in fill order. The caller
/// settles them before looking for matches.
pub fn fill_board<S: PresentationSink>(
    state: &mut BoardState,
    rules: &FillRules,
    sink: &mut S,
) -> BoardResult<Vec<PieceId>> {
    let grid = &state.grid;
    let open: Vec<Coord> = grid.coords().filter(|at| grid.is_open_slot(*at)).collect();
    let mut spawned = Vec::with_capacity(open.len());

    for at in open {
        let id = state.factory.next_id();
        let mut attempts = 0;

        loop {
            let value = *state
                .rng
                .choose(&rules.palette)
                .ok_or_else(|| BoardError::InvalidConfig("empty palette".into()))?;
            state.grid.place(Piece::new(id, at, value), at)?;

            let finder = MatchFinder::new(&state.grid, rules.min_match);
            let matched = match rules.check {
                FillCheck::Settled => finder.matches_on_fill(at),
                FillCheck::Surrounding => !finder.matches_at(at).is_empty(),
            };
            if !matched {
                break;
            }

            attempts += 1;
            if attempts >= rules.max_retries {
                warn!("{}", BoardError::UnsatisfiableFill { at, attempts });
                break;
            }
        }

        if let Some(piece) = state.grid.piece_at(at) {
            let drop_from = Coord::new(at.x, at.y + rules.drop_offset);
            sink.on_piece_spawned(piece, drop_from, rules.fill_ms);
        }
        spawned.push(id);
    }

    debug!(count = spawned.len(), "filled empty slots");
    Ok(spawned)
}
