//! Cascade Resolution
//!
//! The loop that runs after a successful swap until the board is stable:
//! clear, crack tiles, collapse, recheck moved pieces, and once nothing
//! more matches, refill and recheck the whole board.
//!
//! Every batch of moves is followed by `PresentationSink::settle` before
//! the next match query, so no query ever sees a piece still in motion.

use std::collections::BTreeSet;
use serde::{Serialize, Deserialize};
use tracing::{debug, info, warn};

use crate::core::coord::Coord;
use crate::game::bomb::{expand_with_bombs, Detonation};
use crate::game::config::BoardConfig;
use crate::game::error::{BoardError, BoardResult};
use crate::game::fill::{fill_board, FillRules};
use crate::game::grid::Grid;
use crate::game::matcher::{MatchFinder, MatchSet};
use crate::game::piece::{Piece, PieceId};
use crate::game::sink::PresentationSink;
use crate::game::state::{BoardState, CascadePhase};

/// Summary of one swap resolution.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeReport {
    /// Pieces destroyed
    pub pieces_cleared: usize,
    /// Breakable tile cracks
    pub tiles_broken: usize,
    /// Bombs that went off
    pub bombs_detonated: usize,
    /// Bombs the swap dropped, as activated
    pub dropped_bombs: Vec<Piece>,
    /// Clear passes
    pub passes: usize,
    /// Refills performed
    pub refills: usize,
    /// Points earned
    pub score_delta: u64,
}

/// One piece's fall during a collapse.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PieceMove {
    /// Piece that fell
    pub id: PieceId,
    /// Slot before the fall
    pub from: Coord,
    /// Slot after the fall
    pub to: Coord,
    /// Rows fallen
    pub distance: i32,
}

// =============================================================================
// COLLAPSE
// =============================================================================

/// Compact a column's pieces toward row 0, keeping their order.
///
/// Obstacle slots are never destinations but do not stop a fall; a piece
/// above an obstacle drops past it into the first free slot below.
pub fn collapse_column(grid: &mut Grid, x: i32) -> Vec<PieceMove> {
    let slots: Vec<Coord> = (0..grid.height())
        .map(|y| Coord::new(x, y))
        .filter(|at| grid.tile_at(*at).is_some_and(|t| t.can_hold_piece()))
        .collect();

    let occupied: Vec<Coord> = slots
        .iter()
        .copied()
        .filter(|at| grid.piece_at(*at).is_some())
        .collect();

    let mut moves = Vec::new();
    for (from, to) in occupied.into_iter().zip(slots) {
        if from == to {
            continue;
        }
        if let Some(piece) = grid.take(from) {
            let id = piece.id;
            // `to` is a holdable slot that the previous moves emptied
            if grid.place(piece, to).is_ok() {
                moves.push(PieceMove {
                    id,
                    from,
                    to,
                    distance: from.y - to.y,
                });
            }
        }
    }
    moves
}

/// Collapse several columns, left to right.
pub fn collapse_columns(grid: &mut Grid, columns: &BTreeSet<i32>) -> Vec<PieceMove> {
    columns
        .iter()
        .flat_map(|&x| collapse_column(grid, x))
        .collect()
}

// =============================================================================
// RESOLUTION LOOP
// =============================================================================

/// Run a cascade to completion.
///
/// `initial` is the union of the swap's matches; `fresh_bombs` are the
/// bombs that swap dropped, written to the grid after the first clear.
/// Input is disabled for the duration.
pub fn resolve_cascade<S: PresentationSink>(
    state: &mut BoardState,
    config: &BoardConfig,
    initial: MatchSet,
    fresh_bombs: Vec<Piece>,
    sink: &mut S,
) -> BoardResult<CascadeReport> {
    let mut report = CascadeReport::default();
    let rules = FillRules::from_config(config);
    let mut working = initial;
    let mut fresh_bombs = fresh_bombs;

    state.input_enabled = false;

    loop {
        while !working.is_empty() {
            report.passes += 1;

            // 1. Pull in bomb blasts
            state.phase = CascadePhase::Resolving;
            let detonations = expand_with_bombs(&state.grid, &mut working);
            report_detonations(&detonations, sink, &mut report);

            // 2-3. Clear, crack tiles, score
            let mut columns = working.columns();
            clear_working_set(state, config, &working, sink, &mut report);

            // 4. Bombs dropped by the swap go live after the first clear
            for bomb in fresh_bombs.drain(..) {
                columns.insert(bomb.coord.x);
                activate_bomb(state, bomb, sink, &mut report);
            }

            // 5. Collapse
            state.phase = CascadePhase::Collapsing;
            let moves = collapse_columns(&mut state.grid, &columns);
            for m in &moves {
                sink.on_piece_moved(m.id, m.from, m.to, config.timing.fall_duration(m.distance));
            }

            // 6. Barrier
            settle(sink, moves.iter().map(|m| m.id).collect());

            trace_grid(state, report.passes);

            // 7. New matches among pieces that moved
            working = MatchFinder::new(&state.grid, config.min_match)
                .matches_among(moves.iter().map(|m| m.to));
        }

        // 8. Refill and recheck the whole board
        state.phase = CascadePhase::Refilling;
        let spawned = fill_board(state, &rules, sink)?;
        if !spawned.is_empty() {
            report.refills += 1;
            settle(sink, spawned);
        }

        state.phase = CascadePhase::Rechecking;
        working = MatchFinder::new(&state.grid, config.min_match).all_matches();
        if working.is_empty() {
            break;
        }
        debug!(matches = working.len(), "refill produced matches, continuing cascade");
    }

    state.phase = CascadePhase::Idle;
    state.input_enabled = true;

    info!(
        cleared = report.pieces_cleared,
        passes = report.passes,
        bombs = report.bombs_detonated,
        score = state.score,
        "cascade complete"
    );
    Ok(report)
}

fn report_detonations<S: PresentationSink>(
    detonations: &[Detonation],
    sink: &mut S,
    report: &mut CascadeReport,
) {
    for d in detonations {
        debug!(bomb = %d.bomb, at = %d.at, kind = ?d.kind, affected = d.affected, "bomb detonated");
        sink.on_bomb_detonated(d.bomb, d.at, d.kind, d.affected);
    }
    report.bombs_detonated += detonations.len();
}

/// Destroy every piece in the set, cracking breakable tiles under them.
fn clear_working_set<S: PresentationSink>(
    state: &mut BoardState,
    config: &BoardConfig,
    working: &MatchSet,
    sink: &mut S,
    report: &mut CascadeReport,
) {
    let mut cleared = 0u64;

    for (id, at) in working.iter() {
        if state.grid.piece_at(at).map(|p| p.id) != Some(id) {
            warn!(piece = %id, "{}", BoardError::InvalidPiece(at));
            continue;
        }
        state.grid.take(at);
        sink.on_piece_cleared(at);
        cleared += 1;

        if let Some(durability) = state.grid.tile_at_mut(at).and_then(|t| t.crack()) {
            sink.on_tile_broken(at, durability);
            report.tiles_broken += 1;
        }
    }

    report.pieces_cleared += cleared as usize;

    let delta = cleared * config.points_per_piece;
    if delta > 0 {
        state.score += delta;
        report.score_delta += delta;
        sink.on_score_changed(state.score, delta);
    }
}

fn activate_bomb<S: PresentationSink>(
    state: &mut BoardState,
    bomb: Piece,
    sink: &mut S,
    report: &mut CascadeReport,
) {
    let (id, at) = (bomb.id, bomb.coord);
    let Some(kind) = bomb.bomb else { return };
    match state.grid.place(bomb.clone(), at) {
        Ok(()) => {
            debug!(bomb = %id, %at, ?kind, "bomb activated");
            sink.on_bomb_activated(id, at, kind);
            report.dropped_bombs.push(bomb);
        }
        Err(e) => warn!(bomb = %id, "bomb not activated: {}", e),
    }
}

fn settle<S: PresentationSink>(sink: &mut S, batch: Vec<PieceId>) {
    if !batch.is_empty() {
        sink.settle(&batch);
    }
}

#[cfg(feature = "debug-tracing")]
fn trace_grid(state: &BoardState, pass: usize) {
    debug!(pass, "grid after pass\n{}", state.grid);
}

#[cfg(not(feature = "debug-tracing"))]
fn trace_grid(_state: &BoardState, _pass: usize) {}
