//! Match Finder
//!
//! Linear scans from an origin cell, combined per axis into matches of
//! at least `min_match` same-coloured pieces. Results are keyed by piece
//! identity, so the same piece reached from two axes or two origins is
//! counted once.

use std::collections::{BTreeMap, BTreeSet};

use crate::core::coord::{Coord, Direction};
use crate::game::grid::Grid;
use crate::game::piece::{Piece, PieceId};

/// Shortest run a directional half may contribute to an axis match
/// (the origin plus one neighbour).
pub const HALF_RUN_MIN: usize = 2;

// =============================================================================
// RUN
// =============================================================================

/// A straight run of same-coloured pieces, origin first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Run {
    cells: Vec<(PieceId, Coord)>,
}

impl Run {
    /// Number of pieces, origin included.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false: a run holds at least its origin.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Pieces in scan order.
    pub fn cells(&self) -> &[(PieceId, Coord)] {
        &self.cells
    }
}

// =============================================================================
// MATCH SET
// =============================================================================

/// Deduplicated set of matched pieces with the cell each was found at.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchSet {
    pieces: BTreeMap<PieceId, Coord>,
}

impl MatchSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a piece at its current cell.
    pub fn insert(&mut self, piece: &Piece) {
        self.pieces.insert(piece.id, piece.coord);
    }

    /// Add every piece of a run.
    pub fn extend_run(&mut self, run: &Run) {
        self.pieces.extend(run.cells.iter().copied());
    }

    /// Union another set into this one.
    pub fn union_with(&mut self, other: &MatchSet) {
        self.pieces.extend(other.pieces.iter().map(|(id, at)| (*id, *at)));
    }

    /// Number of distinct pieces.
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    /// True when nothing matched.
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// True if the piece is part of the set.
    pub fn contains(&self, id: PieceId) -> bool {
        self.pieces.contains_key(&id)
    }

    /// (id, cell) pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (PieceId, Coord)> + '_ {
        self.pieces.iter().map(|(id, at)| (*id, *at))
    }

    /// Cells of every piece, in id order.
    pub fn coords(&self) -> Vec<Coord> {
        self.pieces.values().copied().collect()
    }

    /// Distinct columns touched by the set.
    pub fn columns(&self) -> BTreeSet<i32> {
        self.pieces.values().map(|at| at.x).collect()
    }
}

// =============================================================================
// MATCH FINDER
// =============================================================================

/// Read-only match queries over a grid.
pub struct MatchFinder<'a> {
    grid: &'a Grid,
    min_match: usize,
}

impl<'a> MatchFinder<'a> {
    /// Create a finder for `grid` with the given minimum match length.
    pub fn new(grid: &'a Grid, min_match: usize) -> Self {
        Self { grid, min_match }
    }

    /// Walk from `origin` along `dir` collecting pieces that match the
    /// origin piece.
    ///
    /// Stops at the first mismatch, empty slot or edge, after at most
    /// `max(width, height) - 1` steps. Returns None when the origin is
    /// empty or the run is shorter than `threshold`; a returned run is
    /// never empty.
    pub fn scan_direction(&self, origin: Coord, dir: Direction, threshold: usize) -> Option<Run> {
        let start = self.grid.piece_at(origin)?;
        let max_steps = self.grid.width().max(self.grid.height()) - 1;

        let mut cells = vec![(start.id, origin)];
        for step in 1..=max_steps {
            let next = origin.step(dir, step);
            match self.grid.piece_at(next) {
                Some(piece) if piece.matches(start) => cells.push((piece.id, next)),
                _ => break,
            }
        }

        if cells.len() >= threshold {
            Some(Run { cells })
        } else {
            None
        }
    }

    /// Combine two opposite half-runs through `at` into one axis match.
    fn axis_match(&self, at: Coord, a: Direction, b: Direction) -> MatchSet {
        let mut combined = MatchSet::new();
        for dir in [a, b] {
            if let Some(run) = self.scan_direction(at, dir, HALF_RUN_MIN) {
                combined.extend_run(&run);
            }
        }

        if combined.len() >= self.min_match {
            combined
        } else {
            MatchSet::new()
        }
    }

    /// Every piece in a horizontal or vertical match through `at`.
    pub fn matches_at(&self, at: Coord) -> MatchSet {
        let mut matches = self.axis_match(at, Direction::Left, Direction::Right);
        matches.union_with(&self.axis_match(at, Direction::Up, Direction::Down));
        matches
    }

    /// Union of `matches_at` over several cells.
    pub fn matches_among<I>(&self, cells: I) -> MatchSet
    where
        I: IntoIterator<Item = Coord>,
    {
        let mut matches = MatchSet::new();
        for at in cells {
            matches.union_with(&self.matches_at(at));
        }
        matches
    }

    /// Every match on the board.
    pub fn all_matches(&self) -> MatchSet {
        self.matches_among(self.grid.coords())
    }

    /// True if the piece at `at` completes a match with already settled
    /// neighbours to its left or below (the fill order's look-behind).
    pub fn matches_on_fill(&self, at: Coord) -> bool {
        self.scan_direction(at, Direction::Left, self.min_match).is_some()
            || self.scan_direction(at, Direction::Down, self.min_match).is_some()
    }
}
