//! Board Facade
//!
//! The public face of the engine. Owns the board state, the active
//! gesture and the presentation sink, and turns pointer input into swaps
//! and cascades.
//!
//! ## Swap flow
//!
//! 1. Reject if input is disabled, a cell is off the board, the cells are
//!    not neighbours, or either cell is empty
//! 2. Swap in the grid, report both moves, settle
//! 3. Look for matches at both cells; none means swap back and settle
//! 4. Each endpoint whose match reaches the bomb threshold drops a bomb
//!    coloured like the piece now standing there
//! 5. Run the cascade on the union of both matches

use serde::{Serialize, Deserialize};
use tracing::{debug, info, warn};

use crate::core::coord::{Coord, Direction};
use crate::core::hash::StateHash;
use crate::game::bomb::drop_bomb;
use crate::game::cascade::{resolve_cascade, CascadeReport};
use crate::game::config::{BoardConfig, LayoutEntry, LayoutKind};
use crate::game::error::{BoardError, BoardResult};
use crate::game::fill::{fill_board, FillRules};
use crate::game::grid::Grid;
use crate::game::input::{SwapGesture, SwapRejection, SwapRequest};
use crate::game::matcher::{MatchFinder, MatchSet};
use crate::game::piece::PieceId;
use crate::game::sink::{NullSink, PresentationSink};
use crate::game::state::{BoardState, CascadePhase};
use crate::game::tile::Tile;

/// Result of a swap attempt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwapOutcome {
    /// Nothing happened
    Rejected(SwapRejection),
    /// Swapped, found no match, swapped back
    Reverted,
    /// Matched and cascaded to a stable board
    Resolved(CascadeReport),
}

impl SwapOutcome {
    /// True if the swap changed the board.
    pub fn is_resolved(&self) -> bool {
        matches!(self, SwapOutcome::Resolved(_))
    }
}

/// A match-3 board.
pub struct Board<S: PresentationSink = NullSink> {
    config: BoardConfig,
    state: BoardState,
    gesture: SwapGesture,
    sink: S,
}

impl<S: PresentationSink> Board<S> {
    /// Create an empty board (no pieces) for a validated config.
    pub fn new(config: BoardConfig, sink: S) -> BoardResult<Self> {
        config.validate()?;
        let state = BoardState::new(config.width, config.height, config.seed);
        Ok(Self {
            config,
            state,
            gesture: SwapGesture::new(),
            sink,
        })
    }

    /// Create a board and set it up from the config's own layout.
    pub fn setup(config: BoardConfig, sink: S) -> BoardResult<Self> {
        let layout = config.layout.clone();
        let mut board = Self::new(config, sink)?;
        board.setup_board(&layout)?;
        Ok(board)
    }

    /// Rebuild the board: apply the layout, then fill every open slot
    /// without immediate matches.
    ///
    /// The layout is checked before anything is cleared; a bad layout
    /// leaves the current board untouched.
    pub fn setup_board(&mut self, layout: &[LayoutEntry]) -> BoardResult<()> {
        self.config.validate_layout(layout)?;

        self.state.grid = Grid::new(self.config.width, self.config.height);
        self.state.phase = CascadePhase::Idle;
        self.state.input_enabled = true;
        self.state.score = 0;
        self.gesture = SwapGesture::new();

        let mut batch = Vec::new();
        for entry in layout {
            if let Some(id) = self.apply_layout_entry(entry)? {
                batch.push(id);
            }
        }

        // Starting pieces can sit above or right of an open slot
        let rules = FillRules::from_config(&self.config).surrounding();
        batch.extend(fill_board(&mut self.state, &rules, &mut self.sink)?);
        if !batch.is_empty() {
            self.sink.settle(&batch);
        }

        let leftover = self.all_matches();
        if !leftover.is_empty() {
            warn!(matches = leftover.len(), "board starts with matches among layout pieces");
        }

        info!(
            width = self.config.width,
            height = self.config.height,
            pieces = self.state.grid.piece_count(),
            "board set up"
        );
        Ok(())
    }

    fn apply_layout_entry(&mut self, entry: &LayoutEntry) -> BoardResult<Option<PieceId>> {
        let at = entry.coord();
        let grid = &mut self.state.grid;

        match entry.kind {
            LayoutKind::Normal => {
                grid.set_tile(Tile::normal(at))?;
            }
            LayoutKind::Obstacle => {
                if let Some(evicted) = grid.set_tile(Tile::obstacle(at))? {
                    debug!(piece = %evicted.id, %at, "obstacle replaced starting piece");
                }
            }
            LayoutKind::Breakable => {
                grid.set_tile(Tile::breakable(at, entry.durability.unwrap_or(1)))?;
            }
            LayoutKind::Piece | LayoutKind::Bomb => {
                let value = entry
                    .value
                    .ok_or_else(|| BoardError::InvalidConfig(format!("layout piece at {} has no value", at)))?;
                let piece = match (entry.kind, entry.bomb) {
                    (LayoutKind::Piece, _) => self.state.factory.make(at, value),
                    (_, Some(kind)) => self.state.factory.make_bomb(at, value, kind),
                    (_, None) => {
                        return Err(BoardError::InvalidConfig(format!("layout bomb at {} has no kind", at)));
                    }
                };
                let id = piece.id;
                grid.place(piece, at)?;
                if let Some(piece) = grid.piece_at(at) {
                    let timing = &self.config.timing;
                    let drop_from = Coord::new(at.x, at.y + timing.fill_drop_offset);
                    self.sink.on_piece_spawned(piece, drop_from, timing.fill_ms);
                }
                return Ok(Some(id));
            }
        }
        Ok(None)
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Pointer pressed on a cell.
    pub fn handle_pointer_down(&mut self, at: Coord) -> bool {
        self.gesture.press(at)
    }

    /// Pointer dragged onto a cell.
    pub fn handle_pointer_enter(&mut self, at: Coord) -> bool {
        self.gesture.enter(at)
    }

    /// Pointer released. Attempts the swap if the gesture completed;
    /// the gesture is cleared either way.
    pub fn handle_pointer_up(&mut self) -> BoardResult<Option<SwapOutcome>> {
        match self.gesture.release() {
            Some(request) => self.request_swap(request.from, request.to).map(Some),
            None => Ok(None),
        }
    }

    /// Try to swap the pieces at `from` and `to`.
    pub fn request_swap(&mut self, from: Coord, to: Coord) -> BoardResult<SwapOutcome> {
        if let Some(reason) = self.check_swap(from, to) {
            debug!(%from, %to, ?reason, "swap rejected");
            return Ok(SwapOutcome::Rejected(reason));
        }
        let Some(dir) = SwapRequest::new(from, to).direction() else {
            return Ok(SwapOutcome::Rejected(SwapRejection::NotAdjacent));
        };

        self.swap_pieces(from, to)?;

        let finder = MatchFinder::new(&self.state.grid, self.config.min_match);
        let from_group = finder.matches_at(from);
        let to_group = finder.matches_at(to);

        if from_group.is_empty() && to_group.is_empty() {
            self.swap_pieces(from, to)?;
            debug!(%from, %to, "no match, swap reverted");
            return Ok(SwapOutcome::Reverted);
        }

        let mut bombs = Vec::new();
        for (at, group) in [(from, &from_group), (to, &to_group)] {
            let Some(value) = self.state.grid.piece_at(at).map(|p| p.value) else {
                continue;
            };
            let threshold = self.config.bomb_threshold;
            if let Some(bomb) = drop_bomb(&mut self.state.factory, at, dir, group, value, threshold) {
                bombs.push(bomb);
            }
        }

        let mut working = from_group;
        working.union_with(&to_group);
        debug!(%from, %to, matched = working.len(), bombs = bombs.len(), "swap matched");

        let report = resolve_cascade(&mut self.state, &self.config, working, bombs, &mut self.sink)?;
        Ok(SwapOutcome::Resolved(report))
    }

    fn check_swap(&self, from: Coord, to: Coord) -> Option<SwapRejection> {
        let grid = &self.state.grid;
        if !self.state.input_enabled {
            return Some(SwapRejection::InputDisabled);
        }
        if !grid.is_within_bounds(from) || !grid.is_within_bounds(to) {
            return Some(SwapRejection::OutOfBounds);
        }
        if !from.is_adjacent(to) {
            return Some(SwapRejection::NotAdjacent);
        }
        for at in [from, to] {
            if grid.piece_at(at).is_none() {
                warn!("{}", BoardError::InvalidPiece(at));
                return Some(SwapRejection::EmptySlot);
            }
        }
        None
    }

    /// Exchange two pieces and wait for both to arrive.
    fn swap_pieces(&mut self, a: Coord, b: Coord) -> BoardResult<()> {
        self.state.grid.swap(a, b)?;

        let duration = self.config.timing.swap_ms;
        let mut batch = Vec::with_capacity(2);
        for (from, to) in [(b, a), (a, b)] {
            if let Some(id) = self.state.grid.piece_at(to).map(|p| p.id) {
                self.sink.on_piece_moved(id, from, to, duration);
                batch.push(id);
            }
        }
        self.sink.settle(&batch);
        Ok(())
    }

    // =========================================================================
    // Maintenance
    // =========================================================================

    /// Remove every piece. Returns how many were removed.
    pub fn clear_board(&mut self) -> usize {
        let cleared = self.state.grid.clear_pieces();
        for piece in &cleared {
            self.sink.on_piece_cleared(piece.coord);
        }
        debug!(count = cleared.len(), "board cleared");
        cleared.len()
    }

    /// Fill empty slots under the no-immediate-match rule.
    pub fn refill(&mut self) -> BoardResult<Vec<PieceId>> {
        let rules = FillRules::from_config(&self.config);
        let spawned = fill_board(&mut self.state, &rules, &mut self.sink)?;
        if !spawned.is_empty() {
            self.sink.settle(&spawned);
        }
        Ok(spawned)
    }

    /// Allow or block swaps (e.g. while the host shows a menu).
    pub fn set_input_enabled(&mut self, enabled: bool) {
        self.state.input_enabled = enabled;
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Pieces in any match through `at`.
    pub fn matches_at(&self, at: Coord) -> MatchSet {
        MatchFinder::new(&self.state.grid, self.config.min_match).matches_at(at)
    }

    /// Every match on the board.
    pub fn all_matches(&self) -> MatchSet {
        MatchFinder::new(&self.state.grid, self.config.min_match).all_matches()
    }

    /// First swap (scanning column-major) that would make a match.
    pub fn find_swap(&self) -> Option<SwapRequest> {
        let grid = &self.state.grid;
        for from in grid.coords() {
            for dir in [Direction::Right, Direction::Up] {
                let to = from.step(dir, 1);
                if grid.piece_at(from).is_none() || grid.piece_at(to).is_none() {
                    continue;
                }

                let mut probe = grid.clone();
                if probe.swap(from, to).is_err() {
                    continue;
                }
                let finder = MatchFinder::new(&probe, self.config.min_match);
                if !finder.matches_at(from).is_empty() || !finder.matches_at(to).is_empty() {
                    return Some(SwapRequest::new(from, to));
                }
            }
        }
        None
    }

    /// State hash for comparing boards.
    pub fn compute_hash(&self) -> StateHash {
        self.state.compute_hash()
    }

    /// Current score.
    pub fn score(&self) -> u64 {
        self.state.score
    }

    /// Current cascade phase.
    pub fn phase(&self) -> CascadePhase {
        self.state.phase
    }

    /// True while swaps are accepted.
    pub fn is_input_enabled(&self) -> bool {
        self.state.input_enabled
    }

    /// Tiles and pieces.
    pub fn grid(&self) -> &Grid {
        &self.state.grid
    }

    /// Full board state.
    pub fn state(&self) -> &BoardState {
        &self.state
    }

    /// Configuration.
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Gesture in progress.
    pub fn gesture(&self) -> &SwapGesture {
        &self.gesture
    }

    /// Presentation sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Presentation sink, mutably.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consume the board, returning its sink.
    pub fn into_sink(self) -> S {
        self.sink
    }
}
