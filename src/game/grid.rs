//! Grid Model
//!
//! Storage for tiles and pieces plus bounds checks. No game rules live
//! here; every change to board topology goes through these methods.
//! Storage is flat and column-major (`x * height + y`).

use std::fmt;
use serde::{Serialize, Deserialize};

use crate::core::coord::Coord;
use crate::game::error::{BoardError, BoardResult};
use crate::game::piece::Piece;
use crate::game::tile::{Tile, TileKind};

/// Tiles and pieces of one board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
    pieces: Vec<Option<Piece>>,
}

impl Grid {
    /// Create a grid of Normal tiles with no pieces.
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        let cells = width as usize * height as usize;
        let mut tiles = Vec::with_capacity(cells);
        for x in 0..width {
            for y in 0..height {
                tiles.push(Tile::normal(Coord::new(x, y)));
            }
        }

        Self {
            width,
            height,
            tiles,
            pieces: vec![None; cells],
        }
    }

    /// Grid width.
    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Grid height.
    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Flat index, None when out of bounds.
    #[inline]
    fn index(&self, at: Coord) -> Option<usize> {
        if self.is_within_bounds(at) {
            Some((at.x * self.height + at.y) as usize)
        } else {
            None
        }
    }

    fn checked_index(&self, at: Coord) -> BoardResult<usize> {
        self.index(at).ok_or(BoardError::OutOfBounds {
            at,
            width: self.width,
            height: self.height,
        })
    }

    /// True if `at` lies in [0, width) x [0, height).
    #[inline]
    pub fn is_within_bounds(&self, at: Coord) -> bool {
        at.x >= 0 && at.x < self.width && at.y >= 0 && at.y < self.height
    }

    // =========================================================================
    // Tiles
    // =========================================================================

    /// Tile at `at`, if in bounds.
    pub fn tile_at(&self, at: Coord) -> Option<&Tile> {
        self.index(at).map(|i| &self.tiles[i])
    }

    /// Mutable tile at `at`, if in bounds.
    pub fn tile_at_mut(&mut self, at: Coord) -> Option<&mut Tile> {
        match self.index(at) {
            Some(i) => Some(&mut self.tiles[i]),
            None => None,
        }
    }

    /// Replace the tile at its own coordinate.
    ///
    /// Turning a cell into an obstacle evicts any piece standing on it.
    pub fn set_tile(&mut self, tile: Tile) -> BoardResult<Option<Piece>> {
        let idx = self.checked_index(tile.coord)?;
        let evicted = if tile.kind == TileKind::Obstacle {
            self.pieces[idx].take()
        } else {
            None
        };
        self.tiles[idx] = tile;
        Ok(evicted)
    }

    /// All tiles in column-major order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    // =========================================================================
    // Pieces
    // =========================================================================

    /// Piece at `at`, if any.
    pub fn piece_at(&self, at: Coord) -> Option<&Piece> {
        self.index(at).and_then(|i| self.pieces[i].as_ref())
    }

    /// Mutable piece at `at`, if any.
    pub fn piece_at_mut(&mut self, at: Coord) -> Option<&mut Piece> {
        match self.index(at) {
            Some(i) => self.pieces[i].as_mut(),
            None => None,
        }
    }

    /// True if `at` is in bounds, holds no piece and is not an obstacle.
    pub fn is_open_slot(&self, at: Coord) -> bool {
        match self.index(at) {
            Some(i) => self.pieces[i].is_none() && self.tiles[i].can_hold_piece(),
            None => false,
        }
    }

    /// Put a piece at `at`, rewriting its stored coordinate.
    ///
    /// Whatever piece occupied the slot is dropped; callers clear first.
    pub fn place(&mut self, mut piece: Piece, at: Coord) -> BoardResult<()> {
        let idx = self.checked_index(at)?;
        if !self.tiles[idx].can_hold_piece() {
            return Err(BoardError::ObstacleSlot(at));
        }
        piece.coord = at;
        self.pieces[idx] = Some(piece);
        Ok(())
    }

    /// Remove and return the piece at `at`.
    pub fn take(&mut self, at: Coord) -> Option<Piece> {
        match self.index(at) {
            Some(i) => self.pieces[i].take(),
            None => None,
        }
    }

    /// Move the piece at `from` to `to`, overwriting the destination.
    pub fn move_piece(&mut self, from: Coord, to: Coord) -> BoardResult<()> {
        self.checked_index(to)?;
        let piece = self.take(from).ok_or(BoardError::InvalidPiece(from))?;
        self.place(piece, to)
    }

    /// Exchange the pieces at `a` and `b`.
    ///
    /// Both slots must hold a piece; on error the grid is unchanged.
    pub fn swap(&mut self, a: Coord, b: Coord) -> BoardResult<()> {
        let ia = self.checked_index(a)?;
        let ib = self.checked_index(b)?;
        if self.pieces[ia].is_none() {
            return Err(BoardError::InvalidPiece(a));
        }
        if self.pieces[ib].is_none() {
            return Err(BoardError::InvalidPiece(b));
        }

        self.pieces.swap(ia, ib);
        if let Some(p) = self.pieces[ia].as_mut() {
            p.coord = a;
        }
        if let Some(p) = self.pieces[ib].as_mut() {
            p.coord = b;
        }
        Ok(())
    }

    /// All pieces in column-major order.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.iter().flatten()
    }

    /// Number of pieces on the board.
    pub fn piece_count(&self) -> usize {
        self.pieces.iter().filter(|p| p.is_some()).count()
    }

    /// Remove every piece, returning them in column-major order.
    pub fn clear_pieces(&mut self) -> Vec<Piece> {
        self.pieces.iter_mut().filter_map(Option::take).collect()
    }

    /// Every coordinate, column by column, bottom to top.
    pub fn coords(&self) -> impl Iterator<Item = Coord> {
        let height = self.height;
        (0..self.width).flat_map(move |x| (0..height).map(move |y| Coord::new(x, y)))
    }

    /// Build a grid from ASCII rows, top row first (the `Display` format).
    ///
    /// Piece ids are assigned column-major starting at 0.
    #[cfg(test)]
    pub(crate) fn from_ascii(rows: &[&str]) -> Self {
        use crate::game::piece::{MatchValue, PieceId};

        let height = rows.len() as i32;
        let width = rows.first().map(|r| r.chars().count()).unwrap_or(0) as i32;
        let mut grid = Grid::new(width, height);
        let cells: Vec<Vec<char>> = rows.iter().map(|r| r.chars().collect()).collect();

        let mut next_id = 0;
        for x in 0..width {
            for y in 0..height {
                let at = Coord::new(x, y);
                let c = cells[(height - 1 - y) as usize][x as usize];
                match c {
                    '#' => {
                        grid.set_tile(Tile::obstacle(at)).unwrap();
                    }
                    '*' => {
                        grid.set_tile(Tile::breakable(at, 1)).unwrap();
                    }
                    '.' => {}
                    _ => {
                        let value = MatchValue::from_glyph(c).expect("unknown glyph");
                        grid.place(Piece::new(PieceId(next_id), at, value), at).unwrap();
                        next_id += 1;
                    }
                }
            }
        }
        grid
    }
}

impl fmt::Display for Grid {
    /// Rows top to bottom: `#` obstacle, `.` empty, `*` empty breakable,
    /// lower-case glyph for pieces, upper-case for bombs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (0..self.height).rev() {
            for x in 0..self.width {
                let at = Coord::new(x, y);
                let c = match (self.tile_at(at).map(|t| t.kind), self.piece_at(at)) {
                    (Some(TileKind::Obstacle), _) => '#',
                    (_, Some(piece)) => piece.glyph(),
                    (Some(TileKind::Breakable), None) => '*',
                    _ => '.',
                };
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::piece::{MatchValue, PieceId};

    fn piece(id: u32, value: MatchValue) -> Piece {
        Piece::new(PieceId(id), Coord::new(-1, -1), value)
    }

    #[test]
    fn test_bounds() {
        let grid = Grid::new(4, 3);
        assert!(grid.is_within_bounds(Coord::new(0, 0)));
        assert!(grid.is_within_bounds(Coord::new(3, 2)));
        assert!(!grid.is_within_bounds(Coord::new(4, 0)));
        assert!(!grid.is_within_bounds(Coord::new(0, 3)));
        assert!(!grid.is_within_bounds(Coord::new(-1, 0)));
        assert!(grid.tile_at(Coord::new(4, 0)).is_none());
        assert!(grid.piece_at(Coord::new(0, -1)).is_none());
    }

    #[test]
    fn test_place_rewrites_coord() {
        let mut grid = Grid::new(4, 4);
        grid.place(piece(1, MatchValue::Blue), Coord::new(2, 3)).unwrap();

        let placed = grid.piece_at(Coord::new(2, 3)).unwrap();
        assert_eq!(placed.coord, Coord::new(2, 3));
        assert_eq!(placed.id, PieceId(1));
    }

    #[test]
    fn test_place_out_of_bounds_fails() {
        let mut grid = Grid::new(4, 4);
        let err = grid.place(piece(1, MatchValue::Blue), Coord::new(4, 0)).unwrap_err();
        assert!(matches!(err, BoardError::OutOfBounds { .. }));
        assert_eq!(grid.piece_count(), 0);
    }

    #[test]
    fn test_place_overwrites_silently() {
        let mut grid = Grid::new(4, 4);
        let at = Coord::new(1, 1);
        grid.place(piece(1, MatchValue::Blue), at).unwrap();
        grid.place(piece(2, MatchValue::Pink), at).unwrap();

        assert_eq!(grid.piece_at(at).unwrap().id, PieceId(2));
        assert_eq!(grid.piece_count(), 1);
    }

    #[test]
    fn test_obstacle_rejects_piece() {
        let mut grid = Grid::new(4, 4);
        let at = Coord::new(0, 0);
        grid.set_tile(Tile::obstacle(at)).unwrap();

        let err = grid.place(piece(1, MatchValue::Blue), at).unwrap_err();
        assert!(matches!(err, BoardError::ObstacleSlot(_)));
        assert!(!grid.is_open_slot(at));
    }

    #[test]
    fn test_swap_and_swap_back_restores_grid() {
        let mut grid = Grid::new(4, 4);
        grid.place(piece(1, MatchValue::Blue), Coord::new(0, 0)).unwrap();
        grid.place(piece(2, MatchValue::Green), Coord::new(1, 0)).unwrap();
        let before = grid.clone();

        grid.swap(Coord::new(0, 0), Coord::new(1, 0)).unwrap();
        assert_eq!(grid.piece_at(Coord::new(0, 0)).unwrap().id, PieceId(2));
        assert_eq!(grid.piece_at(Coord::new(0, 0)).unwrap().coord, Coord::new(0, 0));

        grid.swap(Coord::new(0, 0), Coord::new(1, 0)).unwrap();
        assert_eq!(grid, before);
    }

    #[test]
    fn test_swap_with_empty_slot_is_rejected() {
        let mut grid = Grid::new(4, 4);
        grid.place(piece(1, MatchValue::Blue), Coord::new(0, 0)).unwrap();
        let before = grid.clone();

        let err = grid.swap(Coord::new(0, 0), Coord::new(1, 0)).unwrap_err();
        assert!(matches!(err, BoardError::InvalidPiece(_)));
        assert_eq!(grid, before);
    }

    #[test]
    fn test_move_piece_from_empty_slot() {
        let mut grid = Grid::new(4, 4);
        let err = grid.move_piece(Coord::new(0, 0), Coord::new(0, 1)).unwrap_err();
        assert!(matches!(err, BoardError::InvalidPiece(_)));
    }

    #[test]
    fn test_from_ascii_matches_display() {
        let rows = ["bg#", "p.i"];
        let grid = Grid::from_ascii(&rows);
        assert_eq!(grid.to_string(), "bg#\np.i\n");
        assert_eq!(grid.piece_at(Coord::new(0, 1)).unwrap().value, MatchValue::Blue);
        assert_eq!(grid.piece_at(Coord::new(0, 0)).unwrap().value, MatchValue::Pink);
    }

    #[test]
    fn test_display() {
        let mut grid = Grid::new(3, 2);
        grid.set_tile(Tile::obstacle(Coord::new(2, 1))).unwrap();
        grid.set_tile(Tile::breakable(Coord::new(1, 0), 1)).unwrap();
        grid.place(piece(1, MatchValue::Blue), Coord::new(0, 0)).unwrap();

        assert_eq!(grid.to_string(), "..#\nb*.\n");
    }
}
