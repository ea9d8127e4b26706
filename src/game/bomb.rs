//! Bomb Resolver
//!
//! Decides which bomb a large match drops and how far a bomb's blast
//! reaches once it is caught in a clear.

use std::collections::BTreeSet;
use tracing::{debug, warn};

use crate::core::coord::{Coord, Direction};
use crate::game::error::{BoardError, BoardResult};
use crate::game::grid::Grid;
use crate::game::matcher::MatchSet;
use crate::game::piece::{BombKind, MatchValue, Piece, PieceFactory, PieceId};

/// Default match size at which a swap drops a bomb.
pub const DEFAULT_BOMB_THRESHOLD: usize = 4;

/// Radius of the Adjacent blast (1 = 3x3 block).
pub const ADJACENT_RADIUS: i32 = 1;

/// True for L/T shaped groups.
///
/// Some piece must share its row with another member and its column with
/// a third; a straight line never satisfies both.
pub fn is_corner_match(group: &MatchSet) -> bool {
    let cells = group.coords();
    cells.iter().any(|reference| {
        let horizontal = cells
            .iter()
            .any(|c| c.y == reference.y && c.x != reference.x);
        let vertical = cells
            .iter()
            .any(|c| c.x == reference.x && c.y != reference.y);
        horizontal && vertical
    })
}

/// Bomb kind a swap should drop for `group`, if any.
///
/// Corner shapes drop Adjacent bombs; otherwise the swap axis decides:
/// horizontal swaps drop Row bombs, vertical swaps Column bombs.
pub fn bomb_kind_for(group: &MatchSet, swap_dir: Direction, threshold: usize) -> Option<BombKind> {
    if group.len() < threshold {
        return None;
    }

    let kind = if is_corner_match(group) {
        BombKind::Adjacent
    } else if swap_dir.is_horizontal() {
        BombKind::Row
    } else {
        BombKind::Column
    };
    Some(kind)
}

/// Create the bomb a swap endpoint earns.
///
/// `value` is the colour of the other swapped piece, which now sits at
/// `at`. The bomb is not placed on the grid here; it is activated once
/// the clear that spawned it has finished.
pub fn drop_bomb(
    factory: &mut PieceFactory,
    at: Coord,
    swap_dir: Direction,
    group: &MatchSet,
    value: MatchValue,
    threshold: usize,
) -> Option<Piece> {
    let kind = bomb_kind_for(group, swap_dir, threshold)?;
    let bomb = factory.make_bomb(at, value, kind);
    debug!(bomb = %bomb.id, %at, ?kind, size = group.len(), "bomb dropped");
    Some(bomb)
}

/// Pieces a bomb clears when it goes off.
///
/// Row and Column cover the whole line; Adjacent covers the 3x3 block
/// clipped to the grid. Color bombs have no policy and report
/// `UnimplementedBombKind`. A plain piece has an empty blast.
pub fn expand_bomb_effect(grid: &Grid, bomb: &Piece) -> BoardResult<MatchSet> {
    let mut affected = MatchSet::new();
    let Some(kind) = bomb.bomb else {
        return Ok(affected);
    };
    let origin = bomb.coord;

    let cells: Vec<Coord> = match kind {
        BombKind::Row => (0..grid.width()).map(|x| Coord::new(x, origin.y)).collect(),
        BombKind::Column => (0..grid.height()).map(|y| Coord::new(origin.x, y)).collect(),
        BombKind::Adjacent => {
            let mut cells = Vec::with_capacity(9);
            for x in origin.x - ADJACENT_RADIUS..=origin.x + ADJACENT_RADIUS {
                for y in origin.y - ADJACENT_RADIUS..=origin.y + ADJACENT_RADIUS {
                    cells.push(Coord::new(x, y));
                }
            }
            cells
        }
        BombKind::Color => return Err(BoardError::UnimplementedBombKind(kind)),
    };

    for at in cells {
        if let Some(piece) = grid.piece_at(at) {
            affected.insert(piece);
        }
    }
    Ok(affected)
}

/// A bomb that went off during a clear pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Detonation {
    /// Bomb piece
    pub bomb: PieceId,
    /// Where it went off
    pub at: Coord,
    /// Blast pattern
    pub kind: BombKind,
    /// Pieces in the blast (bomb included)
    pub affected: usize,
}

/// Grow `working` with the blast of every bomb it contains.
///
/// Bombs caught in a blast go off as well, until no new bomb joins.
/// Bombs without a policy log a warning and clear nothing extra.
pub fn expand_with_bombs(grid: &Grid, working: &mut MatchSet) -> Vec<Detonation> {
    let mut detonated: BTreeSet<PieceId> = BTreeSet::new();
    let mut detonations = Vec::new();

    loop {
        let pending: Vec<&Piece> = working
            .iter()
            .filter(|(id, _)| !detonated.contains(id))
            .filter_map(|(_, at)| grid.piece_at(at))
            .filter(|piece| piece.is_bomb())
            .collect();

        if pending.is_empty() {
            break;
        }

        for bomb in pending {
            detonated.insert(bomb.id);
            let Some(kind) = bomb.bomb else { continue };

            match expand_bomb_effect(grid, bomb) {
                Ok(blast) => {
                    detonations.push(Detonation {
                        bomb: bomb.id,
                        at: bomb.coord,
                        kind,
                        affected: blast.len(),
                    });
                    working.union_with(&blast);
                }
                Err(e) => {
                    warn!(bomb = %bomb.id, at = %bomb.coord, "{}", e);
                    detonations.push(Detonation {
                        bomb: bomb.id,
                        at: bomb.coord,
                        kind,
                        affected: 0,
                    });
                }
            }
        }
    }

    detonations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::matcher::MatchFinder;

    fn group_of(grid: &Grid, at: Coord) -> MatchSet {
        MatchFinder::new(grid, 3).matches_at(at)
    }

    fn set_bomb(grid: &mut Grid, at: Coord, kind: BombKind) {
        let piece = grid.piece_at_mut(at).unwrap();
        piece.bomb = Some(kind);
    }

    #[test]
    fn test_corner_match_detection() {
        let corner = Grid::from_ascii(&[
            "b..",
            "b..",
            "bbb",
        ]);
        assert!(is_corner_match(&group_of(&corner, Coord::new(0, 0))));

        let tee = Grid::from_ascii(&[
            "bbb",
            ".b.",
            ".b.",
        ]);
        assert!(is_corner_match(&group_of(&tee, Coord::new(1, 2))));

        let line = Grid::from_ascii(&["bbbb"]);
        assert!(!is_corner_match(&group_of(&line, Coord::new(0, 0))));
    }

    #[test]
    fn test_three_match_drops_no_bomb() {
        let grid = Grid::from_ascii(&["bbb"]);
        let group = group_of(&grid, Coord::new(0, 0));
        assert_eq!(bomb_kind_for(&group, Direction::Right, DEFAULT_BOMB_THRESHOLD), None);
    }

    #[test]
    fn test_bomb_policy_by_shape_and_swap_axis() {
        let line = Grid::from_ascii(&["bbbb"]);
        let group = group_of(&line, Coord::new(0, 0));
        assert_eq!(bomb_kind_for(&group, Direction::Left, 4), Some(BombKind::Row));
        assert_eq!(bomb_kind_for(&group, Direction::Up, 4), Some(BombKind::Column));

        let corner = Grid::from_ascii(&[
            "b..",
            "b..",
            "bbb",
        ]);
        let group = group_of(&corner, Coord::new(0, 0));
        assert_eq!(bomb_kind_for(&group, Direction::Right, 4), Some(BombKind::Adjacent));
        assert_eq!(bomb_kind_for(&group, Direction::Down, 4), Some(BombKind::Adjacent));
    }

    #[test]
    fn test_drop_bomb_uses_given_colour() {
        let grid = Grid::from_ascii(&["gggg"]);
        let group = group_of(&grid, Coord::new(1, 0));
        let mut factory = PieceFactory::new();

        let bomb = drop_bomb(
            &mut factory,
            Coord::new(1, 0),
            Direction::Right,
            &group,
            MatchValue::Green,
            4,
        )
        .unwrap();
        assert_eq!(bomb.bomb, Some(BombKind::Row));
        assert_eq!(bomb.value, MatchValue::Green);
        assert_eq!(bomb.coord, Coord::new(1, 0));
        // Not on the grid yet
        assert_ne!(grid.piece_at(Coord::new(1, 0)).unwrap().id, bomb.id);
    }

    #[test]
    fn test_row_and_column_blasts() {
        let mut grid = Grid::from_ascii(&[
            "bgo",
            "pil",
            "gbo",
        ]);
        set_bomb(&mut grid, Coord::new(1, 1), BombKind::Row);
        let bomb = grid.piece_at(Coord::new(1, 1)).unwrap().clone();
        let blast = expand_bomb_effect(&grid, &bomb).unwrap();
        assert_eq!(blast.len(), 3);
        assert!(blast.coords().iter().all(|c| c.y == 1));

        set_bomb(&mut grid, Coord::new(1, 1), BombKind::Column);
        let bomb = grid.piece_at(Coord::new(1, 1)).unwrap().clone();
        let blast = expand_bomb_effect(&grid, &bomb).unwrap();
        assert_eq!(blast.len(), 3);
        assert!(blast.coords().iter().all(|c| c.x == 1));
    }

    #[test]
    fn test_adjacent_blast_is_clipped_at_edges() {
        let mut grid = Grid::from_ascii(&[
            "bgo",
            "pil",
            "gbo",
        ]);
        set_bomb(&mut grid, Coord::new(0, 0), BombKind::Adjacent);
        let bomb = grid.piece_at(Coord::new(0, 0)).unwrap().clone();
        assert_eq!(expand_bomb_effect(&grid, &bomb).unwrap().len(), 4);

        set_bomb(&mut grid, Coord::new(1, 1), BombKind::Adjacent);
        let bomb = grid.piece_at(Coord::new(1, 1)).unwrap().clone();
        assert_eq!(expand_bomb_effect(&grid, &bomb).unwrap().len(), 9);
    }

    #[test]
    fn test_blast_skips_empty_and_obstacle_cells() {
        let mut grid = Grid::from_ascii(&["b#.g"]);
        set_bomb(&mut grid, Coord::new(0, 0), BombKind::Row);
        let bomb = grid.piece_at(Coord::new(0, 0)).unwrap().clone();
        assert_eq!(expand_bomb_effect(&grid, &bomb).unwrap().len(), 2);
    }

    #[test]
    fn test_color_bomb_is_an_explicit_gap() {
        let mut grid = Grid::from_ascii(&["bbb"]);
        set_bomb(&mut grid, Coord::new(0, 0), BombKind::Color);
        let bomb = grid.piece_at(Coord::new(0, 0)).unwrap().clone();

        let err = expand_bomb_effect(&grid, &bomb).unwrap_err();
        assert!(matches!(err, BoardError::UnimplementedBombKind(BombKind::Color)));

        // The cascade-side expansion swallows it and adds nothing
        let mut working = group_of(&grid, Coord::new(0, 0));
        let detonations = expand_with_bombs(&grid, &mut working);
        assert_eq!(working.len(), 3);
        assert_eq!(detonations.len(), 1);
        assert_eq!(detonations[0].affected, 0);
    }

    #[test]
    fn test_bombs_chain_through_blasts() {
        let mut grid = Grid::from_ascii(&[
            "gop",
            "ilo",
            "bbb",
        ]);
        // Row bomb in the match hits a Column bomb at (2, 0)
        set_bomb(&mut grid, Coord::new(0, 0), BombKind::Row);
        set_bomb(&mut grid, Coord::new(2, 0), BombKind::Column);

        let mut working = MatchSet::new();
        working.insert(grid.piece_at(Coord::new(0, 0)).unwrap());

        let detonations = expand_with_bombs(&grid, &mut working);
        assert_eq!(detonations.len(), 2);
        // Bottom row plus the rest of column 2
        assert_eq!(working.len(), 5);
    }
}
