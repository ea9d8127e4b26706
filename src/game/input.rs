//! Swap Gesture
//!
//! Press, drag, release. Press selects a cell, dragging onto an orthogonal
//! neighbour picks the swap target, release hands back the swap (if both
//! ends were chosen) and always clears the gesture.

use serde::{Serialize, Deserialize};

use crate::core::coord::{Coord, Direction};

/// A requested exchange of two cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapRequest {
    /// Cell the gesture started on
    pub from: Coord,
    /// Neighbour it was dragged to
    pub to: Coord,
}

impl SwapRequest {
    /// Create a request.
    pub fn new(from: Coord, to: Coord) -> Self {
        Self { from, to }
    }

    /// Swap direction (`to - from`), None if the cells are not adjacent.
    pub fn direction(&self) -> Option<Direction> {
        Direction::between(self.from, self.to)
    }
}

/// Why a swap was not attempted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapRejection {
    /// A cascade is running or the host disabled input
    InputDisabled,
    /// A cell lies outside the grid
    OutOfBounds,
    /// Cells are not orthogonal neighbours
    NotAdjacent,
    /// A cell holds no piece
    EmptySlot,
}

/// Gesture in progress.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapGesture {
    selected: Option<Coord>,
    target: Option<Coord>,
}

impl SwapGesture {
    /// Create an idle gesture.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer pressed on `at`. Ignored while a cell is already selected.
    pub fn press(&mut self, at: Coord) -> bool {
        if self.selected.is_some() {
            return false;
        }
        self.selected = Some(at);
        true
    }

    /// Pointer dragged onto `at`. Recorded only next to the selection.
    pub fn enter(&mut self, at: Coord) -> bool {
        match self.selected {
            Some(selected) if selected.is_adjacent(at) => {
                self.target = Some(at);
                true
            }
            _ => false,
        }
    }

    /// Pointer released: the completed swap, if any. Always resets.
    pub fn release(&mut self) -> Option<SwapRequest> {
        let request = match (self.selected, self.target) {
            (Some(from), Some(to)) => Some(SwapRequest::new(from, to)),
            _ => None,
        };
        *self = Self::default();
        request
    }

    /// Selected cell.
    pub fn selected(&self) -> Option<Coord> {
        self.selected
    }

    /// Target cell.
    pub fn target(&self) -> Option<Coord> {
        self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_gesture() {
        let mut gesture = SwapGesture::new();
        assert!(gesture.press(Coord::new(2, 2)));
        assert!(gesture.enter(Coord::new(3, 2)));

        let request = gesture.release().unwrap();
        assert_eq!(request, SwapRequest::new(Coord::new(2, 2), Coord::new(3, 2)));
        assert_eq!(request.direction(), Some(Direction::Right));
        assert_eq!(gesture, SwapGesture::default());
    }

    #[test]
    fn test_second_press_keeps_first_selection() {
        let mut gesture = SwapGesture::new();
        gesture.press(Coord::new(0, 0));
        assert!(!gesture.press(Coord::new(5, 5)));
        assert_eq!(gesture.selected(), Some(Coord::new(0, 0)));
    }

    #[test]
    fn test_diagonal_and_distant_targets_ignored() {
        let mut gesture = SwapGesture::new();
        gesture.press(Coord::new(2, 2));
        assert!(!gesture.enter(Coord::new(3, 3)));
        assert!(!gesture.enter(Coord::new(4, 2)));
        assert!(!gesture.enter(Coord::new(2, 2)));
        assert_eq!(gesture.target(), None);
    }

    #[test]
    fn test_drag_without_press_is_ignored() {
        let mut gesture = SwapGesture::new();
        assert!(!gesture.enter(Coord::new(1, 0)));
        assert_eq!(gesture.release(), None);
    }

    #[test]
    fn test_release_without_target_clears_selection() {
        let mut gesture = SwapGesture::new();
        gesture.press(Coord::new(1, 1));
        assert_eq!(gesture.release(), None);
        assert_eq!(gesture.selected(), None);

        // Fresh press works again
        assert!(gesture.press(Coord::new(4, 4)));
    }

    #[test]
    fn test_later_drag_replaces_target() {
        let mut gesture = SwapGesture::new();
        gesture.press(Coord::new(2, 2));
        gesture.enter(Coord::new(2, 3));
        gesture.enter(Coord::new(1, 2));
        assert_eq!(gesture.release().unwrap().to, Coord::new(1, 2));
    }
}
