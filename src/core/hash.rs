//! State Hashing for Verification
//!
//! Deterministic hashing of board state, used to compare boards after
//! replays and to check that rejected swaps leave no trace.

use sha2::{Sha256, Digest};

use super::coord::Coord;

/// Hash output type (256 bits / 32 bytes)
pub type StateHash = [u8; 32];

/// Deterministic hasher for board state.
///
/// Wraps SHA-256 with helpers for board primitives.
/// Order of updates is critical for determinism.
pub struct StateHasher {
    hasher: Sha256,
}

impl StateHasher {
    /// Create a new hasher with domain separator.
    pub fn new(domain: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        Self { hasher }
    }

    /// Create hasher for board state.
    pub fn for_board_state() -> Self {
        Self::new(b"MATCH3_BOARD_V1")
    }

    /// Update with a u8 value.
    #[inline]
    pub fn update_u8(&mut self, value: u8) {
        self.hasher.update([value]);
    }

    /// Update with a u32 value (little-endian).
    #[inline]
    pub fn update_u32(&mut self, value: u32) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with a u64 value (little-endian).
    #[inline]
    pub fn update_u64(&mut self, value: u64) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with an i32 value (little-endian).
    #[inline]
    pub fn update_i32(&mut self, value: i32) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with a grid coordinate.
    #[inline]
    pub fn update_coord(&mut self, value: Coord) {
        self.update_i32(value.x);
        self.update_i32(value.y);
    }

    /// Update with a boolean.
    #[inline]
    pub fn update_bool(&mut self, value: bool) {
        self.update_u8(value as u8);
    }

    /// Finalize and return the hash.
    pub fn finalize(self) -> StateHash {
        self.hasher.finalize().into()
    }
}

/// Compute state hash for a board.
///
/// Called by `Board::compute_hash()`; the closure adds the grid contents.
pub fn compute_state_hash<F>(width: i32, height: i32, add_state: F) -> StateHash
where
    F: FnOnce(&mut StateHasher),
{
    let mut hasher = StateHasher::for_board_state();

    // Dimensions first so differently shaped boards never collide
    hasher.update_i32(width);
    hasher.update_i32(height);

    add_state(&mut hasher);

    hasher.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_deterministic() {
        let a = compute_state_hash(8, 8, |h| h.update_coord(Coord::new(1, 2)));
        let b = compute_state_hash(8, 8, |h| h.update_coord(Coord::new(1, 2)));
        assert_eq!(a, b);
    }

    #[test]
    fn test_hash_depends_on_dimensions_and_content() {
        let base = compute_state_hash(8, 8, |h| h.update_u8(1));
        assert_ne!(base, compute_state_hash(8, 9, |h| h.update_u8(1)));
        assert_ne!(base, compute_state_hash(8, 8, |h| h.update_u8(2)));
    }

    #[test]
    fn test_update_order_matters() {
        let ab = compute_state_hash(4, 4, |h| {
            h.update_u32(1);
            h.update_u32(2);
        });
        let ba = compute_state_hash(4, 4, |h| {
            h.update_u32(2);
            h.update_u32(1);
        });
        assert_ne!(ab, ba);
    }
}
