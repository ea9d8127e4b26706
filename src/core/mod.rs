//! Core deterministic primitives.
//!
//! Coordinates, the seeded RNG and state hashing. Nothing here knows
//! about match-3 rules.

pub mod coord;
pub mod rng;
pub mod hash;

// Re-export core types
pub use coord::{Coord, Direction};
pub use rng::DeterministicRng;
pub use hash::{compute_state_hash, StateHash};
