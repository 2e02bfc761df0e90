//! Constants for board dimensions, ladder reading and self-play.
//!
//! Board size is a runtime property of a [`Position`](crate::position::Position);
//! the values here are defaults and hard limits.

// =============================================================================
// Board Geometry
// =============================================================================

/// Default board size (NxN).
pub const DEFAULT_SIZE: usize = 19;

/// Smallest legal board.
pub const MIN_SIZE: usize = 1;

/// Largest board addressable with GTP vertex letters (A-Z without I).
pub const MAX_SIZE: usize = 25;

/// Column letters used by GTP vertices. 'I' is skipped to avoid confusion with 'J'.
pub const COLUMN_LETTERS: &[u8; 25] = b"ABCDEFGHJKLMNOPQRSTUVWXYZ";

// =============================================================================
// Ladder Reading
// =============================================================================

/// Number of diagonal hunter re-ataris the default ladder reader simulates
/// before accepting the chase as a capture.
pub const LADDER_HORIZON: usize = 1;

// =============================================================================
// Game Parameters
// =============================================================================

/// Komi (compensation points for White) reported by the GTP front end.
pub const DEFAULT_KOMI: f32 = 7.5;

/// Self-play stops after `MAX_GAME_LEN_FACTOR * N * N` turns.
pub const MAX_GAME_LEN_FACTOR: usize = 3;

/// Maximum game length for a board of the given size.
pub const fn max_game_len(size: usize) -> usize {
    size * size * MAX_GAME_LEN_FACTOR
}
