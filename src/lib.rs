//! gostate: a Go rules engine.
//!
//! This crate keeps a legal, mutable Go position with incrementally
//! maintained group and liberty caches, enforces placement, capture,
//! suicide and simple ko, and reads ladders by simulation.
//!
//! ## Modules
//!
//! - [`constants`] - Board size limits and engine parameters
//! - [`board`] - Colors, points, moves and the cell grid
//! - [`groups`] - Group and liberty cache
//! - [`position`] - Rules engine (legality, move application)
//! - [`ladder`] - Ladder capture and escape reading
//! - [`symmetry`] - The eight board symmetries
//! - [`player`] - Move selection interface and match driver
//! - [`gtp`] - Go Text Protocol front end
//!
//! ## Example
//!
//! ```
//! use gostate::board::Move;
//! use gostate::position::Position;
//!
//! let mut pos = Position::new(19);
//! assert!(pos.is_legal(Move::Play((3, 3))));
//! pos.do_move(Move::Play((3, 3))).unwrap();
//! assert!(!pos.is_legal(Move::Play((3, 3))));
//! assert_eq!(pos.symmetries().len(), 8);
//! ```

pub mod board;
pub mod constants;
pub mod groups;
pub mod gtp;
pub mod ladder;
pub mod player;
pub mod position;
pub mod symmetry;
