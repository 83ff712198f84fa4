//! gridboard: a board-game rules engine for N×N grids.
//!
//! The crate tracks which piece stands on which square and computes, for each
//! piece kind, the squares it can reach or attack given the current
//! occupancy. Rendering is left to the caller: the board hands out square
//! colors, highlight fills, and geometry, and never draws anything.
//!
//! ## Modules
//!
//! - [`constants`] - Defaults and direction/offset tables
//! - [`position`] - Board coordinates
//! - [`color`] - RGBA colors and highlight compositing
//! - [`piece`] - Piece kinds and piece instances
//! - [`rules`] - Move rules for rook, bishop, queen, knight, king, pawn
//! - [`board`] - Occupancy, move/attack queries, snapshots
//! - [`shell`] - Line-oriented text command loop
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use gridboard::board::Board;
//! use gridboard::position::Position;
//! use gridboard::rules::Archetype;
//!
//! let mut board = Board::new(8, 800.0).unwrap();
//! let rook = board
//!     .place_piece(Arc::new(Archetype::Rook.kind("rook.png")), Position::new(3, 3))
//!     .unwrap();
//! board
//!     .place_piece(Arc::new(Archetype::Pawn.kind("pawn.png")), Position::new(3, 6))
//!     .unwrap();
//!
//! assert_eq!(board.attacking_positions(&rook).unwrap(), vec![Position::new(3, 6)]);
//! ```

pub mod board;
pub mod color;
pub mod constants;
pub mod piece;
pub mod position;
pub mod rules;
pub mod shell;
