//! Default board settings and the offset tables used by the move rules.
//!
//! Everything that a caller would reasonably want to override lives in
//! [`BoardConfig`](crate::board::BoardConfig); these are only the defaults.

use crate::color::Color;

// =============================================================================
// Board Geometry
// =============================================================================

/// Default number of squares along each edge.
pub const DEFAULT_RESOLUTION: i32 = 8;

/// Default physical edge length of the whole board (renderer units).
pub const DEFAULT_SIZE: f64 = 800.0;

/// Default fraction of a square occupied by piece imagery.
pub const DEFAULT_PIECE_SCALE: f64 = 1.0;

// =============================================================================
// Color Scheme
// =============================================================================

/// Color of squares whose `x + y` is odd.
pub const DEFAULT_COLOR_ODD: Color = Color::rgb(255, 0, 0);

/// Color of squares whose `x + y` is even, including `(0, 0)`.
pub const DEFAULT_COLOR_EVEN: Color = Color::rgb(0, 0, 255);

/// Upper bound of every color channel.
pub const CHANNEL_MAX: i32 = 255;

/// Lower bound of every color channel.
pub const CHANNEL_MIN: i32 = 0;

// =============================================================================
// Direction Tables
// =============================================================================

/// Axis directions walked by sliding rules.
/// Order: up, down, left, right
pub const ORTHOGONAL: [(i32, i32); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

/// Diagonal directions walked by sliding rules.
/// Order: up-left, up-right, down-left, down-right
pub const DIAGONAL: [(i32, i32); 4] = [(-1, -1), (1, -1), (-1, 1), (1, 1)];

/// L-shaped jumps, clockwise starting from (+2, +1).
pub const KNIGHT_OFFSETS: [(i32, i32); 8] = [
    (2, 1),
    (1, 2),
    (-1, 2),
    (-2, 1),
    (-2, -1),
    (-1, -2),
    (1, -2),
    (2, -1),
];

/// All eight neighbors: orthogonal first, then diagonal.
pub const KING_OFFSETS: [(i32, i32); 8] = [
    (0, -1),  // up
    (0, 1),   // down
    (-1, 0),  // left
    (1, 0),   // right
    (-1, -1), // up-left
    (1, -1),  // up-right
    (-1, 1),  // down-left
    (1, 1),   // down-right
];

/// Direction a pawn advances in (toward decreasing y).
pub const PAWN_FORWARD: i32 = -1;

// =============================================================================
// Text Rendering
// =============================================================================

/// Character printed for an empty square.
pub const EMPTY_SYMBOL: char = '.';

/// Character printed for a highlighted empty square.
pub const HIGHLIGHT_SYMBOL: char = '*';
