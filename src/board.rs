//! The board: square occupancy, checkerboard colors, and piece queries.
//!
//! Occupancy is kept in two maps that are always updated together: a
//! row-major `Position -> Piece` map and an inverse `PieceId -> Position`
//! index. Looking a piece up by identity is therefore a hash lookup rather
//! than a scan of the board.
//!
//! The board produces colors and geometry for a renderer but never draws
//! anything itself.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::color::Color;
use crate::constants::{
    DEFAULT_COLOR_EVEN, DEFAULT_COLOR_ODD, DEFAULT_PIECE_SCALE, DEFAULT_RESOLUTION, DEFAULT_SIZE,
    EMPTY_SYMBOL, HIGHLIGHT_SYMBOL,
};
use crate::piece::{Piece, PieceId, PieceKind};
use crate::position::Position;

/// Reasons a board operation can be refused.
#[derive(Debug, Clone, PartialEq)]
pub enum BoardError {
    /// Coordinates outside `[0, resolution)²`
    InvalidPosition(Position),
    /// Target square already holds a piece
    OccupiedSquare(Position),
    /// Piece is not on this board
    PieceNotFound(PieceId),
    /// A constructor or setter argument is out of range
    InvalidArgument(String),
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::InvalidPosition(pos) => write!(f, "invalid position {pos}"),
            BoardError::OccupiedSquare(pos) => write!(f, "square {pos} is occupied"),
            BoardError::PieceNotFound(id) => write!(f, "piece {id} is not on the board"),
            BoardError::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
        }
    }
}

impl std::error::Error for BoardError {}

/// Screen-space rectangle of a square or piece, in the board's size units.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Settings a board is built from.
#[derive(Clone, Debug, PartialEq)]
pub struct BoardConfig {
    pub resolution: i32,
    /// Physical edge length of the whole board
    pub size: f64,
    pub color_odd: Color,
    pub color_even: Color,
    pub piece_scale: f64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            resolution: DEFAULT_RESOLUTION,
            size: DEFAULT_SIZE,
            color_odd: DEFAULT_COLOR_ODD,
            color_even: DEFAULT_COLOR_EVEN,
            piece_scale: DEFAULT_PIECE_SCALE,
        }
    }
}

impl BoardConfig {
    pub fn build(&self) -> Result<Board, BoardError> {
        if self.resolution <= 0 {
            return Err(BoardError::InvalidArgument(format!(
                "resolution must be positive (got {})",
                self.resolution
            )));
        }
        if !self.size.is_finite() || self.size <= 0.0 {
            return Err(BoardError::InvalidArgument(format!(
                "size must be a positive number (got {})",
                self.size
            )));
        }
        let mut board = Board {
            resolution: self.resolution,
            square_size: self.size / self.resolution as f64,
            color_odd: self.color_odd,
            color_even: self.color_even,
            piece_scale: DEFAULT_PIECE_SCALE,
            occupancy: BTreeMap::new(),
            index: HashMap::new(),
        };
        board.set_piece_scale(self.piece_scale);
        Ok(board)
    }
}

/// An N×N board and the pieces standing on it.
///
/// `Board` is deliberately not `Clone`: copying it must mint new piece
/// identities, which is what [`Board::snapshot`] does.
#[derive(Debug)]
pub struct Board {
    resolution: i32,
    square_size: f64,
    color_odd: Color,
    color_even: Color,
    piece_scale: f64,
    /// Square -> occupant, iterated row-major
    occupancy: BTreeMap<Position, Piece>,
    /// Occupant -> square, kept in step with `occupancy`
    index: HashMap<PieceId, Position>,
}

impl Board {
    /// An empty board with the default color scheme.
    pub fn new(resolution: i32, size: f64) -> Result<Self, BoardError> {
        BoardConfig {
            resolution,
            size,
            ..BoardConfig::default()
        }
        .build()
    }

    // -------------------------------------------------------------------------
    // Geometry
    // -------------------------------------------------------------------------

    pub fn resolution(&self) -> i32 {
        self.resolution
    }

    pub fn square_size(&self) -> f64 {
        self.square_size
    }

    pub fn piece_scale(&self) -> f64 {
        self.piece_scale
    }

    /// Set the fraction of a square covered by piece imagery, clamped into
    /// `[0, 1]`. NaN is treated as 0.
    pub fn set_piece_scale(&mut self, scale: f64) {
        self.piece_scale = if scale.is_nan() {
            0.0
        } else {
            scale.clamp(0.0, 1.0)
        };
    }

    #[inline]
    pub fn is_valid(&self, pos: Position) -> bool {
        pos.is_within(self.resolution)
    }

    fn check_valid(&self, pos: Position) -> Result<(), BoardError> {
        if self.is_valid(pos) {
            Ok(())
        } else {
            Err(BoardError::InvalidPosition(pos))
        }
    }

    /// Area covered by the square at `pos`.
    pub fn square_rect(&self, pos: Position) -> Result<Rect, BoardError> {
        self.check_valid(pos)?;
        let s = self.square_size;
        Ok(Rect {
            x: s * pos.x as f64,
            y: s * pos.y as f64,
            width: s,
            height: s,
        })
    }

    /// Area a piece image at `pos` should cover: the square shrunk by the
    /// piece scale, centered.
    pub fn piece_rect(&self, pos: Position) -> Result<Rect, BoardError> {
        let square = self.square_rect(pos)?;
        let side = square.width * self.piece_scale;
        let inset = (square.width - side) / 2.0;
        Ok(Rect {
            x: square.x + inset,
            y: square.y + inset,
            width: side,
            height: side,
        })
    }

    // -------------------------------------------------------------------------
    // Colors
    // -------------------------------------------------------------------------

    /// Replace both checkerboard colors.
    pub fn set_colors(&mut self, odd: Color, even: Color) {
        self.color_odd = odd;
        self.color_even = even;
    }

    /// Checkerboard color: `colorEven` where `x + y` is even (so `(0, 0)`),
    /// `colorOdd` elsewhere.
    pub fn color_of_square(&self, pos: Position) -> Result<Color, BoardError> {
        self.check_valid(pos)?;
        Ok(if pos.is_even() {
            self.color_even
        } else {
            self.color_odd
        })
    }

    /// The fill for `pos` when highlighted with `color`.
    pub fn apply_highlight(&self, pos: Position, color: Color) -> Result<Color, BoardError> {
        Ok(color.combine(self.color_of_square(pos)?))
    }

    /// Highlight fills for every square `piece` can reach.
    pub fn highlight_valid_moves(
        &self,
        piece: &Piece,
        color: Color,
    ) -> Result<Vec<(Position, Color)>, BoardError> {
        self.highlight(self.valid_moves(piece)?, color)
    }

    /// Highlight fills for every occupied square `piece` attacks.
    pub fn highlight_attacking_positions(
        &self,
        piece: &Piece,
        color: Color,
    ) -> Result<Vec<(Position, Color)>, BoardError> {
        self.highlight(self.attacking_positions(piece)?, color)
    }

    fn highlight(
        &self,
        squares: Vec<Position>,
        color: Color,
    ) -> Result<Vec<(Position, Color)>, BoardError> {
        squares
            .into_iter()
            .map(|pos| Ok((pos, self.apply_highlight(pos, color)?)))
            .collect()
    }

    // -------------------------------------------------------------------------
    // Occupancy
    // -------------------------------------------------------------------------

    /// Put a new piece of `kind` on the empty square `pos`.
    pub fn place_piece(&mut self, kind: Arc<PieceKind>, pos: Position) -> Result<Piece, BoardError> {
        self.check_valid(pos)?;
        if self.occupancy.contains_key(&pos) {
            return Err(BoardError::OccupiedSquare(pos));
        }
        let piece = Piece::new(kind);
        self.insert(pos, piece.clone());
        debug!(piece = %piece, at = %pos, "placed");
        Ok(piece)
    }

    /// Move `piece` to the empty square `pos`. Moves never capture.
    pub fn move_piece(&mut self, piece: &Piece, pos: Position) -> Result<(), BoardError> {
        self.check_valid(pos)?;
        let from = self
            .position_of(piece)
            .ok_or(BoardError::PieceNotFound(piece.id()))?;
        if self.occupancy.contains_key(&pos) {
            return Err(BoardError::OccupiedSquare(pos));
        }
        let moved = self.take(from);
        self.insert(pos, moved);
        debug!(piece = %piece, from = %from, to = %pos, "moved");
        Ok(())
    }

    /// Take `piece` off the board, returning the square it stood on.
    pub fn remove_piece(&mut self, piece: &Piece) -> Result<Position, BoardError> {
        let from = self
            .position_of(piece)
            .ok_or(BoardError::PieceNotFound(piece.id()))?;
        self.take(from);
        debug!(piece = %piece, from = %from, "removed");
        Ok(from)
    }

    fn insert(&mut self, pos: Position, piece: Piece) {
        self.index.insert(piece.id(), pos);
        self.occupancy.insert(pos, piece);
    }

    /// Remove the occupant of `pos` from both maps. `pos` must be occupied.
    fn take(&mut self, pos: Position) -> Piece {
        let piece = self
            .occupancy
            .remove(&pos)
            .unwrap_or_else(|| unreachable!("occupancy and index out of step at {pos}"));
        self.index.remove(&piece.id());
        piece
    }

    pub fn piece_at(&self, pos: Position) -> Option<&Piece> {
        self.occupancy.get(&pos)
    }

    pub fn is_occupied(&self, pos: Position) -> bool {
        self.occupancy.contains_key(&pos)
    }

    pub fn position_of(&self, piece: &Piece) -> Option<Position> {
        self.index.get(&piece.id()).copied()
    }

    /// Every piece with its square, in row-major order.
    pub fn pieces(&self) -> impl Iterator<Item = (Position, &Piece)> + '_ {
        self.occupancy.iter().map(|(pos, piece)| (*pos, piece))
    }

    pub fn piece_count(&self) -> usize {
        self.occupancy.len()
    }

    /// Every square with no occupant, in row-major order.
    pub fn empty_positions(&self) -> Vec<Position> {
        let n = self.resolution;
        (0..n)
            .flat_map(|y| (0..n).map(move |x| Position::new(x, y)))
            .filter(|pos| !self.occupancy.contains_key(pos))
            .collect()
    }

    /// A uniformly chosen empty square, or `None` if the board is full.
    pub fn random_empty_position(&self, rng: &mut fastrand::Rng) -> Option<Position> {
        let empty = self.empty_positions();
        if empty.is_empty() {
            return None;
        }
        Some(empty[rng.usize(..empty.len())])
    }

    // -------------------------------------------------------------------------
    // Move queries
    // -------------------------------------------------------------------------

    /// Squares `piece` can reach under its kind's rule.
    pub fn valid_moves(&self, piece: &Piece) -> Result<Vec<Position>, BoardError> {
        if !self.index.contains_key(&piece.id()) {
            return Err(BoardError::PieceNotFound(piece.id()));
        }
        Ok(piece.kind().rule().moves(piece, self))
    }

    /// The occupied squares among `piece`'s valid moves.
    pub fn attacking_positions(&self, piece: &Piece) -> Result<Vec<Position>, BoardError> {
        let mut moves = self.valid_moves(piece)?;
        moves.retain(|pos| self.occupancy.contains_key(pos));
        Ok(moves)
    }

    /// The occupants of `piece`'s attacking positions.
    pub fn attacking_pieces(&self, piece: &Piece) -> Result<Vec<&Piece>, BoardError> {
        Ok(self
            .valid_moves(piece)?
            .into_iter()
            .filter_map(|pos| self.occupancy.get(&pos))
            .collect())
    }

    // -------------------------------------------------------------------------
    // Snapshots
    // -------------------------------------------------------------------------

    /// An independent copy of this board. Each piece is replaced by a new
    /// piece of the same kind on the same square.
    pub fn snapshot(&self) -> Board {
        let mut copy = Board {
            resolution: self.resolution,
            square_size: self.square_size,
            color_odd: self.color_odd,
            color_even: self.color_even,
            piece_scale: self.piece_scale,
            occupancy: BTreeMap::new(),
            index: HashMap::with_capacity(self.index.len()),
        };
        for (pos, piece) in &self.occupancy {
            copy.insert(*pos, Piece::new(Arc::clone(piece.kind())));
        }
        copy
    }

    /// A snapshot in which `piece` has moved to `to`. This board is untouched.
    pub fn speculate(&self, piece: &Piece, to: Position) -> Result<Board, BoardError> {
        let from = self
            .position_of(piece)
            .ok_or(BoardError::PieceNotFound(piece.id()))?;
        let mut copy = self.snapshot();
        let counterpart = copy
            .piece_at(from)
            .cloned()
            .ok_or(BoardError::PieceNotFound(piece.id()))?;
        copy.move_piece(&counterpart, to)?;
        Ok(copy)
    }

    // -------------------------------------------------------------------------
    // Text rendering
    // -------------------------------------------------------------------------

    /// The board as text, one row per line, with `highlights` marked on
    /// empty squares.
    pub fn render_text(&self, highlights: &[Position]) -> String {
        let mut out = String::new();
        for y in 0..self.resolution {
            for x in 0..self.resolution {
                let pos = Position::new(x, y);
                let ch = match self.piece_at(pos) {
                    Some(piece) => piece.kind().symbol(),
                    None if highlights.contains(&pos) => HIGHLIGHT_SYMBOL,
                    None => EMPTY_SYMBOL,
                };
                out.push(ch);
                out.push(' ');
            }
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_text(&[]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Archetype;

    fn rook() -> Arc<PieceKind> {
        Arc::new(Archetype::Rook.kind("rook.png"))
    }

    fn p(x: i32, y: i32) -> Position {
        Position::new(x, y)
    }

    #[test]
    fn test_new_rejects_bad_arguments() {
        assert!(matches!(
            Board::new(0, 800.0),
            Err(BoardError::InvalidArgument(_))
        ));
        assert!(matches!(
            Board::new(8, -1.0),
            Err(BoardError::InvalidArgument(_))
        ));
        assert!(matches!(
            Board::new(8, f64::NAN),
            Err(BoardError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_square_size() {
        let board = Board::new(8, 800.0).unwrap();
        assert_eq!(board.square_size(), 100.0);
    }

    #[test]
    fn test_piece_scale_clamped() {
        let mut board = Board::new(8, 800.0).unwrap();
        board.set_piece_scale(1.7);
        assert_eq!(board.piece_scale(), 1.0);
        board.set_piece_scale(-0.5);
        assert_eq!(board.piece_scale(), 0.0);
        board.set_piece_scale(0.25);
        assert_eq!(board.piece_scale(), 0.25);

        let cfg = BoardConfig {
            piece_scale: 3.0,
            ..BoardConfig::default()
        };
        assert_eq!(cfg.build().unwrap().piece_scale(), 1.0);
    }

    #[test]
    fn test_rects() {
        let mut board = Board::new(4, 400.0).unwrap();
        board.set_piece_scale(0.5);
        assert_eq!(
            board.square_rect(p(1, 2)).unwrap(),
            Rect {
                x: 100.0,
                y: 200.0,
                width: 100.0,
                height: 100.0
            }
        );
        assert_eq!(
            board.piece_rect(p(1, 2)).unwrap(),
            Rect {
                x: 125.0,
                y: 225.0,
                width: 50.0,
                height: 50.0
            }
        );
        assert_eq!(
            board.square_rect(p(4, 0)),
            Err(BoardError::InvalidPosition(p(4, 0)))
        );
    }

    #[test]
    fn test_index_tracks_moves() {
        let mut board = Board::new(8, 800.0).unwrap();
        let piece = board.place_piece(rook(), p(1, 1)).unwrap();
        board.move_piece(&piece, p(6, 2)).unwrap();
        assert_eq!(board.index.len(), 1);
        assert_eq!(board.index.get(&piece.id()), Some(&p(6, 2)));
        assert_eq!(board.occupancy.len(), 1);
    }

    #[test]
    fn test_move_failure_leaves_board_unchanged() {
        let mut board = Board::new(8, 800.0).unwrap();
        let a = board.place_piece(rook(), p(0, 0)).unwrap();
        board.place_piece(rook(), p(0, 1)).unwrap();
        assert_eq!(
            board.move_piece(&a, p(0, 1)),
            Err(BoardError::OccupiedSquare(p(0, 1)))
        );
        assert_eq!(
            board.move_piece(&a, p(0, 8)),
            Err(BoardError::InvalidPosition(p(0, 8)))
        );
        assert_eq!(board.position_of(&a), Some(p(0, 0)));
    }

    #[test]
    fn test_move_onto_own_square_is_occupied() {
        let mut board = Board::new(8, 800.0).unwrap();
        let a = board.place_piece(rook(), p(2, 2)).unwrap();
        assert_eq!(
            board.move_piece(&a, p(2, 2)),
            Err(BoardError::OccupiedSquare(p(2, 2)))
        );
    }

    #[test]
    fn test_remove_piece() {
        let mut board = Board::new(8, 800.0).unwrap();
        let a = board.place_piece(rook(), p(3, 3)).unwrap();
        assert_eq!(board.remove_piece(&a), Ok(p(3, 3)));
        assert!(board.piece_at(p(3, 3)).is_none());
        assert_eq!(
            board.remove_piece(&a),
            Err(BoardError::PieceNotFound(a.id()))
        );
    }

    #[test]
    fn test_set_colors() {
        let mut board = Board::new(8, 800.0).unwrap();
        board.set_colors(Color::rgb(1, 1, 1), Color::rgb(2, 2, 2));
        assert_eq!(board.color_of_square(p(0, 0)), Ok(Color::rgb(2, 2, 2)));
        assert_eq!(board.color_of_square(p(0, 1)), Ok(Color::rgb(1, 1, 1)));
    }

    #[test]
    fn test_random_empty_position() {
        let mut board = Board::new(2, 200.0).unwrap();
        let mut rng = fastrand::Rng::with_seed(7);
        for _ in 0..4 {
            let pos = board.random_empty_position(&mut rng).unwrap();
            assert!(!board.is_occupied(pos));
            board.place_piece(rook(), pos).unwrap();
        }
        assert_eq!(board.random_empty_position(&mut rng), None);
    }

    #[test]
    fn test_render_text() {
        let mut board = Board::new(3, 300.0).unwrap();
        board.place_piece(rook(), p(1, 0)).unwrap();
        assert_eq!(board.to_string(), ". R . \n. . . \n. . . \n");
        assert_eq!(
            board.render_text(&[p(0, 0), p(1, 0)]),
            "* R . \n. . . \n. . . \n"
        );
    }
}
