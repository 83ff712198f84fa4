//! Move rules for the classic piece archetypes.
//!
//! Every rule is a pure function of the piece and the board: it reads the
//! piece's square, the board resolution, and which squares are occupied, and
//! returns the squares the piece can reach. Rules never mutate the board and
//! never fail. Candidate squares that fall off the board are an ordinary part
//! of the ray and offset arithmetic and are simply dropped.
//!
//! | Rule       | Pattern                                                      |
//! |------------|--------------------------------------------------------------|
//! | [`Rook`]   | four axis rays, each stopping at and including a blocker     |
//! | [`Bishop`] | four diagonal rays, same stopping rule                       |
//! | [`Queen`]  | rook rays followed by bishop rays                            |
//! | [`Knight`] | eight L-shaped jumps                                         |
//! | [`King`]   | eight unit steps                                             |
//! | [`Pawn`]   | one step toward y − 1 if empty, forward diagonals if occupied |

use std::fmt;
use std::str::FromStr;

use tracing::trace;

use crate::board::Board;
use crate::constants::{DIAGONAL, KING_OFFSETS, KNIGHT_OFFSETS, ORTHOGONAL, PAWN_FORWARD};
use crate::piece::{Piece, PieceKind};
use crate::position::Position;

/// Computes the squares a piece may reach.
///
/// Implementations must be deterministic and side-effect free so that
/// evaluating a rule against a snapshot says exactly what it would say
/// against the original board.
pub trait MoveRule: Send + Sync {
    fn moves(&self, piece: &Piece, board: &Board) -> Vec<Position>;
}

/// Any `Fn(&Piece, &Board) -> Vec<Position>` is a rule, for ad-hoc kinds.
impl<F> MoveRule for F
where
    F: Fn(&Piece, &Board) -> Vec<Position> + Send + Sync,
{
    fn moves(&self, piece: &Piece, board: &Board) -> Vec<Position> {
        self(piece, board)
    }
}

// =============================================================================
// Sliding rules
// =============================================================================

/// Number of steps from `from` in direction `dir` before leaving the board.
/// Each moving axis bounds the ray; a diagonal is bounded by the nearer edge.
fn steps_to_edge(from: Position, (dx, dy): (i32, i32), resolution: i32) -> i32 {
    let axis = |c: i32, d: i32| match d.signum() {
        1 => resolution - 1 - c,
        -1 => c,
        _ => i32::MAX,
    };
    axis(from.x, dx).min(axis(from.y, dy)).max(0)
}

/// Walk one ray, pushing empty squares and then the first occupied square.
fn cast_ray(board: &Board, from: Position, dir: (i32, i32), out: &mut Vec<Position>) {
    let steps = steps_to_edge(from, dir, board.resolution());
    let mut cur = from;
    for _ in 0..steps {
        cur = cur.offset(dir.0, dir.1);
        out.push(cur);
        if board.is_occupied(cur) {
            break;
        }
    }
}

fn slide(piece: &Piece, board: &Board, dirs: &[(i32, i32)]) -> Vec<Position> {
    let Some(from) = board.position_of(piece) else {
        return Vec::new();
    };
    let mut moves = Vec::new();
    for &dir in dirs {
        cast_ray(board, from, dir, &mut moves);
    }
    trace!(piece = %piece, from = %from, count = moves.len(), "slide");
    moves
}

/// Axis rays: up, down, left, right.
#[derive(Copy, Clone, Debug, Default)]
pub struct Rook;

impl MoveRule for Rook {
    fn moves(&self, piece: &Piece, board: &Board) -> Vec<Position> {
        slide(piece, board, &ORTHOGONAL)
    }
}

/// Diagonal rays: up-left, up-right, down-left, down-right.
#[derive(Copy, Clone, Debug, Default)]
pub struct Bishop;

impl MoveRule for Bishop {
    fn moves(&self, piece: &Piece, board: &Board) -> Vec<Position> {
        slide(piece, board, &DIAGONAL)
    }
}

/// Rook result followed by bishop result.
#[derive(Copy, Clone, Debug, Default)]
pub struct Queen;

impl MoveRule for Queen {
    fn moves(&self, piece: &Piece, board: &Board) -> Vec<Position> {
        let mut moves = Rook.moves(piece, board);
        moves.extend(Bishop.moves(piece, board));
        moves
    }
}

// =============================================================================
// Fixed-offset rules
// =============================================================================

/// Whether a fixed-offset rule may land on an occupied square.
///
/// Pieces have no side, so `Include` cannot tell a capture from landing on a
/// friend; it reports every on-board offset. `Exclude` only reports empty
/// squares.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum OccupiedTargets {
    #[default]
    Include,
    Exclude,
}

fn leap(
    piece: &Piece,
    board: &Board,
    offsets: &[(i32, i32)],
    targets: OccupiedTargets,
) -> Vec<Position> {
    let Some(from) = board.position_of(piece) else {
        return Vec::new();
    };
    let moves: Vec<Position> = offsets
        .iter()
        .map(|&(dx, dy)| from.offset(dx, dy))
        .filter(|&p| board.is_valid(p))
        .filter(|&p| targets == OccupiedTargets::Include || !board.is_occupied(p))
        .collect();
    trace!(piece = %piece, from = %from, count = moves.len(), "leap");
    moves
}

/// L-shaped jumps; ignores anything in between.
#[derive(Copy, Clone, Debug, Default)]
pub struct Knight {
    pub targets: OccupiedTargets,
}

impl MoveRule for Knight {
    fn moves(&self, piece: &Piece, board: &Board) -> Vec<Position> {
        leap(piece, board, &KNIGHT_OFFSETS, self.targets)
    }
}

/// One step in any of the eight directions.
#[derive(Copy, Clone, Debug, Default)]
pub struct King {
    pub targets: OccupiedTargets,
}

impl MoveRule for King {
    fn moves(&self, piece: &Piece, board: &Board) -> Vec<Position> {
        leap(piece, board, &KING_OFFSETS, self.targets)
    }
}

// =============================================================================
// Pawn
// =============================================================================

/// Advances toward decreasing y; captures only on the forward diagonals.
#[derive(Copy, Clone, Debug, Default)]
pub struct Pawn;

impl MoveRule for Pawn {
    fn moves(&self, piece: &Piece, board: &Board) -> Vec<Position> {
        let Some(from) = board.position_of(piece) else {
            return Vec::new();
        };
        let mut moves = Vec::with_capacity(3);

        let ahead = from.offset(0, PAWN_FORWARD);
        if board.is_valid(ahead) && !board.is_occupied(ahead) {
            moves.push(ahead);
        }
        for dx in [-1, 1] {
            let diag = from.offset(dx, PAWN_FORWARD);
            if board.is_occupied(diag) {
                moves.push(diag);
            }
        }
        moves
    }
}

// =============================================================================
// Archetypes
// =============================================================================

/// The built-in piece archetypes, for building kinds by name.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Archetype {
    Rook,
    Bishop,
    Queen,
    Knight,
    King,
    Pawn,
}

impl Archetype {
    pub const ALL: [Archetype; 6] = [
        Archetype::Rook,
        Archetype::Bishop,
        Archetype::Queen,
        Archetype::Knight,
        Archetype::King,
        Archetype::Pawn,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Archetype::Rook => "rook",
            Archetype::Bishop => "bishop",
            Archetype::Queen => "queen",
            Archetype::Knight => "knight",
            Archetype::King => "king",
            Archetype::Pawn => "pawn",
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Archetype::Rook => 'R',
            Archetype::Bishop => 'B',
            Archetype::Queen => 'Q',
            Archetype::Knight => 'N',
            Archetype::King => 'K',
            Archetype::Pawn => 'P',
        }
    }

    /// A kind with this archetype's rule. Fixed-offset rules report occupied
    /// targets.
    pub fn kind(self, asset: impl Into<String>) -> PieceKind {
        self.kind_with(asset, OccupiedTargets::Include)
    }

    /// Like [`kind`](Self::kind), choosing how knight and king treat occupied
    /// targets. Other archetypes ignore `targets`.
    pub fn kind_with(self, asset: impl Into<String>, targets: OccupiedTargets) -> PieceKind {
        let (name, symbol) = (self.name(), self.symbol());
        match self {
            Archetype::Rook => PieceKind::new(name, symbol, asset, Rook),
            Archetype::Bishop => PieceKind::new(name, symbol, asset, Bishop),
            Archetype::Queen => PieceKind::new(name, symbol, asset, Queen),
            Archetype::Knight => PieceKind::new(name, symbol, asset, Knight { targets }),
            Archetype::King => PieceKind::new(name, symbol, asset, King { targets }),
            Archetype::Pawn => PieceKind::new(name, symbol, asset, Pawn),
        }
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseArchetypeError(String);

impl fmt::Display for ParseArchetypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown piece kind '{}'", self.0)
    }
}

impl std::error::Error for ParseArchetypeError {}

impl FromStr for Archetype {
    type Err = ParseArchetypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rook" | "tower" | "r" => Ok(Archetype::Rook),
            "bishop" | "b" => Ok(Archetype::Bishop),
            "queen" | "q" => Ok(Archetype::Queen),
            "knight" | "n" => Ok(Archetype::Knight),
            "king" | "k" => Ok(Archetype::King),
            "pawn" | "p" => Ok(Archetype::Pawn),
            _ => Err(ParseArchetypeError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn board() -> Board {
        Board::new(8, 800.0).unwrap()
    }

    fn kind(a: Archetype) -> Arc<PieceKind> {
        Arc::new(a.kind(""))
    }

    fn p(x: i32, y: i32) -> Position {
        Position::new(x, y)
    }

    #[test]
    fn test_steps_to_edge() {
        assert_eq!(steps_to_edge(p(3, 3), (0, -1), 8), 3);
        assert_eq!(steps_to_edge(p(3, 3), (0, 1), 8), 4);
        assert_eq!(steps_to_edge(p(1, 5), (1, 1), 8), 2);
        assert_eq!(steps_to_edge(p(1, 5), (-1, -1), 8), 1);
        assert_eq!(steps_to_edge(p(0, 0), (-1, 0), 8), 0);
    }

    #[test]
    fn test_rook_empty_board_covers_cross() {
        let mut b = board();
        let rook = b.place_piece(kind(Archetype::Rook), p(3, 3)).unwrap();
        let moves = Rook.moves(&rook, &b);
        assert_eq!(moves.len(), 14);
        // up ray comes first, nearest square first
        assert_eq!(&moves[..3], &[p(3, 2), p(3, 1), p(3, 0)]);
        assert!(moves.iter().all(|m| m.x == 3 || m.y == 3));
    }

    #[test]
    fn test_rook_stops_at_blocker() {
        let mut b = board();
        let rook = b.place_piece(kind(Archetype::Rook), p(0, 0)).unwrap();
        b.place_piece(kind(Archetype::Pawn), p(0, 2)).unwrap();
        b.place_piece(kind(Archetype::Pawn), p(1, 0)).unwrap();
        assert_eq!(Rook.moves(&rook, &b), vec![p(0, 1), p(0, 2), p(1, 0)]);
    }

    #[test]
    fn test_bishop_corner() {
        let mut b = board();
        let bishop = b.place_piece(kind(Archetype::Bishop), p(0, 7)).unwrap();
        let moves = Bishop.moves(&bishop, &b);
        assert_eq!(moves.len(), 7);
        assert_eq!(moves[0], p(1, 6));
        assert_eq!(moves[6], p(7, 0));
    }

    #[test]
    fn test_bishop_blocked_diagonal() {
        let mut b = board();
        let bishop = b.place_piece(kind(Archetype::Bishop), p(3, 3)).unwrap();
        b.place_piece(kind(Archetype::Pawn), p(5, 5)).unwrap();
        let moves = Bishop.moves(&bishop, &b);
        assert!(moves.contains(&p(4, 4)));
        assert!(moves.contains(&p(5, 5)));
        assert!(!moves.contains(&p(6, 6)));
        // 3 up-left + 3 up-right + 3 down-left + 2 down-right
        assert_eq!(moves.len(), 11);
    }

    #[test]
    fn test_queen_is_rook_then_bishop() {
        let mut b = board();
        let queen = b.place_piece(kind(Archetype::Queen), p(2, 5)).unwrap();
        b.place_piece(kind(Archetype::Knight), p(2, 3)).unwrap();
        let mut expected = Rook.moves(&queen, &b);
        expected.extend(Bishop.moves(&queen, &b));
        assert_eq!(Queen.moves(&queen, &b), expected);
    }

    #[test]
    fn test_knight_center_and_edges() {
        let mut b = board();
        let knight = b.place_piece(kind(Archetype::Knight), p(4, 4)).unwrap();
        assert_eq!(Knight::default().moves(&knight, &b).len(), 8);

        let corner = b.place_piece(kind(Archetype::Knight), p(7, 7)).unwrap();
        assert_eq!(
            Knight::default().moves(&corner, &b),
            vec![p(5, 6), p(6, 5)]
        );
    }

    #[test]
    fn test_leaper_occupied_targets_flag() {
        let mut b = board();
        let king = b.place_piece(kind(Archetype::King), p(0, 0)).unwrap();
        b.place_piece(kind(Archetype::Pawn), p(1, 0)).unwrap();

        let include = King::default().moves(&king, &b);
        assert_eq!(include, vec![p(0, 1), p(1, 0), p(1, 1)]);

        let exclude = King {
            targets: OccupiedTargets::Exclude,
        }
        .moves(&king, &b);
        assert_eq!(exclude, vec![p(0, 1), p(1, 1)]);
    }

    #[test]
    fn test_pawn_blocked_forward() {
        let mut b = board();
        let pawn = b.place_piece(kind(Archetype::Pawn), p(4, 4)).unwrap();
        b.place_piece(kind(Archetype::Pawn), p(4, 3)).unwrap();
        assert!(Pawn.moves(&pawn, &b).is_empty());
    }

    #[test]
    fn test_pawn_on_last_row() {
        let mut b = board();
        let pawn = b.place_piece(kind(Archetype::Pawn), p(0, 0)).unwrap();
        assert!(Pawn.moves(&pawn, &b).is_empty());
    }

    #[test]
    fn test_closure_rule() {
        let mut b = board();
        let stay = Arc::new(PieceKind::new(
            "statue",
            'S',
            "",
            |piece: &Piece, board: &Board| -> Vec<Position> {
                board.position_of(piece).into_iter().collect()
            },
        ));
        let statue = b.place_piece(stay, p(2, 2)).unwrap();
        assert_eq!(b.valid_moves(&statue).unwrap(), vec![p(2, 2)]);
    }

    #[test]
    fn test_rule_on_absent_piece_is_empty() {
        let mut b = board();
        let rook = b.place_piece(kind(Archetype::Rook), p(1, 1)).unwrap();
        let other = board();
        assert!(Rook.moves(&rook, &other).is_empty());
    }

    #[test]
    fn test_archetype_parse() {
        assert_eq!("tower".parse::<Archetype>(), Ok(Archetype::Rook));
        assert_eq!("Queen".parse::<Archetype>(), Ok(Archetype::Queen));
        assert_eq!("n".parse::<Archetype>(), Ok(Archetype::Knight));
        assert!("dragon".parse::<Archetype>().is_err());
        for a in Archetype::ALL {
            assert_eq!(a.to_string().parse::<Archetype>(), Ok(a));
        }
    }
}
