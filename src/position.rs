//! Board coordinates.
//!
//! A [`Position`] is a plain `(x, y)` pair. It carries no knowledge of any
//! board, so it can hold coordinates that are off the edge; whether a position
//! is valid is always a question asked of a [`Board`](crate::board::Board).
//!
//! Positions order row-major (y first, then x), which is also the order in
//! which the board enumerates its squares.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A square on the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    /// The position `(dx, dy)` away from this one.
    #[inline]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Position {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// True if `(x + y)` is even. `(0, 0)` is even.
    #[inline]
    pub const fn is_even(self) -> bool {
        (self.x + self.y).rem_euclid(2) == 0
    }

    /// True if both coordinates fall in `[0, resolution)`.
    #[inline]
    pub const fn is_within(self, resolution: i32) -> bool {
        self.x >= 0 && self.x < resolution && self.y >= 0 && self.y < resolution
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Position::new(x, y)
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.y.cmp(&other.y).then(self.x.cmp(&other.x))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Error returned when a coordinate string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePositionError(String);

impl fmt::Display for ParsePositionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid coordinate '{}', expected x,y", self.0)
    }
}

impl std::error::Error for ParsePositionError {}

/// Parses `"x,y"`, optionally wrapped in parentheses (`"(x,y)"`).
impl FromStr for Position {
    type Err = ParsePositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParsePositionError(s.to_string());
        let inner = s
            .trim()
            .trim_start_matches('(')
            .trim_end_matches(')');
        let (x, y) = inner.split_once(',').ok_or_else(err)?;
        let x = x.trim().parse::<i32>().map_err(|_| err())?;
        let y = y.trim().parse::<i32>().map_err(|_| err())?;
        Ok(Position::new(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_equality() {
        assert_eq!(Position::new(3, 4), Position::from((3, 4)));
        assert_ne!(Position::new(3, 4), Position::new(4, 3));
    }

    #[test]
    fn test_row_major_order() {
        let mut v = vec![
            Position::new(1, 1),
            Position::new(0, 1),
            Position::new(5, 0),
        ];
        v.sort();
        assert_eq!(
            v,
            vec![Position::new(5, 0), Position::new(0, 1), Position::new(1, 1)]
        );
    }

    #[test]
    fn test_parity() {
        assert!(Position::new(0, 0).is_even());
        assert!(!Position::new(1, 0).is_even());
        assert!(!Position::new(-1, 0).is_even());
        assert!(Position::new(3, 5).is_even());
    }

    #[test]
    fn test_is_within() {
        assert!(Position::new(0, 0).is_within(8));
        assert!(Position::new(7, 7).is_within(8));
        assert!(!Position::new(8, 0).is_within(8));
        assert!(!Position::new(0, -1).is_within(8));
    }

    #[test]
    fn test_parse() {
        assert_eq!("3,4".parse::<Position>(), Ok(Position::new(3, 4)));
        assert_eq!(" (0, 7) ".parse::<Position>(), Ok(Position::new(0, 7)));
        assert_eq!("-1,2".parse::<Position>(), Ok(Position::new(-1, 2)));
        assert!("34".parse::<Position>().is_err());
        assert!("a,b".parse::<Position>().is_err());
    }

    #[test]
    fn test_display() {
        let pos = Position::new(2, 5);
        assert_eq!(pos.to_string(), "(2,5)");
        assert_eq!(pos.to_string().parse::<Position>(), Ok(pos));
    }
}
