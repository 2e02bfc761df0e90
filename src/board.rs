//! Board grid: colors, points, moves and the raw cell array.
//!
//! The grid is pure data. Group and liberty bookkeeping lives in
//! [`groups`](crate::groups); legality lives in [`position`](crate::position).

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::constants::{COLUMN_LETTERS, MAX_SIZE};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    White,
}

impl Color {
    pub fn opponent(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Black => write!(f, "black"),
            Color::White => write!(f, "white"),
        }
    }
}

impl FromStr for Color {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "b" | "black" => Ok(Color::Black),
            "w" | "white" => Ok(Color::White),
            _ => Err(ParseMoveError::Color(s.to_string())),
        }
    }
}

/// A board coordinate `(x, y)`. In GTP text `x` is the column letter and `y` the row number.
pub type Point = (usize, usize);

/// A move: a stone placement or a pass.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Move {
    Play(Point),
    Pass,
}

impl Move {
    pub fn point(self) -> Option<Point> {
        match self {
            Move::Play(p) => Some(p),
            Move::Pass => None,
        }
    }

    /// Parse a GTP vertex such as `D4` or `pass` for a board of the given size.
    ///
    /// Columns are letters A-Z skipping I, rows are numbered from 1 at `y = 0`.
    pub fn parse(s: &str, size: usize) -> Result<Move, ParseMoveError> {
        if s.eq_ignore_ascii_case("pass") {
            return Ok(Move::Pass);
        }
        let bytes = s.as_bytes();
        if bytes.len() < 2 {
            return Err(ParseMoveError::Vertex(s.to_string()));
        }
        let col_char = bytes[0].to_ascii_uppercase();
        let x = COLUMN_LETTERS
            .iter()
            .position(|&c| c == col_char)
            .ok_or_else(|| ParseMoveError::Vertex(s.to_string()))?;
        let row: usize = s[1..]
            .parse()
            .map_err(|_| ParseMoveError::Vertex(s.to_string()))?;
        if x >= size || row == 0 || row > size {
            return Err(ParseMoveError::OffBoard(s.to_string(), size));
        }
        Ok(Move::Play((x, row - 1)))
    }
}

impl From<Point> for Move {
    fn from(p: Point) -> Self {
        Move::Play(p)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Move::Pass => write!(f, "pass"),
            Move::Play((x, y)) if x < MAX_SIZE => {
                write!(f, "{}{}", COLUMN_LETTERS[x] as char, y + 1)
            }
            Move::Play((x, y)) => write!(f, "({x},{y})"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseMoveError {
    #[error("invalid vertex '{0}'")]
    Vertex(String),
    #[error("vertex '{0}' is outside a {1}x{1} board")]
    OffBoard(String, usize),
    #[error("invalid color '{0}'")]
    Color(String),
}

/// Fixed-size square grid of cells. `None` is an empty point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    size: usize,
    cells: Vec<Option<Color>>,
}

impl Board {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![None; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    fn idx(&self, (x, y): Point) -> usize {
        x * self.size + y
    }

    pub fn on_board(&self, (x, y): Point) -> bool {
        x < self.size && y < self.size
    }

    /// Stone at `p`. Off-board points read as empty.
    pub fn get(&self, p: Point) -> Option<Color> {
        if !self.on_board(p) {
            return None;
        }
        self.cells[self.idx(p)]
    }

    pub fn set(&mut self, p: Point, stone: Option<Color>) {
        let i = self.idx(p);
        self.cells[i] = stone;
    }

    pub fn is_empty(&self, p: Point) -> bool {
        self.on_board(p) && self.get(p).is_none()
    }

    /// Orthogonal on-board neighbors of `p`.
    pub fn neighbors(&self, (x, y): Point) -> impl Iterator<Item = Point> + use<> {
        let s = self.size;
        [
            (x > 0).then(|| (x - 1, y)),
            (x + 1 < s).then(|| (x + 1, y)),
            (y > 0).then(|| (x, y - 1)),
            (y + 1 < s).then(|| (x, y + 1)),
        ]
        .into_iter()
        .flatten()
    }

    /// The up-to-8 on-board points surrounding `p`, diagonals included.
    pub fn surrounding(&self, (x, y): Point) -> impl Iterator<Item = Point> + use<> {
        const OFFSETS: [(isize, isize); 8] =
            [(-1, -1), (0, -1), (1, -1), (-1, 0), (1, 0), (-1, 1), (0, 1), (1, 1)];
        let s = self.size;
        OFFSETS.into_iter().filter_map(move |(dx, dy)| {
            let nx = x.checked_add_signed(dx)?;
            let ny = y.checked_add_signed(dy)?;
            (nx < s && ny < s).then_some((nx, ny))
        })
    }

    /// All points in row-major order over `cells[x][y]` (`x` outer, `y` inner).
    pub fn points(&self) -> impl Iterator<Item = Point> + use<> {
        let s = self.size;
        (0..s).flat_map(move |x| (0..s).map(move |y| (x, y)))
    }

    pub fn count(&self, color: Color) -> usize {
        self.cells.iter().filter(|&&c| c == Some(color)).count()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (0..self.size).rev() {
            write!(f, "{:>2} ", y + 1)?;
            for x in 0..self.size {
                let ch = match self.get((x, y)) {
                    Some(Color::Black) => 'X',
                    Some(Color::White) => 'O',
                    None => '.',
                };
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        write!(f, "   ")?;
        for x in 0..self.size.min(MAX_SIZE) {
            write!(f, "{} ", COLUMN_LETTERS[x] as char)?;
        }
        writeln!(f)
    }
}
