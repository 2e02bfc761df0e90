//! The eight symmetries of a square board.
//!
//! Used to augment training positions: every transform moves the stones, the
//! group cache, the ko point and the whole move history consistently.

use crate::board::{Board, Move, Point};
use crate::position::Position;

/// One element of the dihedral group of the square.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Symmetry {
    Identity,
    /// Quarter turn: `(x, y) -> (y, N-1-x)`.
    Rot90,
    Rot180,
    Rot270,
    /// Mirror across the vertical axis: `(x, y) -> (N-1-x, y)`.
    FlipX,
    /// Mirror across the horizontal axis: `(x, y) -> (x, N-1-y)`.
    FlipY,
    /// Mirror across the main diagonal: `(x, y) -> (y, x)`.
    Transpose,
    /// Mirror across the anti-diagonal: `(x, y) -> (N-1-y, N-1-x)`.
    AntiTranspose,
}

impl Symmetry {
    pub const ALL: [Symmetry; 8] = [
        Symmetry::Identity,
        Symmetry::Rot90,
        Symmetry::Rot180,
        Symmetry::Rot270,
        Symmetry::FlipX,
        Symmetry::FlipY,
        Symmetry::Transpose,
        Symmetry::AntiTranspose,
    ];

    /// Map a point of an `size`x`size` board.
    pub fn apply(self, (x, y): Point, size: usize) -> Point {
        let m = size - 1;
        match self {
            Symmetry::Identity => (x, y),
            Symmetry::Rot90 => (y, m - x),
            Symmetry::Rot180 => (m - x, m - y),
            Symmetry::Rot270 => (m - y, x),
            Symmetry::FlipX => (m - x, y),
            Symmetry::FlipY => (x, m - y),
            Symmetry::Transpose => (y, x),
            Symmetry::AntiTranspose => (m - y, m - x),
        }
    }

    pub fn apply_move(self, mv: Move, size: usize) -> Move {
        match mv {
            Move::Play(p) => Move::Play(self.apply(p, size)),
            Move::Pass => Move::Pass,
        }
    }

    pub fn inverse(self) -> Symmetry {
        match self {
            Symmetry::Rot90 => Symmetry::Rot270,
            Symmetry::Rot270 => Symmetry::Rot90,
            other => other,
        }
    }

    pub fn transform_board(self, board: &Board) -> Board {
        let size = board.size();
        let mut out = Board::new(size);
        for p in board.points() {
            out.set(self.apply(p, size), board.get(p));
        }
        out
    }
}

impl Position {
    /// This position seen through `sym`.
    pub fn transformed(&self, sym: Symmetry) -> Position {
        let size = self.size();
        Position::from_parts(
            sym.transform_board(self.board()),
            self.groups().map_points(|p| sym.apply(p, size)),
            self,
            self.ko().map(|p| sym.apply(p, size)),
            self.history()
                .iter()
                .map(|&mv| sym.apply_move(mv, size))
                .collect(),
        )
    }

    /// All eight transforms, in [`Symmetry::ALL`] order; the first is the
    /// identity. Symmetric positions are not de-duplicated.
    pub fn symmetries(&self) -> Vec<Position> {
        Symmetry::ALL.iter().map(|&sym| self.transformed(sym)).collect()
    }
}
