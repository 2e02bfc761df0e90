//! Go position representation and move execution.
//!
//! This module provides the rules engine:
//! - Legality checks (on board, occupancy, suicide, simple ko)
//! - Stone placement and capture with incremental group/liberty updates
//! - Turn, prisoner and history bookkeeping
//!
//! Suicide is decided from the cached liberty sets before anything is
//! written, so [`Position::do_move`] either commits a move completely or
//! rejects it without touching the position.

use std::fmt;

use log::debug;
use thiserror::Error;

use crate::board::{Board, Color, Move, Point};
use crate::groups::{Group, Groups};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("illegal move: {0}")]
    IllegalMove(Move),
}

/// A Go position (board state plus game bookkeeping).
#[derive(Clone, Debug)]
pub struct Position {
    board: Board,
    groups: Groups,
    current_player: Color,
    turns_played: usize,
    ko: Option<Point>,
    history: Vec<Move>,
    black_prisoners: usize,
    white_prisoners: usize,
}

impl Default for Position {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_SIZE)
    }
}

impl Position {
    /// Empty board, Black to move.
    ///
    /// # Panics
    /// If `size` is zero.
    pub fn new(size: usize) -> Self {
        assert!(size >= crate::constants::MIN_SIZE, "board size must be at least 1");
        Position {
            board: Board::new(size),
            groups: Groups::new(size),
            current_player: Color::Black,
            turns_played: 0,
            ko: None,
            history: Vec::new(),
            black_prisoners: 0,
            white_prisoners: 0,
        }
    }

    /// Replay `moves` from an empty board of the given size.
    pub fn replay(size: usize, moves: &[Move]) -> Result<Self, MoveError> {
        let mut pos = Position::new(size);
        for &mv in moves {
            pos.do_move(mv)?;
        }
        Ok(pos)
    }

    pub(crate) fn from_parts(
        board: Board,
        groups: Groups,
        template: &Position,
        ko: Option<Point>,
        history: Vec<Move>,
    ) -> Self {
        Position {
            board,
            groups,
            current_player: template.current_player,
            turns_played: template.turns_played,
            ko,
            history,
            black_prisoners: template.black_prisoners,
            white_prisoners: template.white_prisoners,
        }
    }

    /// Independent deep copy. Group records are shared copy-on-write, so
    /// mutating either side never shows through to the other.
    pub fn copy(&self) -> Position {
        self.clone()
    }

    pub fn size(&self) -> usize {
        self.board.size()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn groups(&self) -> &Groups {
        &self.groups
    }

    pub fn current_player(&self) -> Color {
        self.current_player
    }

    pub fn turns_played(&self) -> usize {
        self.turns_played
    }

    pub fn ko(&self) -> Option<Point> {
        self.ko
    }

    pub fn history(&self) -> &[Move] {
        &self.history
    }

    pub fn last_move(&self) -> Option<Move> {
        self.history.last().copied()
    }

    /// White stones captured by Black.
    pub fn black_prisoners(&self) -> usize {
        self.black_prisoners
    }

    /// Black stones captured by White.
    pub fn white_prisoners(&self) -> usize {
        self.white_prisoners
    }

    /// Prisoners held by `color`, i.e. opposing stones it has captured.
    pub fn prisoners(&self, color: Color) -> usize {
        match color {
            Color::Black => self.black_prisoners,
            Color::White => self.white_prisoners,
        }
    }

    pub fn stone_at(&self, p: Point) -> Option<Color> {
        self.board.get(p)
    }

    pub fn group_at(&self, p: Point) -> Option<&Group> {
        if !self.is_on_board(p) {
            return None;
        }
        self.groups.group_at(p)
    }

    /// Liberties of the group at `p`, sorted. For an empty point, its empty neighbors.
    pub fn liberties_at(&self, p: Point) -> Vec<Point> {
        match self.group_at(p) {
            Some(group) => group.liberties().iter().copied().collect(),
            None if self.is_on_board(p) => {
                let mut empty: Vec<Point> = self
                    .board
                    .neighbors(p)
                    .filter(|&n| self.board.get(n).is_none())
                    .collect();
                empty.sort_unstable();
                empty
            }
            None => Vec::new(),
        }
    }

    /// Liberty count of the group at `p`, zero for an empty point.
    pub fn liberty_count(&self, p: Point) -> usize {
        self.group_at(p).map_or(0, Group::liberty_count)
    }

    /// The distinct groups orthogonally adjacent to `p`.
    pub fn groups_around(&self, p: Point) -> Vec<&Group> {
        let mut ids = Vec::with_capacity(4);
        for n in self.board.neighbors(p) {
            if let Some(id) = self.groups.id_at(n) {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
        }
        ids.into_iter().map(|id| self.groups.get(id)).collect()
    }

    pub fn is_on_board(&self, p: Point) -> bool {
        self.board.on_board(p)
    }

    /// Would the current player placing at the empty point `p` be suicide?
    ///
    /// Decided from the pre-move caches: the stone dies only if `p` has no
    /// empty neighbor, every adjacent friendly group has `p` as its last
    /// liberty, and no adjacent enemy group has `p` as its last liberty.
    pub fn is_suicide(&self, p: Point) -> bool {
        if !self.board.is_empty(p) {
            return false;
        }
        for n in self.board.neighbors(p) {
            match self.groups.group_at(n) {
                None => return false,
                Some(group) if group.color() == self.current_player => {
                    if group.liberty_count() > 1 {
                        return false;
                    }
                }
                Some(group) => {
                    if group.liberty_count() == 1 {
                        return false;
                    }
                }
            }
        }
        true
    }

    /// A pass is always legal. A stone must go on an empty on-board point
    /// that is neither suicide nor the ko point.
    pub fn is_legal(&self, mv: Move) -> bool {
        match mv {
            Move::Pass => true,
            Move::Play(p) => {
                self.board.is_empty(p) && self.ko != Some(p) && !self.is_suicide(p)
            }
        }
    }

    /// All legal stone placements in row-major order. Passing is always
    /// available as well and is not listed.
    pub fn legal_moves(&self) -> Vec<Point> {
        self.board
            .points()
            .filter(|&p| self.is_legal(Move::Play(p)))
            .collect()
    }

    /// Is `p` empty with every orthogonal neighbor an `owner` stone?
    pub fn is_eye(&self, p: Point, owner: Color) -> bool {
        self.board.is_empty(p) && self.board.neighbors(p).all(|n| self.board.get(n) == Some(owner))
    }

    /// Two consecutive passes end the game.
    pub fn is_end_of_game(&self) -> bool {
        matches!(self.history.as_slice(), [.., Move::Pass, Move::Pass])
    }

    /// Play `mv` for the current player.
    ///
    /// Captures adjacent enemy groups left without liberties, records a ko
    /// point when a single stone was taken by a lone stone in atari, then
    /// hands the turn over. Returns `Ok(true)` when this move ended the game.
    ///
    /// # Errors
    /// [`MoveError::IllegalMove`] if [`is_legal`](Self::is_legal) rejects the
    /// move; the position is left untouched.
    pub fn do_move(&mut self, mv: Move) -> Result<bool, MoveError> {
        if !self.is_legal(mv) {
            debug!("rejected {mv} for {} at turn {}", self.current_player, self.turns_played);
            return Err(MoveError::IllegalMove(mv));
        }

        self.ko = None;
        if let Move::Play(p) = mv {
            let player = self.current_player;
            let dead = self.groups.place(&mut self.board, p, player);

            let mut captured = Vec::new();
            for id in dead {
                captured.extend(self.groups.remove(&mut self.board, id));
            }
            match player {
                Color::Black => self.black_prisoners += captured.len(),
                Color::White => self.white_prisoners += captured.len(),
            }

            if let [single] = captured.as_slice() {
                // A lone stone in atari could retake at once; anything bigger is a snapback.
                let own = self.groups.group_at(p);
                if own.is_some_and(|g| g.len() == 1 && g.liberty_count() == 1) {
                    self.ko = Some(*single);
                }
            }
        }

        self.current_player = self.current_player.opponent();
        self.turns_played += 1;
        self.history.push(mv);
        Ok(self.is_end_of_game())
    }

    /// Does the cache agree with a full recomputation from the board?
    pub fn cache_is_consistent(&self) -> bool {
        self.groups.is_consistent_with(&self.board)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.board)?;
        write!(
            f,
            "move {}, {} to play, prisoners B {} W {}",
            self.turns_played, self.current_player, self.black_prisoners, self.white_prisoners
        )?;
        if let Some(ko) = self.ko {
            write!(f, ", ko at {}", Move::Play(ko))?;
        }
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(pos: &mut Position, moves: &[Point]) {
        for &p in moves {
            pos.do_move(Move::Play(p)).unwrap();
        }
    }

    #[test]
    fn test_empty_position() {
        let pos = Position::new(9);
        assert_eq!(pos.turns_played(), 0);
        assert_eq!(pos.current_player(), Color::Black);
        assert_eq!(pos.ko(), None);
        assert_eq!(pos.legal_moves().len(), 81);
        assert!(pos.history().is_empty());
    }

    #[test]
    fn test_occupied_point_becomes_illegal() {
        let mut pos = Position::new(19);
        assert!(pos.is_legal(Move::Play((3, 3))));
        pos.do_move(Move::Play((3, 3))).unwrap();
        assert!(!pos.is_legal(Move::Play((3, 3))));
        assert_eq!(pos.current_player(), Color::White);
        assert_eq!(pos.liberty_count((3, 3)), 4);
    }

    #[test]
    fn test_off_board_is_illegal() {
        let pos = Position::new(5);
        assert!(!pos.is_legal(Move::Play((5, 0))));
        assert!(!pos.is_legal(Move::Play((0, 7))));
        assert!(pos.is_legal(Move::Pass));
    }

    #[test]
    fn test_corner_suicide() {
        let mut pos = Position::new(9);
        // Black (0,1), White elsewhere, Black (1,0): the corner is suicide for White.
        play(&mut pos, &[(0, 1), (8, 8), (1, 0)]);
        assert!(pos.is_suicide((0, 0)));
        assert!(!pos.is_legal(Move::Play((0, 0))));
        assert_eq!(
            pos.do_move(Move::Play((0, 0))),
            Err(MoveError::IllegalMove(Move::Play((0, 0))))
        );
    }

    #[test]
    fn test_filling_own_last_liberty_is_suicide() {
        let mut pos = Position::new(5);
        // Black (1,0) is in atari at (0,0), and White holds (0,1) with liberties to spare.
        play(&mut pos, &[(1, 0), (2, 0), (4, 4), (1, 1), (4, 3), (0, 1)]);
        assert!(pos.is_suicide((0, 0)));
    }

    #[test]
    fn test_capture_is_not_suicide() {
        let mut pos = Position::new(5);
        // White (0,0) in the corner; Black holds (0,1). Black (1,0) captures.
        play(&mut pos, &[(0, 1), (0, 0)]);
        assert!(!pos.is_suicide((1, 0)));
        play(&mut pos, &[(1, 0)]);
        assert_eq!(pos.stone_at((0, 0)), None);
        assert_eq!(pos.black_prisoners(), 1);
        assert_eq!(pos.white_prisoners(), 0);
        assert!(pos.cache_is_consistent());
    }

    #[test]
    fn test_is_eye() {
        let mut pos = Position::new(5);
        play(&mut pos, &[(0, 1), (4, 4), (1, 0)]);
        assert!(pos.is_eye((0, 0), Color::Black));
        assert!(!pos.is_eye((0, 0), Color::White));
        assert!(!pos.is_eye((2, 2), Color::Black));
        assert!(!pos.is_eye((0, 1), Color::Black));
    }

    #[test]
    fn test_two_passes_end_game() {
        let mut pos = Position::new(5);
        assert_eq!(pos.do_move(Move::Pass), Ok(false));
        assert_eq!(pos.do_move(Move::Play((2, 2))), Ok(false));
        assert_eq!(pos.do_move(Move::Pass), Ok(false));
        assert_eq!(pos.do_move(Move::Pass), Ok(true));
        assert!(pos.is_end_of_game());
        assert_eq!(pos.turns_played(), 4);
    }

    #[test]
    fn test_groups_around_is_unique() {
        let mut pos = Position::new(5);
        // White L-shape around (1,1): (1,0), (0,1) are not connected, (2,1),(2,0) connect to (1,0).
        play(&mut pos, &[(4, 4), (1, 0), (4, 3), (2, 0), (4, 2), (2, 1), (3, 4), (0, 1)]);
        let around = pos.groups_around((1, 1));
        assert_eq!(around.len(), 2);
        assert!(around.iter().all(|g| g.color() == Color::White));
    }

    #[test]
    fn test_replay_matches_moves() {
        let moves = [Move::Play((2, 2)), Move::Pass, Move::Play((3, 3))];
        let pos = Position::replay(9, &moves).unwrap();
        assert_eq!(pos.history(), &moves);
        assert_eq!(pos.current_player(), Color::White);
        assert_eq!(
            Position::replay(9, &[Move::Play((2, 2)), Move::Play((2, 2))]).unwrap_err(),
            MoveError::IllegalMove(Move::Play((2, 2)))
        );
    }
}
