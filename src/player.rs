//! Move selection interface and a simple match driver.
//!
//! Neural-network move evaluators live outside this crate; they plug in
//! through [`MoveEvaluator`]. [`RandomPlayer`] is the built-in opponent used
//! by self-play and the GTP front end.

use anyhow::{Context, Result};
use log::info;

use crate::board::{Color, Move, Point};
use crate::constants::{DEFAULT_SIZE, max_game_len};
use crate::position::Position;

/// Anything that picks a move for the side to play.
pub trait Player {
    fn get_move(&mut self, pos: &Position) -> Move;
}

/// Plays uniformly among legal moves, never filling its own eyes. Passes
/// when nothing else is left.
pub struct RandomPlayer {
    rng: fastrand::Rng,
}

impl Default for RandomPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomPlayer {
    pub fn new() -> Self {
        Self {
            rng: fastrand::Rng::new(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }
}

impl Player for RandomPlayer {
    fn get_move(&mut self, pos: &Position) -> Move {
        let me = pos.current_player();
        let candidates: Vec<Point> = pos
            .legal_moves()
            .into_iter()
            .filter(|&p| !pos.is_eye(p, me))
            .collect();
        if candidates.is_empty() {
            return Move::Pass;
        }
        Move::Play(candidates[self.rng.usize(..candidates.len())])
    }
}

/// Scores candidate moves, e.g. a policy network.
pub trait MoveEvaluator {
    /// A probability-like score for each of `moves` in `pos`.
    fn eval_state(&self, pos: &Position, moves: &[Point]) -> Vec<(Point, f32)>;
}

/// Always plays the highest scored legal move.
pub struct GreedyPolicyPlayer<E> {
    policy: E,
}

impl<E: MoveEvaluator> GreedyPolicyPlayer<E> {
    pub fn new(policy: E) -> Self {
        Self { policy }
    }
}

impl<E: MoveEvaluator> Player for GreedyPolicyPlayer<E> {
    fn get_move(&mut self, pos: &Position) -> Move {
        let legal = pos.legal_moves();
        self.policy
            .eval_state(pos, &legal)
            .into_iter()
            .filter(|&(p, _)| pos.is_legal(Move::Play(p)))
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map_or(Move::Pass, |(p, _)| Move::Play(p))
    }
}

#[derive(Clone, Debug)]
pub struct MatchConfig {
    pub size: usize,
    /// The game is stopped after this many turns even without two passes.
    pub max_turns: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self::with_size(DEFAULT_SIZE)
    }
}

impl MatchConfig {
    pub fn with_size(size: usize) -> Self {
        Self {
            size,
            max_turns: max_game_len(size),
        }
    }
}

/// Alternate `black` and `white` from an empty board until two passes or
/// the turn limit. Returns the final position.
///
/// # Errors
/// If a player returns an illegal move.
pub fn play_match(
    black: &mut dyn Player,
    white: &mut dyn Player,
    config: &MatchConfig,
) -> Result<Position> {
    let mut pos = Position::new(config.size);
    while pos.turns_played() < config.max_turns {
        let to_play = pos.current_player();
        let player: &mut dyn Player = match to_play {
            Color::Black => &mut *black,
            Color::White => &mut *white,
        };
        let mv = player.get_move(&pos);
        let ended = pos
            .do_move(mv)
            .with_context(|| format!("{to_play} chose {mv} at turn {}", pos.turns_played()))?;
        if ended {
            break;
        }
    }
    info!(
        "game over after {} turns: black {} stones / {} prisoners, white {} stones / {} prisoners",
        pos.turns_played(),
        pos.board().count(Color::Black),
        pos.black_prisoners(),
        pos.board().count(Color::White),
        pos.white_prisoners(),
    );
    Ok(pos)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct PreferCorner;

    impl MoveEvaluator for PreferCorner {
        fn eval_state(&self, _pos: &Position, moves: &[Point]) -> Vec<(Point, f32)> {
            moves
                .iter()
                .map(|&(x, y)| ((x, y), 1.0 / (1.0 + (x + y) as f32)))
                .collect()
        }
    }

    #[test]
    fn test_greedy_picks_best_score() {
        let mut player = GreedyPolicyPlayer::new(PreferCorner);
        let mut pos = Position::new(5);
        assert_eq!(player.get_move(&pos), Move::Play((0, 0)));
        pos.do_move(Move::Play((0, 0))).unwrap();
        assert_ne!(player.get_move(&pos), Move::Play((0, 0)));
    }

    #[test]
    fn test_random_player_passes_on_full_board() {
        // 1x1 board: the only point is suicide for both sides.
        let pos = Position::new(1);
        let mut player = RandomPlayer::with_seed(7);
        assert_eq!(player.get_move(&pos), Move::Pass);
    }

    #[test]
    fn test_seeded_players_are_reproducible() {
        let config = MatchConfig::with_size(7);
        let a = play_match(
            &mut RandomPlayer::with_seed(1),
            &mut RandomPlayer::with_seed(2),
            &config,
        )
        .unwrap();
        let b = play_match(
            &mut RandomPlayer::with_seed(1),
            &mut RandomPlayer::with_seed(2),
            &config,
        )
        .unwrap();
        assert_eq!(a.history(), b.history());
        assert!(a.turns_played() <= config.max_turns);
        assert!(a.cache_is_consistent());
    }
}
