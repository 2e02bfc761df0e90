//! Ladder reading.
//!
//! A ladder is read by playing it out on a copy of the position: the prey
//! extends into its only liberty, and the hunter answers on the one new
//! liberty diagonal to its previous stone, until the prey is captured or
//! gets out. Nothing here mutates the position it was handed.

use log::trace;

use crate::board::{Color, Move, Point};
use crate::constants::LADDER_HORIZON;
use crate::groups::GroupId;
use crate::position::Position;

/// How far a ladder chase is read.
///
/// Beyond the plain extend-and-re-atari chase, the prey is also counted as
/// escaped when one of its stones touches a hunter group in atari, since it
/// can capture that group instead of extending.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LadderReader {
    /// Hunter re-ataris to simulate before the chase is accepted as a
    /// capture. `None` reads until capture or escape.
    horizon: Option<usize>,
}

impl Default for LadderReader {
    fn default() -> Self {
        Self::new(LADDER_HORIZON)
    }
}

impl LadderReader {
    pub fn new(horizon: usize) -> Self {
        Self {
            horizon: Some(horizon),
        }
    }

    /// Read every chase to its end, capped at one step per board point.
    pub fn exhaustive() -> Self {
        Self { horizon: None }
    }

    pub fn horizon(&self) -> Option<usize> {
        self.horizon
    }

    /// Does the current player playing `action` start a ladder that captures?
    pub fn is_capture(&self, pos: &Position, action: Point) -> bool {
        let hunter = pos.current_player();
        let mut after = pos.copy();
        if after.do_move(Move::Play(action)).is_err() {
            return false;
        }
        if !after.groups().iter().any(|(_, g)| g.liberty_count() == 1) {
            return false;
        }

        let mut prey: Vec<GroupId> = Vec::new();
        for p in after.board().surrounding(action) {
            let Some(id) = after.groups().id_at(p) else {
                continue;
            };
            let group = after.groups().get(id);
            if group.color() != hunter && group.liberty_count() == 1 && !prey.contains(&id) {
                prey.push(id);
            }
        }
        if prey.is_empty() {
            trace!("{action:?}: no prey in atari next to the move");
            return false;
        }

        prey.iter().any(|&id| {
            let stone = after.groups().get(id).stones()[0];
            self.chase(after.copy(), stone, action)
        })
    }

    /// Play out one chase. `prey` is any stone of the group in atari, with the
    /// prey to move and `hunter_move` the hunter's last stone.
    fn chase(&self, mut pos: Position, prey: Point, mut hunter_move: Point) -> bool {
        let hunter = pos.current_player().opponent();
        let max_steps = pos.size() * pos.size();
        let mut responses = 0;

        for step in 0..max_steps {
            let Some(group) = pos.group_at(prey) else {
                trace!("{prey:?}: captured after {step} steps");
                return true;
            };
            let Some(&escape) = group.liberties().first() else {
                return true;
            };
            if group.liberty_count() != 1 {
                trace!("{prey:?}: out of atari after {step} steps");
                return false;
            }
            if self.can_counter_capture(&pos, prey, hunter) {
                trace!("{prey:?}: escapes by capturing a hunter stone");
                return false;
            }
            if self.horizon.is_some_and(|h| responses >= h) {
                return true;
            }

            if pos.do_move(Move::Play(escape)).is_err() {
                // No legal extension: the prey sits in atari with nowhere to go.
                return true;
            }
            let liberties = pos.liberties_at(escape);
            let next = match liberties.as_slice() {
                [last] => *last,
                [_, _] => {
                    let diagonal: Vec<Point> = liberties
                        .iter()
                        .copied()
                        .filter(|l| l.0 != hunter_move.0 && l.1 != hunter_move.1)
                        .collect();
                    let [next] = diagonal.as_slice() else {
                        trace!("{prey:?}: no unique diagonal answer to {escape:?}");
                        return false;
                    };
                    *next
                }
                _ => {
                    trace!("{prey:?}: extension at {escape:?} gains {} liberties", liberties.len());
                    return false;
                }
            };

            if pos.do_move(Move::Play(next)).is_err() {
                return false;
            }
            hunter_move = next;
            responses += 1;
        }

        trace!("{prey:?}: chase exceeded {max_steps} steps");
        false
    }

    /// Can the prey group at `prey` take a hunter group that is in atari?
    fn can_counter_capture(&self, pos: &Position, prey: Point, hunter: Color) -> bool {
        let Some(group) = pos.group_at(prey) else {
            return false;
        };
        group.stones().iter().any(|&s| {
            pos.board().neighbors(s).any(|n| {
                pos.group_at(n)
                    .is_some_and(|g| g.color() == hunter && g.liberty_count() == 1)
            })
        })
    }

    /// Does the current player playing `action` get a group out of atari for
    /// good?
    ///
    /// `action` must extend one of the mover's groups in atari, leave it with
    /// at least two liberties, and leave the opponent no ladder capture on
    /// any of those liberties.
    pub fn is_escape(&self, pos: &Position, action: Point) -> bool {
        let mover = pos.current_player();
        if !pos.is_legal(Move::Play(action)) {
            return false;
        }
        let extends_atari = pos
            .groups_around(action)
            .iter()
            .any(|g| g.color() == mover && g.liberty_count() == 1);
        if !extends_atari {
            return false;
        }

        let mut after = pos.copy();
        if after.do_move(Move::Play(action)).is_err() {
            return false;
        }
        let liberties = after.liberties_at(action);
        if liberties.len() < 2 {
            return false;
        }
        !liberties.iter().any(|&l| self.is_capture(&after, l))
    }
}

impl Position {
    /// Is `mv` a ladder capture for the current player, read with the
    /// default [`LadderReader`]?
    pub fn is_ladder_capture(&self, mv: Move) -> bool {
        match mv {
            Move::Play(p) => LadderReader::default().is_capture(self, p),
            Move::Pass => false,
        }
    }

    /// Like [`is_ladder_capture`](Self::is_ladder_capture), reading every chase to its end.
    pub fn is_ladder_capture_exhaustive(&self, mv: Move) -> bool {
        match mv {
            Move::Play(p) => LadderReader::exhaustive().is_capture(self, p),
            Move::Pass => false,
        }
    }

    /// Is `mv` a ladder escape for the current player, read with the default
    /// [`LadderReader`]?
    pub fn is_ladder_escape(&self, mv: Move) -> bool {
        match mv {
            Move::Play(p) => LadderReader::default().is_escape(self, p),
            Move::Pass => false,
        }
    }
}
