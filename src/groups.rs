//! Incrementally maintained group and liberty cache.
//!
//! Every occupied cell stores a [`GroupId`] handle into an arena of group
//! records. All members of a group therefore share one stone list and one
//! liberty set, and merging groups only reassigns the handles of the smaller
//! side.
//!
//! Records are held behind [`Arc`] and written through [`Arc::make_mut`], so
//! cloning the cache copies handles only. A clone that is then mutated copies
//! just the records it touches, and can never change what the original sees.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::board::{Board, Color, Point};

/// Handle of a group record in the arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct GroupId(usize);

/// A maximal connected set of same-colored stones and its liberties.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group {
    color: Color,
    stones: Vec<Point>,
    liberties: BTreeSet<Point>,
}

impl Group {
    pub fn color(&self) -> Color {
        self.color
    }

    pub fn stones(&self) -> &[Point] {
        &self.stones
    }

    pub fn len(&self) -> usize {
        self.stones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stones.is_empty()
    }

    pub fn liberties(&self) -> &BTreeSet<Point> {
        &self.liberties
    }

    pub fn liberty_count(&self) -> usize {
        self.liberties.len()
    }

    pub fn contains(&self, p: Point) -> bool {
        self.stones.contains(&p)
    }
}

#[derive(Clone, Debug)]
pub struct Groups {
    size: usize,
    handles: Vec<Option<GroupId>>,
    arena: Vec<Option<Arc<Group>>>,
    free: Vec<GroupId>,
}

impl Groups {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            handles: vec![None; size * size],
            arena: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Build the cache from scratch by flood fill.
    pub fn from_board(board: &Board) -> Self {
        let mut groups = Groups::new(board.size());
        for start in board.points() {
            let Some(color) = board.get(start) else {
                continue;
            };
            if groups.id_at(start).is_some() {
                continue;
            }
            let mut stones = Vec::new();
            let mut liberties = BTreeSet::new();
            let mut stack = vec![start];
            let mut seen = BTreeSet::from([start]);
            while let Some(p) = stack.pop() {
                stones.push(p);
                for n in board.neighbors(p) {
                    match board.get(n) {
                        None => {
                            liberties.insert(n);
                        }
                        Some(c) if c == color && seen.insert(n) => stack.push(n),
                        _ => {}
                    }
                }
            }
            groups.alloc(Group {
                color,
                stones,
                liberties,
            });
        }
        groups
    }

    fn idx(&self, (x, y): Point) -> usize {
        x * self.size + y
    }

    pub fn id_at(&self, p: Point) -> Option<GroupId> {
        self.handles[self.idx(p)]
    }

    pub fn get(&self, id: GroupId) -> &Group {
        match &self.arena[id.0] {
            Some(group) => group,
            None => panic!("stale group handle {id:?}"),
        }
    }

    pub fn group_at(&self, p: Point) -> Option<&Group> {
        self.id_at(p).map(|id| self.get(id))
    }

    /// Liberties of the group at `p`, zero for an empty point.
    pub fn liberty_count(&self, p: Point) -> usize {
        self.group_at(p).map_or(0, Group::liberty_count)
    }

    /// All live groups, in arena order.
    pub fn iter(&self) -> impl Iterator<Item = (GroupId, &Group)> {
        self.arena
            .iter()
            .enumerate()
            .filter_map(|(i, g)| g.as_deref().map(|g| (GroupId(i), g)))
    }

    fn get_mut(&mut self, id: GroupId) -> &mut Group {
        match &mut self.arena[id.0] {
            Some(group) => Arc::make_mut(group),
            None => panic!("stale group handle {id:?}"),
        }
    }

    fn alloc(&mut self, group: Group) -> GroupId {
        let id = match self.free.pop() {
            Some(id) => id,
            None => {
                self.arena.push(None);
                GroupId(self.arena.len() - 1)
            }
        };
        for &s in &group.stones {
            let i = self.idx(s);
            self.handles[i] = Some(id);
        }
        self.arena[id.0] = Some(Arc::new(group));
        id
    }

    fn release(&mut self, id: GroupId) -> Arc<Group> {
        self.free.push(id);
        match self.arena[id.0].take() {
            Some(group) => group,
            None => panic!("stale group handle {id:?}"),
        }
    }

    /// Write a `color` stone at the empty point `p` and update the cache.
    ///
    /// Enemy neighbors lose `p` as a liberty; friendly neighbors are merged
    /// with the new stone into one group. Returns the adjacent enemy groups
    /// left without liberties, which the caller must capture.
    pub fn place(&mut self, board: &mut Board, p: Point, color: Color) -> Vec<GroupId> {
        board.set(p, Some(color));

        let mut liberties = BTreeSet::new();
        let mut friends: Vec<GroupId> = Vec::new();
        let mut dead: Vec<GroupId> = Vec::new();
        for n in board.neighbors(p) {
            let Some(c) = board.get(n) else {
                liberties.insert(n);
                continue;
            };
            let Some(id) = self.id_at(n) else {
                continue;
            };
            if c == color {
                if !friends.contains(&id) {
                    friends.push(id);
                }
            } else {
                let group = self.get_mut(id);
                group.liberties.remove(&p);
                if group.liberties.is_empty() && !dead.contains(&id) {
                    dead.push(id);
                }
            }
        }

        let Some(&base) = friends.iter().max_by_key(|&&id| self.get(id).len()) else {
            self.alloc(Group {
                color,
                stones: vec![p],
                liberties,
            });
            return dead;
        };

        let mut stones = vec![p];
        for &other in friends.iter().filter(|&&id| id != base) {
            let absorbed = self.release(other);
            liberties.extend(absorbed.liberties.iter().copied());
            stones.extend(absorbed.stones.iter().copied());
        }
        for &s in &stones {
            let i = self.idx(s);
            self.handles[i] = Some(base);
        }
        let group = self.get_mut(base);
        group.stones.extend(stones);
        group.liberties.extend(liberties);
        group.liberties.remove(&p);
        dead
    }

    /// Take a captured group off the board.
    ///
    /// Every removed point becomes a liberty of each group still touching it.
    /// Returns the removed stones.
    pub fn remove(&mut self, board: &mut Board, id: GroupId) -> Vec<Point> {
        let group = self.release(id);
        for &s in &group.stones {
            board.set(s, None);
            let i = self.idx(s);
            self.handles[i] = None;
        }
        for &s in &group.stones {
            for n in board.neighbors(s) {
                if let Some(nid) = self.id_at(n) {
                    self.get_mut(nid).liberties.insert(s);
                }
            }
        }
        group.stones.clone()
    }

    /// The cache of the board obtained by moving every point through `f`.
    pub fn map_points(&self, f: impl Fn(Point) -> Point) -> Groups {
        let mut handles = vec![None; self.handles.len()];
        let arena = self
            .arena
            .iter()
            .enumerate()
            .map(|(i, slot)| {
                slot.as_ref().map(|group| {
                    let stones: Vec<Point> = group.stones.iter().map(|&s| f(s)).collect();
                    for &s in &stones {
                        handles[self.idx(s)] = Some(GroupId(i));
                    }
                    Arc::new(Group {
                        color: group.color,
                        stones,
                        liberties: group.liberties.iter().map(|&l| f(l)).collect(),
                    })
                })
            })
            .collect();
        Groups {
            size: self.size,
            handles,
            arena,
            free: self.free.clone(),
        }
    }

    /// Check the cache against a full recomputation from `board`.
    ///
    /// Every stone must carry a handle to a record of its color whose stone
    /// set and liberty set match the flood-filled group, and empty points must
    /// carry no handle.
    pub fn is_consistent_with(&self, board: &Board) -> bool {
        let fresh = Groups::from_board(board);
        board.points().all(|p| match (self.group_at(p), fresh.group_at(p)) {
            (None, None) => true,
            (Some(cached), Some(expected)) => {
                let a: BTreeSet<Point> = cached.stones.iter().copied().collect();
                let b: BTreeSet<Point> = expected.stones.iter().copied().collect();
                cached.color == expected.color
                    && a.len() == cached.stones.len()
                    && a == b
                    && cached.liberties == expected.liberties
            }
            _ => false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(groups: &mut Groups, board: &mut Board, p: Point, color: Color) -> Vec<GroupId> {
        let dead = groups.place(board, p, color);
        assert!(groups.is_consistent_with(board));
        dead
    }

    #[test]
    fn test_single_stone_liberties() {
        let mut board = Board::new(9);
        let mut groups = Groups::new(9);
        place(&mut groups, &mut board, (4, 4), Color::Black);
        assert_eq!(groups.liberty_count((4, 4)), 4);
        place(&mut groups, &mut board, (0, 0), Color::Black);
        assert_eq!(groups.liberty_count((0, 0)), 2);
        assert_eq!(groups.liberty_count((3, 3)), 0);
    }

    #[test]
    fn test_bridge_merges_groups() {
        let mut board = Board::new(9);
        let mut groups = Groups::new(9);
        place(&mut groups, &mut board, (2, 2), Color::Black);
        place(&mut groups, &mut board, (4, 2), Color::Black);
        place(&mut groups, &mut board, (3, 3), Color::Black);
        assert_ne!(groups.id_at((2, 2)), groups.id_at((4, 2)));

        place(&mut groups, &mut board, (3, 2), Color::Black);
        let id = groups.id_at((3, 2));
        assert_eq!(groups.id_at((2, 2)), id);
        assert_eq!(groups.id_at((4, 2)), id);
        assert_eq!(groups.id_at((3, 3)), id);
        assert_eq!(groups.group_at((3, 2)).map(Group::len), Some(4));
        assert_eq!(groups.liberty_count((2, 2)), 8);
        assert_eq!(groups.iter().count(), 1);
    }

    #[test]
    fn test_enemy_loses_liberty_and_dies() {
        let mut board = Board::new(5);
        let mut groups = Groups::new(5);
        place(&mut groups, &mut board, (0, 0), Color::White);
        assert!(place(&mut groups, &mut board, (1, 0), Color::Black).is_empty());
        assert_eq!(groups.liberty_count((0, 0)), 1);

        let dead = place(&mut groups, &mut board, (0, 1), Color::Black);
        assert_eq!(dead.len(), 1);
        assert_eq!(groups.liberty_count((0, 0)), 0);

        let removed = groups.remove(&mut board, dead[0]);
        assert_eq!(removed, vec![(0, 0)]);
        assert!(groups.is_consistent_with(&board));
        assert_eq!(groups.liberty_count((1, 0)), 3);
        assert_eq!(groups.liberty_count((0, 1)), 3);
    }

    #[test]
    fn test_clone_is_copy_on_write() {
        let mut board = Board::new(5);
        let mut groups = Groups::new(5);
        place(&mut groups, &mut board, (2, 2), Color::Black);

        let original_board = board.clone();
        let original = groups.clone();
        place(&mut groups, &mut board, (2, 3), Color::White);

        assert_eq!(original.liberty_count((2, 2)), 4);
        assert_eq!(groups.liberty_count((2, 2)), 3);
        assert!(original.is_consistent_with(&original_board));
    }

    #[test]
    fn test_map_points_transposes() {
        let mut board = Board::new(5);
        let mut groups = Groups::new(5);
        place(&mut groups, &mut board, (0, 1), Color::Black);
        place(&mut groups, &mut board, (0, 2), Color::Black);
        place(&mut groups, &mut board, (1, 1), Color::White);

        let mut transposed = Board::new(5);
        for p in board.points() {
            transposed.set((p.1, p.0), board.get(p));
        }
        let mapped = groups.map_points(|(x, y)| (y, x));
        assert!(mapped.is_consistent_with(&transposed));
    }
}
