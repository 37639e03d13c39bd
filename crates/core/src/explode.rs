//! Explosion propagator - expands seeds into the full removal set
//!
//! Depth-first expansion over an explicit worklist with a visited set of token ids, so
//! chains of specials that sweep each other terminate without recursion:
//!
//! - plain: only itself
//! - line blast row/col: every cell of its row/column
//! - area blast: its 3x3 neighborhood
//! - wildcard: every surviving token of the target color (see [`wildcard_target`])
//!
//! Anchors reserved for transformation are never exploded. A frozen token caught by a
//! blast thaws instead of being removed. Removed cells destroy orthogonally adjacent
//! blockers and thaw orthogonally adjacent frozen tokens; collectibles are untouched.

use std::collections::HashSet;

use crate::board::Board;
use crate::types::{Cell, Color, Position, Token, TokenId, TokenKind, PALETTE_MAX};

/// A special token that went off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Detonation {
    pub pos: Position,
    pub kind: TokenKind,
    /// Target color for wildcards
    pub target: Option<Color>,
}

/// Everything one explosion pass does to the board
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Explosion {
    /// Removed tokens as they were before removal
    pub removed: Vec<Token>,
    pub detonations: Vec<Detonation>,
    pub blockers_destroyed: Vec<Position>,
    pub thawed: Vec<Position>,
}

impl Explosion {
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.blockers_destroyed.is_empty() && self.thawed.is_empty()
    }

    pub fn removed_of_color(&self, color: Color) -> usize {
        self.removed
            .iter()
            .filter(|t| t.color == color && t.kind != TokenKind::Wildcard)
            .count()
    }

    /// Removed tokens per column
    pub fn removed_in_column(&self, col: i8) -> usize {
        self.removed.iter().filter(|t| t.pos.col == col).count()
    }
}

/// Expand `seeds` into the full explosion.
///
/// `anchors` are skipped entirely. `spent` tokens are removed without detonating.
pub fn propagate(
    board: &Board,
    seeds: &[Position],
    anchors: &[Position],
    spent: &[Position],
) -> Explosion {
    let mut out = Explosion::default();
    let mut visited: HashSet<TokenId> = HashSet::new();
    let mut thawed: HashSet<Position> = HashSet::new();

    for &pos in spent {
        if let Some(t) = board.token(pos) {
            if visited.insert(t.id) {
                out.removed.push(*t);
            }
        }
    }

    let mut stack: Vec<Position> = seeds.iter().rev().copied().collect();
    while let Some(pos) = stack.pop() {
        if anchors.contains(&pos) {
            continue;
        }
        let Some(token) = board.token(pos).copied() else {
            continue;
        };
        if !visited.insert(token.id) {
            continue;
        }
        if token.frozen {
            if thawed.insert(pos) {
                out.thawed.push(pos);
            }
            continue;
        }
        out.removed.push(token);

        let target = match token.kind {
            TokenKind::Plain => continue,
            TokenKind::LineRow => {
                stack.extend(board.row_positions(pos.row));
                None
            }
            TokenKind::LineCol => {
                stack.extend(board.col_positions(pos.col));
                None
            }
            TokenKind::AreaBlast => {
                for dr in -1..=1 {
                    for dc in -1..=1 {
                        let p = pos.offset(dc, dr);
                        if board.contains(p) {
                            stack.push(p);
                        }
                    }
                }
                None
            }
            TokenKind::Wildcard => {
                let target = wildcard_target(board, &visited);
                if let Some(color) = target {
                    stack.extend(
                        board
                            .tokens()
                            .filter(|t| t.kind != TokenKind::Wildcard && t.color == color)
                            .map(|t| t.pos),
                    );
                }
                target
            }
        };
        log::trace!("detonate {:?} at {:?}", token.kind, pos);
        out.detonations.push(Detonation {
            pos,
            kind: token.kind,
            target,
        });
    }

    // Side effects of every removed cell on its orthogonal neighbors.
    let mut blockers: HashSet<Position> = HashSet::new();
    for t in &out.removed {
        for n in t.pos.neighbors() {
            match board.get(n) {
                Some(Cell::Blocker) => {
                    if blockers.insert(n) {
                        out.blockers_destroyed.push(n);
                    }
                }
                Some(Cell::Token(nt)) if nt.frozen && !visited.contains(&nt.id) => {
                    if thawed.insert(n) {
                        out.thawed.push(n);
                    }
                }
                _ => {}
            }
        }
    }

    out
}

/// Most frequent color among unvisited non-wildcard tokens (ties to the lowest color id)
pub fn wildcard_target(board: &Board, visited: &HashSet<TokenId>) -> Option<Color> {
    let mut counts = [0usize; PALETTE_MAX as usize];
    for t in board.tokens() {
        if t.kind != TokenKind::Wildcard && !visited.contains(&t.id) {
            counts[(t.color.index() - 1) as usize] += 1;
        }
    }
    let mut best: Option<(usize, Color)> = None;
    for color in Color::ALL {
        let n = counts[(color.index() - 1) as usize];
        if n > 0 && best.map_or(true, |(b, _)| n > b) {
            best = Some((n, color));
        }
    }
    best.map(|(_, c)| c)
}

/// Apply an explosion to the board
pub fn apply(board: &mut Board, explosion: &Explosion) {
    for t in &explosion.removed {
        if board.token(t.pos).map(|cur| cur.id) == Some(t.id) {
            board.take(t.pos);
        }
    }
    for &pos in &explosion.blockers_destroyed {
        board.set(pos, Cell::Empty);
    }
    for &pos in &explosion.thawed {
        if let Some(t) = board.token_mut(pos) {
            t.frozen = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(rows: &[&str]) -> Board {
        Board::from_rows(rows).unwrap()
    }

    fn removed_positions(e: &Explosion) -> HashSet<Position> {
        e.removed.iter().map(|t| t.pos).collect()
    }

    #[test]
    fn test_plain_seed_removes_only_itself() {
        let b = board(&["1 2 3", "2 3 1", "3 1 2"]);
        let e = propagate(&b, &[Position::new(1, 1)], &[], &[]);
        assert_eq!(e.removed.len(), 1);
        assert!(e.detonations.is_empty());
    }

    #[test]
    fn test_row_blast_clears_row() {
        let b = board(&["1 2 3 4", "2 3h 1 2", "3 1 2 3"]);
        let e = propagate(&b, &[Position::new(1, 1)], &[], &[]);
        assert_eq!(e.removed.len(), 4);
        assert!(e.removed.iter().all(|t| t.pos.row == 1));
        assert_eq!(e.detonations.len(), 1);
    }

    #[test]
    fn test_chain_reaches_nested_specials() {
        // row blast sweeps a column blast that sweeps an area blast
        let b = board(&[
            "1 2 3 4 5",
            "2 3 1 2 3",
            "3 1 2 3 4",
            "4h 5 6 1v 2",
            "5 6 1 2 3",
            "6 1 2 3 4",
        ]);
        let b = {
            let mut b = b;
            let t = b.token_mut(Position::new(3, 0)).unwrap();
            t.kind = TokenKind::AreaBlast;
            b
        };
        let e = propagate(&b, &[Position::new(0, 3)], &[], &[]);
        let removed = removed_positions(&e);
        assert_eq!(e.detonations.len(), 3);
        for col in 0..5 {
            assert!(removed.contains(&Position::new(col, 3)));
        }
        for row in 0..6 {
            assert!(removed.contains(&Position::new(3, row)));
        }
        assert!(removed.contains(&Position::new(4, 1)));
        assert!(removed.contains(&Position::new(2, 1)));
    }

    #[test]
    fn test_mutual_blasts_terminate() {
        let b = board(&["1h 2v 3h", "2v 3h 1v", "3h 1v 2h"]);
        let seeds: Vec<Position> = b.positions().collect();
        let e = propagate(&b, &seeds, &[], &[]);
        assert_eq!(e.removed.len(), 9);
        assert_eq!(e.detonations.len(), 9);
    }

    #[test]
    fn test_anchor_is_not_exploded() {
        let b = board(&["1 1h 1 2", "2 3 4 3", "3 4 2 4"]);
        let anchor = Position::new(2, 0);
        let e = propagate(&b, &[Position::new(1, 0)], &[anchor], &[]);
        assert!(!removed_positions(&e).contains(&anchor));
        assert_eq!(e.removed.len(), 3);
    }

    #[test]
    fn test_blast_thaws_frozen_and_breaks_adjacent_blockers() {
        let b = board(&["1 # 3", "2h 3f 1", "# 1 2"]);
        let e = propagate(&b, &[Position::new(0, 1)], &[], &[]);
        assert_eq!(e.thawed, vec![Position::new(1, 1)]);
        assert_eq!(e.removed.len(), 2);
        assert_eq!(e.blockers_destroyed, vec![Position::new(0, 2)]);

        let mut b = b;
        apply(&mut b, &e);
        assert!(!b.token(Position::new(1, 1)).unwrap().frozen);
        assert_eq!(b.get(Position::new(0, 2)), Some(Cell::Empty));
        // only next to the thawed token, not to a removed one
        assert_eq!(b.get(Position::new(1, 0)), Some(Cell::Blocker));
    }

    #[test]
    fn test_collectibles_survive_blasts() {
        let b = board(&["1 2 3", "$ 1h 2", "3 1 2"]);
        let e = propagate(&b, &[Position::new(1, 1)], &[], &[]);
        let mut b = b;
        apply(&mut b, &e);
        assert_eq!(b.get(Position::new(0, 1)), Some(Cell::Collectible));
    }

    #[test]
    fn test_wildcard_target_most_frequent() {
        let b = board(&["1 2 2", "3 * 2", "1 1 4"]);
        assert_eq!(wildcard_target(&b, &HashSet::new()), Some(Color::Red));
        let e = propagate(&b, &[Position::new(1, 1)], &[], &[]);
        assert_eq!(e.detonations[0].target, Some(Color::Red));
        assert_eq!(e.removed.len(), 4);
    }
}
