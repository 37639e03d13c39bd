//! Gravity and refill
//!
//! Columns compact downward one segment at a time: blockers and frozen tokens are fixed
//! and split a column into independent segments. Movable cells (unfrozen tokens and
//! collectibles) slide down keeping their relative order. Collectibles that land on the
//! bottom row are harvested and the column compacts again. Finally every empty cell gets
//! a freshly spawned token.

use crate::board::Board;
use crate::rng::TokenSource;
use crate::types::{Cell, Position};

/// A cell that moved during compaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fall {
    pub from: Position,
    pub to: Position,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GravityReport {
    pub falls: Vec<Fall>,
    pub harvested: Vec<Position>,
    pub spawned: Vec<Position>,
}

/// Compact every column downward
pub fn collapse(board: &mut Board) -> Vec<Fall> {
    let mut falls = Vec::new();
    for col in 0..board.cols() as i8 {
        collapse_column(board, col, &mut falls);
    }
    falls
}

fn collapse_column(board: &mut Board, col: i8, falls: &mut Vec<Fall>) {
    let mut write = board.bottom_row();
    for row in (0..board.rows() as i8).rev() {
        let from = Position::new(col, row);
        let Some(cell) = board.get(from) else {
            continue;
        };
        if cell.is_fixed() {
            write = row - 1;
            continue;
        }
        if cell.is_empty() {
            continue;
        }
        if row != write {
            let to = Position::new(col, write);
            board.take(from);
            board.set(to, cell);
            falls.push(Fall { from, to });
        }
        write -= 1;
    }
}

/// Remove collectibles sitting on the bottom row
pub fn harvest(board: &mut Board) -> Vec<Position> {
    let bottom = board.bottom_row();
    let found: Vec<Position> = board
        .row_positions(bottom)
        .filter(|&p| board.get(p) == Some(Cell::Collectible))
        .collect();
    for &p in &found {
        board.take(p);
    }
    found
}

/// Fill every empty cell with a new token
pub fn refill(board: &mut Board, source: &mut TokenSource) -> Vec<Position> {
    let empty: Vec<Position> = board
        .iter()
        .filter(|(_, c)| c.is_empty())
        .map(|(p, _)| p)
        .collect();
    for &p in &empty {
        let token = source.spawn(p);
        board.set(p, Cell::Token(token));
    }
    empty
}

/// Compact, harvest until stable, then refill
pub fn settle(board: &mut Board, source: &mut TokenSource) -> GravityReport {
    let mut report = GravityReport::default();
    loop {
        report.falls.extend(collapse(board));
        let harvested = harvest(board);
        if harvested.is_empty() {
            break;
        }
        report.harvested.extend(harvested);
    }
    report.spawned = refill(board, source);
    report
}
