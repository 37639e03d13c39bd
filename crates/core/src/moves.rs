//! Swap legality, move finding and deadlock reshuffles

use crate::board::Board;
use crate::detect::{forms_run_at, has_match};
use crate::error::SwapError;
use crate::interact;
use crate::rng::TokenSource;
use crate::types::{Cell, Color, Position, TokenKind};

/// Shuffle attempts before falling back to recoloring
pub const RESHUFFLE_ATTEMPTS: u32 = 32;

/// A pair of orthogonally adjacent cells to exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Swap {
    pub a: Position,
    pub b: Position,
}

impl Swap {
    pub fn new(a: Position, b: Position) -> Self {
        Self { a, b }
    }
}

/// Check that a player swap is legal on this board
pub fn validate_swap(board: &Board, a: Position, b: Position) -> Result<(), SwapError> {
    if a == b {
        return Err(SwapError::SamePosition);
    }
    let (Some(ca), Some(cb)) = (board.get(a), board.get(b)) else {
        return Err(SwapError::OutOfBounds);
    };
    if !a.is_adjacent(b) {
        return Err(SwapError::NotAdjacent);
    }
    let cells = [ca, cb];
    if cells.iter().any(|c| matches!(c, Cell::Blocker)) {
        return Err(SwapError::Blocked);
    }
    if cells.iter().any(|c| c.token().is_some_and(|t| t.frozen)) {
        return Err(SwapError::Frozen);
    }
    if cells.iter().any(|c| c.is_empty()) {
        return Err(SwapError::EmptyCell);
    }
    Ok(())
}

/// Would this legal swap trigger an interaction or a match
pub fn swap_triggers(board: &Board, a: Position, b: Position) -> bool {
    let mut probe = board.clone();
    probe.swap(a, b);
    interact::resolve(&probe, a, b).is_some() || has_match(&probe)
}

/// Every legal swap that would do something, row-major
pub fn find_moves(board: &Board) -> Vec<Swap> {
    let mut moves = Vec::new();
    for a in board.positions() {
        for b in [a.offset(1, 0), a.offset(0, 1)] {
            if validate_swap(board, a, b).is_ok() && swap_triggers(board, a, b) {
                moves.push(Swap::new(a, b));
            }
        }
    }
    moves
}

pub fn has_valid_move(board: &Board) -> bool {
    board.positions().any(|a| {
        [a.offset(1, 0), a.offset(0, 1)]
            .into_iter()
            .any(|b| validate_swap(board, a, b).is_ok() && swap_triggers(board, a, b))
    })
}

/// Redistribute the colors of plain unfrozen tokens until the board has no match and at
/// least one valid move. Specials, frozen tokens and obstacles stay where they are.
///
/// Returns false if no playable arrangement was found.
pub fn reshuffle(board: &mut Board, source: &mut TokenSource) -> bool {
    let slots: Vec<Position> = board
        .tokens()
        .filter(|t| t.kind == TokenKind::Plain && !t.frozen)
        .map(|t| t.pos)
        .collect();
    if slots.is_empty() {
        return false;
    }
    let mut colors: Vec<Color> = slots
        .iter()
        .filter_map(|&p| board.token(p).map(|t| t.color))
        .collect();

    for attempt in 1..=RESHUFFLE_ATTEMPTS {
        source.rng_mut().shuffle(&mut colors);
        paint(board, &slots, &colors);
        if !has_match(board) && has_valid_move(board) {
            log::debug!("reshuffle settled after {} attempt(s)", attempt);
            return true;
        }
    }

    log::warn!(
        "reshuffle found no arrangement in {} attempts, recoloring",
        RESHUFFLE_ATTEMPTS
    );
    for attempt in 1..=RESHUFFLE_ATTEMPTS {
        for &p in &slots {
            let excluded: Vec<Color> = Color::palette(source.palette())
                .iter()
                .copied()
                .filter(|&c| forms_run_at(board, p, c))
                .collect();
            let color = source.draw_color_excluding(&excluded);
            if let Some(t) = board.token_mut(p) {
                t.color = color;
            }
        }
        if !has_match(board) && has_valid_move(board) {
            log::debug!("recolor settled after {} attempt(s)", attempt);
            return true;
        }
    }
    false
}

fn paint(board: &mut Board, slots: &[Position], colors: &[Color]) {
    for (&p, &c) in slots.iter().zip(colors) {
        if let Some(t) = board.token_mut(p) {
            t.color = c;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::detect;

    fn board(rows: &[&str]) -> Board {
        Board::from_rows(rows).unwrap()
    }

    #[test]
    fn test_validate_swap_rules() {
        let b = board(&["1 2 #", "2 3f 1", "$ 1 ."]);
        let p = Position::new;
        assert_eq!(validate_swap(&b, p(0, 0), p(0, 0)), Err(SwapError::SamePosition));
        assert_eq!(validate_swap(&b, p(0, 0), p(-1, 0)), Err(SwapError::OutOfBounds));
        assert_eq!(validate_swap(&b, p(0, 0), p(1, 1)), Err(SwapError::NotAdjacent));
        assert_eq!(validate_swap(&b, p(0, 0), p(2, 0)), Err(SwapError::NotAdjacent));
        assert_eq!(validate_swap(&b, p(1, 0), p(2, 0)), Err(SwapError::Blocked));
        assert_eq!(validate_swap(&b, p(1, 0), p(1, 1)), Err(SwapError::Frozen));
        assert_eq!(validate_swap(&b, p(1, 1), p(1, 0)), Err(SwapError::Frozen));
        assert_eq!(validate_swap(&b, p(2, 1), p(2, 2)), Err(SwapError::EmptyCell));
        assert_eq!(validate_swap(&b, p(0, 0), p(1, 0)), Ok(()));
        // collectibles can be moved by the player
        assert_eq!(validate_swap(&b, p(0, 2), p(1, 2)), Ok(()));
    }

    #[test]
    fn test_find_moves_lists_matching_swaps() {
        let b = board(&["1 2 1", "3 1 3", "2 3 2"]);
        let moves = find_moves(&b);
        assert!(moves.contains(&Swap::new(Position::new(1, 0), Position::new(1, 1))));
        assert!(has_valid_move(&b));
        for m in &moves {
            assert!(swap_triggers(&b, m.a, m.b));
        }
    }

    #[test]
    fn test_special_pair_is_a_move() {
        let b = board(&["* 1h 3", "2 3 1", "3 1 2"]);
        assert!(find_moves(&b).contains(&Swap::new(Position::new(0, 0), Position::new(1, 0))));
    }

    #[test]
    fn test_deadlocked_board_has_no_moves() {
        let b = board(&["1 2 3", "4 5 6", "1 2 3"]);
        assert!(find_moves(&b).is_empty());
        assert!(!has_valid_move(&b));
    }

    #[test]
    fn test_reshuffle_restores_a_move() {
        let mut b = board(&[
            "1 2 3 4",
            "3 4 1 2",
            "1 2 3 4",
            "3 4 1 2",
        ]);
        assert!(!has_valid_move(&b));
        let mut source = TokenSource::new(11, 4);
        let before: usize = b.tokens().count();
        assert!(reshuffle(&mut b, &mut source));
        assert_eq!(b.tokens().count(), before);
        assert!(detect(&b).is_empty());
        assert!(has_valid_move(&b));
    }
}
