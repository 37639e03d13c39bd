//! Interaction resolver - special + special swap combinations
//!
//! Checked on the two swapped cells right after a swap, before ordinary matching.
//!
//! | Pair | Effect | Bonus |
//! |------|--------|-------|
//! | wildcard + wildcard | every token on the board | 5000 |
//! | wildcard + line/area blast | tokens of the blast's color become that blast kind and detonate | 2000 |
//! | line blast + area blast | three full rows and three full columns around the area blast | 1500 |
//! | wildcard + plain | every token of the plain token's color | 1000 |
//!
//! Any other pairing is "not triggered" and the swap falls through to the match detector.

use crate::board::Board;
use crate::detect::Transform;
use crate::types::{
    Color, Position, Token, TokenKind, BOARD_CLEAR_BONUS, COLOR_CLEAR_BONUS,
    COLOR_PROMOTE_BONUS, CROSS_BLAST_BONUS,
};

/// Which combination fired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interaction {
    BoardClear,
    ColorClear { color: Color },
    ColorPromote { color: Color, kind: TokenKind },
    CrossBlast { center: Position },
}

impl Interaction {
    pub fn bonus(&self) -> u32 {
        match self {
            Interaction::BoardClear => BOARD_CLEAR_BONUS,
            Interaction::ColorPromote { .. } => COLOR_PROMOTE_BONUS,
            Interaction::CrossBlast { .. } => CROSS_BLAST_BONUS,
            Interaction::ColorClear { .. } => COLOR_CLEAR_BONUS,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Interaction::BoardClear => "board_clear",
            Interaction::ColorClear { .. } => "color_clear",
            Interaction::ColorPromote { .. } => "color_promote",
            Interaction::CrossBlast { .. } => "cross_blast",
        }
    }
}

/// What an interaction hands to the explosion propagator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionEffect {
    pub interaction: Interaction,
    /// Cells to detonate
    pub seeds: Vec<Position>,
    /// Swapped specials consumed by the combination (removed, not detonated)
    pub spent: Vec<Position>,
    /// Retyping applied before detonation (wildcard + blast only)
    pub promotions: Vec<Transform>,
    pub bonus: u32,
}

/// Check the two just-swapped cells for a special combination
pub fn resolve(board: &Board, a: Position, b: Position) -> Option<InteractionEffect> {
    let ta = *board.token(a)?;
    let tb = *board.token(b)?;
    if ta.frozen || tb.frozen {
        return None;
    }

    use TokenKind::*;
    match (ta.kind, tb.kind) {
        (Wildcard, Wildcard) => Some(board_clear(board, a, b)),
        (Wildcard, Plain) => Some(color_clear(board, a, tb.color)),
        (Plain, Wildcard) => Some(color_clear(board, b, ta.color)),
        (Wildcard, k) if k.is_blast() => Some(color_promote(board, a, &tb)),
        (k, Wildcard) if k.is_blast() => Some(color_promote(board, b, &ta)),
        (LineRow | LineCol, AreaBlast) => Some(cross_blast(board, b, a)),
        (AreaBlast, LineRow | LineCol) => Some(cross_blast(board, a, b)),
        _ => None,
    }
}

fn board_clear(board: &Board, a: Position, b: Position) -> InteractionEffect {
    let seeds = board
        .tokens()
        .map(|t| t.pos)
        .filter(|&p| p != a && p != b)
        .collect();
    effect(Interaction::BoardClear, seeds, vec![a, b], Vec::new())
}

fn color_clear(board: &Board, wildcard: Position, color: Color) -> InteractionEffect {
    let seeds = tokens_of_color(board, color).map(|t| t.pos).collect();
    effect(
        Interaction::ColorClear { color },
        seeds,
        vec![wildcard],
        Vec::new(),
    )
}

fn color_promote(board: &Board, wildcard: Position, blast: &Token) -> InteractionEffect {
    let color = blast.color;
    let kind = blast.kind;
    let promotions = tokens_of_color(board, color)
        .filter(|t| t.kind == TokenKind::Plain && !t.frozen)
        .map(|t| Transform {
            pos: t.pos,
            id: t.id,
            into: kind,
        })
        .collect();
    let seeds = tokens_of_color(board, color).map(|t| t.pos).collect();
    effect(
        Interaction::ColorPromote { color, kind },
        seeds,
        vec![wildcard],
        promotions,
    )
}

fn cross_blast(board: &Board, area: Position, line: Position) -> InteractionEffect {
    let mut seeds = Vec::new();
    for pos in board.positions() {
        let near_row = (pos.row - area.row).abs() <= 1;
        let near_col = (pos.col - area.col).abs() <= 1;
        if (near_row || near_col) && pos != area && pos != line && board.token(pos).is_some() {
            seeds.push(pos);
        }
    }
    effect(
        Interaction::CrossBlast { center: area },
        seeds,
        vec![area, line],
        Vec::new(),
    )
}

/// Non-wildcard tokens of one color (wildcards carry a placeholder color)
fn tokens_of_color(board: &Board, color: Color) -> impl Iterator<Item = &Token> {
    board
        .tokens()
        .filter(move |t| t.color == color && t.kind != TokenKind::Wildcard)
}

fn effect(
    interaction: Interaction,
    seeds: Vec<Position>,
    spent: Vec<Position>,
    promotions: Vec<Transform>,
) -> InteractionEffect {
    InteractionEffect {
        interaction,
        seeds,
        spent,
        promotions,
        bonus: interaction.bonus(),
    }
}
