//! Scoring module - per-pass cascade scoring
//!
//! One cascade pass scores:
//! - `BASE_TOKEN_SCORE` per removed token
//! - combo bonus `COMBO_BASE * depth` (the first pass is depth 0, no bonus)
//! - a creation score per special token made by the pass
//! - the interaction bonus, on the first pass of a turn only

use crate::types::{
    TokenKind, AREA_BLAST_CREATION_SCORE, BASE_TOKEN_SCORE, COMBO_BASE,
    LINE_BLAST_CREATION_SCORE, WILDCARD_CREATION_SCORE,
};

/// Score breakdown for one cascade pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PassScore {
    pub removal_score: u32,
    pub combo_bonus: u32,
    pub creation_score: u32,
    pub interaction_bonus: u32,
    pub total: u32,
}

/// Base points for removed tokens
pub fn calculate_removal_score(removed: usize) -> u32 {
    BASE_TOKEN_SCORE.saturating_mul(removed as u32)
}

/// Combo bonus for cascade depth (0-based)
pub fn calculate_combo_bonus(depth: u32) -> u32 {
    COMBO_BASE.saturating_mul(depth)
}

/// Points for turning an anchor into a special token
pub fn calculate_creation_score(kind: TokenKind) -> u32 {
    match kind {
        TokenKind::Plain => 0,
        TokenKind::LineRow | TokenKind::LineCol => LINE_BLAST_CREATION_SCORE,
        TokenKind::AreaBlast => AREA_BLAST_CREATION_SCORE,
        TokenKind::Wildcard => WILDCARD_CREATION_SCORE,
    }
}

/// Calculate the complete score of one pass
pub fn calculate_pass_score(
    removed: usize,
    depth: u32,
    created: &[TokenKind],
    interaction_bonus: u32,
) -> PassScore {
    let removal_score = calculate_removal_score(removed);
    let combo_bonus = calculate_combo_bonus(depth);
    let creation_score = created
        .iter()
        .map(|&k| calculate_creation_score(k))
        .fold(0u32, |acc, s| acc.saturating_add(s));

    let total = removal_score
        .saturating_add(combo_bonus)
        .saturating_add(creation_score)
        .saturating_add(interaction_bonus);

    PassScore {
        removal_score,
        combo_bonus,
        creation_score,
        interaction_bonus,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BOARD_CLEAR_BONUS, COLOR_CLEAR_BONUS};

    #[test]
    fn test_removal_score() {
        assert_eq!(calculate_removal_score(0), 0);
        assert_eq!(calculate_removal_score(3), 30);
        assert_eq!(calculate_removal_score(64), 640);
    }

    #[test]
    fn test_combo_bonus_grows_with_depth() {
        assert_eq!(calculate_combo_bonus(0), 0);
        assert_eq!(calculate_combo_bonus(1), 50);
        assert_eq!(calculate_combo_bonus(4), 200);
    }

    #[test]
    fn test_creation_scores() {
        assert_eq!(calculate_creation_score(TokenKind::Plain), 0);
        assert_eq!(calculate_creation_score(TokenKind::LineCol), 20);
        assert_eq!(calculate_creation_score(TokenKind::AreaBlast), 30);
        assert_eq!(calculate_creation_score(TokenKind::Wildcard), 50);
    }

    #[test]
    fn test_pass_score_first_pass() {
        let s = calculate_pass_score(3, 0, &[TokenKind::LineCol], 0);
        assert_eq!(s.removal_score, 30);
        assert_eq!(s.combo_bonus, 0);
        assert_eq!(s.creation_score, 20);
        assert_eq!(s.total, 50);
    }

    #[test]
    fn test_pass_score_with_interaction() {
        let s = calculate_pass_score(64, 0, &[], BOARD_CLEAR_BONUS);
        assert_eq!(s.total, 640 + BOARD_CLEAR_BONUS);

        let s = calculate_pass_score(5, 2, &[], COLOR_CLEAR_BONUS);
        assert_eq!(s.total, 50 + 100 + COLOR_CLEAR_BONUS);
    }
}
