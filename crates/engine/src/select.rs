//! Click-to-select anchor - turns two clicks into a swap request

use crate::core::Swap;
use crate::types::Position;

/// What a click did to the selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// First click, cell is now the anchor
    Anchored(Position),
    /// Clicked the anchor again
    Cleared,
    /// Clicked a non-adjacent cell, anchor moved there
    Moved(Position),
    /// Clicked a neighbor of the anchor
    Swap(Swap),
}

/// Click-to-select state (the selection anchor)
///
/// Non-adjacent or identical picks never reach the cascade machine; they only move or
/// clear the anchor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selector {
    anchor: Option<Position>,
}

impl Selector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn anchor(&self) -> Option<Position> {
        self.anchor
    }

    pub fn clear(&mut self) {
        self.anchor = None;
    }

    pub fn click(&mut self, pos: Position) -> Selection {
        match self.anchor {
            None => {
                self.anchor = Some(pos);
                Selection::Anchored(pos)
            }
            Some(a) if a == pos => {
                self.anchor = None;
                Selection::Cleared
            }
            Some(a) if a.is_adjacent(pos) => {
                self.anchor = None;
                Selection::Swap(Swap::new(a, pos))
            }
            Some(_) => {
                self.anchor = Some(pos);
                Selection::Moved(pos)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn click_flow() {
        let mut s = Selector::new();
        let a = Position::new(2, 2);
        assert_eq!(s.click(a), Selection::Anchored(a));
        assert_eq!(s.click(a), Selection::Cleared);
        assert_eq!(s.anchor(), None);

        s.click(a);
        let far = Position::new(5, 5);
        assert_eq!(s.click(far), Selection::Moved(far));
        assert_eq!(s.anchor(), Some(far));

        let next = Position::new(5, 4);
        assert_eq!(s.click(next), Selection::Swap(Swap::new(far, next)));
        assert_eq!(s.anchor(), None);
    }

    #[test]
    fn diagonal_is_not_a_swap() {
        let mut s = Selector::new();
        s.click(Position::new(1, 1));
        assert_eq!(
            s.click(Position::new(2, 2)),
            Selection::Moved(Position::new(2, 2))
        );
    }
}
