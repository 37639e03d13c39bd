//! Phase events emitted at every suspension point of a turn
//!
//! A host that animates can pace itself between events; a host that does not can ignore
//! everything but [`PhaseEvent::TurnCompleted`].

use crate::core::{BoardSnapshot, Interaction, PassScore, Swap, Transform};
use crate::types::{ObjectiveCounts, Position, SessionEnd};

/// Outcome of one player turn
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TurnOutcome {
    pub turn_id: u32,
    pub swap: Option<Swap>,
    pub score_delta: u32,
    /// Cascade passes completed this turn
    pub combo_depth: u32,
    /// Interaction bonus included in `score_delta`
    pub bonus: u32,
    pub interaction: Option<Interaction>,
    pub tokens_removed: u32,
    pub specials_created: u32,
    /// Objective progress made this turn
    pub objectives: ObjectiveCounts,
    pub moves_left: u32,
    /// Session score after the turn
    pub score: u32,
    /// Hash of the settled board
    pub board_hash: u64,
    pub terminal: Option<SessionEnd>,
    /// Nothing triggered and the swap was reverted
    pub rejected: bool,
    /// The settled board had no valid move and was reshuffled
    pub reshuffled: bool,
}

impl TurnOutcome {
    pub fn is_terminal(&self) -> bool {
        self.terminal.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhaseEvent {
    /// Swap applied to the board
    Swapped {
        a: Position,
        b: Position,
        snapshot: BoardSnapshot,
    },
    /// A pass found something to resolve
    Matched {
        depth: u32,
        interaction: Option<Interaction>,
        matched: Vec<Position>,
        transforms: Vec<Transform>,
    },
    /// Removals applied, board has gaps
    Exploded {
        depth: u32,
        removed: u32,
        score: PassScore,
        snapshot: BoardSnapshot,
    },
    /// Gravity and refill done
    Refilled {
        depth: u32,
        harvested: u32,
        spawned: u32,
        snapshot: BoardSnapshot,
    },
    /// Nothing matched; the swap was reverted
    Rejected {
        a: Position,
        b: Position,
        snapshot: BoardSnapshot,
    },
    TurnCompleted(TurnOutcome),
}

impl PhaseEvent {
    pub fn name(&self) -> &'static str {
        match self {
            PhaseEvent::Swapped { .. } => "swapped",
            PhaseEvent::Matched { .. } => "matched",
            PhaseEvent::Exploded { .. } => "exploded",
            PhaseEvent::Refilled { .. } => "refilled",
            PhaseEvent::Rejected { .. } => "rejected",
            PhaseEvent::TurnCompleted(_) => "turn_completed",
        }
    }

    /// Board snapshot carried by the event, if any
    pub fn snapshot(&self) -> Option<&BoardSnapshot> {
        match self {
            PhaseEvent::Swapped { snapshot, .. }
            | PhaseEvent::Exploded { snapshot, .. }
            | PhaseEvent::Refilled { snapshot, .. }
            | PhaseEvent::Rejected { snapshot, .. } => Some(snapshot),
            PhaseEvent::Matched { .. } | PhaseEvent::TurnCompleted(_) => None,
        }
    }
}

/// Receives phase events while a turn runs synchronously
pub trait TurnObserver {
    fn on_event(&mut self, event: &PhaseEvent);
}

impl<F: FnMut(&PhaseEvent)> TurnObserver for F {
    fn on_event(&mut self, event: &PhaseEvent) {
        self(event)
    }
}
