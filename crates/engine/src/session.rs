//! Turn orchestrator - drives one swap through the full cascade
//!
//! ```text
//!  Idle --request_swap--> Swapping --nothing--> TurnRejected --> Idle
//!                            |
//!                          effect
//!                            v
//!                        Resolving <--(new matches, depth + 1)--+
//!                            |                                  |
//!                            +--explode -> score -> refill -----+
//!                            |
//!                         settled --> Idle | SessionOver(Won | OutOfMoves)
//! ```
//!
//! Every arrow out of `Swapping` and `Resolving` is one call to [`Session::step`], which
//! returns the [`PhaseEvent`] for that suspension point. [`Session::play_swap`] runs the
//! same machine to completion in one call. Once a swap is accepted the cascade must be
//! stepped to completion before another swap is accepted.

use crate::core::explode::{self, propagate};
use crate::core::interact::{self, InteractionEffect};
use crate::core::{
    board_hash, calculate_pass_score, detect, find_moves, find_runs, generate_board, has_valid_move,
    reshuffle, settle, validate_swap, Board, BoardError, BoardSnapshot, LevelConfig,
    MatchResult, Swap, SwapError, TokenSource, Transform,
};
use crate::error::SessionError;
use crate::events::{PhaseEvent, TurnObserver, TurnOutcome};
use crate::select::{Selection, Selector};
use crate::types::{ObjectiveCounts, Position, RejectPolicy, SessionEnd, TokenKind, TurnPhase};

/// Work queued for the next [`Session::step`]
#[derive(Debug, Clone)]
enum Pending {
    None,
    Swapped(Swap),
    Matched(PassPlan),
    Explode(PassPlan),
    Refill { depth: u32 },
    Rejected(Swap),
    Complete,
}

/// One cascade pass: either the swap's interaction or the detector's matches
#[derive(Debug, Clone)]
struct PassPlan {
    depth: u32,
    interaction: Option<InteractionEffect>,
    matches: MatchResult,
}

/// One play session on one board
#[derive(Debug, Clone)]
pub struct Session {
    level: LevelConfig,
    board: Board,
    source: TokenSource,
    seed: u32,
    phase: TurnPhase,
    pending: Pending,
    selector: Selector,
    score: u32,
    moves_left: u32,
    progress: ObjectiveCounts,
    turn_id: u32,
    /// Outcome being accumulated by the turn in flight
    turn: TurnOutcome,
    last_outcome: Option<TurnOutcome>,
}

impl Session {
    /// Start a session on a freshly generated board
    pub fn new(level: LevelConfig, seed: u32) -> Result<Self, SessionError> {
        let mut source = TokenSource::new(seed, level.palette);
        let board = generate_board(&level, &mut source)?;
        Ok(Self::assemble(level, board, source, seed))
    }

    /// Start a session on a host-supplied board.
    ///
    /// The level's dimensions are taken from the board. The board must be full and must
    /// not already contain a match.
    pub fn with_board(
        mut level: LevelConfig,
        board: Board,
        seed: u32,
    ) -> Result<Self, SessionError> {
        level.cols = board.cols();
        level.rows = board.rows();
        level.validate()?;
        board.check_settled()?;
        if let Some(run) = find_runs(&board).first() {
            return Err(BoardError::UnresolvedMatch { pos: run.start }.into());
        }
        let mut source = TokenSource::new(seed, level.palette);
        source.reserve_ids(board.max_token_id());
        Ok(Self::assemble(level, board, source, seed))
    }

    fn assemble(level: LevelConfig, board: Board, source: TokenSource, seed: u32) -> Self {
        log::info!(
            "session started: {}x{} board, {} moves, target {}, seed {}",
            board.cols(),
            board.rows(),
            level.move_budget,
            level.target_score,
            seed
        );
        Self {
            moves_left: level.move_budget,
            level,
            board,
            source,
            seed,
            phase: TurnPhase::Idle,
            pending: Pending::None,
            selector: Selector::new(),
            score: 0,
            progress: ObjectiveCounts::default(),
            turn_id: 0,
            turn: TurnOutcome::default(),
            last_outcome: None,
        }
    }

    /// Discard the board and start over with a new seed
    pub fn restart(&mut self, seed: u32) -> Result<(), SessionError> {
        let fresh = Self::new(self.level.clone(), seed)?;
        *self = fresh;
        Ok(())
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn level(&self) -> &LevelConfig {
        &self.level
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase == TurnPhase::Idle
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, TurnPhase::SessionOver(_))
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn moves_left(&self) -> u32 {
        self.moves_left
    }

    /// Objective progress over the whole session
    pub fn progress(&self) -> &ObjectiveCounts {
        &self.progress
    }

    pub fn turn_id(&self) -> u32 {
        self.turn_id
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    pub fn last_outcome(&self) -> Option<&TurnOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        self.board.snapshot()
    }

    pub fn snapshot_into(&self, out: &mut BoardSnapshot) {
        self.board.snapshot_into(out);
    }

    /// First valid move, row-major
    pub fn hint(&self) -> Option<Swap> {
        find_moves(&self.board).into_iter().next()
    }

    fn ensure_idle(&self) -> Result<(), SwapError> {
        match self.phase {
            TurnPhase::Idle => Ok(()),
            TurnPhase::SessionOver(_) => Err(SwapError::SessionOver),
            TurnPhase::Swapping | TurnPhase::Resolving | TurnPhase::TurnRejected => {
                Err(SwapError::NotIdle)
            }
        }
    }

    /// Feed one cell pick through the selection anchor.
    ///
    /// A pick adjacent to the anchor requests the swap; drive it with [`Session::step`].
    pub fn click(&mut self, pos: Position) -> Result<Selection, SwapError> {
        self.ensure_idle()?;
        let selection = self.selector.click(pos);
        if let Selection::Swap(swap) = selection {
            self.request_swap(swap.a, swap.b)?;
        }
        Ok(selection)
    }

    /// Apply a player swap and queue the turn.
    ///
    /// Illegal requests return an error and change nothing.
    pub fn request_swap(&mut self, a: Position, b: Position) -> Result<(), SwapError> {
        self.ensure_idle()?;
        if let Err(err) = validate_swap(&self.board, a, b) {
            log::debug!("swap {:?} <-> {:?} refused: {}", a, b, err.code());
            return Err(err);
        }

        let swap = Swap::new(a, b);
        self.board.swap(a, b);
        self.turn_id += 1;
        self.turn = TurnOutcome {
            turn_id: self.turn_id,
            swap: Some(swap),
            moves_left: self.moves_left,
            ..Default::default()
        };
        self.selector.clear();
        self.phase = TurnPhase::Swapping;
        self.pending = Pending::Swapped(swap);
        Ok(())
    }

    /// Advance the turn by one phase. Returns None when no turn is in flight.
    pub fn step(&mut self) -> Option<PhaseEvent> {
        let event = match std::mem::replace(&mut self.pending, Pending::None) {
            Pending::None => return None,
            Pending::Swapped(swap) => self.evaluate_swap(swap),
            Pending::Matched(plan) => self.announce(plan),
            Pending::Explode(plan) => self.explode(plan),
            Pending::Refill { depth } => self.refill(depth),
            Pending::Rejected(swap) => self.revert(swap),
            Pending::Complete => self.complete(),
        };
        log::trace!("turn {}: {}", self.turn_id, event.name());
        Some(event)
    }

    /// Run a swap to a settled board
    pub fn play_swap(&mut self, a: Position, b: Position) -> Result<TurnOutcome, SwapError> {
        self.play_swap_observed(a, b, &mut |_: &PhaseEvent| {})
    }

    /// Run a swap to a settled board, reporting every phase event
    pub fn play_swap_observed<O: TurnObserver + ?Sized>(
        &mut self,
        a: Position,
        b: Position,
        observer: &mut O,
    ) -> Result<TurnOutcome, SwapError> {
        self.request_swap(a, b)?;
        while let Some(event) = self.step() {
            observer.on_event(&event);
            if let PhaseEvent::TurnCompleted(outcome) = event {
                return Ok(outcome);
            }
        }
        Err(SwapError::NotIdle)
    }

    fn evaluate_swap(&mut self, swap: Swap) -> PhaseEvent {
        let event = PhaseEvent::Swapped {
            a: swap.a,
            b: swap.b,
            snapshot: self.board.snapshot(),
        };

        let interaction = interact::resolve(&self.board, swap.a, swap.b);
        let matches = match interaction {
            Some(_) => MatchResult::default(),
            None => detect(&self.board),
        };

        if interaction.is_none() && matches.is_empty() {
            self.phase = TurnPhase::TurnRejected;
            self.pending = Pending::Rejected(swap);
        } else {
            log::debug!(
                "turn {}: swap {:?} <-> {:?} accepted",
                self.turn_id,
                swap.a,
                swap.b
            );
            self.moves_left = self.moves_left.saturating_sub(1);
            self.phase = TurnPhase::Resolving;
            self.pending = Pending::Matched(PassPlan {
                depth: 0,
                interaction,
                matches,
            });
        }
        event
    }

    fn announce(&mut self, plan: PassPlan) -> PhaseEvent {
        let (matched, transforms) = match &plan.interaction {
            Some(effect) => (
                effect.seeds.iter().chain(&effect.spent).copied().collect(),
                effect.promotions.clone(),
            ),
            None => (plan.matches.matched.clone(), plan.matches.transforms.clone()),
        };
        let event = PhaseEvent::Matched {
            depth: plan.depth,
            interaction: plan.interaction.as_ref().map(|e| e.interaction),
            matched,
            transforms,
        };
        self.pending = Pending::Explode(plan);
        event
    }

    fn explode(&mut self, plan: PassPlan) -> PhaseEvent {
        let depth = plan.depth;
        let (explosion, created, bonus) = match &plan.interaction {
            Some(effect) => {
                self.retype(&effect.promotions);
                let explosion = propagate(&self.board, &effect.seeds, &[], &effect.spent);
                self.turn.interaction = Some(effect.interaction);
                (explosion, Vec::new(), effect.bonus)
            }
            None => {
                let transforms = &plan.matches.transforms;
                self.retype(transforms);
                let anchors: Vec<Position> = transforms.iter().map(|t| t.pos).collect();
                let explosion = propagate(&self.board, &plan.matches.matched, &anchors, &[]);
                debug_assert!(explosion.removed.iter().all(|t| !anchors.contains(&t.pos)));
                let created: Vec<TokenKind> = transforms.iter().map(|t| t.into).collect();
                (explosion, created, 0)
            }
        };
        explode::apply(&mut self.board, &explosion);

        let pass = calculate_pass_score(explosion.removed.len(), depth, &created, bonus);
        self.score = self.score.saturating_add(pass.total);
        self.record(ObjectiveCounts {
            color_collected: explosion.removed_of_color(self.level.objective_color) as u32,
            blockers_cleared: explosion.blockers_destroyed.len() as u32,
            frozen_thawed: explosion.thawed.len() as u32,
            collectibles_harvested: 0,
        });

        let removed = explosion.removed.len() as u32;
        self.turn.score_delta = self.turn.score_delta.saturating_add(pass.total);
        self.turn.bonus = self.turn.bonus.saturating_add(bonus);
        self.turn.tokens_removed += removed;
        self.turn.specials_created += created.len() as u32;
        self.turn.combo_depth = depth + 1;

        log::debug!(
            "turn {} pass {}: removed {}, {} detonation(s), +{}",
            self.turn_id,
            depth,
            removed,
            explosion.detonations.len(),
            pass.total
        );
        self.pending = Pending::Refill { depth };
        PhaseEvent::Exploded {
            depth,
            removed,
            score: pass,
            snapshot: self.board.snapshot(),
        }
    }

    fn refill(&mut self, depth: u32) -> PhaseEvent {
        let report = settle(&mut self.board, &mut self.source);
        if let Err(err) = self.board.check_settled() {
            log::error!("turn {}: {}", self.turn_id, err);
        }
        debug_assert!(self.board.is_filled(), "empty cell survived refill");
        self.record(ObjectiveCounts {
            collectibles_harvested: report.harvested.len() as u32,
            ..Default::default()
        });

        let event = PhaseEvent::Refilled {
            depth,
            harvested: report.harvested.len() as u32,
            spawned: report.spawned.len() as u32,
            snapshot: self.board.snapshot(),
        };

        let matches = detect(&self.board);
        self.pending = if matches.is_empty() {
            Pending::Complete
        } else {
            Pending::Matched(PassPlan {
                depth: depth + 1,
                interaction: None,
                matches,
            })
        };
        event
    }

    fn revert(&mut self, swap: Swap) -> PhaseEvent {
        self.board.swap(swap.a, swap.b);
        self.turn.rejected = true;
        if self.level.reject_policy == RejectPolicy::ConsumesMove {
            self.moves_left = self.moves_left.saturating_sub(1);
        }
        log::debug!(
            "turn {}: swap {:?} <-> {:?} matched nothing, reverted",
            self.turn_id,
            swap.a,
            swap.b
        );
        self.pending = Pending::Complete;
        PhaseEvent::Rejected {
            a: swap.a,
            b: swap.b,
            snapshot: self.board.snapshot(),
        }
    }

    fn complete(&mut self) -> PhaseEvent {
        // A winning final move is a win, not an exhausted budget.
        let terminal = if self.level.is_won(self.score, &self.progress) {
            Some(SessionEnd::Won)
        } else if self.moves_left == 0 {
            Some(SessionEnd::OutOfMoves)
        } else {
            None
        };

        match terminal {
            Some(end) => {
                self.phase = TurnPhase::SessionOver(end);
                log::info!(
                    "session over after turn {}: {} with score {}",
                    self.turn_id,
                    end.as_str(),
                    self.score
                );
            }
            None => {
                self.phase = TurnPhase::Idle;
                if !self.turn.rejected && !has_valid_move(&self.board) {
                    self.turn.reshuffled = reshuffle(&mut self.board, &mut self.source);
                    if self.turn.reshuffled {
                        log::info!("turn {}: no valid move left, board reshuffled", self.turn_id);
                    } else {
                        log::warn!("turn {}: no valid move and reshuffle failed", self.turn_id);
                    }
                }
            }
        }

        self.turn.moves_left = self.moves_left;
        self.turn.score = self.score;
        self.turn.board_hash = board_hash(&self.board);
        self.turn.terminal = terminal;
        let outcome = std::mem::take(&mut self.turn);
        self.last_outcome = Some(outcome.clone());
        PhaseEvent::TurnCompleted(outcome)
    }

    fn retype(&mut self, transforms: &[Transform]) {
        for t in transforms {
            if let Some(token) = self.board.token_mut(t.pos) {
                if token.id == t.id {
                    token.kind = t.into;
                }
            }
        }
    }

    fn record(&mut self, delta: ObjectiveCounts) {
        self.turn.objectives.add(&delta);
        self.progress.add(&delta);
    }
}
