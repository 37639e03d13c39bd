//! Engine module - turn orchestration on top of the core rules
//!
//! The engine owns the board for a whole session and is its only writer. One player swap
//! moves through `Idle -> Swapping -> Resolving* -> Idle | SessionOver`, or is reverted
//! through `TurnRejected` when it triggers nothing.
//!
//! # Module Structure
//!
//! - [`session`]: the turn state machine, score, move budget and objective tracking
//! - [`events`]: per-phase events, turn outcomes and the observer trait
//! - [`select`]: click-to-select anchor handling
//! - [`error`]: session construction errors
//!
//! # Example
//!
//! ```
//! use match3_engine::{PhaseEvent, Session};
//! use match3_engine::core::LevelConfig;
//!
//! let mut session = Session::new(LevelConfig::default(), 12345).unwrap();
//! let swap = session.hint().expect("fresh boards always have a move");
//!
//! let mut phases = Vec::new();
//! let outcome = session
//!     .play_swap_observed(swap.a, swap.b, &mut |e: &PhaseEvent| phases.push(e.name()))
//!     .unwrap();
//!
//! assert!(!outcome.rejected);
//! assert!(outcome.score_delta > 0);
//! assert_eq!(phases.first(), Some(&"swapped"));
//! assert_eq!(phases.last(), Some(&"turn_completed"));
//! ```

pub mod error;
pub mod events;
pub mod select;
pub mod session;

pub use match3_core as core;
pub use match3_types as types;

pub use error::SessionError;
pub use events::{PhaseEvent, TurnObserver, TurnOutcome};
pub use select::{Selection, Selector};
pub use session::Session;
