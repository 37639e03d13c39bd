//! Core rules module - pure, deterministic, and testable
//!
//! This crate contains every board rule of the match-3 resolution engine. It has
//! **zero dependencies** on UI, timers or I/O, making it:
//!
//! - **Deterministic**: same seed and same swaps produce identical boards
//! - **Testable**: boards can be written out as text layouts ([`Board::from_rows`])
//! - **Portable**: no orchestration state lives here, only board transformations
//!
//! # Module Structure
//!
//! - [`board`]: the cell grid (tokens, blockers, collectibles) with structural queries
//! - [`detect`]: run finding and shape classification (cross, 5-run, 4-run, 3-run)
//! - [`interact`]: special + special swap combinations
//! - [`explode`]: chained detonation with a visited-set worklist
//! - [`gravity`]: per-segment compaction, collectible harvesting and refill
//! - [`moves`]: swap legality, move finding and deadlock reshuffles
//! - [`setup`]: seeded initialization with obstacles
//! - [`scoring`]: per-pass score tables
//! - [`rng`]: LCG and color-bag token source
//!
//! # Example
//!
//! ```
//! use match3_core::{detect, Board};
//! use match3_core::types::TokenKind;
//!
//! let board = Board::from_rows(&[
//!     "1 2 2 2 2",
//!     "3 4 1 3 4",
//!     "4 3 4 1 3",
//! ]).unwrap();
//!
//! let result = detect(&board);
//! assert_eq!(result.transforms.len(), 1);
//! assert_eq!(result.transforms[0].into, TokenKind::LineCol);
//! assert_eq!(result.matched.len(), 3);
//! ```

pub mod board;
pub mod detect;
pub mod error;
pub mod explode;
pub mod gravity;
pub mod interact;
pub mod level;
pub mod moves;
pub mod rng;
pub mod scoring;
pub mod setup;
pub mod snapshot;

pub use match3_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use detect::{detect, find_runs, has_match, MatchGroup, MatchResult, MatchShape, Transform};
pub use error::{BoardError, LevelError, SetupError, SwapError};
pub use explode::{propagate, Detonation, Explosion};
pub use gravity::{settle, Fall, GravityReport};
pub use interact::{Interaction, InteractionEffect};
pub use level::LevelConfig;
pub use moves::{find_moves, has_valid_move, reshuffle, validate_swap, Swap};
pub use rng::{SimpleRng, TokenSource};
pub use scoring::{calculate_pass_score, PassScore};
pub use setup::generate_board;
pub use snapshot::{board_hash, BoardSnapshot};
