//! Adapter module - the engine's outward boundary
//!
//! Turns a [`Session`](crate::engine::Session) into a stream of **line-delimited JSON**
//! messages, loads levels from JSON files, and reads the headless runner's settings from
//! the environment.
//!
//! # Message Types
//!
//! | type | when | carries |
//! |---|---|---|
//! | `session_start` | once, before the first turn | seed, level settings, initial board |
//! | `phase` | each phase boundary (`MATCH3_EVENTS=all` only) | phase name, pass depth, board |
//! | `turn` | after every turn | the turn outcome, session score, board hash |
//! | `session_end` | once, when the run stops | result, score, objective progress |
//!
//! Boards are rows in layout notation plus a 16-digit hex `board_hash`:
//!
//! ```json
//! {"type":"turn","seq":4,"turn_id":1,"swap":[{"col":3,"row":4},{"col":3,"row":5}],
//!  "rejected":false,"score_delta":80,"combo_depth":1,...,"board_hash":"6c1f0e9a2b7d4410"}
//! ```
//!
//! # Configuration
//!
//! | variable | default | |
//! |---|---|---|
//! | `MATCH3_SEED` | `1` | session seed |
//! | `MATCH3_LEVEL_PATH` | unset | JSON level file, see [`level`] |
//! | `MATCH3_MAX_TURNS` | `200` | turn cap for autoplay |
//! | `MATCH3_EVENTS` | `final` | `final` or `all` |
//! | `MATCH3_LOG` | `warn` | `error`..`trace` |

pub mod config;
pub mod level;
pub mod protocol;
pub mod runtime;

pub use match3_core as core;
pub use match3_engine as engine;
pub use match3_types as types;

pub use config::{EventMode, RunConfig};
pub use level::{load_level, LevelFile, LoadedLevel};
pub use protocol::{parse_message, EventWriter, ParsedMessage, StateHash};
pub use runtime::{run_autoplay, start_session, RunSummary};
