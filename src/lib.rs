//! Match-3 resolution engine (workspace facade crate).
//!
//! Re-exports the workspace crates as `match3::{types, core, engine, adapter}` so hosts and
//! the integration tests depend on one package while the implementation lives under
//! `crates/`.

pub use match3_adapter as adapter;
pub use match3_core as core;
pub use match3_engine as engine;
pub use match3_types as types;
