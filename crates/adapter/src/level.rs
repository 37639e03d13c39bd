//! Level files
//!
//! A level is a JSON object whose fields are all optional:
//!
//! ```json
//! {
//!   "cols": 8, "rows": 8, "palette": 6, "objective_color": "blue",
//!   "frozen_cells": 4, "blocking_cells": 2, "collectible_seeds": 1,
//!   "target_score": 3000, "move_budget": 25,
//!   "objectives": [{ "kind": "clear_blockers", "count": 2 }],
//!   "reject_policy": "free",
//!   "layout": ["1 2 3 ...", "..."]
//! }
//! ```
//!
//! With a `layout` the board is taken as given (its dimensions win over `cols`/`rows`);
//! otherwise it is generated from the seed.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::{Board, LevelConfig};
use crate::types::{Color, Objective, ObjectiveKind, RejectPolicy};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectiveEntry {
    pub kind: String,
    pub count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelFile {
    pub cols: Option<u8>,
    pub rows: Option<u8>,
    pub palette: Option<u8>,
    pub objective_color: Option<String>,
    pub frozen_cells: Option<u32>,
    pub blocking_cells: Option<u32>,
    pub collectible_seeds: Option<u32>,
    pub target_score: Option<u32>,
    pub move_budget: Option<u32>,
    pub objectives: Vec<ObjectiveEntry>,
    pub reject_policy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<Vec<String>>,
}

/// A level ready to start a session
#[derive(Debug, Clone)]
pub struct LoadedLevel {
    pub config: LevelConfig,
    pub layout: Option<Board>,
}

impl LevelFile {
    pub fn parse(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("level is not valid JSON")
    }

    /// Fill unset fields from [`LevelConfig::default`] and validate the result
    pub fn into_level(self) -> Result<LoadedLevel> {
        let defaults = LevelConfig::default();

        let objective_color = match self.objective_color.as_deref() {
            Some(name) => {
                Color::from_str(name).ok_or_else(|| anyhow!("unknown color {:?}", name))?
            }
            None => defaults.objective_color,
        };

        let reject_policy = match self.reject_policy.as_deref() {
            Some(name) => RejectPolicy::from_str(name)
                .ok_or_else(|| anyhow!("unknown reject policy {:?}", name))?,
            None => defaults.reject_policy,
        };

        let objectives = self
            .objectives
            .iter()
            .map(|entry| {
                let kind = ObjectiveKind::from_str(&entry.kind)
                    .ok_or_else(|| anyhow!("unknown objective kind {:?}", entry.kind))?;
                Ok(Objective {
                    kind,
                    count: entry.count,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let layout = match &self.layout {
            Some(rows) => Some(Board::from_rows(rows).context("invalid level layout")?),
            None => None,
        };
        let (cols, rows) = match &layout {
            Some(board) => (board.cols(), board.rows()),
            None => (
                self.cols.unwrap_or(defaults.cols),
                self.rows.unwrap_or(defaults.rows),
            ),
        };

        let config = LevelConfig {
            cols,
            rows,
            palette: self.palette.unwrap_or(defaults.palette),
            objective_color,
            frozen_cells: self.frozen_cells.unwrap_or(defaults.frozen_cells),
            blocking_cells: self.blocking_cells.unwrap_or(defaults.blocking_cells),
            collectible_seeds: self.collectible_seeds.unwrap_or(defaults.collectible_seeds),
            target_score: self.target_score.unwrap_or(defaults.target_score),
            move_budget: self.move_budget.unwrap_or(defaults.move_budget),
            objectives,
            reject_policy,
        };
        config.validate().context("invalid level")?;

        if let Some(board) = &layout {
            let palette = Color::palette(config.palette);
            if let Some(token) = board.tokens().find(|t| !palette.contains(&t.color)) {
                bail!(
                    "layout token at ({}, {}) uses {:?}, outside a palette of {}",
                    token.pos.col,
                    token.pos.row,
                    token.color,
                    config.palette
                );
            }
        }

        Ok(LoadedLevel { config, layout })
    }
}

pub fn load_level(path: &Path) -> Result<LoadedLevel> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading level file {}", path.display()))?;
    LevelFile::parse(&text)
        .and_then(LevelFile::into_level)
        .with_context(|| format!("loading level {}", path.display()))
}
