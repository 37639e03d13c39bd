//! Level configuration pulled in from the level collaborator

use crate::error::LevelError;
use crate::types::{
    Color, Objective, ObjectiveCounts, RejectPolicy, DEFAULT_COLS, DEFAULT_PALETTE, DEFAULT_ROWS,
    MAX_COLS, MAX_ROWS, MIN_SIDE, OBJECTIVE_COLOR, PALETTE_MAX,
};

/// Read-only per-session level data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelConfig {
    pub cols: u8,
    pub rows: u8,
    /// Number of colors in play (3..=7)
    pub palette: u8,
    /// Color counted by the collect-color objective
    pub objective_color: Color,
    pub frozen_cells: u32,
    pub blocking_cells: u32,
    pub collectible_seeds: u32,
    pub target_score: u32,
    pub move_budget: u32,
    pub objectives: Vec<Objective>,
    pub reject_policy: RejectPolicy,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            cols: DEFAULT_COLS,
            rows: DEFAULT_ROWS,
            palette: DEFAULT_PALETTE,
            objective_color: OBJECTIVE_COLOR,
            frozen_cells: 0,
            blocking_cells: 0,
            collectible_seeds: 0,
            target_score: 1000,
            move_budget: 20,
            objectives: Vec::new(),
            reject_policy: RejectPolicy::Free,
        }
    }
}

impl LevelConfig {
    pub fn validate(&self) -> Result<(), LevelError> {
        if !(MIN_SIDE..=MAX_COLS).contains(&self.cols) || !(MIN_SIDE..=MAX_ROWS).contains(&self.rows)
        {
            return Err(LevelError::InvalidDimensions {
                cols: self.cols,
                rows: self.rows,
            });
        }
        if !(3..=PALETTE_MAX).contains(&self.palette) {
            return Err(LevelError::InvalidPalette(self.palette));
        }
        if !Color::palette(self.palette).contains(&self.objective_color) {
            return Err(LevelError::ObjectiveColorOutsidePalette(self.objective_color));
        }
        // Obstacles may take at most half the grid; collectibles never start on the bottom row.
        let cells = self.cols as u32 * self.rows as u32;
        // Saturates so absurd counts from level files still land above the limit.
        let requested = self
            .frozen_cells
            .saturating_add(self.blocking_cells)
            .saturating_add(self.collectible_seeds);
        let upper_cells = cells - self.cols as u32;
        if requested > cells / 2 || self.collectible_seeds > upper_cells / 2 {
            return Err(LevelError::TooManyObstacles {
                requested,
                cols: self.cols,
                rows: self.rows,
            });
        }
        if self.move_budget == 0 {
            return Err(LevelError::ZeroMoveBudget);
        }
        Ok(())
    }

    /// Score and objective targets both met
    pub fn is_won(&self, score: u32, progress: &ObjectiveCounts) -> bool {
        score >= self.target_score && progress.satisfies(&self.objectives)
    }
}
