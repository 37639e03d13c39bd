//! Error types for the core rules

use thiserror::Error;

use crate::types::Position;

/// Structural board errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("invalid board dimensions {cols}x{rows}")]
    InvalidDimensions { cols: u8, rows: u8 },

    /// An empty cell survived a completed refill (engine bug).
    #[error("inconsistent board: empty cell at ({}, {})", pos.col, pos.row)]
    EmptyCell { pos: Position },

    #[error("board already contains a match at ({}, {})", pos.col, pos.row)]
    UnresolvedMatch { pos: Position },

    #[error("layout parse error on line {line}: {reason}")]
    Parse { line: usize, reason: String },
}

/// Level configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LevelError {
    #[error("grid must be between 3x3 and 12x12, got {cols}x{rows}")]
    InvalidDimensions { cols: u8, rows: u8 },

    #[error("palette size must be between 3 and 7, got {0}")]
    InvalidPalette(u8),

    #[error("objective color {0:?} is outside the palette")]
    ObjectiveColorOutsidePalette(crate::types::Color),

    #[error("{requested} obstacles do not fit on a {cols}x{rows} grid")]
    TooManyObstacles { requested: u32, cols: u8, rows: u8 },

    #[error("move budget must be at least 1")]
    ZeroMoveBudget,
}

/// Seeded initialization errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SetupError {
    #[error("no playable layout after {attempts} attempts")]
    NoPlayableLayout { attempts: u32 },

    #[error(transparent)]
    Level(#[from] LevelError),
}

/// Why a swap request was refused
///
/// Refusals leave the board untouched.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapError {
    #[error("cannot swap a cell with itself")]
    SamePosition,
    #[error("position is outside the board")]
    OutOfBounds,
    #[error("cells are not orthogonally adjacent")]
    NotAdjacent,
    #[error("a blocking cell cannot be swapped")]
    Blocked,
    #[error("a frozen token cannot be swapped")]
    Frozen,
    #[error("an empty cell cannot be swapped")]
    EmptyCell,
    #[error("a cascade is still resolving")]
    NotIdle,
    #[error("the session is over")]
    SessionOver,
}

impl SwapError {
    pub fn code(self) -> &'static str {
        match self {
            SwapError::SamePosition => "same_position",
            SwapError::OutOfBounds => "out_of_bounds",
            SwapError::NotAdjacent => "not_adjacent",
            SwapError::Blocked => "blocked",
            SwapError::Frozen => "frozen",
            SwapError::EmptyCell => "empty_cell",
            SwapError::NotIdle => "not_idle",
            SwapError::SessionOver => "session_over",
        }
    }
}
