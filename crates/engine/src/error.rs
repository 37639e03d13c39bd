use thiserror::Error;

use crate::core::{BoardError, LevelError, SetupError};

/// Errors creating or restarting a session
///
/// Swap refusals are not session errors; they are returned as
/// [`SwapError`](crate::core::SwapError) and leave the session untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error(transparent)]
    Level(#[from] LevelError),

    #[error(transparent)]
    Setup(#[from] SetupError),

    #[error(transparent)]
    Board(#[from] BoardError),
}
