//! Seeded board initialization
//!
//! 1. blocking cells at random free cells
//! 2. collectible seeds at random free cells above the bottom row
//! 3. tokens fill the rest row-major, never completing a run of three
//! 4. `frozen_cells` random tokens are frozen
//!
//! A layout without a single valid move is thrown away and generated again.

use crate::board::Board;
use crate::detect::{forms_run_at, has_match};
use crate::error::{LevelError, SetupError};
use crate::level::LevelConfig;
use crate::moves::has_valid_move;
use crate::rng::TokenSource;
use crate::types::{Cell, Color, Position, Token};

/// Layout attempts before giving up
pub const SETUP_ATTEMPTS: u32 = 16;

/// Generate a fresh, stable, playable board for a level
pub fn generate_board(level: &LevelConfig, source: &mut TokenSource) -> Result<Board, SetupError> {
    level.validate()?;

    for attempt in 1..=SETUP_ATTEMPTS {
        let board = generate_layout(level, source)?;
        if !has_match(&board) && has_valid_move(&board) {
            log::debug!(
                "generated {}x{} layout on attempt {}",
                level.cols,
                level.rows,
                attempt
            );
            return Ok(board);
        }
        log::warn!("layout attempt {} has no valid move, retrying", attempt);
    }

    Err(SetupError::NoPlayableLayout {
        attempts: SETUP_ATTEMPTS,
    })
}

fn generate_layout(level: &LevelConfig, source: &mut TokenSource) -> Result<Board, SetupError> {
    let mut board = Board::new(level.cols, level.rows).map_err(|_| {
        LevelError::InvalidDimensions {
            cols: level.cols,
            rows: level.rows,
        }
    })?;

    let mut free: Vec<Position> = board.positions().collect();
    source.rng_mut().shuffle(&mut free);

    for _ in 0..level.blocking_cells {
        if let Some(p) = free.pop() {
            board.set(p, Cell::Blocker);
        }
    }

    let bottom = board.bottom_row();
    let mut placed = 0;
    free.retain(|&p| {
        if placed < level.collectible_seeds && p.row != bottom {
            placed += 1;
            board.set(p, Cell::Collectible);
            false
        } else {
            true
        }
    });

    for pos in board.positions().collect::<Vec<_>>() {
        if !matches!(board.get(pos), Some(Cell::Empty)) {
            continue;
        }
        let excluded: Vec<Color> = Color::palette(source.palette())
            .iter()
            .copied()
            .filter(|&c| forms_run_at(&board, pos, c))
            .collect();
        let token: Token = source.spawn_excluding(pos, &excluded);
        board.set(pos, Cell::Token(token));
    }

    let mut tokens: Vec<Position> = board.tokens().map(|t| t.pos).collect();
    source.rng_mut().shuffle(&mut tokens);
    for p in tokens.into_iter().take(level.frozen_cells as usize) {
        if let Some(t) = board.token_mut(p) {
            t.frozen = true;
        }
    }

    Ok(board)
}
