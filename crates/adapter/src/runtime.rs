//! Headless runner
//!
//! Plays hint moves against a session and streams messages through an [`EventWriter`].

use std::io::Write;

use anyhow::{Context, Result};

use crate::config::RunConfig;
use crate::core::LevelConfig;
use crate::engine::Session;
use crate::level::{load_level, LoadedLevel};
use crate::protocol::{create_session_end, create_session_start, EventWriter};

/// How a run finished
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub result: String,
    pub score: u32,
    pub turns: u32,
    pub moves_left: u32,
}

/// Start a session from the configured level file, or the default level
pub fn start_session(config: &RunConfig) -> Result<Session> {
    let level = match &config.level_path {
        Some(path) => load_level(path)?,
        None => LoadedLevel {
            config: LevelConfig::default(),
            layout: None,
        },
    };
    let session = match level.layout {
        Some(board) => Session::with_board(level.config, board, config.seed),
        None => Session::new(level.config, config.seed),
    };
    session.context("starting session")
}

/// Play until the session ends, no move is left, or `max_turns` is reached
pub fn run_autoplay<W: Write>(
    config: &RunConfig,
    session: &mut Session,
    out: W,
) -> Result<RunSummary> {
    let mut writer = EventWriter::new(out, config.events);

    let seq = writer.next_seq();
    writer
        .write_message(&create_session_start(seq, session))
        .context("writing session start")?;

    let mut stopped = "turn_limit";
    let mut turns = 0;
    while !session.is_over() && turns < config.max_turns {
        let Some(swap) = session.hint() else {
            log::warn!("no valid move on turn {}", session.turn_id() + 1);
            stopped = "no_moves";
            break;
        };
        session
            .play_swap_observed(swap.a, swap.b, &mut writer)
            .context("hint move refused")?;
        if let Some(e) = writer.take_error() {
            return Err(e).context("writing turn events");
        }
        turns += 1;
    }

    let seq = writer.next_seq();
    let end = create_session_end(seq, session, stopped);
    writer
        .write_message(&end)
        .and_then(|_| writer.flush())
        .context("writing session end")?;

    log::info!(
        "run finished: {} with score {} after {} turns",
        end.result,
        end.score,
        end.turns
    );

    Ok(RunSummary {
        result: end.result,
        score: end.score,
        turns: end.turns,
        moves_left: end.moves_left,
    })
}
