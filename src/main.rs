//! Headless match-3 runner (default binary).
//!
//! Plays hint moves against a seeded session and writes line-delimited JSON to stdout.
//! Settings come from `MATCH3_*` environment variables; logs go to stderr.

use std::io::{self, Write};

use anyhow::Result;
use log::{LevelFilter, Log, Metadata, Record};

use match3::adapter::{run_autoplay, start_session, RunConfig};

/// Minimal stderr logger; filtering is left to `log::max_level`
struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let _ = writeln!(
                io::stderr().lock(),
                "[{:<5} {}] {}",
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
    }
}

fn init_logging(level: LevelFilter) {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

fn main() -> Result<()> {
    let config = RunConfig::from_env();
    init_logging(config.log_level);
    log::debug!("config: {:?}", config);

    let mut session = start_session(&config)?;
    let stdout = io::stdout();
    let summary = run_autoplay(&config, &mut session, stdout.lock())?;

    log::info!(
        "{} | score {} | turns {} | moves left {}",
        summary.result,
        summary.score,
        summary.turns,
        summary.moves_left
    );
    Ok(())
}
