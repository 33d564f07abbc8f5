//! Logger initialization: a terminal logger to stderr, plus an optional
//! append-mode file logger when `--log-file` is given.
use std::fs::OpenOptions;
use std::path::Path;

use simplelog::*;

use crate::error::{Error, Result};

/// Initialize the terminal logger at the given verbosity.
pub fn init_term_logger(level: log::LevelFilter) -> Result<()> {
    if level == log::LevelFilter::Off {
        return Ok(());
    }

    TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto).map_err(Error::Logger)?;

    Ok(())
}

/// Initialize both a terminal logger and a write logger appending to `logfile`.
pub fn init_combined_logger(level: log::LevelFilter, logfile: &Path) -> Result<()> {
    if level == log::LevelFilter::Off {
        return Ok(());
    }

    let writable = OpenOptions::new()
        .create(true)
        .append(true)
        .open(logfile)
        .map_err(|e| Error::io(e, logfile))?;

    CombinedLogger::init(vec![
        TermLogger::new(level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto),
        WriteLogger::new(
            level,
            ConfigBuilder::new().set_time_format_rfc3339().build(),
            writable,
        ),
    ])
    .map_err(Error::Logger)?;

    Ok(())
}
