// dayhist/src/logger.rs
//! Logger initialization for the dayhist CLI.
//!
//! Log lines go to stderr as `[LEVEL target] message`, keeping stdout free
//! for command output.

use env_logger::{Builder, Env};
use log::LevelFilter;
use std::io::Write;

/// Initializes the global logger.
///
/// `RUST_LOG` governs filtering (default `info`) unless `level` forces a
/// specific filter. Calling this more than once is harmless.
pub fn init_logger(level: Option<LevelFilter>) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    if let Some(level) = level {
        builder.filter_level(level);
    }
    builder.format(|buf, record| {
        writeln!(buf, "[{} {}] {}", record.level(), record.target(), record.args())
    });
    let _ = builder.try_init();
}
