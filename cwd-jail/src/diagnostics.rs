//! Diagnostic output on standard error.
//!
//! The engine only uses `log` macros. The injected library installs an `env_logger` backend
//! once, at initialization; with diagnostics disabled the level is `Off` and nothing is
//! formatted.
use crate::config::Config;
use env_logger::{Builder, Target};
use log::LevelFilter;
use std::io::Write;

pub(crate) fn level_for(config: &Config) -> LevelFilter {
    if config.debug {
        LevelFilter::Trace
    } else {
        LevelFilter::Off
    }
}

/// Install the stderr logger. A logger already registered in this image wins.
pub fn install(config: &Config) {
    let pid = std::process::id();
    let _ = Builder::new()
        .filter_level(level_for(config))
        .target(Target::Stderr)
        .format(move |buf, record| {
            writeln!(buf, "cwd-jail[{pid}] {} {}", record.level(), record.args())
        })
        .try_init();
}
