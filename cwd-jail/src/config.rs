//! Settings read from the environment at initialization.
//!
//! The confinement root is not configurable: it is always the working directory at first use.
use std::ffi::OsString;

/// Environment variable that enables diagnostics when set to any non-empty value.
pub const DEBUG_ENV: &str = "GSOCKET_DEBUG";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Config {
    /// Emit one diagnostic line per intercepted call on standard error.
    pub debug: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var_os(key))
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<OsString>) -> Self {
        let debug = lookup(DEBUG_ENV).is_some_and(|value| !value.is_empty());
        Self { debug }
    }
}
