#![deny(missing_docs)]
//! Shared logging utilities for the newsfeed workspace.
//!
//! This crate provides the `feed_*` logging macros used across the codebase,
//! a level lookup for the `NEWSFEED_LOG` environment variable and a minimal
//! test initializer for the global logger.

#[doc(hidden)]
pub use log;

use log::LevelFilter;

/// Environment variable consulted by [`level_from_env`].
pub const LOG_LEVEL_ENV: &str = "NEWSFEED_LOG";

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! feed_trace {
    ($($arg:tt)*) => {{
        $crate::log::trace!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! feed_info {
    ($($arg:tt)*) => {{
        $crate::log::info!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! feed_debug {
    ($($arg:tt)*) => {{
        $crate::log::debug!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! feed_warn {
    ($($arg:tt)*) => {{
        $crate::log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! feed_error {
    ($($arg:tt)*) => {{
        $crate::log::error!($($arg)*);
    }};
}

/// Parses a level name such as `debug` or `WARN`.
///
/// Returns `None` for unrecognised names.
pub fn parse_level(name: &str) -> Option<LevelFilter> {
    match name.trim().to_ascii_lowercase().as_str() {
        "off" => Some(LevelFilter::Off),
        "error" => Some(LevelFilter::Error),
        "warn" | "warning" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        _ => None,
    }
}

/// Reads the level from `NEWSFEED_LOG`, falling back to `default` when the
/// variable is unset or unparsable.
pub fn level_from_env(default: LevelFilter) -> LevelFilter {
    std::env::var(LOG_LEVEL_ENV)
        .ok()
        .and_then(|value| parse_level(&value))
        .unwrap_or(default)
}

/// Initializes a simple terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let default = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level_from_env(default),
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
