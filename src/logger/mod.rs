//! Structured logging system for launchwatch
//!
//! This module provides a small, ergonomic logging API with:
//! - Per-subsystem tags (`LogTag`) and standard levels (Error/Warning/Info/Debug/Verbose)
//! - Per-tag debug control via `--debug-<tag>` flags
//! - Colored, wrapped console output
//!
//! ## Usage
//!
//! ```rust
//! use launchwatch::logger::{self, LogTag};
//!
//! logger::error(LogTag::Rpc, "Connection failed");
//! logger::warning(LogTag::Metadata, "URI fetch timed out");
//! logger::info(LogTag::Monitor, "Subscription established");
//! logger::debug(LogTag::Analytics, "Largest accounts: ..."); // Only with --debug-analytics
//! logger::log(LogTag::Monitor, "NEW_TOKEN", "Found new token"); // Free-form label
//! ```
//!
//! Call `logger::init()` once at startup, before any logging occurs.

mod bridge;
mod config;
mod core;
mod format;
mod levels;
mod tags;

pub use config::{config_from_args, get_logger_config, set_logger_config, LoggerConfig};
pub use levels::LogLevel;
pub use tags::LogTag;

/// Initialize the logger system
///
/// 1. Parses command-line arguments for `--debug-*`, `--verbose`, `--quiet`
/// 2. Routes `log` crate records from dependencies through this logger
pub fn init() {
    config::init_from_args();
    bridge::install();
}

/// Log with a free-form type label (e.g. "SUCCESS", "NEW_TOKEN", "SKIP")
///
/// The label decides the level: "ERROR" is an error, "WARN"/"WARNING" a
/// warning, "DEBUG"/"VERBOSE" are gated like `debug`/`verbose`, anything else
/// is informational.
pub fn log(tag: LogTag, log_type: &str, message: &str) {
    core::log_internal(tag, LogLevel::from_log_type(log_type), log_type, message);
}

/// Log at ERROR level (always shown)
pub fn error(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Error, LogLevel::Error.as_str(), message);
}

/// Log at WARNING level
pub fn warning(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Warning, LogLevel::Warning.as_str(), message);
}

/// Log at INFO level
pub fn info(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Info, LogLevel::Info.as_str(), message);
}

/// Log at DEBUG level (only with `--debug-<tag>`)
pub fn debug(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Debug, LogLevel::Debug.as_str(), message);
}

/// Log at VERBOSE level (only with `--verbose` or `--verbose-<tag>`)
pub fn verbose(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Verbose, LogLevel::Verbose.as_str(), message);
}
