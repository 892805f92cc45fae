/// Logger configuration derived from command-line flags
///
/// Recognized flags:
/// - `--debug-<tag>`   enable DEBUG output for one tag (e.g. `--debug-metadata`)
/// - `--verbose`       enable VERBOSE output for every tag
/// - `--verbose-<tag>` enable VERBOSE output for one tag
/// - `--quiet`         only show warnings and errors
use super::levels::LogLevel;
use super::tags::LogTag;
use crate::arguments::get_cmd_args;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashSet;

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Threshold for Error/Warning/Info messages
    pub min_level: LogLevel,
    /// Set by `--verbose`: every tag emits DEBUG and VERBOSE output
    pub verbose_all: bool,
    pub debug_tags: HashSet<String>,
    pub verbose_tags: HashSet<String>,
    /// Empty set means every tag is enabled
    pub enabled_tags: HashSet<String>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            verbose_all: false,
            debug_tags: HashSet::new(),
            verbose_tags: HashSet::new(),
            enabled_tags: HashSet::new(),
        }
    }
}

static LOGGER_CONFIG: Lazy<RwLock<LoggerConfig>> =
    Lazy::new(|| RwLock::new(LoggerConfig::default()));

pub fn get_logger_config() -> LoggerConfig {
    LOGGER_CONFIG.read().clone()
}

pub fn set_logger_config(config: LoggerConfig) {
    *LOGGER_CONFIG.write() = config;
}

/// Build a logger configuration from an argument list
pub fn config_from_args(args: &[String]) -> LoggerConfig {
    let mut config = LoggerConfig::default();

    for arg in args {
        if arg == "--verbose" {
            config.verbose_all = true;
        } else if arg == "--quiet" {
            config.min_level = LogLevel::Warning;
        } else if let Some(tag) = arg.strip_prefix("--debug-") {
            config.debug_tags.insert(tag.to_lowercase());
        } else if let Some(tag) = arg.strip_prefix("--verbose-") {
            config.verbose_tags.insert(tag.to_lowercase());
        }
    }

    config
}

/// Initialize the global logger configuration from process arguments
pub fn init_from_args() {
    set_logger_config(config_from_args(&get_cmd_args()));
}

pub fn is_debug_enabled_for_tag(config: &LoggerConfig, tag: &LogTag) -> bool {
    if config.verbose_all {
        return true;
    }
    let key = tag.to_debug_key();
    config.debug_tags.contains(&key) || config.verbose_tags.contains(&key)
}

pub fn is_verbose_enabled_for_tag(config: &LoggerConfig, tag: &LogTag) -> bool {
    config.verbose_all || config.verbose_tags.contains(&tag.to_debug_key())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_debug_flags_enable_tags() {
        let config = config_from_args(&args(&["launchwatch", "--debug-metadata"]));
        assert!(is_debug_enabled_for_tag(&config, &LogTag::Metadata));
        assert!(!is_debug_enabled_for_tag(&config, &LogTag::Rpc));
        assert!(!is_verbose_enabled_for_tag(&config, &LogTag::Metadata));
        assert_eq!(config.min_level, LogLevel::Info);
    }

    #[test]
    fn test_quiet_raises_threshold() {
        let config = config_from_args(&args(&["launchwatch", "--quiet"]));
        assert_eq!(config.min_level, LogLevel::Warning);
        assert!(config.debug_tags.is_empty());
    }
}
