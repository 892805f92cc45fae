/// Core logging implementation with automatic filtering
///
/// Filtering rules:
/// 1. Errors are always shown
/// 2. Warning/Info are compared against the minimum level threshold
/// 3. Debug requires `--debug-<tag>` (or `--verbose`)
/// 4. Verbose requires `--verbose` or `--verbose-<tag>`
/// 5. If enabled_tags is non-empty, the tag must be in the set
use super::config::{
    get_logger_config, is_debug_enabled_for_tag, is_verbose_enabled_for_tag, LoggerConfig,
};
use super::levels::LogLevel;
use super::tags::LogTag;

pub fn should_log_with(config: &LoggerConfig, tag: &LogTag, level: LogLevel) -> bool {
    if level == LogLevel::Error {
        return true;
    }

    if !config.enabled_tags.is_empty() && !config.enabled_tags.contains(&tag.to_debug_key()) {
        return false;
    }

    match level {
        LogLevel::Debug => is_debug_enabled_for_tag(config, tag),
        LogLevel::Verbose => is_verbose_enabled_for_tag(config, tag),
        _ => level <= config.min_level,
    }
}

pub fn should_log(tag: &LogTag, level: LogLevel) -> bool {
    should_log_with(&get_logger_config(), tag, level)
}

/// Filter, then hand off to the formatter.
///
/// `log_type` is the label printed in the type column; for the level helpers
/// it is the level name, for `logger::log` it is the caller's label.
pub fn log_internal(tag: LogTag, level: LogLevel, log_type: &str, message: &str) {
    if !should_log(&tag, level) {
        return;
    }

    super::format::format_and_log(&tag, log_type, message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_errors_always_pass() {
        let mut config = LoggerConfig::default();
        config.min_level = LogLevel::Warning;
        config.enabled_tags = HashSet::from(["rpc".to_string()]);
        assert!(should_log_with(&config, &LogTag::Monitor, LogLevel::Error));
    }

    #[test]
    fn test_debug_gated_per_tag() {
        let mut config = LoggerConfig::default();
        config.debug_tags.insert("metadata".to_string());
        assert!(should_log_with(&config, &LogTag::Metadata, LogLevel::Debug));
        assert!(!should_log_with(&config, &LogTag::Monitor, LogLevel::Debug));
        assert!(!should_log_with(&config, &LogTag::Metadata, LogLevel::Verbose));
    }

    #[test]
    fn test_quiet_hides_info() {
        let mut config = LoggerConfig::default();
        config.min_level = LogLevel::Warning;
        assert!(!should_log_with(&config, &LogTag::Monitor, LogLevel::Info));
        assert!(should_log_with(&config, &LogTag::Monitor, LogLevel::Warning));
    }
}
