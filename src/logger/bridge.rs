/// Bridge from the `log` crate facade into this logger
///
/// Dependencies such as reqwest and tungstenite emit records through `log`.
/// Those records are printed with the same formatter under `LogTag::Other`,
/// using the first segment of the record target as the tag name.
use super::core::log_internal;
use super::levels::LogLevel;
use super::tags::LogTag;

struct LogBridge;

static BRIDGE: LogBridge = LogBridge;

impl log::Log for LogBridge {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        // Third-party chatter is only interesting at warning level and above
        metadata.level() <= log::Level::Warn
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let target = record.target().split("::").next().unwrap_or("external");
        let level = LogLevel::from(record.level());
        log_internal(
            LogTag::Other(target.to_string()),
            level,
            level.as_str(),
            &record.args().to_string(),
        );
    }

    fn flush(&self) {}
}

/// Install the bridge; a second call is a no-op
pub fn install() {
    if log::set_logger(&BRIDGE).is_ok() {
        log::set_max_level(log::LevelFilter::Warn);
    }
}
