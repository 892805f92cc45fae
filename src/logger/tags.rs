/// Log tags identify the subsystem a message comes from.
///
/// Each tag has a debug key used by `--debug-<key>` / `--verbose-<key>` flags.

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LogTag {
    Monitor,
    Websocket,
    Rpc,
    Metadata,
    Launchpad,
    Analytics,
    Config,
    System,
    Test,
    Other(String),
}

impl LogTag {
    /// Key used for per-module debug flags (e.g. `--debug-metadata`)
    pub fn to_debug_key(&self) -> String {
        match self {
            LogTag::Monitor => "monitor".to_string(),
            LogTag::Websocket => "websocket".to_string(),
            LogTag::Rpc => "rpc".to_string(),
            LogTag::Metadata => "metadata".to_string(),
            LogTag::Launchpad => "launchpad".to_string(),
            LogTag::Analytics => "analytics".to_string(),
            LogTag::Config => "config".to_string(),
            LogTag::System => "system".to_string(),
            LogTag::Test => "test".to_string(),
            LogTag::Other(name) => name.to_lowercase(),
        }
    }

    /// Uncolored label printed in the tag column
    pub fn to_plain_string(&self) -> String {
        match self {
            LogTag::Monitor => "MONITOR".to_string(),
            LogTag::Websocket => "WS".to_string(),
            LogTag::Rpc => "RPC".to_string(),
            LogTag::Metadata => "METADATA".to_string(),
            LogTag::Launchpad => "LAUNCHPAD".to_string(),
            LogTag::Analytics => "ANALYTICS".to_string(),
            LogTag::Config => "CONFIG".to_string(),
            LogTag::System => "SYSTEM".to_string(),
            LogTag::Test => "TEST".to_string(),
            LogTag::Other(name) => name.to_uppercase(),
        }
    }
}

impl std::fmt::Display for LogTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_plain_string())
    }
}
