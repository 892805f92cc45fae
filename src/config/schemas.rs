/// Configuration schemas - all config structures defined once with defaults
///
/// Each struct is defined with the `config_struct!` macro, so every field has
/// its default right next to its declaration and any section may be omitted
/// from `config.toml`.
use crate::config_struct;
use crate::constants::*;

// ============================================================================
// RPC CONFIGURATION
// ============================================================================

config_struct! {
    /// RPC endpoint configuration
    pub struct RpcConfig {
        /// HTTP JSON-RPC endpoint (required)
        url: String = String::new(),
        /// WebSocket endpoint; derived from `url` when empty
        ws_url: String = String::new(),
        /// Per-request timeout
        request_timeout_secs: u64 = 15,
    }
}

impl RpcConfig {
    /// WebSocket endpoint, derived from the HTTP one when not configured
    pub fn ws_endpoint(&self) -> String {
        if !self.ws_url.trim().is_empty() {
            return self.ws_url.trim().to_string();
        }
        let url = self.url.trim();
        if let Some(rest) = url.strip_prefix("https://") {
            format!("wss://{}", rest)
        } else if let Some(rest) = url.strip_prefix("http://") {
            format!("ws://{}", rest)
        } else {
            url.to_string()
        }
    }
}

// ============================================================================
// MONITOR CONFIGURATION
// ============================================================================

config_struct! {
    /// Log stream monitoring and event processing
    pub struct MonitorConfig {
        /// Program whose logs are subscribed to
        program_id: String = LETSBONK_PROGRAM_ID.to_string(),
        /// An event passes the filter if any log line contains one of these
        creation_log_patterns: Vec<String> = DEFAULT_CREATION_LOG_PATTERNS
            .iter()
            .map(|p| p.to_string())
            .collect(),
        /// Required mint suffix (case-insensitive); empty disables the check
        mint_suffix: String = LETSBONK_MINT_SUFFIX.to_string(),
        freshness_window_secs: i64 = NEW_TOKEN_WINDOW_SECS,
        /// Settle delay before fetching a freshly notified transaction
        fetch_delay_ms: u64 = 100,
        max_processed_signatures: usize = 200_000,
        /// 0 = unbounded
        max_known_mints: usize = 0,
        shutdown_timeout_secs: u64 = 10,
        reconnect_delay_secs: u64 = 5,
        /// Number of tokens in the periodic summary log
        summary_size: usize = 5,
        /// Skip candidates whose token supply cannot be read
        require_token_supply: bool = true,
    }
}

// ============================================================================
// LAUNCHPAD CONFIGURATION
// ============================================================================

config_struct! {
    /// Launchpad verification and bonding-curve lookups
    pub struct LaunchpadConfig {
        program_id: String = RAYDIUM_LAUNCHPAD_PROGRAM_ID.to_string(),
        /// Quote mint of launchpad pools, excluded from candidates
        native_mint: String = SOL_MINT.to_string(),
    }
}

// ============================================================================
// RETRY CONFIGURATION
// ============================================================================

config_struct! {
    pub struct RetryConfig {
        max_attempts: u32 = DEFAULT_RETRY_ATTEMPTS,
        delay_ms: u64 = DEFAULT_RETRY_DELAY_MS,
    }
}

// ============================================================================
// METADATA CONFIGURATION
// ============================================================================

config_struct! {
    /// On-chain registry and off-chain URI resolution
    pub struct MetadataConfig {
        metadata_program_id: String = METADATA_PROGRAM_ID.to_string(),
        uri_timeout_secs: u64 = METADATA_URI_TIMEOUT_SECS,
        user_agent: String = METADATA_USER_AGENT.to_string(),
    }
}

// ============================================================================
// ANALYTICS CONFIGURATION
// ============================================================================

config_struct! {
    /// Holder concentration heuristics
    pub struct AnalyticsConfig {
        enabled: bool = true,
        /// Holders below this share of supply count as snipers
        small_holder_threshold_pct: f64 = 1.0,
        /// Holders above this share of supply count as dev/bundlers
        large_holder_threshold_pct: f64 = 5.0,
    }
}

// ============================================================================
// ROOT CONFIGURATION
// ============================================================================

config_struct! {
    /// Root configuration loaded from `data/config.toml`
    pub struct Config {
        rpc: RpcConfig = RpcConfig::default(),
        monitor: MonitorConfig = MonitorConfig::default(),
        launchpad: LaunchpadConfig = LaunchpadConfig::default(),
        retry: RetryConfig = RetryConfig::default(),
        metadata: MetadataConfig = MetadataConfig::default(),
        analytics: AnalyticsConfig = AnalyticsConfig::default(),
    }
}
