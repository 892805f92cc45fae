use super::schemas::Config;
/// Configuration utilities - loading, environment overrides and validation
///
/// Order of precedence (lowest first):
/// 1. Defaults from the schema definitions
/// 2. `data/config.toml` (or `--config <path>`)
/// 3. Environment variables (after `.env` has been loaded by the binary)
use crate::errors::{MonitorError, MonitorResult};
use crate::logger::{self, LogTag};
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;
use url::Url;

/// Default configuration file path
pub const CONFIG_FILE_PATH: &str = "data/config.toml";

/// Load configuration from the `--config` path or the default location,
/// apply environment overrides and validate the result.
pub fn load_config() -> MonitorResult<Config> {
    let path = crate::arguments::config_path_arg().unwrap_or_else(|| CONFIG_FILE_PATH.to_string());
    let mut config = load_config_from_path(&path)?;
    apply_env_overrides(&mut config)?;
    config.validate()?;
    Ok(config)
}

/// Load configuration from a specific file path
///
/// A missing file is not an error: defaults are used instead.
pub fn load_config_from_path(path: &str) -> MonitorResult<Config> {
    if !std::path::Path::new(path).exists() {
        logger::warning(
            LogTag::Config,
            &format!("Config file '{}' not found, using default values", path),
        );
        return Ok(Config::default());
    }

    let contents = std::fs::read_to_string(path).map_err(|e| {
        MonitorError::Configuration(format!("Failed to read config file '{}': {}", path, e))
    })?;

    let config = toml::from_str::<Config>(&contents).map_err(|e| {
        MonitorError::Configuration(format!("Failed to parse config file '{}': {}", path, e))
    })?;

    logger::debug(LogTag::Config, &format!("Loaded configuration from '{}'", path));
    Ok(config)
}

/// Apply overrides from the process environment
pub fn apply_env_overrides(config: &mut Config) -> MonitorResult<()> {
    apply_overrides_from(config, |key| std::env::var(key).ok())
}

/// Apply overrides from any key lookup (the environment in production)
pub fn apply_overrides_from<F>(config: &mut Config, lookup: F) -> MonitorResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    if let Some(v) = get("RPC_URL") {
        config.rpc.url = v;
    }
    if let Some(v) = get("WS_URL") {
        config.rpc.ws_url = v;
    }
    if let Some(v) = get("PROGRAM_ID") {
        config.monitor.program_id = v;
    }
    if let Some(v) = get("LAUNCHPAD_PROGRAM_ID") {
        config.launchpad.program_id = v;
    }
    if let Some(v) = get("NATIVE_MINT") {
        config.launchpad.native_mint = v;
    }
    if let Some(v) = get("FRESHNESS_WINDOW_SECS") {
        config.monitor.freshness_window_secs = parse_number("FRESHNESS_WINDOW_SECS", &v)?;
    }
    if let Some(v) = get("RETRY_MAX_ATTEMPTS") {
        config.retry.max_attempts = parse_number("RETRY_MAX_ATTEMPTS", &v)?;
    }
    if let Some(v) = get("RETRY_DELAY_MS") {
        config.retry.delay_ms = parse_number("RETRY_DELAY_MS", &v)?;
    }

    Ok(())
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> MonitorResult<T>
where
    T::Err: std::fmt::Display,
{
    value
        .parse::<T>()
        .map_err(|e| MonitorError::Configuration(format!("{}='{}' is not valid: {}", key, value, e)))
}

impl Config {
    /// Startup validation; every failure here is fatal for the binary
    pub fn validate(&self) -> MonitorResult<()> {
        if self.rpc.url.trim().is_empty() {
            return Err(MonitorError::Configuration(
                "RPC endpoint is required (rpc.url or RPC_URL)".to_string(),
            ));
        }

        check_endpoint("rpc.url", self.rpc.url.trim(), &["http", "https"])?;
        check_endpoint("rpc.ws_url", &self.rpc.ws_endpoint(), &["ws", "wss"])?;

        for (name, value) in [
            ("monitor.program_id", &self.monitor.program_id),
            ("launchpad.program_id", &self.launchpad.program_id),
            ("launchpad.native_mint", &self.launchpad.native_mint),
            ("metadata.metadata_program_id", &self.metadata.metadata_program_id),
        ] {
            Pubkey::from_str(value.trim()).map_err(|e| {
                MonitorError::Configuration(format!("{} '{}' is not a valid address: {}", name, value, e))
            })?;
        }

        if self.retry.max_attempts == 0 {
            return Err(MonitorError::Configuration(
                "retry.max_attempts must be at least 1".to_string(),
            ));
        }

        if self.monitor.freshness_window_secs <= 0 {
            return Err(MonitorError::Configuration(
                "monitor.freshness_window_secs must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

fn check_endpoint(name: &str, value: &str, schemes: &[&str]) -> MonitorResult<()> {
    let url = Url::parse(value)
        .map_err(|e| MonitorError::Configuration(format!("{} '{}' is not a valid URL: {}", name, value, e)))?;

    if !schemes.contains(&url.scheme()) {
        return Err(MonitorError::Configuration(format!(
            "{} must use one of {:?}, got '{}'",
            name,
            schemes,
            url.scheme()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn valid_config() -> Config {
        let mut config = Config::default();
        config.rpc.url = "https://api.mainnet-beta.solana.com".to_string();
        config
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.monitor.freshness_window_secs, 300);
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.delay_ms, 5000);
        assert_eq!(config.monitor.fetch_delay_ms, 100);
        assert_eq!(config.monitor.max_processed_signatures, 200_000);
        assert_eq!(config.monitor.max_known_mints, 0);
        assert_eq!(config.metadata.uri_timeout_secs, 10);
        assert_eq!(config.launchpad.native_mint, crate::constants::SOL_MINT);
        assert!(config.rpc.url.is_empty());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let config = load_config_from_path(path.to_str().unwrap()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[rpc]\nurl = \"http://localhost:8899\"\n\n[retry]\ndelay_ms = 250\n\n[monitor]\nmint_suffix = \"\""
        )
        .unwrap();

        let config = load_config_from_path(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.rpc.url, "http://localhost:8899");
        assert_eq!(config.retry.delay_ms, 250);
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.monitor.mint_suffix, "");
        assert_eq!(config.rpc.ws_endpoint(), "ws://localhost:8899");
    }

    #[test]
    fn test_invalid_toml_is_configuration_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[rpc\nurl = ").unwrap();
        let result = load_config_from_path(file.path().to_str().unwrap());
        assert!(matches!(result, Err(MonitorError::Configuration(_))));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("RPC_URL", "https://rpc.example.com"),
            ("FRESHNESS_WINDOW_SECS", "60"),
            ("RETRY_MAX_ATTEMPTS", "5"),
            ("RETRY_DELAY_MS", "10"),
            ("WS_URL", "  "),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        apply_overrides_from(&mut config, |k| env.get(k).map(|v| v.to_string())).unwrap();

        assert_eq!(config.rpc.url, "https://rpc.example.com");
        assert_eq!(config.monitor.freshness_window_secs, 60);
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.delay_ms, 10);
        assert_eq!(config.rpc.ws_endpoint(), "wss://rpc.example.com");
    }

    #[test]
    fn test_env_override_rejects_garbage_number() {
        let mut config = Config::default();
        let result = apply_overrides_from(&mut config, |k| {
            (k == "RETRY_DELAY_MS").then(|| "soon".to_string())
        });
        assert!(matches!(result, Err(MonitorError::Configuration(_))));
    }

    #[test]
    fn test_validate() {
        assert!(valid_config().validate().is_ok());
        assert!(Config::default().validate().is_err());

        let mut bad_program = valid_config();
        bad_program.monitor.program_id = "not-a-program".to_string();
        assert!(bad_program.validate().is_err());

        let mut bad_url = valid_config();
        bad_url.rpc.url = "api.mainnet-beta.solana.com".to_string();
        assert!(bad_url.validate().is_err());

        let mut bad_ws = valid_config();
        bad_ws.rpc.ws_url = "https://api.mainnet-beta.solana.com".to_string();
        assert!(bad_ws.validate().is_err());

        let mut zero_attempts = valid_config();
        zero_attempts.retry.max_attempts = 0;
        assert!(zero_attempts.validate().is_err());
    }
}
