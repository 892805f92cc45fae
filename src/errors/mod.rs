/// Error types for launchwatch
///
/// One enum covers every failure the pipeline can observe. Per-step failures
/// are logged and skipped by the monitor; only `Configuration` is fatal at startup.
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum MonitorError {
    #[error("Network error: {0}")] Network(String),

    #[error("RPC error in {method}: {message}")] Rpc {
        method: String,
        message: String,
    },

    #[error("Timeout error: {operation} timed out after {seconds} seconds")] Timeout {
        operation: String,
        seconds: u64,
    },

    #[error("Invalid address: {0}")] InvalidAddress(String),

    #[error("Data error: {0}")] Data(String),

    #[error("Configuration error: {0}")] Configuration(String),

    #[error("Subscription error: {0}")] Subscription(String),

    #[error("Shutdown in progress")] Shutdown,
}

pub type MonitorResult<T> = std::result::Result<T, MonitorError>;

impl MonitorError {
    pub fn rpc(method: &str, message: impl Into<String>) -> Self {
        MonitorError::Rpc {
            method: method.to_string(),
            message: message.into(),
        }
    }

    /// Errors worth another attempt under the retry policy
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            MonitorError::Network(_)
                | MonitorError::Rpc { .. }
                | MonitorError::Timeout { .. }
                | MonitorError::Subscription(_)
        )
    }
}

impl From<reqwest::Error> for MonitorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            MonitorError::Timeout {
                operation: err
                    .url()
                    .map(|u| u.to_string())
                    .unwrap_or_else(|| "http request".to_string()),
                seconds: 0,
            }
        } else {
            MonitorError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for MonitorError {
    fn from(err: serde_json::Error) -> Self {
        MonitorError::Data(format!("JSON: {}", err))
    }
}

impl From<solana_sdk::pubkey::ParsePubkeyError> for MonitorError {
    fn from(err: solana_sdk::pubkey::ParsePubkeyError) -> Self {
        MonitorError::InvalidAddress(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(MonitorError::Network("reset".into()).is_retryable());
        assert!(MonitorError::rpc("getTransaction", "429").is_retryable());
        assert!(!MonitorError::InvalidAddress("x".into()).is_retryable());
        assert!(!MonitorError::Shutdown.is_retryable());
        assert!(!MonitorError::Data("bad json".into()).is_retryable());
    }

    #[test]
    fn test_pubkey_parse_error_is_invalid_address() {
        let err: MonitorError = "not-base58!".parse::<solana_sdk::pubkey::Pubkey>().unwrap_err().into();
        assert!(matches!(err, MonitorError::InvalidAddress(_)));
    }

    #[test]
    fn test_display_includes_method() {
        let err = MonitorError::rpc("getTokenSupply", "Invalid param");
        assert_eq!(err.to_string(), "RPC error in getTokenSupply: Invalid param");
    }
}
