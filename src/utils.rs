use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;
use std::time::Duration;

use crate::errors::MonitorResult;
use crate::shutdown::ShutdownSignal;

/// Parse a base58 address; failures surface as `MonitorError::InvalidAddress`
pub fn parse_pubkey(address: &str) -> MonitorResult<Pubkey> {
    Ok(Pubkey::from_str(address)?)
}

/// Truncate a string to at most `max_chars` characters without splitting a char
pub fn safe_truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Current unix time in seconds
pub fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Render a unix timestamp as local time for log lines
pub fn format_block_time(block_time: i64) -> String {
    chrono::DateTime::from_timestamp(block_time, 0)
        .map(|dt| {
            dt.with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        })
        .unwrap_or_else(|| block_time.to_string())
}

/// Fixed two-decimal percentage formatting used by analytics
pub fn format_pct(value: f64) -> String {
    if value.is_finite() {
        format!("{:.2}", value)
    } else {
        "0.00".to_string()
    }
}

pub fn lamports_to_sol(lamports: u64) -> f64 {
    (lamports as f64) / (crate::constants::LAMPORTS_PER_SOL as f64)
}

/// Waits for either shutdown signal or delay. Returns true if shutdown was triggered.
pub async fn check_shutdown_or_delay(shutdown: &ShutdownSignal, duration: Duration) -> bool {
    tokio::select! {
        _ = tokio::time::sleep(duration) => shutdown.is_triggered(),
        _ = shutdown.wait() => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::MonitorError;

    #[test]
    fn test_parse_pubkey() {
        assert!(parse_pubkey(crate::constants::SOL_MINT).is_ok());
        assert!(matches!(
            parse_pubkey("not-a-valid-bonk"),
            Err(MonitorError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_safe_truncate_respects_char_boundaries() {
        assert_eq!(safe_truncate("ABCDEFGHbonk", 8), "ABCDEFGH");
        assert_eq!(safe_truncate("短い文字列", 2), "短い");
        assert_eq!(safe_truncate("abc", 8), "abc");
    }

    #[test]
    fn test_format_pct() {
        assert_eq!(format_pct(12.345), "12.35");
        assert_eq!(format_pct(0.0), "0.00");
        assert_eq!(format_pct(f64::NAN), "0.00");
    }

    #[test]
    fn test_lamports_to_sol() {
        assert_eq!(lamports_to_sol(5_000), 0.000005);
        assert_eq!(lamports_to_sol(1_000_000_000), 1.0);
    }
}
