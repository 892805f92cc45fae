/// Bonding-curve progress for launchpad pools
use serde::Serialize;
use solana_sdk::pubkey::Pubkey;

use super::launchlab::{decode_pool, derive_pool_address, LaunchLabPool};
use crate::logger::{self, LogTag};
use crate::retry::RetryPolicy;
use crate::rpc::ChainReader;
use crate::utils::format_pct;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BondingCurveStatus {
    Uninitialized,
    Upcoming,
    Open,
    Ended,
    /// Status byte outside the known range
    Unknown,
    /// Pool missing or undecodable
    Unavailable,
}

impl BondingCurveStatus {
    pub fn from_byte(status: u8) -> Self {
        match status {
            0 => BondingCurveStatus::Uninitialized,
            1 => BondingCurveStatus::Upcoming,
            2 => BondingCurveStatus::Open,
            3 => BondingCurveStatus::Ended,
            _ => BondingCurveStatus::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BondingCurveStatus::Uninitialized => "UNINITIALIZED",
            BondingCurveStatus::Upcoming => "UPCOMING",
            BondingCurveStatus::Open => "OPEN",
            BondingCurveStatus::Ended => "ENDED",
            BondingCurveStatus::Unknown => "UNKNOWN",
            BondingCurveStatus::Unavailable => "UNAVAILABLE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BondingCurveSnapshot {
    pub status: BondingCurveStatus,
    pub pool_id: Option<String>,
    /// Two-decimal percentage in [0, 100]
    pub progress_pct: String,
    /// Quote raised, whole quote units
    pub deposited: f64,
    /// Quote target, whole quote units
    pub target: f64,
    /// Spot price of one token in quote units
    pub pool_price: Option<f64>,
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
}

impl BondingCurveSnapshot {
    pub fn unavailable(pool_id: Option<String>) -> Self {
        Self {
            status: BondingCurveStatus::Unavailable,
            pool_id,
            progress_pct: "0.00".to_string(),
            deposited: 0.0,
            target: 0.0,
            pool_price: None,
            start_time: None,
            end_time: None,
        }
    }

    pub fn from_pool(pool_id: &Pubkey, pool: &LaunchLabPool) -> Self {
        let status = BondingCurveStatus::from_byte(pool.status);
        let deposited = pool.quote_raised();
        let target = pool.quote_target();

        let progress = if status == BondingCurveStatus::Uninitialized || target <= 0.0 {
            0.0
        } else {
            (deposited / target * 100.0).clamp(0.0, 100.0)
        };

        let pool_price = match status {
            BondingCurveStatus::Uninitialized => None,
            _ => pool.spot_price(),
        };
        let (start_time, end_time) = pool.vesting_window();

        Self {
            status,
            pool_id: Some(pool_id.to_string()),
            progress_pct: format_pct(progress),
            deposited,
            target,
            pool_price,
            start_time,
            end_time,
        }
    }
}

/// Read and decode the launchpad pool of `mint`; never fails
pub async fn fetch_bonding_curve(
    chain: &dyn ChainReader,
    retry: &RetryPolicy,
    launchpad_program: &Pubkey,
    quote_mint: &Pubkey,
    mint: &Pubkey,
) -> BondingCurveSnapshot {
    let pool_id = derive_pool_address(launchpad_program, mint, quote_mint);

    let account = match retry
        .run("getAccountInfo(pool)", || chain.get_account(&pool_id))
        .await
    {
        Ok(Some(account)) => account,
        Ok(None) => {
            logger::debug(
                LogTag::Analytics,
                &format!("No launchpad pool {} for {}", pool_id, mint),
            );
            return BondingCurveSnapshot::unavailable(Some(pool_id.to_string()));
        }
        Err(e) => {
            logger::warning(
                LogTag::Analytics,
                &format!("Bonding curve lookup failed for {}: {}", mint, e),
            );
            return BondingCurveSnapshot::unavailable(Some(pool_id.to_string()));
        }
    };

    match decode_pool(&account.data) {
        Ok(pool) => BondingCurveSnapshot::from_pool(&pool_id, &pool),
        Err(e) => {
            logger::warning(
                LogTag::Analytics,
                &format!("Pool {} for {} could not be decoded: {}", pool_id, mint, e),
            );
            BondingCurveSnapshot::unavailable(Some(pool_id.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pools::launchlab::tests::{pool_bytes, put_u64};

    fn snapshot(status: u8, real_b: u64, target: u64) -> BondingCurveSnapshot {
        let bytes = pool_bytes(status, 9, real_b, target, &Pubkey::new_unique(), None);
        let pool = decode_pool(&bytes).unwrap();
        BondingCurveSnapshot::from_pool(&Pubkey::new_unique(), &pool)
    }

    #[test]
    fn test_progress_is_deposited_over_target() {
        let s = snapshot(2, 42_500_000_000, 85_000_000_000);
        assert_eq!(s.status, BondingCurveStatus::Open);
        assert_eq!(s.progress_pct, "50.00");
        assert_eq!(s.deposited, 42.5);
        assert_eq!(s.target, 85.0);
    }

    #[test]
    fn test_progress_is_clamped() {
        assert_eq!(snapshot(3, 90_000_000_000, 85_000_000_000).progress_pct, "100.00");
        assert_eq!(snapshot(2, 5, 0).progress_pct, "0.00");
    }

    #[test]
    fn test_uninitialized_reports_zero() {
        let s = snapshot(0, 42_500_000_000, 85_000_000_000);
        assert_eq!(s.status, BondingCurveStatus::Uninitialized);
        assert_eq!(s.progress_pct, "0.00");
    }

    #[test]
    fn test_price_and_schedule_from_pool() {
        let mut bytes = pool_bytes(2, 9, 0, 85_000_000_000, &Pubkey::new_unique(), None);
        put_u64(&mut bytes, 37, 1_000_000_012_345);
        put_u64(&mut bytes, 45, 30_000_000_000);
        put_u64(&mut bytes, 109, 600);
        put_u64(&mut bytes, 117, 3_000);
        put_u64(&mut bytes, 125, 1_735_000_000);

        let s = BondingCurveSnapshot::from_pool(&Pubkey::new_unique(), &decode_pool(&bytes).unwrap());
        assert!((s.pool_price.unwrap() - 0.00003).abs() < 1e-12);
        assert_eq!(s.start_time, Some(1_735_000_000));
        assert_eq!(s.end_time, Some(1_735_003_600));

        bytes[17] = 0;
        let s = BondingCurveSnapshot::from_pool(&Pubkey::new_unique(), &decode_pool(&bytes).unwrap());
        assert_eq!(s.pool_price, None);
        assert_eq!(s.start_time, Some(1_735_000_000));
    }

    #[test]
    fn test_price_unset_without_reserves() {
        let s = snapshot(2, 42_500_000_000, 85_000_000_000);
        assert_eq!(s.pool_price, None);
        assert_eq!((s.start_time, s.end_time), (None, None));
    }

    #[test]
    fn test_unavailable_is_never_null() {
        let s = BondingCurveSnapshot::unavailable(None);
        assert_eq!(s.status.as_str(), "UNAVAILABLE");
        assert_eq!(s.progress_pct, "0.00");
        assert_eq!(s.pool_price, None);
        assert_eq!(BondingCurveStatus::from_byte(9), BondingCurveStatus::Unknown);
    }
}
