/// Raydium LaunchLab pool account decoder
///
/// Program ID: RAYDIUM_LAUNCHPAD_PROGRAM_ID (LanMV9s...)
///
/// Pool account layout (after the 8-byte Anchor discriminator):
/// - epoch (u64), auth_bump (u8), status (u8)
/// - mint_decimals_a (u8), mint_decimals_b (u8), migrate_type (u8)
/// - supply, total_sell_a, virtual_a, virtual_b, real_a, real_b,
///   total_fund_raising_b, protocol_fee, platform_fee, migrate_fee (u64 each)
/// - vesting schedule (5 x u64)
/// - global_config, platform_config, mint_a, mint_b, vault_a, vault_b, creator (Pubkey each)
///
/// Side A is the launched token, side B the quote (wrapped SOL).
use borsh::BorshDeserialize;
use solana_sdk::pubkey::Pubkey;

use crate::constants::LAUNCHLAB_POOL_SEED;
use crate::errors::{MonitorError, MonitorResult};

/// Bytes up to and including `vault_b`
pub const POOL_MIN_LEN: usize = 333;
const DISCRIMINATOR_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, BorshDeserialize)]
pub struct VestingSchedule {
    pub total_locked_amount: u64,
    pub cliff_period: u64,
    pub unlock_period: u64,
    pub start_time: u64,
    pub allocated_share_amount: u64,
}

#[derive(BorshDeserialize)]
struct RawPoolState {
    epoch: u64,
    auth_bump: u8,
    status: u8,
    decimals_a: u8,
    decimals_b: u8,
    migrate_type: u8,
    supply: u64,
    total_sell_a: u64,
    virtual_a: u64,
    virtual_b: u64,
    real_a: u64,
    real_b: u64,
    total_fund_raising_b: u64,
    protocol_fee: u64,
    platform_fee: u64,
    migrate_fee: u64,
    vesting: VestingSchedule,
    config_id: [u8; 32],
    platform_id: [u8; 32],
    mint_a: [u8; 32],
    mint_b: [u8; 32],
    vault_a: [u8; 32],
    vault_b: [u8; 32],
}

#[derive(Debug, Clone, PartialEq)]
pub struct LaunchLabPool {
    pub epoch: u64,
    pub auth_bump: u8,
    pub status: u8,
    pub decimals_a: u8,
    pub decimals_b: u8,
    pub migrate_type: u8,
    pub supply: u64,
    pub total_sell_a: u64,
    pub virtual_a: u64,
    pub virtual_b: u64,
    pub real_a: u64,
    pub real_b: u64,
    pub total_fund_raising_b: u64,
    pub protocol_fee: u64,
    pub platform_fee: u64,
    pub migrate_fee: u64,
    pub vesting: VestingSchedule,
    pub config_id: Pubkey,
    pub platform_id: Pubkey,
    pub mint_a: Pubkey,
    pub mint_b: Pubkey,
    pub vault_a: Pubkey,
    pub vault_b: Pubkey,
    /// Absent on pools created before the field existed
    pub creator: Option<Pubkey>,
}

impl LaunchLabPool {
    /// Quote raised so far, in whole quote units
    pub fn quote_raised(&self) -> f64 {
        scale(self.real_b, self.decimals_b)
    }

    /// Quote needed to complete the curve, in whole quote units
    pub fn quote_target(&self) -> f64 {
        scale(self.total_fund_raising_b, self.decimals_b)
    }

    /// Constant-product spot price of one base token in quote units
    ///
    /// `None` once the virtual base reserve is exhausted.
    pub fn spot_price(&self) -> Option<f64> {
        let base = self.virtual_a.checked_sub(self.real_a).filter(|base| *base > 0)?;
        let quote = self.virtual_b.checked_add(self.real_b)?;
        Some(scale(quote, self.decimals_b) / scale(base, self.decimals_a))
    }

    /// Unix `(start, end)` of the vesting schedule, when one is set
    pub fn vesting_window(&self) -> (Option<i64>, Option<i64>) {
        let Ok(start) = i64::try_from(self.vesting.start_time) else {
            return (None, None);
        };
        if start == 0 {
            return (None, None);
        }

        let end = self
            .vesting
            .cliff_period
            .checked_add(self.vesting.unlock_period)
            .filter(|period| *period > 0)
            .and_then(|period| i64::try_from(period).ok())
            .and_then(|period| start.checked_add(period));

        (Some(start), end)
    }
}

fn scale(amount: u64, decimals: u8) -> f64 {
    (amount as f64) / 10f64.powi(decimals as i32)
}

/// Pool PDA for a launched mint paired with `quote_mint`
pub fn derive_pool_address(program_id: &Pubkey, mint: &Pubkey, quote_mint: &Pubkey) -> Pubkey {
    let (pool, _bump) = Pubkey::find_program_address(
        &[LAUNCHLAB_POOL_SEED, mint.as_ref(), quote_mint.as_ref()],
        program_id,
    );
    pool
}

/// Decode a pool account's raw data
pub fn decode_pool(data: &[u8]) -> MonitorResult<LaunchLabPool> {
    if data.len() < POOL_MIN_LEN {
        return Err(MonitorError::Data(format!(
            "LaunchLab pool data too short: {} bytes (minimum: {})",
            data.len(),
            POOL_MIN_LEN
        )));
    }

    let mut body = &data[DISCRIMINATOR_LEN..];
    let raw = RawPoolState::deserialize(&mut body)
        .map_err(|e| MonitorError::Data(format!("LaunchLab pool decode failed: {}", e)))?;

    let creator = (body.len() >= 32).then(|| {
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&body[..32]);
        Pubkey::new_from_array(bytes)
    });

    Ok(LaunchLabPool {
        epoch: raw.epoch,
        auth_bump: raw.auth_bump,
        status: raw.status,
        decimals_a: raw.decimals_a,
        decimals_b: raw.decimals_b,
        migrate_type: raw.migrate_type,
        supply: raw.supply,
        total_sell_a: raw.total_sell_a,
        virtual_a: raw.virtual_a,
        virtual_b: raw.virtual_b,
        real_a: raw.real_a,
        real_b: raw.real_b,
        total_fund_raising_b: raw.total_fund_raising_b,
        protocol_fee: raw.protocol_fee,
        platform_fee: raw.platform_fee,
        migrate_fee: raw.migrate_fee,
        vesting: raw.vesting,
        config_id: Pubkey::new_from_array(raw.config_id),
        platform_id: Pubkey::new_from_array(raw.platform_id),
        mint_a: Pubkey::new_from_array(raw.mint_a),
        mint_b: Pubkey::new_from_array(raw.mint_b),
        vault_a: Pubkey::new_from_array(raw.vault_a),
        vault_b: Pubkey::new_from_array(raw.vault_b),
        creator,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::str::FromStr;

    pub(crate) fn put_u64(buf: &mut [u8], offset: usize, value: u64) {
        buf[offset..offset + 8].copy_from_slice(&value.to_le_bytes());
    }

    fn put_key(buf: &mut [u8], offset: usize, key: &Pubkey) {
        buf[offset..offset + 32].copy_from_slice(key.as_ref());
    }

    /// Pool account bytes laid out by absolute offset
    pub(crate) fn pool_bytes(
        status: u8,
        decimals_b: u8,
        real_b: u64,
        total_fund_raising_b: u64,
        mint_a: &Pubkey,
        creator: Option<&Pubkey>,
    ) -> Vec<u8> {
        let mut buf = vec![0u8; if creator.is_some() { 365 } else { POOL_MIN_LEN }];
        buf[..8].copy_from_slice(&[247, 237, 227, 245, 215, 195, 222, 70]);
        put_u64(&mut buf, 8, 42);
        buf[16] = 254;
        buf[17] = status;
        buf[18] = 6;
        buf[19] = decimals_b;
        buf[20] = 1;
        put_u64(&mut buf, 21, 1_000_000_000_000_000);
        put_u64(&mut buf, 29, 793_100_000_000_000);
        put_u64(&mut buf, 53, 12_345);
        put_u64(&mut buf, 61, real_b);
        put_u64(&mut buf, 69, total_fund_raising_b);
        put_u64(&mut buf, 101, 777);
        put_key(&mut buf, 205, mint_a);
        put_key(&mut buf, 237, &Pubkey::from_str(crate::constants::SOL_MINT).unwrap());
        if let Some(creator) = creator {
            put_key(&mut buf, 333, creator);
        }
        buf
    }

    #[test]
    fn test_decode_matches_offsets() {
        let mint = Pubkey::new_unique();
        let creator = Pubkey::new_unique();
        let data = pool_bytes(2, 9, 42_000_000_000, 85_000_000_000, &mint, Some(&creator));

        let pool = decode_pool(&data).unwrap();
        assert_eq!(pool.epoch, 42);
        assert_eq!(pool.auth_bump, 254);
        assert_eq!(pool.status, 2);
        assert_eq!(pool.decimals_a, 6);
        assert_eq!(pool.decimals_b, 9);
        assert_eq!(pool.migrate_type, 1);
        assert_eq!(pool.supply, 1_000_000_000_000_000);
        assert_eq!(pool.total_sell_a, 793_100_000_000_000);
        assert_eq!(pool.real_a, 12_345);
        assert_eq!(pool.real_b, 42_000_000_000);
        assert_eq!(pool.total_fund_raising_b, 85_000_000_000);
        assert_eq!(pool.vesting.total_locked_amount, 777);
        assert_eq!(pool.mint_a, mint);
        assert_eq!(pool.mint_b.to_string(), crate::constants::SOL_MINT);
        assert_eq!(pool.creator, Some(creator));
        assert_eq!(pool.quote_raised(), 42.0);
        assert_eq!(pool.quote_target(), 85.0);
    }

    #[test]
    fn test_decode_without_creator() {
        let data = pool_bytes(1, 9, 0, 85_000_000_000, &Pubkey::new_unique(), None);
        let pool = decode_pool(&data).unwrap();
        assert_eq!(pool.creator, None);
    }

    #[test]
    fn test_decode_rejects_short_data() {
        let result = decode_pool(&[0u8; 100]);
        assert!(matches!(result, Err(MonitorError::Data(_))));
    }

    #[test]
    fn test_pool_pda_is_deterministic() {
        let program = Pubkey::from_str(crate::constants::RAYDIUM_LAUNCHPAD_PROGRAM_ID).unwrap();
        let quote = Pubkey::from_str(crate::constants::SOL_MINT).unwrap();
        let mint = Pubkey::new_unique();

        let first = derive_pool_address(&program, &mint, &quote);
        assert_eq!(first, derive_pool_address(&program, &mint, &quote));
        assert_ne!(first, derive_pool_address(&program, &Pubkey::new_unique(), &quote));
    }

    #[test]
    fn test_spot_price_from_reserves() {
        let mut data = pool_bytes(2, 9, 0, 85_000_000_000, &Pubkey::new_unique(), None);
        put_u64(&mut data, 37, 1_000_000_012_345);
        put_u64(&mut data, 45, 30_000_000_000);
        let pool = decode_pool(&data).unwrap();
        let price = pool.spot_price().unwrap();
        assert!((price - 0.00003).abs() < 1e-12);

        // Real quote deposited raises the price
        put_u64(&mut data, 61, 30_000_000_000);
        let pool = decode_pool(&data).unwrap();
        assert!((pool.spot_price().unwrap() - 0.00006).abs() < 1e-12);
    }

    #[test]
    fn test_spot_price_without_base_reserve() {
        let data = pool_bytes(2, 9, 0, 85_000_000_000, &Pubkey::new_unique(), None);
        assert_eq!(decode_pool(&data).unwrap().spot_price(), None);
    }

    #[test]
    fn test_vesting_window() {
        let mut data = pool_bytes(2, 9, 0, 85_000_000_000, &Pubkey::new_unique(), None);
        assert_eq!(decode_pool(&data).unwrap().vesting_window(), (None, None));

        put_u64(&mut data, 125, 1_735_000_000);
        assert_eq!(decode_pool(&data).unwrap().vesting_window(), (Some(1_735_000_000), None));

        put_u64(&mut data, 109, 86_400);
        put_u64(&mut data, 117, 3_600);
        assert_eq!(
            decode_pool(&data).unwrap().vesting_window(),
            (Some(1_735_000_000), Some(1_735_090_000))
        );
    }
}
