/// Launchpad pool support
///
/// - `launchlab`: Raydium LaunchLab pool PDA derivation and account decoding
/// - `bonding_curve`: curve status and progress built on the decoded pool
pub mod bonding_curve;
pub mod launchlab;

pub use bonding_curve::{fetch_bonding_curve, BondingCurveSnapshot, BondingCurveStatus};
pub use launchlab::{decode_pool, derive_pool_address, LaunchLabPool};
