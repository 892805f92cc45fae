/// Token Holder Analysis Module
///
/// Concentration heuristics over the largest token accounts of a mint:
/// - top-10 share of supply (also reported as insiders)
/// - share of sampled accounts holding under the small-holder threshold (snipers)
/// - share of sampled accounts holding over the large-holder threshold (dev)
/// - combined supply share of those large holders (bundlers)
use crate::config::AnalyticsConfig;
use crate::rpc::{TokenAccountBalance, TokenSupply};
use crate::utils::format_pct;

use super::types::HolderAnalytics;

/// Compute holder analytics; a zero supply or empty sample yields neutral values
pub fn compute_holder_analytics(
    accounts: &[TokenAccountBalance],
    supply: &TokenSupply,
    config: &AnalyticsConfig,
) -> HolderAnalytics {
    if supply.amount == 0 || accounts.is_empty() {
        return HolderAnalytics::neutral();
    }

    let total = supply.amount as f64;
    let sampled = accounts.len() as f64;

    let mut amounts: Vec<u64> = accounts.iter().map(|a| a.amount).collect();
    amounts.sort_unstable_by(|a, b| b.cmp(a));

    let share_pct = |amount: u64| (amount as f64) / total * 100.0;

    let top10: f64 = amounts.iter().take(10).map(|a| *a as f64).sum::<f64>() / total * 100.0;

    let small_count = amounts
        .iter()
        .filter(|a| share_pct(**a) < config.small_holder_threshold_pct)
        .count();

    let large: Vec<u64> = amounts
        .iter()
        .copied()
        .filter(|a| share_pct(*a) > config.large_holder_threshold_pct)
        .collect();

    let bundlers: f64 = large.iter().map(|a| *a as f64).sum::<f64>() / total * 100.0;

    HolderAnalytics {
        top10_holders_pct: format_pct(top10),
        dev_holders_pct: format_pct((large.len() as f64) / sampled * 100.0),
        snipers_holders_pct: format_pct((small_count as f64) / sampled * 100.0),
        insiders_pct: format_pct(top10),
        bundlers_pct: format_pct(bundlers),
        sampled_accounts: accounts.len(),
    }
}
