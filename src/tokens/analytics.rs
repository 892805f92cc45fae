use std::sync::Arc;

use solana_sdk::pubkey::Pubkey;

use super::holders::compute_holder_analytics;
use super::types::{HolderAnalytics, TokenAnalytics};
use crate::config::AnalyticsConfig;
use crate::logger::{self, LogTag};
use crate::pools::{fetch_bonding_curve, BondingCurveSnapshot};
use crate::retry::RetryPolicy;
use crate::rpc::ChainReader;
use crate::utils::parse_pubkey;

/// Holder concentration and bonding-curve progress for a mint
///
/// Both computations degrade to neutral values on failure.
pub struct AnalyticsCalculator {
    chain: Arc<dyn ChainReader>,
    retry: RetryPolicy,
    config: AnalyticsConfig,
    launchpad_program: Pubkey,
    quote_mint: Pubkey,
}

impl AnalyticsCalculator {
    pub fn new(
        chain: Arc<dyn ChainReader>,
        retry: RetryPolicy,
        config: AnalyticsConfig,
        launchpad_program: Pubkey,
        quote_mint: Pubkey,
    ) -> Self {
        Self {
            chain,
            retry,
            config,
            launchpad_program,
            quote_mint,
        }
    }

    pub fn enabled(&self) -> bool {
        self.config.enabled
    }

    /// Run both computations concurrently
    pub async fn analyze(&self, mint: &str) -> TokenAnalytics {
        let (holders, bonding_curve) = tokio::join!(self.holder_analytics(mint), self.bonding_curve(mint));
        TokenAnalytics {
            mint: mint.to_string(),
            holders,
            bonding_curve,
        }
    }

    pub async fn holder_analytics(&self, mint: &str) -> HolderAnalytics {
        let Ok(mint_key) = parse_pubkey(mint) else {
            return HolderAnalytics::neutral();
        };

        let chain = self.chain.as_ref();
        let (accounts, supply) = tokio::join!(
            self.retry
                .run("getTokenLargestAccounts", || chain.get_token_largest_accounts(&mint_key)),
            self.retry.run("getTokenSupply", || chain.get_token_supply(&mint_key)),
        );

        match (accounts, supply) {
            (Ok(accounts), Ok(supply)) => {
                let stats = compute_holder_analytics(&accounts, &supply, &self.config);
                logger::debug(
                    LogTag::Analytics,
                    &format!(
                        "{} holders: top10 {}% dev {}% snipers {}% bundlers {}%",
                        mint,
                        stats.top10_holders_pct,
                        stats.dev_holders_pct,
                        stats.snipers_holders_pct,
                        stats.bundlers_pct
                    ),
                );
                stats
            }
            (Err(e), _) | (_, Err(e)) => {
                logger::warning(
                    LogTag::Analytics,
                    &format!("Holder analysis failed for {}: {}", mint, e),
                );
                HolderAnalytics::neutral()
            }
        }
    }

    pub async fn bonding_curve(&self, mint: &str) -> BondingCurveSnapshot {
        let Ok(mint_key) = parse_pubkey(mint) else {
            return BondingCurveSnapshot::unavailable(None);
        };

        fetch_bonding_curve(
            self.chain.as_ref(),
            &self.retry,
            &self.launchpad_program,
            &self.quote_mint,
            &mint_key,
        )
        .await
    }
}
