/// Launchpad origin check
///
/// A mint counts as launched from the launchpad when its account is owned by
/// the configured launchpad program. Results, negative ones included, are
/// cached for the life of the process.
use std::sync::Arc;

use solana_sdk::pubkey::Pubkey;

use crate::cache::{CacheManager, CacheMetrics};
use crate::logger::{self, LogTag};
use crate::retry::RetryPolicy;
use crate::rpc::ChainReader;
use crate::utils::parse_pubkey;

pub struct LaunchpadVerifier {
    chain: Arc<dyn ChainReader>,
    retry: RetryPolicy,
    program_id: String,
    cache: CacheManager<String, bool>,
}

impl LaunchpadVerifier {
    pub fn new(chain: Arc<dyn ChainReader>, retry: RetryPolicy, program_id: &Pubkey) -> Self {
        Self {
            chain,
            retry,
            program_id: program_id.to_string(),
            cache: CacheManager::new(),
        }
    }

    pub async fn is_from_launchpad(&self, mint: &str) -> bool {
        let key = mint.to_string();
        if let Some(verified) = self.cache.get(&key) {
            return verified;
        }

        let verified = self.check_owner(mint).await;
        self.cache.insert_if_absent(key, verified)
    }

    async fn check_owner(&self, mint: &str) -> bool {
        let mint_key = match parse_pubkey(mint) {
            Ok(key) => key,
            Err(e) => {
                logger::debug(LogTag::Launchpad, &format!("Skipping verification of '{}': {}", mint, e));
                return false;
            }
        };

        match self
            .retry
            .run("getAccountInfo(mint)", || self.chain.get_account(&mint_key))
            .await
        {
            Ok(Some(account)) if account.owner == self.program_id => {
                logger::info(
                    LogTag::Launchpad,
                    &format!("✅ Verified {} is on the launchpad", mint),
                );
                true
            }
            Ok(_) => false,
            Err(e) => {
                logger::error(
                    LogTag::Launchpad,
                    &format!("Error verifying {} with launchpad: {}", mint, e),
                );
                false
            }
        }
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    pub fn cache_metrics(&self) -> CacheMetrics {
        self.cache.metrics()
    }
}
