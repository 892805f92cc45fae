/// Per-event pipeline
///
/// received → duplicate
/// received → filtered-out
/// received → fetched → skipped
/// received → fetched → no-new-mint
/// received → fetched → candidate → enriched → published (or kept unpublished)
///
/// Each step that touches the network degrades per candidate; one failing
/// mint never aborts the others in the same transaction.
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use solana_sdk::pubkey::Pubkey;

use super::state::MonitorState;
use crate::arguments::is_debug_monitor_enabled;
use crate::config::MonitorConfig;
use crate::constants::EARLY_TRANSACTION_LIMIT;
use crate::logger::{self, log, LogTag};
use crate::retry::RetryPolicy;
use crate::rpc::{ChainReader, ParsedTransaction, SignatureInfo};
use crate::shutdown::ShutdownSignal;
use crate::tokens::{AnalyticsCalculator, LaunchpadVerifier, MetadataResolver, TokenEvent};
use crate::utils::{
    check_shutdown_or_delay, format_block_time, lamports_to_sol, parse_pubkey, safe_truncate, unix_now,
};
use crate::websocket::LogEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Node returned no transaction for the signature
    Missing,
    /// Fetch failed after retries
    FetchFailed,
    /// The transaction itself failed on chain
    FailedOnChain,
    NoBlockTime,
    /// Block time before the monitor started
    PreStart,
    /// Older than the freshness window
    Stale,
    NoTokenBalances,
    Shutdown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    Duplicate,
    FilteredOut,
    Skipped(SkipReason),
    NoNewMint,
    Processed { enriched: usize, published: usize },
}

/// Processing knobs resolved from `MonitorConfig`
#[derive(Debug, Clone)]
pub struct ProcessorSettings {
    pub creation_patterns: Vec<String>,
    /// Lowercase; empty disables the suffix check
    pub mint_suffix: String,
    pub freshness_window_secs: i64,
    pub fetch_delay: Duration,
    pub native_mint: String,
    pub require_token_supply: bool,
    pub summary_size: usize,
}

impl ProcessorSettings {
    pub fn from_config(config: &MonitorConfig, native_mint: &str) -> Self {
        Self {
            creation_patterns: config.creation_log_patterns.clone(),
            mint_suffix: config.mint_suffix.trim().to_lowercase(),
            freshness_window_secs: config.freshness_window_secs,
            fetch_delay: Duration::from_millis(config.fetch_delay_ms),
            native_mint: native_mint.to_string(),
            require_token_supply: config.require_token_supply,
            summary_size: config.summary_size,
        }
    }
}

struct Candidate {
    mint: String,
    initial_buy: f64,
}

pub struct EventProcessor {
    chain: Arc<dyn ChainReader>,
    retry: RetryPolicy,
    metadata: MetadataResolver,
    launchpad: LaunchpadVerifier,
    analytics: AnalyticsCalculator,
    state: MonitorState,
    settings: ProcessorSettings,
    start_watermark: AtomicI64,
    shutdown: ShutdownSignal,
}

impl EventProcessor {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        chain: Arc<dyn ChainReader>,
        retry: RetryPolicy,
        metadata: MetadataResolver,
        launchpad: LaunchpadVerifier,
        analytics: AnalyticsCalculator,
        state: MonitorState,
        settings: ProcessorSettings,
        shutdown: ShutdownSignal,
    ) -> Self {
        Self {
            chain,
            retry,
            metadata,
            launchpad,
            analytics,
            state,
            settings,
            start_watermark: AtomicI64::new(unix_now()),
            shutdown,
        }
    }

    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    pub fn analytics(&self) -> &AnalyticsCalculator {
        &self.analytics
    }

    pub fn metadata_cache_len(&self) -> usize {
        self.metadata.cache_len()
    }

    pub fn launchpad_cache_len(&self) -> usize {
        self.launchpad.cache_len()
    }

    pub fn set_start_watermark(&self, unix_secs: i64) {
        self.start_watermark.store(unix_secs, Ordering::SeqCst);
    }

    pub fn start_watermark(&self) -> i64 {
        self.start_watermark.load(Ordering::SeqCst)
    }

    // =========================================================================
    // PIPELINE
    // =========================================================================

    pub async fn handle(&self, event: LogEvent) -> EventOutcome {
        self.state.record_received();

        if !self.state.claim_signature(&event.signature) {
            return EventOutcome::Duplicate;
        }

        if !self.passes_filter(&event) {
            return EventOutcome::FilteredOut;
        }

        if is_debug_monitor_enabled() {
            logger::debug(
                LogTag::Monitor,
                &format!("Processing transaction: {}", event.signature),
            );
        }

        let tx = match self.fetch_transaction(&event.signature).await {
            Ok(tx) => tx,
            Err(reason) => {
                logger::debug(
                    LogTag::Monitor,
                    &format!("Skipped {}: {:?}", safe_truncate(&event.signature, 16), reason),
                );
                return EventOutcome::Skipped(reason);
            }
        };

        let candidates = self.claim_candidates(&tx).await;
        if candidates.is_empty() {
            return EventOutcome::NoNewMint;
        }

        let mut enriched = 0;
        let mut published = 0;

        for candidate in candidates {
            if self.shutdown.is_triggered() {
                break;
            }

            let token = Arc::new(self.enrich(&candidate, &tx).await);
            enriched += 1;

            self.state.tokens.insert(token.clone());
            if self.publish(token) {
                published += 1;
            }

            if is_debug_monitor_enabled() {
                self.early_transactions(&candidate.mint).await;
            }
        }

        self.log_summary();

        EventOutcome::Processed { enriched, published }
    }

    fn passes_filter(&self, event: &LogEvent) -> bool {
        if event.has_error {
            return false;
        }

        event.logs.iter().any(|line| {
            self.settings
                .creation_patterns
                .iter()
                .any(|pattern| line.contains(pattern.as_str()))
        })
    }

    async fn fetch_transaction(&self, signature: &str) -> Result<ParsedTransaction, SkipReason> {
        if !self.settings.fetch_delay.is_zero()
            && check_shutdown_or_delay(&self.shutdown, self.settings.fetch_delay).await
        {
            return Err(SkipReason::Shutdown);
        }

        let chain = self.chain.as_ref();
        let tx = match self
            .retry
            .run("getTransaction", || chain.get_transaction(signature))
            .await
        {
            Ok(Some(tx)) => tx,
            Ok(None) => return Err(SkipReason::Missing),
            Err(e) => {
                logger::error(
                    LogTag::Monitor,
                    &format!("Failed to fetch transaction {}: {}", signature, e),
                );
                return Err(SkipReason::FetchFailed);
            }
        };

        if tx.failed {
            return Err(SkipReason::FailedOnChain);
        }

        let Some(block_time) = tx.block_time else {
            return Err(SkipReason::NoBlockTime);
        };

        if tx.post_token_balances.is_empty() {
            return Err(SkipReason::NoTokenBalances);
        }

        if block_time < self.start_watermark() {
            return Err(SkipReason::PreStart);
        }

        if unix_now() - block_time > self.settings.freshness_window_secs {
            return Err(SkipReason::Stale);
        }

        Ok(tx)
    }

    fn matches_suffix(&self, mint: &str) -> bool {
        self.settings.mint_suffix.is_empty() || mint.to_lowercase().ends_with(&self.settings.mint_suffix)
    }

    /// New mints of `tx`, each atomically claimed in the known set
    async fn claim_candidates(&self, tx: &ParsedTransaction) -> Vec<Candidate> {
        let mut candidates = Vec::new();

        for balance in &tx.post_token_balances {
            let mint = balance.mint.as_str();

            if mint == self.settings.native_mint || !self.matches_suffix(mint) {
                continue;
            }

            let mint_key = match parse_pubkey(mint) {
                Ok(key) => key,
                Err(e) => {
                    if is_debug_monitor_enabled() {
                        logger::debug(LogTag::Monitor, &format!("Ignoring balance for '{}': {}", mint, e));
                    }
                    continue;
                }
            };

            if !self.state.claim_mint(mint) {
                continue;
            }

            if self.settings.require_token_supply && !self.is_token_mint(&mint_key).await {
                logger::debug(LogTag::Monitor, &format!("{} is not a token mint, skipping", mint));
                continue;
            }

            candidates.push(Candidate {
                mint: mint.to_string(),
                initial_buy: balance.ui_amount.unwrap_or(0.0),
            });
        }

        candidates
    }

    async fn is_token_mint(&self, mint: &Pubkey) -> bool {
        let chain = self.chain.as_ref();
        self.retry
            .run("getTokenSupply", || chain.get_token_supply(mint))
            .await
            .is_ok()
    }

    async fn enrich(&self, candidate: &Candidate, tx: &ParsedTransaction) -> TokenEvent {
        let mint = candidate.mint.as_str();

        let analytics_enabled = self.analytics.enabled();
        let (registry, local, verified, analytics) = tokio::join!(
            self.metadata.resolve(mint),
            self.metadata.resolve_transaction_local(mint, tx),
            self.launchpad.is_from_launchpad(mint),
            async {
                if analytics_enabled {
                    Some(self.analytics.analyze(mint).await)
                } else {
                    None
                }
            },
        );

        let metadata = match local {
            Some(local) => registry.overlay(&local),
            None => registry,
        };

        if metadata.is_fallback() {
            logger::warning(
                LogTag::Metadata,
                &format!("No metadata resolved for {}, publishing as Unknown", mint),
            );
        }

        let mut token = TokenEvent {
            mint: mint.to_string(),
            name: String::new(),
            symbol: String::new(),
            uri: None,
            image: None,
            description: None,
            socials: Default::default(),
            creator: tx.fee_payer().map(|s| s.to_string()),
            initial_buy: candidate.initial_buy,
            fee_sol: lamports_to_sol(tx.fee_lamports),
            signature: tx.signature.clone(),
            slot: tx.slot,
            block_time: tx.block_time.unwrap_or_default(),
            launchpad_verified: verified,
            bonding_curve: None,
            holders: None,
        };
        token.apply_metadata(metadata);

        if let Some(analytics) = analytics {
            token.holders = Some(analytics.holders);
            token.bonding_curve = Some(analytics.bonding_curve);
        }

        log(
            LogTag::Monitor,
            "NEW_TOKEN",
            &format!(
                "🆕 {} ({}) {} | creator {} | initial buy {} | fee {:.6} SOL | {}",
                token.name,
                token.symbol,
                token.mint,
                token.creator.as_deref().unwrap_or("-"),
                token.initial_buy,
                token.fee_sol,
                format_block_time(token.block_time)
            ),
        );

        token
    }

    fn publish(&self, token: Arc<TokenEvent>) -> bool {
        let mint = token.mint.clone();
        let verified = token.launchpad_verified;

        if self.state.snapshot.offer(token) {
            self.state.record_published();
            logger::info(
                LogTag::Monitor,
                &format!(
                    "📢 Latest token is now {}{}",
                    mint,
                    if verified { " (launchpad verified)" } else { "" }
                ),
            );
            true
        } else {
            if is_debug_monitor_enabled() {
                logger::debug(
                    LogTag::Monitor,
                    &format!("{} kept out of the latest snapshot", mint),
                );
            }
            false
        }
    }

    /// First signatures touching `mint`, logged oldest first
    pub async fn early_transactions(&self, mint: &str) -> Vec<SignatureInfo> {
        let Ok(mint_key) = parse_pubkey(mint) else {
            return Vec::new();
        };

        let chain = self.chain.as_ref();
        let mut signatures = match self
            .retry
            .run("getSignaturesForAddress", || {
                chain.get_signatures_for_address(&mint_key, EARLY_TRANSACTION_LIMIT)
            })
            .await
        {
            Ok(signatures) => signatures,
            Err(e) => {
                logger::error(
                    LogTag::Monitor,
                    &format!("Error checking early transactions for {}: {}", mint, e),
                );
                return Vec::new();
            }
        };

        // The node answers newest first
        signatures.reverse();

        if signatures.is_empty() {
            logger::debug(LogTag::Monitor, &format!("No transactions found for {}", mint));
        } else {
            logger::debug(
                LogTag::Monitor,
                &format!("Found {} early transactions for {}", signatures.len(), mint),
            );
            for (index, info) in signatures.iter().enumerate() {
                logger::debug(
                    LogTag::Monitor,
                    &format!(
                        "  #{} {} {}{}",
                        index + 1,
                        info.block_time.map(format_block_time).unwrap_or_else(|| "-".to_string()),
                        safe_truncate(&info.signature, 16),
                        if info.failed { " (failed)" } else { "" }
                    ),
                );
            }
        }

        signatures
    }

    fn log_summary(&self) {
        let recent = self.state.tokens.recent(self.settings.summary_size);
        if recent.is_empty() {
            return;
        }

        let metadata = self.metadata.cache_metrics();
        let launchpad = self.launchpad.cache_metrics();
        logger::debug(
            LogTag::Monitor,
            &format!(
                "Caches: metadata {} entries ({:.0}% hits), launchpad {} entries ({:.0}% hits)",
                self.metadata.cache_len(),
                metadata.hit_rate() * 100.0,
                self.launchpad.cache_len(),
                launchpad.hit_rate() * 100.0
            ),
        );

        logger::debug(
            LogTag::Monitor,
            &format!("Latest {} tokens (oldest first):", recent.len()),
        );
        for token in recent {
            logger::debug(
                LogTag::Monitor,
                &format!(
                    "  {} {} ({}) {}",
                    format_block_time(token.block_time),
                    token.name,
                    token.symbol,
                    token.mint
                ),
            );
        }
    }
}
