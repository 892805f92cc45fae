use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::snapshot::LatestSnapshot;
use crate::cache::BoundedSet;
use crate::config::MonitorConfig;
use crate::tokens::TokenEvent;

/// Point-in-time counters of a running monitor
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MonitorStats {
    /// Cached metadata entries
    pub cache_size: usize,
    /// Cached launchpad verification results
    pub verification_cache_size: usize,
    pub known_mint_count: usize,
    pub processed_signature_count: usize,
    /// Signatures dropped from the bounded processed set
    pub evicted_signature_count: u64,
    pub token_count: usize,
    pub events_received: u64,
    pub events_published: u64,
}

/// Every enriched token, keyed by mint
#[derive(Default)]
pub struct TokenStore {
    tokens: RwLock<HashMap<String, Arc<TokenEvent>>>,
}

impl TokenStore {
    pub fn insert(&self, event: Arc<TokenEvent>) {
        self.tokens.write().entry(event.mint.clone()).or_insert(event);
    }

    pub fn get(&self, mint: &str) -> Option<Arc<TokenEvent>> {
        self.tokens.read().get(mint).cloned()
    }

    pub fn len(&self) -> usize {
        self.tokens.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.read().is_empty()
    }

    /// The `n` most recent tokens by block time, oldest first
    pub fn recent(&self, n: usize) -> Vec<Arc<TokenEvent>> {
        let mut all: Vec<Arc<TokenEvent>> = self.tokens.read().values().cloned().collect();
        all.sort_by(|a, b| a.block_time.cmp(&b.block_time).then_with(|| a.slot.cmp(&b.slot)));
        let skip = all.len().saturating_sub(n);
        all.into_iter().skip(skip).collect()
    }
}

/// Shared mutable state of one monitor instance
pub struct MonitorState {
    processed_signatures: Mutex<BoundedSet<String>>,
    known_mints: Mutex<BoundedSet<String>>,
    pub tokens: TokenStore,
    pub snapshot: LatestSnapshot,
    events_received: AtomicU64,
    events_published: AtomicU64,
}

impl MonitorState {
    pub fn new(config: &MonitorConfig) -> Self {
        Self {
            processed_signatures: Mutex::new(BoundedSet::new(config.max_processed_signatures)),
            known_mints: Mutex::new(BoundedSet::new(config.max_known_mints)),
            tokens: TokenStore::default(),
            snapshot: LatestSnapshot::new(),
            events_received: AtomicU64::new(0),
            events_published: AtomicU64::new(0),
        }
    }

    /// Returns false if the signature was already processed
    pub fn claim_signature(&self, signature: &str) -> bool {
        self.processed_signatures.lock().insert(signature.to_string())
    }

    /// Returns false if the mint is already known
    pub fn claim_mint(&self, mint: &str) -> bool {
        self.known_mints.lock().insert(mint.to_string())
    }

    pub fn record_received(&self) {
        self.events_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_published(&self) {
        self.events_published.fetch_add(1, Ordering::Relaxed);
    }

    pub fn stats(&self, cache_size: usize, verification_cache_size: usize) -> MonitorStats {
        let (processed_signature_count, evicted_signature_count) = {
            let signatures = self.processed_signatures.lock();
            (signatures.len(), signatures.evictions())
        };

        MonitorStats {
            cache_size,
            verification_cache_size,
            known_mint_count: self.known_mints.lock().len(),
            processed_signature_count,
            evicted_signature_count,
            token_count: self.tokens.len(),
            events_received: self.events_received.load(Ordering::Relaxed),
            events_published: self.events_published.load(Ordering::Relaxed),
        }
    }
}
