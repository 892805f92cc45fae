/// Latest known-good token snapshot
///
/// A single slot holding the most recently accepted `TokenEvent`. Readers
/// clone the `Arc`; writers decide and swap under one write lock.
use parking_lot::RwLock;
use std::sync::Arc;

use crate::tokens::TokenEvent;

/// Publication rule:
/// - nothing published yet: accept
/// - verified candidate over unverified snapshot: accept
/// - same verification status: accept when not older
/// - unverified candidate over verified snapshot: reject
pub fn should_replace(current: Option<&TokenEvent>, candidate: &TokenEvent) -> bool {
    let Some(current) = current else {
        return true;
    };

    match (candidate.launchpad_verified, current.launchpad_verified) {
        (true, false) => true,
        (false, true) => false,
        _ => candidate.block_time >= current.block_time,
    }
}

#[derive(Default)]
pub struct LatestSnapshot {
    slot: RwLock<Option<Arc<TokenEvent>>>,
}

impl LatestSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<Arc<TokenEvent>> {
        self.slot.read().clone()
    }

    /// Publish `candidate` if the rule allows it; returns whether it was published
    pub fn offer(&self, candidate: Arc<TokenEvent>) -> bool {
        let mut slot = self.slot.write();
        if should_replace(slot.as_deref(), &candidate) {
            *slot = Some(candidate);
            true
        } else {
            false
        }
    }
}
