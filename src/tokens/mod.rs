/// Token enrichment
///
/// - `types`: `TokenEvent` and the metadata/analytics records it carries
/// - `metadata`: registry + transaction-local + off-chain metadata resolution
/// - `launchpad`: launchpad origin verification
/// - `holders`: holder concentration heuristics
/// - `analytics`: holder and bonding-curve analytics for a mint
pub mod analytics;
pub mod holders;
pub mod launchpad;
pub mod metadata;
pub mod types;

pub use analytics::AnalyticsCalculator;
pub use launchpad::LaunchpadVerifier;
pub use metadata::{HttpUriFetcher, MetadataResolver, UriFetcher};
pub use types::{
    HolderAnalytics, PartialMetadata, SocialLinks, TokenAnalytics, TokenEvent, TokenMetadata,
};
