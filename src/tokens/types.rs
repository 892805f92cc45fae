use serde::Serialize;

use crate::constants::UNKNOWN_TOKEN_LABEL;
use crate::pools::BondingCurveSnapshot;

// =============================================================================
// METADATA
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SocialLinks {
    pub website: Option<String>,
    pub twitter: Option<String>,
    pub telegram: Option<String>,
}

impl SocialLinks {
    /// Fields present in `other` replace ours
    fn overlay(&mut self, other: &SocialLinks) {
        if other.website.is_some() {
            self.website = other.website.clone();
        }
        if other.twitter.is_some() {
            self.twitter = other.twitter.clone();
        }
        if other.telegram.is_some() {
            self.telegram = other.telegram.clone();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub uri: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub socials: SocialLinks,
}

impl TokenMetadata {
    /// Result used when nothing can be resolved for a mint
    pub fn fallback() -> Self {
        Self {
            name: UNKNOWN_TOKEN_LABEL.to_string(),
            symbol: UNKNOWN_TOKEN_LABEL.to_string(),
            uri: None,
            image: None,
            description: None,
            socials: SocialLinks::default(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.name == UNKNOWN_TOKEN_LABEL && self.symbol == UNKNOWN_TOKEN_LABEL && self.uri.is_none()
    }

    /// Overlay transaction-local metadata: every field it carries wins
    pub fn overlay(mut self, local: &PartialMetadata) -> Self {
        if let Some(name) = &local.name {
            self.name = name.clone();
        }
        if let Some(symbol) = &local.symbol {
            self.symbol = symbol.clone();
        }
        if local.uri.is_some() {
            self.uri = local.uri.clone();
        }
        if local.image.is_some() {
            self.image = local.image.clone();
        }
        if local.description.is_some() {
            self.description = local.description.clone();
        }
        self.socials.overlay(&local.socials);
        self
    }
}

/// Metadata where every field may be missing (transaction-local source)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialMetadata {
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub uri: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub socials: SocialLinks,
}

// =============================================================================
// ANALYTICS
// =============================================================================

/// Holder concentration, two-decimal percentage strings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HolderAnalytics {
    pub top10_holders_pct: String,
    pub dev_holders_pct: String,
    pub snipers_holders_pct: String,
    pub insiders_pct: String,
    pub bundlers_pct: String,
    /// Accounts the percentages were computed from
    pub sampled_accounts: usize,
}

impl HolderAnalytics {
    pub fn neutral() -> Self {
        Self {
            top10_holders_pct: "0.00".to_string(),
            dev_holders_pct: "0.00".to_string(),
            snipers_holders_pct: "0.00".to_string(),
            insiders_pct: "0.00".to_string(),
            bundlers_pct: "0.00".to_string(),
            sampled_accounts: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenAnalytics {
    pub mint: String,
    pub holders: HolderAnalytics,
    pub bonding_curve: BondingCurveSnapshot,
}

// =============================================================================
// TOKEN EVENT
// =============================================================================

/// Enriched record for one discovered token
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenEvent {
    pub mint: String,
    pub name: String,
    pub symbol: String,
    pub uri: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub socials: SocialLinks,
    pub creator: Option<String>,
    pub initial_buy: f64,
    pub fee_sol: f64,
    pub signature: String,
    pub slot: u64,
    pub block_time: i64,
    pub launchpad_verified: bool,
    pub bonding_curve: Option<BondingCurveSnapshot>,
    pub holders: Option<HolderAnalytics>,
}

impl TokenEvent {
    pub fn apply_metadata(&mut self, metadata: TokenMetadata) {
        self.name = metadata.name;
        self.symbol = metadata.symbol;
        self.uri = metadata.uri;
        self.image = metadata.image;
        self.description = metadata.description;
        self.socials = metadata.socials;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_prefers_transaction_fields() {
        let registry = TokenMetadata {
            name: "Registry Name".to_string(),
            symbol: "REG".to_string(),
            uri: Some("https://registry/uri.json".to_string()),
            image: Some("https://registry/img.png".to_string()),
            description: None,
            socials: SocialLinks {
                website: Some("https://registry.site".to_string()),
                twitter: Some("https://x.com/registry".to_string()),
                telegram: None,
            },
        };
        let local = PartialMetadata {
            name: Some("Local Name".to_string()),
            symbol: None,
            uri: None,
            image: None,
            description: Some("from tx".to_string()),
            socials: SocialLinks {
                twitter: Some("https://x.com/local".to_string()),
                ..SocialLinks::default()
            },
        };

        let merged = registry.overlay(&local);
        assert_eq!(merged.name, "Local Name");
        assert_eq!(merged.symbol, "REG");
        assert_eq!(merged.uri.as_deref(), Some("https://registry/uri.json"));
        assert_eq!(merged.description.as_deref(), Some("from tx"));
        assert_eq!(merged.socials.website.as_deref(), Some("https://registry.site"));
        assert_eq!(merged.socials.twitter.as_deref(), Some("https://x.com/local"));
    }

    #[test]
    fn test_fallback() {
        let fallback = TokenMetadata::fallback();
        assert!(fallback.is_fallback());
        assert_eq!(fallback.name, "Unknown");
        assert_eq!(fallback.symbol, "Unknown");
        assert!(fallback.uri.is_none() && fallback.image.is_none());
    }
}
