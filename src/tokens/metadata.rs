/// Token metadata resolution
///
/// Sources, in order of precedence:
/// 1. Transaction-local: the Metaplex create instruction inside the launch transaction
/// 2. Registry: the Metaplex metadata account of the mint
/// 3. Off-chain JSON behind the `uri` of either source (image, description, socials)
///
/// Registry results are cached per mint for the life of the process, fallbacks included.
/// Off-chain documents are fetched once, bounded by the fetcher's timeout.
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use borsh::BorshDeserialize;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use solana_sdk::pubkey::Pubkey;

use super::types::{PartialMetadata, SocialLinks, TokenMetadata};
use crate::cache::{CacheManager, CacheMetrics};
use crate::config::MetadataConfig;
use crate::constants::{METADATA_SEED, UNKNOWN_TOKEN_LABEL};
use crate::errors::{MonitorError, MonitorResult};
use crate::logger::{self, LogTag};
use crate::retry::RetryPolicy;
use crate::rpc::{ChainReader, ParsedTransaction};
use crate::utils::parse_pubkey;

// =============================================================================
// OFF-CHAIN FETCHING
// =============================================================================

#[async_trait]
pub trait UriFetcher: Send + Sync {
    async fn fetch_json(&self, uri: &str) -> MonitorResult<Value>;
}

/// HTTP(S) fetcher with a fixed timeout and browser-like headers
pub struct HttpUriFetcher {
    client: reqwest::Client,
}

impl HttpUriFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> MonitorResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| MonitorError::Configuration(format!("Failed to build metadata HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    pub fn from_config(config: &MetadataConfig) -> MonitorResult<Self> {
        Self::new(Duration::from_secs(config.uri_timeout_secs), &config.user_agent)
    }
}

#[async_trait]
impl UriFetcher for HttpUriFetcher {
    async fn fetch_json(&self, uri: &str) -> MonitorResult<Value> {
        let response = self
            .client
            .get(uri)
            .header(reqwest::header::ACCEPT, "application/json, text/plain, */*")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MonitorError::Network(format!("Status {} from {}", status, uri)));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| MonitorError::Data(format!("Invalid metadata JSON at {}: {}", uri, e)))
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

/// Nested `properties.<key>` wins over top-level `<key>`
fn social_field(value: &Value, key: &str) -> Option<String> {
    value
        .get("properties")
        .and_then(|props| string_field(props, key))
        .or_else(|| string_field(value, key))
}

/// Extract the enrichment fields of an off-chain metadata document
pub fn parse_offchain(value: &Value) -> PartialMetadata {
    PartialMetadata {
        name: None,
        symbol: None,
        uri: None,
        image: string_field(value, "image"),
        description: string_field(value, "description"),
        socials: SocialLinks {
            website: social_field(value, "website"),
            twitter: social_field(value, "twitter"),
            telegram: social_field(value, "telegram"),
        },
    }
}

// =============================================================================
// ON-CHAIN DECODING
// =============================================================================

/// Leading fields of a Metaplex metadata account
#[derive(BorshDeserialize)]
struct RegistryPrefix {
    _key: u8,
    _update_authority: [u8; 32],
    _mint: [u8; 32],
    name: String,
    symbol: String,
    uri: String,
}

/// Leading fields of a Metaplex create-metadata instruction
#[derive(BorshDeserialize)]
struct CreateArgsPrefix {
    _discriminator: u8,
    name: String,
    symbol: String,
    uri: String,
}

// Metaplex limits: name 32, symbol 10, uri 200 bytes
const MAX_NAME_LEN: usize = 32;
const MAX_SYMBOL_LEN: usize = 10;
const MAX_URI_LEN: usize = 200;

static NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""name"\s*:\s*"([^"]+)""#).expect("Invalid name pattern"));
static SYMBOL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""symbol"\s*:\s*"([^"]+)""#).expect("Invalid symbol pattern"));
static URI_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""uri"\s*:\s*"([^"]+)""#).expect("Invalid uri pattern"));

/// Strip Metaplex NUL padding; empty strings become `None`
fn clean(value: &str) -> Option<String> {
    let trimmed = value.trim_matches('\0').trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

pub fn derive_metadata_address(metadata_program: &Pubkey, mint: &Pubkey) -> Pubkey {
    let (address, _bump) = Pubkey::find_program_address(
        &[METADATA_SEED, metadata_program.as_ref(), mint.as_ref()],
        metadata_program,
    );
    address
}

/// Decode name/symbol/uri from a metadata registry account
pub fn decode_registry_account(data: &[u8]) -> MonitorResult<PartialMetadata> {
    let prefix = RegistryPrefix::deserialize(&mut &data[..])
        .map_err(|e| MonitorError::Data(format!("Metadata account decode failed: {}", e)))?;

    Ok(PartialMetadata {
        name: clean(&prefix.name),
        symbol: clean(&prefix.symbol),
        uri: clean(&prefix.uri),
        ..PartialMetadata::default()
    })
}

fn decode_create_args(bytes: &[u8]) -> Option<PartialMetadata> {
    let args = CreateArgsPrefix::deserialize(&mut &bytes[..]).ok()?;

    if args.name.len() > MAX_NAME_LEN || args.symbol.len() > MAX_SYMBOL_LEN || args.uri.len() > MAX_URI_LEN {
        return None;
    }

    let metadata = PartialMetadata {
        name: clean(&args.name),
        symbol: clean(&args.symbol),
        uri: clean(&args.uri),
        ..PartialMetadata::default()
    };

    metadata.name.is_some().then_some(metadata)
}

fn capture(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| clean(m.as_str()))
}

fn extract_by_pattern(text: &str) -> Option<PartialMetadata> {
    let metadata = PartialMetadata {
        name: capture(&NAME_PATTERN, text),
        symbol: capture(&SYMBOL_PATTERN, text),
        uri: capture(&URI_PATTERN, text),
        ..PartialMetadata::default()
    };

    (metadata.name.is_some() || metadata.symbol.is_some() || metadata.uri.is_some()).then_some(metadata)
}

/// Find the metadata program instruction in `tx` and decode name/symbol/uri
///
/// Borsh create-metadata arguments are tried first, then `"name":"..."` style
/// patterns over the instruction data.
pub fn extract_from_transaction(tx: &ParsedTransaction, metadata_program: &str) -> Option<PartialMetadata> {
    tx.instructions
        .iter()
        .filter(|ix| ix.program_id == metadata_program)
        .filter_map(|ix| ix.data.as_deref())
        .find_map(|raw| {
            let bytes = bs58::decode(raw).into_vec().ok();

            if let Some(decoded) = bytes.as_deref().and_then(decode_create_args) {
                return Some(decoded);
            }

            let text = match &bytes {
                Some(b) => String::from_utf8_lossy(b).into_owned(),
                None => raw.to_string(),
            };
            extract_by_pattern(&text)
        })
}

// =============================================================================
// RESOLVER
// =============================================================================

pub struct MetadataResolver {
    chain: Arc<dyn ChainReader>,
    fetcher: Arc<dyn UriFetcher>,
    retry: RetryPolicy,
    metadata_program: Pubkey,
    cache: CacheManager<String, TokenMetadata>,
}

impl MetadataResolver {
    pub fn new(
        chain: Arc<dyn ChainReader>,
        fetcher: Arc<dyn UriFetcher>,
        retry: RetryPolicy,
        metadata_program: Pubkey,
    ) -> Self {
        Self {
            chain,
            fetcher,
            retry,
            metadata_program,
            cache: CacheManager::new(),
        }
    }

    /// Resolve metadata for `mint`; never fails
    pub async fn resolve(&self, mint: &str) -> TokenMetadata {
        let key = mint.to_string();
        if let Some(hit) = self.cache.get(&key) {
            return hit;
        }

        let metadata = self.resolve_uncached(mint).await;
        self.cache.insert_if_absent(key, metadata)
    }

    async fn resolve_uncached(&self, mint: &str) -> TokenMetadata {
        let mint_key = match parse_pubkey(mint) {
            Ok(key) => key,
            Err(e) => {
                logger::debug(LogTag::Metadata, &format!("Cannot resolve '{}': {}", mint, e));
                return TokenMetadata::fallback();
            }
        };

        let address = derive_metadata_address(&self.metadata_program, &mint_key);

        let account = match self
            .retry
            .run("getAccountInfo(metadata)", || self.chain.get_account(&address))
            .await
        {
            Ok(Some(account)) => account,
            Ok(None) => {
                logger::debug(LogTag::Metadata, &format!("No metadata record for {}", mint));
                return TokenMetadata::fallback();
            }
            Err(e) => {
                logger::error(
                    LogTag::Metadata,
                    &format!("Failed to fetch primary metadata for {}: {}", mint, e),
                );
                return TokenMetadata::fallback();
            }
        };

        let onchain = match decode_registry_account(&account.data) {
            Ok(onchain) => onchain,
            Err(e) => {
                logger::warning(LogTag::Metadata, &format!("{}: {}", mint, e));
                return TokenMetadata::fallback();
            }
        };

        let mut metadata = TokenMetadata {
            name: onchain.name.unwrap_or_else(|| UNKNOWN_TOKEN_LABEL.to_string()),
            symbol: onchain.symbol.unwrap_or_else(|| UNKNOWN_TOKEN_LABEL.to_string()),
            uri: onchain.uri,
            ..TokenMetadata::fallback()
        };

        match metadata.uri.clone() {
            Some(uri) => {
                if let Some(offchain) = self.fetch_offchain(mint, &uri).await {
                    metadata = metadata.overlay(&offchain);
                }
            }
            None => logger::debug(LogTag::Metadata, &format!("No metadata URI found for {}", mint)),
        }

        metadata
    }

    /// Fetch and parse an off-chain document once; failures are logged and yield `None`
    pub async fn fetch_offchain(&self, mint: &str, uri: &str) -> Option<PartialMetadata> {
        match self.fetcher.fetch_json(uri).await {
            Ok(document) => {
                logger::debug(LogTag::Metadata, &format!("Fetched metadata URI for {}", mint));
                Some(parse_offchain(&document))
            }
            Err(e) => {
                logger::warning(
                    LogTag::Metadata,
                    &format!("Metadata URI fetch failed for {} ({}): {}", mint, uri, e),
                );
                None
            }
        }
    }

    /// Metadata carried by the launch transaction itself, enriched from its URI (not cached)
    pub async fn resolve_transaction_local(&self, mint: &str, tx: &ParsedTransaction) -> Option<PartialMetadata> {
        let mut local = extract_from_transaction(tx, &self.metadata_program.to_string())?;

        if let Some(uri) = local.uri.clone() {
            if let Some(offchain) = self.fetch_offchain(mint, &uri).await {
                local.image = offchain.image.or(local.image);
                local.description = offchain.description.or(local.description);
                local.socials = offchain.socials;
            }
        }

        Some(local)
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    pub fn cache_metrics(&self) -> CacheMetrics {
        self.cache.metrics()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::rpc::InstructionRecord;
    use serde_json::json;
    use std::str::FromStr;

    fn borsh_string(out: &mut Vec<u8>, value: &str) {
        out.extend_from_slice(&(value.len() as u32).to_le_bytes());
        out.extend_from_slice(value.as_bytes());
    }

    fn padded(value: &str, len: usize) -> String {
        let mut out = value.to_string();
        while out.len() < len {
            out.push('\0');
        }
        out
    }

    /// Metadata account bytes with Metaplex-style NUL padding
    pub(crate) fn registry_account_bytes(name: &str, symbol: &str, uri: &str) -> Vec<u8> {
        let mut out = vec![4u8];
        out.extend_from_slice(&[1u8; 32]);
        out.extend_from_slice(&[2u8; 32]);
        borsh_string(&mut out, &padded(name, 32));
        borsh_string(&mut out, &padded(symbol, 10));
        borsh_string(&mut out, &padded(uri, 200));
        out.extend_from_slice(&[0u8; 16]);
        out
    }

    pub(crate) fn create_instruction_data(name: &str, symbol: &str, uri: &str) -> String {
        let mut out = vec![33u8];
        borsh_string(&mut out, name);
        borsh_string(&mut out, symbol);
        borsh_string(&mut out, uri);
        out.extend_from_slice(&[0u8; 4]);
        bs58::encode(out).into_string()
    }

    fn tx_with_instruction(program_id: &str, data: String) -> ParsedTransaction {
        ParsedTransaction {
            signature: "SIG".to_string(),
            instructions: vec![InstructionRecord {
                program_id: program_id.to_string(),
                accounts: vec![],
                data: Some(data),
            }],
            ..ParsedTransaction::default()
        }
    }

    #[test]
    fn test_decode_registry_trims_padding() {
        let data = registry_account_bytes("Bonk Cat", "BCAT", "https://ipfs.io/ipfs/Qm123");
        let decoded = decode_registry_account(&data).unwrap();
        assert_eq!(decoded.name.as_deref(), Some("Bonk Cat"));
        assert_eq!(decoded.symbol.as_deref(), Some("BCAT"));
        assert_eq!(decoded.uri.as_deref(), Some("https://ipfs.io/ipfs/Qm123"));
    }

    #[test]
    fn test_decode_registry_rejects_garbage() {
        assert!(decode_registry_account(&[4u8; 20]).is_err());
    }

    #[test]
    fn test_nested_properties_win_over_top_level() {
        let doc = json!({
            "name": "Bonk Cat",
            "image": "https://img/cat.png",
            "description": "a cat",
            "website": "https://top.level",
            "twitter": "https://x.com/top",
            "properties": {
                "website": "https://nested.site",
                "telegram": "https://t.me/nested"
            }
        });

        let parsed = parse_offchain(&doc);
        assert_eq!(parsed.image.as_deref(), Some("https://img/cat.png"));
        assert_eq!(parsed.description.as_deref(), Some("a cat"));
        assert_eq!(parsed.socials.website.as_deref(), Some("https://nested.site"));
        assert_eq!(parsed.socials.twitter.as_deref(), Some("https://x.com/top"));
        assert_eq!(parsed.socials.telegram.as_deref(), Some("https://t.me/nested"));
    }

    #[test]
    fn test_missing_socials_are_null() {
        let parsed = parse_offchain(&json!({ "image": "", "properties": { "files": [] } }));
        assert_eq!(parsed.image, None);
        assert_eq!(parsed.socials, SocialLinks::default());
    }

    #[test]
    fn test_extract_from_transaction_borsh() {
        let program = crate::constants::METADATA_PROGRAM_ID;
        let tx = tx_with_instruction(program, create_instruction_data("Moon Bonk", "MBONK", "https://arweave.net/x"));

        let local = extract_from_transaction(&tx, program).unwrap();
        assert_eq!(local.name.as_deref(), Some("Moon Bonk"));
        assert_eq!(local.symbol.as_deref(), Some("MBONK"));
        assert_eq!(local.uri.as_deref(), Some("https://arweave.net/x"));
    }

    #[test]
    fn test_extract_from_transaction_pattern_fallback() {
        let program = crate::constants::METADATA_PROGRAM_ID;
        let payload = r#"{"name":"Json Token","symbol":"JSON","uri":"https://meta/json"}"#;
        let tx = tx_with_instruction(program, bs58::encode(payload.as_bytes()).into_string());

        let local = extract_from_transaction(&tx, program).unwrap();
        assert_eq!(local.name.as_deref(), Some("Json Token"));
        assert_eq!(local.symbol.as_deref(), Some("JSON"));
        assert_eq!(local.uri.as_deref(), Some("https://meta/json"));
    }

    #[test]
    fn test_extract_ignores_other_programs() {
        let tx = tx_with_instruction(
            "11111111111111111111111111111111",
            create_instruction_data("Other", "OTH", "https://x"),
        );
        assert!(extract_from_transaction(&tx, crate::constants::METADATA_PROGRAM_ID).is_none());
    }

    #[test]
    fn test_metadata_pda_uses_program_and_mint() {
        let program = Pubkey::from_str(crate::constants::METADATA_PROGRAM_ID).unwrap();
        let mint = Pubkey::new_unique();
        assert_eq!(derive_metadata_address(&program, &mint), derive_metadata_address(&program, &mint));
        assert_ne!(
            derive_metadata_address(&program, &mint),
            derive_metadata_address(&program, &Pubkey::new_unique())
        );
    }
}
