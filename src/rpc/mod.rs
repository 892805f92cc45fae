/// Chain access for the pipeline
///
/// Everything the monitor reads from the chain goes through `ChainReader`,
/// so the pipeline can run against an in-memory chain in tests. `RpcClient`
/// is the JSON-RPC implementation used in production.
pub mod client;
pub mod types;

pub use client::RpcClient;
pub use types::{
    AccountData, InstructionRecord, ParsedTransaction, PostTokenBalance, SignatureInfo,
    TokenAccountBalance, TokenSupply,
};

use crate::errors::MonitorResult;
use async_trait::async_trait;
use solana_sdk::pubkey::Pubkey;

#[async_trait]
pub trait ChainReader: Send + Sync {
    /// `Ok(None)` when the node does not (yet) know the signature
    async fn get_transaction(&self, signature: &str) -> MonitorResult<Option<ParsedTransaction>>;

    /// `Ok(None)` when the account does not exist
    async fn get_account(&self, address: &Pubkey) -> MonitorResult<Option<AccountData>>;

    /// Largest holders of a mint, largest first (the node returns at most 20)
    async fn get_token_largest_accounts(&self, mint: &Pubkey) -> MonitorResult<Vec<TokenAccountBalance>>;

    /// Fails for addresses that are not token mints
    async fn get_token_supply(&self, mint: &Pubkey) -> MonitorResult<TokenSupply>;

    /// Most recent signatures touching `address`, newest first
    async fn get_signatures_for_address(&self, address: &Pubkey, limit: usize)
        -> MonitorResult<Vec<SignatureInfo>>;
}
