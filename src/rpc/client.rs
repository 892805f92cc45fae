use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use solana_account_decoder::UiAccountEncoding;
use solana_client::rpc_request::RpcRequest;
use solana_sdk::pubkey::Pubkey;
use solana_transaction_status::UiTransactionEncoding;

use super::types::*;
use super::ChainReader;
use crate::config::RpcConfig;
use crate::errors::{MonitorError, MonitorResult};
use crate::logger::{self, LogTag};

// =============================================================================
// JSON-RPC CLIENT
// =============================================================================

/// Plain JSON-RPC over HTTP with a per-request timeout
pub struct RpcClient {
    url: String,
    http: reqwest::Client,
    timeout: Duration,
    next_id: AtomicU64,
    calls: AtomicU64,
}

impl RpcClient {
    pub fn new(url: &str, timeout: Duration) -> MonitorResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MonitorError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            url: url.to_string(),
            http,
            timeout,
            next_id: AtomicU64::new(1),
            calls: AtomicU64::new(0),
        })
    }

    pub fn from_config(config: &RpcConfig) -> MonitorResult<Self> {
        Self::new(config.url.trim(), Duration::from_secs(config.request_timeout_secs))
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Total requests sent since creation
    pub fn total_calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }

    /// Send one request; `Ok(None)` means the node answered `result: null`
    async fn call<T: DeserializeOwned>(&self, request: RpcRequest, params: Value) -> MonitorResult<Option<T>> {
        let method = request.to_string();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let payload = request.build_request_json(id, params);
        self.calls.fetch_add(1, Ordering::Relaxed);

        let started = Instant::now();
        let response = self
            .http
            .post(&self.url)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| self.transport_error(&method, e))?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(MonitorError::rpc(&method, "rate limited (HTTP 429)"));
        }
        if !status.is_success() {
            return Err(MonitorError::rpc(&method, format!("HTTP {}", status)));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(&method, e))?;

        let envelope: RpcEnvelope<T> = serde_json::from_slice(&body)
            .map_err(|e| MonitorError::rpc(&method, format!("malformed response: {}", e)))?;

        if crate::arguments::is_debug_rpc_enabled() {
            logger::debug(
                LogTag::Rpc,
                &format!("{} #{} answered in {}ms", method, id, started.elapsed().as_millis()),
            );
        }

        if let Some(error) = envelope.error {
            return Err(MonitorError::rpc(&method, format!("{} (code {})", error.message, error.code)));
        }

        Ok(envelope.result)
    }

    fn transport_error(&self, method: &str, err: reqwest::Error) -> MonitorError {
        if err.is_timeout() {
            MonitorError::Timeout {
                operation: method.to_string(),
                seconds: self.timeout.as_secs(),
            }
        } else {
            MonitorError::Network(format!("{}: {}", method, err))
        }
    }
}

#[async_trait]
impl ChainReader for RpcClient {
    async fn get_transaction(&self, signature: &str) -> MonitorResult<Option<ParsedTransaction>> {
        let params = json!([
            signature,
            {
                "encoding": UiTransactionEncoding::JsonParsed,
                "commitment": "confirmed",
                "maxSupportedTransactionVersion": 0
            }
        ]);

        let tx: Option<WireTransaction> = self.call(RpcRequest::GetTransaction, params).await?;
        Ok(tx.map(|wire| wire.into_parsed(signature)))
    }

    async fn get_account(&self, address: &Pubkey) -> MonitorResult<Option<AccountData>> {
        let params = json!([
            address.to_string(),
            {
                "encoding": UiAccountEncoding::Base64,
                "commitment": "confirmed"
            }
        ]);

        let response: Option<WithContext<Option<WireAccount>>> =
            self.call(RpcRequest::GetAccountInfo, params).await?;

        let Some(account) = response.and_then(|r| r.value) else {
            return Ok(None);
        };

        let (payload, encoding) = &account.data;
        if encoding != "base64" {
            return Err(MonitorError::Data(format!(
                "unexpected account encoding '{}' for {}",
                encoding, address
            )));
        }

        let data = base64::engine::general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| MonitorError::Data(format!("invalid base64 account data for {}: {}", address, e)))?;

        Ok(Some(AccountData {
            owner: account.owner,
            lamports: account.lamports,
            data,
        }))
    }

    async fn get_token_largest_accounts(&self, mint: &Pubkey) -> MonitorResult<Vec<TokenAccountBalance>> {
        let params = json!([mint.to_string(), { "commitment": "confirmed" }]);

        let response: Option<WithContext<Vec<WireTokenAmount>>> =
            self.call(RpcRequest::GetTokenLargestAccounts, params).await?;

        Ok(response
            .map(|r| r.value)
            .unwrap_or_default()
            .into_iter()
            .map(|entry| TokenAccountBalance {
                amount: entry.raw_amount(),
                address: entry.address.unwrap_or_default(),
                decimals: entry.decimals,
                ui_amount: entry.ui_amount,
            })
            .collect())
    }

    async fn get_token_supply(&self, mint: &Pubkey) -> MonitorResult<TokenSupply> {
        let params = json!([mint.to_string(), { "commitment": "confirmed" }]);

        let response: Option<WithContext<WireTokenAmount>> =
            self.call(RpcRequest::GetTokenSupply, params).await?;

        let supply = response
            .map(|r| r.value)
            .ok_or_else(|| MonitorError::rpc("getTokenSupply", format!("no supply for {}", mint)))?;

        Ok(TokenSupply {
            amount: supply.raw_amount(),
            decimals: supply.decimals,
            ui_amount: supply.ui_amount,
        })
    }

    async fn get_signatures_for_address(
        &self,
        address: &Pubkey,
        limit: usize,
    ) -> MonitorResult<Vec<SignatureInfo>> {
        let params = json!([address.to_string(), { "limit": limit, "commitment": "confirmed" }]);

        let response: Option<Vec<WireSignatureInfo>> =
            self.call(RpcRequest::GetSignaturesForAddress, params).await?;

        Ok(response
            .unwrap_or_default()
            .into_iter()
            .map(SignatureInfo::from)
            .collect())
    }
}
