use serde::Deserialize;

// =============================================================================
// DOMAIN RECORDS
// =============================================================================

/// Transaction as the pipeline needs it, flattened from a `jsonParsed` response
#[derive(Debug, Clone, Default)]
pub struct ParsedTransaction {
    pub signature: String,
    pub slot: u64,
    pub block_time: Option<i64>,
    pub fee_lamports: u64,
    pub failed: bool,
    /// Signer account keys in message order; the first one paid the fee
    pub signers: Vec<String>,
    pub post_token_balances: Vec<PostTokenBalance>,
    /// Top-level instructions followed by inner (CPI) instructions
    pub instructions: Vec<InstructionRecord>,
}

impl ParsedTransaction {
    pub fn fee_payer(&self) -> Option<&str> {
        self.signers.first().map(|s| s.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostTokenBalance {
    pub account_index: u64,
    pub mint: String,
    pub owner: Option<String>,
    pub ui_amount: Option<f64>,
    pub amount: String,
    pub decimals: u8,
}

/// Instruction left unparsed by the node (program data still base58 encoded)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstructionRecord {
    pub program_id: String,
    pub accounts: Vec<String>,
    pub data: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AccountData {
    pub owner: String,
    pub lamports: u64,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TokenAccountBalance {
    pub address: String,
    /// Raw amount in base units
    pub amount: u64,
    pub decimals: u8,
    pub ui_amount: Option<f64>,
}

/// One entry of an address's signature history
#[derive(Debug, Clone, PartialEq)]
pub struct SignatureInfo {
    pub signature: String,
    pub slot: u64,
    pub block_time: Option<i64>,
    pub failed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TokenSupply {
    pub amount: u64,
    pub decimals: u8,
    pub ui_amount: Option<f64>,
}

// =============================================================================
// JSON-RPC WIRE FORMAT
// =============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct RpcEnvelope<T> {
    pub result: Option<T>,
    #[serde(default)]
    pub error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RpcErrorObject {
    pub code: i64,
    pub message: String,
}

/// `{ context, value }` wrapper used by account and token queries
#[derive(Debug, Deserialize)]
pub(crate) struct WithContext<T> {
    pub value: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireTransaction {
    pub slot: u64,
    #[serde(default)]
    pub block_time: Option<i64>,
    #[serde(default)]
    pub meta: Option<WireMeta>,
    pub transaction: WireTransactionBody,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct WireMeta {
    pub err: Option<serde_json::Value>,
    pub fee: u64,
    pub post_token_balances: Option<Vec<WireTokenBalance>>,
    pub inner_instructions: Option<Vec<WireInnerInstructions>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireTokenBalance {
    #[serde(default)]
    pub account_index: u64,
    pub mint: String,
    #[serde(default)]
    pub owner: Option<String>,
    pub ui_token_amount: WireUiAmount,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireUiAmount {
    pub amount: String,
    pub decimals: u8,
    #[serde(default)]
    pub ui_amount: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireInnerInstructions {
    #[serde(default)]
    pub instructions: Vec<WireInstruction>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireTransactionBody {
    #[serde(default)]
    pub signatures: Vec<String>,
    pub message: WireMessage,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireMessage {
    #[serde(default)]
    pub account_keys: Vec<WireAccountKey>,
    #[serde(default)]
    pub instructions: Vec<WireInstruction>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireAccountKey {
    pub pubkey: String,
    #[serde(default)]
    pub signer: bool,
}

/// Parsed instructions carry `parsed` instead of `accounts`/`data`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireInstruction {
    pub program_id: String,
    #[serde(default)]
    pub accounts: Vec<String>,
    #[serde(default)]
    pub data: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireAccount {
    pub owner: String,
    #[serde(default)]
    pub lamports: u64,
    /// `[payload, encoding]`
    pub data: (String, String),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireSignatureInfo {
    pub signature: String,
    pub slot: u64,
    #[serde(default)]
    pub block_time: Option<i64>,
    #[serde(default)]
    pub err: Option<serde_json::Value>,
}

impl From<WireSignatureInfo> for SignatureInfo {
    fn from(wire: WireSignatureInfo) -> Self {
        Self {
            signature: wire.signature,
            slot: wire.slot,
            block_time: wire.block_time,
            failed: wire.err.is_some(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireTokenAmount {
    #[serde(default)]
    pub address: Option<String>,
    pub amount: String,
    pub decimals: u8,
    #[serde(default)]
    pub ui_amount: Option<f64>,
}

// =============================================================================
// CONVERSIONS
// =============================================================================

impl WireTransaction {
    pub(crate) fn into_parsed(self, signature: &str) -> ParsedTransaction {
        let meta = self.meta.unwrap_or_default();

        let signers = self
            .transaction
            .message
            .account_keys
            .iter()
            .filter(|key| key.signer)
            .map(|key| key.pubkey.clone())
            .collect();

        let post_token_balances = meta
            .post_token_balances
            .unwrap_or_default()
            .into_iter()
            .map(|b| PostTokenBalance {
                account_index: b.account_index,
                mint: b.mint,
                owner: b.owner,
                ui_amount: b.ui_token_amount.ui_amount,
                amount: b.ui_token_amount.amount,
                decimals: b.ui_token_amount.decimals,
            })
            .collect();

        let inner = meta
            .inner_instructions
            .unwrap_or_default()
            .into_iter()
            .flat_map(|group| group.instructions);

        let instructions = self
            .transaction
            .message
            .instructions
            .into_iter()
            .chain(inner)
            .map(|ix| InstructionRecord {
                program_id: ix.program_id,
                accounts: ix.accounts,
                data: ix.data,
            })
            .collect();

        let signature = self
            .transaction
            .signatures
            .first()
            .cloned()
            .unwrap_or_else(|| signature.to_string());

        ParsedTransaction {
            signature,
            slot: self.slot,
            block_time: self.block_time,
            fee_lamports: meta.fee,
            failed: meta.err.map(|e| !e.is_null()).unwrap_or(false),
            signers,
            post_token_balances,
            instructions,
        }
    }
}

impl WireTokenAmount {
    pub(crate) fn raw_amount(&self) -> u64 {
        self.amount.parse::<u64>().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "jsonrpc": "2.0",
        "id": 1,
        "result": {
            "slot": 345678901,
            "blockTime": 1735000000,
            "meta": {
                "err": null,
                "fee": 105000,
                "logMessages": ["Program log: Instruction: Initialize"],
                "postTokenBalances": [{
                    "accountIndex": 4,
                    "mint": "7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosbonk",
                    "owner": "Creator1111111111111111111111111111111111",
                    "programId": "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA",
                    "uiTokenAmount": {
                        "amount": "500000000",
                        "decimals": 6,
                        "uiAmount": 500.0,
                        "uiAmountString": "500"
                    }
                }],
                "innerInstructions": [{
                    "index": 0,
                    "instructions": [{
                        "programId": "metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s",
                        "accounts": ["Meta111"],
                        "data": "3Bxs4Bc3VYuGVB19"
                    }]
                }]
            },
            "transaction": {
                "signatures": ["SIG1"],
                "message": {
                    "accountKeys": [
                        {"pubkey": "Creator1111111111111111111111111111111111", "signer": true, "writable": true, "source": "transaction"},
                        {"pubkey": "Mint", "signer": true, "writable": true, "source": "transaction"},
                        {"pubkey": "Program", "signer": false, "writable": false, "source": "transaction"}
                    ],
                    "instructions": [
                        {"programId": "ComputeBudget111111111111111111111111111111", "accounts": [], "data": "3DdGGhkhJbjm"},
                        {"program": "system", "programId": "11111111111111111111111111111111", "parsed": {"type": "transfer"}, "stackHeight": null}
                    ]
                }
            }
        }
    }"#;

    #[test]
    fn test_parse_json_parsed_transaction() {
        let envelope: RpcEnvelope<WireTransaction> = serde_json::from_str(SAMPLE).unwrap();
        let tx = envelope.result.unwrap().into_parsed("ignored");

        assert_eq!(tx.signature, "SIG1");
        assert_eq!(tx.slot, 345678901);
        assert_eq!(tx.block_time, Some(1735000000));
        assert_eq!(tx.fee_lamports, 105000);
        assert!(!tx.failed);
        assert_eq!(tx.fee_payer(), Some("Creator1111111111111111111111111111111111"));
        assert_eq!(tx.signers.len(), 2);
        assert_eq!(tx.post_token_balances.len(), 1);
        assert_eq!(tx.post_token_balances[0].ui_amount, Some(500.0));
        assert_eq!(tx.instructions.len(), 3);
        assert_eq!(tx.instructions[2].program_id, "metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s");
        assert_eq!(tx.instructions[1].data, None);
    }

    #[test]
    fn test_null_result_and_error_envelopes() {
        let missing: RpcEnvelope<WireTransaction> =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":1,"result":null}"#).unwrap();
        assert!(missing.result.is_none());
        assert!(missing.error.is_none());

        let failed: RpcEnvelope<WireTransaction> = serde_json::from_str(
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32602,"message":"Invalid param: not a Token mint"}}"#,
        )
        .unwrap();
        let error = failed.error.unwrap();
        assert_eq!(error.code, -32602);
        assert!(error.message.contains("not a Token mint"));
    }

    #[test]
    fn test_failed_transaction_flag() {
        let json = r#"{"slot":1,"blockTime":null,"meta":{"err":{"InstructionError":[0,"Custom"]},"fee":5000},
            "transaction":{"signatures":["S"],"message":{"accountKeys":[],"instructions":[]}}}"#;
        let wire: WireTransaction = serde_json::from_str(json).unwrap();
        let tx = wire.into_parsed("S");
        assert!(tx.failed);
        assert_eq!(tx.block_time, None);
        assert!(tx.post_token_balances.is_empty());
    }

    #[test]
    fn test_signature_history_entries() {
        let json = r#"{"jsonrpc":"2.0","id":1,"result":[
            {"signature":"NEW","slot":12,"blockTime":1735000060,"err":null,"memo":null,"confirmationStatus":"confirmed"},
            {"signature":"OLD","slot":10,"blockTime":null,"err":{"InstructionError":[0,"Custom"]},"memo":null}
        ]}"#;
        let envelope: RpcEnvelope<Vec<WireSignatureInfo>> = serde_json::from_str(json).unwrap();
        let entries: Vec<SignatureInfo> = envelope
            .result
            .unwrap()
            .into_iter()
            .map(SignatureInfo::from)
            .collect();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].signature, "NEW");
        assert_eq!(entries[0].block_time, Some(1735000060));
        assert!(!entries[0].failed);
        assert_eq!(entries[1].slot, 10);
        assert_eq!(entries[1].block_time, None);
        assert!(entries[1].failed);
    }
}
