//! Sui RPC client seam
//!
//! [`SuiClientApi`] is everything the adapter and dispatcher need from a
//! fullnode. Clients differ in which transaction-submission styles they
//! offer; they say so through [`ClientCapabilities`] and only the declared
//! submission methods need real implementations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{WalletError, WalletResult};
use crate::tx::builder::{Transaction, TransactionBlock};
use crate::wallet::{SuiAddress, SuiKeypair};

/// Transaction-submission styles a client offers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClientCapabilities {
    /// One-call send of a decimal SUI amount
    pub convenience_send: bool,
    /// `sign_and_execute_transaction` over a [`Transaction`]
    pub modern_builder: bool,
    /// `sign_and_execute_transaction_block` over a [`TransactionBlock`]
    pub legacy_builder: bool,
    /// Legacy blocks accept typed pure inputs
    pub typed_pure: bool,
}

/// Response detail requested from execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteOptions {
    pub show_effects: bool,
    pub show_object_changes: bool,
}

impl Default for ExecuteOptions {
    fn default() -> Self {
        Self {
            show_effects: true,
            show_object_changes: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RequestType {
    #[default]
    WaitForLocalExecution,
    WaitForEffectsCert,
}

impl RequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::WaitForLocalExecution => "WaitForLocalExecution",
            RequestType::WaitForEffectsCert => "WaitForEffectsCert",
        }
    }
}

/// Execution result; which identifier fields are present depends on the client
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionResponse {
    pub digest: Option<String>,
    pub effects_digest: Option<String>,
    pub hash: Option<String>,
    pub raw: Value,
}

impl ExecutionResponse {
    pub fn from_json(raw: Value) -> Self {
        let text = |v: Option<&Value>| v.and_then(Value::as_str).map(str::to_string);
        Self {
            digest: text(raw.get("digest")),
            effects_digest: text(raw.get("effectsDigest"))
                .or_else(|| text(raw.pointer("/effects/transactionDigest"))),
            hash: text(raw.get("hash")),
            raw,
        }
    }

    /// Execution status reported in the effects, if any
    pub fn status(&self) -> Option<&str> {
        self.raw.pointer("/effects/status/status").and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    pub coin_type: String,
    #[serde(default)]
    pub coin_object_count: u64,
    /// MIST, as a decimal string
    pub total_balance: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coin {
    pub coin_object_id: String,
    pub version: String,
    pub digest: String,
    pub balance: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinPage {
    pub data: Vec<Coin>,
    #[serde(default)]
    pub has_next_page: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// Subset of `SuiSystemStateSummary` the wallet reads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemState {
    /// Decimal string on the wire
    pub epoch: String,
    #[serde(default)]
    pub reference_gas_price: Option<String>,
}

impl SystemState {
    pub fn epoch_number(&self) -> WalletResult<u64> {
        self.epoch
            .parse()
            .map_err(|_| WalletError::parse_error(format!("Invalid epoch: {}", self.epoch)))
    }
}

fn unsupported(method: &str) -> WalletError {
    WalletError::no_compatible_transaction_api(format!("Client does not support {}", method))
}

#[async_trait]
pub trait SuiClientApi: Send + Sync {
    fn capabilities(&self) -> ClientCapabilities;

    async fn get_balance(&self, owner: &SuiAddress, coin_type: &str) -> WalletResult<Balance>;

    async fn get_coins(&self, owner: &SuiAddress, coin_type: &str, limit: Option<usize>) -> WalletResult<CoinPage>;

    /// MIST per gas unit
    async fn get_reference_gas_price(&self) -> WalletResult<u64>;

    async fn get_latest_system_state(&self) -> WalletResult<SystemState>;

    async fn get_transaction_block(&self, digest: &str) -> WalletResult<ExecutionResponse>;

    /// Send `amount` (decimal SUI) from the keypair's address
    async fn send_sui(
        &self,
        _keypair: &SuiKeypair,
        _recipient: &SuiAddress,
        _amount: &str,
    ) -> WalletResult<ExecutionResponse> {
        Err(unsupported("convenience send"))
    }

    async fn sign_and_execute_transaction(
        &self,
        _keypair: &SuiKeypair,
        _transaction: &Transaction,
        _options: ExecuteOptions,
        _request_type: RequestType,
    ) -> WalletResult<ExecutionResponse> {
        Err(unsupported("signAndExecuteTransaction"))
    }

    async fn sign_and_execute_transaction_block(
        &self,
        _keypair: &SuiKeypair,
        _block: &TransactionBlock,
        _options: ExecuteOptions,
        _request_type: RequestType,
    ) -> WalletResult<ExecutionResponse> {
        Err(unsupported("signAndExecuteTransactionBlock"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_execution_response_fields() {
        let resp = ExecutionResponse::from_json(json!({
            "digest": "D1",
            "effects": { "transactionDigest": "E1", "status": { "status": "success" } }
        }));
        assert_eq!(resp.digest.as_deref(), Some("D1"));
        assert_eq!(resp.effects_digest.as_deref(), Some("E1"));
        assert_eq!(resp.hash, None);
        assert_eq!(resp.status(), Some("success"));
    }

    #[test]
    fn test_execution_response_missing_fields() {
        let resp = ExecutionResponse::from_json(json!({ "hash": "H" }));
        assert_eq!(resp.digest, None);
        assert_eq!(resp.effects_digest, None);
        assert_eq!(resp.hash.as_deref(), Some("H"));
        assert_eq!(resp.status(), None);
    }

    #[test]
    fn test_wire_shapes() {
        let balance: Balance = serde_json::from_value(json!({
            "coinType": "0x2::sui::SUI",
            "coinObjectCount": 2,
            "totalBalance": "1500000000",
            "lockedBalance": {}
        }))
        .unwrap();
        assert_eq!(balance.total_balance, "1500000000");

        let state: SystemState = serde_json::from_value(json!({ "epoch": "412", "referenceGasPrice": "750" })).unwrap();
        assert_eq!(state.epoch_number().unwrap(), 412);
    }

    #[test]
    fn test_default_options_and_request_type() {
        let options = ExecuteOptions::default();
        assert!(options.show_effects && options.show_object_changes);
        assert_eq!(RequestType::default().as_str(), "WaitForLocalExecution");
    }
}
