//! Sui fullnode JSON-RPC client
//!
//! Implements [`SuiClientApi`] over HTTP. Transactions from either builder
//! are assembled into `TransactionData` locally, signed, and submitted with
//! `sui_executeTransactionBlock`. When configured to prefer it, the
//! convenience send goes through `unsafe_paySui`, where the node builds the
//! transaction bytes and the wallet only signs them.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::api::client::{
    Balance, ClientCapabilities, Coin, CoinPage, ExecuteOptions, ExecutionResponse, RequestType, SuiClientApi,
    SystemState,
};
use crate::config::ClientSettings;
use crate::error::{WalletError, WalletResult};
use crate::tx::builder::{ProgrammableTransaction, Transaction, TransactionBlock};
use crate::tx::data::{sign_transaction_bytes, ObjectRef, SignedTransaction, TransactionData, MAX_GAS_PAYMENT_OBJECTS};
use crate::types::FeeLevel;
use crate::utils::http::{build_client, extract_domain};
use crate::wallet::{to_base_units, SuiAddress, SuiKeypair, SUI_COIN_TYPE};
use crate::{log_debug, log_warn};

const MODULE: &str = "json_rpc";

/// Budget applied when a transaction does not set one
pub const DEFAULT_GAS_BUDGET: u64 = 1_000_000;

/// Largest page the fullnode serves for coin queries
const COIN_PAGE_LIMIT: usize = 50;

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<Value>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransactionBlockBytes {
    tx_bytes: String,
}

pub struct JsonRpcClient {
    http: reqwest::Client,
    endpoint: String,
    prefer_pay_sui: bool,
    next_id: AtomicU64,
}

impl JsonRpcClient {
    pub fn new(endpoint: &str, settings: &ClientSettings) -> WalletResult<Self> {
        Ok(Self {
            http: build_client(settings.request_timeout())?,
            endpoint: endpoint.to_string(),
            prefer_pay_sui: settings.prefer_pay_sui,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> WalletResult<T> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let payload = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        log_debug!(MODULE, "RPC request", method = method, host = extract_domain(&self.endpoint));

        let response = self.http.post(&self.endpoint).json(&payload).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(WalletError::network(format!("{} returned HTTP {}", method, status)));
        }

        let body: RpcResponse = response.json().await?;
        decode_response(method, body)
    }

    async fn execute(
        &self,
        signed: SignedTransaction,
        options: ExecuteOptions,
        request_type: RequestType,
    ) -> WalletResult<ExecutionResponse> {
        let result: Value = self
            .call(
                "sui_executeTransactionBlock",
                json!([signed.tx_bytes, [signed.signature], options, request_type.as_str()]),
            )
            .await?;
        Ok(ExecutionResponse::from_json(result))
    }

    /// The owner's first page of SUI coins, largest first
    async fn gas_payment(&self, owner: &SuiAddress) -> WalletResult<Vec<Coin>> {
        let mut coins = self
            .get_coins(owner, SUI_COIN_TYPE, Some(COIN_PAGE_LIMIT))
            .await?
            .data;
        coins.sort_by_key(|c| std::cmp::Reverse(c.balance.parse::<u64>().unwrap_or(0)));
        coins.truncate(MAX_GAS_PAYMENT_OBJECTS);
        Ok(coins)
    }

    async fn build_and_execute(
        &self,
        keypair: &SuiKeypair,
        programmable: &ProgrammableTransaction,
        budget: u64,
        options: ExecuteOptions,
        request_type: RequestType,
    ) -> WalletResult<ExecutionResponse> {
        let sender = keypair.address();
        let price = self.get_reference_gas_price().await?;
        let payment = self
            .gas_payment(&sender)
            .await?
            .iter()
            .map(coin_ref)
            .collect::<WalletResult<Vec<_>>>()?;

        let data = TransactionData::new_programmable(sender, payment, programmable.clone(), budget, price)?;
        log_debug!(MODULE, "Signing transaction", digest = data.digest(), gas_budget = budget, gas_price = price);
        self.execute(data.sign(keypair), options, request_type).await
    }
}

fn coin_ref(coin: &Coin) -> WalletResult<ObjectRef> {
    let version = coin
        .version
        .parse()
        .map_err(|_| WalletError::parse_error(format!("Invalid coin version: {}", coin.version)))?;
    ObjectRef::from_rpc(&coin.coin_object_id, version, &coin.digest)
}

/// BigInt fields arrive as strings or, from older nodes, as numbers
fn parse_u64_value(value: &Value) -> Option<u64> {
    match value {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.as_u64(),
        _ => None,
    }
}

#[async_trait]
impl SuiClientApi for JsonRpcClient {
    fn capabilities(&self) -> ClientCapabilities {
        ClientCapabilities {
            convenience_send: self.prefer_pay_sui,
            modern_builder: true,
            legacy_builder: true,
            typed_pure: true,
        }
    }

    async fn get_balance(&self, owner: &SuiAddress, coin_type: &str) -> WalletResult<Balance> {
        self.call("suix_getBalance", json!([owner.to_hex(), coin_type])).await
    }

    async fn get_coins(&self, owner: &SuiAddress, coin_type: &str, limit: Option<usize>) -> WalletResult<CoinPage> {
        self.call("suix_getCoins", json!([owner.to_hex(), coin_type, Value::Null, limit]))
            .await
    }

    async fn get_reference_gas_price(&self) -> WalletResult<u64> {
        let value: Value = self.call("suix_getReferenceGasPrice", json!([])).await?;
        parse_u64_value(&value)
            .ok_or_else(|| WalletError::parse_error(format!("Invalid reference gas price: {}", value)))
    }

    async fn get_latest_system_state(&self) -> WalletResult<SystemState> {
        self.call("suix_getLatestSuiSystemState", json!([])).await
    }

    async fn get_transaction_block(&self, digest: &str) -> WalletResult<ExecutionResponse> {
        let result: Value = self
            .call("sui_getTransactionBlock", json!([digest, { "showEffects": true }]))
            .await?;
        Ok(ExecutionResponse::from_json(result))
    }

    async fn send_sui(&self, keypair: &SuiKeypair, recipient: &SuiAddress, amount: &str) -> WalletResult<ExecutionResponse> {
        let mist = to_base_units(amount)?;
        let sender = keypair.address();
        let coins: Vec<String> = self
            .gas_payment(&sender)
            .await?
            .into_iter()
            .map(|c| c.coin_object_id)
            .collect();
        if coins.is_empty() {
            log_warn!(MODULE, "No SUI coins to spend", sender = sender);
            return Err(WalletError::network("No SUI coins available to pay for gas"));
        }

        let bytes: TransactionBlockBytes = self
            .call(
                "unsafe_paySui",
                json!([
                    sender.to_hex(),
                    coins,
                    [recipient.to_hex()],
                    [mist.to_string()],
                    FeeLevel::default().gas_budget().to_string(),
                ]),
            )
            .await?;

        let tx_bytes = STANDARD
            .decode(&bytes.tx_bytes)
            .map_err(|e| WalletError::parse_error(format!("Invalid txBytes from node: {}", e)))?;
        let signed = sign_transaction_bytes(keypair, &tx_bytes);
        self.execute(signed, ExecuteOptions::default(), RequestType::WaitForLocalExecution)
            .await
    }

    async fn sign_and_execute_transaction(
        &self,
        keypair: &SuiKeypair,
        transaction: &Transaction,
        options: ExecuteOptions,
        request_type: RequestType,
    ) -> WalletResult<ExecutionResponse> {
        let budget = transaction.gas_budget().unwrap_or(DEFAULT_GAS_BUDGET);
        self.build_and_execute(keypair, transaction.programmable(), budget, options, request_type)
            .await
    }

    async fn sign_and_execute_transaction_block(
        &self,
        keypair: &SuiKeypair,
        block: &TransactionBlock,
        options: ExecuteOptions,
        request_type: RequestType,
    ) -> WalletResult<ExecutionResponse> {
        self.build_and_execute(keypair, block.programmable(), DEFAULT_GAS_BUDGET, options, request_type)
            .await
    }
}

/// Node-reported errors are rejections of the call, kept as network failures
fn decode_response<T: DeserializeOwned>(method: &str, body: RpcResponse) -> WalletResult<T> {
    if let Some(error) = body.error {
        return Err(WalletError::network(format!("{} failed: {}", method, error.message))
            .with_details(format!("JSON-RPC code {}", error.code)));
    }

    let result = body
        .result
        .ok_or_else(|| WalletError::network(format!("{} returned no result", method)))?;
    serde_json::from_value(result)
        .map_err(|e| WalletError::parse_error(format!("Unexpected {} response: {}", method, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_capabilities_follow_settings() {
        let plain = JsonRpcClient::new("https://fullnode.testnet.sui.io:443", &ClientSettings::default()).unwrap();
        let caps = plain.capabilities();
        assert!(!caps.convenience_send);
        assert!(caps.modern_builder && caps.legacy_builder);

        let settings = ClientSettings {
            prefer_pay_sui: true,
            ..ClientSettings::default()
        };
        let pay_sui = JsonRpcClient::new("https://fullnode.testnet.sui.io:443", &settings).unwrap();
        assert!(pay_sui.capabilities().convenience_send);
    }

    #[test]
    fn test_parse_u64_value() {
        assert_eq!(parse_u64_value(&json!("750")), Some(750));
        assert_eq!(parse_u64_value(&json!(1000)), Some(1000));
        assert_eq!(parse_u64_value(&json!("x")), None);
        assert_eq!(parse_u64_value(&Value::Null), None);
    }

    #[test]
    fn test_coin_ref_conversion() {
        let coin = Coin {
            coin_object_id: "0x5".to_string(),
            version: "12".to_string(),
            digest: bs58::encode([1u8; 32]).into_string(),
            balance: "100".to_string(),
        };
        let object = coin_ref(&coin).unwrap();
        assert_eq!(object.version, 12);

        let bad = Coin {
            version: "v12".to_string(),
            ..coin
        };
        assert!(coin_ref(&bad).is_err());
    }

    #[test]
    fn test_rpc_error_shape() {
        let body: RpcResponse = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": { "code": -32602, "message": "Invalid params" }
        }))
        .unwrap();
        assert!(body.result.is_none());
        assert_eq!(body.error.unwrap().code, -32602);
    }

    #[tokio::test]
    async fn test_unreachable_node_is_network_failure() {
        let settings = ClientSettings {
            request_timeout_secs: Some(2),
            ..ClientSettings::default()
        };
        let client = JsonRpcClient::new("http://127.0.0.1:1", &settings).unwrap();
        let err = client.get_reference_gas_price().await.unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::NetworkFailure);
    }

    #[test]
    fn test_error_body_is_network_failure() {
        let body: RpcResponse = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": { "code": -32002, "message": "Transaction rejected" }
        }))
        .unwrap();
        let err = decode_response::<Value>("sui_executeTransactionBlock", body).unwrap_err();
        assert_eq!(err.code, ErrorCode::NetworkFailure);
        assert!(err.message.contains("Transaction rejected"));
        assert_eq!(err.details.as_deref(), Some("JSON-RPC code -32002"));

        let empty: RpcResponse = serde_json::from_value(json!({ "jsonrpc": "2.0", "id": 2 })).unwrap();
        let err = decode_response::<Value>("suix_getBalance", empty).unwrap_err();
        assert_eq!(err.code, ErrorCode::NetworkFailure);
    }

    /// Serve one canned JSON body over HTTP/1.1, then close
    async fn serve_once(body: Value) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut chunk = [0u8; 1024];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..n]);
                let text = String::from_utf8_lossy(&request);
                if let Some(end) = text.find("\r\n\r\n") {
                    let length = text[..end]
                        .lines()
                        .find_map(|l| {
                            let lower = l.to_ascii_lowercase();
                            lower.strip_prefix("content-length:").map(|v| v.trim().parse::<usize>().unwrap_or(0))
                        })
                        .unwrap_or(0);
                    if request.len() >= end + 4 + length {
                        break;
                    }
                }
            }

            let payload = body.to_string();
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                payload.len(),
                payload
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_node_rejection_reports_network_failure() {
        let endpoint = serve_once(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": { "code": -32002, "message": "Transaction rejected" }
        }))
        .await;
        let client = JsonRpcClient::new(&endpoint, &ClientSettings::default()).unwrap();

        let err = client.get_reference_gas_price().await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NetworkFailure);
        assert_eq!(err.details.as_deref(), Some("JSON-RPC code -32002"));
    }

    #[tokio::test]
    async fn test_reference_gas_price_from_node() {
        let endpoint = serve_once(json!({ "jsonrpc": "2.0", "id": 1, "result": "750" })).await;
        let client = JsonRpcClient::new(&endpoint, &ClientSettings::default()).unwrap();
        assert_eq!(client.get_reference_gas_price().await.unwrap(), 750);
    }
}
