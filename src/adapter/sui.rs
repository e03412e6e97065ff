//! Sui adapter
//!
//! Owns the configuration, the key normalizer and a lazily built RPC
//! session. The session (client plus negotiated submission style) is
//! created on first network use and reused afterwards; keypairs are not
//! cached and are rebuilt from the supplied key text for every send.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::adapter::CoinAdapter;
use crate::api::client::SuiClientApi;
use crate::api::faucet::FaucetClient;
use crate::api::json_rpc::JsonRpcClient;
use crate::config::CoinConfig;
use crate::error::{WalletError, WalletResult};
use crate::tx::dispatcher::{Dispatcher, TransactionApi};
use crate::types::{
    FaucetOutcome, FeeLevel, GasPriceInfo, TransactionResult, TransactionState, TransactionStatus, TransferRequest,
    WalletKeys,
};
use crate::utils::http::extract_domain;
use crate::wallet::{
    self, format_sui, KeyNormalizer, SuiAddress, SuiKeypair, SUI_COIN_TYPE,
};
use crate::{log_debug, log_error, log_info, log_warn};

const MODULE: &str = "sui_adapter";

struct ClientSession {
    client: Arc<dyn SuiClientApi>,
    dispatcher: Dispatcher,
}

pub struct SuiAdapter {
    config: CoinConfig,
    normalizer: KeyNormalizer,
    injected: Option<Arc<dyn SuiClientApi>>,
    session: OnceCell<ClientSession>,
}

impl SuiAdapter {
    /// Adapter talking JSON-RPC to the configured endpoint
    pub fn new(config: CoinConfig) -> Self {
        Self {
            normalizer: KeyNormalizer::new(config.key_derivation),
            config,
            injected: None,
            session: OnceCell::new(),
        }
    }

    /// Adapter over a caller-supplied client
    pub fn with_client(config: CoinConfig, client: Arc<dyn SuiClientApi>) -> Self {
        Self {
            injected: Some(client),
            ..Self::new(config)
        }
    }

    pub fn normalizer(&self) -> &KeyNormalizer {
        &self.normalizer
    }

    /// Submission style, once a session exists
    pub fn transaction_api(&self) -> Option<TransactionApi> {
        self.session.get().map(|s| s.dispatcher.api())
    }

    async fn session(&self) -> WalletResult<&ClientSession> {
        self.session
            .get_or_try_init(|| async {
                let client: Arc<dyn SuiClientApi> = match &self.injected {
                    Some(client) => Arc::clone(client),
                    None => Arc::new(JsonRpcClient::new(&self.config.network.rpc_endpoint, &self.config.client)?),
                };
                log_info!(
                    MODULE,
                    "Sui client created",
                    host = extract_domain(&self.config.network.rpc_endpoint),
                    network = self.config.network.network_name,
                );

                // Connection check; the session is usable even if it fails
                match client.get_latest_system_state().await {
                    Ok(state) => log_debug!(MODULE, "Connection test succeeded", epoch = state.epoch),
                    Err(e) => log_warn!(MODULE, "Connection test failed", error = e),
                }

                let dispatcher = Dispatcher::for_client(client.as_ref());
                log_debug!(MODULE, "Transaction API negotiated", api = dispatcher.api().name());
                Ok::<_, WalletError>(ClientSession { client, dispatcher })
            })
            .await
    }

    async fn fetch_balance(&self, address: &str) -> WalletResult<String> {
        let owner = SuiAddress::parse(address)?;
        let session = self.session().await?;
        let balance = session.client.get_balance(&owner, SUI_COIN_TYPE).await?;

        match session.client.get_coins(&owner, SUI_COIN_TYPE, None).await {
            Ok(page) => log_debug!(MODULE, "Coins listed", owner = owner, count = page.data.len()),
            Err(e) => log_debug!(MODULE, "Coin listing failed", owner = owner, error = e),
        }

        Ok(balance.total_balance)
    }
}

/// 32-byte private key as comma-separated decimals
fn export_private_key(keypair: &SuiKeypair) -> WalletResult<String> {
    Ok(keypair.export_csv()?.to_string())
}

#[async_trait]
impl CoinAdapter for SuiAdapter {
    fn config(&self) -> &CoinConfig {
        &self.config
    }

    async fn generate_wallet(&self) -> WalletResult<WalletKeys> {
        let (phrase, keypair) = wallet::create_new_wallet()?;
        log_info!(MODULE, "Wallet generated", address = keypair.address());

        Ok(WalletKeys {
            address: keypair.address().to_hex(),
            private_key: export_private_key(&keypair)?,
            mnemonic: Some(phrase.to_string()),
        })
    }

    async fn import_from_mnemonic(&self, mnemonic: &str) -> WalletResult<WalletKeys> {
        if !wallet::validate_mnemonic(mnemonic) {
            return Err(WalletError::invalid_mnemonic("Invalid mnemonic"));
        }
        let keypair = wallet::derive_keypair(mnemonic, 0)?;
        log_info!(MODULE, "Wallet restored from mnemonic", address = keypair.address());

        Ok(WalletKeys {
            address: keypair.address().to_hex(),
            private_key: export_private_key(&keypair)?,
            mnemonic: Some(mnemonic.trim().to_string()),
        })
    }

    async fn import_from_private_key(&self, private_key: &str) -> WalletResult<WalletKeys> {
        let normalized = self.normalizer.normalize(private_key)?;
        log_info!(
            MODULE,
            "Wallet imported from private key",
            address = normalized.keypair.address(),
            path = normalized.path,
        );

        Ok(WalletKeys {
            address: normalized.keypair.address().to_hex(),
            private_key: private_key.to_string(),
            mnemonic: None,
        })
    }

    fn is_valid_address(&self, address: &str) -> bool {
        wallet::is_valid_address(address)
    }

    async fn get_balance(&self, address: &str) -> String {
        match self.fetch_balance(address).await {
            Ok(balance) => balance,
            Err(e) => {
                log_warn!(MODULE, "Balance query failed, reporting 0", address = address, error = e);
                "0".to_string()
            }
        }
    }

    async fn send_transaction(&self, private_key: &str, request: &TransferRequest) -> WalletResult<TransactionResult> {
        // Recipient and amount are rejected before a client is even built
        if !wallet::is_valid_address(&request.recipient) {
            return Err(WalletError::invalid_recipient(format!(
                "Invalid recipient address: {}",
                request.recipient
            )));
        }
        wallet::to_base_units(&request.amount)?;

        let normalized = self.normalizer.normalize(private_key)?;
        let session = self.session().await?;
        let result = session
            .dispatcher
            .send(session.client.as_ref(), &normalized.keypair, request)
            .await
            .map_err(|e| {
                log_error!(MODULE, "Transaction failed", recipient = request.recipient, error = e);
                e
            })?;

        log_info!(MODULE, "Transaction sent", digest = result.hash, fee_level = request.fee_level);
        Ok(result)
    }

    async fn request_faucet(&self, address: &str) -> WalletResult<FaucetOutcome> {
        let recipient = SuiAddress::parse(address)?;
        let faucet = FaucetClient::new(self.config.network()?)?;
        Ok(faucet.request(&recipient).await)
    }

    async fn get_epoch(&self) -> u64 {
        let epoch = async {
            let session = self.session().await?;
            session.client.get_latest_system_state().await?.epoch_number()
        };
        match epoch.await {
            Ok(epoch) => epoch,
            Err(e) => {
                log_warn!(MODULE, "Epoch query failed, reporting 0", error = e);
                0
            }
        }
    }

    async fn get_transaction_status(&self, digest: &str) -> WalletResult<TransactionStatus> {
        let session = self.session().await?;
        let response = session.client.get_transaction_block(digest).await?;

        let error = response
            .raw
            .pointer("/effects/status/error")
            .and_then(|v| v.as_str())
            .map(str::to_string);
        let status = match response.status() {
            Some("success") => TransactionState::Confirmed,
            Some("failure") => TransactionState::Failed,
            _ => TransactionState::Pending,
        };
        let confirmations = if status == TransactionState::Pending { 0 } else { 1 };

        Ok(TransactionStatus {
            status,
            confirmations,
            error,
        })
    }

    async fn get_gas_price(&self) -> WalletResult<GasPriceInfo> {
        let session = self.session().await?;
        let reference_gas_price = match session.client.get_reference_gas_price().await {
            Ok(price) => Some(price),
            Err(e) => {
                log_warn!(MODULE, "Reference gas price unavailable", error = e);
                None
            }
        };

        Ok(GasPriceInfo {
            low: format_sui(FeeLevel::Low.gas_budget()),
            medium: format_sui(FeeLevel::Medium.gas_budget()),
            high: format_sui(FeeLevel::High.gas_budget()),
            reference_gas_price,
        })
    }

    async fn estimate_fee(&self, fee_level: FeeLevel) -> WalletResult<String> {
        Ok(format_sui(fee_level.gas_budget()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::{Balance, ClientCapabilities, CoinPage, ExecutionResponse, SystemState};
    use crate::error::ErrorCode;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Node that answers reads and fails on demand
    #[derive(Default)]
    struct StubClient {
        failing: bool,
        system_state_calls: AtomicUsize,
    }

    #[async_trait]
    impl SuiClientApi for StubClient {
        fn capabilities(&self) -> ClientCapabilities {
            ClientCapabilities {
                modern_builder: true,
                ..ClientCapabilities::default()
            }
        }

        async fn get_balance(&self, _owner: &SuiAddress, coin_type: &str) -> WalletResult<Balance> {
            if self.failing {
                return Err(WalletError::network("connection refused"));
            }
            Ok(Balance {
                coin_type: coin_type.to_string(),
                coin_object_count: 1,
                total_balance: "2500000000".to_string(),
            })
        }

        async fn get_coins(&self, _owner: &SuiAddress, _coin_type: &str, _limit: Option<usize>) -> WalletResult<CoinPage> {
            Ok(CoinPage::default())
        }

        async fn get_reference_gas_price(&self) -> WalletResult<u64> {
            Ok(750)
        }

        async fn get_latest_system_state(&self) -> WalletResult<SystemState> {
            self.system_state_calls.fetch_add(1, Ordering::SeqCst);
            if self.failing {
                return Err(WalletError::network("connection refused"));
            }
            Ok(SystemState {
                epoch: "42".to_string(),
                reference_gas_price: None,
            })
        }

        async fn get_transaction_block(&self, _digest: &str) -> WalletResult<ExecutionResponse> {
            Ok(ExecutionResponse::from_json(json!({
                "digest": "D",
                "effects": { "status": { "status": "failure", "error": "InsufficientGas" } }
            })))
        }
    }

    fn adapter(client: Arc<StubClient>) -> SuiAdapter {
        SuiAdapter::with_client(CoinConfig::default(), client)
    }

    fn some_address() -> String {
        format!("0x{}", "cd".repeat(32))
    }

    #[tokio::test]
    async fn test_balance_and_single_connection_check() {
        let client = Arc::new(StubClient::default());
        let adapter = adapter(client.clone());

        assert_eq!(adapter.get_balance(&some_address()).await, "2500000000");
        assert_eq!(adapter.get_epoch().await, 42);
        assert_eq!(client.system_state_calls.load(Ordering::SeqCst), 2);
        assert_eq!(adapter.transaction_api(), Some(TransactionApi::ModernBuilder));
    }

    #[tokio::test]
    async fn test_failures_degrade() {
        let client = Arc::new(StubClient {
            failing: true,
            ..StubClient::default()
        });
        let adapter = adapter(client);

        assert_eq!(adapter.get_balance(&some_address()).await, "0");
        assert_eq!(adapter.get_balance("not-an-address").await, "0");
        assert_eq!(adapter.get_epoch().await, 0);
    }

    #[tokio::test]
    async fn test_transaction_status_failure() {
        let adapter = adapter(Arc::new(StubClient::default()));
        let status = adapter.get_transaction_status("D").await.unwrap();
        assert_eq!(status.status, TransactionState::Failed);
        assert_eq!(status.confirmations, 1);
        assert_eq!(status.error.as_deref(), Some("InsufficientGas"));
    }

    #[tokio::test]
    async fn test_fee_helpers() {
        let adapter = adapter(Arc::new(StubClient::default()));
        assert_eq!(adapter.estimate_fee(FeeLevel::High).await.unwrap(), "0.002");

        let gas = adapter.get_gas_price().await.unwrap();
        assert_eq!(gas.low, "0.0004");
        assert_eq!(gas.medium, "0.001");
        assert_eq!(gas.reference_gas_price, Some(750));
    }

    #[tokio::test]
    async fn test_generate_and_restore_agree() {
        let adapter = adapter(Arc::new(StubClient::default()));
        let generated = adapter.generate_wallet().await.unwrap();
        let phrase = generated.mnemonic.clone().unwrap();

        let restored = adapter.import_from_mnemonic(&phrase).await.unwrap();
        assert_eq!(restored.address, generated.address);
        assert_eq!(restored.private_key, generated.private_key);
        assert_eq!(generated.private_key.split(',').count(), 32);

        let imported = adapter.import_from_private_key(&generated.private_key).await.unwrap();
        assert_eq!(imported.address, generated.address);
    }

    #[tokio::test]
    async fn test_import_errors_keep_their_kind() {
        let adapter = adapter(Arc::new(StubClient::default()));
        let err = adapter.import_from_mnemonic("abandon abandon").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidMnemonic);

        let seventeen = (1..=17).map(|b: u8| b.to_string()).collect::<Vec<_>>().join(",");
        let err = adapter.import_from_private_key(&seventeen).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::UnsupportedKeyLength);
    }

    #[tokio::test]
    async fn test_faucet_on_mainnet() {
        let stub: Arc<dyn SuiClientApi> = Arc::new(StubClient::default());
        let adapter = SuiAdapter::with_client(CoinConfig::for_network(crate::utils::network_config::Network::Mainnet), stub);
        let outcome = adapter.request_faucet(&some_address()).await.unwrap();
        assert!(!outcome.success);
    }
}
