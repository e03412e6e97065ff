//! Application context
//!
//! One value per session holding the configuration, the active adapter and
//! the wallet currently loaded. Callers pass it to their handlers; there is
//! no process-wide state.

use chrono::Utc;
use std::sync::Arc;

use crate::adapter::{CoinAdapter, SuiAdapter};
use crate::config::CoinConfig;
use crate::error::{WalletError, WalletResult};
use crate::types::{TransactionResult, TransferRequest, WalletKeys, WalletRecord};
use crate::utils::network_config::Network;
use crate::log_info;

const MODULE: &str = "app";

pub struct AppContext {
    adapter: Arc<dyn CoinAdapter>,
    current_wallet: Option<WalletKeys>,
}

impl AppContext {
    pub fn new(config: CoinConfig) -> Self {
        Self::with_adapter(Arc::new(SuiAdapter::new(config)))
    }

    pub fn with_adapter(adapter: Arc<dyn CoinAdapter>) -> Self {
        Self {
            adapter,
            current_wallet: None,
        }
    }

    pub fn config(&self) -> &CoinConfig {
        self.adapter.config()
    }

    pub fn adapter(&self) -> &dyn CoinAdapter {
        self.adapter.as_ref()
    }

    pub fn current_wallet(&self) -> Option<&WalletKeys> {
        self.current_wallet.as_ref()
    }

    pub fn set_wallet(&mut self, wallet: WalletKeys) {
        log_info!(MODULE, "Wallet loaded", address = wallet.address);
        self.current_wallet = Some(wallet);
    }

    pub fn clear_wallet(&mut self) {
        self.current_wallet = None;
    }

    /// Record to persist for the current wallet, with its storage key
    pub fn wallet_record(&self) -> Option<(String, WalletRecord)> {
        self.current_wallet.as_ref().map(|wallet| {
            (
                WalletRecord::storage_key(&self.config().symbol),
                WalletRecord::new(wallet, Utc::now()),
            )
        })
    }

    /// Rebuild the adapter for another network; the wallet stays loaded
    pub fn switch_network(&mut self, network: Network) {
        let mut config = self.config().clone();
        config.switch_network(network);
        log_info!(MODULE, "Network switched", network = network);
        self.adapter = Arc::new(SuiAdapter::new(config));
    }

    pub async fn send(&self, request: &TransferRequest) -> WalletResult<TransactionResult> {
        let wallet = self
            .current_wallet
            .as_ref()
            .ok_or_else(|| WalletError::invalid_private_key("No wallet loaded"))?;
        self.adapter.send_transaction(&wallet.private_key, request).await
    }

    pub async fn balance(&self) -> Option<String> {
        match &self.current_wallet {
            Some(wallet) => Some(self.adapter.get_balance(&wallet.address).await),
            None => None,
        }
    }
}
