//! Coin Adapter Module
//!
//! The wallet-facing contract every coin implements, and the Sui
//! implementation of it.

mod sui;

pub use sui::SuiAdapter;

use async_trait::async_trait;

use crate::config::CoinConfig;
use crate::error::WalletResult;
use crate::types::{FaucetOutcome, FeeLevel, GasPriceInfo, TransactionResult, TransactionStatus, TransferRequest, WalletKeys};

#[async_trait]
pub trait CoinAdapter: Send + Sync {
    fn config(&self) -> &CoinConfig;

    /// New phrase plus the keys of its first account
    async fn generate_wallet(&self) -> WalletResult<WalletKeys>;

    async fn import_from_mnemonic(&self, mnemonic: &str) -> WalletResult<WalletKeys>;

    /// The returned `private_key` is the caller's text, unchanged
    async fn import_from_private_key(&self, private_key: &str) -> WalletResult<WalletKeys>;

    /// Local format check; never touches the network
    fn is_valid_address(&self, address: &str) -> bool;

    /// Raw base-unit balance; failures read as `"0"`
    async fn get_balance(&self, address: &str) -> String;

    /// Sign with `private_key` (any importable form) and submit
    async fn send_transaction(&self, private_key: &str, request: &TransferRequest) -> WalletResult<TransactionResult>;

    async fn request_faucet(&self, address: &str) -> WalletResult<FaucetOutcome>;

    /// Current epoch; failures read as 0
    async fn get_epoch(&self) -> u64;

    async fn get_transaction_status(&self, digest: &str) -> WalletResult<TransactionStatus>;

    async fn get_gas_price(&self) -> WalletResult<GasPriceInfo>;

    /// Maximum fee for a tier, in display units
    async fn estimate_fee(&self, fee_level: FeeLevel) -> WalletResult<String>;
}
