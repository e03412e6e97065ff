//! Coin configuration
//!
//! Static description of the coin and its network, loaded from defaults or
//! a JSON file and then overridden from the environment:
//! - `SUI_WALLET_NETWORK`: mainnet | testnet | devnet | localnet
//! - `SUI_WALLET_RPC_URL`: custom fullnode endpoint

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{WalletError, WalletResult};
use crate::utils::network_config::{validate_endpoint, Network};
use crate::wallet::{to_base_units, DerivationSupport, SUI_DECIMALS};

pub const ENV_NETWORK: &str = "SUI_WALLET_NETWORK";
pub const ENV_RPC_URL: &str = "SUI_WALLET_RPC_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinConfig {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub network: NetworkSettings,
    #[serde(default)]
    pub address: AddressSettings,
    #[serde(default)]
    pub transaction: TransactionSettings,
    #[serde(default)]
    pub options: FeatureOptions,
    #[serde(default)]
    pub key_derivation: DerivationSupport,
    #[serde(default)]
    pub client: ClientSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSettings {
    pub rpc_endpoint: String,
    pub network_name: String,
    pub chain_id: String,
}

impl NetworkSettings {
    pub fn for_network(network: Network) -> Self {
        Self {
            rpc_endpoint: network.rpc_endpoint().to_string(),
            network_name: network.name().to_string(),
            chain_id: network.chain_id().to_string(),
        }
    }
}

/// Display hints for addresses; validation itself is `wallet::is_valid_address`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressSettings {
    pub pattern: String,
    pub display_format: String,
}

impl Default for AddressSettings {
    fn default() -> Self {
        Self {
            pattern: "^0x[a-fA-F0-9]{64}$".to_string(),
            display_format: "0x...".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSettings {
    /// Decimal SUI
    pub default_fee: String,
    /// Decimal SUI
    pub min_amount: String,
    pub confirmation_time_ms: u64,
}

impl Default for TransactionSettings {
    fn default() -> Self {
        Self {
            default_fee: "0.0001".to_string(),
            min_amount: "0.000001".to_string(),
            confirmation_time_ms: 15_000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureOptions {
    pub supports_mnemonic: bool,
    pub supports_tokens: bool,
    #[serde(rename = "supportsQRCode")]
    pub supports_qr_code: bool,
}

impl Default for FeatureOptions {
    fn default() -> Self {
        Self {
            supports_mnemonic: true,
            supports_tokens: true,
            supports_qr_code: true,
        }
    }
}

/// RPC client behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSettings {
    /// `None` leaves requests unbounded
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    /// Send through the node's `unsafe_paySui` convenience call
    #[serde(default)]
    pub prefer_pay_sui: bool,
}

impl ClientSettings {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

impl Default for CoinConfig {
    fn default() -> Self {
        Self::for_network(Network::Testnet)
    }
}

impl CoinConfig {
    pub fn for_network(network: Network) -> Self {
        Self {
            name: "Sui".to_string(),
            symbol: "SUI".to_string(),
            decimals: SUI_DECIMALS,
            network: NetworkSettings::for_network(network),
            address: AddressSettings::default(),
            transaction: TransactionSettings::default(),
            options: FeatureOptions::default(),
            key_derivation: DerivationSupport::default(),
            client: ClientSettings::default(),
        }
    }

    /// Load from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> WalletResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            WalletError::config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        serde_json::from_str(&content)
            .map_err(|e| WalletError::config(format!("Failed to parse config file as JSON: {}", e)))
    }

    /// Defaults or file, then environment overrides, then validation
    pub fn load(path: Option<&Path>) -> WalletResult<Self> {
        Self::load_with(path, None)
    }

    /// Like [`CoinConfig::load`], with a network chosen by the caller taking
    /// the place of `SUI_WALLET_NETWORK`; `SUI_WALLET_RPC_URL` still wins
    pub fn load_with(path: Option<&Path>, network: Option<Network>) -> WalletResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let env_network = std::env::var(ENV_NETWORK).ok();
        let env_rpc_url = std::env::var(ENV_RPC_URL).ok();
        config.apply_layers(network, env_network.as_deref(), env_rpc_url.as_deref())?;
        config.validate()?;
        Ok(config)
    }

    fn apply_layers(
        &mut self,
        network: Option<Network>,
        env_network: Option<&str>,
        rpc_url: Option<&str>,
    ) -> WalletResult<()> {
        match network {
            Some(network) => self.apply_overrides(Some(network.name()), rpc_url),
            None => self.apply_overrides(env_network, rpc_url),
        }
    }

    /// A network override resets the endpoint; an explicit RPC URL wins over both
    pub fn apply_overrides(&mut self, network: Option<&str>, rpc_url: Option<&str>) -> WalletResult<()> {
        if let Some(network) = network.filter(|n| !n.trim().is_empty()) {
            self.switch_network(network.parse()?);
        }
        if let Some(url) = rpc_url.filter(|u| !u.trim().is_empty()) {
            self.network.rpc_endpoint = url.trim().to_string();
        }
        Ok(())
    }

    pub fn switch_network(&mut self, network: Network) {
        self.network = NetworkSettings::for_network(network);
    }

    pub fn network(&self) -> WalletResult<Network> {
        self.network.network_name.parse()
    }

    pub fn is_mainnet(&self) -> bool {
        self.network.network_name.eq_ignore_ascii_case("mainnet")
    }

    pub fn min_amount_mist(&self) -> WalletResult<u64> {
        to_base_units(&self.transaction.min_amount)
    }

    pub fn validate(&self) -> WalletResult<()> {
        if self.name.trim().is_empty() {
            return Err(WalletError::config("Coin name must not be empty"));
        }
        if self.symbol.trim().is_empty() {
            return Err(WalletError::config("Coin symbol must not be empty"));
        }
        if self.decimals != SUI_DECIMALS {
            return Err(WalletError::config(format!(
                "Unsupported decimals {}: SUI amounts use {} decimal places",
                self.decimals, SUI_DECIMALS
            )));
        }

        self.network()?;
        validate_endpoint(&self.network.rpc_endpoint).into_result()?;

        to_base_units(&self.transaction.default_fee)
            .map_err(|e| WalletError::config(format!("Invalid defaultFee: {}", e.message)))?;
        self.min_amount_mist()
            .map_err(|e| WalletError::config(format!("Invalid minAmount: {}", e.message)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_default_is_testnet() {
        let config = CoinConfig::default();
        assert_eq!(config.symbol, "SUI");
        assert_eq!(config.network.rpc_endpoint, "https://fullnode.testnet.sui.io:443");
        assert_eq!(config.network.chain_id, "0x2");
        assert!(config.validate().is_ok());
        assert!(config.client.request_timeout().is_none());
    }

    #[test]
    fn test_json_shape_uses_camel_case() {
        let json = serde_json::to_value(CoinConfig::default()).unwrap();
        assert_eq!(json["network"]["networkName"], "testnet");
        assert_eq!(json["transaction"]["defaultFee"], "0.0001");
        assert_eq!(json["options"]["supportsQRCode"], true);
    }

    #[test]
    fn test_minimal_file_fills_defaults() {
        let json = r#"{
            "name": "Sui",
            "symbol": "SUI",
            "decimals": 9,
            "network": {
                "rpcEndpoint": "https://fullnode.devnet.sui.io:443",
                "networkName": "devnet",
                "chainId": "0x3"
            }
        }"#;
        let config: CoinConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.network().unwrap(), Network::Devnet);
        assert_eq!(config.transaction, TransactionSettings::default());
        assert!(config.key_derivation.seed_expansion);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let mut config = CoinConfig::default();
        config.apply_overrides(Some("mainnet"), None).unwrap();
        assert!(config.is_mainnet());
        assert_eq!(config.network.rpc_endpoint, "https://fullnode.mainnet.sui.io:443");

        config
            .apply_overrides(Some("devnet"), Some("http://localhost:9000"))
            .unwrap();
        assert_eq!(config.network.network_name, "devnet");
        assert_eq!(config.network.rpc_endpoint, "http://localhost:9000");

        let err = config.apply_overrides(Some("moonnet"), None).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigError);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = CoinConfig::default();
        config.network.rpc_endpoint = "http://fullnode.example.com".to_string();
        assert!(config.validate().is_err());

        let mut config = CoinConfig::default();
        config.transaction.min_amount = "tiny".to_string();
        assert_eq!(config.validate().unwrap_err().code, ErrorCode::ConfigError);

        let mut config = CoinConfig::default();
        config.symbol.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_min_amount_mist() {
        assert_eq!(CoinConfig::default().min_amount_mist().unwrap(), 1_000);
    }

    #[test]
    fn test_caller_network_keeps_rpc_override() {
        let mut config = CoinConfig::default();
        config
            .apply_layers(Some(Network::Mainnet), Some("devnet"), Some("https://rpc.example.org"))
            .unwrap();
        assert!(config.is_mainnet());
        assert_eq!(config.network.rpc_endpoint, "https://rpc.example.org");

        let mut config = CoinConfig::default();
        config.apply_layers(Some(Network::Devnet), Some("mainnet"), None).unwrap();
        assert_eq!(config.network().unwrap(), Network::Devnet);
        assert_eq!(config.network.rpc_endpoint, Network::Devnet.rpc_endpoint());

        let mut config = CoinConfig::default();
        config.apply_layers(None, Some("mainnet"), None).unwrap();
        assert!(config.is_mainnet());
    }
}
