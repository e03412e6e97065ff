//! Network Configuration
//!
//! Sui network presets (RPC, faucet, explorer) and RPC endpoint validation:
//! - URL format validation
//! - TLS requirement for remote endpoints
//! - Credential / API-key leak warnings

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::error::{WalletError, WalletResult};

/// Sui networks the wallet knows how to reach
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Testnet,
    Devnet,
    Localnet,
}

impl Network {
    pub fn name(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Devnet => "devnet",
            Network::Localnet => "localnet",
        }
    }

    /// Default fullnode JSON-RPC endpoint
    pub fn rpc_endpoint(&self) -> &'static str {
        match self {
            Network::Mainnet => "https://fullnode.mainnet.sui.io:443",
            Network::Testnet => "https://fullnode.testnet.sui.io:443",
            Network::Devnet => "https://fullnode.devnet.sui.io:443",
            Network::Localnet => "http://127.0.0.1:9000",
        }
    }

    /// Chain identifier shown by the wallet UI
    pub fn chain_id(&self) -> &'static str {
        match self {
            Network::Mainnet => "0x1",
            Network::Testnet => "0x2",
            Network::Devnet => "0x3",
            Network::Localnet => "0x4",
        }
    }

    /// Faucet gas endpoint; mainnet has none
    pub fn faucet_endpoint(&self) -> Option<&'static str> {
        match self {
            Network::Mainnet => None,
            Network::Testnet => Some("https://faucet.testnet.sui.io/v2/gas"),
            Network::Devnet => Some("https://faucet.devnet.sui.io/v2/gas"),
            Network::Localnet => Some("http://127.0.0.1:9123/gas"),
        }
    }

    /// Page a user can visit when the faucet API is unavailable
    pub fn manual_faucet_url(&self, address: &str) -> String {
        match self {
            Network::Mainnet => "https://suiexplorer.com/".to_string(),
            _ => format!("https://suiexplorer.com/faucet?address={}", address),
        }
    }

    pub fn explorer_tx_url(&self, digest: &str) -> String {
        format!("https://suiexplorer.com/txblock/{}?network={}", digest, self.name())
    }

    pub fn explorer_address_url(&self, address: &str) -> String {
        format!("https://suiexplorer.com/address/{}?network={}", address, self.name())
    }

    /// The network a mainnet/testnet toggle switches to
    pub fn toggled(&self) -> Network {
        match self {
            Network::Mainnet => Network::Testnet,
            _ => Network::Mainnet,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Network {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "testnet" => Ok(Network::Testnet),
            "devnet" => Ok(Network::Devnet),
            "localnet" | "local" => Ok(Network::Localnet),
            other => Err(WalletError::config(format!("Unknown network: {}", other))),
        }
    }
}

/// Validation result for an RPC endpoint
#[derive(Debug, Clone)]
pub struct EndpointValidation {
    pub is_valid: bool,
    pub url: Option<String>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl EndpointValidation {
    /// Collapse into a result, joining all errors into one message
    pub fn into_result(self) -> WalletResult<String> {
        match (self.is_valid, self.url) {
            (true, Some(url)) => Ok(url),
            _ => Err(WalletError::config(self.errors.join("; "))),
        }
    }
}

fn is_local_host(host: &str) -> bool {
    host == "localhost" || host == "127.0.0.1" || host == "0.0.0.0" || host.starts_with("192.168.")
}

/// Validate an RPC endpoint URL
pub fn validate_endpoint(url: &str) -> EndpointValidation {
    let mut warnings = Vec::new();
    let mut errors = Vec::new();

    let parsed = match Url::parse(url) {
        Ok(u) => u,
        Err(e) => {
            return EndpointValidation {
                is_valid: false,
                url: None,
                warnings,
                errors: vec![format!("Invalid URL format: {}", e)],
            };
        }
    };

    let host = parsed.host_str().unwrap_or_default().to_string();

    match parsed.scheme() {
        "https" => {}
        "http" if is_local_host(&host) => {
            warnings.push("HTTP allowed for local development only".to_string());
        }
        "http" => errors.push("HTTPS required for remote endpoints".to_string()),
        other => errors.push(format!("Unsupported URL scheme: {}", other)),
    }

    if host.is_empty() {
        errors.push("Endpoint has no host".to_string());
    } else if !host.ends_with("sui.io") && !is_local_host(&host) {
        warnings.push(format!(
            "Domain '{}' is not a Mysten-operated fullnode. Ensure you trust this endpoint.",
            host
        ));
    }

    if !parsed.username().is_empty() || parsed.password().is_some() {
        warnings.push("Credentials in URL - consider using headers for authentication".to_string());
    }

    if let Some(query) = parsed.query() {
        let query = query.to_lowercase();
        if query.contains("apikey") || query.contains("api_key") {
            warnings.push("API key in URL query string - ensure URL is not logged".to_string());
        }
    }

    let is_valid = errors.is_empty();
    EndpointValidation {
        is_valid,
        url: is_valid.then(|| parsed.to_string()),
        warnings,
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_presets() {
        assert_eq!(Network::Testnet.rpc_endpoint(), "https://fullnode.testnet.sui.io:443");
        assert_eq!(Network::Mainnet.chain_id(), "0x1");
        assert!(Network::Mainnet.faucet_endpoint().is_none());
        assert!(Network::Testnet.faucet_endpoint().is_some());
    }

    #[test]
    fn test_toggle() {
        assert_eq!(Network::Testnet.toggled(), Network::Mainnet);
        assert_eq!(Network::Mainnet.toggled(), Network::Testnet);
    }

    #[test]
    fn test_parse_network() {
        assert_eq!("Mainnet".parse::<Network>().unwrap(), Network::Mainnet);
        assert_eq!("local".parse::<Network>().unwrap(), Network::Localnet);
        assert!("moonnet".parse::<Network>().is_err());
    }

    #[test]
    fn test_manual_faucet_url() {
        assert_eq!(
            Network::Testnet.manual_faucet_url("0xabc"),
            "https://suiexplorer.com/faucet?address=0xabc"
        );
        assert_eq!(Network::Mainnet.manual_faucet_url("0xabc"), "https://suiexplorer.com/");
    }

    #[test]
    fn test_explorer_urls() {
        assert_eq!(
            Network::Testnet.explorer_tx_url("9xDigest"),
            "https://suiexplorer.com/txblock/9xDigest?network=testnet"
        );
        assert_eq!(
            Network::Devnet.explorer_address_url("0x2"),
            "https://suiexplorer.com/address/0x2?network=devnet"
        );
    }

    #[test]
    fn test_validate_endpoint() {
        let ok = validate_endpoint("https://fullnode.testnet.sui.io:443");
        assert!(ok.is_valid);
        assert!(ok.warnings.is_empty());

        let local = validate_endpoint("http://127.0.0.1:9000");
        assert!(local.is_valid);
        assert_eq!(local.warnings.len(), 1);

        let remote_http = validate_endpoint("http://rpc.example.com");
        assert!(!remote_http.is_valid);

        let garbage = validate_endpoint("not a url");
        assert!(!garbage.is_valid);
        assert!(garbage.into_result().is_err());
    }

    #[test]
    fn test_api_key_warning() {
        let v = validate_endpoint("https://rpc.example.com/?apikey=123");
        assert!(v.is_valid);
        assert!(v.warnings.iter().any(|w| w.contains("API key")));
    }
}
