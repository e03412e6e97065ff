//! Faucet requests
//!
//! Test networks hand out gas from a faucet service. Failures never surface
//! as errors; the caller gets an unsuccessful outcome pointing at the
//! explorer's manual faucet page instead.

use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use crate::error::{WalletError, WalletResult};
use crate::types::FaucetOutcome;
use crate::utils::http::build_client;
use crate::utils::network_config::Network;
use crate::wallet::SuiAddress;
use crate::{log_info, log_warn};

const MODULE: &str = "faucet";

const FAUCET_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FaucetCoin {
    #[serde(default, alias = "transfer_tx_digest")]
    transfer_tx_digest: Option<String>,
}

/// Accepts both the v1 (`transferredGasObjects`) and v2 (`coins_sent`) bodies
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FaucetResponse {
    #[serde(default, alias = "coins_sent")]
    transferred_gas_objects: Vec<FaucetCoin>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    status: Option<serde_json::Value>,
}

pub struct FaucetClient {
    http: reqwest::Client,
    network: Network,
    endpoint: Option<String>,
}

impl FaucetClient {
    pub fn new(network: Network) -> WalletResult<Self> {
        Self::with_endpoint(network, network.faucet_endpoint().map(str::to_string))
    }

    pub fn with_endpoint(network: Network, endpoint: Option<String>) -> WalletResult<Self> {
        Ok(Self {
            http: build_client(Some(FAUCET_TIMEOUT))?,
            network,
            endpoint,
        })
    }

    pub async fn request(&self, address: &SuiAddress) -> FaucetOutcome {
        let manual_url = self.network.manual_faucet_url(&address.to_hex());

        let endpoint = match (&self.endpoint, self.network) {
            (_, Network::Mainnet) => {
                return FaucetOutcome {
                    success: false,
                    message: "Mainnet does not have a faucet. You need to purchase SUI from exchanges.".to_string(),
                    faucet_url: Some(manual_url),
                    tx_hash: None,
                };
            }
            (None, network) => {
                return FaucetOutcome {
                    success: false,
                    message: format!(
                        "No faucet endpoint is configured for {}. Please visit the Sui Explorer: {}",
                        network, manual_url
                    ),
                    faucet_url: Some(manual_url),
                    tx_hash: None,
                };
            }
            (Some(endpoint), _) => endpoint,
        };

        match self.send(endpoint, address).await {
            Ok(tx_hash) => {
                log_info!(MODULE, "Faucet request accepted", address = address, network = self.network);
                FaucetOutcome {
                    success: true,
                    message: "SUI tokens requested from faucet. Please wait a few minutes for the transaction to be processed."
                        .to_string(),
                    faucet_url: None,
                    tx_hash: Some(tx_hash.unwrap_or_else(|| "Unknown".to_string())),
                }
            }
            Err(e) => {
                log_warn!(MODULE, "Faucet request failed", address = address, error = e);
                FaucetOutcome {
                    success: false,
                    message: format!("Faucet API failed. Please visit the Sui Explorer: {}", manual_url),
                    faucet_url: Some(manual_url),
                    tx_hash: None,
                }
            }
        }
    }

    async fn send(&self, endpoint: &str, address: &SuiAddress) -> WalletResult<Option<String>> {
        let body = json!({ "FixedAmountRequest": { "recipient": address.to_hex() } });
        let response = self.http.post(endpoint).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WalletError::network(format!("Faucet request failed: HTTP {}", status)));
        }

        let parsed: FaucetResponse = response.json().await?;
        parse_outcome(parsed)
    }
}

fn parse_outcome(response: FaucetResponse) -> WalletResult<Option<String>> {
    if let Some(error) = response.error.filter(|e| !e.is_empty()) {
        return Err(WalletError::network(format!("Faucet error: {}", error)));
    }
    // v2 reports `{"Failure": {"internal": "..."}}` in `status`
    if let Some(failure) = response.status.as_ref().and_then(|s| s.get("Failure")) {
        return Err(WalletError::network(format!("Faucet error: {}", failure)));
    }

    Ok(response
        .transferred_gas_objects
        .into_iter()
        .find_map(|coin| coin.transfer_tx_digest))
}
