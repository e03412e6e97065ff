//! Shared types for the Sui wallet core
//!
//! Data structures that cross module boundaries are defined here
//! for consistent serialization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use zeroize::{Zeroize, ZeroizeOnDrop};

// =============================================================================
// Fee Types
// =============================================================================

/// Caller-chosen fee tier, mapped to a fixed gas budget in MIST
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl FeeLevel {
    pub const ALL: [FeeLevel; 3] = [FeeLevel::Low, FeeLevel::Medium, FeeLevel::High];

    pub fn gas_budget(&self) -> u64 {
        match self {
            FeeLevel::Low => 400_000,
            FeeLevel::Medium => 1_000_000,
            FeeLevel::High => 2_000_000,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FeeLevel::Low => "low",
            FeeLevel::Medium => "medium",
            FeeLevel::High => "high",
        }
    }
}

impl fmt::Display for FeeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized levels fall back to `Medium`
impl FromStr for FeeLevel {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "low" => FeeLevel::Low,
            "high" => FeeLevel::High,
            _ => FeeLevel::Medium,
        })
    }
}

/// Gas budgets per tier, in SUI display units
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasPriceInfo {
    pub low: String,
    pub medium: String,
    pub high: String,
    /// Reference gas price in MIST per gas unit, when the node answered
    pub reference_gas_price: Option<u64>,
}

// =============================================================================
// Transaction Types
// =============================================================================

/// A transfer as entered by the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub recipient: String,
    /// Decimal SUI amount, e.g. `"1.5"`
    pub amount: String,
    #[serde(default)]
    pub fee_level: FeeLevel,
}

/// Outcome of a submitted transfer
///
/// `signature` carries the same value as `hash`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionResult {
    pub hash: String,
    pub signature: String,
}

impl TransactionResult {
    pub fn from_hash(hash: impl Into<String>) -> Self {
        let hash = hash.into();
        Self {
            signature: hash.clone(),
            hash,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionState {
    Pending,
    Confirmed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionStatus {
    pub status: TransactionState,
    pub confirmations: u32,
    pub error: Option<String>,
}

// =============================================================================
// Wallet Types
// =============================================================================

/// Keys handed back by generate/import
///
/// SECURITY: fields are zeroized on drop and omitted from `Debug`.
#[derive(Clone, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct WalletKeys {
    pub address: String,
    pub private_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mnemonic: Option<String>,
}

impl fmt::Debug for WalletKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletKeys")
            .field("address", &self.address)
            .field("private_key", &"[REDACTED]")
            .field("mnemonic", &self.mnemonic.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Persisted wallet shape; the storage backend itself lives outside this crate
#[derive(Clone, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct WalletRecord {
    pub address: String,
    pub private_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mnemonic: Option<String>,
    #[zeroize(skip)]
    pub created_at: DateTime<Utc>,
}

impl WalletRecord {
    pub fn new(keys: &WalletKeys, created_at: DateTime<Utc>) -> Self {
        Self {
            address: keys.address.clone(),
            private_key: keys.private_key.clone(),
            mnemonic: keys.mnemonic.clone(),
            created_at,
        }
    }

    /// Key under which the record is stored, e.g. `sui_wallet`
    pub fn storage_key(symbol: &str) -> String {
        format!("{}_wallet", symbol.to_lowercase())
    }
}

impl fmt::Debug for WalletRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletRecord")
            .field("address", &self.address)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Faucet Types
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaucetOutcome {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faucet_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fee_level_budgets() {
        assert_eq!(FeeLevel::Low.gas_budget(), 400_000);
        assert_eq!(FeeLevel::Medium.gas_budget(), 1_000_000);
        assert_eq!(FeeLevel::High.gas_budget(), 2_000_000);
        assert_eq!(FeeLevel::default(), FeeLevel::Medium);
    }

    #[test]
    fn test_unknown_fee_level_is_medium() {
        assert_eq!("HIGH".parse::<FeeLevel>().unwrap(), FeeLevel::High);
        assert_eq!("urgent".parse::<FeeLevel>().unwrap(), FeeLevel::Medium);
        assert_eq!("".parse::<FeeLevel>().unwrap(), FeeLevel::Medium);
    }

    #[test]
    fn test_transaction_result_mirrors_hash() {
        let result = TransactionResult::from_hash("abc");
        assert_eq!(result.hash, result.signature);
    }

    #[test]
    fn test_wallet_record_shape() {
        let keys = WalletKeys {
            address: "0x1".to_string(),
            private_key: "1,2,3".to_string(),
            mnemonic: None,
        };
        let created_at = DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let record = WalletRecord::new(&keys, created_at);
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["privateKey"], "1,2,3");
        assert_eq!(json["createdAt"], "2024-01-01T00:00:00Z");
        assert!(json.get("mnemonic").is_none());
        assert_eq!(WalletRecord::storage_key("SUI"), "sui_wallet");
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let keys = WalletKeys {
            address: "0xabc".to_string(),
            private_key: "suiprivkey1secret".to_string(),
            mnemonic: Some("word word".to_string()),
        };
        let debug = format!("{:?}", keys);
        assert!(debug.contains("0xabc"));
        assert!(!debug.contains("secret"));
        assert!(!debug.contains("word"));
    }

    #[test]
    fn test_transfer_request_default_fee() {
        let req: TransferRequest =
            serde_json::from_str(r#"{"recipient":"0x1","amount":"1"}"#).unwrap();
        assert_eq!(req.fee_level, FeeLevel::Medium);
    }
}
