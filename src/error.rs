//! Unified error types for the Sui wallet core
//!
//! All errors flow through this module so the CLI (and any UI layer on top
//! of the crate) only ever sees one shape: a code plus a message.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Main error type for all wallet operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<String>,
}

impl WalletError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    // Convenience constructors
    pub fn invalid_key_format(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidKeyFormat, msg)
    }

    pub fn no_compatible_derivation(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::NoCompatibleDerivation, msg)
    }

    pub fn unsupported_key_length(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::UnsupportedKeyLength, msg)
    }

    pub fn invalid_recipient(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRecipient, msg)
    }

    pub fn amount_format(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::AmountFormatError, msg)
    }

    pub fn no_compatible_transaction_api(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::NoCompatibleTransactionApi, msg)
    }

    pub fn network(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::NetworkFailure, msg)
    }

    pub fn invalid_mnemonic(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidMnemonic, msg)
    }

    pub fn invalid_private_key(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidPrivateKey, msg)
    }

    pub fn parse_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ParseError, msg)
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, msg)
    }

    pub fn crypto_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::CryptoError, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, msg)
    }
}

impl fmt::Display for WalletError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for WalletError {}

/// Error codes for categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    // Key material
    InvalidKeyFormat,
    NoCompatibleDerivation,
    UnsupportedKeyLength,
    InvalidPrivateKey,
    InvalidMnemonic,

    // Transfer input
    InvalidRecipient,
    AmountFormatError,

    // Submission
    NoCompatibleTransactionApi,
    /// Transport failures and any rejection reported by the node or faucet
    NetworkFailure,

    // Crypto errors
    CryptoError,

    // Parse errors
    ParseError,
    JsonError,
    HexError,

    // Configuration
    ConfigError,

    // Internal
    Internal,
}

/// Result type alias for wallet operations
pub type WalletResult<T> = Result<T, WalletError>;

// Conversions from common error types

impl From<serde_json::Error> for WalletError {
    fn from(e: serde_json::Error) -> Self {
        WalletError::new(ErrorCode::JsonError, e.to_string())
    }
}

impl From<hex::FromHexError> for WalletError {
    fn from(e: hex::FromHexError) -> Self {
        WalletError::new(ErrorCode::HexError, e.to_string())
    }
}

impl From<std::io::Error> for WalletError {
    fn from(e: std::io::Error) -> Self {
        WalletError::new(ErrorCode::Internal, e.to_string())
    }
}

impl From<reqwest::Error> for WalletError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            WalletError::network("Request timed out")
        } else if e.is_connect() {
            WalletError::network("Connection failed")
        } else {
            WalletError::network(e.to_string())
        }
    }
}

impl From<bip39::Error> for WalletError {
    fn from(e: bip39::Error) -> Self {
        WalletError::invalid_mnemonic(format!("BIP39 error: {}", e))
    }
}

impl From<bech32::Error> for WalletError {
    fn from(e: bech32::Error) -> Self {
        WalletError::invalid_key_format(format!("Bech32 error: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let err = WalletError::unsupported_key_length("Unsupported private key length: 17")
            .with_details("fromSeed=true, fromSecretKey=true");

        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("unsupported_key_length"));
        assert!(json.contains("17"));
    }

    #[test]
    fn test_display_includes_details() {
        let err = WalletError::invalid_recipient("Invalid address").with_details("0x12");
        assert_eq!(err.to_string(), "[InvalidRecipient] Invalid address (0x12)");
    }
}
