//! Sui addresses
//!
//! A Sui address is 32 bytes, displayed as 0x-prefixed lowercase hex.
//! For an Ed25519 signer, `address = blake2b_256(0x00 || public_key)`.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{WalletError, WalletResult};

pub type Blake2b256 = Blake2b<U32>;

pub const SUI_ADDRESS_LENGTH: usize = 32;

/// Signature scheme flag for Ed25519 (also the first byte of a `suiprivkey` payload)
pub const ED25519_FLAG: u8 = 0x00;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SuiAddress([u8; SUI_ADDRESS_LENGTH]);

impl SuiAddress {
    pub const ZERO: SuiAddress = SuiAddress([0u8; SUI_ADDRESS_LENGTH]);

    pub fn new(bytes: [u8; SUI_ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Derive the address of a single Ed25519 signer
    pub fn from_ed25519_public_key(public_key: &[u8; 32]) -> Self {
        let mut hasher = Blake2b256::new();
        hasher.update([ED25519_FLAG]);
        hasher.update(public_key);
        Self(hasher.finalize().into())
    }

    /// Parse hex with or without `0x`; short forms such as `0x2` are left-padded
    pub fn parse(s: &str) -> WalletResult<Self> {
        let s = s.trim();
        let hex_part = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);

        if hex_part.is_empty() || hex_part.len() > SUI_ADDRESS_LENGTH * 2 {
            return Err(WalletError::invalid_recipient(format!("Invalid address length: {}", s)));
        }

        let padded = format!("{:0>64}", hex_part);
        let bytes = hex::decode(&padded)
            .map_err(|e| WalletError::invalid_recipient(format!("Invalid hex in address: {}", e)))?;

        let mut arr = [0u8; SUI_ADDRESS_LENGTH];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    pub fn as_bytes(&self) -> &[u8; SUI_ADDRESS_LENGTH] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for SuiAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for SuiAddress {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for SuiAddress {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for SuiAddress {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        SuiAddress::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Address-validity predicate used before any submission
///
/// Accepts exactly 32 bytes of hex, with an optional `0x` prefix.
pub fn is_valid_address(address: &str) -> bool {
    let hex_part = address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
        .unwrap_or(address);

    hex_part.len() == SUI_ADDRESS_LENGTH * 2 && hex_part.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Coin type of the native asset
pub const SUI_COIN_TYPE: &str = "0x2::sui::SUI";
