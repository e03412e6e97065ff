//! Key Material Normalizer
//!
//! Turns whatever a user pasted as a private key into exactly one signing
//! keypair. Wallet export tools disagree on whether 32 bytes are a seed or
//! a literal key, and on what a 64-byte value holds, so the rules below are
//! an ordered heuristic. A wrong guess silently yields an unrelated address,
//! which is why the chosen path is always logged.

use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::Zeroizing;

use crate::error::{WalletError, WalletResult};
use crate::wallet::keypair::{SuiKeypair, EXPANDED_SECRET_LENGTH, SEED_LENGTH, SUI_PRIVATE_KEY_PREFIX};
use crate::{log_debug, log_warn};

const MODULE: &str = "normalizer";

/// Which derivation functions the key backend offers
///
/// Negotiated once from configuration; both are available by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivationSupport {
    pub seed_expansion: bool,
    pub secret_import: bool,
}

impl Default for DerivationSupport {
    fn default() -> Self {
        Self {
            seed_expansion: true,
            secret_import: true,
        }
    }
}

/// How the input text was classified before decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawKeyMaterial<'a> {
    /// `suiprivkey1…`, decoded by the bech32 importer
    Bech32(&'a str),
    /// Comma-separated decimal bytes
    Csv(&'a str),
    /// 32 or 64 bytes of hex, optional `0x`
    Hex(&'a str),
    /// Nothing matched; parsed as a one-token byte list
    Unrecognized(&'a str),
}

impl<'a> RawKeyMaterial<'a> {
    pub fn classify(input: &'a str) -> Self {
        let trimmed = input.trim();

        if trimmed.starts_with(SUI_PRIVATE_KEY_PREFIX) {
            return RawKeyMaterial::Bech32(trimmed);
        }
        if trimmed.contains(',') {
            return RawKeyMaterial::Csv(trimmed);
        }

        let hex_part = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let hex_len_ok = hex_part.len() == SEED_LENGTH * 2 || hex_part.len() == EXPANDED_SECRET_LENGTH * 2;
        if hex_len_ok && hex_part.bytes().all(|b| b.is_ascii_hexdigit()) {
            return RawKeyMaterial::Hex(hex_part);
        }

        RawKeyMaterial::Unrecognized(trimmed)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RawKeyMaterial::Bech32(_) => "suiprivkey",
            RawKeyMaterial::Csv(_) => "csv",
            RawKeyMaterial::Hex(_) => "hex",
            RawKeyMaterial::Unrecognized(_) => "unrecognized",
        }
    }

    /// Byte view of the non-bech32 forms
    fn to_bytes(self) -> WalletResult<Zeroizing<Vec<u8>>> {
        match self {
            RawKeyMaterial::Bech32(_) => Err(WalletError::internal("bech32 keys are not decoded to raw bytes")),
            RawKeyMaterial::Hex(text) => Ok(Zeroizing::new(hex::decode(text)?)),
            RawKeyMaterial::Csv(text) | RawKeyMaterial::Unrecognized(text) => parse_byte_list(text),
        }
    }
}

fn parse_byte_list(text: &str) -> WalletResult<Zeroizing<Vec<u8>>> {
    let mut bytes = Zeroizing::new(Vec::new());
    for (index, token) in text.split(',').map(str::trim).enumerate() {
        let value = token.parse::<u8>().map_err(|_| {
            WalletError::invalid_key_format(format!(
                "Invalid private key: token {} is not a byte value (0-255)",
                index
            ))
        })?;
        bytes.push(value);
    }
    Ok(bytes)
}

/// The single derivation path a normalization used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DerivationPath {
    Bech32Import,
    SeedExpansion,
    SecretImport,
    TruncatedSeed,
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DerivationPath::Bech32Import => "bech32 import",
            DerivationPath::SeedExpansion => "seed expansion",
            DerivationPath::SecretImport => "secret key import",
            DerivationPath::TruncatedSeed => "truncated seed",
        };
        f.write_str(label)
    }
}

#[derive(Debug)]
pub struct NormalizedKeypair {
    pub keypair: SuiKeypair,
    pub path: DerivationPath,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct KeyNormalizer {
    support: DerivationSupport,
}

impl KeyNormalizer {
    pub fn new(support: DerivationSupport) -> Self {
        Self { support }
    }

    pub fn support(&self) -> DerivationSupport {
        self.support
    }

    /// Normalize user-supplied key text into one keypair
    pub fn normalize(&self, raw: &str) -> WalletResult<NormalizedKeypair> {
        let material = RawKeyMaterial::classify(raw);
        log_debug!(MODULE, "Private key format detected", format = material.kind());

        if let RawKeyMaterial::Unrecognized(_) = material {
            log_warn!(MODULE, "Unknown private key format, trying as comma-separated bytes");
        }

        let normalized = match material {
            RawKeyMaterial::Bech32(text) => NormalizedKeypair {
                keypair: SuiKeypair::from_bech32(text)?,
                path: DerivationPath::Bech32Import,
            },
            other => {
                let bytes = other.to_bytes()?;
                self.derive_from_bytes(&bytes)?
            }
        };

        log_debug!(
            MODULE,
            "Keypair derived",
            path = normalized.path,
            address = normalized.keypair.address(),
        );
        Ok(normalized)
    }

    /// Apply the length rules to a decoded byte sequence
    pub fn derive_from_bytes(&self, bytes: &[u8]) -> WalletResult<NormalizedKeypair> {
        let DerivationSupport {
            seed_expansion,
            secret_import,
        } = self.support;

        log_debug!(
            MODULE,
            "Selecting derivation",
            length = bytes.len(),
            expansion_available = seed_expansion,
            import_available = secret_import,
        );

        let len = bytes.len();
        if len == SEED_LENGTH {
            if seed_expansion {
                return Ok(NormalizedKeypair {
                    keypair: SuiKeypair::from_seed(&first_seed(bytes)),
                    path: DerivationPath::SeedExpansion,
                });
            }
            if secret_import {
                return Ok(NormalizedKeypair {
                    keypair: SuiKeypair::from_secret_key(bytes)?,
                    path: DerivationPath::SecretImport,
                });
            }
            return Err(WalletError::no_compatible_derivation(
                "No compatible keypair creation method found",
            ));
        }

        if len == EXPANDED_SECRET_LENGTH && secret_import {
            return Ok(NormalizedKeypair {
                keypair: SuiKeypair::from_secret_key(bytes)?,
                path: DerivationPath::SecretImport,
            });
        }

        if len > SEED_LENGTH && seed_expansion {
            return Ok(NormalizedKeypair {
                keypair: SuiKeypair::from_seed(&first_seed(bytes)),
                path: DerivationPath::TruncatedSeed,
            });
        }

        Err(WalletError::unsupported_key_length(format!(
            "Unsupported private key length: {}. Available methods: fromSeed={}, fromSecretKey={}",
            len, seed_expansion, secret_import
        )))
    }
}

fn first_seed(bytes: &[u8]) -> Zeroizing<[u8; SEED_LENGTH]> {
    let mut seed = Zeroizing::new([0u8; SEED_LENGTH]);
    seed.copy_from_slice(&bytes[..SEED_LENGTH]);
    seed
}
