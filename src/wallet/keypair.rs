//! Sui Ed25519 keypairs
//!
//! A keypair is held in one of two forms:
//! - seeded: a 32-byte RFC 8032 seed, expanded with SHA-512 when signing
//! - expanded: a 64-byte already-expanded secret (clamped scalar || nonce
//!   prefix), used as-is and never fed through the seed expansion again
//!
//! Both forms sign with the same Ed25519 equation, so signatures verify
//! against the keypair's public key either way.

use bech32::{FromBase32, ToBase32, Variant};
use ed25519_dalek::hazmat::{raw_sign, ExpandedSecretKey};
use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use sha2::Sha512;
use std::fmt;
use zeroize::Zeroizing;

use crate::error::{WalletError, WalletResult};
use crate::wallet::address::{SuiAddress, ED25519_FLAG};

/// Human-readable part of the bech32 private key encoding
pub const SUI_PRIVATE_KEY_HRP: &str = "suiprivkey";

/// Literal prefix of a bech32-encoded private key
pub const SUI_PRIVATE_KEY_PREFIX: &str = "suiprivkey1";

pub const SEED_LENGTH: usize = 32;
pub const EXPANDED_SECRET_LENGTH: usize = 64;

enum SecretForm {
    Seeded(SigningKey),
    Expanded(ExpandedSecretKey),
}

/// Ed25519 signing keypair with its Sui address
pub struct SuiKeypair {
    secret: SecretForm,
    public_key: VerifyingKey,
    address: SuiAddress,
}

impl SuiKeypair {
    /// Seed expansion: treat 32 bytes as an RFC 8032 seed
    pub fn from_seed(seed: &[u8; SEED_LENGTH]) -> Self {
        let signing_key = SigningKey::from_bytes(seed);
        let public_key = signing_key.verifying_key();
        Self::assemble(SecretForm::Seeded(signing_key), public_key)
    }

    /// Direct secret-key import
    ///
    /// 32 bytes are Sui's canonical private key and are imported unmodified;
    /// 64 bytes are an already-expanded secret key.
    pub fn from_secret_key(bytes: &[u8]) -> WalletResult<Self> {
        match bytes.len() {
            SEED_LENGTH => {
                let mut key = Zeroizing::new([0u8; SEED_LENGTH]);
                key.copy_from_slice(bytes);
                let signing_key = SigningKey::from_bytes(&key);
                let public_key = signing_key.verifying_key();
                Ok(Self::assemble(SecretForm::Seeded(signing_key), public_key))
            }
            EXPANDED_SECRET_LENGTH => {
                let mut key = Zeroizing::new([0u8; EXPANDED_SECRET_LENGTH]);
                key.copy_from_slice(bytes);
                let expanded = ExpandedSecretKey::from_bytes(&key);
                let public_key = VerifyingKey::from(&expanded);
                Ok(Self::assemble(SecretForm::Expanded(expanded), public_key))
            }
            other => Err(WalletError::invalid_private_key(format!(
                "Secret key must be 32 or 64 bytes, got {}",
                other
            ))),
        }
    }

    /// Decode a `suiprivkey1…` string (bech32 of `flag || 32-byte key`)
    pub fn from_bech32(encoded: &str) -> WalletResult<Self> {
        let (hrp, data, variant) = bech32::decode(encoded.trim())?;

        if hrp != SUI_PRIVATE_KEY_HRP {
            return Err(WalletError::invalid_key_format(format!(
                "Invalid suiprivkey1 format: unexpected prefix '{}'",
                hrp
            )));
        }
        if variant != Variant::Bech32 {
            return Err(WalletError::invalid_key_format(
                "Invalid suiprivkey1 format: expected bech32, found bech32m",
            ));
        }

        let payload = Zeroizing::new(Vec::<u8>::from_base32(&data)?);
        match payload.split_first() {
            Some((&ED25519_FLAG, key)) if key.len() == SEED_LENGTH => Self::from_secret_key(key),
            Some((&ED25519_FLAG, key)) => Err(WalletError::invalid_key_format(format!(
                "Invalid suiprivkey1 format: expected 32 key bytes, got {}",
                key.len()
            ))),
            Some((flag, _)) => Err(WalletError::invalid_key_format(format!(
                "Invalid suiprivkey1 format: unsupported signature scheme flag 0x{:02x}",
                flag
            ))),
            None => Err(WalletError::invalid_key_format("Invalid suiprivkey1 format: empty payload")),
        }
    }

    fn assemble(secret: SecretForm, public_key: VerifyingKey) -> Self {
        let address = SuiAddress::from_ed25519_public_key(public_key.as_bytes());
        Self {
            secret,
            public_key,
            address,
        }
    }

    pub fn address(&self) -> SuiAddress {
        self.address
    }

    pub fn public_key(&self) -> &VerifyingKey {
        &self.public_key
    }

    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.public_key.to_bytes()
    }

    /// True when the keypair was imported from an expanded secret
    pub fn is_expanded(&self) -> bool {
        matches!(self.secret, SecretForm::Expanded(_))
    }

    /// The 32-byte private key, when one exists (expanded keys have none)
    pub fn private_key_bytes(&self) -> Option<Zeroizing<[u8; SEED_LENGTH]>> {
        match &self.secret {
            SecretForm::Seeded(key) => Some(Zeroizing::new(key.to_bytes())),
            SecretForm::Expanded(_) => None,
        }
    }

    /// Comma-separated decimal bytes, the storage form used by the wallet UI
    pub fn export_csv(&self) -> WalletResult<Zeroizing<String>> {
        let bytes = self.export_bytes()?;
        let csv = bytes.iter().map(|b| b.to_string()).collect::<Vec<_>>().join(",");
        Ok(Zeroizing::new(csv))
    }

    /// `suiprivkey1…` form
    pub fn export_bech32(&self) -> WalletResult<Zeroizing<String>> {
        let bytes = self.export_bytes()?;
        let mut payload = Zeroizing::new(Vec::with_capacity(1 + SEED_LENGTH));
        payload.push(ED25519_FLAG);
        payload.extend_from_slice(&bytes[..]);

        let encoded = bech32::encode(SUI_PRIVATE_KEY_HRP, payload.as_slice().to_base32(), Variant::Bech32)
            .map_err(|e| WalletError::crypto_error(format!("Bech32 encoding failed: {}", e)))?;
        Ok(Zeroizing::new(encoded))
    }

    fn export_bytes(&self) -> WalletResult<Zeroizing<[u8; SEED_LENGTH]>> {
        self.private_key_bytes().ok_or_else(|| {
            WalletError::invalid_private_key("Expanded secret keys cannot be exported as a 32-byte private key")
        })
    }

    /// Sign raw bytes
    pub fn sign(&self, message: &[u8]) -> Signature {
        match &self.secret {
            SecretForm::Seeded(key) => key.sign(message),
            SecretForm::Expanded(esk) => raw_sign::<Sha512>(esk, message, &self.public_key),
        }
    }

    /// Sui serialized signature: `flag || signature || public_key`
    pub fn sign_with_flag(&self, message: &[u8]) -> Vec<u8> {
        let mut result = Vec::with_capacity(1 + 64 + 32);
        result.push(ED25519_FLAG);
        result.extend_from_slice(&self.sign(message).to_bytes());
        result.extend_from_slice(self.public_key.as_bytes());
        result
    }
}

impl fmt::Debug for SuiKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuiKeypair")
            .field("address", &self.address.to_hex())
            .field("expanded", &self.is_expanded())
            .finish_non_exhaustive()
    }
}
