//! Mnemonic handling
//!
//! BIP-39 phrases and SLIP-0010 Ed25519 derivation on Sui's path
//! `m/44'/784'/{account}'/0'/0'`.
//!
//! SECURITY: entropy, seeds and intermediate keys are zeroized on drop.

use bip39::Mnemonic;
use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha512;
use zeroize::Zeroizing;

use crate::error::{WalletError, WalletResult};
use crate::wallet::keypair::SuiKeypair;

type HmacSha512 = Hmac<Sha512>;

/// SLIP-44 coin type registered for Sui
pub const SUI_SLIP44_COIN_TYPE: u32 = 784;

const HARDENED: u32 = 0x8000_0000;

/// Derivation path for an account index
pub fn derivation_path(account: u32) -> String {
    format!("m/44'/{}'/{}'/0'/0'", SUI_SLIP44_COIN_TYPE, account)
}

/// Generate a fresh 12-word phrase from 128 bits of OS entropy
pub fn generate_mnemonic() -> WalletResult<Zeroizing<String>> {
    let mut entropy = Zeroizing::new([0u8; 16]);
    OsRng.fill_bytes(entropy.as_mut());

    let mnemonic = Mnemonic::from_entropy(entropy.as_ref())
        .map_err(|e| WalletError::crypto_error(format!("Failed to create mnemonic: {}", e)))?;
    Ok(Zeroizing::new(mnemonic.to_string()))
}

pub fn validate_mnemonic(phrase: &str) -> bool {
    Mnemonic::parse(phrase.trim()).is_ok()
}

/// Derive the account keypair for a phrase
pub fn derive_keypair(phrase: &str, account: u32) -> WalletResult<SuiKeypair> {
    let mnemonic = Mnemonic::parse(phrase.trim())
        .map_err(|e| WalletError::invalid_mnemonic(format!("Invalid mnemonic: {}", e)))?;

    let seed = Zeroizing::new(mnemonic.to_seed(""));
    let key = slip10_derive(seed.as_ref(), &derivation_path(account))?;
    Ok(SuiKeypair::from_seed(&key))
}

/// SLIP-0010 Ed25519 derivation; every component is hardened
fn slip10_derive(seed: &[u8], path: &str) -> WalletResult<Zeroizing<[u8; 32]>> {
    let mut mac = HmacSha512::new_from_slice(b"ed25519 seed")
        .map_err(|e| WalletError::crypto_error(format!("HMAC error: {}", e)))?;
    mac.update(seed);
    let mut master = Zeroizing::new([0u8; 64]);
    master.copy_from_slice(&mac.finalize().into_bytes());

    let mut key = Zeroizing::new([0u8; 32]);
    let mut chain_code = Zeroizing::new([0u8; 32]);
    key.copy_from_slice(&master[..32]);
    chain_code.copy_from_slice(&master[32..]);

    let components = path
        .strip_prefix('m')
        .filter(|rest| rest.is_empty() || rest.starts_with('/'))
        .ok_or_else(|| WalletError::crypto_error(format!("Derivation path must start with m: {}", path)))?;
    for component in components.split('/').filter(|c| !c.is_empty()) {
        let index: u32 = component
            .trim_end_matches(|c| c == '\'' || c == 'h')
            .parse()
            .map_err(|_| WalletError::crypto_error(format!("Invalid path component: {}", component)))?;

        let mut mac = HmacSha512::new_from_slice(chain_code.as_ref())
            .map_err(|e| WalletError::crypto_error(format!("HMAC error: {}", e)))?;
        mac.update(&[0u8]);
        mac.update(key.as_ref());
        mac.update(&(index | HARDENED).to_be_bytes());
        let mut child = Zeroizing::new([0u8; 64]);
        child.copy_from_slice(&mac.finalize().into_bytes());

        key.copy_from_slice(&child[..32]);
        chain_code.copy_from_slice(&child[32..]);
    }

    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_PHRASE: &str =
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn test_generate_is_valid_12_words() {
        let phrase = generate_mnemonic().unwrap();
        assert_eq!(phrase.split_whitespace().count(), 12);
        assert!(validate_mnemonic(&phrase));
    }

    #[test]
    fn test_validate_rejects_bad_checksum() {
        let bad = TEST_PHRASE.replace("about", "abandon");
        assert!(!validate_mnemonic(&bad));
        assert!(!validate_mnemonic("not a mnemonic"));
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let a = derive_keypair(TEST_PHRASE, 0).unwrap();
        let b = derive_keypair(TEST_PHRASE, 0).unwrap();
        let other_account = derive_keypair(TEST_PHRASE, 1).unwrap();
        assert_eq!(a.address(), b.address());
        assert_ne!(a.address(), other_account.address());
    }

    #[test]
    fn test_invalid_phrase_error_code() {
        let err = derive_keypair("one two three", 0).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::InvalidMnemonic);
    }

    #[test]
    fn test_path_format() {
        assert_eq!(derivation_path(0), "m/44'/784'/0'/0'/0'");
        assert_eq!(derivation_path(3), "m/44'/784'/3'/0'/0'");
    }

    #[test]
    fn test_slip10_master_key_vector() {
        // SLIP-0010 test vector 1 for ed25519, chain m
        let seed = hex::decode("000102030405060708090a0b0c0d0e0f").unwrap();
        let key = slip10_derive(&seed, "m").unwrap();
        assert_eq!(
            hex::encode(key.as_ref()),
            "2b4be7f19ee27bbf30c667b642d5f4aa69fd169872f8fc3059c08ebae2eb19e7"
        );
    }

    #[test]
    fn test_slip10_hardened_child_vector() {
        // SLIP-0010 test vector 1 for ed25519, chain m/0H
        let seed = hex::decode("000102030405060708090a0b0c0d0e0f").unwrap();
        let key = slip10_derive(&seed, "m/0'").unwrap();
        assert_eq!(
            hex::encode(key.as_ref()),
            "68e0fe46dfb67e368c75379acec591dad19df3cde26e63b93a8e704f1dade7a3"
        );
    }

    #[test]
    fn test_slip10_rejects_path_without_root() {
        let seed = [7u8; 16];
        for bad in ["44'/784'", "mx/0'", ""] {
            let err = slip10_derive(&seed, bad).unwrap_err();
            assert_eq!(err.code, crate::error::ErrorCode::CryptoError, "path {:?}", bad);
        }
        assert!(slip10_derive(&seed, "m/").is_ok());
    }
}
