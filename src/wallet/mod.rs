//! Wallet Module
//!
//! Handles key material: addresses, keypairs, normalization of imported
//! private keys, mnemonic generation/derivation and amount conversion.

mod address;
mod amount;
mod keypair;
mod mnemonic;
mod normalizer;

pub use address::*;
pub use amount::*;
pub use keypair::*;
pub use mnemonic::*;
pub use normalizer::*;

use crate::error::WalletResult;

/// Create a fresh wallet: a new phrase and its first-account keypair
pub fn create_new_wallet() -> WalletResult<(zeroize::Zeroizing<String>, SuiKeypair)> {
    let phrase = generate_mnemonic()?;
    let keypair = derive_keypair(&phrase, 0)?;
    Ok((phrase, keypair))
}
