//! Transaction data and signing
//!
//! `TransactionData` is what the sender signs. The signed message is
//! `blake2b_256(intent || bcs(TransactionData))` with the intent
//! `[TransactionData scope, V0, Sui app]` = `[0, 0, 0]`.

use base64::{engine::general_purpose::STANDARD, Engine};
use blake2::Digest;
use serde::{Deserialize, Serialize};

use crate::error::{WalletError, WalletResult};
use crate::tx::bcs::{BcsEncode, BcsWriter};
use crate::tx::builder::ProgrammableTransaction;
use crate::wallet::{Blake2b256, SuiAddress, SuiKeypair};

pub const TRANSACTION_DATA_INTENT: [u8; 3] = [0, 0, 0];

/// Most gas coins a single transaction may pay with
pub const MAX_GAS_PAYMENT_OBJECTS: usize = 256;

/// Object reference: id, version and digest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRef {
    pub object_id: SuiAddress,
    pub version: u64,
    pub digest: [u8; 32],
}

impl ObjectRef {
    pub fn new(object_id: SuiAddress, version: u64, digest: [u8; 32]) -> Self {
        Self {
            object_id,
            version,
            digest,
        }
    }

    /// Build from the string forms a fullnode returns (base58 digest)
    pub fn from_rpc(object_id: &str, version: u64, digest: &str) -> WalletResult<Self> {
        let object_id = SuiAddress::parse(object_id)
            .map_err(|e| WalletError::parse_error(format!("Invalid object id: {}", e.message)))?;
        let bytes = bs58::decode(digest)
            .into_vec()
            .map_err(|e| WalletError::parse_error(format!("Invalid object digest: {}", e)))?;
        let digest: [u8; 32] = bytes
            .try_into()
            .map_err(|_| WalletError::parse_error("Object digest must be 32 bytes"))?;
        Ok(Self::new(object_id, version, digest))
    }
}

impl BcsEncode for ObjectRef {
    fn encode(&self, w: &mut BcsWriter) {
        self.object_id.encode(w);
        w.write_u64(self.version).write_bytes(&self.digest);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GasData {
    pub payment: Vec<ObjectRef>,
    pub owner: SuiAddress,
    pub price: u64,
    pub budget: u64,
}

impl BcsEncode for GasData {
    fn encode(&self, w: &mut BcsWriter) {
        w.write_seq(&self.payment);
        self.owner.encode(w);
        w.write_u64(self.price).write_u64(self.budget);
    }
}

/// `TransactionData::V1` with a programmable transaction kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionData {
    pub kind: ProgrammableTransaction,
    pub sender: SuiAddress,
    pub gas_data: GasData,
}

impl BcsEncode for TransactionData {
    fn encode(&self, w: &mut BcsWriter) {
        // TransactionData::V1, TransactionKind::ProgrammableTransaction
        w.write_variant(0).write_variant(0);
        self.kind.encode(w);
        self.sender.encode(w);
        self.gas_data.encode(w);
        // TransactionExpiration::None
        w.write_variant(0);
    }
}

impl TransactionData {
    pub fn new_programmable(
        sender: SuiAddress,
        payment: Vec<ObjectRef>,
        kind: ProgrammableTransaction,
        budget: u64,
        price: u64,
    ) -> WalletResult<Self> {
        if payment.is_empty() {
            return Err(WalletError::network("No SUI coins available to pay for gas"));
        }
        if payment.len() > MAX_GAS_PAYMENT_OBJECTS {
            return Err(WalletError::internal(format!(
                "Too many gas coins: {} (max {})",
                payment.len(),
                MAX_GAS_PAYMENT_OBJECTS
            )));
        }

        Ok(Self {
            kind,
            sender,
            gas_data: GasData {
                payment,
                owner: sender,
                price,
                budget,
            },
        })
    }

    /// Base58 transaction digest, the id the network reports
    pub fn digest(&self) -> String {
        let mut hasher = Blake2b256::new();
        hasher.update(b"TransactionData::");
        hasher.update(self.to_bcs());
        bs58::encode(hasher.finalize()).into_string()
    }

    pub fn sign(&self, keypair: &SuiKeypair) -> SignedTransaction {
        sign_transaction_bytes(keypair, &self.to_bcs())
    }
}

/// Hash signed for a serialized transaction
pub fn signing_digest(tx_bytes: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    hasher.update(TRANSACTION_DATA_INTENT);
    hasher.update(tx_bytes);
    hasher.finalize().into()
}

/// Sign already-serialized transaction bytes, e.g. ones built by the node
pub fn sign_transaction_bytes(keypair: &SuiKeypair, tx_bytes: &[u8]) -> SignedTransaction {
    let digest = signing_digest(tx_bytes);
    let signature = keypair.sign_with_flag(&digest);
    SignedTransaction {
        tx_bytes: STANDARD.encode(tx_bytes),
        signature: STANDARD.encode(signature),
    }
}

/// Base64 forms as submitted to `sui_executeTransactionBlock`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    pub tx_bytes: String,
    pub signature: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tx::builder::Transaction;
    use ed25519_dalek::{Signature, Verifier};

    fn sample(keypair: &SuiKeypair) -> TransactionData {
        let mut tx = Transaction::new();
        let amount = tx.pure_u64(1_000);
        let coins = tx.split_coins(tx.gas(), vec![amount]);
        let to = tx.pure_address(SuiAddress::new([1u8; 32]));
        tx.transfer_objects(coins, to);

        let coin = ObjectRef::new(SuiAddress::new([2u8; 32]), 7, [3u8; 32]);
        TransactionData::new_programmable(keypair.address(), vec![coin], tx.programmable().clone(), 1_000_000, 750)
            .unwrap()
    }

    #[test]
    fn test_bcs_layout() {
        let keypair = SuiKeypair::from_seed(&[9u8; 32]);
        let bytes = sample(&keypair).to_bcs();

        assert_eq!(&bytes[..2], &[0, 0]);
        // Trailer: owner, price, budget, no expiration
        let tail = &bytes[bytes.len() - 49..];
        assert_eq!(&tail[..32], keypair.address().as_bytes());
        assert_eq!(&tail[32..40], &750u64.to_le_bytes());
        assert_eq!(&tail[40..48], &1_000_000u64.to_le_bytes());
        assert_eq!(tail[48], 0);
    }

    #[test]
    fn test_object_ref_encoding() {
        let coin = ObjectRef::new(SuiAddress::new([2u8; 32]), 7, [3u8; 32]);
        let bytes = coin.to_bcs();
        assert_eq!(bytes.len(), 32 + 8 + 1 + 32);
        assert_eq!(bytes[40], 32);
    }

    #[test]
    fn test_object_ref_from_rpc() {
        let digest = bs58::encode([5u8; 32]).into_string();
        let coin = ObjectRef::from_rpc("0x2", 3, &digest).unwrap();
        assert_eq!(coin.digest, [5u8; 32]);
        assert!(ObjectRef::from_rpc("0x2", 3, "short").is_err());
    }

    #[test]
    fn test_signature_verifies_over_intent_digest() {
        let keypair = SuiKeypair::from_seed(&[9u8; 32]);
        let data = sample(&keypair);
        let signed = data.sign(&keypair);

        let raw = STANDARD.decode(&signed.signature).unwrap();
        assert_eq!(raw.len(), 97);
        assert_eq!(raw[0], 0x00);
        let sig = Signature::from_slice(&raw[1..65]).unwrap();
        let digest = signing_digest(&data.to_bcs());
        assert!(keypair.public_key().verify(&digest, &sig).is_ok());
        assert_eq!(STANDARD.decode(&signed.tx_bytes).unwrap(), data.to_bcs());
    }

    #[test]
    fn test_digest_is_base58_of_32_bytes() {
        let keypair = SuiKeypair::from_seed(&[9u8; 32]);
        let digest = sample(&keypair).digest();
        assert_eq!(bs58::decode(&digest).into_vec().unwrap().len(), 32);
    }

    #[test]
    fn test_requires_gas_payment() {
        let err = TransactionData::new_programmable(
            SuiAddress::ZERO,
            vec![],
            ProgrammableTransaction::default(),
            1,
            1,
        )
        .unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::NetworkFailure);
    }
}
