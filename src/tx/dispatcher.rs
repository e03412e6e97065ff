//! Transaction Dispatcher
//!
//! Turns a transfer request into a submitted transaction using whichever
//! submission style the client offers. The style is negotiated once, when
//! the client is first built, and then reused for every send.

use serde::{Deserialize, Serialize};

use crate::api::client::{ClientCapabilities, ExecuteOptions, ExecutionResponse, RequestType, SuiClientApi};
use crate::error::{WalletError, WalletResult};
use crate::log_debug;
use crate::tx::builder::{PureValue, Transaction, TransactionBlock};
use crate::types::{FeeLevel, TransactionResult, TransferRequest};
use crate::wallet::{is_valid_address, to_base_units, SuiAddress, SuiKeypair};

const MODULE: &str = "dispatcher";

/// Placeholder hash when the response carries no identifier
pub const UNKNOWN_HASH: &str = "unknown";

/// Submission style selected for a client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum TransactionApi {
    ConvenienceSend,
    ModernBuilder,
    LegacyBuilder { typed_pure: bool },
    Unsupported,
}

impl TransactionApi {
    /// Priority: convenience send, then the current builder, then the legacy one
    pub fn negotiate(capabilities: &ClientCapabilities) -> Self {
        if capabilities.convenience_send {
            TransactionApi::ConvenienceSend
        } else if capabilities.modern_builder {
            TransactionApi::ModernBuilder
        } else if capabilities.legacy_builder {
            TransactionApi::LegacyBuilder {
                typed_pure: capabilities.typed_pure,
            }
        } else {
            TransactionApi::Unsupported
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TransactionApi::ConvenienceSend => "convenience_send",
            TransactionApi::ModernBuilder => "modern_builder",
            TransactionApi::LegacyBuilder { .. } => "legacy_builder",
            TransactionApi::Unsupported => "unsupported",
        }
    }
}

/// First identifier present in the response, else [`UNKNOWN_HASH`]
pub fn result_hash(response: &ExecutionResponse) -> String {
    response
        .digest
        .as_deref()
        .or(response.effects_digest.as_deref())
        .or(response.hash.as_deref())
        .unwrap_or(UNKNOWN_HASH)
        .to_string()
}

#[derive(Debug, Clone, Copy)]
pub struct Dispatcher {
    api: TransactionApi,
}

impl Dispatcher {
    pub fn new(api: TransactionApi) -> Self {
        Self { api }
    }

    pub fn for_client(client: &dyn SuiClientApi) -> Self {
        Self::new(TransactionApi::negotiate(&client.capabilities()))
    }

    pub fn api(&self) -> TransactionApi {
        self.api
    }

    /// Validate, convert and submit a transfer
    ///
    /// Recipient and amount are checked before anything reaches the client.
    pub async fn send(
        &self,
        client: &dyn SuiClientApi,
        keypair: &SuiKeypair,
        request: &TransferRequest,
    ) -> WalletResult<TransactionResult> {
        if !is_valid_address(&request.recipient) {
            return Err(WalletError::invalid_recipient(format!(
                "Invalid recipient address: {}",
                request.recipient
            )));
        }
        let recipient = SuiAddress::parse(&request.recipient)?;
        let amount_mist = to_base_units(&request.amount)?;

        log_debug!(
            MODULE,
            "Dispatching transfer",
            api = self.api.name(),
            sender = keypair.address(),
            recipient = recipient,
            amount_mist = amount_mist,
        );

        let response = match self.api {
            TransactionApi::ConvenienceSend => client.send_sui(keypair, &recipient, &request.amount).await?,
            TransactionApi::ModernBuilder => {
                let tx = build_transfer(recipient, amount_mist, request.fee_level);
                client
                    .sign_and_execute_transaction(
                        keypair,
                        &tx,
                        ExecuteOptions::default(),
                        RequestType::WaitForLocalExecution,
                    )
                    .await?
            }
            TransactionApi::LegacyBuilder { typed_pure } => {
                let block = build_legacy_transfer(recipient, amount_mist, typed_pure);
                client
                    .sign_and_execute_transaction_block(
                        keypair,
                        &block,
                        ExecuteOptions::default(),
                        RequestType::WaitForLocalExecution,
                    )
                    .await?
            }
            TransactionApi::Unsupported => {
                return Err(WalletError::no_compatible_transaction_api(
                    "No compatible transaction API found on the Sui client",
                ));
            }
        };

        let hash = result_hash(&response);
        log_debug!(MODULE, "Transfer submitted", digest = hash);
        Ok(TransactionResult::from_hash(hash))
    }
}

/// Split the amount off the gas coin and transfer it
pub fn build_transfer(recipient: SuiAddress, amount_mist: u64, fee_level: FeeLevel) -> Transaction {
    let mut tx = Transaction::new();
    tx.set_gas_budget(fee_level.gas_budget());
    let amount = tx.pure_u64(amount_mist);
    let coins = tx.split_coins(tx.gas(), vec![amount]);
    let to = tx.pure_address(recipient);
    tx.transfer_objects(coins, to);
    tx
}

/// Legacy equivalent of [`build_transfer`]; no budget is set
pub fn build_legacy_transfer(recipient: SuiAddress, amount_mist: u64, typed_pure: bool) -> TransactionBlock {
    let mut block = TransactionBlock::new();
    let amount = if typed_pure {
        block.pure_u64(amount_mist)
    } else {
        block.pure(PureValue::U64(amount_mist))
    };
    let coins = block.split_coins(block.gas(), vec![amount]);
    let to = if typed_pure {
        block.pure_address(recipient)
    } else {
        block.pure(PureValue::Address(recipient))
    };
    block.transfer_objects(coins, to);
    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tx::builder::{Argument, Command, PureEncoding};
    use serde_json::Value;

    fn caps(convenience: bool, modern: bool, legacy: bool) -> ClientCapabilities {
        ClientCapabilities {
            convenience_send: convenience,
            modern_builder: modern,
            legacy_builder: legacy,
            typed_pure: false,
        }
    }

    #[test]
    fn test_negotiation_priority() {
        assert_eq!(TransactionApi::negotiate(&caps(true, true, true)), TransactionApi::ConvenienceSend);
        assert_eq!(TransactionApi::negotiate(&caps(false, true, true)), TransactionApi::ModernBuilder);
        assert_eq!(
            TransactionApi::negotiate(&caps(false, false, true)),
            TransactionApi::LegacyBuilder { typed_pure: false }
        );
        assert_eq!(TransactionApi::negotiate(&caps(false, false, false)), TransactionApi::Unsupported);
    }

    #[test]
    fn test_result_hash_precedence() {
        let mut resp = ExecutionResponse {
            digest: Some("d".into()),
            effects_digest: Some("e".into()),
            hash: Some("h".into()),
            raw: Value::Null,
        };
        assert_eq!(result_hash(&resp), "d");
        resp.digest = None;
        assert_eq!(result_hash(&resp), "e");
        resp.effects_digest = None;
        assert_eq!(result_hash(&resp), "h");
        resp.hash = None;
        assert_eq!(result_hash(&resp), UNKNOWN_HASH);
    }

    #[test]
    fn test_transfer_budget_follows_fee_level() {
        let to = SuiAddress::new([1u8; 32]);
        assert_eq!(build_transfer(to, 1, FeeLevel::Low).gas_budget(), Some(400_000));
        assert_eq!(build_transfer(to, 1, FeeLevel::High).gas_budget(), Some(2_000_000));
    }

    #[test]
    fn test_legacy_transfer_encoding_choice() {
        let to = SuiAddress::new([1u8; 32]);
        let typed = build_legacy_transfer(to, 5, true);
        let untyped = build_legacy_transfer(to, 5, false);

        assert!(typed.pure_encodings().iter().all(|e| *e == PureEncoding::Typed));
        assert!(untyped.pure_encodings().iter().all(|e| *e == PureEncoding::Untyped));
        assert_eq!(
            typed.programmable().commands[0],
            Command::SplitCoins(Argument::GasCoin, vec![Argument::Input(0)])
        );
        assert_eq!(typed.programmable(), untyped.programmable());
    }
}
