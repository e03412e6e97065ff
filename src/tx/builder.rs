//! Transaction Builders
//!
//! Programmable transactions are a list of inputs plus a list of commands
//! that refer to inputs and to earlier command results by index.
//!
//! Two builder styles exist side by side:
//! - [`Transaction`]: the current builder, with an explicit gas budget
//! - [`TransactionBlock`]: the older builder, which leaves the budget to the
//!   client and may encode pure inputs untyped

use crate::tx::bcs::{BcsEncode, BcsWriter};
use crate::wallet::SuiAddress;

/// Reference to a value inside a programmable transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Argument {
    GasCoin,
    Input(u16),
    Result(u16),
    NestedResult(u16, u16),
}

impl BcsEncode for Argument {
    fn encode(&self, w: &mut BcsWriter) {
        match *self {
            Argument::GasCoin => {
                w.write_variant(0);
            }
            Argument::Input(i) => {
                w.write_variant(1).write_u16(i);
            }
            Argument::Result(i) => {
                w.write_variant(2).write_u16(i);
            }
            Argument::NestedResult(i, j) => {
                w.write_variant(3).write_u16(i).write_u16(j);
            }
        }
    }
}

/// Transaction input; only pure (BCS-encoded) values are needed for transfers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallArg {
    Pure(Vec<u8>),
}

impl BcsEncode for CallArg {
    fn encode(&self, w: &mut BcsWriter) {
        match self {
            CallArg::Pure(bytes) => {
                w.write_variant(0).write_bytes(bytes);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    TransferObjects(Vec<Argument>, Argument),
    SplitCoins(Argument, Vec<Argument>),
}

impl BcsEncode for Command {
    fn encode(&self, w: &mut BcsWriter) {
        match self {
            Command::TransferObjects(objects, recipient) => {
                w.write_variant(1).write_seq(objects);
                recipient.encode(w);
            }
            Command::SplitCoins(coin, amounts) => {
                w.write_variant(2);
                coin.encode(w);
                w.write_seq(amounts);
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgrammableTransaction {
    pub inputs: Vec<CallArg>,
    pub commands: Vec<Command>,
}

impl BcsEncode for ProgrammableTransaction {
    fn encode(&self, w: &mut BcsWriter) {
        w.write_seq(&self.inputs).write_seq(&self.commands);
    }
}

impl ProgrammableTransaction {
    fn push_input(&mut self, arg: CallArg) -> Argument {
        self.inputs.push(arg);
        Argument::Input((self.inputs.len() - 1) as u16)
    }

    fn push_command(&mut self, command: Command) -> u16 {
        self.commands.push(command);
        (self.commands.len() - 1) as u16
    }

    fn split_coins(&mut self, coin: Argument, amounts: Vec<Argument>) -> Vec<Argument> {
        let count = amounts.len() as u16;
        let index = self.push_command(Command::SplitCoins(coin, amounts));
        (0..count).map(|i| Argument::NestedResult(index, i)).collect()
    }

    fn transfer_objects(&mut self, objects: Vec<Argument>, recipient: Argument) {
        self.push_command(Command::TransferObjects(objects, recipient));
    }
}

/// A pure value for [`TransactionBlock::pure`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PureValue {
    U64(u64),
    Address(SuiAddress),
}

impl PureValue {
    fn to_bcs(self) -> Vec<u8> {
        match self {
            PureValue::U64(v) => v.to_bcs(),
            PureValue::Address(a) => a.to_bcs(),
        }
    }
}

/// How a pure input was supplied to a legacy block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PureEncoding {
    Typed,
    Untyped,
}

// =============================================================================
// Current builder
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct Transaction {
    programmable: ProgrammableTransaction,
    gas_budget: Option<u64>,
}

impl Transaction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gas budget in MIST
    pub fn set_gas_budget(&mut self, budget: u64) {
        self.gas_budget = Some(budget);
    }

    pub fn gas_budget(&self) -> Option<u64> {
        self.gas_budget
    }

    /// The coin paying for gas
    pub fn gas(&self) -> Argument {
        Argument::GasCoin
    }

    pub fn pure_u64(&mut self, value: u64) -> Argument {
        self.programmable.push_input(CallArg::Pure(value.to_bcs()))
    }

    pub fn pure_address(&mut self, address: SuiAddress) -> Argument {
        self.programmable.push_input(CallArg::Pure(address.to_bcs()))
    }

    /// Split `coin`; returns one handle per amount
    pub fn split_coins(&mut self, coin: Argument, amounts: Vec<Argument>) -> Vec<Argument> {
        self.programmable.split_coins(coin, amounts)
    }

    pub fn transfer_objects(&mut self, objects: Vec<Argument>, recipient: Argument) {
        self.programmable.transfer_objects(objects, recipient)
    }

    pub fn programmable(&self) -> &ProgrammableTransaction {
        &self.programmable
    }
}

// =============================================================================
// Legacy builder
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct TransactionBlock {
    programmable: ProgrammableTransaction,
    encodings: Vec<PureEncoding>,
}

impl TransactionBlock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gas(&self) -> Argument {
        Argument::GasCoin
    }

    /// Untyped pure input; the value's own shape decides its encoding
    pub fn pure(&mut self, value: PureValue) -> Argument {
        self.encodings.push(PureEncoding::Untyped);
        self.programmable.push_input(CallArg::Pure(value.to_bcs()))
    }

    pub fn pure_u64(&mut self, value: u64) -> Argument {
        self.encodings.push(PureEncoding::Typed);
        self.programmable.push_input(CallArg::Pure(value.to_bcs()))
    }

    pub fn pure_address(&mut self, address: SuiAddress) -> Argument {
        self.encodings.push(PureEncoding::Typed);
        self.programmable.push_input(CallArg::Pure(address.to_bcs()))
    }

    pub fn split_coins(&mut self, coin: Argument, amounts: Vec<Argument>) -> Vec<Argument> {
        self.programmable.split_coins(coin, amounts)
    }

    pub fn transfer_objects(&mut self, objects: Vec<Argument>, recipient: Argument) {
        self.programmable.transfer_objects(objects, recipient)
    }

    /// Encoding used for each pure input, in input order
    pub fn pure_encodings(&self) -> &[PureEncoding] {
        &self.encodings
    }

    pub fn programmable(&self) -> &ProgrammableTransaction {
        &self.programmable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipient() -> SuiAddress {
        SuiAddress::new([0xab; 32])
    }

    #[test]
    fn test_transfer_shape() {
        let mut tx = Transaction::new();
        tx.set_gas_budget(1_000_000);
        let amount = tx.pure_u64(1_500_000_000);
        let coins = tx.split_coins(tx.gas(), vec![amount]);
        let to = tx.pure_address(recipient());
        tx.transfer_objects(coins, to);

        let ptb = tx.programmable();
        assert_eq!(ptb.inputs.len(), 2);
        assert_eq!(
            ptb.commands,
            vec![
                Command::SplitCoins(Argument::GasCoin, vec![Argument::Input(0)]),
                Command::TransferObjects(vec![Argument::NestedResult(0, 0)], Argument::Input(1)),
            ]
        );
        assert_eq!(tx.gas_budget(), Some(1_000_000));
    }

    #[test]
    fn test_command_encoding() {
        let split = Command::SplitCoins(Argument::GasCoin, vec![Argument::Input(0)]);
        assert_eq!(split.to_bcs(), vec![2, 0, 1, 1, 0, 0]);

        let transfer = Command::TransferObjects(vec![Argument::NestedResult(0, 0)], Argument::Input(1));
        assert_eq!(transfer.to_bcs(), vec![1, 1, 3, 0, 0, 0, 0, 1, 1, 0]);
    }

    #[test]
    fn test_pure_input_encoding() {
        let arg = CallArg::Pure(7u64.to_bcs());
        assert_eq!(arg.to_bcs(), vec![0, 8, 7, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_typed_and_untyped_encode_identically() {
        let mut typed = TransactionBlock::new();
        typed.pure_u64(42);
        typed.pure_address(recipient());

        let mut untyped = TransactionBlock::new();
        untyped.pure(PureValue::U64(42));
        untyped.pure(PureValue::Address(recipient()));

        assert_eq!(typed.programmable(), untyped.programmable());
        assert_eq!(typed.pure_encodings(), &[PureEncoding::Typed, PureEncoding::Typed]);
        assert_eq!(untyped.pure_encodings(), &[PureEncoding::Untyped, PureEncoding::Untyped]);
    }
}
