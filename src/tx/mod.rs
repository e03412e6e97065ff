//! Transaction Module
//!
//! BCS serialization, programmable transaction builders, signing, and the
//! dispatcher that submits transfers through a client.

pub mod bcs;
pub mod builder;
pub mod data;
pub mod dispatcher;

pub use builder::{Argument, Command, PureEncoding, PureValue, Transaction, TransactionBlock};
pub use dispatcher::{result_hash, Dispatcher, TransactionApi, UNKNOWN_HASH};
