//! API Module
//!
//! Sui fullnode access: the client capability trait, its JSON-RPC
//! implementation, and faucet requests.

pub mod client;
pub mod faucet;
pub mod json_rpc;

pub use client::*;
pub use faucet::FaucetClient;
pub use json_rpc::JsonRpcClient;
