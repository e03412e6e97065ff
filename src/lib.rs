//! Sui Wallet Core Library
//!
//! Rust core of a lightweight Sui wallet.
//!
//! # Architecture
//!
//! This crate provides:
//! - **wallet**: addresses, keypairs, private-key normalization, mnemonics, amounts
//! - **tx**: BCS encoding, transaction builders, signing and the transfer dispatcher
//! - **api**: the fullnode client seam, its JSON-RPC implementation, faucet access
//! - **adapter**: the coin adapter contract and the Sui adapter
//! - **app**: the per-session application context
//!
//! # Security
//!
//! This crate uses `zeroize` to clear sensitive data from memory.
//! Private keys, seeds, and entropy are zeroed when dropped, and the logger
//! redacts key material by field name.
//!
//! # Example
//!
//! ```rust,ignore
//! use sui_wallet_core::{adapter::CoinAdapter, AppContext, CoinConfig};
//!
//! let ctx = AppContext::new(CoinConfig::default());
//! let wallet = ctx.adapter().generate_wallet().await?;
//! println!("Address: {}", wallet.address);
//! ```

pub mod adapter;
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod tx;
pub mod types;
pub mod utils;
pub mod wallet;

pub use adapter::{CoinAdapter, SuiAdapter};
pub use app::AppContext;
pub use config::CoinConfig;
pub use error::{ErrorCode, WalletError, WalletResult};
pub use types::*;
