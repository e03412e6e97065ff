//! Utilities Module
//!
//! Common utilities used across the crate.

pub mod http;
pub mod logging;
pub mod network_config;

pub use logging::{enable_debug, is_debug_enabled};
pub use network_config::Network;
