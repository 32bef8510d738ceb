//! edgeX exchange client SDK
//!
//! Focused on the parts with real invariants:
//! - Deterministic request signing (canonical content, Keccak-256, STARK ECDSA)
//! - L2 message hashes for withdrawals and transfers
//! - TTL-cached exchange metadata feeding hash inputs
//! - Market-order price estimation

pub mod client;
pub mod config;
pub mod error;
pub mod metadata;
pub mod pricing;
pub mod signing;
pub mod types;

pub use client::EdgexClient;
pub use config::ClientConfig;
pub use error::{SdkError, SdkResult};
pub use types::OrderSide;
