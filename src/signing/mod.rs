//! Request signing and L2 message hashing
//!
//! This module is organized into submodules:
//! - `canonical` - deterministic serialization of request content
//! - `signer` - Keccak-256 + STARK curve ECDSA over signing content
//! - `nonce` - client id generation and nonce derivation
//! - `starkex` - Pedersen message hashes for withdrawals and transfers
//!
//! Everything here is synchronous and pure; concurrent callers never
//! interfere. Network I/O lives in [`crate::client`].

pub mod canonical;
pub mod nonce;
pub mod signer;
pub mod starkex;

pub use canonical::{serialize_value, signing_content, signing_content_sorted_pairs};
pub use nonce::{nonce_from_client_id, random_client_id};
pub use signer::{L2Signature, StarkSigner};
pub use starkex::{field_from_hex, scale_amount, transfer_hash, withdrawal_hash, TransferHashInputs};
