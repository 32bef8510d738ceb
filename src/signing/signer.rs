//! STARK curve request signer
//!
//! Hashes signing content with Keccak-256, reduces the digest into the curve
//! order and signs with the deterministic (RFC 6979) STARK ECDSA. The same
//! content and key always produce the same signature, which is what makes
//! idempotent retries safe.

use num_bigint::BigUint;
use sha3::{Digest, Keccak256};
use starknet_core::types::Felt;
use starknet_crypto::FieldElement;
use starknet_signers::SigningKey;

use crate::error::{SdkError, SdkResult};

/// Order of the STARK curve subgroup the exchange's L2 verifies against
const CURVE_ORDER_HEX: &str = "0800000000000010ffffffffffffffffb781126dcae7b2321e66a241adc64d2f";

/// An (r, s) signature pair, each left-padded to 32 bytes and hex encoded
///
/// The exchange's protocol carries no recovery byte; the transmitted form is
/// the bare concatenation `r || s` (128 hex chars).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct L2Signature {
    pub r: String,
    pub s: String,
}

impl L2Signature {
    /// Concatenated form used for the signature header and `l2Signature` body fields
    pub fn concatenated(&self) -> String {
        format!("{}{}", self.r, self.s)
    }
}

/// Signer owning the account's STARK private key
pub struct StarkSigner {
    key: SigningKey,
}

impl StarkSigner {
    /// Parse a private key from hex, with or without `0x` prefix
    ///
    /// An empty or all-zero key is a configuration error: placeholder
    /// credentials must never reach the signing path.
    pub fn from_hex(private_key: &str) -> SdkResult<Self> {
        let trimmed = private_key.trim().trim_start_matches("0x");
        if trimmed.is_empty() || trimmed.bytes().all(|b| b == b'0') {
            return Err(SdkError::Config("stark private key not set".into()));
        }
        let scalar = Felt::from_hex(&format!("0x{trimmed}"))
            .map_err(|e| SdkError::Config(format!("invalid stark private key: {e}")))?;
        Ok(Self {
            key: SigningKey::from_secret_scalar(scalar),
        })
    }

    /// Sign request-level content (timestamp + method + path + params)
    #[tracing::instrument(skip(self, content), fields(content_len = content.len()))]
    pub fn sign_content(&self, content: &str) -> SdkResult<L2Signature> {
        let scalar = reduced_keccak(content);
        tracing::debug!(message_scalar = %format!("{scalar:#x}"), "signing request content");
        self.sign_scalar(scalar)
    }

    /// Sign an already-built L2 message hash (withdrawal / transfer)
    pub fn sign_message(&self, message_hash: &FieldElement) -> SdkResult<L2Signature> {
        let scalar = Felt::from_bytes_be(&message_hash.to_bytes_be());
        self.sign_scalar(scalar)
    }

    fn sign_scalar(&self, scalar: Felt) -> SdkResult<L2Signature> {
        let signature = self
            .key
            .sign(&scalar)
            .map_err(|e| SdkError::Signing(format!("stark curve signing failed: {e}")))?;
        Ok(L2Signature {
            r: hex::encode(signature.r.to_bytes_be()),
            s: hex::encode(signature.s.to_bytes_be()),
        })
    }
}

/// Keccak-256 of the content, reduced modulo the curve order
fn reduced_keccak(content: &str) -> Felt {
    let mut hasher = Keccak256::new();
    hasher.update(content.as_bytes());
    let digest = hasher.finalize();

    let order = BigUint::parse_bytes(CURVE_ORDER_HEX.as_bytes(), 16)
        .expect("curve order constant is valid hex");
    let reduced = BigUint::from_bytes_be(&digest) % order;

    let bytes = reduced.to_bytes_be();
    let mut buf = [0u8; 32];
    buf[32 - bytes.len()..].copy_from_slice(&bytes);
    Felt::from_bytes_be(&buf)
}
