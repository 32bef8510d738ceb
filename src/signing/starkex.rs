//! L2 message hashes for withdrawals and transfers
//!
//! The settlement layer verifies signatures against Pedersen hashes over
//! tightly packed field elements. Field selection, ordering, scaling and
//! truncation here must match the layer's own reconstruction exactly; a
//! single wrong field produces a hash the exchange never rebuilds, which is
//! indistinguishable from an invalid signature.

use num_bigint::BigUint;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use starknet_crypto::{pedersen_hash, FieldElement};

use crate::error::{SdkError, SdkResult};

/// Packed-message prefix for a withdrawal settling to an Ethereum address
const WITHDRAWAL_TO_ADDRESS_PREFIX: u64 = 7;

/// Packed-message prefix for an account-to-account transfer
const TRANSFER_PREFIX: u64 = 4;

/// Fixed decimal resolution of collateral amounts on the settlement layer
const AMOUNT_DECIMALS: u32 = 6;

/// Parse a hex string (asset id, L2 key, eth address) into a field element
pub fn field_from_hex(value: &str) -> SdkResult<FieldElement> {
    if value.trim().is_empty() {
        return Err(SdkError::Encoding("empty hex field value".into()));
    }
    FieldElement::from_hex_be(value)
        .map_err(|e| SdkError::Encoding(format!("invalid hex field value {value:?}: {e}")))
}

fn field_from_biguint(value: &BigUint) -> SdkResult<FieldElement> {
    let bytes = value.to_bytes_be();
    if bytes.len() > 32 {
        return Err(SdkError::Encoding("packed message exceeds field size".into()));
    }
    FieldElement::from_byte_slice_be(&bytes)
        .map_err(|e| SdkError::Encoding(format!("packed message is not a field element: {e}")))
}

/// Scale a decimal amount string into integer settlement units
///
/// Multiplies by 10^6 and truncates toward zero; fractional sub-units are
/// dropped, never rounded up. Negative amounts are rejected.
pub fn scale_amount(amount: &str) -> SdkResult<u64> {
    let parsed = Decimal::from_str_exact(amount)
        .map_err(|e| SdkError::Encoding(format!("invalid amount {amount:?}: {e}")))?;
    if parsed.is_sign_negative() {
        return Err(SdkError::Encoding(format!("negative amount {amount:?}")));
    }
    let scaled = (parsed * Decimal::from(10u64.pow(AMOUNT_DECIMALS))).floor();
    scaled
        .to_u64()
        .ok_or_else(|| SdkError::Encoding(format!("amount {amount:?} out of range")))
}

/// Hash for a withdrawal settling to an Ethereum address
///
/// Packed layout: prefix(7) | position_id:64 | nonce:32 | amount:64 |
/// expiry_hours:32, left-shifted 49 bits; hashed as
/// `pedersen(pedersen(asset_id, eth_address), packed)`.
pub fn withdrawal_hash(
    asset_id: &FieldElement,
    eth_address: &FieldElement,
    position_id: u64,
    nonce: u32,
    amount: u64,
    expiry_hours: u64,
) -> SdkResult<FieldElement> {
    let mut packed = BigUint::from(WITHDRAWAL_TO_ADDRESS_PREFIX);
    packed = (packed << 64) | BigUint::from(position_id);
    packed = (packed << 32) | BigUint::from(nonce);
    packed = (packed << 64) | BigUint::from(amount);
    packed = (packed << 32) | BigUint::from(expiry_hours);
    packed <<= 49;
    let packed = field_from_biguint(&packed)?;

    Ok(pedersen_hash(&pedersen_hash(asset_id, eth_address), &packed))
}

/// Ordered inputs for a transfer hash
///
/// The fee position mirrors the sender position and the fee asset/max fee
/// are zero: the exchange charges no L2 fee on internal transfers but the
/// fields still participate in the packing.
#[derive(Debug, Clone)]
pub struct TransferHashInputs {
    pub asset_id: FieldElement,
    pub fee_asset_id: FieldElement,
    pub receiver_public_key: FieldElement,
    pub sender_position_id: u64,
    pub receiver_position_id: u64,
    pub fee_position_id: u64,
    pub nonce: u32,
    pub amount: u64,
    pub max_fee: u64,
    pub expiry_hours: u64,
}

/// Hash for an account-to-account transfer
///
/// `pedersen` chain over asset_id, fee_asset_id, receiver key, then two
/// packed words: positions+nonce and prefix(4)+amount+max_fee+expiry
/// (left-shifted 81 bits).
pub fn transfer_hash(inputs: &TransferHashInputs) -> SdkResult<FieldElement> {
    let mut packed0 = BigUint::from(inputs.sender_position_id);
    packed0 = (packed0 << 64) | BigUint::from(inputs.receiver_position_id);
    packed0 = (packed0 << 64) | BigUint::from(inputs.fee_position_id);
    packed0 = (packed0 << 32) | BigUint::from(inputs.nonce);
    let packed0 = field_from_biguint(&packed0)?;

    let mut packed1 = BigUint::from(TRANSFER_PREFIX);
    packed1 = (packed1 << 64) | BigUint::from(inputs.amount);
    packed1 = (packed1 << 64) | BigUint::from(inputs.max_fee);
    packed1 = (packed1 << 32) | BigUint::from(inputs.expiry_hours);
    packed1 <<= 81;
    let packed1 = field_from_biguint(&packed1)?;

    let chained = pedersen_hash(
        &pedersen_hash(
            &pedersen_hash(&inputs.asset_id, &inputs.fee_asset_id),
            &inputs.receiver_public_key,
        ),
        &packed0,
    );
    Ok(pedersen_hash(&chained, &packed1))
}
