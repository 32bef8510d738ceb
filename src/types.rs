//! API response types and request parameters
//!
//! Only the fields the SDK consumes are modeled; unknown fields in exchange
//! payloads are ignored and the numeric ones stay strings, exactly as the
//! exchange transmits them.

use serde::Deserialize;

/// Business-level success code used by every endpoint
pub const SUCCESS_CODE: &str = "SUCCESS";

/// Envelope wrapping every exchange response
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub code: String,
    pub data: Option<T>,
    #[serde(rename = "msg")]
    pub message: Option<String>,
}

/// Order side for price estimation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSide::Buy => "BUY",
            OrderSide::Sell => "SELL",
        }
    }
}

/// Server clock reading
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerTime {
    pub time_millis: String,
}

/// 24-hour ticker entry; only pricing-relevant fields are kept
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Ticker {
    pub contract_id: Option<String>,
    pub last_price: Option<String>,
    pub index_price: Option<String>,
    /// Oracle price feeding market-order price estimation
    pub oracle_price: Option<String>,
    pub high_price: Option<String>,
    pub low_price: Option<String>,
}

/// Collateral balance entry
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Collateral {
    pub coin_id: String,
    pub amount: String,
}

/// Open position entry
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Position {
    pub contract_id: String,
    pub open_size: String,
    pub open_value: String,
}

/// Account asset snapshot
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccountAsset {
    pub position_list: Vec<Position>,
    pub collateral_list: Vec<Collateral>,
}

/// Parameters for creating a withdrawal
#[derive(Debug, Clone)]
pub struct WithdrawalParams {
    pub coin_id: String,
    /// Human-readable amount (e.g. "1.5"); scaled to L2 units when hashed
    pub amount: String,
    /// Destination Ethereum address, hex
    pub eth_address: String,
}

/// Accepted withdrawal record
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WithdrawalRecord {
    pub id: Option<String>,
    pub account_id: Option<String>,
    pub coin_id: Option<String>,
    pub amount: Option<String>,
    pub receiver_address: Option<String>,
    pub client_withdraw_id: Option<String>,
    pub status: Option<String>,
}

/// Parameters for creating an account-to-account transfer
#[derive(Debug, Clone)]
pub struct TransferParams {
    pub coin_id: String,
    /// Human-readable amount; scaled to L2 units when hashed
    pub amount: String,
    /// Receiver account id as a decimal string
    pub receiver_account_id: String,
    /// Receiver L2 public key, hex
    pub receiver_l2_key: String,
    pub transfer_reason: String,
}

/// Accepted transfer record
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransferRecord {
    pub id: Option<String>,
    pub account_id: Option<String>,
    pub coin_id: Option<String>,
    pub amount: Option<String>,
    pub receiver_account_id: Option<String>,
    pub receiver_l2_key: Option<String>,
    pub client_transfer_id: Option<String>,
    pub status: Option<String>,
}
