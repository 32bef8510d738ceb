//! Market-order price estimation
//!
//! Market orders still need a signable limit price. Buys use ten times the
//! oracle price, rounded to the contract's tick precision, so the order
//! crosses the book regardless of slippage (the exchange's own max-price
//! ratio check bounds the damage server-side). Sells use the tick size
//! itself, the lowest representable price.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::{SdkError, SdkResult};
use crate::metadata::Contract;
use crate::types::{OrderSide, Ticker};

/// Multiplier applied to the oracle price for buy-side market orders
const BUY_PRICE_MULTIPLIER: u64 = 10;

/// Estimate the worst-case-acceptable price for a market order
///
/// The sell path never reads the ticker; callers may pass a default one.
pub fn market_order_price(contract: &Contract, side: OrderSide, ticker: &Ticker) -> SdkResult<String> {
    let tick_size = Decimal::from_str(&contract.tick_size).map_err(|e| {
        SdkError::Encoding(format!(
            "invalid tick size {:?} for contract {}: {e}",
            contract.tick_size, contract.contract_id
        ))
    })?;

    match side {
        OrderSide::Sell => Ok(contract.tick_size.clone()),
        OrderSide::Buy => {
            let oracle = ticker
                .oracle_price
                .as_deref()
                .filter(|p| !p.is_empty())
                .ok_or_else(|| {
                    SdkError::Encoding(format!(
                        "oracle price missing for contract {}",
                        contract.contract_id
                    ))
                })?;
            let oracle = Decimal::from_str(oracle)
                .map_err(|e| SdkError::Encoding(format!("invalid oracle price {oracle:?}: {e}")))?;
            let price = (oracle * Decimal::from(BUY_PRICE_MULTIPLIER)).round_dp(tick_size.scale());
            Ok(price.to_string())
        }
    }
}
