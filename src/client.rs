//! Authenticated exchange client
//!
//! Every private call is signed over the canonical content built in
//! [`crate::signing::canonical`] and carries the timestamp/signature header
//! pair. Fund-moving operations additionally sign an L2 message hash with
//! the same key through a separate signing step.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::de::DeserializeOwned;
use serde_json::json;

use crate::config::ClientConfig;
use crate::error::{SdkError, SdkResult};
use crate::metadata::{MetaData, MetadataCache};
use crate::pricing;
use crate::signing::{
    field_from_hex, nonce_from_client_id, random_client_id, scale_amount, signing_content,
    transfer_hash, withdrawal_hash, StarkSigner, TransferHashInputs,
};
use crate::types::{
    AccountAsset, ApiResponse, OrderSide, ServerTime, Ticker, TransferParams, TransferRecord,
    WithdrawalParams, WithdrawalRecord, SUCCESS_CODE,
};

/// Timestamp header, decimal milliseconds
const HEADER_TIMESTAMP: &str = "X-edgeX-Api-Timestamp";

/// Signature header, `hex(r) || hex(s)` with no separator
const HEADER_SIGNATURE: &str = "X-edgeX-Api-Signature";

/// Timeout for REST API calls (30 seconds)
const REST_TIMEOUT_SECS: u64 = 30;

/// L2 expiries are set 14 days out from submission
const L2_EXPIRY_WINDOW_MS: i64 = 14 * 24 * 60 * 60 * 1000;

const MS_PER_HOUR: i64 = 60 * 60 * 1000;

/// edgeX exchange client
pub struct EdgexClient {
    http: reqwest::Client,
    base_url: String,
    account_id: i64,
    signer: StarkSigner,
    metadata_cache: MetadataCache,
}

impl EdgexClient {
    /// Create a client, validating the private key up front
    pub fn new(config: ClientConfig) -> SdkResult<Self> {
        let signer = StarkSigner::from_hex(&config.stark_private_key)?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            account_id: config.account_id,
            signer,
            metadata_cache: MetadataCache::new(config.metadata_ttl),
        })
    }

    pub fn account_id(&self) -> i64 {
        self.account_id
    }

    /// Current timestamp in milliseconds
    fn now_ms() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0)
    }

    // =========================================================================
    // Signed transport
    // =========================================================================

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &BTreeMap<String, String>,
    ) -> SdkResult<T> {
        let timestamp = Self::now_ms();
        let content = signing_content(timestamp, "GET", path, None, query);
        let signature = self.signer.sign_content(&content)?;

        let mut request = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .header(HEADER_TIMESTAMP, timestamp.to_string())
            .header(HEADER_SIGNATURE, signature.concatenated())
            .header(reqwest::header::ACCEPT, "application/json");
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request.send().await?;
        Self::decode(response).await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> SdkResult<T> {
        let timestamp = Self::now_ms();
        let content = signing_content(timestamp, "POST", path, Some(&body), &BTreeMap::new());
        let signature = self.signer.sign_content(&content)?;

        let response = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .header(HEADER_TIMESTAMP, timestamp.to_string())
            .header(HEADER_SIGNATURE, signature.concatenated())
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> SdkResult<T> {
        let envelope: ApiResponse<T> = response.json().await?;
        if envelope.code != SUCCESS_CODE {
            return Err(SdkError::Api {
                code: envelope.code,
                message: envelope.message.unwrap_or_default(),
            });
        }
        envelope.data.ok_or_else(|| SdkError::Api {
            code: SUCCESS_CODE.to_string(),
            message: "response carried no data".to_string(),
        })
    }

    // =========================================================================
    // Public endpoints
    // =========================================================================

    /// Exchange metadata, served through the TTL cache
    pub async fn metadata(&self) -> SdkResult<Arc<MetaData>> {
        self.metadata_cache
            .get_with(|| async { self.fetch_metadata().await })
            .await
    }

    async fn fetch_metadata(&self) -> SdkResult<MetaData> {
        self.get_json("/api/v1/public/meta/getMetaData", &BTreeMap::new())
            .await
    }

    pub async fn server_time(&self) -> SdkResult<ServerTime> {
        self.get_json("/api/v1/public/meta/getServerTime", &BTreeMap::new())
            .await
    }

    /// 24-hour ticker for a contract
    pub async fn ticker_24h(&self, contract_id: &str) -> SdkResult<Vec<Ticker>> {
        let mut query = BTreeMap::new();
        query.insert("contractId".to_string(), contract_id.to_string());
        self.get_json("/api/v1/public/quote/getTicker", &query).await
    }

    // =========================================================================
    // Private endpoints
    // =========================================================================

    pub async fn account_asset(&self) -> SdkResult<AccountAsset> {
        let mut query = BTreeMap::new();
        query.insert("accountId".to_string(), self.account_id.to_string());
        self.get_json("/api/v1/private/account/getAccountAsset", &query)
            .await
    }

    /// Signable worst-case price for a market order on `contract_id`
    pub async fn market_order_price(&self, contract_id: &str, side: OrderSide) -> SdkResult<String> {
        let metadata = self.metadata().await?;
        let contract = metadata
            .contract(contract_id)
            .ok_or_else(|| SdkError::Encoding(format!("contract not found: {contract_id}")))?;

        let ticker = match side {
            OrderSide::Buy => {
                let tickers = self.ticker_24h(contract_id).await?;
                tickers.into_iter().next().ok_or_else(|| {
                    SdkError::Encoding(format!("no quote data for contract {contract_id}"))
                })?
            }
            // The sell path prices off the tick size alone.
            OrderSide::Sell => Ticker::default(),
        };
        pricing::market_order_price(contract, side, &ticker)
    }

    /// Create a withdrawal to an Ethereum address
    #[tracing::instrument(skip(self, params), fields(coin_id = %params.coin_id))]
    pub async fn create_withdrawal(&self, params: &WithdrawalParams) -> SdkResult<WithdrawalRecord> {
        let metadata = self.metadata().await?;
        let coin = metadata
            .coin(&params.coin_id)
            .ok_or_else(|| SdkError::Encoding(format!("coin not found: {}", params.coin_id)))?;

        let asset_id = field_from_hex(&coin.stark_ex_asset_id)?;
        let eth_address = field_from_hex(&params.eth_address)?;
        let amount = scale_amount(&params.amount)?;

        let client_withdraw_id = random_client_id();
        let nonce = nonce_from_client_id(&client_withdraw_id);
        let expire_time_ms = Self::now_ms() + L2_EXPIRY_WINDOW_MS;
        let expiry_hours = (expire_time_ms / MS_PER_HOUR) as u64;

        let message_hash = withdrawal_hash(
            &asset_id,
            &eth_address,
            self.account_id as u64,
            nonce,
            amount,
            expiry_hours,
        )?;
        let signature = self.signer.sign_message(&message_hash)?;
        tracing::debug!(nonce, expiry_hours, "withdrawal hash signed");

        let body = json!({
            "accountId": self.account_id.to_string(),
            "coinId": params.coin_id,
            "amount": params.amount,
            "ethAddress": params.eth_address,
            "clientWithdrawId": client_withdraw_id,
            "expireTime": expire_time_ms.to_string(),
            "l2Signature": signature.concatenated(),
        });
        self.post_json("/api/v1/private/assets/createNormalWithdraw", body)
            .await
    }

    /// Create an account-to-account transfer of collateral
    #[tracing::instrument(skip(self, params), fields(receiver = %params.receiver_account_id))]
    pub async fn create_transfer_out(&self, params: &TransferParams) -> SdkResult<TransferRecord> {
        let metadata = self.metadata().await?;
        let collateral = metadata
            .global
            .as_ref()
            .and_then(|g| g.stark_ex_collateral_coin.as_ref())
            .ok_or_else(|| SdkError::Encoding("metadata has no collateral coin".into()))?;

        let asset_id = field_from_hex(&collateral.stark_ex_asset_id)?;
        let receiver_public_key = field_from_hex(&params.receiver_l2_key).map_err(|_| {
            SdkError::Encoding(format!(
                "invalid receiver L2 key format: {}",
                params.receiver_l2_key
            ))
        })?;
        let receiver_position_id: u64 = params.receiver_account_id.parse().map_err(|e| {
            SdkError::Encoding(format!(
                "invalid receiver account id {:?}: {e}",
                params.receiver_account_id
            ))
        })?;
        let amount = scale_amount(&params.amount)?;

        let client_transfer_id = random_client_id();
        let nonce = nonce_from_client_id(&client_transfer_id);
        let expire_time_ms = Self::now_ms() + L2_EXPIRY_WINDOW_MS;
        let expiry_hours = (expire_time_ms / MS_PER_HOUR) as u64;

        let message_hash = transfer_hash(&TransferHashInputs {
            asset_id,
            fee_asset_id: starknet_crypto::FieldElement::ZERO,
            receiver_public_key,
            sender_position_id: self.account_id as u64,
            receiver_position_id,
            fee_position_id: self.account_id as u64,
            nonce,
            amount,
            max_fee: 0,
            expiry_hours,
        })?;
        let signature = self.signer.sign_message(&message_hash)?;
        tracing::debug!(nonce, expiry_hours, "transfer hash signed");

        let body = json!({
            "accountId": self.account_id.to_string(),
            "coinId": params.coin_id,
            "amount": params.amount,
            "receiverAccountId": params.receiver_account_id,
            "receiverL2Key": params.receiver_l2_key,
            "clientTransferId": client_transfer_id,
            "transferReason": params.transfer_reason,
            "l2Nonce": nonce.to_string(),
            "l2ExpireTime": expire_time_ms.to_string(),
            "l2Signature": signature.concatenated(),
        });
        self.post_json("/api/v1/private/transfer/createTransferOut", body)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_PRIVATE_KEY: &str =
        "04a266bc1e005725a278034bc4ab0f3075a7110a47d390b0b1b7841cabac0c4d";

    #[test]
    fn new_rejects_placeholder_key() {
        let config = ClientConfig::new("https://testnet.edgex.exchange", 1, "");
        assert!(matches!(EdgexClient::new(config), Err(SdkError::Config(_))));
    }

    #[test]
    fn new_accepts_valid_key() {
        let config = ClientConfig::new("https://testnet.edgex.exchange/", 42, TEST_PRIVATE_KEY);
        let client = EdgexClient::new(config).unwrap();
        assert_eq!(client.account_id(), 42);
        // Trailing slash is normalized away so paths concatenate cleanly.
        assert_eq!(client.base_url, "https://testnet.edgex.exchange");
    }

    #[test]
    fn expiry_is_truncated_to_whole_hours() {
        let expire_time_ms: i64 = 1_700_000_000_000 + L2_EXPIRY_WINDOW_MS;
        let expiry_hours = (expire_time_ms / MS_PER_HOUR) as u64;
        assert_eq!(expiry_hours, 472_558);
    }
}
