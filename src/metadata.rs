//! Exchange metadata types and TTL cache
//!
//! Metadata supplies the facts every signing operation depends on: coin
//! asset ids, contract tick sizes and the collateral coin. The payload is
//! immutable once fetched and replaced wholesale on refresh; readers always
//! see either the previous or the new snapshot, never a partial one.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Deserialize;
use tokio::sync::RwLock;

use crate::error::SdkResult;

/// Exchange-wide configuration snapshot
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetaData {
    pub global: Option<GlobalSettings>,
    pub coin_list: Vec<Coin>,
    pub contract_list: Vec<Contract>,
}

impl MetaData {
    pub fn coin(&self, coin_id: &str) -> Option<&Coin> {
        self.coin_list.iter().find(|c| c.coin_id == coin_id)
    }

    pub fn contract(&self, contract_id: &str) -> Option<&Contract> {
        self.contract_list.iter().find(|c| c.contract_id == contract_id)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GlobalSettings {
    pub app_name: String,
    pub app_env: String,
    /// Coin used as L2 collateral; its asset id keys transfer hashes
    pub stark_ex_collateral_coin: Option<Coin>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Coin {
    pub coin_id: String,
    pub coin_name: String,
    pub step_size: String,
    /// L2 asset id as a hex string, exchange-assigned
    pub stark_ex_asset_id: String,
    pub stark_ex_resolution: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Contract {
    pub contract_id: String,
    pub contract_name: String,
    pub base_coin_id: String,
    pub quote_coin_id: String,
    /// Minimum price increment; its decimal scale drives price rounding
    pub tick_size: String,
    pub step_size: String,
}

struct CacheEntry {
    data: Arc<MetaData>,
    fetched_at: Instant,
}

/// Time-bounded cache around the metadata fetch
///
/// With no TTL configured every access fetches fresh. With a TTL, a cached
/// snapshot is served while `now - fetched_at < ttl` and replaced atomically
/// once the boundary is reached. A failed refresh propagates to the caller
/// and leaves the previous entry in place for the next attempt; expired data
/// is never served silently.
pub struct MetadataCache {
    ttl: Option<Duration>,
    entry: RwLock<Option<CacheEntry>>,
}

impl MetadataCache {
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            ttl,
            entry: RwLock::new(None),
        }
    }

    /// Get the current snapshot, fetching through `fetch` when needed
    pub async fn get_with<F, Fut>(&self, fetch: F) -> SdkResult<Arc<MetaData>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = SdkResult<MetaData>>,
    {
        self.get_at(Instant::now(), fetch).await
    }

    /// TTL logic with an injected clock, so boundary behavior is testable
    pub(crate) async fn get_at<F, Fut>(&self, now: Instant, fetch: F) -> SdkResult<Arc<MetaData>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = SdkResult<MetaData>>,
    {
        if let Some(ttl) = self.ttl {
            let guard = self.entry.read().await;
            if let Some(entry) = guard.as_ref() {
                if now.saturating_duration_since(entry.fetched_at) < ttl {
                    return Ok(Arc::clone(&entry.data));
                }
            }
        }

        // Concurrent callers past the boundary may each fetch; the last
        // writer wins and the swap below is atomic either way.
        let data = Arc::new(fetch().await?);
        tracing::debug!(
            coins = data.coin_list.len(),
            contracts = data.contract_list.len(),
            "metadata refreshed"
        );

        if self.ttl.is_some() {
            let mut guard = self.entry.write().await;
            *guard = Some(CacheEntry {
                data: Arc::clone(&data),
                fetched_at: now,
            });
        }
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::error::SdkError;

    fn sample_metadata(marker: &str) -> MetaData {
        MetaData {
            coin_list: vec![Coin {
                coin_id: marker.to_string(),
                ..Coin::default()
            }],
            ..MetaData::default()
        }
    }

    #[tokio::test]
    async fn no_ttl_fetches_every_time() {
        let cache = MetadataCache::new(None);
        let calls = AtomicUsize::new(0);
        for _ in 0..3 {
            cache
                .get_with(|| async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(sample_metadata("usdt"))
                })
                .await
                .unwrap();
        }
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn ttl_boundary_serves_cached_then_refetches() {
        let cache = MetadataCache::new(Some(Duration::from_secs(120)));
        let t0 = Instant::now();

        let first = cache
            .get_at(t0, || async { Ok(sample_metadata("first")) })
            .await
            .unwrap();
        assert_eq!(first.coin_list[0].coin_id, "first");

        // One second before expiry: cached entry, fetch must not run.
        let cached = cache
            .get_at(t0 + Duration::from_secs(119), || async {
                panic!("fetch must not run inside TTL")
            })
            .await
            .unwrap();
        assert_eq!(cached.coin_list[0].coin_id, "first");

        // Exactly at the boundary: refetch.
        let fresh = cache
            .get_at(t0 + Duration::from_secs(120), || async {
                Ok(sample_metadata("second"))
            })
            .await
            .unwrap();
        assert_eq!(fresh.coin_list[0].coin_id, "second");
    }

    #[tokio::test]
    async fn failed_refresh_propagates_and_keeps_prior_entry() {
        let cache = MetadataCache::new(Some(Duration::from_secs(120)));
        let t0 = Instant::now();

        cache
            .get_at(t0, || async { Ok(sample_metadata("first")) })
            .await
            .unwrap();

        // Past expiry, the fetch fails: caller sees the error, not stale data.
        let err = cache
            .get_at(t0 + Duration::from_secs(121), || async {
                Err(SdkError::Encoding("upstream down".into()))
            })
            .await
            .unwrap_err();
        assert!(matches!(err, SdkError::Encoding(_)));

        // Next attempt retries and succeeds.
        let fresh = cache
            .get_at(t0 + Duration::from_secs(122), || async {
                Ok(sample_metadata("second"))
            })
            .await
            .unwrap();
        assert_eq!(fresh.coin_list[0].coin_id, "second");
    }

    #[tokio::test]
    async fn entry_still_served_before_expiry_after_failed_refresh_elsewhere() {
        let cache = MetadataCache::new(Some(Duration::from_secs(120)));
        let t0 = Instant::now();
        cache
            .get_at(t0, || async { Ok(sample_metadata("first")) })
            .await
            .unwrap();

        // A failure at t0 (e.g. a racing duplicate fetch) leaves the entry.
        let _ = cache
            .get_at(t0 + Duration::from_secs(120), || async {
                Err(SdkError::Encoding("transient".into()))
            })
            .await;

        let still = cache
            .get_at(t0 + Duration::from_secs(60), || async {
                panic!("fetch must not run inside TTL")
            })
            .await
            .unwrap();
        assert_eq!(still.coin_list[0].coin_id, "first");
    }

    #[test]
    fn metadata_payload_decodes_from_exchange_shape() {
        let raw = r#"{
            "global": {
                "appName": "edgeX",
                "appEnv": "testnet",
                "starkExCollateralCoin": {
                    "coinId": "1000",
                    "coinName": "USDT",
                    "stepSize": "0.000001",
                    "starkExAssetId": "0x02893294412a4c8f915f75892b395ebbf6859ec246ec365c3b1f56f47c3a0a5d",
                    "starkExResolution": "0xf4240"
                }
            },
            "coinList": [{"coinId": "1000", "coinName": "USDT", "stepSize": "0.000001",
                          "starkExAssetId": "0x0289", "starkExResolution": "0xf4240"}],
            "contractList": [{"contractId": "10000001", "contractName": "BTCUSDT",
                              "baseCoinId": "1001", "quoteCoinId": "1000",
                              "tickSize": "0.1", "stepSize": "0.001"}]
        }"#;
        let md: MetaData = serde_json::from_str(raw).unwrap();
        assert_eq!(md.coin("1000").unwrap().coin_name, "USDT");
        assert_eq!(md.contract("10000001").unwrap().tick_size, "0.1");
        let collateral = md.global.unwrap().stark_ex_collateral_coin.unwrap();
        assert!(collateral.stark_ex_asset_id.starts_with("0x028932"));
    }
}
