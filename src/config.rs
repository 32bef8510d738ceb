//! Client configuration and environment loading
//!
//! The SDK is configured the same way its callers deploy it: a handful of
//! environment variables, loaded through `dotenvy` by the binary. Placeholder
//! credentials are rejected here rather than failing later with an opaque
//! exchange error.

use std::time::Duration;

use crate::error::{SdkError, SdkResult};

/// Configuration for an [`crate::client::EdgexClient`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// REST base URL, scheme and host only (e.g. `https://pro.edgex.exchange`)
    pub base_url: String,
    /// Exchange-assigned account id (also the L2 position id)
    pub account_id: i64,
    /// STARK curve private key as a hex string, with or without `0x` prefix
    pub stark_private_key: String,
    /// Metadata cache TTL. `None` disables caching and fetches on every access.
    pub metadata_ttl: Option<Duration>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, account_id: i64, stark_private_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            account_id,
            stark_private_key: stark_private_key.into(),
            metadata_ttl: None,
        }
    }

    /// Enable metadata caching with the given TTL
    pub fn with_metadata_ttl(mut self, ttl: Duration) -> Self {
        self.metadata_ttl = Some(ttl);
        self
    }

    /// Create configuration from environment variables
    ///
    /// Reads `EDGEX_BASE_URL`, `EDGEX_ACCOUNT_ID`, `EDGEX_STARK_PRIVATE_KEY`
    /// and the optional `EDGEX_METADATA_TTL_SECS`.
    pub fn from_env() -> SdkResult<Self> {
        let base_url = std::env::var("EDGEX_BASE_URL")
            .map_err(|_| SdkError::Config("EDGEX_BASE_URL not set".into()))?;

        let account_id: i64 = std::env::var("EDGEX_ACCOUNT_ID")
            .map_err(|_| SdkError::Config("EDGEX_ACCOUNT_ID not set".into()))?
            .parse()
            .map_err(|e| SdkError::Config(format!("invalid EDGEX_ACCOUNT_ID: {e}")))?;

        let stark_private_key = std::env::var("EDGEX_STARK_PRIVATE_KEY")
            .map_err(|_| SdkError::Config("EDGEX_STARK_PRIVATE_KEY not set".into()))?;
        if stark_private_key.trim().is_empty() {
            return Err(SdkError::Config("EDGEX_STARK_PRIVATE_KEY is empty".into()));
        }

        let metadata_ttl = match std::env::var("EDGEX_METADATA_TTL_SECS") {
            Ok(raw) => {
                let secs: u64 = raw
                    .parse()
                    .map_err(|e| SdkError::Config(format!("invalid EDGEX_METADATA_TTL_SECS: {e}")))?;
                Some(Duration::from_secs(secs))
            }
            Err(_) => None,
        };

        Ok(Self {
            base_url,
            account_id,
            stark_private_key,
            metadata_ttl,
        })
    }
}
