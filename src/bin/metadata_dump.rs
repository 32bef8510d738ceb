//! Fetch and print exchange metadata
//!
//! Quick connectivity check: loads configuration from the environment,
//! fetches metadata through the signed client and logs the coin and
//! contract inventory.

use edgex_sdk::{ClientConfig, EdgexClient};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if it exists)
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter("info")
        .init();

    let config = ClientConfig::from_env()?;
    info!(base_url = %config.base_url, account_id = config.account_id, "loaded configuration");

    let client = EdgexClient::new(config)?;
    let metadata = client.metadata().await?;

    info!(
        coins = metadata.coin_list.len(),
        contracts = metadata.contract_list.len(),
        "metadata fetched"
    );
    for coin in &metadata.coin_list {
        info!(coin_id = %coin.coin_id, name = %coin.coin_name, asset_id = %coin.stark_ex_asset_id, "coin");
    }
    for contract in &metadata.contract_list {
        info!(
            contract_id = %contract.contract_id,
            name = %contract.contract_name,
            tick_size = %contract.tick_size,
            step_size = %contract.step_size,
            "contract"
        );
    }

    Ok(())
}
