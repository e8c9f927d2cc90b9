use anyhow::{Context, Result};
use log::info;
use std::sync::Arc;

use airdrop_kit::{
    config::{path_from_env, CampaignConfig},
    fetcher::{HolderFetcher, ScopeClient},
    monitoring::RetryPolicy,
    output::write_address_json,
    utils::{install_metrics, page_progress, setup_logger},
};

#[tokio::main]
async fn main() -> Result<()> {
    setup_logger()?;
    let metrics = install_metrics()?;

    let config = CampaignConfig::nft_defaults().apply_env()?;
    config.validate_all()?;
    let output = path_from_env("NFT_HOLDERS_OUTPUT", "nft-holders.txt");

    let source = ScopeClient::new(&config.api_host, config.request_timeout)?;
    let progress = page_progress(config.total_pages)?;
    let fetcher = HolderFetcher::new(Arc::new(source), RetryPolicy::from(&config.retry))
        .with_max_in_flight(config.max_in_flight)
        .with_page_size(config.page_size)
        .with_progress(progress.clone());

    let addresses = fetcher
        .fetch_addresses(&config.token, config.total_pages)
        .await
        .context("fetching NFT holders")?;
    progress.finish_and_clear();

    write_address_json(&output, &addresses)
        .with_context(|| format!("writing {}", output.display()))?;

    info!("Run metrics:\n{}", metrics.render());
    Ok(())
}
