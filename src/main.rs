use anyhow::{Context, Result};
use log::info;
use std::sync::Arc;

use airdrop_kit::{
    allocation::{AllocationRules, ExclusionSet},
    config::CampaignConfig,
    fetcher::{HolderFetcher, ScopeClient},
    monitoring::RetryPolicy,
    output::{write_allocation_csv, write_parameter_batches},
    utils::{install_metrics, page_progress, setup_logger},
};

#[tokio::main]
async fn main() -> Result<()> {
    setup_logger()?;
    let metrics = install_metrics()?;

    let config = CampaignConfig::from_env()?;
    config.validate_all()?;

    let exclusion = ExclusionSet::from_config(&config).with_context(|| {
        format!(
            "loading exclusion list {:?} (set AIRDROP_EXCLUSION_PATH=none to run without one)",
            config.exclusion_path
        )
    })?;
    info!("{} addresses in the exclusion list", exclusion.len());

    let rules = AllocationRules::from_config(&config, exclusion)?;
    let source = ScopeClient::new(&config.api_host, config.request_timeout)?;
    let progress = page_progress(config.total_pages)?;

    let fetcher = HolderFetcher::new(Arc::new(source), RetryPolicy::from(&config.retry))
        .with_max_in_flight(config.max_in_flight)
        .with_page_size(config.page_size)
        .with_progress(progress.clone());

    let (allocations, total) = fetcher
        .fetch(&config.token, config.total_pages, rules)
        .await
        .context("fetching token holders")?;
    progress.finish_and_clear();

    println!("{}", total);

    write_parameter_batches(&config.output_dir, &allocations, config.batch_size)
        .context("writing parameter files")?;
    if let Some(report) = &config.report_path {
        write_allocation_csv(report, &allocations).context("writing allocation report")?;
    }

    info!("Run metrics:\n{}", metrics.render());
    Ok(())
}
