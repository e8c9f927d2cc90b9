use anyhow::{Context, Result};
use std::fs;

use airdrop_kit::{
    config::path_from_env,
    extractor::AddressExtractor,
    output::write_line_json,
    utils::setup_logger,
};

fn main() -> Result<()> {
    setup_logger()?;

    let input = path_from_env("YEAREND_INPUT", "yearend-airdrop-targets.json");
    let output = path_from_env("YEAREND_OUTPUT", "yearend-airdrop-new-targets.json");

    let raw = fs::read_to_string(&input)
        .with_context(|| format!("reading {}", input.display()))?;
    let targets: Vec<String> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing {}", input.display()))?;

    let unique = AddressExtractor::new().dedup_targets(&targets);
    log::info!("{} of {} targets kept", unique.len(), targets.len());

    write_line_json(&output, &unique)
        .with_context(|| format!("writing {}", output.display()))?;

    Ok(())
}
