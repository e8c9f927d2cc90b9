use anyhow::{Context, Result};
use std::fs;

use airdrop_kit::{
    config::path_from_env,
    extractor::AddressExtractor,
    output::write_address_json,
    utils::setup_logger,
};

fn main() -> Result<()> {
    setup_logger()?;

    let input = path_from_env("RAW_INPUT", "raw.txt");
    let output = path_from_env("RAW_OUTPUT", "addresses.txt");

    let raw = fs::read_to_string(&input)
        .with_context(|| format!("reading {}", input.display()))?;
    let addresses = AddressExtractor::new().extract(&raw);

    write_address_json(&output, &addresses)
        .with_context(|| format!("writing {}", output.display()))?;

    Ok(())
}
