use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;

use airdrop_kit::{
    config::WinnerConfig,
    extractor::AddressExtractor,
    utils::setup_logger,
    winners::WinnerSelector,
};

fn main() -> Result<()> {
    setup_logger()?;

    let config = WinnerConfig::from_env()?;
    let raw = fs::read_to_string(&config.input_path)
        .with_context(|| format!("reading {}", config.input_path.display()))?;
    let addresses = AddressExtractor::new().extract(&raw);

    let draw = WinnerSelector::new()
        .select_winners(&addresses, config.main_count, config.backup_count)
        .context("drawing winners")?;

    println!("{}", "Winners".green().bold());
    for address in &draw.winners {
        println!("{}", address);
    }
    println!(
        "{}",
        "Backup list, in case a winner's details turn out to be invalid".yellow().bold()
    );
    for address in &draw.backups {
        println!("{}", address);
    }

    Ok(())
}
