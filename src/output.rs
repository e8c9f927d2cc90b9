use log::info;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::errors::{AirdropError, Result};
use crate::types::Allocation;

pub fn write_address_json(path: impl AsRef<Path>, addresses: &[String]) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, serde_json::to_string(addresses)?)?;
    info!("Wrote {} addresses to {}", addresses.len(), path.display());
    Ok(())
}

/// JSON array with one element per line, diff-friendly for target lists.
pub fn line_json(addresses: &[String]) -> Result<String> {
    Ok(serde_json::to_string(addresses)?.replace("\",\"", "\",\n\""))
}

pub fn write_line_json(path: impl AsRef<Path>, addresses: &[String]) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, line_json(addresses)?)?;
    info!("Wrote {} addresses to {}", addresses.len(), path.display());
    Ok(())
}

/// `JSON(addresses)`, a blank line, then `JSON(amounts)` as decimal strings.
pub fn parameter_batch(batch: &[Allocation]) -> Result<String> {
    let addresses: Vec<&str> = batch.iter().map(|a| a.address.as_str()).collect();
    let amounts: Vec<String> = batch.iter().map(|a| a.amount.to_string()).collect();
    Ok(format!(
        "{}\n\n{}",
        serde_json::to_string(&addresses)?,
        serde_json::to_string(&amounts)?
    ))
}

/// Splits allocations into `parameter{i}.txt` files of at most `batch_size`
/// entries for the distribution contract.
pub fn write_parameter_batches(
    dir: impl AsRef<Path>,
    allocations: &[Allocation],
    batch_size: usize,
) -> Result<Vec<PathBuf>> {
    if batch_size == 0 {
        return Err(AirdropError::Config("batch_size must be at least 1".into()));
    }
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let mut written = Vec::new();
    for (i, batch) in allocations.chunks(batch_size).enumerate() {
        let path = dir.join(format!("parameter{}.txt", i));
        fs::write(&path, parameter_batch(batch)?)?;
        written.push(path);
    }

    info!(
        "Wrote {} allocations in {} parameter files under {}",
        allocations.len(),
        written.len(),
        dir.display()
    );
    Ok(written)
}

pub fn write_allocation_csv(path: impl AsRef<Path>, allocations: &[Allocation]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path.as_ref())?;
    for allocation in allocations {
        writer.serialize(allocation)?;
    }
    writer.flush()?;
    Ok(())
}
