use ethers_core::types::U256;
use metrics::{counter, gauge};

// Metrics for monitoring
pub const METRIC_PAGES_FETCHED: &str = "airdrop_pages_fetched_total";
pub const METRIC_PAGE_RETRIES: &str = "airdrop_page_retries_total";
pub const METRIC_HOLDERS_SEEN: &str = "airdrop_holders_seen_total";
pub const METRIC_ALLOCATED_TOTAL: &str = "airdrop_allocated_total";

pub fn record_page(holders: usize) {
    counter!(METRIC_PAGES_FETCHED, 1);
    counter!(METRIC_HOLDERS_SEEN, holders as u64);
}

pub fn record_allocated_total(total: U256) {
    gauge!(METRIC_ALLOCATED_TOTAL, u256_to_f64(total));
}

/// Lossy, for gauges only.
pub fn u256_to_f64(value: U256) -> f64 {
    value
        .0
        .iter()
        .rev()
        .fold(0.0, |acc, limb| acc * 18_446_744_073_709_551_616.0 + *limb as f64)
}
