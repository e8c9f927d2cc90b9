//! Airdrop amount computation.
//!
//! Skip-listed pool addresses are dropped, exclusion-set addresses lose a
//! fixed deduction, and every remaining balance is scaled by a fraction
//! (80% by default) with checked `U256` arithmetic.

use ethers_core::types::U256;
use log::warn;
use std::{collections::HashSet, fs, path::Path};

use crate::config::CampaignConfig;
use crate::errors::{AirdropError, Result};
use crate::fetcher::PageConsumer;
use crate::metrics::record_allocated_total;
use crate::types::{Allocation, HolderRecord};

/// Addresses whose balance is reduced by the deduction before scaling.
#[derive(Debug, Clone, Default)]
pub struct ExclusionSet {
    addresses: HashSet<String>,
    case_insensitive: bool,
}

impl ExclusionSet {
    pub fn new<I, S>(addresses: I, case_insensitive: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let addresses = addresses
            .into_iter()
            .map(|a| normalize(a.as_ref(), case_insensitive))
            .collect();
        Self {
            addresses,
            case_insensitive,
        }
    }

    /// Reads a JSON array of addresses.
    pub fn load(path: impl AsRef<Path>, case_insensitive: bool) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let addresses: Vec<String> = serde_json::from_str(&raw)?;
        Ok(Self::new(addresses, case_insensitive))
    }

    /// Empty only when no path is configured; a configured file that cannot
    /// be read is an error.
    pub fn from_config(config: &CampaignConfig) -> Result<Self> {
        match &config.exclusion_path {
            Some(path) => Self::load(path, config.case_insensitive),
            None => Ok(Self::default()),
        }
    }

    pub fn contains(&self, address: &str) -> bool {
        self.addresses
            .contains(&normalize(address, self.case_insensitive))
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}

fn normalize(address: &str, case_insensitive: bool) -> String {
    if case_insensitive {
        address.to_lowercase()
    } else {
        address.to_string()
    }
}

#[derive(Debug, Clone)]
pub struct AllocationRules {
    skip_list: HashSet<String>,
    exclusion: ExclusionSet,
    deduction: U256,
    numerator: U256,
    denominator: U256,
}

impl AllocationRules {
    pub fn new(
        skip_list: &[String],
        exclusion: ExclusionSet,
        deduction: U256,
        numerator: U256,
        denominator: U256,
    ) -> Result<Self> {
        if denominator.is_zero() {
            return Err(AirdropError::Config("scale denominator cannot be zero".into()));
        }
        Ok(Self {
            // pool addresses are matched regardless of checksum casing
            skip_list: skip_list.iter().map(|a| a.to_lowercase()).collect(),
            exclusion,
            deduction,
            numerator,
            denominator,
        })
    }

    pub fn from_config(config: &CampaignConfig, exclusion: ExclusionSet) -> Result<Self> {
        Self::new(
            &config.skip_list,
            exclusion,
            config.deduction,
            config.scale_numerator,
            config.scale_denominator,
        )
    }

    pub fn is_skipped(&self, address: &str) -> bool {
        self.skip_list.contains(&address.to_lowercase())
    }

    /// Balance after the exclusion deduction, saturating at zero.
    pub fn adjusted_amount(&self, record: &HolderRecord) -> U256 {
        if !self.exclusion.contains(&record.address) {
            return record.amount_held;
        }
        match record.amount_held.checked_sub(self.deduction) {
            Some(adjusted) => adjusted,
            None => {
                warn!(
                    "Excluded holder {} holds {} which is below the deduction {}",
                    record.address, record.amount_held, self.deduction
                );
                U256::zero()
            }
        }
    }

    pub fn scale(&self, amount: U256) -> Result<U256> {
        amount
            .checked_mul(self.numerator)
            .ok_or(AirdropError::Overflow("scaling a holder amount"))
            .map(|scaled| scaled / self.denominator)
    }

    /// `None` for skip-listed holders.
    pub fn allocate(&self, record: &HolderRecord) -> Result<Option<Allocation>> {
        if self.is_skipped(&record.address) {
            return Ok(None);
        }
        let amount = self.scale(self.adjusted_amount(record))?;
        Ok(Some(Allocation {
            address: record.address.clone(),
            amount,
        }))
    }
}

/// Result list and running total, owned by the fetch coordinator.
#[derive(Debug)]
pub struct AllocationLedger {
    rules: AllocationRules,
    allocations: Vec<Allocation>,
    total: U256,
}

impl AllocationLedger {
    pub fn new(rules: AllocationRules) -> Self {
        Self {
            rules,
            allocations: Vec::new(),
            total: U256::zero(),
        }
    }

    pub fn record(&mut self, record: &HolderRecord) -> Result<()> {
        if let Some(allocation) = self.rules.allocate(record)? {
            self.total = self
                .total
                .checked_add(allocation.amount)
                .ok_or(AirdropError::Overflow("summing the allocated total"))?;
            self.allocations.push(allocation);
        }
        Ok(())
    }

    pub fn total(&self) -> U256 {
        self.total
    }

    pub fn into_parts(self) -> (Vec<Allocation>, U256) {
        (self.allocations, self.total)
    }
}

impl PageConsumer for AllocationLedger {
    fn consume(&mut self, _page: u32, records: Vec<HolderRecord>) -> Result<()> {
        for record in &records {
            self.record(record)?;
        }
        record_allocated_total(self.total);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn holder(address: &str, amount: u64) -> HolderRecord {
        HolderRecord {
            address: address.to_string(),
            amount_held: U256::from(amount),
        }
    }

    fn rules(exclusion: ExclusionSet) -> AllocationRules {
        let config = CampaignConfig::default();
        AllocationRules::from_config(&config, exclusion).unwrap()
    }

    #[test]
    fn test_excluded_holder_is_deducted_then_scaled() {
        let rules = rules(ExclusionSet::new(["0xEXCL"], false));
        let record = holder("0xEXCL", 2_000_000_000_000);

        assert_eq!(rules.adjusted_amount(&record), U256::from(1_000_000_000_000u64));
        let allocation = rules.allocate(&record).unwrap().unwrap();
        assert_eq!(allocation.amount, U256::from(800_000_000_000u64));
    }

    #[test]
    fn test_scaling_floors() {
        let rules = rules(ExclusionSet::default());
        assert_eq!(rules.scale(U256::from(7)).unwrap(), U256::from(5));
        assert_eq!(rules.scale(U256::from(1)).unwrap(), U256::zero());
    }

    #[test]
    fn test_skip_list_is_case_insensitive() {
        let rules = rules(ExclusionSet::default());
        let pool = holder("0x9cfc059f64d664f92f3d0329844b8ccca4e5215b", 10);
        assert!(rules.allocate(&pool).unwrap().is_none());
    }

    #[test]
    fn test_exclusion_case_modes() {
        let exact = ExclusionSet::new(["0xAbC"], false);
        assert!(exact.contains("0xAbC"));
        assert!(!exact.contains("0xabc"));

        let loose = ExclusionSet::new(["0xAbC"], true);
        assert!(loose.contains("0xabc"));
    }

    #[test]
    fn test_deduction_saturates() {
        let rules = rules(ExclusionSet::new(["0xsmall"], false));
        let record = holder("0xsmall", 5);
        assert_eq!(rules.adjusted_amount(&record), U256::zero());
    }

    #[test]
    fn test_scale_overflow_is_an_error() {
        let rules = rules(ExclusionSet::default());
        assert!(matches!(
            rules.scale(U256::MAX),
            Err(AirdropError::Overflow(_))
        ));
    }

    #[test]
    fn test_ledger_sums_non_skipped() {
        let mut ledger = AllocationLedger::new(rules(ExclusionSet::new(["0xEXCL"], false)));
        let page = vec![
            holder("0xEXCL", 2_000_000_000_000),
            holder("0x1dA9E7adfB6817D42b1c9a5321992B1EF97701Ab", 99_999),
            holder("0xplain", 1_000),
        ];

        ledger.consume(1, page).unwrap();
        assert_eq!(ledger.total(), U256::from(800_000_000_000u64 + 800));

        let (allocations, total) = ledger.into_parts();
        assert_eq!(allocations.len(), 2);
        assert_eq!(total, U256::from(800_000_000_000u64 + 800));
    }

    #[test]
    fn test_missing_exclusion_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = CampaignConfig {
            exclusion_path: Some(dir.path().join("addresses.json")),
            ..CampaignConfig::default()
        };
        assert!(matches!(
            ExclusionSet::from_config(&config),
            Err(AirdropError::Io(_))
        ));
    }

    #[test]
    fn test_exclusion_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("addresses.json");
        fs::write(&path, r#"["0xEXCL","0xOther"]"#).unwrap();

        let config = CampaignConfig {
            exclusion_path: Some(path),
            ..CampaignConfig::default()
        };
        let exclusion = ExclusionSet::from_config(&config).unwrap();
        assert_eq!(exclusion.len(), 2);
        assert!(exclusion.contains("0xEXCL"));

        let config = CampaignConfig {
            exclusion_path: None,
            ..CampaignConfig::default()
        };
        assert!(ExclusionSet::from_config(&config).unwrap().is_empty());
    }

    #[test]
    fn test_zero_denominator_rejected() {
        let result = AllocationRules::new(
            &[],
            ExclusionSet::default(),
            U256::zero(),
            U256::from(8),
            U256::zero(),
        );
        assert!(result.is_err());
    }
}
