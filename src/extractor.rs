use log::debug;
use std::collections::HashSet;

use crate::types::{has_address_len, has_address_shape};

/// Pulls unique addresses out of free-form text, one candidate per line.
#[derive(Debug, Clone, Default)]
pub struct AddressExtractor {
    case_insensitive: bool,
}

impl AddressExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare lowercased forms; the first spelling seen is kept.
    pub fn case_insensitive(mut self, enabled: bool) -> Self {
        self.case_insensitive = enabled;
        self
    }

    /// Lines must start with `0x` before trimming and be 42 characters after.
    pub fn extract(&self, text: &str) -> Vec<String> {
        let mut list = AddressList::new(self.case_insensitive);
        for line in text.split('\n') {
            if !line.starts_with("0x") {
                continue;
            }
            let candidate = line.trim();
            if has_address_shape(candidate) {
                list.push(candidate);
            } else {
                debug!("Skipping malformed address line: {:?}", line);
            }
        }
        list.into_vec()
    }

    /// Keeps 42-character entries of a JSON target list, first seen wins.
    pub fn dedup_targets<S: AsRef<str>>(&self, targets: &[S]) -> Vec<String> {
        let mut list = AddressList::new(self.case_insensitive);
        for target in targets {
            let target = target.as_ref();
            if has_address_len(target) {
                list.push(target);
            }
        }
        list.into_vec()
    }
}

/// Ordered, duplicate-free address list.
#[derive(Debug, Clone, Default)]
pub struct AddressList {
    items: Vec<String>,
    seen: HashSet<String>,
    case_insensitive: bool,
}

impl AddressList {
    pub fn new(case_insensitive: bool) -> Self {
        Self {
            case_insensitive,
            ..Self::default()
        }
    }

    /// Returns false when the address was already present.
    pub fn push(&mut self, address: &str) -> bool {
        let key = if self.case_insensitive {
            address.to_lowercase()
        } else {
            address.to_string()
        };
        if !self.seen.insert(key) {
            return false;
        }
        self.items.push(address.to_string());
        true
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.items
    }
}
