mod source;

pub use source::{HolderSource, ScopeClient};
#[cfg(test)]
pub use source::MockHolderSource;

use ethers_core::types::U256;
use indicatif::ProgressBar;
use log::{info, warn};
use std::{sync::Arc, time::Instant};
use tokio::{
    sync::{mpsc, Semaphore},
    task::JoinSet,
};

use crate::allocation::{AllocationLedger, AllocationRules};
use crate::errors::{AirdropError, Result};
use crate::metrics::record_page;
use crate::monitoring::RetryPolicy;
use crate::types::{Allocation, HolderRecord};

/// Receives every fetched page. Only the fetch coordinator calls it, so
/// implementors need no synchronization.
pub trait PageConsumer {
    fn consume(&mut self, page: u32, records: Vec<HolderRecord>) -> Result<()>;
}

/// Collects holder addresses as reported, duplicates included.
#[derive(Debug, Default)]
pub struct AddressCollector {
    addresses: Vec<String>,
}

impl AddressCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_addresses(self) -> Vec<String> {
        self.addresses
    }
}

impl PageConsumer for AddressCollector {
    fn consume(&mut self, _page: u32, records: Vec<HolderRecord>) -> Result<()> {
        self.addresses
            .extend(records.into_iter().map(|record| record.address));
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSummary {
    pub pages: u32,
    pub holders: usize,
    pub last_page_len: usize,
    pub possibly_truncated: bool,
}

struct PageBatch {
    page: u32,
    records: Vec<HolderRecord>,
}

pub struct HolderFetcher {
    source: Arc<dyn HolderSource>,
    retry: RetryPolicy,
    max_in_flight: Option<usize>,
    page_size: Option<usize>,
    progress: Option<ProgressBar>,
}

impl HolderFetcher {
    pub fn new(source: Arc<dyn HolderSource>, retry: RetryPolicy) -> Self {
        Self {
            source,
            retry,
            max_in_flight: None,
            page_size: None,
            progress: None,
        }
    }

    /// Caps concurrent requests; by default every page is in flight at once.
    pub fn with_max_in_flight(mut self, max_in_flight: Option<usize>) -> Self {
        self.max_in_flight = max_in_flight.filter(|n| *n > 0);
        self
    }

    /// Expected holders per page, used to flag a possibly truncated result.
    pub fn with_page_size(mut self, page_size: Option<usize>) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Fetches every page and allocates amounts according to `rules`.
    pub async fn fetch(
        &self,
        token: &str,
        total_pages: u32,
        rules: AllocationRules,
    ) -> Result<(Vec<Allocation>, U256)> {
        let mut ledger = AllocationLedger::new(rules);
        self.fetch_with(token, total_pages, &mut ledger).await?;
        Ok(ledger.into_parts())
    }

    /// Holder addresses only, in arrival order.
    pub async fn fetch_addresses(&self, token: &str, total_pages: u32) -> Result<Vec<String>> {
        let mut collector = AddressCollector::new();
        self.fetch_with(token, total_pages, &mut collector).await?;
        Ok(collector.into_addresses())
    }

    /// Requests pages `1..=total_pages` concurrently and feeds each result to
    /// `consumer` as it arrives. Page order is not preserved.
    pub async fn fetch_with<C: PageConsumer>(
        &self,
        token: &str,
        total_pages: u32,
        consumer: &mut C,
    ) -> Result<FetchSummary> {
        info!("Fetching {} holder pages for {}", total_pages, token);
        let start = Instant::now();

        let (tx, mut rx) = mpsc::channel::<Result<PageBatch>>(total_pages.max(1) as usize);
        let limiter = self.max_in_flight.map(|n| Arc::new(Semaphore::new(n)));
        let mut set = JoinSet::new();

        for page in 1..=total_pages {
            let source = self.source.clone();
            let retry = self.retry.clone();
            let token = token.to_string();
            let tx = tx.clone();
            let limiter = limiter.clone();

            set.spawn(async move {
                let _permit = match limiter {
                    Some(limiter) => match limiter.acquire_owned().await {
                        Ok(permit) => Some(permit),
                        Err(_) => return,
                    },
                    None => None,
                };
                let result = retry
                    .retry_with_backoff(page, || source.fetch_page(&token, page))
                    .await
                    .map(|records| PageBatch { page, records });
                // receiver gone means the fetch was abandoned
                let _ = tx.send(result).await;
            });
        }
        drop(tx);

        let mut summary = FetchSummary {
            pages: 0,
            holders: 0,
            last_page_len: 0,
            possibly_truncated: false,
        };
        // largest page other than the last one
        let mut largest_earlier = 0usize;

        while let Some(message) = rx.recv().await {
            let batch = match message {
                Ok(batch) => batch,
                Err(e) => {
                    set.abort_all();
                    return Err(e);
                }
            };

            let len = batch.records.len();
            record_page(len);
            if batch.page == total_pages {
                summary.last_page_len = len;
            } else {
                largest_earlier = largest_earlier.max(len);
            }
            summary.pages += 1;
            summary.holders += len;

            if let Err(e) = consumer.consume(batch.page, batch.records) {
                set.abort_all();
                return Err(e);
            }
            if let Some(progress) = &self.progress {
                progress.inc(1);
            }
        }

        while let Some(joined) = set.join_next().await {
            joined?;
        }

        if summary.pages != total_pages {
            return Err(AirdropError::Config(format!(
                "expected {} pages, received {}",
                total_pages, summary.pages
            )));
        }

        // Without a configured page size an earlier page is the only reference,
        // so a single-page fetch is never flagged.
        let full_page = match self.page_size {
            Some(size) => Some(size),
            None if largest_earlier > 0 => Some(largest_earlier),
            None => None,
        };
        summary.possibly_truncated = match full_page {
            Some(full) => summary.last_page_len > 0 && summary.last_page_len >= full,
            None => false,
        };
        if summary.possibly_truncated {
            warn!(
                "Last page {} returned a full page of {} holders; the holder list may be truncated, raise total_pages",
                total_pages, summary.last_page_len
            );
        }

        info!(
            "Fetched {} holders from {} pages in {:?}",
            summary.holders,
            summary.pages,
            start.elapsed()
        );
        Ok(summary)
    }
}
