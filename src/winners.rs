use log::info;
use rand::{seq::SliceRandom, Rng};

use crate::errors::{AirdropError, Result};
use crate::extractor::AddressList;
use crate::types::WinnerDraw;

/// Uniform draw without replacement over distinct addresses. Balances play
/// no part.
pub struct WinnerSelector<R: Rng> {
    rng: R,
}

impl WinnerSelector<rand::rngs::ThreadRng> {
    pub fn new() -> Self {
        Self::with_rng(rand::thread_rng())
    }
}

impl Default for WinnerSelector<rand::rngs::ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> WinnerSelector<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// The first `main_count` picks are winners, the next `backup_count`
    /// form the waitlist.
    pub fn select_winners<S: AsRef<str>>(
        &mut self,
        addresses: &[S],
        main_count: usize,
        backup_count: usize,
    ) -> Result<WinnerDraw> {
        let mut list = AddressList::new(false);
        for address in addresses {
            list.push(address.as_ref());
        }
        let mut pool = list.into_vec();
        let available = pool.len();

        let requested = main_count
            .checked_add(backup_count)
            .ok_or(AirdropError::Overflow("counting requested winners"))?;
        if requested > available {
            return Err(AirdropError::InsufficientPool {
                requested,
                available,
            });
        }

        let (picked, _) = pool.partial_shuffle(&mut self.rng, requested);
        let (winners, backups) = picked.split_at(main_count);

        info!(
            "Drew {} winners and {} backups from {} addresses",
            winners.len(),
            backups.len(),
            available
        );

        Ok(WinnerDraw {
            winners: winners.to_vec(),
            backups: backups.to_vec(),
        })
    }
}
