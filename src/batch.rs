use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{debug, warn};

use crate::balance::{BalanceFetcher, BalanceRecord};

pub const DEFAULT_CONCURRENCY: usize = 8;

/// Outcome for one address in a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BatchEntry {
    Balance(BalanceRecord),
    /// `address` is the caller's input string, verbatim.
    Failed { address: String, error: String },
}

impl BatchEntry {
    pub fn balance(&self) -> Option<&BalanceRecord> {
        match self {
            BatchEntry::Balance(record) => Some(record),
            BatchEntry::Failed { .. } => None,
        }
    }

    pub fn is_err(&self) -> bool {
        matches!(self, BatchEntry::Failed { .. })
    }
}

/// Fetch every address, keeping one entry per input in input order.
///
/// Up to `concurrency` fetches are in flight at once. A failure, even a
/// panic, only ever affects its own entry.
pub async fn fetch_batch(
    fetcher: &BalanceFetcher,
    addresses: &[String],
    concurrency: usize,
) -> Vec<BatchEntry> {
    // Owned items: a borrowed `&String` here makes the future non-`Send`.
    stream::iter(addresses.iter().cloned())
        .map(|address| async move {
            let outcome = AssertUnwindSafe(fetcher.fetch_balance(&address))
                .catch_unwind()
                .await;
            match outcome {
                Ok(Ok(record)) => BatchEntry::Balance(record),
                Ok(Err(e)) => {
                    debug!(%address, error = %e, "balance fetch failed");
                    BatchEntry::Failed {
                        address,
                        error: e.to_string(),
                    }
                }
                Err(_) => {
                    warn!(%address, "balance fetch panicked");
                    BatchEntry::Failed {
                        address,
                        error: "internal error while fetching balance".to_string(),
                    }
                }
            }
        })
        .buffered(concurrency.max(1))
        .collect()
        .await
}
