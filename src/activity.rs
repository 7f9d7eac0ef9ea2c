use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::Address;
use chrono::DateTime;
use futures::stream::{self, StreamExt};
use tracing::warn;

use crate::explorer::{EXPLORER_TIMEOUT, ExplorerClient};
use crate::ranking::RankedEntry;

/// Attaches last-transfer dates to ranked holders.
pub struct ActivityEnricher {
    explorer: Arc<dyn ExplorerClient>,
    token: Address,
    timeout: Duration,
    concurrency: usize,
}

impl ActivityEnricher {
    pub fn new(explorer: Arc<dyn ExplorerClient>, token: Address, concurrency: usize) -> Self {
        Self {
            explorer,
            token,
            timeout: EXPLORER_TIMEOUT,
            concurrency: concurrency.max(1),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set `last_transaction_date` on every entry. Lookups that fail, time
    /// out or find nothing leave it `None`; order and length are unchanged.
    pub async fn attach_last_activity(&self, entries: Vec<RankedEntry>) -> Vec<RankedEntry> {
        if !self.explorer.is_configured() {
            return entries
                .into_iter()
                .map(|e| RankedEntry {
                    last_transaction_date: None,
                    ..e
                })
                .collect();
        }

        stream::iter(entries)
            .map(|mut entry| async move {
                entry.last_transaction_date = self.last_activity(entry.address).await;
                entry
            })
            .buffered(self.concurrency)
            .collect()
            .await
    }

    async fn last_activity(&self, account: Address) -> Option<String> {
        let lookup = self.explorer.last_token_transfer(self.token, account);
        match tokio::time::timeout(self.timeout, lookup).await {
            Ok(Ok(Some(ts))) => iso_utc(ts),
            Ok(Ok(None)) => None,
            Ok(Err(e)) => {
                warn!(%account, error = %e, "explorer lookup failed");
                None
            }
            Err(_) => {
                warn!(%account, "explorer lookup timed out ({}s)", self.timeout.as_secs());
                None
            }
        }
    }
}

/// `1700000000` -> `"2023-11-14T22:13:20Z"`.
pub fn iso_utc(unix_secs: u64) -> Option<String> {
    let secs = i64::try_from(unix_secs).ok()?;
    DateTime::from_timestamp(secs, 0).map(|dt| dt.format("%Y-%m-%dT%H:%M:%SZ").to_string())
}
