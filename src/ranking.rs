use alloy::primitives::Address;
use serde::Serialize;

use crate::balance::as_checksum;
use crate::batch::BatchEntry;

pub const DEFAULT_TOP_N: usize = 10;

/// A holder's position in a top-N ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    #[serde(serialize_with = "as_checksum")]
    pub address: Address,
    pub balance: f64,
    /// Raw balance as a decimal string.
    pub raw: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_transaction_date: Option<String>,
}

/// Rank successful entries by balance, highest first, keeping at most `n`.
///
/// Failed entries and non-finite balances are dropped. The sort is stable,
/// so equal balances keep their input order.
pub fn rank(entries: &[BatchEntry], n: usize) -> Vec<RankedEntry> {
    let mut ranked: Vec<RankedEntry> = entries
        .iter()
        .filter_map(BatchEntry::balance)
        .filter(|record| record.balance.is_finite())
        .map(|record| RankedEntry {
            address: record.address,
            balance: record.balance,
            raw: record.raw_balance.to_string(),
            last_transaction_date: None,
        })
        .collect();

    ranked.sort_by(|a, b| b.balance.total_cmp(&a.balance));
    ranked.truncate(n);
    ranked
}
