use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::address::checksum;
use crate::batch::BatchEntry;
use crate::metadata::TokenMetadata;
use crate::ranking::{DEFAULT_TOP_N, RankedEntry};

// ── Request types ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct BalanceQuery {
    pub address: String,
}

#[derive(Deserialize)]
pub struct BatchRequest {
    pub addresses: Vec<String>,
}

#[derive(Deserialize)]
pub struct TopRequest {
    pub addresses: Vec<String>,
    pub n: Option<usize>,
}

impl TopRequest {
    /// Missing or zero `n` falls back to the default.
    pub fn n(&self) -> usize {
        self.n.filter(|n| *n > 0).unwrap_or(DEFAULT_TOP_N)
    }
}

#[derive(Deserialize)]
pub struct CallContractRequest {
    pub contract_address: String,
    pub abi: Vec<Value>,
    pub method: String,
    #[serde(default)]
    pub args: Vec<Value>,
}

// ── Response types ───────────────────────────────────────────────────

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
}

#[derive(Serialize)]
pub struct BatchResponse {
    pub balances: Vec<BatchEntry>,
}

#[derive(Serialize)]
pub struct TopResponse {
    pub top: Vec<RankedEntry>,
}

/// Like [`RankedEntry`], but the date is always present (possibly `null`).
#[derive(Serialize)]
pub struct ActivityEntry {
    pub address: String,
    pub balance: f64,
    pub raw: String,
    pub last_transaction_date: Option<String>,
}

impl From<RankedEntry> for ActivityEntry {
    fn from(e: RankedEntry) -> Self {
        Self {
            address: checksum(&e.address),
            balance: e.balance,
            raw: e.raw,
            last_transaction_date: e.last_transaction_date,
        }
    }
}

#[derive(Serialize)]
pub struct TopWithActivityResponse {
    pub top: Vec<ActivityEntry>,
}

#[derive(Serialize)]
pub struct TokenInfoResponse {
    pub symbol: Option<String>,
    pub name: Option<String>,
    pub decimals: u8,
    #[serde(rename = "totalSupply")]
    pub total_supply: f64,
    #[serde(rename = "raw_totalSupply")]
    pub raw_total_supply: String,
    pub address: String,
}

impl TokenInfoResponse {
    pub fn new(metadata: &TokenMetadata, address: String) -> Self {
        Self {
            symbol: metadata.symbol.clone(),
            name: metadata.name.clone(),
            decimals: metadata.decimals,
            total_supply: metadata.total_supply,
            raw_total_supply: metadata.total_supply_raw.to_string(),
            address,
        }
    }
}

#[derive(Serialize)]
pub struct CallContractResponse {
    pub result: Value,
}
