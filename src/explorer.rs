use std::time::Duration;

use alloy::primitives::Address;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::address::checksum;

pub const DEFAULT_BASE_URL: &str = "https://api.polygonscan.com/api";
pub const EXPLORER_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExplorerError {
    #[error("explorer API key not configured")]
    NotConfigured,

    #[error("request failed: {0}")]
    Http(String),

    #[error("timeout ({0}s)")]
    Timeout(u64),

    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Transaction-history lookups against a block explorer.
#[async_trait]
pub trait ExplorerClient: Send + Sync {
    /// Whether a credential is present. Unconfigured clients are never called.
    fn is_configured(&self) -> bool;

    /// Unix timestamp of the newest `token` transfer touching `account`,
    /// or `None` when there is none.
    async fn last_token_transfer(
        &self,
        token: Address,
        account: Address,
    ) -> Result<Option<u64>, ExplorerError>;
}

// ── Polygonscan ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct TokenTxResponse {
    status: Option<String>,
    #[serde(default)]
    result: Value,
}

#[derive(Debug, Deserialize)]
struct TokenTx {
    #[serde(rename = "timeStamp")]
    time_stamp: Option<String>,
}

/// Etherscan-family `tokentx` endpoint (Polygonscan by default).
pub struct PolygonscanClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl PolygonscanClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
    ) -> Result<Self, ExplorerError> {
        let http = reqwest::Client::builder()
            .timeout(EXPLORER_TIMEOUT)
            .user_agent("token-ranker/0.1")
            .build()
            .map_err(|e| ExplorerError::Http(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        })
    }
}

#[async_trait]
impl ExplorerClient for PolygonscanClient {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn last_token_transfer(
        &self,
        token: Address,
        account: Address,
    ) -> Result<Option<u64>, ExplorerError> {
        let api_key = self.api_key.as_deref().ok_or(ExplorerError::NotConfigured)?;
        let token = checksum(&token);
        let account = checksum(&account);

        let resp = self
            .http
            .get(&self.base_url)
            .query(&[
                ("module", "account"),
                ("action", "tokentx"),
                ("contractaddress", token.as_str()),
                ("address", account.as_str()),
                ("page", "1"),
                ("offset", "1"),
                ("sort", "desc"),
                ("apikey", api_key),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ExplorerError::Timeout(EXPLORER_TIMEOUT.as_secs())
                } else {
                    ExplorerError::Http(e.to_string())
                }
            })?;

        let body: Value = resp
            .json()
            .await
            .map_err(|e| ExplorerError::Malformed(e.to_string()))?;
        parse_last_transfer(body)
    }
}

/// Pull the newest transfer's timestamp out of a `tokentx` response.
///
/// Any status other than `"1"` means "nothing found" (the API also uses it
/// for errors, which carry no usable timestamp either).
pub fn parse_last_transfer(body: Value) -> Result<Option<u64>, ExplorerError> {
    let resp: TokenTxResponse =
        serde_json::from_value(body).map_err(|e| ExplorerError::Malformed(e.to_string()))?;

    if resp.status.as_deref() != Some("1") {
        return Ok(None);
    }

    let txs: Vec<TokenTx> = match resp.result {
        Value::Array(_) => serde_json::from_value(resp.result)
            .map_err(|e| ExplorerError::Malformed(e.to_string()))?,
        _ => return Ok(None),
    };

    let Some(tx) = txs.into_iter().next() else {
        return Ok(None);
    };

    match tx.time_stamp {
        None => Ok(Some(0)),
        Some(ts) => ts
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| ExplorerError::Malformed(format!("bad timeStamp `{ts}`"))),
    }
}
