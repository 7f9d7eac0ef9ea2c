use std::time::Duration;

use alloy::primitives::Address;
use anyhow::{Context, Result, bail};

use crate::address::normalize;
use crate::batch::DEFAULT_CONCURRENCY;
use crate::explorer;

pub const DEFAULT_RPC_URL: &str = "https://polygon-rpc.com";
pub const DEFAULT_TOKEN_ADDRESS: &str = "0x1a9b54a3075119f1546c52ca0940551a6ce5d2d0";

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub rpc_url: reqwest::Url,
    pub token_address: Address,
    pub explorer_api_key: Option<String>,
    pub explorer_base_url: String,
    pub rpc_timeout: Duration,
    pub concurrency: usize,
}

impl Config {
    /// Read from the environment (call `dotenvy::dotenv()` first to pick up `.env`).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let rpc_url = get("POLYGON_RPC_URL").unwrap_or_else(|| DEFAULT_RPC_URL.to_string());
        let rpc_url: reqwest::Url = rpc_url
            .parse()
            .with_context(|| format!("POLYGON_RPC_URL is not a valid URL: {rpc_url}"))?;

        let token = get("TOKEN_ADDRESS").unwrap_or_else(|| DEFAULT_TOKEN_ADDRESS.to_string());
        let token_address = normalize(&token).context("TOKEN_ADDRESS")?;

        let rpc_timeout = match get("RPC_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(v.parse().with_context(|| {
                format!("RPC_TIMEOUT_SECS must be a whole number, got `{v}`")
            })?),
            None => Duration::from_secs(10),
        };

        let concurrency = match get("FETCH_CONCURRENCY") {
            Some(v) => v
                .parse::<usize>()
                .with_context(|| format!("FETCH_CONCURRENCY must be a whole number, got `{v}`"))?,
            None => DEFAULT_CONCURRENCY,
        };
        if concurrency == 0 {
            bail!("FETCH_CONCURRENCY must be at least 1");
        }

        Ok(Config {
            rpc_url,
            token_address,
            explorer_api_key: get("POLYGONSCAN_API_KEY"),
            explorer_base_url: get("POLYGONSCAN_BASE")
                .unwrap_or_else(|| explorer::DEFAULT_BASE_URL.to_string()),
            rpc_timeout,
            concurrency,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn from_map(pairs: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = from_map(&[]).unwrap();
        assert_eq!(cfg.rpc_url.as_str(), "https://polygon-rpc.com/");
        assert_eq!(
            cfg.token_address.to_checksum(None).to_lowercase(),
            DEFAULT_TOKEN_ADDRESS
        );
        assert_eq!(cfg.explorer_api_key, None);
        assert_eq!(cfg.explorer_base_url, explorer::DEFAULT_BASE_URL);
        assert_eq!(cfg.rpc_timeout, Duration::from_secs(10));
        assert_eq!(cfg.concurrency, DEFAULT_CONCURRENCY);
    }

    #[test]
    fn test_overrides_and_blank_key() {
        let cfg = from_map(&[
            ("POLYGON_RPC_URL", "http://localhost:8545"),
            ("POLYGONSCAN_API_KEY", ""),
            ("RPC_TIMEOUT_SECS", "3"),
            ("FETCH_CONCURRENCY", "2"),
        ])
        .unwrap();
        assert_eq!(cfg.rpc_url.port(), Some(8545));
        assert_eq!(cfg.explorer_api_key, None);
        assert_eq!(cfg.rpc_timeout, Duration::from_secs(3));
        assert_eq!(cfg.concurrency, 2);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(from_map(&[("TOKEN_ADDRESS", "0x1234")]).is_err());
        assert!(from_map(&[("POLYGON_RPC_URL", "not a url")]).is_err());
        assert!(from_map(&[("FETCH_CONCURRENCY", "0")]).is_err());
        assert!(from_map(&[("RPC_TIMEOUT_SECS", "soon")]).is_err());
    }
}
