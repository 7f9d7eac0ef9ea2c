use std::sync::Arc;

use alloy::primitives::{Address, U256};
use serde::{Serialize, Serializer};

use crate::address::{checksum, normalize};
use crate::error::{TokenError, TokenResult};
use crate::metadata::TokenMetadataCache;
use crate::node::NodeClient;
use crate::units::to_human;

/// One address's holding of the configured token.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceRecord {
    #[serde(serialize_with = "as_checksum")]
    pub address: Address,
    #[serde(serialize_with = "as_decimal")]
    pub raw_balance: U256,
    pub balance: f64,
    pub symbol: Option<String>,
}

pub(crate) fn as_checksum<S: Serializer>(address: &Address, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&checksum(address))
}

pub(crate) fn as_decimal<S: Serializer>(value: &U256, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&value.to_string())
}

/// Resolves single-address balances of one token.
pub struct BalanceFetcher {
    node: Arc<dyn NodeClient>,
    metadata: Arc<TokenMetadataCache>,
    token: Address,
}

impl BalanceFetcher {
    pub fn new(
        node: Arc<dyn NodeClient>,
        metadata: Arc<TokenMetadataCache>,
        token: Address,
    ) -> Self {
        Self {
            node,
            metadata,
            token,
        }
    }

    pub fn token(&self) -> Address {
        self.token
    }

    pub fn metadata(&self) -> &TokenMetadataCache {
        &self.metadata
    }

    /// Balance of `address` in human units.
    ///
    /// Malformed input fails with `InvalidAddress` before any node call.
    pub async fn fetch_balance(&self, address: &str) -> TokenResult<BalanceRecord> {
        let owner = normalize(address)?;

        let raw_balance = self
            .node
            .balance_of(self.token, owner)
            .await
            .map_err(|e| TokenError::from_balance_call(address, e))?;

        // decimals and symbol come from the same snapshot
        let metadata = self.metadata.get(self.token).await;

        Ok(BalanceRecord {
            address: owner,
            raw_balance,
            balance: to_human(raw_balance, metadata.decimals),
            symbol: metadata.symbol.clone(),
        })
    }
}
