use std::sync::Arc;

use alloy::primitives::Address;
use serde_json::Value;

use crate::activity::ActivityEnricher;
use crate::address::normalize;
use crate::balance::{BalanceFetcher, BalanceRecord};
use crate::batch::{self, BatchEntry};
use crate::contract_call;
use crate::error::{TokenError, TokenResult};
use crate::explorer::ExplorerClient;
use crate::metadata::{TokenMetadata, TokenMetadataCache};
use crate::node::NodeClient;
use crate::ranking::{self, RankedEntry};

/// Every query the service answers, for one configured token.
pub struct TokenService {
    node: Arc<dyn NodeClient>,
    fetcher: BalanceFetcher,
    enricher: ActivityEnricher,
    concurrency: usize,
}

impl TokenService {
    pub fn new(
        node: Arc<dyn NodeClient>,
        explorer: Arc<dyn ExplorerClient>,
        token: Address,
        concurrency: usize,
    ) -> Self {
        let cache = Arc::new(TokenMetadataCache::new(Arc::clone(&node)));
        Self::with_cache(node, explorer, token, cache, concurrency)
    }

    pub fn with_cache(
        node: Arc<dyn NodeClient>,
        explorer: Arc<dyn ExplorerClient>,
        token: Address,
        cache: Arc<TokenMetadataCache>,
        concurrency: usize,
    ) -> Self {
        Self {
            fetcher: BalanceFetcher::new(Arc::clone(&node), cache, token),
            enricher: ActivityEnricher::new(explorer, token, concurrency),
            node,
            concurrency,
        }
    }

    pub fn token(&self) -> Address {
        self.fetcher.token()
    }

    pub async fn balance(&self, address: &str) -> TokenResult<BalanceRecord> {
        self.fetcher.fetch_balance(address).await
    }

    pub async fn balances(&self, addresses: &[String]) -> Vec<BatchEntry> {
        batch::fetch_batch(&self.fetcher, addresses, self.concurrency).await
    }

    pub async fn top(&self, addresses: &[String], n: usize) -> TokenResult<Vec<RankedEntry>> {
        if n == 0 {
            return Err(TokenError::InvalidArgument("n must be a positive integer".into()));
        }
        let entries = self.balances(addresses).await;
        Ok(ranking::rank(&entries, n))
    }

    pub async fn top_with_activity(
        &self,
        addresses: &[String],
        n: usize,
    ) -> TokenResult<Vec<RankedEntry>> {
        let top = self.top(addresses, n).await?;
        Ok(self.enricher.attach_last_activity(top).await)
    }

    pub async fn token_info(&self) -> Arc<TokenMetadata> {
        self.fetcher.metadata().get(self.token()).await
    }

    pub async fn latest_block(&self) -> TokenResult<u64> {
        self.node
            .block_number()
            .await
            .map_err(|e| TokenError::UpstreamUnavailable(e.to_string()))
    }

    /// Proxy an arbitrary view call. Nothing here is cached.
    pub async fn call_contract(
        &self,
        contract: &str,
        abi: &[Value],
        method: &str,
        args: &[Value],
    ) -> TokenResult<Value> {
        let contract = normalize(contract)?;
        let abi = contract_call::parse_abi(abi)?;
        contract_call::invoke(self.node.as_ref(), contract, &abi, method, args).await
    }
}
