use std::future::IntoFuture;
use std::time::Duration;

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::sol;
use async_trait::async_trait;
use thiserror::Error;

// ── ERC20 contract interface ───────────────────────────────────────

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    contract IERC20 {
        function balanceOf(address account) external view returns (uint256);
        function decimals() external view returns (uint8);
        function symbol() external view returns (string);
        function name() external view returns (string);
        function totalSupply() external view returns (uint256);
    }
}

// ── Errors ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NodeError {
    /// The node could not be reached or the transport failed.
    #[error("transport error: {0}")]
    Transport(String),

    #[error("timeout ({0}s)")]
    Timeout(u64),

    /// The node answered with an execution error (revert, missing method).
    #[error("call reverted: {0}")]
    Reverted(String),

    /// The node answered but the output could not be decoded.
    #[error("cannot decode output: {0}")]
    Decode(String),

    #[error("unsupported: {0}")]
    Unsupported(&'static str),
}

pub type NodeResult<T> = Result<T, NodeError>;

// ── Node client capability ─────────────────────────────────────────

/// Read-only access to a blockchain node.
///
/// The ERC20 view methods are typed so callers never touch ABI encoding;
/// `eth_call` is the raw capability the contract passthrough is built on.
#[async_trait]
pub trait NodeClient: Send + Sync {
    async fn symbol(&self, token: Address) -> NodeResult<String>;
    async fn name(&self, token: Address) -> NodeResult<String>;
    async fn decimals(&self, token: Address) -> NodeResult<u8>;
    async fn total_supply(&self, token: Address) -> NodeResult<U256>;
    async fn balance_of(&self, token: Address, owner: Address) -> NodeResult<U256>;

    async fn block_number(&self) -> NodeResult<u64>;

    /// Execute `data` against `to` without creating a transaction.
    async fn eth_call(&self, to: Address, data: Bytes) -> NodeResult<Bytes>;
}

// ── alloy-backed implementation ────────────────────────────────────

/// [`NodeClient`] over an alloy HTTP provider.
#[derive(Clone)]
pub struct AlloyNodeClient {
    provider: DynProvider,
    timeout: Duration,
}

impl AlloyNodeClient {
    pub fn connect_http(rpc_url: reqwest::Url, timeout: Duration) -> Self {
        let provider = ProviderBuilder::new().connect_http(rpc_url).erased();
        Self { provider, timeout }
    }

    async fn timed<T, F>(&self, fut: F) -> NodeResult<T>
    where
        F: IntoFuture<Output = Result<T, alloy::contract::Error>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(Ok(v)) => Ok(v),
            Ok(Err(e)) => Err(classify(e)),
            Err(_) => Err(NodeError::Timeout(self.timeout.as_secs())),
        }
    }
}

fn classify(err: alloy::contract::Error) -> NodeError {
    match err {
        alloy::contract::Error::TransportError(e) => match e.as_error_resp() {
            Some(payload) => NodeError::Reverted(payload.message.to_string()),
            None => NodeError::Transport(e.to_string()),
        },
        other => NodeError::Decode(other.to_string()),
    }
}

#[async_trait]
impl NodeClient for AlloyNodeClient {
    async fn symbol(&self, token: Address) -> NodeResult<String> {
        let contract = IERC20::new(token, &self.provider);
        self.timed(contract.symbol().call()).await
    }

    async fn name(&self, token: Address) -> NodeResult<String> {
        let contract = IERC20::new(token, &self.provider);
        self.timed(contract.name().call()).await
    }

    async fn decimals(&self, token: Address) -> NodeResult<u8> {
        let contract = IERC20::new(token, &self.provider);
        self.timed(contract.decimals().call()).await
    }

    async fn total_supply(&self, token: Address) -> NodeResult<U256> {
        let contract = IERC20::new(token, &self.provider);
        self.timed(contract.totalSupply().call()).await
    }

    async fn balance_of(&self, token: Address, owner: Address) -> NodeResult<U256> {
        let contract = IERC20::new(token, &self.provider);
        self.timed(contract.balanceOf(owner).call()).await
    }

    async fn block_number(&self) -> NodeResult<u64> {
        match tokio::time::timeout(self.timeout, self.provider.get_block_number()).await {
            Ok(Ok(n)) => Ok(n),
            Ok(Err(e)) => Err(NodeError::Transport(e.to_string())),
            Err(_) => Err(NodeError::Timeout(self.timeout.as_secs())),
        }
    }

    async fn eth_call(&self, to: Address, data: Bytes) -> NodeResult<Bytes> {
        let tx = TransactionRequest::default().with_to(to).with_input(data);
        match tokio::time::timeout(self.timeout, self.provider.call(tx)).await {
            Ok(Ok(out)) => Ok(out),
            Ok(Err(e)) => Err(match e.as_error_resp() {
                Some(payload) => NodeError::Reverted(payload.message.to_string()),
                None => NodeError::Transport(e.to_string()),
            }),
            Err(_) => Err(NodeError::Timeout(self.timeout.as_secs())),
        }
    }
}
