use thiserror::Error;

use crate::node::NodeError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TokenError {
    #[error("Invalid address `{address}`: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Balance unavailable for `{address}`: {reason}")]
    BalanceUnavailable { address: String, reason: String },

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Contract call failed: {0}")]
    ContractCall(String),
}

impl TokenError {
    /// Map a node failure observed while reading `address`'s balance.
    ///
    /// A call that reached the node but produced undecodable output is a
    /// data problem for that address; anything else means the node itself
    /// could not be reached.
    pub fn from_balance_call(address: &str, err: NodeError) -> Self {
        match err {
            NodeError::Decode(reason) | NodeError::Reverted(reason) => {
                TokenError::BalanceUnavailable {
                    address: address.to_string(),
                    reason,
                }
            }
            other => TokenError::UpstreamUnavailable(other.to_string()),
        }
    }
}

pub type TokenResult<T> = Result<T, TokenError>;
