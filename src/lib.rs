pub mod activity;
pub mod address;
pub mod api;
pub mod balance;
pub mod batch;
pub mod clock;
pub mod config;
pub mod contract_call;
pub mod error;
pub mod explorer;
pub mod metadata;
pub mod node;
pub mod ranking;
pub mod service;
pub mod units;

pub use error::{TokenError, TokenResult};
