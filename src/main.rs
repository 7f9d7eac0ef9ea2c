use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use token_ranker::api::{self, state::AppState, types::TokenInfoResponse};
use token_ranker::address::checksum;
use token_ranker::config::Config;
use token_ranker::explorer::PolygonscanClient;
use token_ranker::node::AlloyNodeClient;
use token_ranker::service::TokenService;

mod cli;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    setup_tracing()?;

    let cli = cli::Cli::parse();
    let config = Config::from_env()?;
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let service = build_service(&config)?;

    match cli.command {
        cli::Command::Serve { host, port } => api::serve(&host, port, AppState::new(service)).await,
        cli::Command::Balance { address } => print_json(&service.balance(&address).await?),
        cli::Command::Batch { addresses } => print_json(&service.balances(&addresses).await),
        cli::Command::Top {
            addresses,
            n,
            with_transactions,
        } => {
            let n = usize::try_from(n).context("n is too large")?;
            let top = if with_transactions {
                service.top_with_activity(&addresses, n).await?
            } else {
                service.top(&addresses, n).await?
            };
            print_json(&top)
        }
        cli::Command::TokenInfo => {
            let metadata = service.token_info().await;
            print_json(&TokenInfoResponse::new(&metadata, checksum(&service.token())))
        }
    }
}

fn build_service(config: &Config) -> Result<TokenService> {
    let node = AlloyNodeClient::connect_http(config.rpc_url.clone(), config.rpc_timeout);
    let explorer = PolygonscanClient::new(
        config.explorer_base_url.clone(),
        config.explorer_api_key.clone(),
    )
    .context("building explorer client")?;

    if config.explorer_api_key.is_none() {
        tracing::warn!("POLYGONSCAN_API_KEY not set, last transaction dates will be empty");
    }

    Ok(TokenService::new(
        Arc::new(node),
        Arc::new(explorer),
        config.token_address,
        config.concurrency,
    ))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Log to stderr, filtered by `RUST_LOG` (default `info`).
fn setup_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to start tracing: {e}"))
}
