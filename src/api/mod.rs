pub mod error;
pub mod handlers;
pub mod state;
pub mod types;

use anyhow::{Context, Result};
use axum::Router;
use axum::routing::{get, post};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};

use state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/healthz", get(handlers::health::healthz))
        .route("/get_balance", get(handlers::balance::get_balance))
        .route("/get_balance_batch", post(handlers::balance::get_balance_batch))
        .route("/get_top", post(handlers::top::get_top))
        .route(
            "/get_top_with_transactions",
            post(handlers::top::get_top_with_transactions),
        )
        .route("/get_token_info", get(handlers::token::get_token_info))
        .route("/call_contract", post(handlers::contract::call_contract))
        .layer(CatchPanicLayer::custom(error::panic_response))
        .layer(cors)
        .with_state(state)
}

pub async fn serve(host: &str, port: u16, state: AppState) -> Result<()> {
    match state.service.latest_block().await {
        Ok(block) => tracing::info!(block, "connected to RPC"),
        Err(e) => tracing::warn!(error = %e, "RPC connection failed, serving anyway"),
    }

    let app = router(state);

    let addr = format!("{host}:{port}");
    tracing::info!("token-ranker API listening on {addr}");
    tracing::info!("  Health:   GET  http://{addr}/healthz");
    tracing::info!("  Balance:  GET  http://{addr}/get_balance?address=0x...");
    tracing::info!("  Top:      POST http://{addr}/get_top");
    tracing::info!("  Token:    GET  http://{addr}/get_token_info");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding to {addr}"))?;

    axum::serve(listener, app).await.context("running server")?;

    Ok(())
}
