use axum::Json;
use axum::extract::{Query, State};

use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::api::types::{BalanceQuery, BatchRequest, BatchResponse};
use crate::balance::BalanceRecord;

pub async fn get_balance(
    State(state): State<AppState>,
    Query(query): Query<BalanceQuery>,
) -> Result<Json<BalanceRecord>, ApiError> {
    let record = state.service.balance(&query.address).await?;
    Ok(Json(record))
}

pub async fn get_balance_batch(
    State(state): State<AppState>,
    Json(req): Json<BatchRequest>,
) -> Json<BatchResponse> {
    Json(BatchResponse {
        balances: state.service.balances(&req.addresses).await,
    })
}
