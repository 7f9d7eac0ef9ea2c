use axum::Json;
use axum::extract::State;

use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::api::types::{TopRequest, TopResponse, TopWithActivityResponse};

pub async fn get_top(
    State(state): State<AppState>,
    Json(req): Json<TopRequest>,
) -> Result<Json<TopResponse>, ApiError> {
    let top = state.service.top(&req.addresses, req.n()).await?;
    Ok(Json(TopResponse { top }))
}

pub async fn get_top_with_transactions(
    State(state): State<AppState>,
    Json(req): Json<TopRequest>,
) -> Result<Json<TopWithActivityResponse>, ApiError> {
    let top = state
        .service
        .top_with_activity(&req.addresses, req.n())
        .await?;
    Ok(Json(TopWithActivityResponse {
        top: top.into_iter().map(Into::into).collect(),
    }))
}
