use axum::Json;
use axum::extract::State;

use crate::address::checksum;
use crate::api::state::AppState;
use crate::api::types::TokenInfoResponse;

pub async fn get_token_info(State(state): State<AppState>) -> Json<TokenInfoResponse> {
    let metadata = state.service.token_info().await;
    Json(TokenInfoResponse::new(
        &metadata,
        checksum(&state.service.token()),
    ))
}
