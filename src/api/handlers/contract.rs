use axum::Json;
use axum::extract::State;

use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::api::types::{CallContractRequest, CallContractResponse};

pub async fn call_contract(
    State(state): State<AppState>,
    Json(req): Json<CallContractRequest>,
) -> Result<Json<CallContractResponse>, ApiError> {
    let result = state
        .service
        .call_contract(&req.contract_address, &req.abi, &req.method, &req.args)
        .await?;
    Ok(Json(CallContractResponse { result }))
}
