use axum::Json;
use chrono::Utc;

use crate::api::types::HealthResponse;

pub async fn healthz() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now().format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string(),
    })
}
