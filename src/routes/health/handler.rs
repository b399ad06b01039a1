use axum::{http::StatusCode, response::IntoResponse};

use crate::utils::success_to_api_response;

pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        success_to_api_response(serde_json::json!({
            "status": "ok",
            "timestamp": chrono::Utc::now().timestamp(),
        })),
    )
}
