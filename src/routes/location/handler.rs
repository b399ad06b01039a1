use axum::{
    extract::{Json, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::model::{CheckLocationRequest, DEFAULT_HISTORY_LIMIT, HistoryQuery, LocationResponse};
use crate::{AppState, utils::success_to_api_response};

#[axum::debug_handler]
pub async fn check_location(
    State(state): State<AppState>,
    Json(req): Json<CheckLocationRequest>,
) -> Response {
    match state
        .locations
        .check_location(req.user_id, req.lat, req.lng)
        .await
    {
        Ok(check) => (
            StatusCode::OK,
            success_to_api_response(LocationResponse::from(check)),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

#[axum::debug_handler]
pub async fn location_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Response {
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);

    match state.locations.history(query.user_id, limit).await {
        Ok(checks) => {
            let checks = checks
                .into_iter()
                .map(LocationResponse::from)
                .collect::<Vec<_>>();
            (StatusCode::OK, success_to_api_response(checks)).into_response()
        }
        Err(e) => e.into_response(),
    }
}
