use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::{AppState, utils::success_to_api_response};

#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub user_count: i64,
    pub window_minutes: u64,
}

/// 最近 N 分钟内上报过位置的用户数
#[axum::debug_handler]
pub async fn incident_stats(State(state): State<AppState>) -> Response {
    match state.stats.user_count().await {
        Ok(user_count) => (
            StatusCode::OK,
            success_to_api_response(StatsResponse {
                user_count,
                window_minutes: state.stats.window_minutes(),
            }),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}
