pub mod health;
pub mod incident;
pub mod location;
pub mod stats;

use axum::{
    Router,
    routing::{get, post},
};

use crate::{AppState, middleware::log_requests};

/// 构建全部 API 路由，挂载在 `api_base_uri` 下
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/system/health", get(health::health_check))
        .route(
            "/incidents",
            post(incident::create_incident).get(incident::list_incidents),
        )
        .route("/incidents/active", get(incident::active_incidents))
        .route("/incidents/stats", get(stats::incident_stats))
        .route(
            "/incidents/{id}",
            get(incident::get_incident)
                .put(incident::update_incident)
                .delete(incident::deactivate_incident),
        )
        .route("/location/check", post(location::check_location))
        .route("/location/history", get(location::location_history));

    // axum 不允许在根路径 nest
    let base = state.config.api_base_uri.trim_end_matches('/').to_owned();
    let router = if base.is_empty() {
        Router::new().merge(api)
    } else {
        Router::new().nest(&base, api)
    };

    router
        .layer(axum::middleware::from_fn(log_requests))
        .with_state(state)
}
