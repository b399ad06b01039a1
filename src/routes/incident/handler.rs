use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use super::model::{DEFAULT_PAGE_LIMIT, IncidentListResponse, IncidentResponse, ListQuery};
use crate::{
    AppState,
    error::AppError,
    models::{IncidentPatch, NewIncident},
    utils::success_to_api_response,
};

fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::Validation(format!("invalid incident id: {}", raw)))
}

#[axum::debug_handler]
pub async fn create_incident(
    State(state): State<AppState>,
    Json(req): Json<NewIncident>,
) -> Response {
    match state.incidents.create(req).await {
        Ok(incident) => (
            StatusCode::CREATED,
            success_to_api_response(IncidentResponse::from(incident)),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

#[axum::debug_handler]
pub async fn get_incident(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };

    match state.incidents.get(id).await {
        Ok(incident) => (
            StatusCode::OK,
            success_to_api_response(IncidentResponse::from(incident)),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

#[axum::debug_handler]
pub async fn list_incidents(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Response {
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_LIMIT);
    let offset = query.offset.unwrap_or(0);

    match state.incidents.list(offset, limit).await {
        Ok((incidents, total)) => (
            StatusCode::OK,
            success_to_api_response(IncidentListResponse::new(incidents, offset, limit, total)),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

#[axum::debug_handler]
pub async fn active_incidents(State(state): State<AppState>) -> Response {
    let incidents = match state.incidents.active().await {
        Ok(incidents) => incidents,
        Err(e) => return e.into_response(),
    };

    match state.incidents.count_active().await {
        Ok(total) => {
            let limit = incidents.len() as i64;
            (
                StatusCode::OK,
                success_to_api_response(IncidentListResponse::new(incidents, 0, limit, total)),
            )
                .into_response()
        }
        Err(e) => e.into_response(),
    }
}

#[axum::debug_handler]
pub async fn update_incident(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<IncidentPatch>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };

    match state.incidents.update(id, patch).await {
        Ok(incident) => (
            StatusCode::OK,
            success_to_api_response(IncidentResponse::from(incident)),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

#[axum::debug_handler]
pub async fn deactivate_incident(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };

    match state.incidents.deactivate(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}
