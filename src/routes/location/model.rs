use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::LocationCheck;

pub const DEFAULT_HISTORY_LIMIT: i64 = 20;

#[derive(Debug, Deserialize)]
pub struct CheckLocationRequest {
    pub user_id: Uuid,
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub user_id: Uuid,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LocationResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub lat: f64,
    pub lng: f64,
    pub timestamp: DateTime<Utc>,
    pub matched: bool,
    pub incident_ids: Vec<Uuid>,
}

impl From<LocationCheck> for LocationResponse {
    fn from(check: LocationCheck) -> Self {
        Self {
            id: check.id,
            user_id: check.user_id,
            lat: check.lat,
            lng: check.lng,
            timestamp: check.timestamp,
            matched: check.matched,
            incident_ids: check.incident_ids,
        }
    }
}
