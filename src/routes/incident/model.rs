use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Incident;

pub const DEFAULT_PAGE_LIMIT: i64 = 10;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IncidentResponse {
    pub id: Uuid,
    pub title: String,
    pub lat: f64,
    pub lng: f64,
    pub radius: f64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IncidentListResponse {
    pub incidents: Vec<IncidentResponse>,
    pub limit: i64,
    pub offset: i64,
    pub total: i64,
}

impl From<Incident> for IncidentResponse {
    fn from(incident: Incident) -> Self {
        Self {
            id: incident.id,
            title: incident.title,
            lat: incident.lat,
            lng: incident.lng,
            radius: incident.radius,
            is_active: incident.is_active,
            created_at: incident.created_at,
            updated_at: incident.updated_at,
        }
    }
}

impl IncidentListResponse {
    pub fn new(incidents: Vec<Incident>, offset: i64, limit: i64, total: i64) -> Self {
        Self {
            incidents: incidents.into_iter().map(IncidentResponse::from).collect(),
            limit,
            offset,
            total,
        }
    }
}
