use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::validate_coordinates;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Incident {
    pub id: Uuid,
    pub title: String,
    pub lat: f64,
    pub lng: f64,
    /// 区域半径（米），参与匹配的事件半径必须大于 0
    pub radius: f64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewIncident {
    pub title: String,
    pub lat: f64,
    pub lng: f64,
    pub radius: f64,
}

/// 部分更新，未提供的字段保持不变
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IncidentPatch {
    pub title: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub radius: Option<f64>,
    pub is_active: Option<bool>,
}

impl NewIncident {
    pub fn validate(&self) -> Result<(), String> {
        validate_title(&self.title)?;
        validate_coordinates(self.lat, self.lng)?;
        validate_radius(self.radius)
    }

    pub fn into_incident(self, now: DateTime<Utc>) -> Incident {
        Incident {
            id: Uuid::new_v4(),
            title: self.title,
            lat: self.lat,
            lng: self.lng,
            radius: self.radius,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

impl IncidentPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.lat.is_none()
            && self.lng.is_none()
            && self.radius.is_none()
            && self.is_active.is_none()
    }

    pub fn validate(&self) -> Result<(), String> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(lat) = self.lat {
            validate_coordinates(lat, 0.0)?;
        }
        if let Some(lng) = self.lng {
            validate_coordinates(0.0, lng)?;
        }
        if let Some(radius) = self.radius {
            validate_radius(radius)?;
        }
        Ok(())
    }

    pub fn apply(self, incident: &mut Incident, now: DateTime<Utc>) {
        if let Some(title) = self.title {
            incident.title = title;
        }
        if let Some(lat) = self.lat {
            incident.lat = lat;
        }
        if let Some(lng) = self.lng {
            incident.lng = lng;
        }
        if let Some(radius) = self.radius {
            incident.radius = radius;
        }
        if let Some(is_active) = self.is_active {
            incident.is_active = is_active;
        }
        incident.updated_at = now;
    }
}

fn validate_title(title: &str) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err("title cannot be empty".into());
    }
    Ok(())
}

fn validate_radius(radius: f64) -> Result<(), String> {
    if !radius.is_finite() || radius <= 0.0 {
        return Err(format!("radius must be greater than 0, got {}", radius));
    }
    Ok(())
}
