use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 一次位置检查的记录，写入后不再修改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct LocationCheck {
    pub id: Uuid,
    pub user_id: Uuid,
    pub lat: f64,
    pub lng: f64,
    #[sqlx(rename = "checked_at")]
    pub timestamp: DateTime<Utc>,
    pub matched: bool,
    pub incident_ids: Vec<Uuid>,
}

impl LocationCheck {
    /// matched 只由 incident_ids 是否为空决定
    pub fn new(user_id: Uuid, lat: f64, lng: f64, incident_ids: Vec<Uuid>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            lat,
            lng,
            timestamp: Utc::now(),
            matched: !incident_ids.is_empty(),
            incident_ids,
        }
    }
}
