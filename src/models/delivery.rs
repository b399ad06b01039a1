use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::location::LocationCheck;

/// 推送给 webhook 的任务，同时也是队列中的消息格式
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryTask {
    pub user_id: Uuid,
    pub lat: f64,
    pub lng: f64,
    pub incident_ids: Vec<Uuid>,
    /// 任务创建时间（Unix 秒）
    pub timestamp: i64,
    pub retry: u32,
}

impl DeliveryTask {
    pub fn from_check(check: &LocationCheck) -> Self {
        Self {
            user_id: check.user_id,
            lat: check.lat,
            lng: check.lng,
            incident_ids: check.incident_ids.clone(),
            timestamp: chrono::Utc::now().timestamp(),
            retry: 0,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}
