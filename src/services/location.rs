use std::sync::Arc;
use uuid::Uuid;

use super::ActiveIncidentSource;
use crate::error::AppError;
use crate::geofence;
use crate::models::{DeliveryTask, LocationCheck};
use crate::queue::DeliveryQueue;
use crate::repository::LocationRepository;
use crate::utils::validate_coordinates;

pub const MAX_HISTORY_LIMIT: i64 = 100;

pub struct LocationService {
    locations: Arc<dyn LocationRepository>,
    active: Arc<ActiveIncidentSource>,
    queue: Arc<dyn DeliveryQueue>,
}

impl LocationService {
    pub fn new(
        locations: Arc<dyn LocationRepository>,
        active: Arc<ActiveIncidentSource>,
        queue: Arc<dyn DeliveryQueue>,
    ) -> Self {
        Self {
            locations,
            active,
            queue,
        }
    }

    /// 检查坐标命中的活跃事件，记录结果，命中时投递 webhook 任务
    ///
    /// 记录写入失败或命中后入队失败都会让整个请求失败。
    pub async fn check_location(
        &self,
        user_id: Uuid,
        lat: f64,
        lng: f64,
    ) -> Result<LocationCheck, AppError> {
        validate_coordinates(lat, lng).map_err(AppError::Validation)?;

        let incidents = self.active.get().await?;
        let matched = geofence::matching_incident_ids(&incidents, lat, lng);
        let check = LocationCheck::new(user_id, lat, lng, matched);

        self.locations.save(&check).await.map_err(|e| {
            tracing::error!(user_id = %user_id, location_id = %check.id, "Failed to save location check: {}", e);
            e
        })?;

        if check.matched {
            let task = DeliveryTask::from_check(&check);
            self.queue.enqueue(&task).await.map_err(|e| {
                tracing::error!(user_id = %user_id, location_id = %check.id, "Failed to enqueue webhook: {}", e);
                AppError::Enqueue(e)
            })?;
        }

        tracing::debug!(
            user_id = %user_id,
            location_id = %check.id,
            incidents_found = check.incident_ids.len(),
            "Location checked"
        );
        Ok(check)
    }

    pub async fn history(&self, user_id: Uuid, limit: i64) -> Result<Vec<LocationCheck>, AppError> {
        if !(1..=MAX_HISTORY_LIMIT).contains(&limit) {
            return Err(AppError::Validation(format!(
                "limit must be between 1 and {}, got {}",
                MAX_HISTORY_LIMIT, limit
            )));
        }
        self.locations.list_by_user(user_id, limit).await
    }
}
