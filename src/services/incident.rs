use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use super::ActiveIncidentSource;
use crate::error::AppError;
use crate::models::{Incident, IncidentPatch, NewIncident};
use crate::repository::IncidentRepository;

pub const MAX_PAGE_LIMIT: i64 = 200;

/// 事件的增删改查
///
/// 每个写操作在落库成功后都会失效活跃事件缓存，
/// 这是唯一的写入口。
pub struct IncidentService {
    repo: Arc<dyn IncidentRepository>,
    active: Arc<ActiveIncidentSource>,
}

impl IncidentService {
    pub fn new(repo: Arc<dyn IncidentRepository>, active: Arc<ActiveIncidentSource>) -> Self {
        Self { repo, active }
    }

    pub async fn create(&self, req: NewIncident) -> Result<Incident, AppError> {
        req.validate().map_err(AppError::Validation)?;

        let incident = req.into_incident(Utc::now());
        self.repo.create(&incident).await?;
        self.active.invalidate().await;

        tracing::info!(incident_id = %incident.id, title = %incident.title, "Created incident");
        Ok(incident)
    }

    pub async fn get(&self, id: Uuid) -> Result<Incident, AppError> {
        self.repo.get_by_id(id).await
    }

    pub async fn update(&self, id: Uuid, patch: IncidentPatch) -> Result<Incident, AppError> {
        if patch.is_empty() {
            return Err(AppError::Validation("no fields to update".into()));
        }
        patch.validate().map_err(AppError::Validation)?;

        let mut incident = self.repo.get_by_id(id).await?;
        patch.apply(&mut incident, Utc::now());
        self.repo.update(&incident).await?;
        self.active.invalidate().await;

        tracing::info!(incident_id = %id, "Updated incident");
        Ok(incident)
    }

    pub async fn deactivate(&self, id: Uuid) -> Result<(), AppError> {
        self.repo.deactivate(id, Utc::now()).await?;
        self.active.invalidate().await;

        tracing::info!(incident_id = %id, "Deactivated incident");
        Ok(())
    }

    pub async fn list(&self, offset: i64, limit: i64) -> Result<(Vec<Incident>, i64), AppError> {
        if !(1..=MAX_PAGE_LIMIT).contains(&limit) {
            return Err(AppError::Validation(format!(
                "limit must be between 1 and {}, got {}",
                MAX_PAGE_LIMIT, limit
            )));
        }
        if offset < 0 {
            return Err(AppError::Validation(format!(
                "offset must be >= 0, got {}",
                offset
            )));
        }

        self.repo.list_with_total(offset, limit).await
    }

    pub async fn active(&self) -> Result<Vec<Incident>, AppError> {
        self.active.get().await
    }

    pub async fn count_active(&self) -> Result<i64, AppError> {
        self.repo.count_active().await
    }
}
