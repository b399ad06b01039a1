//! 持久化层接口
//!
//! 服务层只依赖这里的 trait，Postgres 实现位于子模块中。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Incident, LocationCheck};

mod incident;
mod location;

pub use incident::PgIncidentRepository;
pub use location::PgLocationRepository;

#[async_trait]
pub trait IncidentRepository: Send + Sync {
    async fn create(&self, incident: &Incident) -> Result<(), AppError>;

    async fn get_by_id(&self, id: Uuid) -> Result<Incident, AppError>;

    async fn update(&self, incident: &Incident) -> Result<(), AppError>;

    async fn deactivate(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), AppError>;

    /// 按创建时间倒序分页，同时返回总数
    async fn list_with_total(
        &self,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Incident>, i64), AppError>;

    async fn get_active(&self) -> Result<Vec<Incident>, AppError>;

    async fn count_active(&self) -> Result<i64, AppError>;
}

#[async_trait]
pub trait LocationRepository: Send + Sync {
    async fn save(&self, check: &LocationCheck) -> Result<(), AppError>;

    async fn list_by_user(&self, user_id: Uuid, limit: i64) -> Result<Vec<LocationCheck>, AppError>;

    async fn count_unique_users(&self, since: DateTime<Utc>) -> Result<i64, AppError>;
}
