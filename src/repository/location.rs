use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::LocationRepository;
use crate::error::AppError;
use crate::models::LocationCheck;

#[derive(Clone)]
pub struct PgLocationRepository {
    pool: PgPool,
}

impl PgLocationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LocationRepository for PgLocationRepository {
    async fn save(&self, check: &LocationCheck) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO location_checks (id, user_id, lat, lng, checked_at, matched, incident_ids)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(check.id)
        .bind(check.user_id)
        .bind(check.lat)
        .bind(check.lng)
        .bind(check.timestamp)
        .bind(check.matched)
        .bind(&check.incident_ids)
        .execute(&self.pool)
        .await
        .map_err(|e| match AppError::from(e) {
            AppError::Duplicate => {
                tracing::warn!(location_id = %check.id, "Duplicate location check");
                AppError::Duplicate
            }
            other => other,
        })?;

        tracing::debug!(user_id = %check.user_id, location_id = %check.id, "Location check saved");
        Ok(())
    }

    async fn list_by_user(&self, user_id: Uuid, limit: i64) -> Result<Vec<LocationCheck>, AppError> {
        let checks = sqlx::query_as::<_, LocationCheck>(
            r#"
            SELECT id, user_id, lat, lng, checked_at, matched, incident_ids
            FROM location_checks
            WHERE user_id = $1
            ORDER BY checked_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(checks)
    }

    async fn count_unique_users(&self, since: DateTime<Utc>) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(DISTINCT user_id) FROM location_checks WHERE checked_at >= $1",
        )
        .bind(since)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
