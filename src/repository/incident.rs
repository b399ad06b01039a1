use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::IncidentRepository;
use crate::error::AppError;
use crate::models::Incident;

const INCIDENT_COLUMNS: &str = "id, title, lat, lng, radius, is_active, created_at, updated_at";

#[derive(Clone)]
pub struct PgIncidentRepository {
    pool: PgPool,
}

impl PgIncidentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IncidentRepository for PgIncidentRepository {
    async fn create(&self, incident: &Incident) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO incidents (id, title, lat, lng, radius, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(incident.id)
        .bind(&incident.title)
        .bind(incident.lat)
        .bind(incident.lng)
        .bind(incident.radius)
        .bind(incident.is_active)
        .bind(incident.created_at)
        .bind(incident.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(incident_id = %incident.id, "Failed to insert incident: {}", e);
            AppError::from(e)
        })?;

        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Incident, AppError> {
        let incident = sqlx::query_as::<_, Incident>(&format!(
            "SELECT {} FROM incidents WHERE id = $1",
            INCIDENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        incident.ok_or(AppError::NotFound)
    }

    async fn update(&self, incident: &Incident) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE incidents
            SET title = $2, lat = $3, lng = $4, radius = $5, is_active = $6, updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(incident.id)
        .bind(&incident.title)
        .bind(incident.lat)
        .bind(incident.lng)
        .bind(incident.radius)
        .bind(incident.is_active)
        .bind(incident.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    async fn deactivate(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE incidents
            SET is_active = FALSE, updated_at = $2
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    async fn list_with_total(
        &self,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Incident>, i64), AppError> {
        let incidents = sqlx::query_as::<_, Incident>(&format!(
            "SELECT {} FROM incidents ORDER BY created_at DESC OFFSET $1 LIMIT $2",
            INCIDENT_COLUMNS
        ))
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM incidents")
            .fetch_one(&self.pool)
            .await?;

        Ok((incidents, total))
    }

    async fn get_active(&self) -> Result<Vec<Incident>, AppError> {
        let incidents = sqlx::query_as::<_, Incident>(&format!(
            "SELECT {} FROM incidents WHERE is_active = TRUE ORDER BY created_at DESC",
            INCIDENT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(incidents)
    }

    async fn count_active(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM incidents WHERE is_active = TRUE")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
