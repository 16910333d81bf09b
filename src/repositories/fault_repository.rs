use chrono::{DateTime, Utc};
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::dto::fault_dto::FaultFilters;
use crate::models::fault::{FaultPriority, FaultReport, FaultStatus, StatusChange};
use crate::utils::errors::AppError;

pub struct FaultRepository {
    pool: PgPool,
}

impl FaultRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        title: &str,
        description: &str,
        equipment_id: Uuid,
        priority: FaultPriority,
        reported_by: Uuid,
        created_at: DateTime<Utc>,
    ) -> Result<FaultReport, AppError> {
        let history = vec![StatusChange {
            status: FaultStatus::Pending,
            timestamp: created_at,
            user: reported_by,
            comment: None,
        }];

        let report = sqlx::query_as::<_, FaultReport>(
            r#"
            INSERT INTO fault_reports
                (id, title, description, equipment_id, priority, status, reported_by, history, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, 'pending', $6, $7, $8, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(title.trim())
        .bind(description.trim())
        .bind(equipment_id)
        .bind(priority)
        .bind(reported_by)
        .bind(Json(history))
        .bind(created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(report)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<FaultReport>, AppError> {
        let report = sqlx::query_as::<_, FaultReport>("SELECT * FROM fault_reports WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(report)
    }

    /// `reporter = Some(..)` limita a los reportes de ese usuario
    pub async fn list(&self, reporter: Option<Uuid>, filters: &FaultFilters) -> Result<Vec<FaultReport>, AppError> {
        let reports = sqlx::query_as::<_, FaultReport>(
            r#"
            SELECT * FROM fault_reports
            WHERE ($1::uuid IS NULL OR reported_by = $1)
              AND ($2::fault_status IS NULL OR status = $2)
              AND ($3::uuid IS NULL OR equipment_id = $3)
            ORDER BY
                CASE priority WHEN 'high' THEN 0 WHEN 'medium' THEN 1 ELSE 2 END,
                created_at DESC
            "#,
        )
        .bind(reporter)
        .bind(filters.status)
        .bind(filters.equipment_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reports)
    }

    /// Guarda la transición solo si el estado no cambió desde la lectura
    pub async fn save_transition(
        &self,
        id: Uuid,
        from: FaultStatus,
        change: &StatusChange,
    ) -> Result<Option<FaultReport>, AppError> {
        let report = sqlx::query_as::<_, FaultReport>(
            r#"
            UPDATE fault_reports
            SET status = $3, history = history || $4, updated_at = $5
            WHERE id = $1 AND status = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(from)
        .bind(change.status)
        .bind(Json(vec![change]))
        .bind(change.timestamp)
        .fetch_optional(&self.pool)
        .await?;

        Ok(report)
    }
}
