use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::equipment_dto::{CreateEquipmentRequest, EquipmentFilters, UpdateEquipmentRequest};
use crate::models::equipment::{AvailabilityStatus, Equipment};
use crate::utils::errors::{conflict_error, map_unique_violation, not_found_error, AppError};

/// Filas que se eliminan junto con el camión
#[derive(Debug, Default)]
pub struct RemovedEquipment {
    pub maintenance_ids: Vec<Uuid>,
    /// (id del reporte, autor)
    pub faults: Vec<(Uuid, Uuid)>,
}

pub struct EquipmentRepository {
    pool: PgPool,
}

impl EquipmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, request: &CreateEquipmentRequest) -> Result<Equipment, AppError> {
        sqlx::query_as::<_, Equipment>(
            r#"
            INSERT INTO equipment (id, number, model, mileage, next_maintenance, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(request.number.trim())
        .bind(request.model.trim())
        .bind(request.mileage)
        .bind(request.next_maintenance)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || conflict_error("Equipment", "number", &request.number)))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Equipment>, AppError> {
        let equipment = sqlx::query_as::<_, Equipment>("SELECT * FROM equipment WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(equipment)
    }

    pub async fn exists(&self, id: Uuid) -> Result<bool, AppError> {
        let result: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM equipment WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(result.0)
    }

    pub async fn list(&self, filters: &EquipmentFilters) -> Result<Vec<Equipment>, AppError> {
        let equipment = sqlx::query_as::<_, Equipment>(
            r#"
            SELECT * FROM equipment
            WHERE ($1::availability_status IS NULL OR availability = $1)
              AND ($2::equipment_status IS NULL OR status = $2)
            ORDER BY number ASC
            "#,
        )
        .bind(filters.availability)
        .bind(filters.status)
        .fetch_all(&self.pool)
        .await?;

        Ok(equipment)
    }

    pub async fn update(&self, id: Uuid, request: &UpdateEquipmentRequest) -> Result<Equipment, AppError> {
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Equipment", &id.to_string()))?;

        let number = request
            .number
            .as_deref()
            .map(str::trim)
            .unwrap_or(&current.number)
            .to_string();

        sqlx::query_as::<_, Equipment>(
            r#"
            UPDATE equipment
            SET number = $2, model = $3, mileage = $4, status = $5, next_maintenance = $6
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&number)
        .bind(request.model.as_deref().map(str::trim).unwrap_or(&current.model))
        .bind(request.mileage.unwrap_or(current.mileage))
        .bind(request.status.unwrap_or(current.status))
        .bind(request.next_maintenance.or(current.next_maintenance))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || conflict_error("Equipment", "number", &number)))
    }

    pub async fn update_availability(
        &self,
        id: Uuid,
        availability: AvailabilityStatus,
        reason: Option<String>,
        updated_by: Uuid,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Equipment>, AppError> {
        let equipment = sqlx::query_as::<_, Equipment>(
            r#"
            UPDATE equipment
            SET availability = $2, availability_reason = $3,
                availability_updated_by = $4, availability_updated_at = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(availability)
        .bind(reason)
        .bind(updated_by)
        .bind(updated_at)
        .fetch_optional(&self.pool)
        .await?;

        Ok(equipment)
    }

    /// Borra el camión con sus mantenimientos y reportes, devolviendo qué se eliminó
    pub async fn delete(&self, id: Uuid) -> Result<Option<RemovedEquipment>, AppError> {
        let mut tx = self.pool.begin().await?;

        let maintenance_ids: Vec<Uuid> =
            sqlx::query_scalar("DELETE FROM maintenance_records WHERE equipment_id = $1 RETURNING id")
                .bind(id)
                .fetch_all(&mut *tx)
                .await?;

        let faults: Vec<(Uuid, Uuid)> =
            sqlx::query_as("DELETE FROM fault_reports WHERE equipment_id = $1 RETURNING id, reported_by")
                .bind(id)
                .fetch_all(&mut *tx)
                .await?;

        let result = sqlx::query("DELETE FROM equipment WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        tx.commit().await?;
        Ok(Some(RemovedEquipment { maintenance_ids, faults }))
    }
}
