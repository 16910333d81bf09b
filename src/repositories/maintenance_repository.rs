use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::dto::maintenance_dto::MaintenanceFilters;
use crate::models::maintenance::{MaintenanceRecord, MaintenanceStatus, MaintenanceType, PartUsage};
use crate::models::part::Part;
use crate::repositories::part_repository::PartRepository;
use crate::utils::errors::{map_foreign_key_violation, not_found_error, AppError};

/// Datos ya validados para insertar un registro
pub struct NewMaintenanceRecord {
    pub equipment_id: Uuid,
    pub maintenance_type: MaintenanceType,
    pub description: String,
    pub mileage: Decimal,
    pub mechanic_id: Uuid,
    pub parts_used: Vec<PartUsage>,
}

pub struct MaintenanceRepository {
    pool: PgPool,
}

impl MaintenanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserta el registro y descuenta las piezas en una sola transacción
    pub async fn create(&self, record: NewMaintenanceRecord) -> Result<(MaintenanceRecord, Vec<Part>), AppError> {
        let mut tx = self.pool.begin().await?;

        let consumed = PartRepository::consume(&mut tx, &record.parts_used).await?;

        let created = sqlx::query_as::<_, MaintenanceRecord>(
            r#"
            INSERT INTO maintenance_records
                (id, equipment_id, maintenance_type, description, mileage, mechanic_id, status, parts_used, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, 'pending', $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(record.equipment_id)
        .bind(record.maintenance_type)
        .bind(record.description.trim())
        .bind(record.mileage)
        .bind(record.mechanic_id)
        .bind(Json(&record.parts_used))
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            let mechanic = e
                .as_database_error()
                .and_then(|db| db.constraint())
                .map_or(false, |name| name.contains("mechanic_id"));
            map_foreign_key_violation(e, || {
                if mechanic {
                    not_found_error("Mechanic", &record.mechanic_id.to_string())
                } else {
                    not_found_error("Equipment", &record.equipment_id.to_string())
                }
            })
        })?;

        tx.commit().await?;
        Ok((created, consumed))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<MaintenanceRecord>, AppError> {
        let record = sqlx::query_as::<_, MaintenanceRecord>("SELECT * FROM maintenance_records WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record)
    }

    pub async fn list(&self, filters: &MaintenanceFilters) -> Result<Vec<MaintenanceRecord>, AppError> {
        let records = sqlx::query_as::<_, MaintenanceRecord>(
            r#"
            SELECT * FROM maintenance_records
            WHERE ($1::uuid IS NULL OR equipment_id = $1)
              AND ($2::maintenance_status IS NULL OR status = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(filters.equipment_id)
        .bind(filters.status)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Cambia el estado solo si sigue en `from` (evita carreras entre dos mecánicos)
    pub async fn update_status(
        &self,
        id: Uuid,
        from: MaintenanceStatus,
        to: MaintenanceStatus,
    ) -> Result<Option<MaintenanceRecord>, AppError> {
        let record = sqlx::query_as::<_, MaintenanceRecord>(
            r#"
            UPDATE maintenance_records
            SET status = $3
            WHERE id = $1 AND status = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(from)
        .bind(to)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Cierra el registro y actualiza las fechas de mantenimiento del camión
    pub async fn complete(
        &self,
        id: Uuid,
        from: MaintenanceStatus,
        completed_at: DateTime<Utc>,
        next_maintenance: DateTime<Utc>,
    ) -> Result<Option<MaintenanceRecord>, AppError> {
        let mut tx = self.pool.begin().await?;

        let record = sqlx::query_as::<_, MaintenanceRecord>(
            r#"
            UPDATE maintenance_records
            SET status = 'completed', completed_at = $3
            WHERE id = $1 AND status = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(from)
        .bind(completed_at)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(record) = record else {
            return Ok(None);
        };

        sqlx::query(
            r#"
            UPDATE equipment
            SET last_maintenance = $2, next_maintenance = $3, mileage = GREATEST(mileage, $4)
            WHERE id = $1
            "#,
        )
        .bind(record.equipment_id)
        .bind(completed_at)
        .bind(next_maintenance)
        .bind(record.mileage)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(record))
    }
}
