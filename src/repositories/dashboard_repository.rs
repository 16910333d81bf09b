use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::dashboard::DashboardStats;
use crate::utils::errors::AppError;

#[derive(sqlx::FromRow)]
struct EquipmentCounts {
    total: i64,
    available: i64,
    partial: i64,
    unavailable: i64,
    maintenance_due: i64,
}

#[derive(sqlx::FromRow)]
struct MaintenanceCounts {
    pending: i64,
    in_progress: i64,
}

pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// `fault_reporter = Some(..)` cuenta solo las averías de ese usuario
    pub async fn stats(&self, fault_reporter: Option<Uuid>, now: DateTime<Utc>) -> Result<DashboardStats, AppError> {
        let equipment = sqlx::query_as::<_, EquipmentCounts>(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE availability = 'available') AS available,
                COUNT(*) FILTER (WHERE availability = 'partial') AS partial,
                COUNT(*) FILTER (WHERE availability = 'unavailable') AS unavailable,
                COUNT(*) FILTER (WHERE next_maintenance IS NOT NULL AND next_maintenance <= $1) AS maintenance_due
            FROM equipment
            "#,
        )
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        let maintenance = sqlx::query_as::<_, MaintenanceCounts>(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE status = 'pending') AS pending,
                COUNT(*) FILTER (WHERE status = 'in-progress') AS in_progress
            FROM maintenance_records
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let (low_stock_parts,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM parts WHERE quantity <= minimum_quantity")
                .fetch_one(&self.pool)
                .await?;

        let (open_faults,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM fault_reports
            WHERE status IN ('pending', 'in-progress')
              AND ($1::uuid IS NULL OR reported_by = $1)
            "#,
        )
        .bind(fault_reporter)
        .fetch_one(&self.pool)
        .await?;

        Ok(DashboardStats {
            total_equipment: equipment.total,
            available_equipment: equipment.available,
            partial_equipment: equipment.partial,
            unavailable_equipment: equipment.unavailable,
            maintenance_due: equipment.maintenance_due,
            pending_maintenance: maintenance.pending,
            in_progress_maintenance: maintenance.in_progress,
            low_stock_parts,
            open_faults,
            degraded: false,
        })
    }
}
