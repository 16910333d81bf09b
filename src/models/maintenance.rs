//! Modelo de registros de mantenimiento

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow, Type};
use uuid::Uuid;
use validator::Validate;

use crate::utils::errors::{validation_error, AppResult};

/// Tope por línea de pieza en un mantenimiento
pub const MAX_PART_QUANTITY: i32 = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "maintenance_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MaintenanceType {
    Preventive,
    Corrective,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "maintenance_status", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum MaintenanceStatus {
    Pending,
    InProgress,
    Completed,
}

impl MaintenanceStatus {
    fn rank(&self) -> u8 {
        match self {
            MaintenanceStatus::Pending => 0,
            MaintenanceStatus::InProgress => 1,
            MaintenanceStatus::Completed => 2,
        }
    }

    /// Solo se avanza; pending puede saltar directo a completed
    pub fn can_transition_to(&self, next: MaintenanceStatus) -> bool {
        next.rank() > self.rank()
    }
}

/// Pieza consumida por un mantenimiento
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct PartUsage {
    pub part_id: Uuid,
    #[validate(range(min = 1, max = 100_000))]
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MaintenanceRecord {
    pub id: Uuid,
    pub equipment_id: Uuid,
    pub maintenance_type: MaintenanceType,
    pub description: String,
    pub mileage: Decimal,
    pub mechanic_id: Option<Uuid>,
    pub status: MaintenanceStatus,
    pub parts_used: Json<Vec<PartUsage>>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Fecha del próximo mantenimiento a partir de la fecha de cierre
pub fn next_maintenance_after(completed_at: DateTime<Utc>, interval_days: i64) -> DateTime<Utc> {
    completed_at + Duration::days(interval_days)
}

/// Agrupa las piezas repetidas sumando cantidades, en orden de primera aparición
pub fn merge_part_usage(parts: &[PartUsage]) -> AppResult<Vec<PartUsage>> {
    let mut merged: Vec<PartUsage> = Vec::with_capacity(parts.len());
    for usage in parts {
        if usage.quantity < 1 {
            return Err(validation_error("parts_used", "Part quantity must be positive"));
        }
        match merged.iter_mut().find(|u| u.part_id == usage.part_id) {
            Some(existing) => {
                existing.quantity = existing
                    .quantity
                    .checked_add(usage.quantity)
                    .filter(|total| *total <= MAX_PART_QUANTITY)
                    .ok_or_else(|| validation_error("parts_used", "Part quantity is too large"))?;
            }
            None => merged.push(usage.clone()),
        }
    }
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::errors::AppError;
    use chrono::TimeZone;

    #[test]
    fn test_status_only_moves_forward() {
        use MaintenanceStatus::*;
        assert!(Pending.can_transition_to(InProgress));
        assert!(Pending.can_transition_to(Completed));
        assert!(InProgress.can_transition_to(Completed));
        assert!(!InProgress.can_transition_to(Pending));
        assert!(!Completed.can_transition_to(InProgress));
        assert!(!Completed.can_transition_to(Completed));
    }

    #[test]
    fn test_next_maintenance_after_interval() {
        let done = Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap();
        let next = next_maintenance_after(done, 90);
        assert_eq!(next, Utc.with_ymd_and_hms(2025, 4, 1, 8, 0, 0).unwrap());
    }

    #[test]
    fn test_merge_part_usage() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let merged = merge_part_usage(&[
            PartUsage { part_id: a, quantity: 2 },
            PartUsage { part_id: b, quantity: 1 },
            PartUsage { part_id: a, quantity: 3 },
        ])
        .unwrap();
        assert_eq!(
            merged,
            vec![
                PartUsage { part_id: a, quantity: 5 },
                PartUsage { part_id: b, quantity: 1 },
            ]
        );
    }

    #[test]
    fn test_merge_part_usage_rejects_overflowing_totals() {
        let a = Uuid::new_v4();
        let result = merge_part_usage(&[
            PartUsage { part_id: a, quantity: i32::MAX },
            PartUsage { part_id: a, quantity: 1 },
        ]);
        assert!(matches!(result, Err(AppError::Validation(_))));

        let result = merge_part_usage(&[
            PartUsage { part_id: a, quantity: MAX_PART_QUANTITY },
            PartUsage { part_id: a, quantity: 1 },
        ]);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_merge_part_usage_rejects_non_positive() {
        let result = merge_part_usage(&[PartUsage { part_id: Uuid::new_v4(), quantity: 0 }]);
        assert!(result.is_err());
    }

    #[test]
    fn test_part_quantity_is_bounded() {
        let usage = PartUsage { part_id: Uuid::new_v4(), quantity: MAX_PART_QUANTITY + 1 };
        assert!(usage.validate().is_err());
        let usage = PartUsage { part_id: Uuid::new_v4(), quantity: MAX_PART_QUANTITY };
        assert!(usage.validate().is_ok());
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&MaintenanceStatus::InProgress).unwrap(),
            "\"in-progress\""
        );
    }
}
