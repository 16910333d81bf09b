//! Modelo de Equipment (camión)
//!
//! Mapea la tabla equipment. La disponibilidad lleva un motivo obligatorio
//! cuando el camión no está completamente disponible.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

use crate::utils::errors::{validation_error, AppResult};

/// Disponibilidad del camión - mapea al ENUM availability_status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "availability_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AvailabilityStatus {
    Available,
    Partial,
    Unavailable,
}

/// Estado general del camión - mapea al ENUM equipment_status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "equipment_status", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum EquipmentStatus {
    Operational,
    InMaintenance,
    OutOfService,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Equipment {
    pub id: Uuid,
    pub number: String,
    pub model: String,
    pub mileage: Decimal,
    pub availability: AvailabilityStatus,
    pub availability_reason: Option<String>,
    pub availability_updated_at: Option<DateTime<Utc>>,
    pub availability_updated_by: Option<Uuid>,
    pub status: EquipmentStatus,
    pub last_maintenance: Option<DateTime<Utc>>,
    pub next_maintenance: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Equipment {
    /// El próximo mantenimiento ya pasó
    pub fn is_maintenance_due(&self, now: DateTime<Utc>) -> bool {
        self.next_maintenance.map_or(false, |next| next <= now)
    }
}

/// Normaliza el motivo de un cambio de disponibilidad.
///
/// `partial` y `unavailable` exigen un motivo no vacío; `available` lo borra.
pub fn normalize_availability_reason(
    status: AvailabilityStatus,
    reason: Option<&str>,
) -> AppResult<Option<String>> {
    match status {
        AvailabilityStatus::Available => Ok(None),
        AvailabilityStatus::Partial | AvailabilityStatus::Unavailable => {
            match reason.map(str::trim).filter(|r| !r.is_empty()) {
                Some(reason) => Ok(Some(reason.to_string())),
                None => Err(validation_error(
                    "reason",
                    "A reason is required when equipment is not fully available",
                )),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_available_clears_reason() {
        let reason = normalize_availability_reason(AvailabilityStatus::Available, Some("flat tire"));
        assert_eq!(reason.unwrap(), None);
    }

    #[test]
    fn test_unavailable_requires_reason() {
        assert!(normalize_availability_reason(AvailabilityStatus::Unavailable, None).is_err());
        assert!(normalize_availability_reason(AvailabilityStatus::Unavailable, Some("   ")).is_err());
        assert!(normalize_availability_reason(AvailabilityStatus::Partial, Some("")).is_err());
    }

    #[test]
    fn test_reason_is_trimmed() {
        let reason =
            normalize_availability_reason(AvailabilityStatus::Partial, Some("  brake noise ")).unwrap();
        assert_eq!(reason.as_deref(), Some("brake noise"));
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&EquipmentStatus::InMaintenance).unwrap(),
            "\"in-maintenance\""
        );
        assert_eq!(
            serde_json::from_str::<AvailabilityStatus>("\"partial\"").unwrap(),
            AvailabilityStatus::Partial
        );
    }

    #[test]
    fn test_maintenance_due() {
        let now = Utc::now();
        let mut truck = Equipment {
            id: Uuid::new_v4(),
            number: "TR-001".into(),
            model: "Volvo FH".into(),
            mileage: Decimal::new(120_000, 0),
            availability: AvailabilityStatus::Available,
            availability_reason: None,
            availability_updated_at: None,
            availability_updated_by: None,
            status: EquipmentStatus::Operational,
            last_maintenance: None,
            next_maintenance: None,
            created_at: now,
        };
        assert!(!truck.is_maintenance_due(now));

        truck.next_maintenance = Some(now - Duration::days(1));
        assert!(truck.is_maintenance_due(now));
    }
}
