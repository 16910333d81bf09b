use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::models::equipment::{AvailabilityStatus, EquipmentStatus};
use crate::utils::validation::{validate_mileage, validate_not_blank, EQUIPMENT_NUMBER_RE};

// Request para registrar un camión
#[derive(Debug, Deserialize, Validate)]
pub struct CreateEquipmentRequest {
    #[validate(regex = "EQUIPMENT_NUMBER_RE")]
    pub number: String,

    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub model: String,

    #[validate(custom = "validate_mileage")]
    #[serde(default)]
    pub mileage: Decimal,

    pub next_maintenance: Option<DateTime<Utc>>,
}

// Request para actualizar un camión existente
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateEquipmentRequest {
    #[validate(regex = "EQUIPMENT_NUMBER_RE")]
    pub number: Option<String>,

    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub model: Option<String>,

    #[validate(custom = "validate_mileage")]
    pub mileage: Option<Decimal>,

    pub status: Option<EquipmentStatus>,

    pub next_maintenance: Option<DateTime<Utc>>,
}

// Request de la pantalla de disponibilidad
#[derive(Debug, Deserialize)]
pub struct UpdateAvailabilityRequest {
    pub availability: AvailabilityStatus,
    pub reason: Option<String>,
}

/// Filtros para el listado de camiones
#[derive(Debug, Default, Deserialize)]
pub struct EquipmentFilters {
    pub availability: Option<AvailabilityStatus>,
    pub status: Option<EquipmentStatus>,
    /// Solo camiones con el mantenimiento vencido
    pub maintenance_due: Option<bool>,
}
