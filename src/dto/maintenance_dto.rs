use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::models::maintenance::{MaintenanceStatus, MaintenanceType, PartUsage};
use crate::utils::validation::{validate_mileage, validate_not_blank};

// Request para registrar un mantenimiento
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMaintenanceRequest {
    pub equipment_id: Uuid,

    pub maintenance_type: MaintenanceType,

    #[validate(length(min = 1, max = 2000), custom = "validate_not_blank")]
    pub description: String,

    #[validate(custom = "validate_mileage")]
    #[serde(default)]
    pub mileage: Decimal,

    /// Por defecto el mecánico que registra
    pub mechanic_id: Option<Uuid>,

    #[validate]
    #[serde(default)]
    pub parts_used: Vec<PartUsage>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMaintenanceStatusRequest {
    pub status: MaintenanceStatus,
}

/// Filtros para el historial de mantenimiento
#[derive(Debug, Default, Deserialize)]
pub struct MaintenanceFilters {
    pub equipment_id: Option<Uuid>,
    pub status: Option<MaintenanceStatus>,
}
