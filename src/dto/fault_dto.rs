use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::models::fault::{FaultPriority, FaultStatus};
use crate::utils::validation::validate_not_blank;

// Request para reportar una avería
#[derive(Debug, Deserialize, Validate)]
pub struct CreateFaultRequest {
    #[validate(length(min = 1, max = 200), custom = "validate_not_blank")]
    pub title: String,

    #[validate(length(min = 1, max = 4000), custom = "validate_not_blank")]
    pub description: String,

    pub equipment_id: Uuid,

    pub priority: Option<FaultPriority>,
}

// Cambio de estado de un reporte
#[derive(Debug, Deserialize, Validate)]
pub struct TransitionFaultRequest {
    pub status: FaultStatus,

    #[validate(length(max = 1000))]
    pub comment: Option<String>,
}

/// Filtros del listado de averías
#[derive(Debug, Default, Deserialize)]
pub struct FaultFilters {
    pub status: Option<FaultStatus>,
    pub equipment_id: Option<Uuid>,
    /// Solo pendientes y en curso
    pub open: Option<bool>,
}
