use serde::{Deserialize, Serialize};

/// Estadísticas del tablero principal.
///
/// `Default` son las estadísticas en cero que se devuelven cuando la base
/// de datos falla (`degraded = true`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_equipment: i64,
    pub available_equipment: i64,
    pub partial_equipment: i64,
    pub unavailable_equipment: i64,
    pub maintenance_due: i64,
    pub pending_maintenance: i64,
    pub in_progress_maintenance: i64,
    pub low_stock_parts: i64,
    pub open_faults: i64,
    pub degraded: bool,
}

impl DashboardStats {
    pub fn degraded() -> Self {
        Self {
            degraded: true,
            ..Self::default()
        }
    }
}
