use chrono::Utc;
use tracing::error;

use crate::middleware::auth::AuthenticatedUser;
use crate::models::auth::Permission;
use crate::models::dashboard::DashboardStats;
use crate::repositories::dashboard_repository::DashboardRepository;
use crate::services::authorization_service::AuthorizationService;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub struct DashboardController {
    repository: DashboardRepository,
}

impl DashboardController {
    pub fn new(state: &AppState) -> Self {
        Self {
            repository: DashboardRepository::new(state.pool.clone()),
        }
    }

    /// Estadísticas del tablero; si la base de datos falla devuelve ceros con `degraded`
    pub async fn stats(&self, user: &AuthenticatedUser) -> Result<DashboardStats, AppError> {
        AuthorizationService::require(user, Permission::ViewDashboard)?;

        let fault_reporter = if AuthorizationService::has_permission(user.role, Permission::ViewAllFaults) {
            None
        } else {
            Some(user.user_id)
        };

        match self.repository.stats(fault_reporter, Utc::now()).await {
            Ok(stats) => Ok(stats),
            Err(e) => {
                error!("❌ Error cargando el dashboard: {}", e);
                Ok(DashboardStats::degraded())
            }
        }
    }
}
