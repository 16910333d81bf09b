use serde::Deserialize;

use crate::models::auth::UserRole;

// Cambio de rol (solo admin)
#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: UserRole,
}

#[derive(Debug, Deserialize)]
pub struct UserFilters {
    pub role: Option<UserRole>,
}
