use crate::middleware::auth::AuthenticatedUser;
use crate::models::auth::{Permission, Screen, UserRole};
use crate::models::fault::FaultReport;
use crate::utils::errors::{forbidden_error, AppError};

const ADMIN_PERMISSIONS: &[Permission] = &[
    Permission::ViewDashboard,
    Permission::ViewEquipment,
    Permission::ManageEquipment,
    Permission::ViewAvailability,
    Permission::UpdateAvailability,
    Permission::ViewMaintenance,
    Permission::RecordMaintenance,
    Permission::ViewInventory,
    Permission::ManageInventory,
    Permission::ReportFault,
    Permission::ViewAllFaults,
    Permission::UpdateFaultStatus,
    Permission::ManageUsers,
];

const MECHANIC_PERMISSIONS: &[Permission] = &[
    Permission::ViewDashboard,
    Permission::ViewEquipment,
    Permission::ViewAvailability,
    Permission::UpdateAvailability,
    Permission::ViewMaintenance,
    Permission::RecordMaintenance,
    Permission::ViewInventory,
    Permission::ManageInventory,
    Permission::ReportFault,
    Permission::ViewAllFaults,
    Permission::UpdateFaultStatus,
];

const DRIVER_PERMISSIONS: &[Permission] = &[
    Permission::ViewDashboard,
    Permission::ViewEquipment,
    Permission::ViewAvailability,
    Permission::ReportFault,
];

const DEFAULT_PERMISSIONS: &[Permission] = &[Permission::ViewDashboard];

/// Servicio de autorización: tabla estática rol → permisos
pub struct AuthorizationService;

impl AuthorizationService {
    /// Obtiene los permisos de un rol
    pub fn permissions_for_role(role: UserRole) -> &'static [Permission] {
        match role {
            UserRole::Admin => ADMIN_PERMISSIONS,
            UserRole::Mechanic => MECHANIC_PERMISSIONS,
            UserRole::Driver => DRIVER_PERMISSIONS,
            UserRole::Default => DEFAULT_PERMISSIONS,
        }
    }

    /// Verifica si un rol tiene un permiso específico
    pub fn has_permission(role: UserRole, permission: Permission) -> bool {
        Self::permissions_for_role(role).contains(&permission)
    }

    /// Verifica si un rol tiene al menos uno de los permisos
    pub fn has_any_permission(role: UserRole, permissions: &[Permission]) -> bool {
        permissions.iter().any(|p| Self::has_permission(role, *p))
    }

    /// Falla con 403 si el usuario no tiene el permiso
    pub fn require(user: &AuthenticatedUser, permission: Permission) -> Result<(), AppError> {
        if Self::has_permission(user.role, permission) {
            Ok(())
        } else {
            Err(forbidden_error(
                &format!("{:?}", permission),
                &format!("role '{}' lacks this permission", user.role.as_str()),
            ))
        }
    }

    /// Pantallas a las que puede navegar un rol
    pub fn screens_for_role(role: UserRole) -> Vec<Screen> {
        Screen::ALL
            .into_iter()
            .filter(|screen| Self::has_any_permission(role, screen.gate()))
            .collect()
    }

    /// Admins y mecánicos ven todos los reportes; el resto solo los propios
    pub fn can_view_fault(user: &AuthenticatedUser, fault: &FaultReport) -> bool {
        Self::has_permission(user.role, Permission::ViewAllFaults) || fault.reported_by == user.user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn user(role: UserRole) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: Uuid::new_v4(),
            email: format!("{}@fleet.test", role.as_str()),
            role,
            session_id: Uuid::new_v4().to_string(),
            expires_at: Utc::now(),
        }
    }

    #[test]
    fn test_admin_has_every_permission() {
        for permission in ADMIN_PERMISSIONS {
            assert!(AuthorizationService::has_permission(UserRole::Admin, *permission));
        }
        assert_eq!(
            AuthorizationService::screens_for_role(UserRole::Admin),
            Screen::ALL.to_vec()
        );
    }

    #[test]
    fn test_mechanic_cannot_manage_users_or_equipment() {
        assert!(!AuthorizationService::has_permission(UserRole::Mechanic, Permission::ManageUsers));
        assert!(!AuthorizationService::has_permission(UserRole::Mechanic, Permission::ManageEquipment));
        assert!(AuthorizationService::has_permission(UserRole::Mechanic, Permission::UpdateFaultStatus));

        let screens = AuthorizationService::screens_for_role(UserRole::Mechanic);
        assert!(screens.contains(&Screen::Inventory));
        assert!(!screens.contains(&Screen::Users));
    }

    #[test]
    fn test_driver_screens() {
        let screens = AuthorizationService::screens_for_role(UserRole::Driver);
        assert_eq!(
            screens,
            vec![
                Screen::Dashboard,
                Screen::Equipment,
                Screen::Availability,
                Screen::FaultReports
            ]
        );
        assert!(!AuthorizationService::has_permission(UserRole::Driver, Permission::UpdateAvailability));
    }

    #[test]
    fn test_default_role_only_sees_dashboard() {
        assert_eq!(
            AuthorizationService::screens_for_role(UserRole::Default),
            vec![Screen::Dashboard]
        );
    }

    #[test]
    fn test_require_returns_forbidden() {
        let driver = user(UserRole::Driver);
        assert!(AuthorizationService::require(&driver, Permission::ReportFault).is_ok());
        assert!(matches!(
            AuthorizationService::require(&driver, Permission::ManageInventory),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_driver_only_sees_own_fault() {
        use crate::models::fault::{FaultPriority, FaultStatus};
        use sqlx::types::Json;

        let driver = user(UserRole::Driver);
        let mechanic = user(UserRole::Mechanic);
        let now = Utc::now();
        let mut fault = FaultReport {
            id: Uuid::new_v4(),
            title: "Oil leak".into(),
            description: "Drops under the engine".into(),
            equipment_id: Uuid::new_v4(),
            priority: FaultPriority::Medium,
            status: FaultStatus::Pending,
            reported_by: Uuid::new_v4(),
            history: Json(vec![]),
            created_at: now,
            updated_at: now,
        };

        assert!(!AuthorizationService::can_view_fault(&driver, &fault));
        assert!(AuthorizationService::can_view_fault(&mechanic, &fault));

        fault.reported_by = driver.user_id;
        assert!(AuthorizationService::can_view_fault(&driver, &fault));
    }
}
