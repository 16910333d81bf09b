use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Roles del sistema - mapea al ENUM user_role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Mechanic,
    Driver,
    Default,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Mechanic => "mechanic",
            UserRole::Driver => "driver",
            UserRole::Default => "default",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(UserRole::Admin),
            "mechanic" => Some(UserRole::Mechanic),
            "driver" => Some(UserRole::Driver),
            "default" => Some(UserRole::Default),
            _ => None,
        }
    }
}

/// Acciones que un rol puede realizar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ViewDashboard,
    ViewEquipment,
    ManageEquipment,
    ViewAvailability,
    UpdateAvailability,
    ViewMaintenance,
    RecordMaintenance,
    ViewInventory,
    ManageInventory,
    ReportFault,
    ViewAllFaults,
    UpdateFaultStatus,
    ManageUsers,
}

/// Pantallas de la aplicación móvil
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Dashboard,
    Equipment,
    Availability,
    Maintenance,
    Inventory,
    FaultReports,
    Users,
}

impl Screen {
    pub const ALL: [Screen; 7] = [
        Screen::Dashboard,
        Screen::Equipment,
        Screen::Availability,
        Screen::Maintenance,
        Screen::Inventory,
        Screen::FaultReports,
        Screen::Users,
    ];

    /// Permisos que abren la pantalla (basta con uno)
    pub fn gate(&self) -> &'static [Permission] {
        match self {
            Screen::Dashboard => &[Permission::ViewDashboard],
            Screen::Equipment => &[Permission::ViewEquipment],
            Screen::Availability => &[Permission::ViewAvailability],
            Screen::Maintenance => &[Permission::ViewMaintenance],
            Screen::Inventory => &[Permission::ViewInventory],
            Screen::FaultReports => &[Permission::ReportFault, Permission::ViewAllFaults],
            Screen::Users => &[Permission::ManageUsers],
        }
    }
}

/// Perfil del usuario autenticado, tal como se guarda en el cache
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub role: UserRole,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip_names() {
        for role in [UserRole::Admin, UserRole::Mechanic, UserRole::Driver, UserRole::Default] {
            assert_eq!(UserRole::from_str(role.as_str()), Some(role));
        }
        assert_eq!(UserRole::from_str("livreur"), None);
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&UserRole::Mechanic).unwrap();
        assert_eq!(json, "\"mechanic\"");
    }
}
