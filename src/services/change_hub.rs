//! Difusión de cambios para las suscripciones en vivo
//!
//! Cada mutación publica un `ChangeEvent` después de escribir en la base
//! de datos. Cada socket en vivo mantiene su propio receptor; soltar el
//! receptor es desuscribirse.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

use crate::models::auth::{Permission, UserRole};
use crate::services::authorization_service::AuthorizationService;

const CHANNEL_CAPACITY: usize = 256;

/// Colecciones observables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Equipment,
    Maintenance,
    Inventory,
    Faults,
    Users,
}

impl Collection {
    pub fn from_path(segment: &str) -> Option<Self> {
        match segment {
            "equipment" => Some(Collection::Equipment),
            "maintenance" => Some(Collection::Maintenance),
            "inventory" => Some(Collection::Inventory),
            "faults" => Some(Collection::Faults),
            "users" => Some(Collection::Users),
            _ => None,
        }
    }

    /// Permisos que permiten leer la colección
    pub fn read_permissions(&self) -> &'static [Permission] {
        match self {
            Collection::Equipment => &[Permission::ViewEquipment, Permission::ViewAvailability],
            Collection::Maintenance => &[Permission::ViewMaintenance],
            Collection::Inventory => &[Permission::ViewInventory],
            Collection::Faults => &[Permission::ReportFault, Permission::ViewAllFaults],
            Collection::Users => &[Permission::ManageUsers],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeAction {
    Created,
    Updated,
    Deleted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub collection: Collection,
    pub document_id: Uuid,
    pub action: ChangeAction,
    /// Dueño del documento cuando la visibilidad depende de él (reportes de avería)
    pub owner: Option<Uuid>,
}

impl ChangeEvent {
    pub fn new(collection: Collection, document_id: Uuid, action: ChangeAction) -> Self {
        Self {
            collection,
            document_id,
            action,
            owner: None,
        }
    }

    pub fn owned_by(mut self, owner: Uuid) -> Self {
        self.owner = Some(owner);
        self
    }

    /// El suscriptor debe recibir este evento
    pub fn is_visible_to(&self, collection: Collection, user_id: Uuid, role: UserRole) -> bool {
        if self.collection != collection {
            return false;
        }
        if !AuthorizationService::has_any_permission(role, collection.read_permissions()) {
            return false;
        }
        if collection == Collection::Faults
            && !AuthorizationService::has_permission(role, Permission::ViewAllFaults)
        {
            return self.owner == Some(user_id);
        }
        true
    }
}

#[derive(Clone)]
pub struct ChangeHub {
    sender: broadcast::Sender<ChangeEvent>,
}

impl ChangeHub {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.sender.subscribe()
    }

    /// Publicar un cambio; sin suscriptores el evento se descarta
    pub fn publish(&self, event: ChangeEvent) {
        debug!(
            "📣 {:?} {:?} {} ({} suscriptores)",
            event.collection,
            event.action,
            event.document_id,
            self.sender.receiver_count()
        );
        let _ = self.sender.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ChangeHub {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribe_receive_and_unsubscribe() {
        let hub = ChangeHub::new();
        let mut rx = hub.subscribe();
        assert_eq!(hub.subscriber_count(), 1);

        let event = ChangeEvent::new(Collection::Inventory, Uuid::new_v4(), ChangeAction::Updated);
        hub.publish(event.clone());
        assert_eq!(rx.recv().await.unwrap(), event);

        drop(rx);
        assert_eq!(hub.subscriber_count(), 0);
    }

    #[test]
    fn test_publish_without_subscribers_is_harmless() {
        let hub = ChangeHub::new();
        hub.publish(ChangeEvent::new(Collection::Equipment, Uuid::new_v4(), ChangeAction::Deleted));
    }

    #[test]
    fn test_driver_only_sees_own_fault_events() {
        let driver = Uuid::new_v4();
        let own = ChangeEvent::new(Collection::Faults, Uuid::new_v4(), ChangeAction::Updated).owned_by(driver);
        let other = ChangeEvent::new(Collection::Faults, Uuid::new_v4(), ChangeAction::Updated)
            .owned_by(Uuid::new_v4());

        assert!(own.is_visible_to(Collection::Faults, driver, UserRole::Driver));
        assert!(!other.is_visible_to(Collection::Faults, driver, UserRole::Driver));
        assert!(other.is_visible_to(Collection::Faults, Uuid::new_v4(), UserRole::Mechanic));
    }

    #[test]
    fn test_events_filtered_by_collection_and_permission() {
        let event = ChangeEvent::new(Collection::Inventory, Uuid::new_v4(), ChangeAction::Created);
        let user = Uuid::new_v4();

        assert!(event.is_visible_to(Collection::Inventory, user, UserRole::Mechanic));
        assert!(!event.is_visible_to(Collection::Equipment, user, UserRole::Mechanic));
        assert!(!event.is_visible_to(Collection::Inventory, user, UserRole::Driver));
    }

    #[test]
    fn test_collection_from_path() {
        assert_eq!(Collection::from_path("faults"), Some(Collection::Faults));
        assert_eq!(Collection::from_path("users"), Some(Collection::Users));
        assert_eq!(Collection::from_path("nope"), None);
    }
}
