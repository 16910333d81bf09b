use chrono::Utc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::common_dto::ApiResponse;
use crate::dto::equipment_dto::{
    CreateEquipmentRequest, EquipmentFilters, UpdateAvailabilityRequest, UpdateEquipmentRequest,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::auth::Permission;
use crate::models::equipment::{normalize_availability_reason, Equipment};
use crate::repositories::equipment_repository::EquipmentRepository;
use crate::services::authorization_service::AuthorizationService;
use crate::services::change_hub::{ChangeAction, ChangeEvent, ChangeHub, Collection};
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppError};

pub struct EquipmentController {
    repository: EquipmentRepository,
    changes: ChangeHub,
}

impl EquipmentController {
    pub fn new(state: &AppState) -> Self {
        Self {
            repository: EquipmentRepository::new(state.pool.clone()),
            changes: state.changes.clone(),
        }
    }

    pub async fn list(&self, user: &AuthenticatedUser, filters: EquipmentFilters) -> Result<Vec<Equipment>, AppError> {
        AuthorizationService::require(user, Permission::ViewEquipment)?;

        let mut equipment = self.repository.list(&filters).await?;
        if filters.maintenance_due == Some(true) {
            let now = Utc::now();
            equipment.retain(|truck| truck.is_maintenance_due(now));
        }
        Ok(equipment)
    }

    pub async fn get_by_id(&self, user: &AuthenticatedUser, id: Uuid) -> Result<Equipment, AppError> {
        AuthorizationService::require(user, Permission::ViewEquipment)?;

        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Equipment", &id.to_string()))
    }

    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        request: CreateEquipmentRequest,
    ) -> Result<ApiResponse<Equipment>, AppError> {
        AuthorizationService::require(user, Permission::ManageEquipment)?;
        request.validate()?;

        let equipment = self.repository.create(&request).await?;
        info!("🚛 Camión {} registrado por {}", equipment.number, user.email);
        self.publish(equipment.id, ChangeAction::Created);

        Ok(ApiResponse::success_with_message(equipment, "Equipment created"))
    }

    pub async fn update(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        request: UpdateEquipmentRequest,
    ) -> Result<ApiResponse<Equipment>, AppError> {
        AuthorizationService::require(user, Permission::ManageEquipment)?;
        request.validate()?;

        let equipment = self.repository.update(id, &request).await?;
        self.publish(equipment.id, ChangeAction::Updated);

        Ok(ApiResponse::success_with_message(equipment, "Equipment updated"))
    }

    pub async fn update_availability(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        request: UpdateAvailabilityRequest,
    ) -> Result<ApiResponse<Equipment>, AppError> {
        AuthorizationService::require(user, Permission::UpdateAvailability)?;
        let reason = normalize_availability_reason(request.availability, request.reason.as_deref())?;

        let equipment = self
            .repository
            .update_availability(id, request.availability, reason, user.user_id, Utc::now())
            .await?
            .ok_or_else(|| not_found_error("Equipment", &id.to_string()))?;

        info!(
            "🚦 Disponibilidad de {} -> {:?} ({})",
            equipment.number, equipment.availability, user.email
        );
        self.publish(equipment.id, ChangeAction::Updated);

        Ok(ApiResponse::success_with_message(equipment, "Availability updated"))
    }

    pub async fn delete(&self, user: &AuthenticatedUser, id: Uuid) -> Result<(), AppError> {
        AuthorizationService::require(user, Permission::ManageEquipment)?;

        let removed = self
            .repository
            .delete(id)
            .await?
            .ok_or_else(|| not_found_error("Equipment", &id.to_string()))?;

        info!(
            "🗑️ Camión {} eliminado por {} ({} mantenimientos, {} reportes)",
            id,
            user.email,
            removed.maintenance_ids.len(),
            removed.faults.len()
        );

        for record_id in removed.maintenance_ids {
            self.changes
                .publish(ChangeEvent::new(Collection::Maintenance, record_id, ChangeAction::Deleted));
        }
        for (fault_id, reported_by) in removed.faults {
            self.changes.publish(
                ChangeEvent::new(Collection::Faults, fault_id, ChangeAction::Deleted).owned_by(reported_by),
            );
        }
        self.publish(id, ChangeAction::Deleted);
        Ok(())
    }

    fn publish(&self, id: Uuid, action: ChangeAction) {
        self.changes
            .publish(ChangeEvent::new(Collection::Equipment, id, action));
    }
}
