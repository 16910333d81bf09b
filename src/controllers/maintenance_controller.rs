use chrono::Utc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::common_dto::ApiResponse;
use crate::dto::maintenance_dto::{
    CreateMaintenanceRequest, MaintenanceFilters, UpdateMaintenanceStatusRequest,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::auth::Permission;
use crate::models::maintenance::{
    merge_part_usage, next_maintenance_after, MaintenanceRecord, MaintenanceStatus,
};
use crate::repositories::equipment_repository::EquipmentRepository;
use crate::repositories::maintenance_repository::{MaintenanceRepository, NewMaintenanceRecord};
use crate::services::authorization_service::AuthorizationService;
use crate::services::change_hub::{ChangeAction, ChangeEvent, ChangeHub, Collection};
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppError};

pub struct MaintenanceController {
    repository: MaintenanceRepository,
    equipment: EquipmentRepository,
    changes: ChangeHub,
    interval_days: i64,
}

impl MaintenanceController {
    pub fn new(state: &AppState) -> Self {
        Self {
            repository: MaintenanceRepository::new(state.pool.clone()),
            equipment: EquipmentRepository::new(state.pool.clone()),
            changes: state.changes.clone(),
            interval_days: state.config.maintenance_interval_days,
        }
    }

    pub async fn list(
        &self,
        user: &AuthenticatedUser,
        filters: MaintenanceFilters,
    ) -> Result<Vec<MaintenanceRecord>, AppError> {
        AuthorizationService::require(user, Permission::ViewMaintenance)?;
        self.repository.list(&filters).await
    }

    pub async fn get_by_id(&self, user: &AuthenticatedUser, id: Uuid) -> Result<MaintenanceRecord, AppError> {
        AuthorizationService::require(user, Permission::ViewMaintenance)?;

        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Maintenance record", &id.to_string()))
    }

    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        request: CreateMaintenanceRequest,
    ) -> Result<ApiResponse<MaintenanceRecord>, AppError> {
        AuthorizationService::require(user, Permission::RecordMaintenance)?;
        request.validate()?;

        if !self.equipment.exists(request.equipment_id).await? {
            return Err(not_found_error("Equipment", &request.equipment_id.to_string()));
        }

        let parts_used = merge_part_usage(&request.parts_used)?;

        let (record, consumed) = self
            .repository
            .create(NewMaintenanceRecord {
                equipment_id: request.equipment_id,
                maintenance_type: request.maintenance_type,
                description: request.description,
                mileage: request.mileage,
                mechanic_id: request.mechanic_id.unwrap_or(user.user_id),
                parts_used,
            })
            .await?;

        info!(
            "🔧 Mantenimiento {} registrado para {} ({} piezas)",
            record.id,
            record.equipment_id,
            consumed.len()
        );

        self.changes.publish(ChangeEvent::new(
            Collection::Maintenance,
            record.id,
            ChangeAction::Created,
        ));
        for part in &consumed {
            self.changes
                .publish(ChangeEvent::new(Collection::Inventory, part.id, ChangeAction::Updated));
        }

        Ok(ApiResponse::success_with_message(record, "Maintenance record created"))
    }

    pub async fn update_status(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        request: UpdateMaintenanceStatusRequest,
    ) -> Result<ApiResponse<MaintenanceRecord>, AppError> {
        AuthorizationService::require(user, Permission::RecordMaintenance)?;

        let current = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Maintenance record", &id.to_string()))?;

        if !current.status.can_transition_to(request.status) {
            return Err(AppError::BadRequest(format!(
                "Cannot move maintenance from {:?} to {:?}",
                current.status, request.status
            )));
        }

        let updated = if request.status == MaintenanceStatus::Completed {
            let completed_at = Utc::now();
            self.repository
                .complete(
                    id,
                    current.status,
                    completed_at,
                    next_maintenance_after(completed_at, self.interval_days),
                )
                .await?
        } else {
            self.repository
                .update_status(id, current.status, request.status)
                .await?
        };

        // Otro usuario cambió el estado entre la lectura y la escritura
        let updated = updated.ok_or_else(|| {
            AppError::Conflict("Maintenance record was modified concurrently".to_string())
        })?;

        info!("🔧 Mantenimiento {} -> {:?}", updated.id, updated.status);
        self.changes.publish(ChangeEvent::new(
            Collection::Maintenance,
            updated.id,
            ChangeAction::Updated,
        ));
        if updated.status == MaintenanceStatus::Completed {
            self.changes.publish(ChangeEvent::new(
                Collection::Equipment,
                updated.equipment_id,
                ChangeAction::Updated,
            ));
        }

        Ok(ApiResponse::success_with_message(updated, "Maintenance status updated"))
    }
}
