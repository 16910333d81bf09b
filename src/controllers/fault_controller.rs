use chrono::Utc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::common_dto::ApiResponse;
use crate::dto::fault_dto::{CreateFaultRequest, FaultFilters, TransitionFaultRequest};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::auth::Permission;
use crate::models::fault::{FaultPriority, FaultReport};
use crate::repositories::equipment_repository::EquipmentRepository;
use crate::repositories::fault_repository::FaultRepository;
use crate::services::authorization_service::AuthorizationService;
use crate::services::change_hub::{ChangeAction, ChangeEvent, ChangeHub, Collection};
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppError};

pub struct FaultController {
    repository: FaultRepository,
    equipment: EquipmentRepository,
    changes: ChangeHub,
}

impl FaultController {
    pub fn new(state: &AppState) -> Self {
        Self {
            repository: FaultRepository::new(state.pool.clone()),
            equipment: EquipmentRepository::new(state.pool.clone()),
            changes: state.changes.clone(),
        }
    }

    /// Reportes visibles: todos para quien tiene `ViewAllFaults`, los propios si no
    pub async fn list(&self, user: &AuthenticatedUser, filters: FaultFilters) -> Result<Vec<FaultReport>, AppError> {
        if !AuthorizationService::has_any_permission(
            user.role,
            &[Permission::ReportFault, Permission::ViewAllFaults],
        ) {
            return Err(AppError::Forbidden(format!(
                "role '{}' cannot view fault reports",
                user.role.as_str()
            )));
        }

        let reporter = if AuthorizationService::has_permission(user.role, Permission::ViewAllFaults) {
            None
        } else {
            Some(user.user_id)
        };

        let mut reports = self.repository.list(reporter, &filters).await?;
        if filters.open == Some(true) {
            reports.retain(|report| report.status.is_open());
        }
        Ok(reports)
    }

    pub async fn get_by_id(&self, user: &AuthenticatedUser, id: Uuid) -> Result<FaultReport, AppError> {
        let fault = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Fault report", &id.to_string()))?;

        // Un reporte ajeno se trata como inexistente
        if !AuthorizationService::can_view_fault(user, &fault) {
            return Err(not_found_error("Fault report", &id.to_string()));
        }

        Ok(fault)
    }

    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        request: CreateFaultRequest,
    ) -> Result<ApiResponse<FaultReport>, AppError> {
        AuthorizationService::require(user, Permission::ReportFault)?;
        request.validate()?;

        if !self.equipment.exists(request.equipment_id).await? {
            return Err(not_found_error("Equipment", &request.equipment_id.to_string()));
        }

        let fault = self
            .repository
            .create(
                &request.title,
                &request.description,
                request.equipment_id,
                request.priority.unwrap_or(FaultPriority::Medium),
                user.user_id,
                Utc::now(),
            )
            .await?;

        info!(
            "🚨 Avería reportada: '{}' ({:?}) en {} por {}",
            fault.title, fault.priority, fault.equipment_id, user.email
        );
        self.publish(&fault, ChangeAction::Created);

        Ok(ApiResponse::success_with_message(fault, "Fault reported"))
    }

    pub async fn transition(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        request: TransitionFaultRequest,
    ) -> Result<ApiResponse<FaultReport>, AppError> {
        AuthorizationService::require(user, Permission::UpdateFaultStatus)?;
        request.validate()?;

        let mut fault = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Fault report", &id.to_string()))?;

        let from = fault.status;
        let change = fault
            .transition(request.status, user.user_id, request.comment, Utc::now())
            .map_err(|current| {
                AppError::BadRequest(format!(
                    "Cannot move fault from {:?} to {:?}",
                    current, request.status
                ))
            })?;

        let saved = self
            .repository
            .save_transition(id, from, &change)
            .await?
            .ok_or_else(|| AppError::Conflict("Fault report was modified concurrently".to_string()))?;

        info!("🚨 Avería {} {:?} -> {:?} ({})", saved.id, from, saved.status, user.email);
        self.publish(&saved, ChangeAction::Updated);

        Ok(ApiResponse::success_with_message(saved, "Fault status updated"))
    }

    fn publish(&self, fault: &FaultReport, action: ChangeAction) {
        self.changes.publish(
            ChangeEvent::new(Collection::Faults, fault.id, action).owned_by(fault.reported_by),
        );
    }
}
