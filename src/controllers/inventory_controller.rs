use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::dto::common_dto::ApiResponse;
use crate::dto::part_dto::{AdjustQuantityRequest, CreatePartRequest, PartFilters, UpdatePartRequest};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::auth::Permission;
use crate::models::part::{apply_quantity_delta, Part};
use crate::repositories::part_repository::PartRepository;
use crate::services::authorization_service::AuthorizationService;
use crate::services::change_hub::{ChangeAction, ChangeEvent, ChangeHub, Collection};
use crate::state::AppState;
use crate::utils::errors::{not_found_error, validation_error, AppError};

pub struct InventoryController {
    repository: PartRepository,
    changes: ChangeHub,
}

impl InventoryController {
    pub fn new(state: &AppState) -> Self {
        Self {
            repository: PartRepository::new(state.pool.clone()),
            changes: state.changes.clone(),
        }
    }

    pub async fn list(&self, user: &AuthenticatedUser, filters: PartFilters) -> Result<Vec<Part>, AppError> {
        AuthorizationService::require(user, Permission::ViewInventory)?;
        self.repository.list(&filters).await
    }

    pub async fn get_by_id(&self, user: &AuthenticatedUser, id: Uuid) -> Result<Part, AppError> {
        AuthorizationService::require(user, Permission::ViewInventory)?;

        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Part", &id.to_string()))
    }

    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        request: CreatePartRequest,
    ) -> Result<ApiResponse<Part>, AppError> {
        AuthorizationService::require(user, Permission::ManageInventory)?;
        request.validate()?;

        let part = self.repository.create(&request).await?;
        info!("📦 Pieza {} ({}) creada por {}", part.code, part.id, user.email);
        self.publish(part.id, ChangeAction::Created);

        Ok(ApiResponse::success_with_message(part, "Part created"))
    }

    pub async fn update(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        request: UpdatePartRequest,
    ) -> Result<ApiResponse<Part>, AppError> {
        AuthorizationService::require(user, Permission::ManageInventory)?;
        request.validate()?;

        let part = self.repository.update(id, &request).await?;
        self.publish(part.id, ChangeAction::Updated);

        Ok(ApiResponse::success_with_message(part, "Part updated"))
    }

    pub async fn adjust_quantity(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        request: AdjustQuantityRequest,
    ) -> Result<ApiResponse<Part>, AppError> {
        AuthorizationService::require(user, Permission::ManageInventory)?;

        if request.delta == 0 {
            return Err(validation_error("delta", "Adjustment must not be zero"));
        }

        let part = match self.repository.adjust_quantity(id, request.delta).await? {
            Some(part) => part,
            None => {
                // Distinguir "no existe" de "quedaría en negativo"
                let current = self
                    .repository
                    .find_by_id(id)
                    .await?
                    .ok_or_else(|| not_found_error("Part", &id.to_string()))?;
                return Err(match apply_quantity_delta(current.quantity, request.delta) {
                    None => AppError::Conflict(format!(
                        "Cannot remove {} units from '{}': only {} in stock",
                        -i64::from(request.delta),
                        current.code,
                        current.quantity
                    )),
                    Some(_) => AppError::Conflict("Part was modified concurrently".to_string()),
                });
            }
        };

        info!(
            "📦 Stock de {}: {:+} -> {} ({}{})",
            part.code,
            request.delta,
            part.quantity,
            user.email,
            request
                .reason
                .as_deref()
                .map(|r| format!(", {}", r.trim()))
                .unwrap_or_default()
        );
        if part.is_low_stock() {
            warn!("⚠️ Stock bajo: {} ({} <= {})", part.code, part.quantity, part.minimum_quantity);
        }
        self.publish(part.id, ChangeAction::Updated);

        Ok(ApiResponse::success_with_message(part, "Stock adjusted"))
    }

    pub async fn delete(&self, user: &AuthenticatedUser, id: Uuid) -> Result<(), AppError> {
        AuthorizationService::require(user, Permission::ManageInventory)?;

        if !self.repository.delete(id).await? {
            return Err(not_found_error("Part", &id.to_string()));
        }

        self.publish(id, ChangeAction::Deleted);
        Ok(())
    }

    fn publish(&self, id: Uuid, action: ChangeAction) {
        self.changes
            .publish(ChangeEvent::new(Collection::Inventory, id, action));
    }
}
