use tracing::{info, warn};
use uuid::Uuid;

use crate::dto::common_dto::ApiResponse;
use crate::dto::user_dto::{UpdateRoleRequest, UserFilters};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::auth::Permission;
use crate::models::user::UserResponse;
use crate::repositories::user_repository::UserRepository;
use crate::services::authorization_service::AuthorizationService;
use crate::services::change_hub::{ChangeAction, ChangeEvent, Collection};
use crate::state::AppState;
use crate::utils::errors::{forbidden_error, not_found_error, AppError};

pub struct UserController {
    repository: UserRepository,
    state: AppState,
}

impl UserController {
    pub fn new(state: &AppState) -> Self {
        Self {
            repository: UserRepository::new(state.pool.clone()),
            state: state.clone(),
        }
    }

    pub async fn list(&self, user: &AuthenticatedUser, filters: UserFilters) -> Result<Vec<UserResponse>, AppError> {
        AuthorizationService::require(user, Permission::ManageUsers)?;

        let users = self.repository.list(filters.role).await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    pub async fn update_role(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        request: UpdateRoleRequest,
    ) -> Result<ApiResponse<UserResponse>, AppError> {
        AuthorizationService::require(user, Permission::ManageUsers)?;

        if id == user.user_id {
            return Err(forbidden_error("change role", "admins cannot change their own role"));
        }

        let updated = self
            .repository
            .update_role(id, request.role)
            .await?
            .ok_or_else(|| not_found_error("User", &id.to_string()))?;

        // El middleware toma el rol del cache: reemplazar la entrada vieja
        if let Err(e) = self.state.profiles.put(&updated.profile()).await {
            warn!("⚠️ No se pudo actualizar el perfil cacheado de {}: {}", id, e);
            if let Err(e) = self.state.profiles.evict(id).await {
                warn!("⚠️ No se pudo borrar el perfil cacheado de {}: {}", id, e);
            }
        }

        info!(
            "👥 Rol de {} cambiado a {} por {}",
            updated.email,
            updated.role.as_str(),
            user.email
        );
        self.state
            .changes
            .publish(ChangeEvent::new(Collection::Users, id, ChangeAction::Updated));

        Ok(ApiResponse::success_with_message(
            UserResponse::from(updated),
            "Role updated",
        ))
    }
}
