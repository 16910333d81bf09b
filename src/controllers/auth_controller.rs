use bcrypt::{hash, verify, DEFAULT_COST};
use tracing::{info, warn};
use validator::Validate;

use crate::dto::auth_dto::{AuthResponse, NavigationResponse, SessionResponse, SignInRequest, SignUpRequest};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::auth::{UserProfile, UserRole};
use crate::repositories::user_repository::UserRepository;
use crate::services::authorization_service::AuthorizationService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::{generate_token, JwtConfig};

/// Navegación permitida para un rol
pub fn navigation_for(role: UserRole) -> NavigationResponse {
    NavigationResponse {
        screens: AuthorizationService::screens_for_role(role),
        permissions: AuthorizationService::permissions_for_role(role).to_vec(),
    }
}

pub struct AuthController {
    repository: UserRepository,
    state: AppState,
}

impl AuthController {
    pub fn new(state: &AppState) -> Self {
        Self {
            repository: UserRepository::new(state.pool.clone()),
            state: state.clone(),
        }
    }

    pub async fn sign_up(&self, request: SignUpRequest) -> Result<AuthResponse, AppError> {
        request.validate()?;

        let email = request.email.trim().to_lowercase();
        if self.repository.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let password_hash = hash(&request.password, DEFAULT_COST)
            .map_err(|e| AppError::Hash(e.to_string()))?;

        // Las cuentas nuevas no ven nada hasta que un admin les asigne rol
        let user = self
            .repository
            .create(&email, &password_hash, UserRole::Default)
            .await?;

        info!("👤 Usuario registrado: {} ({})", user.email, user.id);
        self.open_session(user.profile()).await
    }

    pub async fn sign_in(&self, request: SignInRequest) -> Result<AuthResponse, AppError> {
        request.validate()?;

        let invalid = || AppError::Unauthorized("Invalid email or password".to_string());

        let user = self
            .repository
            .find_by_email(request.email.trim())
            .await?
            .ok_or_else(invalid)?;

        let matches = verify(&request.password, &user.password_hash)
            .map_err(|e| AppError::Hash(e.to_string()))?;
        if !matches {
            warn!("🔒 Contraseña incorrecta para {}", user.email);
            return Err(invalid());
        }

        info!("🔓 Sesión iniciada: {} ({})", user.email, user.role.as_str());
        self.open_session(user.profile()).await
    }

    pub async fn sign_out(&self, user: &AuthenticatedUser) {
        self.state
            .revoke_token(user.session_id.clone(), user.expires_at)
            .await;

        if let Err(e) = self.state.profiles.evict(user.user_id).await {
            warn!("⚠️ No se pudo borrar el perfil cacheado de {}: {}", user.user_id, e);
        }

        info!("🔒 Sesión cerrada: {}", user.email);
    }

    pub async fn me(&self, user: &AuthenticatedUser) -> Result<SessionResponse, AppError> {
        let profile = self.state.resolve_profile(user.user_id).await?;

        Ok(SessionResponse {
            navigation: navigation_for(profile.role),
            profile,
            expires_at: user.expires_at,
        })
    }

    async fn open_session(&self, profile: UserProfile) -> Result<AuthResponse, AppError> {
        let (token, claims) = generate_token(&profile, &JwtConfig::from(&self.state.config))?;
        self.cache_profile(&profile).await;

        Ok(AuthResponse {
            token,
            expires_at: claims.expires_at(),
            navigation: navigation_for(profile.role),
            profile,
        })
    }

    async fn cache_profile(&self, profile: &UserProfile) {
        if let Err(e) = self.state.profiles.put(profile).await {
            warn!("⚠️ No se pudo cachear el perfil de {}: {}", profile.id, e);
        }
    }
}
