//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::cache::ProfileStore;
use crate::config::environment::EnvironmentConfig;
use crate::middleware::rate_limit::RateLimitState;
use crate::models::auth::UserProfile;
use crate::repositories::user_repository::UserRepository;
use crate::services::change_hub::ChangeHub;
use crate::utils::errors::AppError;

/// Sesión cerrada con sign-out; se guarda hasta que el token expire
#[derive(Clone, Debug)]
pub struct RevokedToken {
    pub session_id: String,
    pub expires_at: DateTime<Utc>,
}

impl RevokedToken {
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub profiles: Arc<dyn ProfileStore>,
    pub changes: ChangeHub,
    pub rate_limit: RateLimitState,
    pub revoked_tokens: Arc<RwLock<HashMap<String, RevokedToken>>>,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig, profiles: Arc<dyn ProfileStore>) -> Self {
        let rate_limit = RateLimitState::new(&config);
        Self {
            pool,
            config,
            profiles,
            changes: ChangeHub::new(),
            rate_limit,
            revoked_tokens: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Perfil vigente del usuario: cache primero, si falta la base de datos (y se vuelve a cachear)
    pub async fn resolve_profile(&self, user_id: Uuid) -> Result<UserProfile, AppError> {
        match self.profiles.get(user_id).await {
            Ok(Some(profile)) => return Ok(profile),
            Ok(None) => {}
            Err(e) => warn!("⚠️ Error leyendo cache de perfiles: {}", e),
        }

        let profile = UserRepository::new(self.pool.clone())
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("User no longer exists".to_string()))?
            .profile();

        if let Err(e) = self.profiles.put(&profile).await {
            warn!("⚠️ No se pudo cachear el perfil de {}: {}", profile.id, e);
        }
        Ok(profile)
    }

    /// Revocar la sesión de un token (sign-out)
    pub async fn revoke_token(&self, session_id: String, expires_at: DateTime<Utc>) {
        let mut tokens = self.revoked_tokens.write().await;
        tokens.insert(
            session_id.clone(),
            RevokedToken {
                session_id,
                expires_at,
            },
        );
        debug!("🔒 Sesiones revocadas: {}", tokens.len());
    }

    pub async fn is_token_revoked(&self, session_id: &str) -> bool {
        self.revoked_tokens.read().await.contains_key(session_id)
    }

    /// Limpiar sesiones revocadas cuyo token ya expiró
    pub async fn cleanup_expired_tokens(&self) {
        let mut tokens = self.revoked_tokens.write().await;
        let before = tokens.len();
        tokens.retain(|_, token| !token.is_expired());
        if tokens.len() != before {
            info!("🧹 {} sesiones revocadas expiradas eliminadas", before - tokens.len());
        }
    }
}
