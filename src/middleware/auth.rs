//! Middleware de autenticación JWT
//!
//! Este módulo maneja la autenticación JWT, extracción de tokens
//! y la inyección del usuario autenticado en la request.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    models::auth::UserRole,
    state::AppState,
    utils::{
        errors::AppError,
        jwt::{extract_token_from_header, verify_token, JwtConfig},
    },
};

/// Usuario autenticado que se inyecta en las requests
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
    pub role: UserRole,
    pub session_id: String,
    pub expires_at: DateTime<Utc>,
}

/// Los clientes WebSocket no siempre pueden mandar headers: aceptar `?token=`
fn token_from_query(query: Option<&str>) -> Option<&str> {
    query?
        .split('&')
        .find_map(|pair| pair.strip_prefix("token="))
        .filter(|token| !token.is_empty())
}

/// Middleware de autenticación JWT
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = match request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|auth_str| auth_str.to_str().ok())
    {
        Some(auth_header) => extract_token_from_header(auth_header)?.to_string(),
        None => token_from_query(request.uri().query())
            .map(str::to_string)
            .ok_or_else(|| AppError::Unauthorized("Token de autorización requerido".to_string()))?,
    };

    let claims = verify_token(&token, &JwtConfig::from(&state.config))?;

    if state.is_token_revoked(&claims.jti).await {
        return Err(AppError::Unauthorized("Sesión cerrada".to_string()));
    }

    let user_id = claims.user_id()?;

    // El rol del token solo describe el momento de la emisión; manda el perfil vigente
    let profile = state.resolve_profile(user_id).await?;

    let authenticated_user = AuthenticatedUser {
        user_id,
        email: profile.email,
        role: profile.role,
        session_id: claims.jti.clone(),
        expires_at: claims.expires_at(),
    };

    // Inyectar usuario autenticado en las extensions
    request.extensions_mut().insert(authenticated_user);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_from_query() {
        assert_eq!(token_from_query(Some("token=abc")), Some("abc"));
        assert_eq!(token_from_query(Some("x=1&token=abc.def")), Some("abc.def"));
        assert_eq!(token_from_query(Some("token=")), None);
        assert_eq!(token_from_query(Some("x=1")), None);
        assert_eq!(token_from_query(None), None);
    }
}
