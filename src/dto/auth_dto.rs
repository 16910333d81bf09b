use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::auth::{Permission, Screen, UserProfile};

// Sign-up request
#[derive(Debug, Deserialize, Validate)]
pub struct SignUpRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

// Sign-in request
#[derive(Debug, Deserialize, Validate)]
pub struct SignInRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

/// Qué puede ver y hacer el usuario en la app
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationResponse {
    pub screens: Vec<Screen>,
    pub permissions: Vec<Permission>,
}

// Respuesta de sign-in / sign-up
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub profile: UserProfile,
    pub navigation: NavigationResponse,
}

// Respuesta de /me
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub profile: UserProfile,
    pub navigation: NavigationResponse,
    pub expires_at: DateTime<Utc>,
}
