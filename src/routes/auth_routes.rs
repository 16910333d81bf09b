use axum::{
    extract::State,
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};

use crate::controllers::auth_controller::{navigation_for, AuthController};
use crate::dto::auth_dto::{AuthResponse, NavigationResponse, SessionResponse, SignInRequest, SignUpRequest};
use crate::dto::common_dto::ApiResponse;
use crate::middleware::auth::{auth_middleware, AuthenticatedUser};
use crate::middleware::rate_limit::rate_limit_middleware;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_auth_router(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/sign-up", post(sign_up))
        .route("/sign-in", post(sign_in))
        .route_layer(middleware::from_fn_with_state(state.clone(), rate_limit_middleware));

    let protected = Router::new()
        .route("/sign-out", post(sign_out))
        .route("/me", get(me))
        .route("/navigation", get(navigation))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    public.merge(protected)
}

async fn sign_up(
    State(state): State<AppState>,
    Json(request): Json<SignUpRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let response = AuthController::new(&state).sign_up(request).await?;
    Ok(Json(response))
}

async fn sign_in(
    State(state): State<AppState>,
    Json(request): Json<SignInRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let response = AuthController::new(&state).sign_in(request).await?;
    Ok(Json(response))
}

async fn sign_out(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Json<ApiResponse<()>> {
    AuthController::new(&state).sign_out(&user).await;
    Json(ApiResponse::message("Signed out"))
}

async fn me(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<SessionResponse>, AppError> {
    let response = AuthController::new(&state).me(&user).await?;
    Ok(Json(response))
}

/// Navegación según el rol del token, sin consultar la base de datos
async fn navigation(Extension(user): Extension<AuthenticatedUser>) -> Json<NavigationResponse> {
    Json(navigation_for(user.role))
}
