use axum::{extract::State, routing::get, Extension, Json, Router};

use crate::controllers::dashboard_controller::DashboardController;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::dashboard::DashboardStats;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_dashboard_router() -> Router<AppState> {
    Router::new().route("/", get(get_stats))
}

async fn get_stats(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<DashboardStats>, AppError> {
    let response = DashboardController::new(&state).stats(&user).await?;
    Ok(Json(response))
}
