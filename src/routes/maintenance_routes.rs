use axum::{
    extract::{Path, Query, State},
    routing::{get, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::maintenance_controller::MaintenanceController;
use crate::dto::common_dto::ApiResponse;
use crate::dto::maintenance_dto::{
    CreateMaintenanceRequest, MaintenanceFilters, UpdateMaintenanceStatusRequest,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::maintenance::MaintenanceRecord;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_maintenance_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_records).post(create_record))
        .route("/:id", get(get_record))
        .route("/:id/status", put(update_status))
}

async fn list_records(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(filters): Query<MaintenanceFilters>,
) -> Result<Json<Vec<MaintenanceRecord>>, AppError> {
    let response = MaintenanceController::new(&state).list(&user, filters).await?;
    Ok(Json(response))
}

async fn get_record(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<MaintenanceRecord>, AppError> {
    let response = MaintenanceController::new(&state).get_by_id(&user, id).await?;
    Ok(Json(response))
}

async fn create_record(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateMaintenanceRequest>,
) -> Result<Json<ApiResponse<MaintenanceRecord>>, AppError> {
    let response = MaintenanceController::new(&state).create(&user, request).await?;
    Ok(Json(response))
}

async fn update_status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateMaintenanceStatusRequest>,
) -> Result<Json<ApiResponse<MaintenanceRecord>>, AppError> {
    let response = MaintenanceController::new(&state)
        .update_status(&user, id, request)
        .await?;
    Ok(Json(response))
}
