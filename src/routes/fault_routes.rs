use axum::{
    extract::{Path, Query, State},
    routing::{get, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::fault_controller::FaultController;
use crate::dto::common_dto::ApiResponse;
use crate::dto::fault_dto::{CreateFaultRequest, FaultFilters, TransitionFaultRequest};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::fault::FaultReport;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_fault_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_faults).post(create_fault))
        .route("/:id", get(get_fault))
        .route("/:id/status", put(transition_fault))
}

async fn list_faults(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(filters): Query<FaultFilters>,
) -> Result<Json<Vec<FaultReport>>, AppError> {
    let response = FaultController::new(&state).list(&user, filters).await?;
    Ok(Json(response))
}

async fn get_fault(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<FaultReport>, AppError> {
    let response = FaultController::new(&state).get_by_id(&user, id).await?;
    Ok(Json(response))
}

async fn create_fault(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateFaultRequest>,
) -> Result<Json<ApiResponse<FaultReport>>, AppError> {
    let response = FaultController::new(&state).create(&user, request).await?;
    Ok(Json(response))
}

async fn transition_fault(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<TransitionFaultRequest>,
) -> Result<Json<ApiResponse<FaultReport>>, AppError> {
    let response = FaultController::new(&state).transition(&user, id, request).await?;
    Ok(Json(response))
}
