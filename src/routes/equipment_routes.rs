use axum::{
    extract::{Path, Query, State},
    routing::{get, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::equipment_controller::EquipmentController;
use crate::dto::common_dto::ApiResponse;
use crate::dto::equipment_dto::{
    CreateEquipmentRequest, EquipmentFilters, UpdateAvailabilityRequest, UpdateEquipmentRequest,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::equipment::Equipment;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_equipment_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_equipment).post(create_equipment))
        .route(
            "/:id",
            get(get_equipment).put(update_equipment).delete(delete_equipment),
        )
        .route("/:id/availability", put(update_availability))
}

async fn list_equipment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(filters): Query<EquipmentFilters>,
) -> Result<Json<Vec<Equipment>>, AppError> {
    let response = EquipmentController::new(&state).list(&user, filters).await?;
    Ok(Json(response))
}

async fn get_equipment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Equipment>, AppError> {
    let response = EquipmentController::new(&state).get_by_id(&user, id).await?;
    Ok(Json(response))
}

async fn create_equipment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateEquipmentRequest>,
) -> Result<Json<ApiResponse<Equipment>>, AppError> {
    let response = EquipmentController::new(&state).create(&user, request).await?;
    Ok(Json(response))
}

async fn update_equipment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateEquipmentRequest>,
) -> Result<Json<ApiResponse<Equipment>>, AppError> {
    let response = EquipmentController::new(&state).update(&user, id, request).await?;
    Ok(Json(response))
}

async fn update_availability(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateAvailabilityRequest>,
) -> Result<Json<ApiResponse<Equipment>>, AppError> {
    let response = EquipmentController::new(&state)
        .update_availability(&user, id, request)
        .await?;
    Ok(Json(response))
}

async fn delete_equipment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    EquipmentController::new(&state).delete(&user, id).await?;
    Ok(Json(ApiResponse::message("Equipment deleted")))
}
