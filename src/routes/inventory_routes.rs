use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::inventory_controller::InventoryController;
use crate::dto::common_dto::ApiResponse;
use crate::dto::part_dto::{AdjustQuantityRequest, CreatePartRequest, PartFilters, UpdatePartRequest};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::part::Part;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_inventory_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_parts).post(create_part))
        .route("/:id", get(get_part).put(update_part).delete(delete_part))
        .route("/:id/adjust", post(adjust_quantity))
}

async fn list_parts(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(filters): Query<PartFilters>,
) -> Result<Json<Vec<Part>>, AppError> {
    let response = InventoryController::new(&state).list(&user, filters).await?;
    Ok(Json(response))
}

async fn get_part(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Part>, AppError> {
    let response = InventoryController::new(&state).get_by_id(&user, id).await?;
    Ok(Json(response))
}

async fn create_part(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreatePartRequest>,
) -> Result<Json<ApiResponse<Part>>, AppError> {
    let response = InventoryController::new(&state).create(&user, request).await?;
    Ok(Json(response))
}

async fn update_part(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdatePartRequest>,
) -> Result<Json<ApiResponse<Part>>, AppError> {
    let response = InventoryController::new(&state).update(&user, id, request).await?;
    Ok(Json(response))
}

async fn adjust_quantity(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<AdjustQuantityRequest>,
) -> Result<Json<ApiResponse<Part>>, AppError> {
    let response = InventoryController::new(&state)
        .adjust_quantity(&user, id, request)
        .await?;
    Ok(Json(response))
}

async fn delete_part(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    InventoryController::new(&state).delete(&user, id).await?;
    Ok(Json(ApiResponse::message("Part deleted")))
}
