//! Rutas HTTP
//!
//! Un router por pantalla bajo `/api`. Todo salvo sign-up, sign-in y
//! `/health` pasa por el middleware de autenticación.

pub mod auth_routes;
pub mod dashboard_routes;
pub mod equipment_routes;
pub mod fault_routes;
pub mod inventory_routes;
pub mod live_routes;
pub mod maintenance_routes;
pub mod user_routes;

use axum::{extract::State, middleware, routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::middleware::auth::auth_middleware;
use crate::middleware::cors::cors_middleware;
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .nest("/dashboard", dashboard_routes::create_dashboard_router())
        .nest("/equipment", equipment_routes::create_equipment_router())
        .nest("/maintenance", maintenance_routes::create_maintenance_router())
        .nest("/inventory", inventory_routes::create_inventory_router())
        .nest("/faults", fault_routes::create_fault_router())
        .nest("/users", user_routes::create_user_router())
        .nest("/live", live_routes::create_live_router())
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let api = Router::new()
        .nest("/auth", auth_routes::create_auth_router(state.clone()))
        .merge(protected);

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors_middleware(&state.config))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "environment": state.config.environment,
        "profile_cache": state.profiles.backend(),
        "live_subscribers": state.changes.subscriber_count(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
