//! Shared helpers for tests that run against a real PostgreSQL.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use chrono::Utc;
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;
use uuid::Uuid;

use fleet_maintenance::cache::MemoryProfileStore;
use fleet_maintenance::config::EnvironmentConfig;
use fleet_maintenance::database::connection::run_migrations;
use fleet_maintenance::dto::equipment_dto::CreateEquipmentRequest;
use fleet_maintenance::dto::part_dto::CreatePartRequest;
use fleet_maintenance::middleware::auth::AuthenticatedUser;
use fleet_maintenance::models::auth::{UserProfile, UserRole};
use fleet_maintenance::models::equipment::Equipment;
use fleet_maintenance::models::part::Part;
use fleet_maintenance::repositories::equipment_repository::EquipmentRepository;
use fleet_maintenance::repositories::part_repository::PartRepository;
use fleet_maintenance::repositories::user_repository::UserRepository;
use fleet_maintenance::routes::create_router;
use fleet_maintenance::state::AppState;
use fleet_maintenance::utils::jwt::{generate_token, JwtConfig};

/// Returns the test database URL from the `TEST_DATABASE_URL` environment variable.
/// Panics if the variable is not set.
pub fn test_db_url() -> String {
    std::env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL must be set for integration tests")
}

/// Returns true if the test database URL is configured.
pub fn has_test_db() -> bool {
    std::env::var("TEST_DATABASE_URL").is_ok()
}

/// Connects, migrates and empties every table. Migrations are tracked by sqlx,
/// so running them for each test only applies what is missing.
pub async fn setup_test_state() -> AppState {
    let config = EnvironmentConfig {
        database_url: test_db_url(),
        ..EnvironmentConfig::default()
    };
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to test database");
    run_migrations(&pool).await.expect("Failed to run migrations");
    truncate_all_tables(&pool).await;

    AppState::new(pool, config, Arc::new(MemoryProfileStore::new(Duration::from_secs(60))))
}

/// Truncate all tables to ensure test isolation.
pub async fn truncate_all_tables(pool: &sqlx::PgPool) {
    sqlx::raw_sql("TRUNCATE TABLE fault_reports, maintenance_records, parts, equipment, users CASCADE")
        .execute(pool)
        .await
        .unwrap();
}

pub async fn create_user(state: &AppState, role: UserRole) -> UserProfile {
    let email = format!("{}-{}@fleet.test", role.as_str(), Uuid::new_v4().simple());
    UserRepository::new(state.pool.clone())
        .create(&email, "not-a-real-hash", role)
        .await
        .unwrap()
        .profile()
}

/// Usuario autenticado tal como lo deja el middleware
pub fn session_for(profile: &UserProfile) -> AuthenticatedUser {
    AuthenticatedUser {
        user_id: profile.id,
        email: profile.email.clone(),
        role: profile.role,
        session_id: Uuid::new_v4().to_string(),
        expires_at: Utc::now() + chrono::Duration::hours(1),
    }
}

pub fn token_for(state: &AppState, profile: &UserProfile) -> String {
    let (token, _) = generate_token(profile, &JwtConfig::from(&state.config)).unwrap();
    token
}

pub async fn create_equipment(state: &AppState, number: &str, mileage: Decimal) -> Equipment {
    EquipmentRepository::new(state.pool.clone())
        .create(&CreateEquipmentRequest {
            number: number.to_string(),
            model: "Volvo FH16".to_string(),
            mileage,
            next_maintenance: None,
        })
        .await
        .unwrap()
}

pub async fn create_part(state: &AppState, code: &str, quantity: i32) -> Part {
    PartRepository::new(state.pool.clone())
        .create(&CreatePartRequest {
            name: format!("Part {}", code),
            code: code.to_string(),
            quantity,
            minimum_quantity: 1,
            category: Some("brakes".to_string()),
            location: None,
            supplier: None,
        })
        .await
        .unwrap()
}

pub async fn part_quantity(state: &AppState, id: Uuid) -> i32 {
    PartRepository::new(state.pool.clone())
        .find_by_id(id)
        .await
        .unwrap()
        .expect("part should exist")
        .quantity
}

pub async fn send(
    state: &AppState,
    method: Method,
    uri: &str,
    token: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token));
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = create_router(state.clone()).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&bytes).unwrap_or(json!(null));
    (status, json)
}

/// Usuario guardado en la base de datos junto con su sesión
pub struct TestUser {
    pub profile: UserProfile,
    pub session: AuthenticatedUser,
}

impl TestUser {
    pub async fn new(state: &AppState, role: UserRole) -> Self {
        let profile = create_user(state, role).await;
        let session = session_for(&profile);
        Self { profile, session }
    }
}
