//! Repositorios
//!
//! Acceso a PostgreSQL por colección con `sqlx::query_as`.

pub mod dashboard_repository;
pub mod equipment_repository;
pub mod fault_repository;
pub mod maintenance_repository;
pub mod part_repository;
pub mod user_repository;
