//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL (ver `migrations/`).

pub mod auth;
pub mod dashboard;
pub mod equipment;
pub mod fault;
pub mod maintenance;
pub mod part;
pub mod user;
