//! Services module
//!
//! Lógica que no pertenece a un solo controlador: la tabla de permisos,
//! la difusión de cambios y los snapshots de las suscripciones en vivo.

pub mod authorization_service;
pub mod change_hub;
pub mod live_service;
