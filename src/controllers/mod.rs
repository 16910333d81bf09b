//! Controladores
//!
//! Cada controlador verifica permisos, valida la entrada, llama al
//! repositorio y publica el cambio para las suscripciones en vivo.

pub mod auth_controller;
pub mod dashboard_controller;
pub mod equipment_controller;
pub mod fault_controller;
pub mod inventory_controller;
pub mod maintenance_controller;
pub mod user_controller;
