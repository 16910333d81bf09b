//! DTOs de la API
//!
//! Requests y responses de cada pantalla. Los requests se validan con
//! `validator` antes de tocar la base de datos.

pub mod auth_dto;
pub mod common_dto;
pub mod equipment_dto;
pub mod fault_dto;
pub mod maintenance_dto;
pub mod part_dto;
pub mod user_dto;
