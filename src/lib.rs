//! Backend de mantenimiento de flota
//!
//! API HTTP para disponibilidad de camiones, mantenimiento, inventario de
//! piezas y reportes de averías, con acceso por rol y feed en vivo.

pub mod cache;
pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
