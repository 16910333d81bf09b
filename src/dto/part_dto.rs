use serde::Deserialize;
use validator::Validate;

use crate::utils::validation::{validate_not_blank, PART_CODE_RE};

// Request para dar de alta una pieza
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePartRequest {
    #[validate(length(min = 1, max = 200), custom = "validate_not_blank")]
    pub name: String,

    #[validate(regex = "PART_CODE_RE")]
    pub code: String,

    #[validate(range(min = 0))]
    #[serde(default)]
    pub quantity: i32,

    #[validate(range(min = 0))]
    #[serde(default)]
    pub minimum_quantity: i32,

    pub category: Option<String>,
    pub location: Option<String>,
    pub supplier: Option<String>,
}

// Request para editar los datos de una pieza (la cantidad va por /adjust)
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePartRequest {
    #[validate(length(min = 1, max = 200), custom = "validate_not_blank")]
    pub name: Option<String>,

    #[validate(regex = "PART_CODE_RE")]
    pub code: Option<String>,

    #[validate(range(min = 0))]
    pub minimum_quantity: Option<i32>,

    pub category: Option<String>,
    pub location: Option<String>,
    pub supplier: Option<String>,
}

// Entrada o salida manual de stock
#[derive(Debug, Deserialize)]
pub struct AdjustQuantityRequest {
    pub delta: i32,
    pub reason: Option<String>,
}

/// Filtros del inventario
#[derive(Debug, Default, Deserialize)]
pub struct PartFilters {
    pub low_stock: Option<bool>,
    pub category: Option<String>,
}
