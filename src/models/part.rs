//! Modelo de pieza de inventario

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Part {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub quantity: i32,
    pub minimum_quantity: i32,
    pub category: Option<String>,
    pub location: Option<String>,
    pub supplier: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Part {
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.minimum_quantity
    }
}

/// Nueva cantidad tras aplicar `delta`; `None` si quedaría negativa o desborda
pub fn apply_quantity_delta(quantity: i32, delta: i32) -> Option<i32> {
    quantity.checked_add(delta).filter(|q| *q >= 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_never_negative() {
        assert_eq!(apply_quantity_delta(5, -5), Some(0));
        assert_eq!(apply_quantity_delta(5, 3), Some(8));
        assert_eq!(apply_quantity_delta(5, -6), None);
        assert_eq!(apply_quantity_delta(i32::MAX, 1), None);
    }

    #[test]
    fn test_low_stock_includes_minimum() {
        let now = Utc::now();
        let mut part = Part {
            id: Uuid::new_v4(),
            name: "Oil filter".into(),
            code: "OF-100".into(),
            quantity: 4,
            minimum_quantity: 3,
            category: None,
            location: None,
            supplier: None,
            created_at: now,
            updated_at: now,
        };
        assert!(!part.is_low_stock());
        part.quantity = 3;
        assert!(part.is_low_stock());
    }
}
