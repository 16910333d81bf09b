use chrono::Utc;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::dto::part_dto::{CreatePartRequest, PartFilters, UpdatePartRequest};
use crate::models::maintenance::PartUsage;
use crate::models::part::Part;
use crate::utils::errors::{conflict_error, map_unique_violation, not_found_error, AppError};

pub struct PartRepository {
    pool: PgPool,
}

impl PartRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, request: &CreatePartRequest) -> Result<Part, AppError> {
        let now = Utc::now();
        sqlx::query_as::<_, Part>(
            r#"
            INSERT INTO parts (id, name, code, quantity, minimum_quantity, category, location, supplier, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(request.name.trim())
        .bind(&request.code)
        .bind(request.quantity)
        .bind(request.minimum_quantity)
        .bind(&request.category)
        .bind(&request.location)
        .bind(&request.supplier)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || conflict_error("Part", "code", &request.code)))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Part>, AppError> {
        let part = sqlx::query_as::<_, Part>("SELECT * FROM parts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(part)
    }

    pub async fn list(&self, filters: &PartFilters) -> Result<Vec<Part>, AppError> {
        let parts = sqlx::query_as::<_, Part>(
            r#"
            SELECT * FROM parts
            WHERE ($1 = FALSE OR quantity <= minimum_quantity)
              AND ($2::text IS NULL OR category = $2)
            ORDER BY name ASC
            "#,
        )
        .bind(filters.low_stock.unwrap_or(false))
        .bind(&filters.category)
        .fetch_all(&self.pool)
        .await?;

        Ok(parts)
    }

    pub async fn update(&self, id: Uuid, request: &UpdatePartRequest) -> Result<Part, AppError> {
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Part", &id.to_string()))?;

        let code = request.code.clone().unwrap_or(current.code);

        sqlx::query_as::<_, Part>(
            r#"
            UPDATE parts
            SET name = $2, code = $3, minimum_quantity = $4, category = $5,
                location = $6, supplier = $7, updated_at = $8
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(request.name.as_deref().map(str::trim).unwrap_or(&current.name))
        .bind(&code)
        .bind(request.minimum_quantity.unwrap_or(current.minimum_quantity))
        .bind(request.category.clone().or(current.category))
        .bind(request.location.clone().or(current.location))
        .bind(request.supplier.clone().or(current.supplier))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || conflict_error("Part", "code", &code)))
    }

    /// Suma `delta` a la cantidad; `None` si la pieza no existe o quedaría negativa
    pub async fn adjust_quantity(&self, id: Uuid, delta: i32) -> Result<Option<Part>, AppError> {
        let part = sqlx::query_as::<_, Part>(
            r#"
            UPDATE parts
            SET quantity = quantity + $2, updated_at = $3
            WHERE id = $1 AND quantity + $2 >= 0
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(delta)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(part)
    }

    /// Descuenta piezas dentro de una transacción; falla con `Conflict` si alguna no alcanza
    pub async fn consume(
        tx: &mut Transaction<'_, Postgres>,
        usage: &[PartUsage],
    ) -> Result<Vec<Part>, AppError> {
        let mut updated = Vec::with_capacity(usage.len());
        for item in usage {
            let part = sqlx::query_as::<_, Part>(
                r#"
                UPDATE parts
                SET quantity = quantity - $2, updated_at = $3
                WHERE id = $1 AND $2 > 0 AND quantity >= $2
                RETURNING *
                "#,
            )
            .bind(item.part_id)
            .bind(item.quantity)
            .bind(Utc::now())
            .fetch_optional(&mut **tx)
            .await?;

            match part {
                Some(part) => updated.push(part),
                None => {
                    return Err(AppError::Conflict(format!(
                        "Part '{}' does not exist or has less than {} units in stock",
                        item.part_id, item.quantity
                    )))
                }
            }
        }
        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM parts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
