use axum::async_trait;
use sqlx::PgPool;

use crate::db::StoreError;
use crate::uoms::models::{NewUom, Uom};

/// Persistence operations for units of measure
#[async_trait]
pub trait UomStore: Send + Sync {
    async fn create(&self, new_uom: NewUom) -> Result<Uom, StoreError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Uom>, StoreError>;

    async fn find_all(&self) -> Result<Vec<Uom>, StoreError>;

    async fn update(&self, id: i32, name: &str) -> Result<Option<Uom>, StoreError>;

    async fn delete(&self, id: i32) -> Result<bool, StoreError>;
}

/// Repository for database operations on units of measure
#[derive(Clone)]
pub struct UomRepository {
    pool: PgPool,
}

impl UomRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UomStore for UomRepository {
    async fn create(&self, new_uom: NewUom) -> Result<Uom, StoreError> {
        let uom = sqlx::query_as::<_, Uom>(
            r#"
            INSERT INTO uoms (name, user_id)
            VALUES ($1, $2)
            RETURNING id, name, user_id, created_at, updated_at
            "#,
        )
        .bind(&new_uom.name)
        .bind(new_uom.user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(uom)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Uom>, StoreError> {
        let uom = sqlx::query_as::<_, Uom>(
            "SELECT id, name, user_id, created_at, updated_at FROM uoms WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(uom)
    }

    async fn find_all(&self) -> Result<Vec<Uom>, StoreError> {
        let uoms = sqlx::query_as::<_, Uom>(
            "SELECT id, name, user_id, created_at, updated_at FROM uoms ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(uoms)
    }

    async fn update(&self, id: i32, name: &str) -> Result<Option<Uom>, StoreError> {
        let uom = sqlx::query_as::<_, Uom>(
            r#"
            UPDATE uoms
            SET name = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING id, name, user_id, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(uom)
    }

    async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM uoms WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
