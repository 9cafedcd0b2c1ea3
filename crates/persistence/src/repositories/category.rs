//! Equipment category repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{CategoryEntity, CategoryWithCountsEntity};
use crate::metrics::QueryTimer;

/// Repository for equipment category database operations.
#[derive(Clone)]
pub struct CategoryRepository {
    pool: PgPool,
}

impl CategoryRepository {
    /// Creates a new CategoryRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a category.
    pub async fn create(
        &self,
        name: &str,
        responsible_id: Option<Uuid>,
        company_id: Option<Uuid>,
    ) -> Result<CategoryEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_category");
        let result = sqlx::query_as::<_, CategoryEntity>(
            r#"
            INSERT INTO equipment_categories (name, responsible_id, company_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, responsible_id, company_id, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(responsible_id)
        .bind(company_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a category by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<CategoryEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_category_by_id");
        let result = sqlx::query_as::<_, CategoryEntity>(
            r#"
            SELECT id, name, responsible_id, company_id, created_at, updated_at
            FROM equipment_categories WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List categories with their equipment counts, sorted by name.
    pub async fn list_with_counts(&self) -> Result<Vec<CategoryWithCountsEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_categories_with_counts");
        let result = sqlx::query_as::<_, CategoryWithCountsEntity>(
            r#"
            SELECT c.id, c.name, c.responsible_id, c.company_id,
                   (SELECT COUNT(*) FROM equipment e WHERE e.category_id = c.id) AS equipment_count,
                   c.created_at
            FROM equipment_categories c
            ORDER BY c.name
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update a category.
    pub async fn update(
        &self,
        id: Uuid,
        name: &str,
        responsible_id: Option<Uuid>,
        company_id: Option<Uuid>,
    ) -> Result<Option<CategoryEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_category");
        let result = sqlx::query_as::<_, CategoryEntity>(
            r#"
            UPDATE equipment_categories
            SET name = $2, responsible_id = $3, company_id = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, responsible_id, company_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(responsible_id)
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a category. Reference checks are done by the caller.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_category");
        let result = sqlx::query("DELETE FROM equipment_categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected() > 0);
        timer.record();
        result
    }
}
