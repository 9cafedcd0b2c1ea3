//! Department repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{DepartmentEntity, DepartmentWithCountsEntity};
use crate::metrics::QueryTimer;

/// Repository for department database operations.
#[derive(Clone)]
pub struct DepartmentRepository {
    pool: PgPool,
}

impl DepartmentRepository {
    /// Creates a new DepartmentRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a department.
    pub async fn create(
        &self,
        name: &str,
        description: Option<&str>,
        company_id: Option<Uuid>,
    ) -> Result<DepartmentEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_department");
        let result = sqlx::query_as::<_, DepartmentEntity>(
            r#"
            INSERT INTO departments (name, description, company_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, company_id, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(company_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a department by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<DepartmentEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_department_by_id");
        let result = sqlx::query_as::<_, DepartmentEntity>(
            r#"
            SELECT id, name, description, company_id, created_at, updated_at
            FROM departments WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List departments with employee and equipment counts, sorted by name.
    pub async fn list_with_counts(&self) -> Result<Vec<DepartmentWithCountsEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_departments_with_counts");
        let result = sqlx::query_as::<_, DepartmentWithCountsEntity>(
            r#"
            SELECT d.id, d.name, d.description, d.company_id,
                   (SELECT COUNT(*) FROM users u WHERE u.department_id = d.id) AS employee_count,
                   (SELECT COUNT(*) FROM equipment e WHERE e.department_id = d.id) AS equipment_count
            FROM departments d
            ORDER BY d.name
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update a department.
    pub async fn update(
        &self,
        id: Uuid,
        name: &str,
        description: Option<&str>,
        company_id: Option<Uuid>,
    ) -> Result<Option<DepartmentEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_department");
        let result = sqlx::query_as::<_, DepartmentEntity>(
            r#"
            UPDATE departments
            SET name = $2, description = $3, company_id = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, description, company_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a department. Reference checks are done by the caller.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_department");
        let result = sqlx::query("DELETE FROM departments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected() > 0);
        timer.record();
        result
    }
}
