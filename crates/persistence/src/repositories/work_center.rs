//! Work center repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use domain::models::work_center::WorkCenterInput;

use crate::entities::WorkCenterEntity;
use crate::metrics::QueryTimer;

const WORK_CENTER_COLUMNS: &str = "id, name, code, tag, alternative_work_centers, cost_per_hour, \
     capacity_time_efficiency, oee_target, description, company_id, created_at, updated_at";

/// Repository for work center database operations.
#[derive(Clone)]
pub struct WorkCenterRepository {
    pool: PgPool,
}

impl WorkCenterRepository {
    /// Creates a new WorkCenterRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a work center.
    pub async fn create(&self, input: &WorkCenterInput) -> Result<WorkCenterEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_work_center");
        let result = sqlx::query_as::<_, WorkCenterEntity>(&format!(
            r#"
            INSERT INTO work_centers
                (name, code, tag, alternative_work_centers, cost_per_hour,
                 capacity_time_efficiency, oee_target, description, company_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {WORK_CENTER_COLUMNS}
            "#
        ))
        .bind(&input.name)
        .bind(input.code.as_deref())
        .bind(input.tag.as_deref())
        .bind(input.alternative_work_centers.as_deref())
        .bind(input.cost_per_hour)
        .bind(input.capacity_time_efficiency)
        .bind(input.oee_target)
        .bind(input.description.as_deref())
        .bind(input.company_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a work center by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<WorkCenterEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_work_center_by_id");
        let result = sqlx::query_as::<_, WorkCenterEntity>(&format!(
            "SELECT {WORK_CENTER_COLUMNS} FROM work_centers WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List work centers, sorted by name.
    pub async fn list(&self) -> Result<Vec<WorkCenterEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_work_centers");
        let result = sqlx::query_as::<_, WorkCenterEntity>(&format!(
            "SELECT {WORK_CENTER_COLUMNS} FROM work_centers ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update a work center.
    pub async fn update(
        &self,
        id: Uuid,
        input: &WorkCenterInput,
    ) -> Result<Option<WorkCenterEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_work_center");
        let result = sqlx::query_as::<_, WorkCenterEntity>(&format!(
            r#"
            UPDATE work_centers
            SET name = $2, code = $3, tag = $4, alternative_work_centers = $5,
                cost_per_hour = $6, capacity_time_efficiency = $7, oee_target = $8,
                description = $9, company_id = $10, updated_at = NOW()
            WHERE id = $1
            RETURNING {WORK_CENTER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&input.name)
        .bind(input.code.as_deref())
        .bind(input.tag.as_deref())
        .bind(input.alternative_work_centers.as_deref())
        .bind(input.cost_per_hour)
        .bind(input.capacity_time_efficiency)
        .bind(input.oee_target)
        .bind(input.description.as_deref())
        .bind(input.company_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a work center. Reference checks are done by the caller.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_work_center");
        let result = sqlx::query("DELETE FROM work_centers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected() > 0);
        timer.record();
        result
    }

    /// Count equipment referencing a work center.
    pub async fn count_equipment(&self, id: Uuid) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_work_center_equipment");
        let result =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM equipment WHERE work_center_id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await;
        timer.record();
        result
    }
}
