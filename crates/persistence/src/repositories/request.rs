//! Maintenance request repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use domain::services::WorkflowState;

use crate::entities::{RequestEntity, RequestTypeDb, StageDb};
use crate::metrics::QueryTimer;

const REQUEST_COLUMNS: &str = "id, name, subject, request_type, equipment_id, category_id, \
     team_id, technician_id, assigned_user_id, maintenance_for_id, work_center_id, \
     stage, allocation_status, allocated_to, allocated_at, \
     worker_response, worker_response_at, worker_response_reason, \
     proposed_deadline, deadline_status, deadline_admin_response, admin_instructions, \
     deadline_approved_at, scheduled_date, start_date, end_date, duration_hours, \
     created_at, updated_at";

const SEARCH_FILTER: &str = "(name ILIKE $1 OR subject ILIKE $1 \
     OR request_type::text ILIKE $1 \
     OR equipment_id IN (SELECT id FROM equipment \
                         WHERE name ILIKE $1 OR serial_number ILIKE $1))";

/// Fields for creating a maintenance request.
#[derive(Debug, Clone)]
pub struct RequestInsert {
    pub subject: String,
    pub request_type: RequestTypeDb,
    pub equipment_id: Uuid,
    pub category_id: Option<Uuid>,
    pub team_id: Option<Uuid>,
    pub technician_id: Option<Uuid>,
    pub assigned_user_id: Option<Uuid>,
    pub maintenance_for_id: Option<Uuid>,
    pub work_center_id: Option<Uuid>,
    pub scheduled_date: Option<DateTime<Utc>>,
}

/// Fields for editing a request's descriptive data.
#[derive(Debug, Clone)]
pub struct RequestUpdate {
    pub subject: String,
    pub request_type: RequestTypeDb,
    pub team_id: Option<Uuid>,
    pub technician_id: Option<Uuid>,
    pub assigned_user_id: Option<Uuid>,
    pub maintenance_for_id: Option<Uuid>,
    pub work_center_id: Option<Uuid>,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub duration_hours: Option<f64>,
}

/// Repository for maintenance request database operations.
#[derive(Clone)]
pub struct RequestRepository {
    pool: PgPool,
}

impl RequestRepository {
    /// Creates a new RequestRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new maintenance request.
    ///
    /// The sequential `MR#####` name is assigned inside the insert from a
    /// dedicated sequence, so concurrent creates can never collide.
    pub async fn create(&self, input: &RequestInsert) -> Result<RequestEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_request");
        let result = sqlx::query_as::<_, RequestEntity>(&format!(
            r#"
            INSERT INTO maintenance_requests
                (name, subject, request_type, equipment_id, category_id, team_id,
                 technician_id, assigned_user_id, maintenance_for_id, work_center_id,
                 scheduled_date)
            VALUES
                ('MR' || lpad(nextval('maintenance_request_name_seq')::text, 5, '0'),
                 $1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {REQUEST_COLUMNS}
            "#
        ))
        .bind(&input.subject)
        .bind(input.request_type)
        .bind(input.equipment_id)
        .bind(input.category_id)
        .bind(input.team_id)
        .bind(input.technician_id)
        .bind(input.assigned_user_id)
        .bind(input.maintenance_for_id)
        .bind(input.work_center_id)
        .bind(input.scheduled_date)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a request by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<RequestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_request_by_id");
        let result = sqlx::query_as::<_, RequestEntity>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM maintenance_requests WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List requests, newest first, optionally filtered by stage and a
    /// case-insensitive search over name, subject, type, and the equipment
    /// unit's name and serial number.
    pub async fn list(
        &self,
        search: Option<&str>,
        stage: Option<StageDb>,
    ) -> Result<Vec<RequestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_requests");
        let pattern = search.map(|s| format!("%{s}%"));
        let result = match (pattern, stage) {
            (Some(pattern), Some(stage)) => {
                sqlx::query_as::<_, RequestEntity>(&format!(
                    r#"
                    SELECT {REQUEST_COLUMNS} FROM maintenance_requests
                    WHERE {SEARCH_FILTER} AND stage = $2
                    ORDER BY created_at DESC
                    "#
                ))
                .bind(pattern)
                .bind(stage)
                .fetch_all(&self.pool)
                .await
            }
            (Some(pattern), None) => {
                sqlx::query_as::<_, RequestEntity>(&format!(
                    r#"
                    SELECT {REQUEST_COLUMNS} FROM maintenance_requests
                    WHERE {SEARCH_FILTER}
                    ORDER BY created_at DESC
                    "#
                ))
                .bind(pattern)
                .fetch_all(&self.pool)
                .await
            }
            (None, Some(stage)) => {
                sqlx::query_as::<_, RequestEntity>(&format!(
                    r#"
                    SELECT {REQUEST_COLUMNS} FROM maintenance_requests
                    WHERE stage = $1
                    ORDER BY created_at DESC
                    "#
                ))
                .bind(stage)
                .fetch_all(&self.pool)
                .await
            }
            (None, None) => {
                sqlx::query_as::<_, RequestEntity>(&format!(
                    "SELECT {REQUEST_COLUMNS} FROM maintenance_requests ORDER BY created_at DESC"
                ))
                .fetch_all(&self.pool)
                .await
            }
        };
        timer.record();
        result
    }

    /// List requests allocated to a worker, newest first.
    pub async fn list_allocated_to(
        &self,
        worker_id: Uuid,
    ) -> Result<Vec<RequestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_requests_allocated_to");
        let result = sqlx::query_as::<_, RequestEntity>(&format!(
            r#"
            SELECT {REQUEST_COLUMNS} FROM maintenance_requests
            WHERE allocated_to = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(worker_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update a request's descriptive fields.
    pub async fn update_details(
        &self,
        id: Uuid,
        update: &RequestUpdate,
    ) -> Result<Option<RequestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_request_details");
        let result = sqlx::query_as::<_, RequestEntity>(&format!(
            r#"
            UPDATE maintenance_requests
            SET subject = $2, request_type = $3, team_id = $4, technician_id = $5,
                assigned_user_id = $6, maintenance_for_id = $7, work_center_id = $8,
                scheduled_date = $9, duration_hours = $10, updated_at = NOW()
            WHERE id = $1
            RETURNING {REQUEST_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&update.subject)
        .bind(update.request_type)
        .bind(update.team_id)
        .bind(update.technician_id)
        .bind(update.assigned_user_id)
        .bind(update.maintenance_for_id)
        .bind(update.work_center_id)
        .bind(update.scheduled_date)
        .bind(update.duration_hours)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Write back the full workflow state after a domain transition.
    pub async fn persist_workflow(
        &self,
        id: Uuid,
        state: &WorkflowState,
    ) -> Result<Option<RequestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("persist_request_workflow");
        let result = sqlx::query_as::<_, RequestEntity>(&format!(
            r#"
            UPDATE maintenance_requests
            SET stage = $2, allocation_status = $3, allocated_to = $4, allocated_at = $5,
                worker_response = $6, worker_response_at = $7, worker_response_reason = $8,
                proposed_deadline = $9, deadline_status = $10, deadline_admin_response = $11,
                admin_instructions = $12, deadline_approved_at = $13, scheduled_date = $14,
                start_date = $15, end_date = $16, duration_hours = $17,
                technician_id = $18, assigned_user_id = $19, updated_at = NOW()
            WHERE id = $1
            RETURNING {REQUEST_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(StageDb::from(state.stage))
        .bind(crate::entities::AllocationStatusDb::from(state.allocation_status))
        .bind(state.allocated_to)
        .bind(state.allocated_at)
        .bind(state.worker_response.map(crate::entities::WorkerResponseDb::from))
        .bind(state.worker_response_at)
        .bind(state.worker_response_reason.as_deref())
        .bind(state.proposed_deadline)
        .bind(state.deadline_status.map(crate::entities::DeadlineStatusDb::from))
        .bind(state.deadline_admin_response.as_deref())
        .bind(state.admin_instructions.as_deref())
        .bind(state.deadline_approved_at)
        .bind(state.scheduled_date)
        .bind(state.start_date)
        .bind(state.end_date)
        .bind(state.duration_hours)
        .bind(state.technician_id)
        .bind(state.assigned_user_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a request. Stage preconditions are enforced by the caller.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_request");
        let result = sqlx::query("DELETE FROM maintenance_requests WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected() > 0);
        timer.record();
        result
    }

    /// Count a worker's open allocated requests (allocated through in_progress).
    pub async fn count_open_for_worker(&self, worker_id: Uuid) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_open_requests_for_worker");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM maintenance_requests
            WHERE allocated_to = $1
              AND allocation_status IN ('allocated', 'accepted', 'in_progress')
            "#,
        )
        .bind(worker_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Count requests referencing a team.
    pub async fn count_for_team(&self, team_id: Uuid) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_requests_for_team");
        let result =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM maintenance_requests WHERE team_id = $1")
                .bind(team_id)
                .fetch_one(&self.pool)
                .await;
        timer.record();
        result
    }

    /// Count an equipment unit's requests still in the new or in_progress stage.
    pub async fn count_active_for_equipment(&self, equipment_id: Uuid) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_active_requests_for_equipment");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM maintenance_requests
            WHERE equipment_id = $1 AND stage IN ('new', 'in_progress')
            "#,
        )
        .bind(equipment_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Count requests referencing a work center.
    pub async fn count_for_work_center(&self, work_center_id: Uuid) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_requests_for_work_center");
        let result = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM maintenance_requests WHERE work_center_id = $1",
        )
        .bind(work_center_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_columns_cover_entity() {
        // Guards the shared column list against drift; the entity derives
        // FromRow over exactly these columns.
        assert_eq!(REQUEST_COLUMNS.split(',').count(), 29);
    }
}
