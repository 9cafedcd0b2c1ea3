//! Dashboard aggregate queries.

use sqlx::PgPool;
use uuid::Uuid;

use crate::metrics::QueryTimer;

/// Raw aggregate counters for the admin dashboard.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AdminCounters {
    pub total_requests: i64,
    pub open_requests: i64,
    pub overdue_requests: i64,
    pub critical_equipment: i64,
    pub total_equipment: i64,
    pub total_workers: i64,
    pub total_teams: i64,
    pub total_categories: i64,
    pub total_departments: i64,
    pub avg_technician_load: f64,
}

/// Raw aggregate counters for a worker's dashboard.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WorkerCounters {
    pub assigned_requests: i64,
    pub pending_response: i64,
    pub in_progress: i64,
    pub completed: i64,
    pub overdue: i64,
}

/// Repository for dashboard aggregate database operations.
#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    /// Creates a new DashboardRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Aggregate counters across the whole system.
    pub async fn admin_counters(&self, critical_threshold: i32) -> Result<AdminCounters, sqlx::Error> {
        let timer = QueryTimer::new("admin_dashboard_counters");
        let result = sqlx::query_as::<_, AdminCounters>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM maintenance_requests) AS total_requests,
                (SELECT COUNT(*) FROM maintenance_requests
                 WHERE stage IN ('new', 'in_progress')) AS open_requests,
                (SELECT COUNT(*) FROM maintenance_requests
                 WHERE scheduled_date < NOW()
                   AND stage NOT IN ('repaired', 'scrap')) AS overdue_requests,
                (SELECT COUNT(*) FROM equipment
                 WHERE health_percentage < $1 AND scrap = FALSE) AS critical_equipment,
                (SELECT COUNT(*) FROM equipment WHERE scrap = FALSE) AS total_equipment,
                (SELECT COUNT(*) FROM users
                 WHERE is_admin = FALSE AND is_active = TRUE) AS total_workers,
                (SELECT COUNT(*) FROM teams) AS total_teams,
                (SELECT COUNT(*) FROM equipment_categories) AS total_categories,
                (SELECT COUNT(*) FROM departments) AS total_departments,
                (SELECT COUNT(*) FROM maintenance_requests
                 WHERE allocation_status IN ('allocated', 'accepted', 'in_progress'))::float8
                / GREATEST((SELECT COUNT(*) FROM users
                            WHERE is_admin = FALSE AND is_active = TRUE), 1)
                  AS avg_technician_load
            "#,
        )
        .bind(critical_threshold)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Aggregate counters for one worker's allocated requests.
    pub async fn worker_counters(&self, worker_id: Uuid) -> Result<WorkerCounters, sqlx::Error> {
        let timer = QueryTimer::new("worker_dashboard_counters");
        let result = sqlx::query_as::<_, WorkerCounters>(
            r#"
            SELECT
                COUNT(*) AS assigned_requests,
                COUNT(*) FILTER (WHERE allocation_status = 'allocated') AS pending_response,
                COUNT(*) FILTER (WHERE allocation_status = 'in_progress') AS in_progress,
                COUNT(*) FILTER (WHERE allocation_status = 'completed') AS completed,
                COUNT(*) FILTER (WHERE scheduled_date < NOW()
                                   AND stage NOT IN ('repaired', 'scrap')) AS overdue
            FROM maintenance_requests
            WHERE allocated_to = $1
            "#,
        )
        .bind(worker_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}
