//! Dashboard statistics models.

use serde::Serialize;

use super::request::RequestsByStage;

/// Aggregate counters shown on the admin dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AdminDashboardStats {
    pub total_requests: i64,
    pub open_requests: i64,
    pub overdue_requests: i64,
    pub critical_equipment: i64,
    pub total_equipment: i64,
    pub total_workers: i64,
    pub total_teams: i64,
    pub total_categories: i64,
    pub total_departments: i64,
    /// Open allocated requests per active worker.
    pub avg_technician_load: f64,
    pub requests_by_stage: RequestsByStage,
}

/// Per-worker counters shown on the worker dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct WorkerDashboardStats {
    pub assigned_requests: i64,
    pub pending_response: i64,
    pub in_progress: i64,
    pub completed: i64,
    pub overdue: i64,
}
