//! Admin dashboard handler.

use axum::{extract::State, Json};

use domain::models::dashboard::AdminDashboardStats;
use domain::models::equipment::CRITICAL_HEALTH_THRESHOLD;
use domain::models::request::RequestsByStage;
use persistence::repositories::{DashboardRepository, RequestRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::routes::requests::request_item;
use crate::routes::require_admin;

/// GET /api/v1/dashboard
///
/// Aggregate counters plus the full stage board in one response.
pub async fn admin_dashboard(
    State(state): State<AppState>,
    auth: UserAuth,
) -> Result<Json<AdminDashboardStats>, ApiError> {
    require_admin(&state, auth.user_id).await?;

    let counters = DashboardRepository::new(state.pool.clone())
        .admin_counters(CRITICAL_HEALTH_THRESHOLD)
        .await?;

    let entities = RequestRepository::new(state.pool.clone())
        .list(None, None)
        .await?;
    let requests_by_stage =
        RequestsByStage::group(entities.into_iter().map(request_item).collect());

    Ok(Json(AdminDashboardStats {
        total_requests: counters.total_requests,
        open_requests: counters.open_requests,
        overdue_requests: counters.overdue_requests,
        critical_equipment: counters.critical_equipment,
        total_equipment: counters.total_equipment,
        total_workers: counters.total_workers,
        total_teams: counters.total_teams,
        total_categories: counters.total_categories,
        total_departments: counters.total_departments,
        avg_technician_load: counters.avg_technician_load,
        requests_by_stage,
    }))
}
