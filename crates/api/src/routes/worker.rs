//! Worker-facing handlers (the allocated worker's side of the workflow).

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use domain::models::dashboard::WorkerDashboardStats;
use domain::models::request::{RequestItem, WorkerRespondRequest, WorkerStatusRequest};
use domain::services::{fan_out, NotificationKind};
use persistence::repositories::{DashboardRepository, RequestRepository, UserRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::middleware::metrics::record_workflow_transition;
use crate::routes::requests::{request_item, workflow_notification};
use crate::routes::{require_active_user, to_recipients};

/// GET /api/v1/worker/dashboard
pub async fn worker_dashboard(
    State(state): State<AppState>,
    auth: UserAuth,
) -> Result<Json<WorkerDashboardStats>, ApiError> {
    let user = require_active_user(&state, auth.user_id).await?;

    let counters = DashboardRepository::new(state.pool.clone())
        .worker_counters(user.id)
        .await?;

    Ok(Json(WorkerDashboardStats {
        assigned_requests: counters.assigned_requests,
        pending_response: counters.pending_response,
        in_progress: counters.in_progress,
        completed: counters.completed,
        overdue: counters.overdue,
    }))
}

/// GET /api/v1/worker/requests
///
/// Lists every request allocated to the caller, newest first.
pub async fn my_requests(
    State(state): State<AppState>,
    auth: UserAuth,
) -> Result<Json<Vec<RequestItem>>, ApiError> {
    let user = require_active_user(&state, auth.user_id).await?;

    let entities = RequestRepository::new(state.pool.clone())
        .list_allocated_to(user.id)
        .await?;

    Ok(Json(entities.into_iter().map(request_item).collect()))
}

/// POST /api/v1/worker/requests/:id/respond
///
/// The allocated worker accepts or rejects the allocation, optionally
/// proposing a deadline. Every active admin is notified of the outcome.
pub async fn respond_to_allocation(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(id): Path<Uuid>,
    Json(payload): Json<WorkerRespondRequest>,
) -> Result<Json<RequestItem>, ApiError> {
    let user = require_active_user(&state, auth.user_id).await?;

    let requests = RequestRepository::new(state.pool.clone());
    let entity = requests
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Request not found".to_string()))?;

    let mut workflow = entity.workflow_state();
    workflow.worker_respond(
        user.id,
        payload.response,
        payload.reason.clone(),
        payload.proposed_deadline.as_deref(),
        Utc::now(),
    )?;

    let updated = requests
        .persist_workflow(id, &workflow)
        .await?
        .ok_or_else(|| ApiError::NotFound("Request not found".to_string()))?;
    record_workflow_transition("worker_responded");
    info!(
        request_id = %id,
        worker_id = %user.id,
        response = ?payload.response,
        "Worker responded to allocation"
    );

    let admins = to_recipients(
        UserRepository::new(state.pool.clone())
            .find_admin_recipients()
            .await?,
    );
    let mut detail = match updated.worker_response {
        Some(response) => domain::models::WorkerResponse::from(response).to_string(),
        None => "responded".to_string(),
    };
    if let Some(reason) = &updated.worker_response_reason {
        detail.push_str(&format!(" ({reason})"));
    }
    if let Some(deadline) = updated.proposed_deadline {
        detail.push_str(&format!(
            ", proposed deadline {}",
            deadline.format("%Y-%m-%d %H:%M UTC")
        ));
    }
    let notification =
        workflow_notification(NotificationKind::WorkerResponded, &updated, Some(detail));
    let outcomes = fan_out(state.notifier.as_ref(), &admins, &notification).await;
    debug!(request_id = %id, outcomes = ?outcomes, "Worker response notifications dispatched");

    Ok(Json(request_item(updated)))
}

/// POST /api/v1/worker/requests/:id/status
///
/// The allocated worker starts or completes the work. Starting moves the
/// repair stage to in_progress, completing moves it to repaired.
pub async fn update_work_status(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(id): Path<Uuid>,
    Json(payload): Json<WorkerStatusRequest>,
) -> Result<Json<RequestItem>, ApiError> {
    let user = require_active_user(&state, auth.user_id).await?;

    let requests = RequestRepository::new(state.pool.clone());
    let entity = requests
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Request not found".to_string()))?;

    let mut workflow = entity.workflow_state();
    workflow.worker_update_status(user.id, payload.status, Utc::now())?;

    let updated = requests
        .persist_workflow(id, &workflow)
        .await?
        .ok_or_else(|| ApiError::NotFound("Request not found".to_string()))?;
    record_workflow_transition("worker_status");
    info!(
        request_id = %id,
        worker_id = %user.id,
        status = ?payload.status,
        "Worker updated work status"
    );

    Ok(Json(request_item(updated)))
}
