//! Maintenance request handlers (admin side of the allocation workflow).

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use domain::models::request::{
    AllocateRequest, CreateRequestRequest, DeadlineDecision, DeadlineResponseRequest,
    ListRequestsQuery, RequestItem, RequestType, RequestsByStage, UpdateRequestRequest,
    UpdateStageRequest,
};
use domain::services::{
    fan_out, AllocationTarget, NotificationKind, Recipient, WorkflowNotification,
};
use persistence::entities::RequestEntity;
use persistence::repositories::{
    EquipmentRepository, RequestInsert, RequestRepository, RequestUpdate, UserRepository,
};
use shared::validation::validate_subject;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::middleware::metrics::{record_request_created, record_workflow_transition};
use crate::routes::{require_active_user, require_admin};

/// Maps a database row to the API representation, deriving overdue status.
pub(crate) fn request_item(entity: RequestEntity) -> RequestItem {
    let is_overdue = entity.workflow_state().is_overdue(Utc::now());
    RequestItem {
        id: entity.id,
        name: entity.name,
        subject: entity.subject,
        request_type: entity.request_type.into(),
        equipment_id: entity.equipment_id,
        category_id: entity.category_id,
        team_id: entity.team_id,
        technician_id: entity.technician_id,
        assigned_user_id: entity.assigned_user_id,
        maintenance_for_id: entity.maintenance_for_id,
        work_center_id: entity.work_center_id,
        stage: entity.stage.into(),
        allocation_status: entity.allocation_status.into(),
        allocated_to: entity.allocated_to,
        allocated_at: entity.allocated_at,
        worker_response: entity.worker_response.map(Into::into),
        worker_response_at: entity.worker_response_at,
        worker_response_reason: entity.worker_response_reason,
        proposed_deadline: entity.proposed_deadline,
        deadline_status: entity.deadline_status.map(Into::into),
        deadline_admin_response: entity.deadline_admin_response,
        admin_instructions: entity.admin_instructions,
        deadline_approved_at: entity.deadline_approved_at,
        scheduled_date: entity.scheduled_date,
        start_date: entity.start_date,
        end_date: entity.end_date,
        duration_hours: entity.duration_hours,
        is_overdue,
        created_at: entity.created_at,
        updated_at: entity.updated_at,
    }
}

/// Builds the notification payload shared by all workflow fan-outs.
pub(crate) fn workflow_notification(
    kind: NotificationKind,
    entity: &RequestEntity,
    detail: Option<String>,
) -> WorkflowNotification {
    WorkflowNotification {
        kind,
        request_id: entity.id,
        request_name: entity.name.clone(),
        request_subject: entity.subject.clone(),
        detail,
        occurred_at: Utc::now(),
    }
}

/// POST /api/v1/requests
///
/// Creates a maintenance request. Category, team and technician default
/// from the chosen equipment when the caller leaves them blank.
pub async fn create_request(
    State(state): State<AppState>,
    auth: UserAuth,
    Json(payload): Json<CreateRequestRequest>,
) -> Result<(StatusCode, Json<RequestItem>), ApiError> {
    require_admin(&state, auth.user_id).await?;
    validate_subject(&payload.subject)?;

    let defaults = EquipmentRepository::new(state.pool.clone())
        .defaults_for_request(payload.equipment_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Equipment not found".to_string()))?;

    let request_type = payload.request_type.unwrap_or(RequestType::Corrective);
    let insert = RequestInsert {
        subject: payload.subject,
        request_type: request_type.into(),
        equipment_id: payload.equipment_id,
        category_id: defaults.category_id,
        team_id: payload.team_id.or(defaults.team_id),
        technician_id: defaults.technician_id,
        assigned_user_id: payload.assigned_user_id.or(defaults.technician_id),
        maintenance_for_id: payload.maintenance_for_id,
        work_center_id: payload.work_center_id,
        scheduled_date: payload.scheduled_date,
    };

    let entity = RequestRepository::new(state.pool.clone())
        .create(&insert)
        .await?;

    record_request_created(&request_type.to_string());
    info!(request_id = %entity.id, name = %entity.name, "Maintenance request created");
    Ok((StatusCode::CREATED, Json(request_item(entity))))
}

/// GET /api/v1/requests
///
/// Lists requests grouped by stage for the admin board.
pub async fn list_requests(
    State(state): State<AppState>,
    auth: UserAuth,
    Query(query): Query<ListRequestsQuery>,
) -> Result<Json<RequestsByStage>, ApiError> {
    require_admin(&state, auth.user_id).await?;

    let entities = RequestRepository::new(state.pool.clone())
        .list(query.search.as_deref(), query.stage.map(Into::into))
        .await?;

    let items = entities.into_iter().map(request_item).collect();
    Ok(Json(RequestsByStage::group(items)))
}

/// GET /api/v1/requests/:id
///
/// Visible to admins and to the worker the request is allocated to.
pub async fn get_request(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<RequestItem>, ApiError> {
    let user = require_active_user(&state, auth.user_id).await?;

    let entity = RequestRepository::new(state.pool.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Request not found".to_string()))?;

    if !user.is_admin && entity.allocated_to != Some(user.id) {
        return Err(ApiError::Forbidden(
            "Request is not allocated to this worker".to_string(),
        ));
    }

    Ok(Json(request_item(entity)))
}

/// PUT /api/v1/requests/:id
pub async fn update_request(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRequestRequest>,
) -> Result<Json<RequestItem>, ApiError> {
    require_admin(&state, auth.user_id).await?;
    validate_subject(&payload.subject)?;

    let update = RequestUpdate {
        subject: payload.subject,
        request_type: payload.request_type.into(),
        team_id: Some(payload.team_id),
        technician_id: payload.technician_id,
        assigned_user_id: payload.assigned_user_id,
        maintenance_for_id: payload.maintenance_for_id,
        work_center_id: payload.work_center_id,
        scheduled_date: payload.scheduled_date,
        duration_hours: payload.duration_hours,
    };

    let entity = RequestRepository::new(state.pool.clone())
        .update_details(id, &update)
        .await?
        .ok_or_else(|| ApiError::NotFound("Request not found".to_string()))?;

    Ok(Json(request_item(entity)))
}

/// DELETE /api/v1/requests/:id
///
/// Only requests that never started work (or ended scrapped) can go.
pub async fn delete_request(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    require_admin(&state, auth.user_id).await?;

    let requests = RequestRepository::new(state.pool.clone());
    let entity = requests
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Request not found".to_string()))?;

    if !entity.workflow_state().is_deletable() {
        return Err(ApiError::Conflict(
            "Requests with work in progress or repaired cannot be deleted".to_string(),
        ));
    }

    requests.delete(id).await?;
    info!(request_id = %id, "Maintenance request deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/requests/:id/stage
///
/// Moves a request along the repair axis. Moving to scrap also flags the
/// owning equipment as scrapped.
pub async fn update_stage(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStageRequest>,
) -> Result<Json<RequestItem>, ApiError> {
    require_admin(&state, auth.user_id).await?;

    let requests = RequestRepository::new(state.pool.clone());
    let entity = requests
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Request not found".to_string()))?;

    let mut workflow = entity.workflow_state();
    let effects = workflow.update_stage(payload.stage, Utc::now());

    let updated = requests
        .persist_workflow(id, &workflow)
        .await?
        .ok_or_else(|| ApiError::NotFound("Request not found".to_string()))?;
    record_workflow_transition("stage_moved");

    if effects.scrap_equipment {
        EquipmentRepository::new(state.pool.clone())
            .mark_scrapped(entity.equipment_id)
            .await?;
        info!(
            request_id = %id,
            equipment_id = %entity.equipment_id,
            "Equipment scrapped via request stage move"
        );
    }

    Ok(Json(request_item(updated)))
}

/// POST /api/v1/requests/:id/allocate
///
/// Hands the request to a worker and notifies them by email. The state
/// change commits regardless of the notification outcome.
pub async fn allocate_request(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(id): Path<Uuid>,
    Json(payload): Json<AllocateRequest>,
) -> Result<Json<RequestItem>, ApiError> {
    require_admin(&state, auth.user_id).await?;

    let requests = RequestRepository::new(state.pool.clone());
    let entity = requests
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Request not found".to_string()))?;

    let worker = UserRepository::new(state.pool.clone())
        .find_by_id(payload.worker_id)
        .await?
        .filter(|u| u.is_active);

    let target = worker.as_ref().map(|u| AllocationTarget {
        worker_id: u.id,
        is_admin: u.is_admin,
    });

    let mut workflow = entity.workflow_state();
    workflow.allocate(target, Utc::now())?;

    let updated = requests
        .persist_workflow(id, &workflow)
        .await?
        .ok_or_else(|| ApiError::NotFound("Request not found".to_string()))?;
    record_workflow_transition("allocated");
    info!(request_id = %id, worker_id = %payload.worker_id, "Request allocated");

    // allocate() succeeded, so the worker lookup cannot have been empty.
    if let Some(worker) = worker {
        let recipient = Recipient {
            user_id: worker.id,
            email: worker.email,
            full_name: worker.full_name,
        };
        let detail = updated
            .scheduled_date
            .map(|d| format!("Scheduled for {}", d.format("%Y-%m-%d %H:%M UTC")));
        let notification =
            workflow_notification(NotificationKind::WorkAllocated, &updated, detail);
        let outcomes = fan_out(state.notifier.as_ref(), &[recipient], &notification).await;
        debug!(request_id = %id, outcomes = ?outcomes, "Allocation notifications dispatched");
    }

    Ok(Json(request_item(updated)))
}

/// POST /api/v1/requests/:id/deadline-response
///
/// Records the admin's verdict on a proposed deadline and notifies the
/// allocated worker.
pub async fn respond_to_deadline(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(id): Path<Uuid>,
    Json(payload): Json<DeadlineResponseRequest>,
) -> Result<Json<RequestItem>, ApiError> {
    require_admin(&state, auth.user_id).await?;

    let requests = RequestRepository::new(state.pool.clone());
    let entity = requests
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Request not found".to_string()))?;

    let mut workflow = entity.workflow_state();
    workflow.respond_to_deadline(
        payload.decision,
        payload.admin_response.clone(),
        payload.admin_instructions.clone(),
        Utc::now(),
    );

    let updated = requests
        .persist_workflow(id, &workflow)
        .await?
        .ok_or_else(|| ApiError::NotFound("Request not found".to_string()))?;
    record_workflow_transition("deadline_decided");
    info!(request_id = %id, decision = ?payload.decision, "Deadline decision recorded");

    if let Some(worker_id) = updated.allocated_to {
        let recipients = crate::routes::to_recipients(
            UserRepository::new(state.pool.clone())
                .find_recipients(&[worker_id])
                .await?,
        );
        let detail = match payload.decision {
            DeadlineDecision::Approve => Some(
                updated
                    .admin_instructions
                    .clone()
                    .map(|i| format!("Approved. Instructions: {i}"))
                    .unwrap_or_else(|| "Approved".to_string()),
            ),
            DeadlineDecision::Reject => Some(
                updated
                    .deadline_admin_response
                    .clone()
                    .map(|r| format!("Rejected: {r}"))
                    .unwrap_or_else(|| "Rejected".to_string()),
            ),
        };
        let notification =
            workflow_notification(NotificationKind::DeadlineDecision, &updated, detail);
        let outcomes = fan_out(state.notifier.as_ref(), &recipients, &notification).await;
        debug!(request_id = %id, outcomes = ?outcomes, "Deadline notifications dispatched");
    }

    Ok(Json(request_item(updated)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use persistence::entities::{AllocationStatusDb, RequestTypeDb, StageDb};

    fn entity(stage: StageDb, scheduled_date: Option<chrono::DateTime<Utc>>) -> RequestEntity {
        RequestEntity {
            id: Uuid::new_v4(),
            name: "MR00042".to_string(),
            subject: "Hydraulic leak".to_string(),
            request_type: RequestTypeDb::Corrective,
            equipment_id: Uuid::new_v4(),
            category_id: None,
            team_id: Some(Uuid::new_v4()),
            technician_id: None,
            assigned_user_id: None,
            maintenance_for_id: None,
            work_center_id: None,
            stage,
            allocation_status: AllocationStatusDb::Pending,
            allocated_to: None,
            allocated_at: None,
            worker_response: None,
            worker_response_at: None,
            worker_response_reason: None,
            proposed_deadline: None,
            deadline_status: None,
            deadline_admin_response: None,
            admin_instructions: None,
            deadline_approved_at: None,
            scheduled_date,
            start_date: None,
            end_date: None,
            duration_hours: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_request_item_derives_overdue() {
        let past = Utc::now() - chrono::Duration::hours(2);
        let item = request_item(entity(StageDb::New, Some(past)));
        assert!(item.is_overdue);

        let closed = request_item(entity(StageDb::Repaired, Some(past)));
        assert!(!closed.is_overdue);

        let unscheduled = request_item(entity(StageDb::New, None));
        assert!(!unscheduled.is_overdue);
    }

    #[test]
    fn test_workflow_notification_carries_request_identity() {
        let e = entity(StageDb::New, None);
        let n = workflow_notification(NotificationKind::WorkAllocated, &e, Some("x".into()));
        assert_eq!(n.request_id, e.id);
        assert_eq!(n.request_name, "MR00042");
        assert_eq!(n.detail.as_deref(), Some("x"));
    }
}
