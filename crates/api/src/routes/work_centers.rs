//! Work center handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;

use domain::models::work_center::{WorkCenterInput, WorkCenterItem};
use persistence::entities::WorkCenterEntity;
use persistence::repositories::{RequestRepository, WorkCenterRepository};
use shared::validation::validate_name;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::routes::require_admin;

fn work_center_item(entity: WorkCenterEntity) -> WorkCenterItem {
    WorkCenterItem {
        id: entity.id,
        name: entity.name,
        code: entity.code,
        tag: entity.tag,
        alternative_work_centers: entity.alternative_work_centers,
        cost_per_hour: entity.cost_per_hour,
        capacity_time_efficiency: entity.capacity_time_efficiency,
        oee_target: entity.oee_target,
        description: entity.description,
        company_id: entity.company_id,
        created_at: entity.created_at,
        updated_at: entity.updated_at,
    }
}

/// POST /api/v1/work-centers
pub async fn create_work_center(
    State(state): State<AppState>,
    auth: UserAuth,
    Json(payload): Json<WorkCenterInput>,
) -> Result<(StatusCode, Json<WorkCenterItem>), ApiError> {
    require_admin(&state, auth.user_id).await?;
    validate_name(&payload.name)?;

    let entity = WorkCenterRepository::new(state.pool.clone())
        .create(&payload)
        .await?;

    info!(work_center_id = %entity.id, name = %entity.name, "Work center created");
    Ok((StatusCode::CREATED, Json(work_center_item(entity))))
}

/// GET /api/v1/work-centers
pub async fn list_work_centers(
    State(state): State<AppState>,
    auth: UserAuth,
) -> Result<Json<Vec<WorkCenterItem>>, ApiError> {
    require_admin(&state, auth.user_id).await?;

    let entities = WorkCenterRepository::new(state.pool.clone()).list().await?;
    Ok(Json(entities.into_iter().map(work_center_item).collect()))
}

/// PUT /api/v1/work-centers/:id
pub async fn update_work_center(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(id): Path<Uuid>,
    Json(payload): Json<WorkCenterInput>,
) -> Result<Json<WorkCenterItem>, ApiError> {
    require_admin(&state, auth.user_id).await?;
    validate_name(&payload.name)?;

    let entity = WorkCenterRepository::new(state.pool.clone())
        .update(id, &payload)
        .await?
        .ok_or_else(|| ApiError::NotFound("Work center not found".to_string()))?;

    Ok(Json(work_center_item(entity)))
}

/// DELETE /api/v1/work-centers/:id
///
/// Work centers still referenced by equipment or requests cannot go.
pub async fn delete_work_center(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    require_admin(&state, auth.user_id).await?;

    let work_centers = WorkCenterRepository::new(state.pool.clone());
    let equipment_count = work_centers.count_equipment(id).await?;
    if equipment_count > 0 {
        return Err(ApiError::Conflict(format!(
            "Work center is referenced by {equipment_count} equipment unit(s)"
        )));
    }
    let request_count = RequestRepository::new(state.pool.clone())
        .count_for_work_center(id)
        .await?;
    if request_count > 0 {
        return Err(ApiError::Conflict(format!(
            "Work center is referenced by {request_count} maintenance request(s)"
        )));
    }

    let deleted = work_centers.delete(id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Work center not found".to_string()));
    }

    info!(work_center_id = %id, "Work center deleted");
    Ok(StatusCode::NO_CONTENT)
}
