//! Department handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;

use domain::models::department::{DepartmentInput, DepartmentItem};
use persistence::repositories::{DepartmentRepository, EquipmentRepository, UserRepository};
use shared::validation::validate_name;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::routes::require_admin;

/// POST /api/v1/departments
pub async fn create_department(
    State(state): State<AppState>,
    auth: UserAuth,
    Json(payload): Json<DepartmentInput>,
) -> Result<(StatusCode, Json<DepartmentItem>), ApiError> {
    require_admin(&state, auth.user_id).await?;
    validate_name(&payload.name)?;

    let entity = DepartmentRepository::new(state.pool.clone())
        .create(&payload.name, payload.description.as_deref(), payload.company_id)
        .await?;

    info!(department_id = %entity.id, name = %entity.name, "Department created");
    Ok((
        StatusCode::CREATED,
        Json(DepartmentItem {
            id: entity.id,
            name: entity.name,
            description: entity.description,
            company_id: entity.company_id,
            employee_count: 0,
            equipment_count: 0,
        }),
    ))
}

/// GET /api/v1/departments
pub async fn list_departments(
    State(state): State<AppState>,
    auth: UserAuth,
) -> Result<Json<Vec<DepartmentItem>>, ApiError> {
    require_admin(&state, auth.user_id).await?;

    let entities = DepartmentRepository::new(state.pool.clone())
        .list_with_counts()
        .await?;

    let items = entities
        .into_iter()
        .map(|e| DepartmentItem {
            id: e.id,
            name: e.name,
            description: e.description,
            company_id: e.company_id,
            employee_count: e.employee_count,
            equipment_count: e.equipment_count,
        })
        .collect();
    Ok(Json(items))
}

/// PUT /api/v1/departments/:id
pub async fn update_department(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(id): Path<Uuid>,
    Json(payload): Json<DepartmentInput>,
) -> Result<Json<DepartmentItem>, ApiError> {
    require_admin(&state, auth.user_id).await?;
    validate_name(&payload.name)?;

    let entity = DepartmentRepository::new(state.pool.clone())
        .update(id, &payload.name, payload.description.as_deref(), payload.company_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Department not found".to_string()))?;

    let employee_count = UserRepository::new(state.pool.clone())
        .count_for_department(id)
        .await?;
    let equipment_count = EquipmentRepository::new(state.pool.clone())
        .count_for_department(id)
        .await?;

    Ok(Json(DepartmentItem {
        id: entity.id,
        name: entity.name,
        description: entity.description,
        company_id: entity.company_id,
        employee_count,
        equipment_count,
    }))
}

/// DELETE /api/v1/departments/:id
///
/// Departments with attached employees or equipment cannot go.
pub async fn delete_department(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    require_admin(&state, auth.user_id).await?;

    let employee_count = UserRepository::new(state.pool.clone())
        .count_for_department(id)
        .await?;
    if employee_count > 0 {
        return Err(ApiError::Conflict(format!(
            "Department has {employee_count} attached employee(s)"
        )));
    }
    let equipment_count = EquipmentRepository::new(state.pool.clone())
        .count_for_department(id)
        .await?;
    if equipment_count > 0 {
        return Err(ApiError::Conflict(format!(
            "Department has {equipment_count} attached equipment unit(s)"
        )));
    }

    let deleted = DepartmentRepository::new(state.pool.clone()).delete(id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Department not found".to_string()));
    }

    info!(department_id = %id, "Department deleted");
    Ok(StatusCode::NO_CONTENT)
}
