//! Worker account management handlers (admin-only).

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;

use domain::models::user::{
    utilization_percentage, CreateWorkerRequest, Role, UpdateWorkerRequest, UserItem,
};
use persistence::entities::UserEntity;
use persistence::repositories::{UserInsert, UserRepository, UserUpdate};
use shared::password::hash_password;
use shared::validation::{validate_email, validate_username};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::routes::require_admin;

fn user_item(entity: UserEntity, open_requests: i64) -> UserItem {
    UserItem {
        id: entity.id,
        username: entity.username,
        email: entity.email,
        full_name: entity.full_name,
        role: if entity.is_admin { Role::Admin } else { Role::User },
        is_third_party: entity.is_third_party,
        email_verified: entity.email_verified,
        phone: entity.phone,
        position: entity.position,
        employee_id: entity.employee_id,
        hire_date: entity.hire_date,
        department_id: entity.department_id,
        company_id: entity.company_id,
        is_active: entity.is_active,
        utilization_percentage: utilization_percentage(open_requests),
        created_at: entity.created_at,
        updated_at: entity.updated_at,
    }
}

/// POST /api/v1/workers
pub async fn create_worker(
    State(state): State<AppState>,
    auth: UserAuth,
    Json(payload): Json<CreateWorkerRequest>,
) -> Result<(StatusCode, Json<UserItem>), ApiError> {
    require_admin(&state, auth.user_id).await?;
    validate_username(&payload.username)?;
    validate_email(&payload.email)?;

    if payload.password.len() < 8 {
        return Err(ApiError::Validation(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    let insert = UserInsert {
        username: payload.username,
        email: payload.email,
        password_hash: hash_password(&payload.password)?,
        full_name: payload.full_name,
        is_admin: false,
        is_third_party: payload.is_third_party,
        phone: payload.phone,
        position: payload.position,
        employee_id: payload.employee_id,
        hire_date: payload.hire_date,
        department_id: payload.department_id,
        company_id: payload.company_id,
    };

    let entity = UserRepository::new(state.pool.clone()).create(&insert).await?;

    info!(worker_id = %entity.id, username = %entity.username, "Worker account created");
    Ok((StatusCode::CREATED, Json(user_item(entity, 0))))
}

/// GET /api/v1/workers
///
/// Lists worker accounts with their current workload utilization.
pub async fn list_workers(
    State(state): State<AppState>,
    auth: UserAuth,
) -> Result<Json<Vec<UserItem>>, ApiError> {
    require_admin(&state, auth.user_id).await?;

    let entities = UserRepository::new(state.pool.clone())
        .list_workers_with_load()
        .await?;

    let items = entities
        .into_iter()
        .map(|e| user_item(e.user, e.open_request_count))
        .collect();
    Ok(Json(items))
}

/// PUT /api/v1/workers/:id
pub async fn update_worker(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateWorkerRequest>,
) -> Result<Json<UserItem>, ApiError> {
    require_admin(&state, auth.user_id).await?;
    validate_email(&payload.email)?;

    let users = UserRepository::new(state.pool.clone());
    let existing = users
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Worker not found".to_string()))?;
    if existing.is_admin {
        return Err(ApiError::Forbidden(
            "Admin accounts cannot be managed as workers".to_string(),
        ));
    }

    let password_hash = match &payload.password {
        Some(password) => {
            if password.len() < 8 {
                return Err(ApiError::Validation(
                    "Password must be at least 8 characters".to_string(),
                ));
            }
            Some(hash_password(password)?)
        }
        None => None,
    };

    let update = UserUpdate {
        email: payload.email,
        full_name: payload.full_name,
        phone: payload.phone,
        position: payload.position,
        employee_id: payload.employee_id,
        hire_date: payload.hire_date,
        department_id: payload.department_id,
        company_id: payload.company_id,
        is_active: payload.is_active,
        password_hash,
    };

    let entity = users
        .update(id, &update)
        .await?
        .ok_or_else(|| ApiError::NotFound("Worker not found".to_string()))?;

    let open_requests = persistence::repositories::RequestRepository::new(state.pool.clone())
        .count_open_for_worker(id)
        .await?;

    Ok(Json(user_item(entity, open_requests)))
}

/// DELETE /api/v1/workers/:id
///
/// Deactivates the account; accounts with request history are never
/// hard-deleted. Admin accounts are not reachable through this surface.
pub async fn deactivate_worker(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    require_admin(&state, auth.user_id).await?;

    let users = UserRepository::new(state.pool.clone());
    let existing = users
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Worker not found".to_string()))?;
    if existing.is_admin {
        return Err(ApiError::Forbidden(
            "Admin accounts cannot be managed as workers".to_string(),
        ));
    }

    let deactivated = users.deactivate(id).await?;
    if !deactivated {
        return Err(ApiError::NotFound("Worker not found".to_string()));
    }

    info!(worker_id = %id, "Worker account deactivated");
    Ok(StatusCode::NO_CONTENT)
}
