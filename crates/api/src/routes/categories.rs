//! Equipment category handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;

use domain::models::category::{CategoryInput, CategoryItem};
use persistence::repositories::{CategoryRepository, EquipmentRepository};
use shared::validation::validate_name;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::routes::require_admin;

/// POST /api/v1/categories
pub async fn create_category(
    State(state): State<AppState>,
    auth: UserAuth,
    Json(payload): Json<CategoryInput>,
) -> Result<(StatusCode, Json<CategoryItem>), ApiError> {
    require_admin(&state, auth.user_id).await?;
    validate_name(&payload.name)?;

    let entity = CategoryRepository::new(state.pool.clone())
        .create(&payload.name, payload.responsible_id, payload.company_id)
        .await?;

    info!(category_id = %entity.id, name = %entity.name, "Category created");
    Ok((
        StatusCode::CREATED,
        Json(CategoryItem {
            id: entity.id,
            name: entity.name,
            responsible_id: entity.responsible_id,
            company_id: entity.company_id,
            equipment_count: 0,
            created_at: entity.created_at,
        }),
    ))
}

/// GET /api/v1/categories
pub async fn list_categories(
    State(state): State<AppState>,
    auth: UserAuth,
) -> Result<Json<Vec<CategoryItem>>, ApiError> {
    require_admin(&state, auth.user_id).await?;

    let entities = CategoryRepository::new(state.pool.clone())
        .list_with_counts()
        .await?;

    let items = entities
        .into_iter()
        .map(|e| CategoryItem {
            id: e.id,
            name: e.name,
            responsible_id: e.responsible_id,
            company_id: e.company_id,
            equipment_count: e.equipment_count,
            created_at: e.created_at,
        })
        .collect();
    Ok(Json(items))
}

/// PUT /api/v1/categories/:id
pub async fn update_category(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(id): Path<Uuid>,
    Json(payload): Json<CategoryInput>,
) -> Result<Json<CategoryItem>, ApiError> {
    require_admin(&state, auth.user_id).await?;
    validate_name(&payload.name)?;

    let entity = CategoryRepository::new(state.pool.clone())
        .update(id, &payload.name, payload.responsible_id, payload.company_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Category not found".to_string()))?;

    let equipment_count = EquipmentRepository::new(state.pool.clone())
        .count_for_category(id)
        .await?;

    Ok(Json(CategoryItem {
        id: entity.id,
        name: entity.name,
        responsible_id: entity.responsible_id,
        company_id: entity.company_id,
        equipment_count,
        created_at: entity.created_at,
    }))
}

/// DELETE /api/v1/categories/:id
///
/// Categories still referenced by equipment cannot go.
pub async fn delete_category(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    require_admin(&state, auth.user_id).await?;

    let equipment_count = EquipmentRepository::new(state.pool.clone())
        .count_for_category(id)
        .await?;
    if equipment_count > 0 {
        return Err(ApiError::Conflict(format!(
            "Category is referenced by {equipment_count} equipment unit(s)"
        )));
    }

    let deleted = CategoryRepository::new(state.pool.clone()).delete(id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Category not found".to_string()));
    }

    info!(category_id = %id, "Category deleted");
    Ok(StatusCode::NO_CONTENT)
}
