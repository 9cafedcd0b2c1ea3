//! Maintenance team handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;

use domain::models::team::{TeamInput, TeamItem};
use persistence::entities::TeamWithCountsEntity;
use persistence::repositories::{EquipmentRepository, RequestRepository, TeamRepository};
use shared::validation::validate_name;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::routes::require_admin;

fn team_item(entity: TeamWithCountsEntity) -> TeamItem {
    TeamItem {
        id: entity.id,
        name: entity.name,
        company_id: entity.company_id,
        member_count: entity.member_count,
        equipment_count: entity.equipment_count,
        request_count: entity.request_count,
        open_request_count: entity.open_request_count,
        created_at: entity.created_at,
    }
}

/// POST /api/v1/teams
pub async fn create_team(
    State(state): State<AppState>,
    auth: UserAuth,
    Json(payload): Json<TeamInput>,
) -> Result<(StatusCode, Json<TeamItem>), ApiError> {
    require_admin(&state, auth.user_id).await?;
    validate_name(&payload.name)?;

    let teams = TeamRepository::new(state.pool.clone());
    let entity = teams
        .create(&payload.name, payload.company_id, &payload.member_ids)
        .await?;

    info!(team_id = %entity.id, name = %entity.name, "Team created");
    let with_counts = teams
        .find_with_counts(entity.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Team not found".to_string()))?;
    Ok((StatusCode::CREATED, Json(team_item(with_counts))))
}

/// GET /api/v1/teams
pub async fn list_teams(
    State(state): State<AppState>,
    auth: UserAuth,
) -> Result<Json<Vec<TeamItem>>, ApiError> {
    require_admin(&state, auth.user_id).await?;

    let entities = TeamRepository::new(state.pool.clone())
        .list_with_counts()
        .await?;

    Ok(Json(entities.into_iter().map(team_item).collect()))
}

/// PUT /api/v1/teams/:id
pub async fn update_team(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(id): Path<Uuid>,
    Json(payload): Json<TeamInput>,
) -> Result<Json<TeamItem>, ApiError> {
    require_admin(&state, auth.user_id).await?;
    validate_name(&payload.name)?;

    let teams = TeamRepository::new(state.pool.clone());
    teams
        .update(id, &payload.name, payload.company_id, &payload.member_ids)
        .await?
        .ok_or_else(|| ApiError::NotFound("Team not found".to_string()))?;

    let with_counts = teams
        .find_with_counts(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Team not found".to_string()))?;
    Ok(Json(team_item(with_counts)))
}

/// DELETE /api/v1/teams/:id
///
/// Teams still referenced by equipment or requests cannot go.
pub async fn delete_team(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    require_admin(&state, auth.user_id).await?;

    let equipment_count = EquipmentRepository::new(state.pool.clone())
        .count_for_team(id)
        .await?;
    if equipment_count > 0 {
        return Err(ApiError::Conflict(format!(
            "Team is referenced by {equipment_count} equipment unit(s)"
        )));
    }

    let request_count = RequestRepository::new(state.pool.clone())
        .count_for_team(id)
        .await?;
    if request_count > 0 {
        return Err(ApiError::Conflict(format!(
            "Team is referenced by {request_count} maintenance request(s)"
        )));
    }

    let deleted = TeamRepository::new(state.pool.clone()).delete(id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Team not found".to_string()));
    }

    info!(team_id = %id, "Team deleted");
    Ok(StatusCode::NO_CONTENT)
}
