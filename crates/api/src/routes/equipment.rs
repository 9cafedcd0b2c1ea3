//! Equipment handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::{info, warn};
use uuid::Uuid;

use domain::models::auth::AckResponse;
use domain::models::equipment::{
    is_critical, EquipmentInput, EquipmentItem, ListEquipmentQuery, NotifyThirdPartyRequest,
};
use persistence::entities::EquipmentEntity;
use persistence::repositories::{EquipmentRepository, RequestRepository, UserRepository};
use shared::validation::validate_name;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::routes::require_admin;
use crate::services::email::EmailMessage;

fn equipment_item(entity: EquipmentEntity) -> EquipmentItem {
    EquipmentItem {
        id: entity.id,
        name: entity.name,
        serial_number: entity.serial_number,
        purchase_date: entity.purchase_date,
        warranty_information: entity.warranty_information,
        location: entity.location,
        description: entity.description,
        assigned_date: entity.assigned_date,
        used_in_location: entity.used_in_location,
        health_percentage: entity.health_percentage,
        is_critical: is_critical(entity.health_percentage),
        owner_id: entity.owner_id,
        department_id: entity.department_id,
        team_id: entity.team_id,
        technician_id: entity.technician_id,
        category_id: entity.category_id,
        company_id: entity.company_id,
        work_center_id: entity.work_center_id,
        scrap: entity.scrap,
        scrap_date: entity.scrap_date,
        created_at: entity.created_at,
        updated_at: entity.updated_at,
    }
}

/// POST /api/v1/equipment
pub async fn create_equipment(
    State(state): State<AppState>,
    auth: UserAuth,
    Json(payload): Json<EquipmentInput>,
) -> Result<(StatusCode, Json<EquipmentItem>), ApiError> {
    require_admin(&state, auth.user_id).await?;
    validate_name(&payload.name)?;

    let entity = EquipmentRepository::new(state.pool.clone())
        .create(&payload)
        .await?;

    info!(equipment_id = %entity.id, name = %entity.name, "Equipment created");
    Ok((StatusCode::CREATED, Json(equipment_item(entity))))
}

/// GET /api/v1/equipment
pub async fn list_equipment(
    State(state): State<AppState>,
    auth: UserAuth,
    Query(query): Query<ListEquipmentQuery>,
) -> Result<Json<Vec<EquipmentItem>>, ApiError> {
    require_admin(&state, auth.user_id).await?;

    let entities = EquipmentRepository::new(state.pool.clone())
        .list(query.search.as_deref(), query.include_scrapped)
        .await?;

    Ok(Json(entities.into_iter().map(equipment_item).collect()))
}

/// GET /api/v1/equipment/:id
pub async fn get_equipment(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<EquipmentItem>, ApiError> {
    require_admin(&state, auth.user_id).await?;

    let entity = EquipmentRepository::new(state.pool.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Equipment not found".to_string()))?;

    Ok(Json(equipment_item(entity)))
}

/// PUT /api/v1/equipment/:id
pub async fn update_equipment(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(id): Path<Uuid>,
    Json(payload): Json<EquipmentInput>,
) -> Result<Json<EquipmentItem>, ApiError> {
    require_admin(&state, auth.user_id).await?;
    validate_name(&payload.name)?;

    let entity = EquipmentRepository::new(state.pool.clone())
        .update(id, &payload)
        .await?
        .ok_or_else(|| ApiError::NotFound("Equipment not found".to_string()))?;

    Ok(Json(equipment_item(entity)))
}

/// DELETE /api/v1/equipment/:id
///
/// Refused while active requests exist. Equipment is never hard-deleted;
/// units are flagged scrapped instead so old requests keep resolving.
pub async fn delete_equipment(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<AckResponse>, ApiError> {
    require_admin(&state, auth.user_id).await?;

    let repository = EquipmentRepository::new(state.pool.clone());
    repository
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Equipment not found".to_string()))?;

    let active_count = RequestRepository::new(state.pool.clone())
        .count_active_for_equipment(id)
        .await?;
    if active_count > 0 {
        return Err(ApiError::Conflict(format!(
            "Equipment has {active_count} active maintenance request(s)"
        )));
    }

    repository.mark_scrapped(id).await?;
    info!(equipment_id = %id, "Equipment marked scrapped");

    Ok(Json(AckResponse {
        message: "Equipment marked as scrapped".to_string(),
    }))
}

/// POST /api/v1/equipment/:id/notify-third-party
///
/// Emails selected third-party contacts about an equipment unit. Recipients
/// that are not third-party accounts are skipped.
pub async fn notify_third_parties(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(id): Path<Uuid>,
    Json(payload): Json<NotifyThirdPartyRequest>,
) -> Result<Json<AckResponse>, ApiError> {
    require_admin(&state, auth.user_id).await?;

    if payload.third_party_ids.is_empty() {
        return Err(ApiError::Validation(
            "At least one third-party contact is required".to_string(),
        ));
    }

    let equipment = EquipmentRepository::new(state.pool.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Equipment not found".to_string()))?;

    let users = UserRepository::new(state.pool.clone());
    let mut sent = 0usize;
    for contact_id in &payload.third_party_ids {
        let Some(contact) = users.find_by_id(*contact_id).await? else {
            warn!(contact_id = %contact_id, "Skipping unknown third-party contact");
            continue;
        };
        if !contact.is_third_party || !contact.is_active {
            warn!(contact_id = %contact_id, "Skipping non-third-party or inactive contact");
            continue;
        }

        let greeting = contact
            .full_name
            .as_deref()
            .map(|n| format!("Hi {n},"))
            .unwrap_or_else(|| "Hi,".to_string());
        let extra = payload
            .message
            .as_deref()
            .map(|m| format!("\n{m}\n"))
            .unwrap_or_default();
        let body_text = format!(
            "{greeting}\n\nYour attention is requested for the following equipment:\n\n\
             Equipment: {}\nSerial number: {}\nLocation: {}\n{extra}\n\
             Best regards,\nThe GearGuard Team\n",
            equipment.name,
            equipment.serial_number.as_deref().unwrap_or("-"),
            equipment.location.as_deref().unwrap_or("-"),
        );

        let message = EmailMessage {
            to: contact.email.clone(),
            to_name: contact.full_name.clone(),
            subject: format!("Maintenance attention required: {}", equipment.name),
            body_text,
        };

        match state.email.send(message).await {
            Ok(()) => sent += 1,
            Err(e) => {
                warn!(contact_id = %contact_id, error = %e, "Third-party notification failed")
            }
        }
    }

    info!(equipment_id = %id, sent, "Third-party notifications dispatched");
    Ok(Json(AckResponse {
        message: format!("Notified {sent} third-party contact(s)"),
    }))
}
