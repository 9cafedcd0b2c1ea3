//! Company handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;

use domain::models::company::{CompanyInput, CompanyItem};
use persistence::entities::CompanyEntity;
use persistence::repositories::CompanyRepository;
use shared::validation::validate_name;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::routes::require_admin;

fn company_item(entity: CompanyEntity) -> CompanyItem {
    let has_email_config = entity
        .smtp_username
        .as_deref()
        .is_some_and(|u| !u.is_empty())
        && entity
            .smtp_password
            .as_deref()
            .is_some_and(|p| !p.is_empty());
    CompanyItem {
        id: entity.id,
        name: entity.name,
        address: entity.address,
        phone: entity.phone,
        email: entity.email,
        has_email_config,
        created_at: entity.created_at,
        updated_at: entity.updated_at,
    }
}

/// POST /api/v1/companies
pub async fn create_company(
    State(state): State<AppState>,
    auth: UserAuth,
    Json(payload): Json<CompanyInput>,
) -> Result<(StatusCode, Json<CompanyItem>), ApiError> {
    require_admin(&state, auth.user_id).await?;
    validate_name(&payload.name)?;

    let entity = CompanyRepository::new(state.pool.clone())
        .create(&payload)
        .await?;

    info!(company_id = %entity.id, name = %entity.name, "Company created");
    Ok((StatusCode::CREATED, Json(company_item(entity))))
}

/// GET /api/v1/companies
pub async fn list_companies(
    State(state): State<AppState>,
    auth: UserAuth,
) -> Result<Json<Vec<CompanyItem>>, ApiError> {
    require_admin(&state, auth.user_id).await?;

    let entities = CompanyRepository::new(state.pool.clone()).list().await?;
    Ok(Json(entities.into_iter().map(company_item).collect()))
}

/// PUT /api/v1/companies/:id
///
/// A blank SMTP password leaves the stored one untouched, so the settings
/// screen can round-trip without ever seeing the secret.
pub async fn update_company(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(id): Path<Uuid>,
    Json(payload): Json<CompanyInput>,
) -> Result<Json<CompanyItem>, ApiError> {
    require_admin(&state, auth.user_id).await?;
    validate_name(&payload.name)?;

    let entity = CompanyRepository::new(state.pool.clone())
        .update(id, &payload)
        .await?
        .ok_or_else(|| ApiError::NotFound("Company not found".to_string()))?;

    Ok(Json(company_item(entity)))
}

/// DELETE /api/v1/companies/:id
///
/// Companies still referenced by users, equipment, categories, or teams
/// cannot go.
pub async fn delete_company(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    require_admin(&state, auth.user_id).await?;

    let companies = CompanyRepository::new(state.pool.clone());
    let refs = companies.count_references(id).await?;
    if refs.total() > 0 {
        return Err(ApiError::Conflict(format!(
            "Company is referenced by {} user(s), {} equipment unit(s), \
             {} category(ies), and {} team(s)",
            refs.users, refs.equipment, refs.categories, refs.teams
        )));
    }

    let deleted = companies.delete(id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Company not found".to_string()));
    }

    info!(company_id = %id, "Company deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entity(username: Option<&str>, password: Option<&str>) -> CompanyEntity {
        CompanyEntity {
            id: Uuid::new_v4(),
            name: "Acme".to_string(),
            address: None,
            phone: None,
            email: None,
            smtp_server: Some("smtp.acme.test".to_string()),
            smtp_port: 587,
            smtp_use_tls: true,
            smtp_use_ssl: false,
            smtp_username: username.map(|s| s.to_string()),
            smtp_password: password.map(|s| s.to_string()),
            smtp_sender_name: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_has_email_config_requires_credentials() {
        assert!(!company_item(entity(None, None)).has_email_config);
        assert!(!company_item(entity(Some("mailer"), None)).has_email_config);
        assert!(!company_item(entity(Some(""), Some("pw"))).has_email_config);
        assert!(company_item(entity(Some("mailer"), Some("pw"))).has_email_config);
    }
}
