//! HTTP route handlers.

use uuid::Uuid;

use domain::services::Recipient;
use persistence::entities::UserEntity;
use persistence::repositories::UserRepository;

use crate::app::AppState;
use crate::error::ApiError;

pub mod auth;
pub mod categories;
pub mod companies;
pub mod dashboard;
pub mod departments;
pub mod equipment;
pub mod health;
pub mod requests;
pub mod teams;
pub mod work_centers;
pub mod worker;
pub mod workers;

/// Load the authenticated user and require an active admin account.
pub(crate) async fn require_admin(
    state: &AppState,
    user_id: Uuid,
) -> Result<UserEntity, ApiError> {
    let user = UserRepository::new(state.pool.clone())
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("User not found".to_string()))?;

    if !user.is_active {
        return Err(ApiError::Forbidden("Account is deactivated".to_string()));
    }
    if !user.is_admin {
        return Err(ApiError::Forbidden("Admin access required".to_string()));
    }

    Ok(user)
}

/// Load the authenticated user and require an active account (any role).
pub(crate) async fn require_active_user(
    state: &AppState,
    user_id: Uuid,
) -> Result<UserEntity, ApiError> {
    let user = UserRepository::new(state.pool.clone())
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("User not found".to_string()))?;

    if !user.is_active {
        return Err(ApiError::Forbidden("Account is deactivated".to_string()));
    }

    Ok(user)
}

/// Convert recipient rows (id, email, name) into notification recipients.
pub(crate) fn to_recipients(rows: Vec<(Uuid, String, Option<String>)>) -> Vec<Recipient> {
    rows.into_iter()
        .map(|(user_id, email, full_name)| Recipient {
            user_id,
            email,
            full_name,
        })
        .collect()
}
