//! Authentication and account-recovery handlers.

use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use domain::models::auth::{AckResponse, LoginRequest, LoginResponse};
use domain::models::otp::{
    is_valid, OtpPurpose, RequestOtpRequest, ResetPasswordRequest, VerifyOtpRequest,
};
use domain::models::Role;
use persistence::entities::{OtpPurposeDb, UserEntity};
use persistence::repositories::{OtpRepository, UserRepository};
use shared::jwt::TokenType;
use shared::otp::{generate_otp, hash_otp};
use shared::password::{hash_password, verify_password};

use crate::app::AppState;
use crate::error::ApiError;

/// Refresh request carrying the refresh token issued at login.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

fn token_pair(state: &AppState, user: &UserEntity) -> Result<LoginResponse, ApiError> {
    let access_token = state.jwt.generate_access_token(user.id)?;
    let refresh_token = state.jwt.generate_refresh_token(user.id)?;
    Ok(LoginResponse {
        user_id: user.id,
        role: if user.is_admin { Role::Admin } else { Role::User },
        access_token,
        refresh_token,
    })
}

/// POST /api/v1/auth/login
///
/// Verifies username/password and issues an access/refresh token pair.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let users = UserRepository::new(state.pool.clone());

    let user = users
        .find_by_username(&payload.username)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid username or password".to_string()))?;

    if !user.is_active {
        warn!(username = %payload.username, "Login attempt on deactivated account");
        return Err(ApiError::Unauthorized(
            "Invalid username or password".to_string(),
        ));
    }

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(username = %payload.username, "Login failed: bad password");
        return Err(ApiError::Unauthorized(
            "Invalid username or password".to_string(),
        ));
    }

    info!(user_id = %user.id, "User logged in");
    Ok(Json(token_pair(&state, &user)?))
}

/// POST /api/v1/auth/refresh
///
/// Exchanges a valid refresh token for a fresh token pair.
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let claims = state.jwt.validate_token(&payload.refresh_token)?;

    if claims.token_type != TokenType::Refresh {
        return Err(ApiError::Unauthorized("Refresh token required".to_string()));
    }

    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| ApiError::Unauthorized("Invalid token subject".to_string()))?;

    let user = UserRepository::new(state.pool.clone())
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("User not found".to_string()))?;

    if !user.is_active {
        return Err(ApiError::Unauthorized("Account is deactivated".to_string()));
    }

    Ok(Json(token_pair(&state, &user)?))
}

/// POST /api/v1/auth/request-otp
///
/// Generates a one-time code and emails it to the account holder. The
/// response is the same whether or not the address is known, so the
/// endpoint cannot be used to probe for accounts.
pub async fn request_otp(
    State(state): State<AppState>,
    Json(payload): Json<RequestOtpRequest>,
) -> Result<Json<AckResponse>, ApiError> {
    let users = UserRepository::new(state.pool.clone());

    let ack = AckResponse {
        message: "If the address is registered, a code has been sent".to_string(),
    };

    let Some(user) = users.find_by_email(&payload.email).await? else {
        info!(purpose = %payload.purpose, "OTP requested for unknown email");
        return Ok(Json(ack));
    };

    let code = generate_otp();
    let code_hash = hash_otp(&code);

    OtpRepository::new(state.pool.clone())
        .create(
            user.id,
            &code_hash,
            OtpPurposeDb::from(payload.purpose),
            state.config.otp.ttl_minutes,
        )
        .await?;

    if let Err(e) = state
        .email
        .send_otp_email(
            &user.email,
            user.full_name.as_deref(),
            payload.purpose,
            &code,
            state.config.otp.ttl_minutes,
        )
        .await
    {
        // The code is already stored; a delivery failure should not leak
        // account existence through the response.
        warn!(user_id = %user.id, error = %e, "Failed to deliver OTP email");
    }

    info!(user_id = %user.id, purpose = %payload.purpose, "OTP issued");
    Ok(Json(ack))
}

async fn consume_otp(
    state: &AppState,
    email: &str,
    otp_code: &str,
    purpose: OtpPurpose,
) -> Result<UserEntity, ApiError> {
    let user = UserRepository::new(state.pool.clone())
        .find_by_email(email)
        .await?
        .ok_or_else(|| ApiError::Validation("Invalid or expired code".to_string()))?;

    let otps = OtpRepository::new(state.pool.clone());
    let otp = otps
        .find_active(user.id, OtpPurposeDb::from(purpose))
        .await?
        .ok_or_else(|| ApiError::Validation("Invalid or expired code".to_string()))?;

    let now = chrono::Utc::now();
    if !is_valid(otp.used, otp.expires_at, now) || otp.code_hash != hash_otp(otp_code) {
        return Err(ApiError::Validation("Invalid or expired code".to_string()));
    }

    otps.mark_used(otp.id).await?;
    Ok(user)
}

/// POST /api/v1/auth/verify-email
///
/// Confirms ownership of an email address with a previously issued code.
pub async fn verify_email(
    State(state): State<AppState>,
    Json(payload): Json<VerifyOtpRequest>,
) -> Result<Json<AckResponse>, ApiError> {
    let user = consume_otp(
        &state,
        &payload.email,
        &payload.otp_code,
        OtpPurpose::EmailVerification,
    )
    .await?;

    UserRepository::new(state.pool.clone())
        .mark_email_verified(user.id)
        .await?;

    info!(user_id = %user.id, "Email address verified");
    Ok(Json(AckResponse {
        message: "Email address verified".to_string(),
    }))
}

/// POST /api/v1/auth/reset-password
///
/// Sets a new password after validating the emailed code.
pub async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Json<AckResponse>, ApiError> {
    if payload.new_password.len() < 8 {
        return Err(ApiError::Validation(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    let user = consume_otp(
        &state,
        &payload.email,
        &payload.otp_code,
        OtpPurpose::PasswordReset,
    )
    .await?;

    let password_hash = hash_password(&payload.new_password)?;
    UserRepository::new(state.pool.clone())
        .set_password_hash(user.id, &password_hash)
        .await?;

    info!(user_id = %user.id, "Password reset completed");
    Ok(Json(AckResponse {
        message: "Password has been reset".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_request_deserialize() {
        let req: RefreshRequest =
            serde_json::from_str(r#"{"refresh_token":"abc.def.ghi"}"#).unwrap();
        assert_eq!(req.refresh_token, "abc.def.ghi");
    }
}
