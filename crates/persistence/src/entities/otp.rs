//! One-time-password entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::otp::OtpPurpose;

/// Database enum for the OTP purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "otp_purpose", rename_all = "snake_case")]
pub enum OtpPurposeDb {
    PasswordReset,
    EmailVerification,
}

impl From<OtpPurpose> for OtpPurposeDb {
    fn from(purpose: OtpPurpose) -> Self {
        match purpose {
            OtpPurpose::PasswordReset => OtpPurposeDb::PasswordReset,
            OtpPurpose::EmailVerification => OtpPurposeDb::EmailVerification,
        }
    }
}

impl From<OtpPurposeDb> for OtpPurpose {
    fn from(purpose: OtpPurposeDb) -> Self {
        match purpose {
            OtpPurposeDb::PasswordReset => OtpPurpose::PasswordReset,
            OtpPurposeDb::EmailVerification => OtpPurpose::EmailVerification,
        }
    }
}

/// Database row mapping for the otp_codes table.
///
/// Only the SHA-256 hash of the code is stored.
#[derive(Debug, Clone, FromRow)]
pub struct OtpEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub code_hash: String,
    pub purpose: OtpPurposeDb,
    pub used: bool,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
