//! One-time-password domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What an OTP code is allowed to be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtpPurpose {
    PasswordReset,
    EmailVerification,
}

impl std::fmt::Display for OtpPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OtpPurpose::PasswordReset => write!(f, "password_reset"),
            OtpPurpose::EmailVerification => write!(f, "email_verification"),
        }
    }
}

/// A code is valid while unused and unexpired.
pub fn is_valid(used: bool, expires_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    !used && now < expires_at
}

/// Request to send an OTP code to an email address.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RequestOtpRequest {
    pub email: String,
    pub purpose: OtpPurpose,
}

/// Request to verify an email address with an OTP code.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp_code: String,
}

/// Request to reset a password with an OTP code.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ResetPasswordRequest {
    pub email: String,
    pub otp_code: String,
    pub new_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_otp_purpose_display() {
        assert_eq!(OtpPurpose::PasswordReset.to_string(), "password_reset");
        assert_eq!(OtpPurpose::EmailVerification.to_string(), "email_verification");
    }

    #[test]
    fn test_is_valid() {
        let now = Utc::now();
        assert!(is_valid(false, now + Duration::minutes(5), now));
        assert!(!is_valid(true, now + Duration::minutes(5), now));
        assert!(!is_valid(false, now - Duration::minutes(1), now));
    }
}
