//! Authentication request/response models.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::Role;

/// Login request body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful login response with the issued token pair.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct LoginResponse {
    pub user_id: Uuid,
    pub role: Role,
    pub access_token: String,
    pub refresh_token: String,
}

/// Generic acknowledgement body for side-effect-only endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AckResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_deserialize() {
        let req: LoginRequest =
            serde_json::from_str(r#"{"username":"admin","password":"pw"}"#).unwrap();
        assert_eq!(req.username, "admin");
    }
}
