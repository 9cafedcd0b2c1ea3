//! User and worker domain models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Active open requests a worker is assumed able to carry at once.
pub const WORKER_MAX_CAPACITY: i64 = 10;

/// Role derived from the admin flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::User => write!(f, "user"),
        }
    }
}

/// Request to create a worker account (admin-managed).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CreateWorkerRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub employee_id: Option<String>,
    #[serde(default)]
    pub hire_date: Option<NaiveDate>,
    #[serde(default)]
    pub department_id: Option<Uuid>,
    #[serde(default)]
    pub company_id: Option<Uuid>,
    #[serde(default)]
    pub is_third_party: bool,
}

/// Request to update a worker account.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct UpdateWorkerRequest {
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub employee_id: Option<String>,
    #[serde(default)]
    pub hire_date: Option<NaiveDate>,
    #[serde(default)]
    pub department_id: Option<Uuid>,
    #[serde(default)]
    pub company_id: Option<Uuid>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Optional password change.
    #[serde(default)]
    pub password: Option<String>,
}

fn default_active() -> bool {
    true
}

/// User representation returned by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct UserItem {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    pub role: Role,
    pub is_third_party: bool,
    pub email_verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hire_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<Uuid>,
    pub is_active: bool,
    /// Open allocated work as a percentage of [`WORKER_MAX_CAPACITY`].
    pub utilization_percentage: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Utilization as a percentage, capped at 100 and rounded to one decimal.
pub fn utilization_percentage(open_requests: i64) -> f64 {
    let utilization = (open_requests as f64 / WORKER_MAX_CAPACITY as f64) * 100.0;
    (utilization.min(100.0) * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_display() {
        assert_eq!(Role::Admin.to_string(), "admin");
        assert_eq!(Role::User.to_string(), "user");
    }

    #[test]
    fn test_utilization_percentage() {
        assert_eq!(utilization_percentage(0), 0.0);
        assert_eq!(utilization_percentage(5), 50.0);
        assert_eq!(utilization_percentage(10), 100.0);
        // capped, never over 100
        assert_eq!(utilization_percentage(25), 100.0);
        assert_eq!(utilization_percentage(3), 30.0);
    }

    #[test]
    fn test_create_worker_deserialize_defaults() {
        let json = r#"{"username":"anna","email":"anna@example.com","password":"pw"}"#;
        let req: CreateWorkerRequest = serde_json::from_str(json).unwrap();
        assert!(!req.is_third_party);
        assert!(req.department_id.is_none());
    }
}
