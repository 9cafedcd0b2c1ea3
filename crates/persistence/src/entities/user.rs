//! User entity (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the users table.
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub full_name: Option<String>,
    pub is_admin: bool,
    pub is_third_party: bool,
    pub email_verified: bool,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub employee_id: Option<String>,
    pub hire_date: Option<NaiveDate>,
    pub department_id: Option<Uuid>,
    pub company_id: Option<Uuid>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user together with their open allocated request count.
#[derive(Debug, Clone, FromRow)]
pub struct UserWithLoadEntity {
    #[sqlx(flatten)]
    pub user: UserEntity,
    pub open_request_count: i64,
}
