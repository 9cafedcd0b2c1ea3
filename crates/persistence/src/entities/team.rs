//! Team entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the teams table.
#[derive(Debug, Clone, FromRow)]
pub struct TeamEntity {
    pub id: Uuid,
    pub name: String,
    pub company_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Team with usage counters for admin listing screens.
#[derive(Debug, Clone, FromRow)]
pub struct TeamWithCountsEntity {
    pub id: Uuid,
    pub name: String,
    pub company_id: Option<Uuid>,
    pub member_count: i64,
    pub equipment_count: i64,
    pub request_count: i64,
    pub open_request_count: i64,
    pub created_at: DateTime<Utc>,
}
