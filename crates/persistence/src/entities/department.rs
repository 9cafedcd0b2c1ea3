//! Department entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the departments table.
#[derive(Debug, Clone, FromRow)]
pub struct DepartmentEntity {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub company_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Department with usage counters for admin listing screens.
#[derive(Debug, Clone, FromRow)]
pub struct DepartmentWithCountsEntity {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub company_id: Option<Uuid>,
    pub employee_count: i64,
    pub equipment_count: i64,
}
