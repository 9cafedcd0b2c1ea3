//! Equipment category entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the equipment_categories table.
#[derive(Debug, Clone, FromRow)]
pub struct CategoryEntity {
    pub id: Uuid,
    pub name: String,
    pub responsible_id: Option<Uuid>,
    pub company_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Category with its equipment count for admin listing screens.
#[derive(Debug, Clone, FromRow)]
pub struct CategoryWithCountsEntity {
    pub id: Uuid,
    pub name: String,
    pub responsible_id: Option<Uuid>,
    pub company_id: Option<Uuid>,
    pub equipment_count: i64,
    pub created_at: DateTime<Utc>,
}
