//! Equipment category domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to create or update a category.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CategoryInput {
    pub name: String,
    /// Responsible person for this category.
    #[serde(default)]
    pub responsible_id: Option<Uuid>,
    #[serde(default)]
    pub company_id: Option<Uuid>,
}

/// Category representation returned by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CategoryItem {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responsible_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<Uuid>,
    pub equipment_count: i64,
    pub created_at: DateTime<Utc>,
}
