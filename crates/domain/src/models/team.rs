//! Maintenance team domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to create or update a team.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TeamInput {
    pub name: String,
    #[serde(default)]
    pub company_id: Option<Uuid>,
    #[serde(default)]
    pub member_ids: Vec<Uuid>,
}

/// Team representation with usage counters for admin screens.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TeamItem {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<Uuid>,
    pub member_count: i64,
    pub equipment_count: i64,
    pub request_count: i64,
    pub open_request_count: i64,
    pub created_at: DateTime<Utc>,
}
