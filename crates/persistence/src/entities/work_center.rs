//! Work center entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the work_centers table.
#[derive(Debug, Clone, FromRow)]
pub struct WorkCenterEntity {
    pub id: Uuid,
    pub name: String,
    pub code: Option<String>,
    pub tag: Option<String>,
    pub alternative_work_centers: Option<String>,
    pub cost_per_hour: f64,
    pub capacity_time_efficiency: f64,
    pub oee_target: Option<f64>,
    pub description: Option<String>,
    pub company_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
