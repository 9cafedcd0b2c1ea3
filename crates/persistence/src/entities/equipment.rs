//! Equipment entity (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the equipment table.
#[derive(Debug, Clone, FromRow)]
pub struct EquipmentEntity {
    pub id: Uuid,
    pub name: String,
    pub serial_number: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub warranty_information: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub assigned_date: Option<NaiveDate>,
    pub used_in_location: Option<String>,
    pub health_percentage: i32,
    pub owner_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
    pub team_id: Uuid,
    pub technician_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub company_id: Option<Uuid>,
    pub work_center_id: Option<Uuid>,
    pub scrap: bool,
    pub scrap_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
