//! Equipment domain models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Health percentage below which equipment counts as critical.
pub const CRITICAL_HEALTH_THRESHOLD: i32 = 30;

/// Request to create or update an equipment record.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EquipmentInput {
    pub name: String,
    #[serde(default)]
    pub serial_number: Option<String>,
    #[serde(default)]
    pub purchase_date: Option<NaiveDate>,
    #[serde(default)]
    pub warranty_information: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub assigned_date: Option<NaiveDate>,
    #[serde(default)]
    pub used_in_location: Option<String>,
    #[serde(default = "default_health")]
    pub health_percentage: i32,
    #[serde(default)]
    pub owner_id: Option<Uuid>,
    #[serde(default)]
    pub department_id: Option<Uuid>,
    pub team_id: Uuid,
    #[serde(default)]
    pub technician_id: Option<Uuid>,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub company_id: Option<Uuid>,
    #[serde(default)]
    pub work_center_id: Option<Uuid>,
    #[serde(default)]
    pub scrap: bool,
}

fn default_health() -> i32 {
    100
}

/// Equipment representation returned by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct EquipmentItem {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warranty_information: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used_in_location: Option<String>,
    pub health_percentage: i32,
    /// Derived: health below the critical threshold.
    pub is_critical: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_id: Option<Uuid>,
    pub team_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technician_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_center_id: Option<Uuid>,
    pub scrap: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scrap_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Whether a health reading is critical.
pub fn is_critical(health_percentage: i32) -> bool {
    health_percentage < CRITICAL_HEALTH_THRESHOLD
}

/// Defaults copied from equipment onto a new maintenance request.
///
/// Category and team always transfer; the default technician, when present,
/// seeds both the technician and assigned-user fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct EquipmentDefaults {
    pub category_id: Option<Uuid>,
    pub team_id: Option<Uuid>,
    pub technician_id: Option<Uuid>,
}

/// Query parameters for listing equipment.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ListEquipmentQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub include_scrapped: bool,
}

/// Request to notify third-party users about an equipment unit.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NotifyThirdPartyRequest {
    pub third_party_ids: Vec<Uuid>,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_critical_threshold() {
        assert!(is_critical(0));
        assert!(is_critical(29));
        assert!(!is_critical(30));
        assert!(!is_critical(100));
    }

    #[test]
    fn test_equipment_input_defaults() {
        let json = r#"{"name":"CNC Mill","team_id":"00000000-0000-0000-0000-000000000001"}"#;
        let input: EquipmentInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.health_percentage, 100);
        assert!(!input.scrap);
        assert!(input.technician_id.is_none());
    }
}
