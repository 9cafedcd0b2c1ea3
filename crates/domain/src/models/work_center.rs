//! Work center domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to create or update a work center.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct WorkCenterInput {
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub alternative_work_centers: Option<String>,
    #[serde(default = "default_cost_per_hour")]
    pub cost_per_hour: f64,
    /// Capacity time efficiency percentage.
    #[serde(default = "default_efficiency")]
    pub capacity_time_efficiency: f64,
    /// Overall Equipment Effectiveness target percentage.
    #[serde(default)]
    pub oee_target: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub company_id: Option<Uuid>,
}

fn default_cost_per_hour() -> f64 {
    1.0
}

fn default_efficiency() -> f64 {
    100.0
}

/// Work center representation returned by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct WorkCenterItem {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternative_work_centers: Option<String>,
    pub cost_per_hour: f64,
    pub capacity_time_efficiency: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oee_target: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_work_center_input_defaults() {
        let input: WorkCenterInput = serde_json::from_str(r#"{"name":"Assembly A"}"#).unwrap();
        assert_eq!(input.cost_per_hour, 1.0);
        assert_eq!(input.capacity_time_efficiency, 100.0);
        assert!(input.oee_target.is_none());
    }
}
