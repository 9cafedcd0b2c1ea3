//! Maintenance request domain models.
//!
//! A request carries two largely independent state axes: the physical repair
//! `Stage` and the admin/worker negotiation `AllocationStatus`. They are kept
//! as separate enums on purpose; collapsing them would make legal states such
//! as `stage=new` with `allocation_status=allocated` unrepresentable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Physical repair lifecycle of a maintenance request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    New,
    InProgress,
    Repaired,
    Scrap,
}

impl Stage {
    /// A request in a terminal stage no longer counts as open work.
    pub fn is_closed(self) -> bool {
        matches!(self, Stage::Repaired | Stage::Scrap)
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::New => write!(f, "new"),
            Stage::InProgress => write!(f, "in_progress"),
            Stage::Repaired => write!(f, "repaired"),
            Stage::Scrap => write!(f, "scrap"),
        }
    }
}

/// Workflow lifecycle of the admin/worker allocation negotiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationStatus {
    Pending,
    Allocated,
    Accepted,
    Rejected,
    InProgress,
    Completed,
}

impl std::fmt::Display for AllocationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AllocationStatus::Pending => write!(f, "pending"),
            AllocationStatus::Allocated => write!(f, "allocated"),
            AllocationStatus::Accepted => write!(f, "accepted"),
            AllocationStatus::Rejected => write!(f, "rejected"),
            AllocationStatus::InProgress => write!(f, "in_progress"),
            AllocationStatus::Completed => write!(f, "completed"),
        }
    }
}

/// Latest decision recorded from the allocated worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerResponse {
    Accepted,
    Rejected,
    DeadlineProposed,
}

impl std::fmt::Display for WorkerResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkerResponse::Accepted => write!(f, "accepted"),
            WorkerResponse::Rejected => write!(f, "rejected"),
            WorkerResponse::DeadlineProposed => write!(f, "deadline_proposed"),
        }
    }
}

/// Admin verdict on a worker-proposed deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeadlineStatus {
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for DeadlineStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeadlineStatus::Pending => write!(f, "pending"),
            DeadlineStatus::Approved => write!(f, "approved"),
            DeadlineStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// Corrective vs. preventive maintenance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    Corrective,
    Preventive,
}

impl std::fmt::Display for RequestType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestType::Corrective => write!(f, "corrective"),
            RequestType::Preventive => write!(f, "preventive"),
        }
    }
}

/// Request to create a maintenance request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CreateRequestRequest {
    pub subject: String,
    #[serde(default)]
    pub request_type: Option<RequestType>,
    pub equipment_id: Uuid,
    #[serde(default)]
    pub team_id: Option<Uuid>,
    #[serde(default)]
    pub assigned_user_id: Option<Uuid>,
    #[serde(default)]
    pub maintenance_for_id: Option<Uuid>,
    #[serde(default)]
    pub work_center_id: Option<Uuid>,
    #[serde(default)]
    pub scheduled_date: Option<DateTime<Utc>>,
}

/// Request to edit a maintenance request's descriptive fields.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct UpdateRequestRequest {
    pub subject: String,
    pub request_type: RequestType,
    pub team_id: Uuid,
    #[serde(default)]
    pub assigned_user_id: Option<Uuid>,
    #[serde(default)]
    pub technician_id: Option<Uuid>,
    #[serde(default)]
    pub maintenance_for_id: Option<Uuid>,
    #[serde(default)]
    pub work_center_id: Option<Uuid>,
    #[serde(default)]
    pub scheduled_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub duration_hours: Option<f64>,
}

/// Request to move a request between stages.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct UpdateStageRequest {
    pub stage: Stage,
}

/// Request to allocate work to a worker.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AllocateRequest {
    pub worker_id: Uuid,
}

/// Accept/reject decision submitted by a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseDecision {
    Accept,
    Reject,
}

/// Worker's response to an allocation.
///
/// `proposed_deadline` stays a raw string: the original form field arrives as
/// `YYYY-MM-DDTHH:MM` and an unparseable value is deliberately ignored rather
/// than rejected (see the allocation workflow docs).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct WorkerRespondRequest {
    pub response: ResponseDecision,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub proposed_deadline: Option<String>,
}

/// Approve/reject decision on a proposed deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeadlineDecision {
    Approve,
    Reject,
}

/// Admin response to a worker's deadline proposal.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DeadlineResponseRequest {
    pub decision: DeadlineDecision,
    #[serde(default)]
    pub admin_response: Option<String>,
    #[serde(default)]
    pub admin_instructions: Option<String>,
}

/// Worker progress update (start / complete).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusUpdate {
    InProgress,
    Completed,
}

/// Request body for a worker status update.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct WorkerStatusRequest {
    pub status: StatusUpdate,
}

/// Full request representation returned by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RequestItem {
    pub id: Uuid,
    pub name: String,
    pub subject: String,
    pub request_type: RequestType,
    pub equipment_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technician_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_user_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintenance_for_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_center_id: Option<Uuid>,
    pub stage: Stage,
    pub allocation_status: AllocationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allocated_to: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allocated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worker_response: Option<WorkerResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worker_response_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worker_response_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proposed_deadline: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline_status: Option<DeadlineStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline_admin_response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_instructions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline_approved_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_hours: Option<f64>,
    /// Derived on every read, never stored.
    pub is_overdue: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Query parameters for listing requests.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ListRequestsQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub stage: Option<Stage>,
}

/// Requests grouped by stage for the admin board view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RequestsByStage {
    pub new: Vec<RequestItem>,
    pub in_progress: Vec<RequestItem>,
    pub repaired: Vec<RequestItem>,
    pub scrap: Vec<RequestItem>,
}

impl RequestsByStage {
    /// Buckets a flat list by stage, preserving input order.
    pub fn group(items: Vec<RequestItem>) -> Self {
        let mut grouped = Self {
            new: Vec::new(),
            in_progress: Vec::new(),
            repaired: Vec::new(),
            scrap: Vec::new(),
        };
        for item in items {
            match item.stage {
                Stage::New => grouped.new.push(item),
                Stage::InProgress => grouped.in_progress.push(item),
                Stage::Repaired => grouped.repaired.push(item),
                Stage::Scrap => grouped.scrap.push(item),
            }
        }
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_display() {
        assert_eq!(Stage::New.to_string(), "new");
        assert_eq!(Stage::InProgress.to_string(), "in_progress");
        assert_eq!(Stage::Repaired.to_string(), "repaired");
        assert_eq!(Stage::Scrap.to_string(), "scrap");
    }

    #[test]
    fn test_stage_is_closed() {
        assert!(!Stage::New.is_closed());
        assert!(!Stage::InProgress.is_closed());
        assert!(Stage::Repaired.is_closed());
        assert!(Stage::Scrap.is_closed());
    }

    #[test]
    fn test_allocation_status_display() {
        assert_eq!(AllocationStatus::Pending.to_string(), "pending");
        assert_eq!(AllocationStatus::Allocated.to_string(), "allocated");
        assert_eq!(AllocationStatus::InProgress.to_string(), "in_progress");
    }

    #[test]
    fn test_worker_respond_request_deserialize() {
        let json = r#"{"response":"accept","reason":"on it","proposed_deadline":"2026-09-03T14:00"}"#;
        let req: WorkerRespondRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.response, ResponseDecision::Accept);
        assert_eq!(req.reason.as_deref(), Some("on it"));
        assert_eq!(req.proposed_deadline.as_deref(), Some("2026-09-03T14:00"));
    }

    #[test]
    fn test_deadline_response_deserialize() {
        let json = r#"{"decision":"approve","admin_instructions":"use certified parts"}"#;
        let req: DeadlineResponseRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.decision, DeadlineDecision::Approve);
        assert!(req.admin_response.is_none());
    }

    #[test]
    fn test_group_by_stage() {
        fn item(stage: Stage) -> RequestItem {
            RequestItem {
                id: Uuid::new_v4(),
                name: "MR00001".into(),
                subject: "test".into(),
                request_type: RequestType::Corrective,
                equipment_id: Uuid::new_v4(),
                category_id: None,
                team_id: Some(Uuid::new_v4()),
                technician_id: None,
                assigned_user_id: None,
                maintenance_for_id: None,
                work_center_id: None,
                stage,
                allocation_status: AllocationStatus::Pending,
                allocated_to: None,
                allocated_at: None,
                worker_response: None,
                worker_response_at: None,
                worker_response_reason: None,
                proposed_deadline: None,
                deadline_status: None,
                deadline_admin_response: None,
                admin_instructions: None,
                deadline_approved_at: None,
                scheduled_date: None,
                start_date: None,
                end_date: None,
                duration_hours: None,
                is_overdue: false,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            }
        }

        let grouped =
            RequestsByStage::group(vec![item(Stage::New), item(Stage::Scrap), item(Stage::New)]);
        assert_eq!(grouped.new.len(), 2);
        assert_eq!(grouped.scrap.len(), 1);
        assert!(grouped.in_progress.is_empty());
    }
}
