//! Maintenance request entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::request::{
    AllocationStatus, DeadlineStatus, RequestType, Stage, WorkerResponse,
};
use domain::services::WorkflowState;

/// Database enum for the physical repair stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "request_stage", rename_all = "snake_case")]
pub enum StageDb {
    New,
    InProgress,
    Repaired,
    Scrap,
}

impl From<Stage> for StageDb {
    fn from(stage: Stage) -> Self {
        match stage {
            Stage::New => StageDb::New,
            Stage::InProgress => StageDb::InProgress,
            Stage::Repaired => StageDb::Repaired,
            Stage::Scrap => StageDb::Scrap,
        }
    }
}

impl From<StageDb> for Stage {
    fn from(stage: StageDb) -> Self {
        match stage {
            StageDb::New => Stage::New,
            StageDb::InProgress => Stage::InProgress,
            StageDb::Repaired => Stage::Repaired,
            StageDb::Scrap => Stage::Scrap,
        }
    }
}

/// Database enum for the allocation negotiation status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "allocation_status", rename_all = "snake_case")]
pub enum AllocationStatusDb {
    Pending,
    Allocated,
    Accepted,
    Rejected,
    InProgress,
    Completed,
}

impl From<AllocationStatus> for AllocationStatusDb {
    fn from(status: AllocationStatus) -> Self {
        match status {
            AllocationStatus::Pending => AllocationStatusDb::Pending,
            AllocationStatus::Allocated => AllocationStatusDb::Allocated,
            AllocationStatus::Accepted => AllocationStatusDb::Accepted,
            AllocationStatus::Rejected => AllocationStatusDb::Rejected,
            AllocationStatus::InProgress => AllocationStatusDb::InProgress,
            AllocationStatus::Completed => AllocationStatusDb::Completed,
        }
    }
}

impl From<AllocationStatusDb> for AllocationStatus {
    fn from(status: AllocationStatusDb) -> Self {
        match status {
            AllocationStatusDb::Pending => AllocationStatus::Pending,
            AllocationStatusDb::Allocated => AllocationStatus::Allocated,
            AllocationStatusDb::Accepted => AllocationStatus::Accepted,
            AllocationStatusDb::Rejected => AllocationStatus::Rejected,
            AllocationStatusDb::InProgress => AllocationStatus::InProgress,
            AllocationStatusDb::Completed => AllocationStatus::Completed,
        }
    }
}

/// Database enum for the worker's recorded response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "worker_response", rename_all = "snake_case")]
pub enum WorkerResponseDb {
    Accepted,
    Rejected,
    DeadlineProposed,
}

impl From<WorkerResponse> for WorkerResponseDb {
    fn from(response: WorkerResponse) -> Self {
        match response {
            WorkerResponse::Accepted => WorkerResponseDb::Accepted,
            WorkerResponse::Rejected => WorkerResponseDb::Rejected,
            WorkerResponse::DeadlineProposed => WorkerResponseDb::DeadlineProposed,
        }
    }
}

impl From<WorkerResponseDb> for WorkerResponse {
    fn from(response: WorkerResponseDb) -> Self {
        match response {
            WorkerResponseDb::Accepted => WorkerResponse::Accepted,
            WorkerResponseDb::Rejected => WorkerResponse::Rejected,
            WorkerResponseDb::DeadlineProposed => WorkerResponse::DeadlineProposed,
        }
    }
}

/// Database enum for the deadline review status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "deadline_status", rename_all = "snake_case")]
pub enum DeadlineStatusDb {
    Pending,
    Approved,
    Rejected,
}

impl From<DeadlineStatus> for DeadlineStatusDb {
    fn from(status: DeadlineStatus) -> Self {
        match status {
            DeadlineStatus::Pending => DeadlineStatusDb::Pending,
            DeadlineStatus::Approved => DeadlineStatusDb::Approved,
            DeadlineStatus::Rejected => DeadlineStatusDb::Rejected,
        }
    }
}

impl From<DeadlineStatusDb> for DeadlineStatus {
    fn from(status: DeadlineStatusDb) -> Self {
        match status {
            DeadlineStatusDb::Pending => DeadlineStatus::Pending,
            DeadlineStatusDb::Approved => DeadlineStatus::Approved,
            DeadlineStatusDb::Rejected => DeadlineStatus::Rejected,
        }
    }
}

/// Database enum for the maintenance type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "request_type", rename_all = "snake_case")]
pub enum RequestTypeDb {
    Corrective,
    Preventive,
}

impl From<RequestType> for RequestTypeDb {
    fn from(request_type: RequestType) -> Self {
        match request_type {
            RequestType::Corrective => RequestTypeDb::Corrective,
            RequestType::Preventive => RequestTypeDb::Preventive,
        }
    }
}

impl From<RequestTypeDb> for RequestType {
    fn from(request_type: RequestTypeDb) -> Self {
        match request_type {
            RequestTypeDb::Corrective => RequestType::Corrective,
            RequestTypeDb::Preventive => RequestType::Preventive,
        }
    }
}

/// Database row mapping for the maintenance_requests table.
#[derive(Debug, Clone, FromRow)]
pub struct RequestEntity {
    pub id: Uuid,
    pub name: String,
    pub subject: String,
    pub request_type: RequestTypeDb,
    pub equipment_id: Uuid,
    pub category_id: Option<Uuid>,
    pub team_id: Option<Uuid>,
    pub technician_id: Option<Uuid>,
    pub assigned_user_id: Option<Uuid>,
    pub maintenance_for_id: Option<Uuid>,
    pub work_center_id: Option<Uuid>,
    pub stage: StageDb,
    pub allocation_status: AllocationStatusDb,
    pub allocated_to: Option<Uuid>,
    pub allocated_at: Option<DateTime<Utc>>,
    pub worker_response: Option<WorkerResponseDb>,
    pub worker_response_at: Option<DateTime<Utc>>,
    pub worker_response_reason: Option<String>,
    pub proposed_deadline: Option<DateTime<Utc>>,
    pub deadline_status: Option<DeadlineStatusDb>,
    pub deadline_admin_response: Option<String>,
    pub admin_instructions: Option<String>,
    pub deadline_approved_at: Option<DateTime<Utc>>,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub duration_hours: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RequestEntity {
    /// Extracts the mutable workflow fields for a domain transition.
    pub fn workflow_state(&self) -> WorkflowState {
        WorkflowState {
            stage: self.stage.into(),
            allocation_status: self.allocation_status.into(),
            allocated_to: self.allocated_to,
            allocated_at: self.allocated_at,
            worker_response: self.worker_response.map(Into::into),
            worker_response_at: self.worker_response_at,
            worker_response_reason: self.worker_response_reason.clone(),
            proposed_deadline: self.proposed_deadline,
            deadline_status: self.deadline_status.map(Into::into),
            deadline_admin_response: self.deadline_admin_response.clone(),
            admin_instructions: self.admin_instructions.clone(),
            deadline_approved_at: self.deadline_approved_at,
            scheduled_date: self.scheduled_date,
            start_date: self.start_date,
            end_date: self.end_date,
            duration_hours: self.duration_hours,
            technician_id: self.technician_id,
            assigned_user_id: self.assigned_user_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_round_trip() {
        for stage in [Stage::New, Stage::InProgress, Stage::Repaired, Stage::Scrap] {
            assert_eq!(Stage::from(StageDb::from(stage)), stage);
        }
    }

    #[test]
    fn test_allocation_status_round_trip() {
        for status in [
            AllocationStatus::Pending,
            AllocationStatus::Allocated,
            AllocationStatus::Accepted,
            AllocationStatus::Rejected,
            AllocationStatus::InProgress,
            AllocationStatus::Completed,
        ] {
            assert_eq!(AllocationStatus::from(AllocationStatusDb::from(status)), status);
        }
    }
}
