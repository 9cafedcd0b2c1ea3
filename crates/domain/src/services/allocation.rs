//! Work allocation workflow state machine.
//!
//! The negotiation between an admin and a worker over a maintenance request
//! is modeled as pure transitions over [`WorkflowState`]: allocate, worker
//! response (with optional deadline proposal), admin deadline verdict, worker
//! progress updates, and admin stage moves. Handlers apply a transition,
//! persist the resulting state, and only then fire notifications; nothing in
//! this module performs I/O.
//!
//! The two state axes (`stage`, `allocation_status`) stay independent. The
//! documented cross-effects are: a worker starting work drags `stage` to
//! `in_progress`, completing drags it to `repaired`, and an admin moving the
//! stage to `scrap` requests the owning equipment be flagged scrapped.

use chrono::{DateTime, NaiveDateTime, Utc};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::models::request::{
    AllocationStatus, DeadlineDecision, DeadlineStatus, ResponseDecision, Stage, StatusUpdate,
    WorkerResponse,
};

/// Format of the deadline form field (`2026-09-03T14:00`).
const PROPOSED_DEADLINE_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Errors produced by workflow transitions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkflowError {
    /// Allocation target is missing, unknown, or an admin account.
    #[error("Invalid worker selected for allocation")]
    InvalidWorker,

    /// Caller is not the worker the request is allocated to.
    #[error("Request is not allocated to this worker")]
    AccessDenied,
}

/// Allocation target resolved from the user store before a transition.
#[derive(Debug, Clone, Copy)]
pub struct AllocationTarget {
    pub worker_id: Uuid,
    pub is_admin: bool,
}

/// Side effects a stage move asks the caller to carry out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageEffects {
    /// Set the owning equipment's scrap flag.
    pub scrap_equipment: bool,
}

/// The mutable workflow fields of a maintenance request.
///
/// Loaded from a persisted request, mutated by the transition methods below,
/// and written back wholesale. The state change is authoritative regardless
/// of any notification outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowState {
    pub stage: Stage,
    pub allocation_status: AllocationStatus,
    pub allocated_to: Option<Uuid>,
    pub allocated_at: Option<DateTime<Utc>>,
    pub worker_response: Option<WorkerResponse>,
    pub worker_response_at: Option<DateTime<Utc>>,
    pub worker_response_reason: Option<String>,
    pub proposed_deadline: Option<DateTime<Utc>>,
    pub deadline_status: Option<DeadlineStatus>,
    pub deadline_admin_response: Option<String>,
    pub admin_instructions: Option<String>,
    pub deadline_approved_at: Option<DateTime<Utc>>,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub duration_hours: Option<f64>,
    // Legacy assignment mirrors, kept for backward-compatible queries.
    pub technician_id: Option<Uuid>,
    pub assigned_user_id: Option<Uuid>,
}

impl WorkflowState {
    /// Initial workflow state of a freshly created request.
    pub fn new_request(
        scheduled_date: Option<DateTime<Utc>>,
        technician_id: Option<Uuid>,
        assigned_user_id: Option<Uuid>,
    ) -> Self {
        Self {
            stage: Stage::New,
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
            scheduled_date,
            start_date: None,
            end_date: None,
            duration_hours: None,
            technician_id,
            assigned_user_id,
        }
    }

    /// Admin allocates the request to a worker.
    ///
    /// Overwrites any previous allocation cycle: a request rejected by one
    /// worker can be handed to another with no residue from the old cycle.
    pub fn allocate(
        &mut self,
        target: Option<AllocationTarget>,
        now: DateTime<Utc>,
    ) -> Result<(), WorkflowError> {
        let target = target.ok_or(WorkflowError::InvalidWorker)?;
        if target.is_admin {
            return Err(WorkflowError::InvalidWorker);
        }

        self.allocation_status = AllocationStatus::Allocated;
        self.allocated_to = Some(target.worker_id);
        self.allocated_at = Some(now);
        self.technician_id = Some(target.worker_id);
        self.assigned_user_id = Some(target.worker_id);
        self.worker_response = None;
        self.worker_response_at = None;
        self.worker_response_reason = None;
        Ok(())
    }

    /// The allocated worker accepts or rejects the allocation.
    ///
    /// On accept, a parseable `proposed_deadline` upgrades the response to a
    /// deadline proposal awaiting admin review. A malformed deadline string
    /// is logged and ignored; the plain accept still goes through. Rejection
    /// is a dead end until the admin re-allocates.
    pub fn worker_respond(
        &mut self,
        caller: Uuid,
        decision: ResponseDecision,
        reason: Option<String>,
        proposed_deadline: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<(), WorkflowError> {
        self.ensure_allocated_to(caller)?;

        match decision {
            ResponseDecision::Accept => {
                self.allocation_status = AllocationStatus::Accepted;
                self.worker_response = Some(WorkerResponse::Accepted);
                self.worker_response_at = Some(now);
                self.worker_response_reason = reason;

                if let Some(raw) = proposed_deadline {
                    match parse_proposed_deadline(raw) {
                        Some(deadline) => {
                            self.proposed_deadline = Some(deadline);
                            self.deadline_status = Some(DeadlineStatus::Pending);
                            self.worker_response = Some(WorkerResponse::DeadlineProposed);
                        }
                        None => {
                            // Lenient by inherited contract: the accept
                            // proceeds without a proposal.
                            debug!(raw = %raw, "Ignoring unparseable proposed deadline");
                        }
                    }
                }
            }
            ResponseDecision::Reject => {
                self.allocation_status = AllocationStatus::Rejected;
                self.worker_response = Some(WorkerResponse::Rejected);
                self.worker_response_at = Some(now);
                self.worker_response_reason = reason;
            }
        }
        Ok(())
    }

    /// Admin approves or rejects the worker's proposed deadline.
    pub fn respond_to_deadline(
        &mut self,
        decision: DeadlineDecision,
        admin_response: Option<String>,
        admin_instructions: Option<String>,
        now: DateTime<Utc>,
    ) {
        match decision {
            DeadlineDecision::Approve => {
                self.deadline_status = Some(DeadlineStatus::Approved);
                self.deadline_approved_at = Some(now);
                if let Some(instructions) = admin_instructions {
                    if !instructions.is_empty() {
                        self.admin_instructions = Some(instructions);
                    }
                }
            }
            DeadlineDecision::Reject => {
                self.deadline_status = Some(DeadlineStatus::Rejected);
                self.deadline_admin_response = admin_response;
            }
        }
    }

    /// The allocated worker starts or completes the work.
    ///
    /// Completing marks the stage repaired but does not derive a duration;
    /// only the admin-side [`WorkflowState::update_stage`] does that. The
    /// asymmetry is inherited behavior, preserved so both paths stay
    /// faithful to the system being replaced.
    pub fn worker_update_status(
        &mut self,
        caller: Uuid,
        status: StatusUpdate,
        now: DateTime<Utc>,
    ) -> Result<(), WorkflowError> {
        self.ensure_allocated_to(caller)?;

        match status {
            StatusUpdate::InProgress => {
                self.allocation_status = AllocationStatus::InProgress;
                self.stage = Stage::InProgress;
                if self.start_date.is_none() {
                    self.start_date = Some(now);
                }
            }
            StatusUpdate::Completed => {
                self.allocation_status = AllocationStatus::Completed;
                self.stage = Stage::Repaired;
                if self.end_date.is_none() {
                    self.end_date = Some(now);
                }
            }
        }
        Ok(())
    }

    /// Admin moves the request along the physical repair axis.
    ///
    /// Returns the side effects the caller must apply (equipment scrap).
    /// Any stage is a legal target; unlisted moves just set the stage.
    pub fn update_stage(&mut self, new_stage: Stage, now: DateTime<Utc>) -> StageEffects {
        let mut effects = StageEffects::default();

        match new_stage {
            Stage::InProgress => {
                if self.start_date.is_none() {
                    self.start_date = Some(now);
                }
            }
            Stage::Repaired => {
                if self.end_date.is_none() {
                    self.end_date = Some(now);
                }
                if self.duration_hours.is_none() {
                    if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
                        let seconds = (end - start).num_milliseconds() as f64 / 1000.0;
                        self.duration_hours = Some(seconds / 3600.0);
                    }
                }
            }
            Stage::Scrap => {
                effects.scrap_equipment = true;
            }
            Stage::New => {}
        }

        self.stage = new_stage;
        effects
    }

    /// Whether the request is past its scheduled date and still open.
    ///
    /// Pure derivation; recomputed on every read and never stored.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        match self.scheduled_date {
            Some(scheduled) => now > scheduled && !self.stage.is_closed(),
            None => false,
        }
    }

    /// Deletion is only allowed before work starts or after scrapping.
    pub fn is_deletable(&self) -> bool {
        matches!(self.stage, Stage::New | Stage::Scrap)
    }

    fn ensure_allocated_to(&self, caller: Uuid) -> Result<(), WorkflowError> {
        if self.allocated_to == Some(caller) {
            Ok(())
        } else {
            Err(WorkflowError::AccessDenied)
        }
    }
}

/// Parses the `YYYY-MM-DDTHH:MM` deadline form field as a UTC timestamp.
fn parse_proposed_deadline(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw, PROPOSED_DEADLINE_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 1, 9, 0, 0).unwrap()
    }

    fn worker(id: Uuid) -> Option<AllocationTarget> {
        Some(AllocationTarget {
            worker_id: id,
            is_admin: false,
        })
    }

    fn fresh() -> WorkflowState {
        WorkflowState::new_request(None, None, None)
    }

    #[test]
    fn test_new_request_initial_state() {
        let state = fresh();
        assert_eq!(state.stage, Stage::New);
        assert_eq!(state.allocation_status, AllocationStatus::Pending);
        assert!(state.allocated_to.is_none());
        assert!(state.worker_response.is_none());
        assert!(state.deadline_status.is_none());
    }

    #[test]
    fn test_allocate_sets_status_and_mirrors() {
        let mut state = fresh();
        let w = Uuid::new_v4();
        state.allocate(worker(w), t0()).unwrap();

        assert_eq!(state.allocation_status, AllocationStatus::Allocated);
        assert_eq!(state.allocated_to, Some(w));
        assert_eq!(state.allocated_at, Some(t0()));
        assert_eq!(state.technician_id, Some(w));
        assert_eq!(state.assigned_user_id, Some(w));
    }

    #[test]
    fn test_allocate_rejects_missing_worker() {
        let mut state = fresh();
        assert_eq!(state.allocate(None, t0()), Err(WorkflowError::InvalidWorker));
        assert_eq!(state.allocation_status, AllocationStatus::Pending);
    }

    #[test]
    fn test_allocate_rejects_admin_target() {
        let mut state = fresh();
        let target = AllocationTarget {
            worker_id: Uuid::new_v4(),
            is_admin: true,
        };
        assert_eq!(
            state.allocate(Some(target), t0()),
            Err(WorkflowError::InvalidWorker)
        );
        assert!(state.allocated_to.is_none());
    }

    #[test]
    fn test_accept_without_deadline() {
        let mut state = fresh();
        let w = Uuid::new_v4();
        state.allocate(worker(w), t0()).unwrap();
        state
            .worker_respond(w, ResponseDecision::Accept, Some("ok".into()), None, t0())
            .unwrap();

        assert_eq!(state.allocation_status, AllocationStatus::Accepted);
        assert_eq!(state.worker_response, Some(WorkerResponse::Accepted));
        assert_eq!(state.worker_response_reason.as_deref(), Some("ok"));
        assert!(state.deadline_status.is_none());
        assert!(state.proposed_deadline.is_none());
    }

    #[test]
    fn test_accept_with_valid_deadline_becomes_proposal() {
        let mut state = fresh();
        let w = Uuid::new_v4();
        state.allocate(worker(w), t0()).unwrap();
        state
            .worker_respond(
                w,
                ResponseDecision::Accept,
                None,
                Some("2026-09-03T14:30"),
                t0(),
            )
            .unwrap();

        assert_eq!(state.allocation_status, AllocationStatus::Accepted);
        assert_eq!(state.worker_response, Some(WorkerResponse::DeadlineProposed));
        assert_eq!(state.deadline_status, Some(DeadlineStatus::Pending));
        assert_eq!(
            state.proposed_deadline,
            Some(Utc.with_ymd_and_hms(2026, 9, 3, 14, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_accept_with_malformed_deadline_is_plain_accept() {
        let mut state = fresh();
        let w = Uuid::new_v4();
        state.allocate(worker(w), t0()).unwrap();
        state
            .worker_respond(
                w,
                ResponseDecision::Accept,
                None,
                Some("next tuesday-ish"),
                t0(),
            )
            .unwrap();

        assert_eq!(state.worker_response, Some(WorkerResponse::Accepted));
        assert!(state.deadline_status.is_none());
        assert!(state.proposed_deadline.is_none());
    }

    #[test]
    fn test_reject_is_dead_end_until_reallocation() {
        let mut state = fresh();
        let w1 = Uuid::new_v4();
        state.allocate(worker(w1), t0()).unwrap();
        state
            .worker_respond(w1, ResponseDecision::Reject, Some("overloaded".into()), None, t0())
            .unwrap();

        assert_eq!(state.allocation_status, AllocationStatus::Rejected);
        assert_eq!(state.worker_response, Some(WorkerResponse::Rejected));

        // Re-allocation overwrites the cycle with no rejected residue.
        let w2 = Uuid::new_v4();
        state.allocate(worker(w2), t0() + Duration::hours(1)).unwrap();
        assert_eq!(state.allocation_status, AllocationStatus::Allocated);
        assert_eq!(state.allocated_to, Some(w2));
        assert!(state.worker_response.is_none());
        assert!(state.worker_response_reason.is_none());
    }

    #[test]
    fn test_respond_requires_allocated_worker() {
        let mut state = fresh();
        let w = Uuid::new_v4();
        state.allocate(worker(w), t0()).unwrap();
        let before = state.clone();

        let stranger = Uuid::new_v4();
        let result = state.worker_respond(stranger, ResponseDecision::Accept, None, None, t0());
        assert_eq!(result, Err(WorkflowError::AccessDenied));
        assert_eq!(state, before);
    }

    #[test]
    fn test_deadline_approval() {
        let mut state = fresh();
        let w = Uuid::new_v4();
        state.allocate(worker(w), t0()).unwrap();
        state
            .worker_respond(w, ResponseDecision::Accept, None, Some("2026-09-03T14:00"), t0())
            .unwrap();

        let decided_at = t0() + Duration::hours(2);
        state.respond_to_deadline(
            DeadlineDecision::Approve,
            None,
            Some("use certified parts".into()),
            decided_at,
        );

        assert_eq!(state.deadline_status, Some(DeadlineStatus::Approved));
        assert_eq!(state.deadline_approved_at, Some(decided_at));
        assert_eq!(state.admin_instructions.as_deref(), Some("use certified parts"));
    }

    #[test]
    fn test_deadline_rejection_stores_response() {
        let mut state = fresh();
        state.respond_to_deadline(
            DeadlineDecision::Reject,
            Some("too late for the audit".into()),
            None,
            t0(),
        );
        assert_eq!(state.deadline_status, Some(DeadlineStatus::Rejected));
        assert_eq!(
            state.deadline_admin_response.as_deref(),
            Some("too late for the audit")
        );
        assert!(state.deadline_approved_at.is_none());
    }

    #[test]
    fn test_worker_start_sets_both_axes() {
        let mut state = fresh();
        let w = Uuid::new_v4();
        state.allocate(worker(w), t0()).unwrap();
        state
            .worker_update_status(w, StatusUpdate::InProgress, t0())
            .unwrap();

        assert_eq!(state.allocation_status, AllocationStatus::InProgress);
        assert_eq!(state.stage, Stage::InProgress);
        assert_eq!(state.start_date, Some(t0()));

        // start_date is only stamped once
        state
            .worker_update_status(w, StatusUpdate::InProgress, t0() + Duration::hours(5))
            .unwrap();
        assert_eq!(state.start_date, Some(t0()));
    }

    #[test]
    fn test_worker_complete_does_not_derive_duration() {
        let mut state = fresh();
        let w = Uuid::new_v4();
        state.allocate(worker(w), t0()).unwrap();
        state
            .worker_update_status(w, StatusUpdate::InProgress, t0())
            .unwrap();
        state
            .worker_update_status(w, StatusUpdate::Completed, t0() + Duration::hours(3))
            .unwrap();

        assert_eq!(state.allocation_status, AllocationStatus::Completed);
        assert_eq!(state.stage, Stage::Repaired);
        assert_eq!(state.end_date, Some(t0() + Duration::hours(3)));
        assert!(state.duration_hours.is_none());
    }

    #[test]
    fn test_worker_update_status_access_denied() {
        let mut state = fresh();
        let w = Uuid::new_v4();
        state.allocate(worker(w), t0()).unwrap();
        let result = state.worker_update_status(Uuid::new_v4(), StatusUpdate::Completed, t0());
        assert_eq!(result, Err(WorkflowError::AccessDenied));
        assert_eq!(state.stage, Stage::New);
    }

    #[test]
    fn test_update_stage_repaired_derives_duration_in_hours() {
        let mut state = fresh();
        state.update_stage(Stage::InProgress, t0());
        assert_eq!(state.start_date, Some(t0()));

        let end = t0() + Duration::minutes(90);
        let effects = state.update_stage(Stage::Repaired, end);
        assert!(!effects.scrap_equipment);
        assert_eq!(state.end_date, Some(end));
        let duration = state.duration_hours.unwrap();
        assert!((duration - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_update_stage_repaired_respects_explicit_duration() {
        let mut state = fresh();
        state.update_stage(Stage::InProgress, t0());
        state.duration_hours = Some(8.0);
        state.update_stage(Stage::Repaired, t0() + Duration::hours(1));
        assert_eq!(state.duration_hours, Some(8.0));
    }

    #[test]
    fn test_update_stage_scrap_requests_equipment_flag() {
        let mut state = fresh();
        let effects = state.update_stage(Stage::Scrap, t0());
        assert!(effects.scrap_equipment);
        assert_eq!(state.stage, Stage::Scrap);
    }

    #[test]
    fn test_update_stage_new_is_a_plain_move() {
        let mut state = fresh();
        state.update_stage(Stage::InProgress, t0());
        let effects = state.update_stage(Stage::New, t0());
        assert_eq!(effects, StageEffects::default());
        assert_eq!(state.stage, Stage::New);
        // earlier stamps are not unwound
        assert_eq!(state.start_date, Some(t0()));
    }

    #[test]
    fn test_is_overdue() {
        let mut state = fresh();
        assert!(!state.is_overdue(t0()));

        state.scheduled_date = Some(t0());
        assert!(!state.is_overdue(t0()));
        assert!(state.is_overdue(t0() + Duration::minutes(1)));

        state.update_stage(Stage::Repaired, t0() + Duration::hours(1));
        assert!(!state.is_overdue(t0() + Duration::days(10)));

        let mut scrapped = fresh();
        scrapped.scheduled_date = Some(t0());
        scrapped.update_stage(Stage::Scrap, t0());
        assert!(!scrapped.is_overdue(t0() + Duration::days(10)));
    }

    #[test]
    fn test_is_deletable() {
        let mut state = fresh();
        assert!(state.is_deletable());
        state.update_stage(Stage::InProgress, t0());
        assert!(!state.is_deletable());
        state.update_stage(Stage::Repaired, t0());
        assert!(!state.is_deletable());
        state.update_stage(Stage::Scrap, t0());
        assert!(state.is_deletable());
    }

    #[test]
    fn test_parse_proposed_deadline() {
        assert_eq!(
            parse_proposed_deadline("2026-09-03T14:00"),
            Some(Utc.with_ymd_and_hms(2026, 9, 3, 14, 0, 0).unwrap())
        );
        assert!(parse_proposed_deadline("2026-09-03").is_none());
        assert!(parse_proposed_deadline("garbage").is_none());
    }
}
