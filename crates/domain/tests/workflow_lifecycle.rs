//! End-to-end exercises of the allocation workflow, from creation through
//! completion, driven purely through the public transition API.

use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use domain::models::request::{
    AllocationStatus, DeadlineDecision, DeadlineStatus, ResponseDecision, Stage, StatusUpdate,
    WorkerResponse,
};
use domain::services::{AllocationTarget, WorkflowState};

fn day_one() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 10, 8, 0, 0).unwrap()
}

fn as_worker(id: Uuid) -> Option<AllocationTarget> {
    Some(AllocationTarget {
        worker_id: id,
        is_admin: false,
    })
}

#[test]
fn full_lifecycle_with_deadline_negotiation() {
    let worker = Uuid::new_v4();
    let mut state = WorkflowState::new_request(Some(day_one() + Duration::days(7)), None, None);

    assert_eq!(state.stage, Stage::New);
    assert_eq!(state.allocation_status, AllocationStatus::Pending);

    // Admin hands the request to the worker.
    state.allocate(as_worker(worker), day_one()).unwrap();
    assert_eq!(state.allocation_status, AllocationStatus::Allocated);

    // Worker accepts and proposes a deadline five days out.
    state
        .worker_respond(
            worker,
            ResponseDecision::Accept,
            Some("parts on order".into()),
            Some("2026-08-15T08:00"),
            day_one() + Duration::hours(2),
        )
        .unwrap();
    assert_eq!(state.allocation_status, AllocationStatus::Accepted);
    assert_eq!(state.worker_response, Some(WorkerResponse::DeadlineProposed));
    assert_eq!(state.deadline_status, Some(DeadlineStatus::Pending));
    assert_eq!(
        state.proposed_deadline,
        Some(Utc.with_ymd_and_hms(2026, 8, 15, 8, 0, 0).unwrap())
    );

    // Admin signs off on the proposal.
    state.respond_to_deadline(
        DeadlineDecision::Approve,
        None,
        Some("log torque values".into()),
        day_one() + Duration::hours(3),
    );
    assert_eq!(state.deadline_status, Some(DeadlineStatus::Approved));
    assert!(state.deadline_approved_at.is_some());
    assert_eq!(state.admin_instructions.as_deref(), Some("log torque values"));

    // Worker starts, then finishes two days later.
    state
        .worker_update_status(worker, StatusUpdate::InProgress, day_one() + Duration::days(1))
        .unwrap();
    assert_eq!(state.stage, Stage::InProgress);
    assert_eq!(state.allocation_status, AllocationStatus::InProgress);

    state
        .worker_update_status(worker, StatusUpdate::Completed, day_one() + Duration::days(3))
        .unwrap();

    assert_eq!(state.stage, Stage::Repaired);
    assert_eq!(state.allocation_status, AllocationStatus::Completed);
    assert_eq!(state.deadline_status, Some(DeadlineStatus::Approved));
    let start = state.start_date.unwrap();
    let end = state.end_date.unwrap();
    assert!(end >= start);
    assert!(!state.is_overdue(day_one() + Duration::days(30)));
}

#[test]
fn rejection_then_reallocation_to_second_worker() {
    let first = Uuid::new_v4();
    let second = Uuid::new_v4();
    let mut state = WorkflowState::new_request(None, None, None);

    state.allocate(as_worker(first), day_one()).unwrap();
    state
        .worker_respond(
            first,
            ResponseDecision::Reject,
            Some("on leave next week".into()),
            None,
            day_one() + Duration::hours(1),
        )
        .unwrap();
    assert_eq!(state.allocation_status, AllocationStatus::Rejected);

    state
        .allocate(as_worker(second), day_one() + Duration::hours(4))
        .unwrap();
    assert_eq!(state.allocation_status, AllocationStatus::Allocated);
    assert_eq!(state.allocated_to, Some(second));
    assert!(state.worker_response.is_none());
    assert!(state.worker_response_reason.is_none());

    // The first worker can no longer act on it.
    assert!(state
        .worker_update_status(first, StatusUpdate::InProgress, day_one())
        .is_err());

    state
        .worker_respond(second, ResponseDecision::Accept, None, None, day_one())
        .unwrap();
    assert_eq!(state.allocation_status, AllocationStatus::Accepted);
}

#[test]
fn admin_closes_out_via_stage_moves() {
    let mut state = WorkflowState::new_request(None, None, None);

    state.update_stage(Stage::InProgress, day_one());
    let effects = state.update_stage(Stage::Repaired, day_one() + Duration::hours(6));
    assert!(!effects.scrap_equipment);
    let duration = state.duration_hours.unwrap();
    assert!((duration - 6.0).abs() < 1e-9);

    let mut scrap = WorkflowState::new_request(None, None, None);
    let effects = scrap.update_stage(Stage::Scrap, day_one());
    assert!(effects.scrap_equipment);
    assert!(scrap.is_deletable());
}
