//! Domain services for GearGuard.
//!
//! Services contain business logic that operates on domain models.

pub mod allocation;
pub mod notification;

pub use allocation::{AllocationTarget, StageEffects, WorkflowError, WorkflowState};

pub use notification::{
    fan_out, MockNotifier, NotificationKind, NotificationResult, Notifier, Recipient,
    WorkflowNotification,
};
