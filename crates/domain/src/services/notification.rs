//! Workflow notification fan-out.
//!
//! State transitions commit first; notifications are fired afterwards and are
//! best-effort. A failed send is captured as a [`NotificationResult`] value
//! and logged, never surfaced as an error to the transition's caller. There
//! is no retry and no queue: at-most-once delivery.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of workflow event being announced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    WorkAllocated,
    WorkerResponded,
    DeadlineDecision,
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationKind::WorkAllocated => write!(f, "work_allocated"),
            NotificationKind::WorkerResponded => write!(f, "worker_responded"),
            NotificationKind::DeadlineDecision => write!(f, "deadline_decision"),
        }
    }
}

/// A resolved notification recipient.
///
/// Recipient lists are resolved at call time (the allocated worker, or every
/// admin account) so the fan-out is enumerable and mockable in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    pub user_id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
}

/// Payload describing a workflow event.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct WorkflowNotification {
    pub kind: NotificationKind,
    pub request_id: Uuid,
    pub request_name: String,
    pub request_subject: String,
    /// Event-specific detail: the worker's decision, the admin's verdict, ...
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Outcome of a single delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationResult {
    /// Delivered to the underlying channel.
    Sent,
    /// Delivery failed; the failure was logged and swallowed.
    Failed(String),
    /// Delivery was not attempted (e.g. channel disabled).
    Skipped,
}

/// Channel abstraction for delivering workflow notifications.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(
        &self,
        recipient: &Recipient,
        notification: &WorkflowNotification,
    ) -> NotificationResult;
}

/// Delivers a notification to each recipient independently.
///
/// One recipient's failure does not block the others. Failures are logged
/// here; callers get the per-recipient outcomes back for observability only.
pub async fn fan_out(
    notifier: &dyn Notifier,
    recipients: &[Recipient],
    notification: &WorkflowNotification,
) -> Vec<(Uuid, NotificationResult)> {
    let mut outcomes = Vec::with_capacity(recipients.len());
    for recipient in recipients {
        let result = notifier.notify(recipient, notification).await;
        if let NotificationResult::Failed(reason) = &result {
            tracing::error!(
                kind = %notification.kind,
                request = %notification.request_name,
                recipient = %recipient.email,
                reason = %reason,
                "Failed to deliver workflow notification"
            );
        }
        outcomes.push((recipient.user_id, result));
    }
    outcomes
}

/// In-memory notifier for tests: records deliveries, optionally fails.
#[derive(Debug, Default)]
pub struct MockNotifier {
    pub simulate_failure: bool,
    pub delivered: std::sync::Mutex<Vec<(Recipient, NotificationKind)>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
            delivered: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl Notifier for MockNotifier {
    async fn notify(
        &self,
        recipient: &Recipient,
        notification: &WorkflowNotification,
    ) -> NotificationResult {
        if self.simulate_failure {
            return NotificationResult::Failed("simulated failure".to_string());
        }
        self.delivered
            .lock()
            .expect("mock notifier lock poisoned")
            .push((recipient.clone(), notification.kind));
        NotificationResult::Sent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipient(email: &str) -> Recipient {
        Recipient {
            user_id: Uuid::new_v4(),
            email: email.to_string(),
            full_name: None,
        }
    }

    fn notification(kind: NotificationKind) -> WorkflowNotification {
        WorkflowNotification {
            kind,
            request_id: Uuid::new_v4(),
            request_name: "MR00042".to_string(),
            request_subject: "Hydraulic leak".to_string(),
            detail: Some("accepted".to_string()),
            occurred_at: Utc::now(),
        }
    }

    #[test]
    fn test_notification_kind_display() {
        assert_eq!(NotificationKind::WorkAllocated.to_string(), "work_allocated");
        assert_eq!(NotificationKind::WorkerResponded.to_string(), "worker_responded");
        assert_eq!(NotificationKind::DeadlineDecision.to_string(), "deadline_decision");
    }

    #[tokio::test]
    async fn test_fan_out_delivers_to_each_recipient() {
        let notifier = MockNotifier::new();
        let recipients = vec![recipient("a@example.com"), recipient("b@example.com")];

        let outcomes = fan_out(
            &notifier,
            &recipients,
            &notification(NotificationKind::WorkerResponded),
        )
        .await;

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|(_, r)| *r == NotificationResult::Sent));
        assert_eq!(notifier.delivered.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_fan_out_failures_do_not_block_or_raise() {
        let notifier = MockNotifier::failing();
        let recipients = vec![recipient("a@example.com"), recipient("b@example.com")];

        let outcomes = fan_out(
            &notifier,
            &recipients,
            &notification(NotificationKind::WorkAllocated),
        )
        .await;

        // Every recipient is attempted; failures come back as values.
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes
            .iter()
            .all(|(_, r)| matches!(r, NotificationResult::Failed(_))));
    }

    #[tokio::test]
    async fn test_fan_out_empty_recipient_list() {
        let notifier = MockNotifier::new();
        let outcomes = fan_out(
            &notifier,
            &[],
            &notification(NotificationKind::DeadlineDecision),
        )
        .await;
        assert!(outcomes.is_empty());
    }
}
