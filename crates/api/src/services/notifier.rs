//! Email-backed delivery channel for workflow notifications.

use domain::services::{NotificationKind, NotificationResult, Notifier, Recipient, WorkflowNotification};

use crate::middleware::metrics::record_notification_outcome;
use crate::services::email::{EmailMessage, EmailService};

/// Delivers workflow notifications as plain-text emails.
#[derive(Clone)]
pub struct EmailNotifier {
    email: EmailService,
}

impl EmailNotifier {
    pub fn new(email: EmailService) -> Self {
        Self { email }
    }

    fn subject(notification: &WorkflowNotification) -> String {
        match notification.kind {
            NotificationKind::WorkAllocated => format!(
                "[{}] Maintenance work allocated to you: {}",
                notification.request_name, notification.request_subject
            ),
            NotificationKind::WorkerResponded => format!(
                "[{}] Worker responded: {}",
                notification.request_name, notification.request_subject
            ),
            NotificationKind::DeadlineDecision => format!(
                "[{}] Deadline decision: {}",
                notification.request_name, notification.request_subject
            ),
        }
    }

    fn body(recipient: &Recipient, notification: &WorkflowNotification) -> String {
        let greeting = recipient
            .full_name
            .as_deref()
            .map(|n| format!("Hi {},", n))
            .unwrap_or_else(|| "Hi,".to_string());

        let lead = match notification.kind {
            NotificationKind::WorkAllocated => {
                "A maintenance request has been allocated to you."
            }
            NotificationKind::WorkerResponded => {
                "A worker has responded to a maintenance request."
            }
            NotificationKind::DeadlineDecision => {
                "An admin has decided on a proposed deadline."
            }
        };

        let mut body = format!(
            "{greeting}\n\n{lead}\n\nRequest: {} - {}\n",
            notification.request_name, notification.request_subject,
        );
        if let Some(detail) = &notification.detail {
            body.push_str(&format!("Details: {}\n", detail));
        }
        body.push_str("\nBest regards,\nThe GearGuard Team\n");
        body
    }
}

#[async_trait::async_trait]
impl Notifier for EmailNotifier {
    async fn notify(
        &self,
        recipient: &Recipient,
        notification: &WorkflowNotification,
    ) -> NotificationResult {
        if !self.email.is_enabled() {
            record_notification_outcome("skipped");
            return NotificationResult::Skipped;
        }

        let message = EmailMessage {
            to: recipient.email.clone(),
            to_name: recipient.full_name.clone(),
            subject: Self::subject(notification),
            body_text: Self::body(recipient, notification),
        };

        match self.email.send(message).await {
            Ok(()) => {
                record_notification_outcome("sent");
                NotificationResult::Sent
            }
            Err(e) => {
                record_notification_outcome("failed");
                NotificationResult::Failed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EmailConfig;
    use chrono::Utc;
    use uuid::Uuid;

    fn recipient(name: Option<&str>) -> Recipient {
        Recipient {
            user_id: Uuid::new_v4(),
            email: "worker@example.com".to_string(),
            full_name: name.map(|s| s.to_string()),
        }
    }

    fn notification(kind: NotificationKind, detail: Option<&str>) -> WorkflowNotification {
        WorkflowNotification {
            kind,
            request_id: Uuid::new_v4(),
            request_name: "MR00007".to_string(),
            request_subject: "Spindle vibration".to_string(),
            detail: detail.map(|s| s.to_string()),
            occurred_at: Utc::now(),
        }
    }

    #[test]
    fn test_subject_includes_request_name() {
        let n = notification(NotificationKind::WorkAllocated, None);
        let subject = EmailNotifier::subject(&n);
        assert!(subject.contains("MR00007"));
        assert!(subject.contains("Spindle vibration"));
    }

    #[test]
    fn test_body_includes_detail_when_present() {
        let n = notification(NotificationKind::WorkerResponded, Some("rejected: no parts"));
        let body = EmailNotifier::body(&recipient(Some("Anna")), &n);
        assert!(body.contains("Hi Anna,"));
        assert!(body.contains("rejected: no parts"));
    }

    #[test]
    fn test_body_without_name_or_detail() {
        let n = notification(NotificationKind::DeadlineDecision, None);
        let body = EmailNotifier::body(&recipient(None), &n);
        assert!(body.starts_with("Hi,"));
        assert!(!body.contains("Details:"));
    }

    #[tokio::test]
    async fn test_notify_skipped_when_email_disabled() {
        let notifier = EmailNotifier::new(EmailService::new(EmailConfig::default()));
        let result = notifier
            .notify(
                &recipient(None),
                &notification(NotificationKind::WorkAllocated, None),
            )
            .await;
        assert_eq!(result, NotificationResult::Skipped);
    }

    #[tokio::test]
    async fn test_notify_sent_via_console_provider() {
        let config = EmailConfig {
            enabled: true,
            provider: "console".to_string(),
            ..EmailConfig::default()
        };
        let notifier = EmailNotifier::new(EmailService::new(config));
        let result = notifier
            .notify(
                &recipient(Some("Anna")),
                &notification(NotificationKind::WorkerResponded, Some("accepted")),
            )
            .await;
        assert_eq!(result, NotificationResult::Sent);
    }
}
