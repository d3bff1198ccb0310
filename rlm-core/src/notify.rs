//! Notification Dispatcher
//!
//! Best-effort bulk notifications to stakeholders. Delivery problems are
//! reported as a [`DeliveryStatus`], never as an error.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::backend::RetentionBackend;
use crate::types::{EvidenceRecord, LegalHold};

/// Notification category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    #[default]
    General,
    LegalHold,
    RetentionExpiry,
}

/// A single notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub recipient: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub data: Value,
}

/// Outcome of a dispatch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "detail")]
pub enum DeliveryStatus {
    /// Accepted by the notification service
    Delivered(usize),
    /// Nothing to send
    Skipped,
    /// Notification service rejected the batch
    Failed(String),
}

impl DeliveryStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, DeliveryStatus::Failed(_))
    }
}

/// Legal hold lifecycle event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldEvent {
    Created,
    Released,
}

impl HoldEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            HoldEvent::Created => "created",
            HoldEvent::Released => "released",
        }
    }

    fn title(&self) -> &'static str {
        match self {
            HoldEvent::Created => "Legal Hold Created",
            HoldEvent::Released => "Legal Hold Released",
        }
    }
}

const HOLD_TEMPLATE: &str = "Legal hold for case {caseId} has been {action}. Reason: {reason}";

/// Substitute `{key}` placeholders with values from a metadata object.
/// Unknown placeholders are left as written.
pub fn render(template: &str, metadata: &Value) -> String {
    let mut rendered = template.to_string();
    if let Some(fields) = metadata.as_object() {
        for (key, value) in fields {
            let text = match value {
                Value::String(s) => s.clone(),
                Value::Null => String::new(),
                other => other.to_string(),
            };
            rendered = rendered.replace(&format!("{{{}}}", key), &text);
        }
    }
    rendered
}

/// Notification dispatcher
pub struct NotificationDispatcher {
    backend: Arc<dyn RetentionBackend>,
}

impl NotificationDispatcher {
    pub fn new(backend: Arc<dyn RetentionBackend>) -> Self {
        Self { backend }
    }

    /// Send one notification per recipient
    pub async fn notify(
        &self,
        recipients: &[String],
        subject: &str,
        body_template: &str,
        metadata: &Value,
    ) -> DeliveryStatus {
        self.notify_as(
            NotificationKind::General,
            recipients,
            subject,
            body_template,
            metadata,
        )
        .await
    }

    /// Send one notification of the given kind per recipient
    pub async fn notify_as(
        &self,
        kind: NotificationKind,
        recipients: &[String],
        subject: &str,
        body_template: &str,
        metadata: &Value,
    ) -> DeliveryStatus {
        let message = render(body_template, metadata);
        let notifications: Vec<Notification> = recipients
            .iter()
            .map(|recipient| Notification {
                recipient: recipient.clone(),
                title: subject.to_string(),
                message: message.clone(),
                kind,
                data: metadata.clone(),
            })
            .collect();

        self.dispatch(notifications).await
    }

    /// Notify hold stakeholders of a lifecycle event
    pub async fn notify_hold_event(&self, hold: &LegalHold, event: HoldEvent) -> DeliveryStatus {
        let metadata = serde_json::json!({
            "legalHoldId": hold.id,
            "caseId": hold.case_id,
            "action": event.as_str(),
            "reason": hold.reason,
        });

        self.notify_as(
            NotificationKind::LegalHold,
            &hold.notifications.stakeholders,
            event.title(),
            HOLD_TEMPLATE,
            &metadata,
        )
        .await
    }

    /// Warn submitters that their evidence is about to expire.
    /// Records without a submitter are skipped.
    pub async fn notify_retention_expiry(&self, records: &[EvidenceRecord]) -> DeliveryStatus {
        let notifications: Vec<Notification> = records
            .iter()
            .filter_map(|record| {
                let recipient = record.submitted_by.clone()?;
                let title = record.title.as_deref().unwrap_or(&record.id);
                let expires = record
                    .expiry_date
                    .map(|date| date.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| "an unscheduled date".to_string());

                Some(Notification {
                    recipient,
                    title: "Evidence Retention Expiring".to_string(),
                    message: format!("Evidence \"{}\" will expire on {}", title, expires),
                    kind: NotificationKind::RetentionExpiry,
                    data: serde_json::json!({
                        "evidenceId": record.id,
                        "expiryDate": record.expiry_date,
                    }),
                })
            })
            .collect();

        self.dispatch(notifications).await
    }

    async fn dispatch(&self, notifications: Vec<Notification>) -> DeliveryStatus {
        if notifications.is_empty() {
            return DeliveryStatus::Skipped;
        }

        let count = notifications.len();
        match self.backend.create_notifications(&notifications).await {
            Ok(()) => {
                debug!(count = count, "Notifications sent");
                DeliveryStatus::Delivered(count)
            }
            Err(e) => {
                warn!(count = count, error = %e, "Failed to send notifications");
                DeliveryStatus::Failed(e.to_string())
            }
        }
    }
}
