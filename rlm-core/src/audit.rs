//! Admin Action Audit Logger
//!
//! Records every successful lifecycle mutation with the admin-action log.
//! Logging is best effort: a failed write is reported through `tracing` and
//! the journal, never to the caller of the primary operation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::backend::RetentionBackend;

/// Default journal capacity
pub const DEFAULT_JOURNAL_CAPACITY: usize = 256;

/// Audited action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminAction {
    RetentionPolicyCreated,
    RetentionPolicyUpdated,
    RetentionPolicyDeleted,
    RetentionPolicyApplied,
    LegalHoldCreated,
    LegalHoldUpdated,
    LegalHoldReleased,
    EvidenceArchived,
}

impl AdminAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminAction::RetentionPolicyCreated => "retention_policy_created",
            AdminAction::RetentionPolicyUpdated => "retention_policy_updated",
            AdminAction::RetentionPolicyDeleted => "retention_policy_deleted",
            AdminAction::RetentionPolicyApplied => "retention_policy_applied",
            AdminAction::LegalHoldCreated => "legal_hold_created",
            AdminAction::LegalHoldUpdated => "legal_hold_updated",
            AdminAction::LegalHoldReleased => "legal_hold_released",
            AdminAction::EvidenceArchived => "evidence_archived",
        }
    }
}

impl fmt::Display for AdminAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Admin-action log record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    /// Acting wallet / user id
    pub admin_wallet: String,
    pub action: AdminAction,
    pub target_id: Option<String>,
    pub details: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

/// Journal entry: the record and whether the backend accepted it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub record: AuditRecord,
    pub recorded: bool,
}

/// Audit logger
pub struct AuditLogger {
    backend: Arc<dyn RetentionBackend>,
    actor_id: String,
    /// Most recent records, oldest first
    journal: RwLock<VecDeque<JournalEntry>>,
    capacity: usize,
}

impl AuditLogger {
    pub fn new(backend: Arc<dyn RetentionBackend>, actor_id: impl Into<String>) -> Self {
        Self::with_capacity(backend, actor_id, DEFAULT_JOURNAL_CAPACITY)
    }

    pub fn with_capacity(
        backend: Arc<dyn RetentionBackend>,
        actor_id: impl Into<String>,
        capacity: usize,
    ) -> Self {
        Self {
            backend,
            actor_id: actor_id.into(),
            journal: RwLock::new(VecDeque::with_capacity(capacity.min(1024))),
            capacity: capacity.max(1),
        }
    }

    /// Log an action. Returns whether the backend accepted the record.
    pub async fn log(
        &self,
        action: AdminAction,
        target_id: Option<&str>,
        details: serde_json::Value,
    ) -> bool {
        let record = AuditRecord {
            admin_wallet: self.actor_id.clone(),
            action,
            target_id: target_id.map(str::to_string),
            details,
            timestamp: Utc::now(),
        };

        let recorded = match self.backend.log_admin_action(&record).await {
            Ok(()) => {
                debug!(action = %action, target = ?target_id, "Admin action logged");
                true
            }
            Err(e) => {
                warn!(action = %action, target = ?target_id, error = %e, "Failed to log admin action");
                false
            }
        };

        let mut journal = self.journal.write().await;
        while journal.len() >= self.capacity {
            journal.pop_front();
        }
        journal.push_back(JournalEntry { record, recorded });

        recorded
    }

    /// Most recent journal entries, oldest first
    pub async fn recent(&self) -> Vec<JournalEntry> {
        self.journal.read().await.iter().cloned().collect()
    }

    /// Journal entries the backend did not accept
    pub async fn unrecorded(&self) -> Vec<JournalEntry> {
        self.journal
            .read()
            .await
            .iter()
            .filter(|entry| !entry.recorded)
            .cloned()
            .collect()
    }
}
