//! Deletion Guard
//!
//! Advisory checks against the live backend status of an evidence item.
//! A legal hold always wins over retention.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::backend::RetentionBackend;
use crate::error::RetentionResult;
use crate::types::{DeletionCheck, ModificationCheck};

/// Guard verdict
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "verdict")]
pub enum GuardVerdict {
    Permitted,
    #[serde(rename_all = "camelCase")]
    BlockedByLegalHold {
        hold_id: Option<String>,
        reason: String,
    },
    #[serde(rename_all = "camelCase")]
    BlockedByRetention {
        expiry_date: Option<DateTime<Utc>>,
        policy: Option<Value>,
    },
}

impl GuardVerdict {
    pub fn is_permitted(&self) -> bool {
        matches!(self, GuardVerdict::Permitted)
    }

    /// Human-readable reason, if blocked
    pub fn reason(&self) -> Option<String> {
        match self {
            GuardVerdict::Permitted => None,
            GuardVerdict::BlockedByLegalHold { reason, .. } => Some(reason.clone()),
            GuardVerdict::BlockedByRetention { expiry_date, .. } => Some(match expiry_date {
                Some(date) => format!(
                    "Evidence is under active retention until {}",
                    date.format("%Y-%m-%d")
                ),
                None => "Evidence is under active retention".to_string(),
            }),
        }
    }
}

fn hold_verdict(hold_id: Option<String>, reason: Option<String>) -> GuardVerdict {
    GuardVerdict::BlockedByLegalHold {
        hold_id,
        reason: reason.unwrap_or_else(|| "Evidence is under legal hold".to_string()),
    }
}

/// Derive the deletion verdict from a status report
pub fn deletion_verdict(check: DeletionCheck) -> GuardVerdict {
    if check.has_legal_hold {
        return hold_verdict(check.legal_hold_id, check.legal_hold_reason);
    }
    if check.has_active_retention && !check.retention_expired {
        return GuardVerdict::BlockedByRetention {
            expiry_date: check.expiry_date,
            policy: check.retention_policy,
        };
    }
    GuardVerdict::Permitted
}

/// Derive the modification verdict from a status report
pub fn modification_verdict(check: ModificationCheck) -> GuardVerdict {
    if check.has_legal_hold {
        return hold_verdict(check.legal_hold_id, check.legal_hold_reason);
    }
    GuardVerdict::Permitted
}

/// Deletion and modification guard
pub struct DeletionGuard {
    backend: Arc<dyn RetentionBackend>,
}

impl DeletionGuard {
    pub fn new(backend: Arc<dyn RetentionBackend>) -> Self {
        Self { backend }
    }

    /// Whether an evidence item may be deleted
    pub async fn can_delete(&self, evidence_id: &str) -> RetentionResult<GuardVerdict> {
        let check = self.backend.deletion_check(evidence_id).await?;
        let verdict = deletion_verdict(check);
        debug!(evidence_id = %evidence_id, permitted = verdict.is_permitted(), "Deletion check");
        Ok(verdict)
    }

    /// Whether an evidence item may be modified
    pub async fn can_modify(&self, evidence_id: &str) -> RetentionResult<GuardVerdict> {
        let check = self.backend.modification_check(evidence_id).await?;
        let verdict = modification_verdict(check);
        debug!(evidence_id = %evidence_id, permitted = verdict.is_permitted(), "Modification check");
        Ok(verdict)
    }
}
