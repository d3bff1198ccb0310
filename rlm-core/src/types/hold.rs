//! Legal Hold Records
//!
//! A legal hold suspends deletion and modification of the evidence it
//! covers. Released holds are terminal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::{RetentionError, RetentionResult};

/// Stakeholder reminder frequency
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationFrequency {
    Daily,
    #[default]
    Weekly,
    Monthly,
}

impl fmt::Display for NotificationFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationFrequency::Daily => write!(f, "daily"),
            NotificationFrequency::Weekly => write!(f, "weekly"),
            NotificationFrequency::Monthly => write!(f, "monthly"),
        }
    }
}

impl FromStr for NotificationFrequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            other => Err(format!("unknown notification frequency: {}", other)),
        }
    }
}

/// Notification settings of a hold
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldNotifications {
    /// Recipient ids
    #[serde(default)]
    pub stakeholders: Vec<String>,
    /// Reminder frequency
    #[serde(default)]
    pub frequency: NotificationFrequency,
}

/// Legal hold record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegalHold {
    /// Hold ID (`LH-<millis>`)
    pub id: String,
    /// Case reference
    pub case_id: String,
    /// Reason for the hold
    pub reason: String,
    /// Legal basis
    #[serde(default)]
    pub legal_basis: String,
    /// Court order reference
    #[serde(default)]
    pub court_order: Option<String>,
    /// Covered evidence ids
    #[serde(default)]
    pub evidence_ids: BTreeSet<String>,
    /// Hold start
    pub start_date: DateTime<Utc>,
    /// Hold end (set on release, or planned end)
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    /// Creator
    pub created_by: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// False once released
    pub is_active: bool,
    /// Stakeholder notifications
    #[serde(default)]
    pub notifications: HoldNotifications,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub released_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub released_at: Option<DateTime<Utc>>,
}

/// Input for creating a hold
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegalHoldDraft {
    pub case_id: String,
    pub reason: String,
    #[serde(default)]
    pub legal_basis: String,
    #[serde(default)]
    pub court_order: Option<String>,
    #[serde(default)]
    pub evidence_ids: BTreeSet<String>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub stakeholders: Vec<String>,
    /// Defaults to weekly
    #[serde(default)]
    pub notification_frequency: Option<NotificationFrequency>,
}

/// Partial update to an active hold
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegalHoldUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal_basis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub court_order: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence_ids: Option<BTreeSet<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stakeholders: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_frequency: Option<NotificationFrequency>,
}

/// Evidence ids dropped from and added to a hold
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvidenceDelta {
    pub removed: BTreeSet<String>,
    pub added: BTreeSet<String>,
}

impl EvidenceDelta {
    pub fn between(old: &BTreeSet<String>, new: &BTreeSet<String>) -> Self {
        Self {
            removed: old.difference(new).cloned().collect(),
            added: new.difference(old).cloned().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty()
    }
}

fn require_text(field: &str, value: &str) -> RetentionResult<()> {
    if value.trim().is_empty() {
        return Err(RetentionError::validation(format!(
            "{} must not be empty",
            field
        )));
    }
    Ok(())
}

impl LegalHold {
    /// Build a new active hold from a draft
    pub fn from_draft(
        id: String,
        draft: LegalHoldDraft,
        created_by: &str,
        now: DateTime<Utc>,
    ) -> RetentionResult<Self> {
        require_text("caseId", &draft.case_id)?;
        require_text("reason", &draft.reason)?;

        Ok(Self {
            id,
            case_id: draft.case_id,
            reason: draft.reason,
            legal_basis: draft.legal_basis,
            court_order: draft.court_order,
            evidence_ids: draft.evidence_ids,
            start_date: now,
            end_date: draft.end_date,
            created_by: created_by.to_string(),
            created_at: now,
            is_active: true,
            notifications: HoldNotifications {
                stakeholders: draft.stakeholders,
                frequency: draft.notification_frequency.unwrap_or_default(),
            },
            updated_by: None,
            updated_at: None,
            release_reason: None,
            released_by: None,
            released_at: None,
        })
    }

    fn ensure_active(&self) -> RetentionResult<()> {
        if !self.is_active {
            return Err(RetentionError::AlreadyReleased(self.id.clone()));
        }
        Ok(())
    }

    /// Produce the merged record for an update
    pub fn merged(
        &self,
        update: &LegalHoldUpdate,
        updated_by: &str,
        now: DateTime<Utc>,
    ) -> RetentionResult<Self> {
        self.ensure_active()?;
        let mut merged = self.clone();

        if let Some(reason) = &update.reason {
            require_text("reason", reason)?;
            merged.reason = reason.clone();
        }
        if let Some(legal_basis) = &update.legal_basis {
            merged.legal_basis = legal_basis.clone();
        }
        if let Some(court_order) = &update.court_order {
            merged.court_order = Some(court_order.clone());
        }
        if let Some(evidence_ids) = &update.evidence_ids {
            merged.evidence_ids = evidence_ids.clone();
        }
        if let Some(end_date) = update.end_date {
            merged.end_date = Some(end_date);
        }
        if let Some(stakeholders) = &update.stakeholders {
            merged.notifications.stakeholders = stakeholders.clone();
        }
        if let Some(frequency) = update.notification_frequency {
            merged.notifications.frequency = frequency;
        }

        merged.updated_by = Some(updated_by.to_string());
        merged.updated_at = Some(now);

        Ok(merged)
    }

    /// Produce the released record
    pub fn released(
        &self,
        reason: &str,
        released_by: &str,
        now: DateTime<Utc>,
    ) -> RetentionResult<Self> {
        self.ensure_active()?;
        require_text("releaseReason", reason)?;

        let mut released = self.clone();
        released.is_active = false;
        released.end_date = Some(now);
        released.release_reason = Some(reason.to_string());
        released.released_by = Some(released_by.to_string());
        released.released_at = Some(now);

        Ok(released)
    }

    /// Number of covered evidence items
    pub fn evidence_count(&self) -> usize {
        self.evidence_ids.len()
    }
}
