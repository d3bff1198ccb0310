//! Retention Policy Records
//!
//! A retention policy assigns a storage duration, jurisdiction and legal
//! basis to a class of evidence.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::{RetentionError, RetentionResult};

/// Hard cap on retention duration (100 years)
pub const MAX_RETENTION_DAYS: u32 = 365 * 100;

/// Retention policy record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetentionPolicy {
    /// Policy ID (`RP-<millis>`)
    pub id: String,
    /// Display name
    pub name: String,
    /// Evidence types the policy covers
    #[serde(default)]
    pub evidence_types: BTreeSet<String>,
    /// Retention period in days
    pub retention_days: u32,
    /// Jurisdiction
    #[serde(default)]
    pub jurisdiction: String,
    /// Legal basis
    #[serde(default)]
    pub legal_basis: String,
    /// Archive automatically once expired
    #[serde(default)]
    pub auto_archive: bool,
    /// Creator
    pub created_by: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Active flag
    pub is_active: bool,
    /// Last updater
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    /// Last update timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Input for creating a policy
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyDraft {
    pub name: String,
    #[serde(default)]
    pub evidence_types: BTreeSet<String>,
    /// Checked by [`validate_retention_days`]
    pub retention_days: i64,
    #[serde(default)]
    pub jurisdiction: String,
    #[serde(default)]
    pub legal_basis: String,
    #[serde(default)]
    pub auto_archive: bool,
}

/// Partial update to a policy. The id is not part of the update and
/// therefore cannot change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence_types: Option<BTreeSet<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retention_days: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jurisdiction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal_basis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_archive: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl PolicyUpdate {
    /// Whether the update changes nothing
    pub fn is_empty(&self) -> bool {
        *self == PolicyUpdate::default()
    }
}

/// Validate a retention period
pub fn validate_retention_days(days: i64) -> RetentionResult<u32> {
    if days <= 0 {
        return Err(RetentionError::validation(format!(
            "retentionDays must be a positive integer, got {}",
            days
        )));
    }
    if days > i64::from(MAX_RETENTION_DAYS) {
        return Err(RetentionError::validation(format!(
            "retentionDays must not exceed {}, got {}",
            MAX_RETENTION_DAYS, days
        )));
    }
    Ok(days as u32)
}

fn validate_name(name: &str) -> RetentionResult<()> {
    if name.trim().is_empty() {
        return Err(RetentionError::validation("policy name must not be empty"));
    }
    Ok(())
}

impl RetentionPolicy {
    /// Build a new active policy from a draft
    pub fn from_draft(
        id: String,
        draft: PolicyDraft,
        created_by: &str,
        now: DateTime<Utc>,
    ) -> RetentionResult<Self> {
        validate_name(&draft.name)?;
        let retention_days = validate_retention_days(draft.retention_days)?;

        Ok(Self {
            id,
            name: draft.name,
            evidence_types: draft.evidence_types,
            retention_days,
            jurisdiction: draft.jurisdiction,
            legal_basis: draft.legal_basis,
            auto_archive: draft.auto_archive,
            created_by: created_by.to_string(),
            created_at: now,
            is_active: true,
            updated_by: None,
            updated_at: None,
        })
    }

    /// Produce the merged record for an update, stamped with the updater
    pub fn merged(
        &self,
        update: &PolicyUpdate,
        updated_by: &str,
        now: DateTime<Utc>,
    ) -> RetentionResult<Self> {
        let mut merged = self.clone();

        if let Some(name) = &update.name {
            validate_name(name)?;
            merged.name = name.clone();
        }
        if let Some(days) = update.retention_days {
            merged.retention_days = validate_retention_days(days)?;
        }
        if let Some(types) = &update.evidence_types {
            merged.evidence_types = types.clone();
        }
        if let Some(jurisdiction) = &update.jurisdiction {
            merged.jurisdiction = jurisdiction.clone();
        }
        if let Some(legal_basis) = &update.legal_basis {
            merged.legal_basis = legal_basis.clone();
        }
        if let Some(auto_archive) = update.auto_archive {
            merged.auto_archive = auto_archive;
        }
        if let Some(is_active) = update.is_active {
            merged.is_active = is_active;
        }

        merged.updated_by = Some(updated_by.to_string());
        merged.updated_at = Some(now);

        Ok(merged)
    }

    /// Expiry date for evidence assigned to this policy at `assigned_at`
    pub fn expiry_from(&self, assigned_at: DateTime<Utc>) -> DateTime<Utc> {
        assigned_at + Duration::days(i64::from(self.retention_days))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(days: i64) -> PolicyDraft {
        PolicyDraft {
            name: "Case Files 1yr".to_string(),
            evidence_types: ["photo", "document"].iter().map(|s| s.to_string()).collect(),
            retention_days: days,
            jurisdiction: "US-CA".to_string(),
            legal_basis: "Evidence Code 1500".to_string(),
            auto_archive: false,
        }
    }

    #[test]
    fn test_from_draft_preserves_fields() {
        let now = Utc::now();
        let policy =
            RetentionPolicy::from_draft("RP-1".to_string(), draft(365), "0xabc", now).unwrap();

        assert_eq!(policy.name, "Case Files 1yr");
        assert_eq!(policy.retention_days, 365);
        assert!(policy.evidence_types.contains("photo"));
        assert!(policy.evidence_types.contains("document"));
        assert!(policy.is_active);
        assert!(!policy.auto_archive);
        assert_eq!(policy.created_by, "0xabc");
        assert!(policy.updated_at.is_none());
    }

    #[test]
    fn test_non_positive_retention_rejected() {
        for days in [0, -1, -365] {
            let err = RetentionPolicy::from_draft("RP-1".to_string(), draft(days), "a", Utc::now())
                .unwrap_err();
            assert!(matches!(err, RetentionError::Validation(_)));
        }
    }

    #[test]
    fn test_retention_cap() {
        assert!(validate_retention_days(i64::from(MAX_RETENTION_DAYS)).is_ok());
        assert!(validate_retention_days(i64::from(MAX_RETENTION_DAYS) + 1).is_err());
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut d = draft(30);
        d.name = "   ".to_string();
        assert!(RetentionPolicy::from_draft("RP-1".to_string(), d, "a", Utc::now()).is_err());
    }

    #[test]
    fn test_merge_stamps_updater() {
        let now = Utc::now();
        let policy =
            RetentionPolicy::from_draft("RP-1".to_string(), draft(365), "creator", now).unwrap();
        let update = PolicyUpdate {
            retention_days: Some(730),
            auto_archive: Some(true),
            ..Default::default()
        };

        let merged = policy.merged(&update, "editor", now).unwrap();
        assert_eq!(merged.id, "RP-1");
        assert_eq!(merged.retention_days, 730);
        assert!(merged.auto_archive);
        assert_eq!(merged.created_by, "creator");
        assert_eq!(merged.updated_by.as_deref(), Some("editor"));
        assert_eq!(merged.updated_at, Some(now));
    }

    #[test]
    fn test_merge_validates_retention() {
        let policy =
            RetentionPolicy::from_draft("RP-1".to_string(), draft(365), "a", Utc::now()).unwrap();
        let update = PolicyUpdate {
            retention_days: Some(0),
            ..Default::default()
        };
        assert!(policy.merged(&update, "b", Utc::now()).is_err());
    }

    #[test]
    fn test_expiry_from() {
        let now = Utc::now();
        let policy =
            RetentionPolicy::from_draft("RP-1".to_string(), draft(10), "a", now).unwrap();
        assert_eq!(policy.expiry_from(now) - now, Duration::days(10));
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let policy =
            RetentionPolicy::from_draft("RP-1".to_string(), draft(365), "a", Utc::now()).unwrap();
        let json = serde_json::to_value(&policy).unwrap();
        assert_eq!(json["retentionDays"], 365);
        assert_eq!(json["isActive"], true);
        assert!(json.get("updatedBy").is_none());
    }
}
