//! Evidence-side payloads exchanged with the backend

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Evidence item as reported by the backend queries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceRecord {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub submitted_by: Option<String>,
    #[serde(default)]
    pub expiry_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub retention_policy_id: Option<String>,
}

impl EvidenceRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            submitted_by: None,
            expiry_date: None,
            retention_policy_id: None,
        }
    }
}

/// Live deletion status of an evidence item
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletionCheck {
    #[serde(default)]
    pub has_legal_hold: bool,
    #[serde(default)]
    pub legal_hold_id: Option<String>,
    #[serde(default)]
    pub legal_hold_reason: Option<String>,
    #[serde(default)]
    pub has_active_retention: bool,
    #[serde(default)]
    pub retention_expired: bool,
    #[serde(default)]
    pub expiry_date: Option<DateTime<Utc>>,
    /// Policy descriptor as the backend reports it (a name or a policy object)
    #[serde(default)]
    pub retention_policy: Option<Value>,
}

/// Live modification status of an evidence item
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModificationCheck {
    #[serde(default)]
    pub has_legal_hold: bool,
    #[serde(default)]
    pub legal_hold_id: Option<String>,
    #[serde(default)]
    pub legal_hold_reason: Option<String>,
}

/// Assignment of evidence to a retention policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetentionAssignment {
    pub evidence_ids: Vec<String>,
    pub policy_id: String,
    pub expiry_date: DateTime<Utc>,
    pub applied_by: String,
}

/// Archival request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveRequest {
    pub evidence_ids: Vec<String>,
    pub archive_location: String,
    pub archived_by: String,
    pub archive_date: DateTime<Utc>,
}

/// Places a hold on evidence records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldApplication {
    pub evidence_ids: Vec<String>,
    pub hold_id: String,
    pub applied_by: String,
}

/// Lifts a hold from evidence records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldRemoval {
    pub evidence_ids: Vec<String>,
    pub hold_id: String,
    pub removed_by: String,
}

/// Body of the release endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseRequest {
    pub release_reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deletion_check_tolerates_missing_fields() {
        let check: DeletionCheck = serde_json::from_str(r#"{"hasLegalHold": true}"#).unwrap();
        assert!(check.has_legal_hold);
        assert!(!check.has_active_retention);
        assert!(check.legal_hold_id.is_none());
    }

    #[test]
    fn test_deletion_check_accepts_policy_object() {
        let json = r#"{
            "hasActiveRetention": true,
            "expiryDate": "2030-06-01T00:00:00Z",
            "retentionPolicy": {"id": "RP-1", "name": "Case Files 1yr", "retentionDays": 365}
        }"#;
        let check: DeletionCheck = serde_json::from_str(json).unwrap();
        let policy = check.retention_policy.unwrap();
        assert_eq!(policy["name"], "Case Files 1yr");

        let named: DeletionCheck =
            serde_json::from_str(r#"{"retentionPolicy": "Case Files 1yr"}"#).unwrap();
        assert_eq!(named.retention_policy, Some(Value::from("Case Files 1yr")));
    }

    #[test]
    fn test_evidence_record_ignores_unknown_fields() {
        let json = r#"{
            "id": "EV-9",
            "title": "Bodycam 3",
            "submittedBy": "0xofficer",
            "expiryDate": "2030-01-01T00:00:00Z",
            "retentionPolicyId": "RP-1",
            "sha256": "deadbeef"
        }"#;
        let record: EvidenceRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, "EV-9");
        assert_eq!(record.submitted_by.as_deref(), Some("0xofficer"));
        assert_eq!(record.retention_policy_id.as_deref(), Some("RP-1"));
    }
}
