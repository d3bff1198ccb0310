//! Evidence Archiver
//!
//! Moves evidence to archival storage. Shared by user-initiated archival
//! and the expiry scheduler, so both serialize on the same evidence locks.

use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use crate::access::{AccessGate, AccessLevel};
use crate::audit::{AdminAction, AuditLogger};
use crate::backend::RetentionBackend;
use crate::error::{RetentionError, RetentionResult};
use crate::locks::{evidence_key, EntityLocks};
use crate::types::ArchiveRequest;

/// Evidence archiver
pub struct EvidenceArchiver {
    backend: Arc<dyn RetentionBackend>,
    gate: Arc<AccessGate>,
    audit: Arc<AuditLogger>,
    locks: Arc<EntityLocks>,
}

impl EvidenceArchiver {
    pub fn new(
        backend: Arc<dyn RetentionBackend>,
        gate: Arc<AccessGate>,
        audit: Arc<AuditLogger>,
        locks: Arc<EntityLocks>,
    ) -> Self {
        Self {
            backend,
            gate,
            audit,
            locks,
        }
    }

    /// Archive evidence to `archive_location`
    pub async fn archive(
        &self,
        evidence_ids: &[String],
        archive_location: &str,
    ) -> RetentionResult<ArchiveRequest> {
        self.gate.require(AccessLevel::Admin, "archive evidence")?;

        if evidence_ids.is_empty() {
            return Err(RetentionError::validation(
                "at least one evidence id is required",
            ));
        }
        if archive_location.trim().is_empty() {
            return Err(RetentionError::validation(
                "archive location must not be empty",
            ));
        }

        let keys: Vec<String> = evidence_ids.iter().map(|id| evidence_key(id)).collect();
        let _guards = self.locks.lock_many(keys.iter().map(String::as_str)).await;

        let request = ArchiveRequest {
            evidence_ids: evidence_ids.to_vec(),
            archive_location: archive_location.to_string(),
            archived_by: self.gate.actor().id.clone(),
            archive_date: Utc::now(),
        };

        self.backend.archive_evidence(&request).await.map_err(|e| {
            warn!(evidence_count = evidence_ids.len(), error = %e, "Failed to archive evidence");
            e
        })?;

        info!(
            evidence_count = evidence_ids.len(),
            location = %archive_location,
            "Evidence archived"
        );

        self.audit
            .log(
                AdminAction::EvidenceArchived,
                None,
                serde_json::json!({
                    "evidenceIds": request.evidence_ids,
                    "archiveLocation": request.archive_location,
                }),
            )
            .await;

        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{BackendCall, Endpoint, RecordingBackend};
    use crate::types::{Actor, Role};

    fn archiver_for(backend: &Arc<RecordingBackend>, role: Role) -> EvidenceArchiver {
        let actor = Actor::new("0xadmin", role);
        EvidenceArchiver::new(
            backend.clone(),
            Arc::new(AccessGate::new(actor.clone())),
            Arc::new(AuditLogger::new(backend.clone(), actor.id)),
            Arc::new(EntityLocks::new()),
        )
    }

    #[tokio::test]
    async fn test_archive_posts_and_audits() {
        let backend = Arc::new(RecordingBackend::new());
        let archiver = archiver_for(&backend, Role::Admin);
        let ids = vec!["EV-1".to_string(), "EV-2".to_string()];

        let request = archiver.archive(&ids, "cold-storage").await.unwrap();

        assert_eq!(request.archived_by, "0xadmin");
        assert_eq!(
            backend.calls_to(Endpoint::ArchiveEvidence).await,
            vec![BackendCall::ArchiveEvidence(request.clone())]
        );
        let audit = backend.audit_records().await;
        assert_eq!(audit[0].action, AdminAction::EvidenceArchived);
        assert!(audit[0].target_id.is_none());
        assert_eq!(audit[0].details["archiveLocation"], "cold-storage");
    }

    #[tokio::test]
    async fn test_archive_requires_admin() {
        let backend = Arc::new(RecordingBackend::new());
        let archiver = archiver_for(&backend, Role::EvidenceManager);

        let err = archiver
            .archive(&["EV-1".to_string()], "cold-storage")
            .await
            .unwrap_err();
        assert!(matches!(err, RetentionError::Authorization { .. }));
        assert!(backend.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_archive_validates_input() {
        let backend = Arc::new(RecordingBackend::new());
        let archiver = archiver_for(&backend, Role::Admin);

        assert!(matches!(
            archiver.archive(&[], "cold-storage").await,
            Err(RetentionError::Validation(_))
        ));
        assert!(matches!(
            archiver.archive(&["EV-1".to_string()], " ").await,
            Err(RetentionError::Validation(_))
        ));
        assert!(backend.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_archive_failure_skips_audit() {
        let backend = Arc::new(RecordingBackend::new());
        backend.fail(Endpoint::ArchiveEvidence).await;
        let archiver = archiver_for(&backend, Role::Admin);

        let err = archiver
            .archive(&["EV-1".to_string()], "cold-storage")
            .await
            .unwrap_err();
        assert!(matches!(err, RetentionError::Persistence { .. }));
        assert!(backend.audit_records().await.is_empty());
    }
}
