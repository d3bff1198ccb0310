//! Backend Trait
//!
//! The evidence store, notification service and admin-action log behind the
//! manager. Every method maps to one REST endpoint; failures surface as
//! `RetentionError::Persistence`.

use async_trait::async_trait;

use crate::audit::AuditRecord;
use crate::error::RetentionResult;
use crate::notify::Notification;
use crate::types::{
    ArchiveRequest, DeletionCheck, EvidenceRecord, HoldApplication, HoldRemoval, LegalHold,
    ModificationCheck, ReleaseRequest, RetentionAssignment, RetentionPolicy,
};

/// Backend operations consumed by the lifecycle manager
#[async_trait]
pub trait RetentionBackend: Send + Sync {
    /// `GET /api/retention-policies`
    async fn list_policies(&self) -> RetentionResult<Vec<RetentionPolicy>>;

    /// `POST /api/retention-policies`
    async fn create_policy(&self, policy: &RetentionPolicy) -> RetentionResult<()>;

    /// `PUT /api/retention-policies/:id`
    async fn update_policy(&self, policy: &RetentionPolicy) -> RetentionResult<()>;

    /// `DELETE /api/retention-policies/:id`
    async fn delete_policy(&self, policy_id: &str) -> RetentionResult<()>;

    /// `GET /api/evidence/by-retention-policy/:id`
    async fn evidence_by_policy(&self, policy_id: &str) -> RetentionResult<Vec<EvidenceRecord>>;

    /// `POST /api/evidence/apply-retention-policy`
    async fn apply_retention_policy(&self, assignment: &RetentionAssignment)
        -> RetentionResult<()>;

    /// `GET /api/evidence/expiring?days=N`
    async fn expiring_evidence(&self, days_ahead: u32) -> RetentionResult<Vec<EvidenceRecord>>;

    /// `POST /api/evidence/archive`
    async fn archive_evidence(&self, request: &ArchiveRequest) -> RetentionResult<()>;

    /// `GET /api/legal-holds`
    async fn list_holds(&self) -> RetentionResult<Vec<LegalHold>>;

    /// `POST /api/legal-holds`
    async fn create_hold(&self, hold: &LegalHold) -> RetentionResult<()>;

    /// `PUT /api/legal-holds/:id`
    async fn update_hold(&self, hold: &LegalHold) -> RetentionResult<()>;

    /// `POST /api/legal-holds/:id/release`
    async fn release_hold(&self, hold_id: &str, request: &ReleaseRequest) -> RetentionResult<()>;

    /// `POST /api/evidence/apply-legal-hold`
    async fn apply_legal_hold(&self, application: &HoldApplication) -> RetentionResult<()>;

    /// `POST /api/evidence/remove-legal-hold`
    async fn remove_legal_hold(&self, removal: &HoldRemoval) -> RetentionResult<()>;

    /// `GET /api/evidence/:id/deletion-check`
    async fn deletion_check(&self, evidence_id: &str) -> RetentionResult<DeletionCheck>;

    /// `GET /api/evidence/:id/modification-check`
    async fn modification_check(&self, evidence_id: &str) -> RetentionResult<ModificationCheck>;

    /// `POST /api/notifications/bulk-create`
    async fn create_notifications(&self, notifications: &[Notification]) -> RetentionResult<()>;

    /// `POST /api/admin-actions/log`
    async fn log_admin_action(&self, record: &AuditRecord) -> RetentionResult<()>;
}
