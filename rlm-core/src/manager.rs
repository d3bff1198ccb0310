//! Retention Lifecycle Manager
//!
//! Owns every component for one session actor. There is no global
//! instance; construct one per session (or per test).

use std::sync::Arc;
use tracing::info;

use crate::access::AccessGate;
use crate::archive::EvidenceArchiver;
use crate::audit::AuditLogger;
use crate::backend::{HttpBackend, RetentionBackend};
use crate::config::ManagerConfig;
use crate::error::RetentionResult;
use crate::guard::DeletionGuard;
use crate::hold_store::LegalHoldStore;
use crate::locks::EntityLocks;
use crate::notify::NotificationDispatcher;
use crate::policy_store::PolicyStore;
use crate::scheduler::{ExpiryScheduler, SchedulerHandle};
use crate::types::{Actor, ArchiveRequest, EvidenceRecord, IdGenerator};

/// Retention lifecycle manager
pub struct RetentionLifecycleManager {
    config: ManagerConfig,
    backend: Arc<dyn RetentionBackend>,
    gate: Arc<AccessGate>,
    audit: Arc<AuditLogger>,
    notifier: Arc<NotificationDispatcher>,
    policies: Arc<PolicyStore>,
    holds: Arc<LegalHoldStore>,
    guard: DeletionGuard,
    archiver: Arc<EvidenceArchiver>,
    scheduler: Arc<ExpiryScheduler>,
}

impl RetentionLifecycleManager {
    /// Wire a manager for `actor` over `backend`
    pub fn new(actor: Actor, backend: Arc<dyn RetentionBackend>, config: ManagerConfig) -> Self {
        let gate = Arc::new(AccessGate::new(actor.clone()));
        let audit = Arc::new(AuditLogger::new(backend.clone(), actor.id));
        let notifier = Arc::new(NotificationDispatcher::new(backend.clone()));
        let locks = Arc::new(EntityLocks::new());
        let ids = Arc::new(IdGenerator::new());

        let policies = Arc::new(PolicyStore::new(
            backend.clone(),
            gate.clone(),
            audit.clone(),
            locks.clone(),
            ids.clone(),
        ));
        let holds = Arc::new(LegalHoldStore::new(
            backend.clone(),
            gate.clone(),
            audit.clone(),
            notifier.clone(),
            locks.clone(),
            ids,
        ));
        let archiver = Arc::new(EvidenceArchiver::new(
            backend.clone(),
            gate.clone(),
            audit.clone(),
            locks,
        ));
        let scheduler = Arc::new(ExpiryScheduler::new(
            backend.clone(),
            notifier.clone(),
            archiver.clone(),
            policies.clone(),
            config.scheduler.clone(),
        ));

        Self {
            guard: DeletionGuard::new(backend.clone()),
            config,
            backend,
            gate,
            audit,
            notifier,
            policies,
            holds,
            archiver,
            scheduler,
        }
    }

    /// Validate `config` and connect to its REST backend
    pub fn connect(actor: Actor, config: ManagerConfig) -> RetentionResult<Self> {
        config.validate()?;
        let backend = Arc::new(HttpBackend::from_config(&config)?);
        Ok(Self::new(actor, backend, config))
    }

    /// Load policies and holds into the session caches
    pub async fn initialize(&self) -> RetentionResult<()> {
        let policies = self.policies.refresh().await?;
        let holds = self.holds.refresh().await?;

        info!(
            actor = %self.gate.actor().id,
            role = %self.gate.actor().role,
            policies = policies,
            holds = holds,
            "Retention lifecycle manager initialized"
        );
        Ok(())
    }

    pub fn actor(&self) -> &Actor {
        self.gate.actor()
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    pub fn access(&self) -> &AccessGate {
        &self.gate
    }

    pub fn policies(&self) -> &PolicyStore {
        &self.policies
    }

    pub fn holds(&self) -> &LegalHoldStore {
        &self.holds
    }

    pub fn guard(&self) -> &DeletionGuard {
        &self.guard
    }

    pub fn archiver(&self) -> &EvidenceArchiver {
        &self.archiver
    }

    pub fn notifier(&self) -> &NotificationDispatcher {
        &self.notifier
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    pub fn scheduler(&self) -> &Arc<ExpiryScheduler> {
        &self.scheduler
    }

    /// Evidence expiring within `days_ahead` days
    pub async fn expiring_evidence(&self, days_ahead: u32) -> RetentionResult<Vec<EvidenceRecord>> {
        self.backend.expiring_evidence(days_ahead).await
    }

    /// Archive evidence
    pub async fn archive(
        &self,
        evidence_ids: &[String],
        archive_location: &str,
    ) -> RetentionResult<ArchiveRequest> {
        self.archiver.archive(evidence_ids, archive_location).await
    }

    /// Start the expiry scheduler, or `None` when disabled in config
    pub fn start_scheduler(&self) -> Option<SchedulerHandle> {
        if !self.config.scheduler.enabled {
            info!("Expiry scheduler disabled");
            return None;
        }
        Some(ExpiryScheduler::start(self.scheduler.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RetentionError;
    use crate::guard::GuardVerdict;
    use crate::testing::{Endpoint, RecordingBackend};
    use crate::types::{DeletionCheck, LegalHoldDraft, PolicyDraft, Role};

    fn manager_for(backend: &Arc<RecordingBackend>, role: Role) -> RetentionLifecycleManager {
        RetentionLifecycleManager::new(
            Actor::new("0xsession", role),
            backend.clone(),
            ManagerConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_initialize_loads_caches() {
        let backend = Arc::new(RecordingBackend::new());
        let admin = manager_for(&backend, Role::Admin);
        admin
            .policies()
            .create(PolicyDraft {
                name: "Bodycam 90d".to_string(),
                retention_days: 90,
                ..Default::default()
            })
            .await
            .unwrap();
        admin
            .holds()
            .create(LegalHoldDraft {
                case_id: "CASE-1".to_string(),
                reason: "Preservation letter".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        let viewer = manager_for(&backend, Role::Auditor);
        viewer.initialize().await.unwrap();

        assert_eq!(viewer.policies().len().await, 1);
        assert_eq!(viewer.holds().active().await.len(), 1);
        assert_eq!(viewer.actor().role, Role::Auditor);
    }

    #[tokio::test]
    async fn test_initialize_propagates_backend_failure() {
        let backend = Arc::new(RecordingBackend::new());
        backend.fail(Endpoint::ListHolds).await;
        let manager = manager_for(&backend, Role::Admin);

        assert!(matches!(
            manager.initialize().await,
            Err(RetentionError::Persistence { .. })
        ));
    }

    #[tokio::test]
    async fn test_hold_blocks_deletion_end_to_end() {
        let backend = Arc::new(RecordingBackend::new());
        let manager = manager_for(&backend, Role::CourtOfficial);
        let outcome = manager
            .holds()
            .create(LegalHoldDraft {
                case_id: "CASE-9".to_string(),
                reason: "Court order 2026-117".to_string(),
                evidence_ids: ["EV-1".to_string()].into_iter().collect(),
                ..Default::default()
            })
            .await
            .unwrap();

        // The backend now reports the hold for EV-1
        backend
            .set_deletion_check(
                "EV-1",
                DeletionCheck {
                    has_legal_hold: true,
                    legal_hold_id: Some(outcome.hold.id.clone()),
                    legal_hold_reason: Some(outcome.hold.reason.clone()),
                    has_active_retention: true,
                    retention_expired: true,
                    ..Default::default()
                },
            )
            .await;

        assert_eq!(
            manager.guard().can_delete("EV-1").await.unwrap(),
            GuardVerdict::BlockedByLegalHold {
                hold_id: Some(outcome.hold.id),
                reason: "Court order 2026-117".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_archive_and_expiring_passthrough() {
        let backend = Arc::new(RecordingBackend::new());
        backend
            .set_expiring(30, vec![EvidenceRecord::new("EV-5")])
            .await;
        let manager = manager_for(&backend, Role::Admin);

        let expiring = manager.expiring_evidence(30).await.unwrap();
        assert_eq!(expiring[0].id, "EV-5");

        let request = manager
            .archive(&["EV-5".to_string()], "cold-storage")
            .await
            .unwrap();
        assert_eq!(request.archived_by, "0xsession");
    }

    #[tokio::test]
    async fn test_scheduler_disabled_by_config() {
        let backend = Arc::new(RecordingBackend::new());
        let mut config = ManagerConfig::default();
        config.scheduler.enabled = false;
        let manager = RetentionLifecycleManager::new(
            Actor::new("0xsession", Role::Admin),
            backend.clone(),
            config,
        );

        assert!(manager.start_scheduler().is_none());
    }

    #[tokio::test]
    async fn test_scheduler_starts_and_stops() {
        let backend = Arc::new(RecordingBackend::new());
        let manager = manager_for(&backend, Role::Admin);

        let handle = manager.start_scheduler().unwrap();
        assert!(!handle.is_finished());
        handle.shutdown().await;
    }

    #[test]
    fn test_connect_rejects_bad_config() {
        let config = ManagerConfig {
            api_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            RetentionLifecycleManager::connect(Actor::new("0xsession", Role::Admin), config),
            Err(RetentionError::Configuration(_))
        ));
    }
}
