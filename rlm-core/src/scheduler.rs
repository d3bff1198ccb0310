//! Expiry Scheduler
//!
//! Periodic background task that warns submitters about evidence nearing
//! the end of its retention period and archives expired evidence whose
//! policy asks for it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::archive::EvidenceArchiver;
use crate::backend::RetentionBackend;
use crate::config::SchedulerConfig;
use crate::notify::{DeliveryStatus, NotificationDispatcher};
use crate::policy_store::PolicyStore;

/// Scheduler control commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerCommand {
    /// Run a tick now
    TickNow,
    /// Pause periodic ticks
    Pause,
    /// Resume periodic ticks
    Resume,
    /// Stop the task
    Stop,
}

/// What a single tick did
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickReport {
    pub started_at: DateTime<Utc>,
    /// Evidence inside the warning window
    pub expiring: usize,
    /// Expiry warning delivery
    pub notification: DeliveryStatus,
    /// Expired evidence ids that were archived
    pub archived: Vec<String>,
    /// Failures encountered during the tick
    pub errors: Vec<String>,
}

impl TickReport {
    fn new() -> Self {
        Self {
            started_at: Utc::now(),
            expiring: 0,
            notification: DeliveryStatus::Skipped,
            archived: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && !self.notification.is_failed()
    }
}

/// Expiry scheduler
pub struct ExpiryScheduler {
    backend: Arc<dyn RetentionBackend>,
    notifier: Arc<NotificationDispatcher>,
    archiver: Arc<EvidenceArchiver>,
    policies: Arc<PolicyStore>,
    config: SchedulerConfig,
    /// Latest tick report
    reports: watch::Sender<Option<TickReport>>,
}

impl ExpiryScheduler {
    pub fn new(
        backend: Arc<dyn RetentionBackend>,
        notifier: Arc<NotificationDispatcher>,
        archiver: Arc<EvidenceArchiver>,
        policies: Arc<PolicyStore>,
        config: SchedulerConfig,
    ) -> Self {
        let (reports, _) = watch::channel(None);
        Self {
            backend,
            notifier,
            archiver,
            policies,
            config,
            reports,
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Report of the most recent tick
    pub fn last_report(&self) -> Option<TickReport> {
        self.reports.borrow().clone()
    }

    /// Watch tick reports as they are produced
    pub fn subscribe(&self) -> watch::Receiver<Option<TickReport>> {
        self.reports.subscribe()
    }

    /// Run one pass: policy reload, expiry warnings, then auto-archival
    pub async fn tick(&self) -> TickReport {
        let mut report = TickReport::new();

        // A failed reload keeps the previous cache
        if let Err(e) = self.policies.refresh().await {
            warn!(error = %e, "Failed to reload retention policies");
            report.errors.push(e.to_string());
        }

        match self.backend.expiring_evidence(self.config.warning_days).await {
            Ok(records) => {
                report.expiring = records.len();
                report.notification = self.notifier.notify_retention_expiry(&records).await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to check expiring evidence");
                report.errors.push(e.to_string());
            }
        }

        match self.backend.expiring_evidence(0).await {
            Ok(records) => {
                // Policy lookups are cached per tick
                let mut auto_archive: BTreeMap<String, bool> = BTreeMap::new();

                for record in records {
                    let Some(policy_id) = record.retention_policy_id.as_deref() else {
                        continue;
                    };
                    let archive = match auto_archive.get(policy_id) {
                        Some(flag) => *flag,
                        None => {
                            let flag = self
                                .policies
                                .get(policy_id)
                                .await
                                .map(|p| p.auto_archive)
                                .unwrap_or(false);
                            auto_archive.insert(policy_id.to_string(), flag);
                            flag
                        }
                    };
                    if !archive {
                        continue;
                    }

                    let archived = self
                        .archiver
                        .archive(std::slice::from_ref(&record.id), &self.config.archive_location)
                        .await;
                    match archived {
                        Ok(_) => report.archived.push(record.id),
                        Err(e) => {
                            warn!(evidence_id = %record.id, error = %e, "Auto-archive failed");
                            report.errors.push(format!("{}: {}", record.id, e));
                        }
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "Failed to check expired evidence");
                report.errors.push(e.to_string());
            }
        }

        info!(
            expiring = report.expiring,
            archived = report.archived.len(),
            errors = report.errors.len(),
            "Retention tick complete"
        );

        self.reports.send_replace(Some(report.clone()));
        report
    }

    /// Spawn the periodic task. The first tick runs one interval after start.
    pub fn start(scheduler: Arc<Self>) -> SchedulerHandle {
        let (tx, mut rx) = mpsc::channel::<SchedulerCommand>(16);
        let period = Duration::from_secs(scheduler.config.interval_secs.max(1));

        let task = scheduler.clone();
        let join = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut paused = false;

            info!(interval_secs = period.as_secs(), "Expiry scheduler started");

            loop {
                tokio::select! {
                    cmd = rx.recv() => {
                        match cmd {
                            Some(SchedulerCommand::TickNow) => {
                                task.tick().await;
                            }
                            Some(SchedulerCommand::Pause) => {
                                paused = true;
                                info!("Expiry scheduler paused");
                            }
                            Some(SchedulerCommand::Resume) => {
                                if paused {
                                    paused = false;
                                    ticker.reset();
                                    info!("Expiry scheduler resumed");
                                }
                            }
                            Some(SchedulerCommand::Stop) | None => {
                                info!("Expiry scheduler stopping");
                                break;
                            }
                        }
                    }
                    _ = ticker.tick(), if !paused => {
                        task.tick().await;
                    }
                }
            }
        });

        SchedulerHandle { tx, join, scheduler }
    }
}

/// Handle to a running scheduler task
pub struct SchedulerHandle {
    tx: mpsc::Sender<SchedulerCommand>,
    join: JoinHandle<()>,
    scheduler: Arc<ExpiryScheduler>,
}

impl SchedulerHandle {
    /// Send a command. Returns false if the task has stopped.
    pub async fn send(&self, command: SchedulerCommand) -> bool {
        self.tx.send(command).await.is_ok()
    }

    pub async fn tick_now(&self) -> bool {
        self.send(SchedulerCommand::TickNow).await
    }

    pub async fn pause(&self) -> bool {
        self.send(SchedulerCommand::Pause).await
    }

    pub async fn resume(&self) -> bool {
        self.send(SchedulerCommand::Resume).await
    }

    /// Watch tick reports
    pub fn subscribe(&self) -> watch::Receiver<Option<TickReport>> {
        self.scheduler.subscribe()
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Stop the task and wait for it to exit
    pub async fn shutdown(self) {
        let _ = self.tx.send(SchedulerCommand::Stop).await;
        if let Err(e) = self.join.await {
            warn!(error = %e, "Expiry scheduler task ended abnormally");
        } else {
            debug!("Expiry scheduler stopped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::AccessGate;
    use crate::audit::AuditLogger;
    use crate::locks::EntityLocks;
    use crate::testing::{BackendCall, Endpoint, RecordingBackend};
    use crate::types::{Actor, EvidenceRecord, IdGenerator, PolicyDraft, RetentionPolicy, Role};

    const HOUR: u64 = 3600;

    struct Fixture {
        backend: Arc<RecordingBackend>,
        scheduler: Arc<ExpiryScheduler>,
    }

    async fn fixture(role: Role, policies: Vec<RetentionPolicy>) -> Fixture {
        let backend = Arc::new(RecordingBackend::new());
        for policy in policies {
            backend.seed_policy(policy).await;
        }

        let actor = Actor::new("0xadmin", role);
        let gate = Arc::new(AccessGate::new(actor.clone()));
        let audit = Arc::new(AuditLogger::new(backend.clone(), actor.id));
        let locks = Arc::new(EntityLocks::new());
        let store = Arc::new(PolicyStore::new(
            backend.clone(),
            gate.clone(),
            audit.clone(),
            locks.clone(),
            Arc::new(IdGenerator::new()),
        ));
        store.refresh().await.unwrap();
        backend.clear_calls().await;

        let scheduler = Arc::new(ExpiryScheduler::new(
            backend.clone(),
            Arc::new(NotificationDispatcher::new(backend.clone())),
            Arc::new(EvidenceArchiver::new(backend.clone(), gate, audit, locks)),
            store,
            SchedulerConfig {
                interval_secs: HOUR,
                ..Default::default()
            },
        ));

        Fixture { backend, scheduler }
    }

    fn policy(id: &str, auto_archive: bool) -> RetentionPolicy {
        let draft = PolicyDraft {
            name: format!("Policy {}", id),
            retention_days: 30,
            auto_archive,
            ..Default::default()
        };
        RetentionPolicy::from_draft(id.to_string(), draft, "0xadmin", Utc::now()).unwrap()
    }

    fn expired(id: &str, policy_id: &str) -> EvidenceRecord {
        let mut record = EvidenceRecord::new(id);
        record.retention_policy_id = Some(policy_id.to_string());
        record
    }

    async fn expiring_queries(backend: &RecordingBackend) -> usize {
        backend.calls_to(Endpoint::ExpiringEvidence).await.len()
    }

    #[tokio::test]
    async fn test_tick_warns_submitters() {
        let f = fixture(Role::Admin, vec![]).await;
        let mut record = EvidenceRecord::new("EV-1");
        record.submitted_by = Some("0xofficer".to_string());
        f.backend.set_expiring(7, vec![record, EvidenceRecord::new("EV-2")]).await;

        let report = f.scheduler.tick().await;

        assert_eq!(report.expiring, 2);
        assert_eq!(report.notification, DeliveryStatus::Delivered(1));
        assert_eq!(f.backend.notifications().await[0].recipient, "0xofficer");
        assert_eq!(
            f.backend.calls_to(Endpoint::ExpiringEvidence).await,
            vec![BackendCall::ExpiringEvidence(7), BackendCall::ExpiringEvidence(0)]
        );
        assert_eq!(f.scheduler.last_report(), Some(report));
    }

    #[tokio::test]
    async fn test_tick_archives_only_auto_archive_policies() {
        let f = fixture(Role::Admin, vec![policy("RP-1", true), policy("RP-2", false)]).await;
        f.backend
            .set_expiring(
                0,
                vec![
                    expired("EV-1", "RP-1"),
                    expired("EV-2", "RP-2"),
                    expired("EV-3", "RP-404"),
                    EvidenceRecord::new("EV-4"),
                ],
            )
            .await;

        let report = f.scheduler.tick().await;

        assert_eq!(report.archived, vec!["EV-1".to_string()]);
        assert!(report.is_clean());
        let archived = f.backend.calls_to(Endpoint::ArchiveEvidence).await;
        assert_eq!(archived.len(), 1);
        match &archived[0] {
            BackendCall::ArchiveEvidence(request) => {
                assert_eq!(request.evidence_ids, vec!["EV-1".to_string()]);
                assert_eq!(request.archive_location, "auto-archive");
            }
            other => panic!("unexpected call {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_tick_records_errors_without_panicking() {
        let f = fixture(Role::Admin, vec![]).await;
        f.backend.fail(Endpoint::ExpiringEvidence).await;

        let report = f.scheduler.tick().await;
        assert_eq!(report.errors.len(), 2);
        assert!(!report.is_clean());
    }

    #[tokio::test]
    async fn test_tick_sees_policies_created_after_start() {
        let f = fixture(Role::Admin, vec![]).await;
        f.backend.seed_policy(policy("RP-7", true)).await;
        f.backend.set_expiring(0, vec![expired("EV-1", "RP-7")]).await;

        let report = f.scheduler.tick().await;

        assert_eq!(report.archived, vec!["EV-1".to_string()]);
        assert_eq!(f.backend.calls_to(Endpoint::ListPolicies).await.len(), 1);
    }

    #[tokio::test]
    async fn test_policy_reload_failure_keeps_cached_policies() {
        let f = fixture(Role::Admin, vec![policy("RP-1", true)]).await;
        f.backend.fail(Endpoint::ListPolicies).await;
        f.backend.set_expiring(0, vec![expired("EV-1", "RP-1")]).await;

        let report = f.scheduler.tick().await;

        assert_eq!(report.archived, vec!["EV-1".to_string()]);
        assert_eq!(report.errors.len(), 1);
    }

    #[tokio::test]
    async fn test_non_admin_archive_is_reported() {
        let f = fixture(Role::EvidenceManager, vec![policy("RP-1", true)]).await;
        f.backend.set_expiring(0, vec![expired("EV-1", "RP-1")]).await;

        let report = f.scheduler.tick().await;
        assert!(report.archived.is_empty());
        assert_eq!(report.errors.len(), 1);
        assert!(f.backend.calls_to(Endpoint::ArchiveEvidence).await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_tick_after_one_interval() {
        let f = fixture(Role::Admin, vec![]).await;
        let handle = ExpiryScheduler::start(f.scheduler.clone());

        tokio::time::sleep(Duration::from_secs(HOUR - 1)).await;
        assert_eq!(expiring_queries(&f.backend).await, 0);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(expiring_queries(&f.backend).await, 2);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_failing_ticks_do_not_stop_the_loop() {
        let f = fixture(Role::Admin, vec![]).await;
        f.backend.fail(Endpoint::ExpiringEvidence).await;
        let handle = ExpiryScheduler::start(f.scheduler.clone());

        tokio::time::sleep(Duration::from_secs(3 * HOUR + 1)).await;
        assert_eq!(expiring_queries(&f.backend).await, 6);
        assert!(!handle.is_finished());

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_and_resume() {
        let f = fixture(Role::Admin, vec![]).await;
        let handle = ExpiryScheduler::start(f.scheduler.clone());

        assert!(handle.pause().await);
        tokio::time::sleep(Duration::from_secs(2 * HOUR)).await;
        assert_eq!(expiring_queries(&f.backend).await, 0);

        assert!(handle.resume().await);
        tokio::time::sleep(Duration::from_secs(HOUR + 1)).await;
        assert_eq!(expiring_queries(&f.backend).await, 2);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_now_publishes_report() {
        let f = fixture(Role::Admin, vec![]).await;
        let handle = ExpiryScheduler::start(f.scheduler.clone());
        let mut reports = handle.subscribe();

        assert!(handle.tick_now().await);
        reports.changed().await.unwrap();
        assert!(reports.borrow().is_some());
        assert_eq!(expiring_queries(&f.backend).await, 2);

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_shutdown_stops_task() {
        let f = fixture(Role::Admin, vec![]).await;
        let handle = ExpiryScheduler::start(f.scheduler.clone());
        let tx = handle.tx.clone();

        handle.shutdown().await;
        assert!(tx.send(SchedulerCommand::TickNow).await.is_err());
    }
}
