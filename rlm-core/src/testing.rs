//! Recording backend
//!
//! In-memory `RetentionBackend` that records every call, keeps a simple
//! copy of the policy and hold tables, and can be told to fail or stall
//! specific endpoints.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use tokio::sync::RwLock;

use crate::audit::AuditRecord;
use crate::backend::RetentionBackend;
use crate::error::{RetentionError, RetentionResult};
use crate::notify::Notification;
use crate::types::{
    ArchiveRequest, DeletionCheck, EvidenceRecord, HoldApplication, HoldRemoval, LegalHold,
    ModificationCheck, ReleaseRequest, RetentionAssignment, RetentionPolicy,
};

/// Backend endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    ListPolicies,
    CreatePolicy,
    UpdatePolicy,
    DeletePolicy,
    EvidenceByPolicy,
    ApplyRetentionPolicy,
    ExpiringEvidence,
    ArchiveEvidence,
    ListHolds,
    CreateHold,
    UpdateHold,
    ReleaseHold,
    ApplyLegalHold,
    RemoveLegalHold,
    DeletionCheck,
    ModificationCheck,
    CreateNotifications,
    LogAdminAction,
}

/// A recorded backend call with its payload
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    ListPolicies,
    CreatePolicy(RetentionPolicy),
    UpdatePolicy(RetentionPolicy),
    DeletePolicy(String),
    EvidenceByPolicy(String),
    ApplyRetentionPolicy(RetentionAssignment),
    ExpiringEvidence(u32),
    ArchiveEvidence(ArchiveRequest),
    ListHolds,
    CreateHold(LegalHold),
    UpdateHold(LegalHold),
    ReleaseHold {
        hold_id: String,
        request: ReleaseRequest,
    },
    ApplyLegalHold(HoldApplication),
    RemoveLegalHold(HoldRemoval),
    DeletionCheck(String),
    ModificationCheck(String),
    CreateNotifications(Vec<Notification>),
    LogAdminAction(AuditRecord),
}

impl BackendCall {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            BackendCall::ListPolicies => Endpoint::ListPolicies,
            BackendCall::CreatePolicy(_) => Endpoint::CreatePolicy,
            BackendCall::UpdatePolicy(_) => Endpoint::UpdatePolicy,
            BackendCall::DeletePolicy(_) => Endpoint::DeletePolicy,
            BackendCall::EvidenceByPolicy(_) => Endpoint::EvidenceByPolicy,
            BackendCall::ApplyRetentionPolicy(_) => Endpoint::ApplyRetentionPolicy,
            BackendCall::ExpiringEvidence(_) => Endpoint::ExpiringEvidence,
            BackendCall::ArchiveEvidence(_) => Endpoint::ArchiveEvidence,
            BackendCall::ListHolds => Endpoint::ListHolds,
            BackendCall::CreateHold(_) => Endpoint::CreateHold,
            BackendCall::UpdateHold(_) => Endpoint::UpdateHold,
            BackendCall::ReleaseHold { .. } => Endpoint::ReleaseHold,
            BackendCall::ApplyLegalHold(_) => Endpoint::ApplyLegalHold,
            BackendCall::RemoveLegalHold(_) => Endpoint::RemoveLegalHold,
            BackendCall::DeletionCheck(_) => Endpoint::DeletionCheck,
            BackendCall::ModificationCheck(_) => Endpoint::ModificationCheck,
            BackendCall::CreateNotifications(_) => Endpoint::CreateNotifications,
            BackendCall::LogAdminAction(_) => Endpoint::LogAdminAction,
        }
    }
}

#[derive(Default)]
struct RecorderState {
    calls: Vec<BackendCall>,
    failing: HashSet<Endpoint>,
    delays: HashMap<Endpoint, Duration>,
    policies: Vec<RetentionPolicy>,
    holds: Vec<LegalHold>,
    evidence_by_policy: HashMap<String, Vec<EvidenceRecord>>,
    expiring: HashMap<u32, Vec<EvidenceRecord>>,
    deletion_checks: HashMap<String, DeletionCheck>,
    modification_checks: HashMap<String, ModificationCheck>,
}

/// Recording in-memory backend
#[derive(Default)]
pub struct RecordingBackend {
    state: RwLock<RecorderState>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make an endpoint fail until [`recover`](Self::recover) is called
    pub async fn fail(&self, endpoint: Endpoint) {
        self.state.write().await.failing.insert(endpoint);
    }

    /// Stop failing an endpoint
    pub async fn recover(&self, endpoint: Endpoint) {
        self.state.write().await.failing.remove(&endpoint);
    }

    /// Stall an endpoint before it answers
    pub async fn delay(&self, endpoint: Endpoint, delay: Duration) {
        self.state.write().await.delays.insert(endpoint, delay);
    }

    pub async fn seed_policy(&self, policy: RetentionPolicy) {
        self.state.write().await.policies.push(policy);
    }

    pub async fn seed_hold(&self, hold: LegalHold) {
        self.state.write().await.holds.push(hold);
    }

    pub async fn set_evidence_for_policy(&self, policy_id: &str, records: Vec<EvidenceRecord>) {
        self.state
            .write()
            .await
            .evidence_by_policy
            .insert(policy_id.to_string(), records);
    }

    pub async fn set_expiring(&self, days_ahead: u32, records: Vec<EvidenceRecord>) {
        self.state.write().await.expiring.insert(days_ahead, records);
    }

    pub async fn set_deletion_check(&self, evidence_id: &str, check: DeletionCheck) {
        self.state
            .write()
            .await
            .deletion_checks
            .insert(evidence_id.to_string(), check);
    }

    pub async fn set_modification_check(&self, evidence_id: &str, check: ModificationCheck) {
        self.state
            .write()
            .await
            .modification_checks
            .insert(evidence_id.to_string(), check);
    }

    /// Every call, in order
    pub async fn calls(&self) -> Vec<BackendCall> {
        self.state.read().await.calls.clone()
    }

    /// Calls to one endpoint, in order
    pub async fn calls_to(&self, endpoint: Endpoint) -> Vec<BackendCall> {
        self.state
            .read()
            .await
            .calls
            .iter()
            .filter(|call| call.endpoint() == endpoint)
            .cloned()
            .collect()
    }

    /// Forget recorded calls
    pub async fn clear_calls(&self) {
        self.state.write().await.calls.clear();
    }

    /// Admin-action records received
    pub async fn audit_records(&self) -> Vec<AuditRecord> {
        self.state
            .read()
            .await
            .calls
            .iter()
            .filter_map(|call| match call {
                BackendCall::LogAdminAction(record) => Some(record.clone()),
                _ => None,
            })
            .collect()
    }

    /// Notifications received, flattened across batches
    pub async fn notifications(&self) -> Vec<Notification> {
        self.state
            .read()
            .await
            .calls
            .iter()
            .filter_map(|call| match call {
                BackendCall::CreateNotifications(batch) => Some(batch.clone()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    /// Stored copy of the policy table
    pub async fn stored_policies(&self) -> Vec<RetentionPolicy> {
        self.state.read().await.policies.clone()
    }

    /// Stored copy of the hold table
    pub async fn stored_holds(&self) -> Vec<LegalHold> {
        self.state.read().await.holds.clone()
    }

    /// Record a call, then apply any configured delay and failure
    async fn record(&self, call: BackendCall) -> RetentionResult<()> {
        let endpoint = call.endpoint();
        let (delay, failing) = {
            let mut state = self.state.write().await;
            state.calls.push(call);
            (
                state.delays.get(&endpoint).copied(),
                state.failing.contains(&endpoint),
            )
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if failing {
            return Err(RetentionError::persistence(
                format!("{:?}", endpoint),
                "injected failure",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl RetentionBackend for RecordingBackend {
    async fn list_policies(&self) -> RetentionResult<Vec<RetentionPolicy>> {
        self.record(BackendCall::ListPolicies).await?;
        Ok(self.state.read().await.policies.clone())
    }

    async fn create_policy(&self, policy: &RetentionPolicy) -> RetentionResult<()> {
        self.record(BackendCall::CreatePolicy(policy.clone())).await?;
        self.state.write().await.policies.push(policy.clone());
        Ok(())
    }

    async fn update_policy(&self, policy: &RetentionPolicy) -> RetentionResult<()> {
        self.record(BackendCall::UpdatePolicy(policy.clone())).await?;
        let mut state = self.state.write().await;
        state.policies.retain(|p| p.id != policy.id);
        state.policies.push(policy.clone());
        Ok(())
    }

    async fn delete_policy(&self, policy_id: &str) -> RetentionResult<()> {
        self.record(BackendCall::DeletePolicy(policy_id.to_string()))
            .await?;
        self.state.write().await.policies.retain(|p| p.id != policy_id);
        Ok(())
    }

    async fn evidence_by_policy(&self, policy_id: &str) -> RetentionResult<Vec<EvidenceRecord>> {
        self.record(BackendCall::EvidenceByPolicy(policy_id.to_string()))
            .await?;
        Ok(self
            .state
            .read()
            .await
            .evidence_by_policy
            .get(policy_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn apply_retention_policy(
        &self,
        assignment: &RetentionAssignment,
    ) -> RetentionResult<()> {
        self.record(BackendCall::ApplyRetentionPolicy(assignment.clone()))
            .await
    }

    async fn expiring_evidence(&self, days_ahead: u32) -> RetentionResult<Vec<EvidenceRecord>> {
        self.record(BackendCall::ExpiringEvidence(days_ahead)).await?;
        Ok(self
            .state
            .read()
            .await
            .expiring
            .get(&days_ahead)
            .cloned()
            .unwrap_or_default())
    }

    async fn archive_evidence(&self, request: &ArchiveRequest) -> RetentionResult<()> {
        self.record(BackendCall::ArchiveEvidence(request.clone())).await
    }

    async fn list_holds(&self) -> RetentionResult<Vec<LegalHold>> {
        self.record(BackendCall::ListHolds).await?;
        Ok(self.state.read().await.holds.clone())
    }

    async fn create_hold(&self, hold: &LegalHold) -> RetentionResult<()> {
        self.record(BackendCall::CreateHold(hold.clone())).await?;
        self.state.write().await.holds.push(hold.clone());
        Ok(())
    }

    async fn update_hold(&self, hold: &LegalHold) -> RetentionResult<()> {
        self.record(BackendCall::UpdateHold(hold.clone())).await?;
        let mut state = self.state.write().await;
        state.holds.retain(|h| h.id != hold.id);
        state.holds.push(hold.clone());
        Ok(())
    }

    async fn release_hold(&self, hold_id: &str, request: &ReleaseRequest) -> RetentionResult<()> {
        self.record(BackendCall::ReleaseHold {
            hold_id: hold_id.to_string(),
            request: request.clone(),
        })
        .await?;
        let mut state = self.state.write().await;
        if let Some(hold) = state.holds.iter_mut().find(|h| h.id == hold_id) {
            hold.is_active = false;
            hold.release_reason = Some(request.release_reason.clone());
        }
        Ok(())
    }

    async fn apply_legal_hold(&self, application: &HoldApplication) -> RetentionResult<()> {
        self.record(BackendCall::ApplyLegalHold(application.clone()))
            .await
    }

    async fn remove_legal_hold(&self, removal: &HoldRemoval) -> RetentionResult<()> {
        self.record(BackendCall::RemoveLegalHold(removal.clone())).await
    }

    async fn deletion_check(&self, evidence_id: &str) -> RetentionResult<DeletionCheck> {
        self.record(BackendCall::DeletionCheck(evidence_id.to_string()))
            .await?;
        Ok(self
            .state
            .read()
            .await
            .deletion_checks
            .get(evidence_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn modification_check(&self, evidence_id: &str) -> RetentionResult<ModificationCheck> {
        self.record(BackendCall::ModificationCheck(evidence_id.to_string()))
            .await?;
        Ok(self
            .state
            .read()
            .await
            .modification_checks
            .get(evidence_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_notifications(&self, notifications: &[Notification]) -> RetentionResult<()> {
        self.record(BackendCall::CreateNotifications(notifications.to_vec()))
            .await
    }

    async fn log_admin_action(&self, record: &AuditRecord) -> RetentionResult<()> {
        self.record(BackendCall::LogAdminAction(record.clone())).await
    }
}
