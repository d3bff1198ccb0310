//! Retention Policy Store
//!
//! Session cache of retention policies. Every mutation is admin-only,
//! persisted to the backend first, and only then reflected in the cache.

use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::access::{AccessGate, AccessLevel};
use crate::audit::{AdminAction, AuditLogger};
use crate::backend::RetentionBackend;
use crate::error::{RetentionError, RetentionResult};
use crate::locks::{policy_key, EntityLocks};
use crate::types::{
    IdGenerator, PolicyDraft, PolicyUpdate, RetentionAssignment, RetentionPolicy,
    POLICY_ID_PREFIX,
};

/// Retention policy store
pub struct PolicyStore {
    /// Policies by ID
    policies: RwLock<HashMap<String, RetentionPolicy>>,
    backend: Arc<dyn RetentionBackend>,
    gate: Arc<AccessGate>,
    audit: Arc<AuditLogger>,
    locks: Arc<EntityLocks>,
    ids: Arc<IdGenerator>,
}

impl PolicyStore {
    pub fn new(
        backend: Arc<dyn RetentionBackend>,
        gate: Arc<AccessGate>,
        audit: Arc<AuditLogger>,
        locks: Arc<EntityLocks>,
        ids: Arc<IdGenerator>,
    ) -> Self {
        Self {
            policies: RwLock::new(HashMap::new()),
            backend,
            gate,
            audit,
            locks,
            ids,
        }
    }

    /// Replace the cache with the backend's policy table
    pub async fn refresh(&self) -> RetentionResult<usize> {
        let loaded = self.backend.list_policies().await?;
        let count = loaded.len();

        let mut policies = self.policies.write().await;
        policies.clear();
        policies.extend(loaded.into_iter().map(|p| (p.id.clone(), p)));

        info!(count = count, "Retention policies loaded");
        Ok(count)
    }

    /// Get a cached policy
    pub async fn get(&self, policy_id: &str) -> Option<RetentionPolicy> {
        self.policies.read().await.get(policy_id).cloned()
    }

    /// All cached policies, oldest first
    pub async fn list(&self) -> Vec<RetentionPolicy> {
        let mut policies: Vec<_> = self.policies.read().await.values().cloned().collect();
        policies.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        policies
    }

    /// Number of cached policies
    pub async fn len(&self) -> usize {
        self.policies.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.policies.read().await.is_empty()
    }

    /// Create a policy
    pub async fn create(&self, draft: PolicyDraft) -> RetentionResult<RetentionPolicy> {
        self.gate
            .require(AccessLevel::Admin, "create retention policy")?;

        let actor = self.gate.actor();
        let policy = RetentionPolicy::from_draft(
            self.ids.next(POLICY_ID_PREFIX),
            draft,
            &actor.id,
            Utc::now(),
        )?;

        let _guard = self.locks.lock(&policy_key(&policy.id)).await;

        self.backend.create_policy(&policy).await.map_err(|e| {
            warn!(policy_id = %policy.id, error = %e, "Failed to create retention policy");
            e
        })?;

        self.policies
            .write()
            .await
            .insert(policy.id.clone(), policy.clone());

        info!(
            policy_id = %policy.id,
            name = %policy.name,
            retention_days = policy.retention_days,
            "Retention policy created"
        );

        self.audit
            .log(
                AdminAction::RetentionPolicyCreated,
                Some(&policy.id),
                serde_json::json!({
                    "policyName": policy.name,
                    "retentionDays": policy.retention_days,
                }),
            )
            .await;

        Ok(policy)
    }

    /// Update a cached policy
    pub async fn update(
        &self,
        policy_id: &str,
        updates: PolicyUpdate,
    ) -> RetentionResult<RetentionPolicy> {
        self.gate
            .require(AccessLevel::Admin, "update retention policy")?;

        let _guard = self.locks.lock(&policy_key(policy_id)).await;

        let current = self
            .get(policy_id)
            .await
            .ok_or_else(|| RetentionError::not_found("Retention policy", policy_id))?;

        let actor = self.gate.actor();
        let updated = current.merged(&updates, &actor.id, Utc::now())?;

        self.backend.update_policy(&updated).await.map_err(|e| {
            warn!(policy_id = %policy_id, error = %e, "Failed to update retention policy");
            e
        })?;

        self.policies
            .write()
            .await
            .insert(policy_id.to_string(), updated.clone());

        info!(policy_id = %policy_id, "Retention policy updated");

        self.audit
            .log(
                AdminAction::RetentionPolicyUpdated,
                Some(policy_id),
                serde_json::json!({ "changes": updates }),
            )
            .await;

        Ok(updated)
    }

    /// Delete a policy no evidence refers to
    pub async fn delete(&self, policy_id: &str) -> RetentionResult<()> {
        self.gate
            .require(AccessLevel::Admin, "delete retention policy")?;

        let _guard = self.locks.lock(&policy_key(policy_id)).await;

        let in_use = self.backend.evidence_by_policy(policy_id).await?;
        if !in_use.is_empty() {
            warn!(
                policy_id = %policy_id,
                evidence_count = in_use.len(),
                "Retention policy deletion blocked"
            );
            return Err(RetentionError::conflict(format!(
                "Cannot delete policy {}: {} evidence item(s) are using this policy",
                policy_id,
                in_use.len()
            )));
        }

        self.backend.delete_policy(policy_id).await.map_err(|e| {
            warn!(policy_id = %policy_id, error = %e, "Failed to delete retention policy");
            e
        })?;

        self.policies.write().await.remove(policy_id);

        info!(policy_id = %policy_id, "Retention policy deleted");

        self.audit
            .log(
                AdminAction::RetentionPolicyDeleted,
                Some(policy_id),
                serde_json::json!({}),
            )
            .await;

        Ok(())
    }

    /// Assign evidence to a policy, starting its retention clock now
    pub async fn apply(
        &self,
        evidence_ids: &[String],
        policy_id: &str,
    ) -> RetentionResult<RetentionAssignment> {
        self.gate
            .require(AccessLevel::Admin, "apply retention policy")?;

        if evidence_ids.is_empty() {
            return Err(RetentionError::validation(
                "at least one evidence id is required",
            ));
        }

        let _guard = self.locks.lock(&policy_key(policy_id)).await;

        let policy = self
            .get(policy_id)
            .await
            .ok_or_else(|| RetentionError::not_found("Retention policy", policy_id))?;
        if !policy.is_active {
            return Err(RetentionError::validation(format!(
                "retention policy {} is inactive",
                policy_id
            )));
        }

        let now = Utc::now();
        let assignment = RetentionAssignment {
            evidence_ids: evidence_ids.to_vec(),
            policy_id: policy.id.clone(),
            expiry_date: policy.expiry_from(now),
            applied_by: self.gate.actor().id.clone(),
        };

        self.backend
            .apply_retention_policy(&assignment)
            .await
            .map_err(|e| {
                warn!(policy_id = %policy_id, error = %e, "Failed to apply retention policy");
                e
            })?;

        info!(
            policy_id = %policy_id,
            evidence_count = evidence_ids.len(),
            expiry_date = %assignment.expiry_date,
            "Retention policy applied"
        );

        self.audit
            .log(
                AdminAction::RetentionPolicyApplied,
                Some(policy_id),
                serde_json::json!({
                    "evidenceIds": assignment.evidence_ids,
                    "expiryDate": assignment.expiry_date,
                }),
            )
            .await;

        Ok(assignment)
    }
}
