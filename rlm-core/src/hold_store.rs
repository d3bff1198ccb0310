//! Legal Hold Store
//!
//! Session cache of legal holds plus the evidence-side bookkeeping that
//! follows each hold mutation.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::access::{AccessGate, AccessLevel};
use crate::audit::{AdminAction, AuditLogger};
use crate::backend::RetentionBackend;
use crate::error::{RetentionError, RetentionResult};
use crate::locks::{hold_key, EntityLocks};
use crate::notify::{DeliveryStatus, HoldEvent, NotificationDispatcher};
use crate::types::{
    EvidenceDelta, HoldApplication, HoldRemoval, IdGenerator, LegalHold, LegalHoldDraft,
    LegalHoldUpdate, ReleaseRequest, HOLD_ID_PREFIX,
};

/// Best-effort work that followed a persisted hold mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SideEffectReport {
    /// Failed evidence apply/remove calls
    pub evidence_sync_errors: Vec<String>,
    pub notification: DeliveryStatus,
    pub audit_recorded: bool,
}

impl Default for SideEffectReport {
    fn default() -> Self {
        Self {
            evidence_sync_errors: Vec::new(),
            notification: DeliveryStatus::Skipped,
            audit_recorded: false,
        }
    }
}

impl SideEffectReport {
    /// Whether every side effect went through
    pub fn is_clean(&self) -> bool {
        self.evidence_sync_errors.is_empty() && !self.notification.is_failed() && self.audit_recorded
    }
}

/// Result of a hold mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldOutcome {
    pub hold: LegalHold,
    pub side_effects: SideEffectReport,
}

/// Hold statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegalHoldStats {
    pub total_holds: usize,
    pub active_holds: usize,
    pub released_holds: usize,
    /// Distinct evidence ids under an active hold
    pub evidence_under_hold: usize,
}

/// Legal hold store
pub struct LegalHoldStore {
    /// Holds by ID
    holds: RwLock<HashMap<String, LegalHold>>,
    backend: Arc<dyn RetentionBackend>,
    gate: Arc<AccessGate>,
    audit: Arc<AuditLogger>,
    notifier: Arc<NotificationDispatcher>,
    locks: Arc<EntityLocks>,
    ids: Arc<IdGenerator>,
}

impl LegalHoldStore {
    pub fn new(
        backend: Arc<dyn RetentionBackend>,
        gate: Arc<AccessGate>,
        audit: Arc<AuditLogger>,
        notifier: Arc<NotificationDispatcher>,
        locks: Arc<EntityLocks>,
        ids: Arc<IdGenerator>,
    ) -> Self {
        Self {
            holds: RwLock::new(HashMap::new()),
            backend,
            gate,
            audit,
            notifier,
            locks,
            ids,
        }
    }

    /// Replace the cache with the backend's hold table
    pub async fn refresh(&self) -> RetentionResult<usize> {
        let loaded = self.backend.list_holds().await?;
        let count = loaded.len();

        let mut holds = self.holds.write().await;
        holds.clear();
        holds.extend(loaded.into_iter().map(|h| (h.id.clone(), h)));

        info!(count = count, "Legal holds loaded");
        Ok(count)
    }

    /// Get a cached hold
    pub async fn get(&self, hold_id: &str) -> Option<LegalHold> {
        self.holds.read().await.get(hold_id).cloned()
    }

    /// All cached holds, oldest first
    pub async fn list(&self) -> Vec<LegalHold> {
        let mut holds: Vec<_> = self.holds.read().await.values().cloned().collect();
        holds.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        holds
    }

    /// Active cached holds, oldest first
    pub async fn active(&self) -> Vec<LegalHold> {
        self.list().await.into_iter().filter(|h| h.is_active).collect()
    }

    /// Active holds covering an evidence item
    pub async fn holds_for_evidence(&self, evidence_id: &str) -> Vec<LegalHold> {
        self.active()
            .await
            .into_iter()
            .filter(|h| h.evidence_ids.contains(evidence_id))
            .collect()
    }

    /// Holds for a case
    pub async fn holds_for_case(&self, case_id: &str) -> Vec<LegalHold> {
        self.list()
            .await
            .into_iter()
            .filter(|h| h.case_id == case_id)
            .collect()
    }

    pub async fn stats(&self) -> LegalHoldStats {
        let holds = self.holds.read().await;
        let active_holds = holds.values().filter(|h| h.is_active).count();
        let evidence_under_hold: BTreeSet<&String> = holds
            .values()
            .filter(|h| h.is_active)
            .flat_map(|h| h.evidence_ids.iter())
            .collect();

        LegalHoldStats {
            total_holds: holds.len(),
            active_holds,
            released_holds: holds.len() - active_holds,
            evidence_under_hold: evidence_under_hold.len(),
        }
    }

    /// Create a hold and place it on its evidence
    pub async fn create(&self, draft: LegalHoldDraft) -> RetentionResult<HoldOutcome> {
        self.gate
            .require(AccessLevel::Privileged, "create legal hold")?;

        let actor = self.gate.actor();
        let hold = LegalHold::from_draft(
            self.ids.next(HOLD_ID_PREFIX),
            draft,
            &actor.id,
            Utc::now(),
        )?;

        let _guard = self.locks.lock(&hold_key(&hold.id)).await;

        self.backend.create_hold(&hold).await.map_err(|e| {
            warn!(hold_id = %hold.id, error = %e, "Failed to create legal hold");
            e
        })?;

        self.holds
            .write()
            .await
            .insert(hold.id.clone(), hold.clone());

        info!(
            hold_id = %hold.id,
            case_id = %hold.case_id,
            evidence_count = hold.evidence_count(),
            "Legal hold created"
        );

        let no_prior = BTreeSet::new();
        let evidence_sync_errors = self
            .sync_evidence_holds(&no_prior, &hold.evidence_ids, &hold.id)
            .await;
        let notification = self
            .notifier
            .notify_hold_event(&hold, HoldEvent::Created)
            .await;
        let audit_recorded = self
            .audit
            .log(
                AdminAction::LegalHoldCreated,
                Some(&hold.id),
                serde_json::json!({
                    "caseId": hold.case_id,
                    "evidenceCount": hold.evidence_count(),
                }),
            )
            .await;

        Ok(HoldOutcome {
            hold,
            side_effects: SideEffectReport {
                evidence_sync_errors,
                notification,
                audit_recorded,
            },
        })
    }

    /// Update an active hold
    pub async fn update(
        &self,
        hold_id: &str,
        updates: LegalHoldUpdate,
    ) -> RetentionResult<HoldOutcome> {
        self.gate
            .require(AccessLevel::Privileged, "update legal hold")?;

        let _guard = self.locks.lock(&hold_key(hold_id)).await;

        let current = self
            .get(hold_id)
            .await
            .ok_or_else(|| RetentionError::not_found("Legal hold", hold_id))?;

        let actor = self.gate.actor();
        let updated = current.merged(&updates, &actor.id, Utc::now())?;

        self.backend.update_hold(&updated).await.map_err(|e| {
            warn!(hold_id = %hold_id, error = %e, "Failed to update legal hold");
            e
        })?;

        self.holds
            .write()
            .await
            .insert(hold_id.to_string(), updated.clone());

        info!(hold_id = %hold_id, "Legal hold updated");

        let evidence_sync_errors = if updates.evidence_ids.is_some() {
            self.sync_evidence_holds(&current.evidence_ids, &updated.evidence_ids, hold_id)
                .await
        } else {
            Vec::new()
        };

        let audit_recorded = self
            .audit
            .log(
                AdminAction::LegalHoldUpdated,
                Some(hold_id),
                serde_json::json!({ "changes": updates }),
            )
            .await;

        Ok(HoldOutcome {
            hold: updated,
            side_effects: SideEffectReport {
                evidence_sync_errors,
                notification: DeliveryStatus::Skipped,
                audit_recorded,
            },
        })
    }

    /// Release an active hold and lift it from its evidence
    pub async fn release(&self, hold_id: &str, reason: &str) -> RetentionResult<HoldOutcome> {
        self.gate
            .require(AccessLevel::Privileged, "release legal hold")?;

        let _guard = self.locks.lock(&hold_key(hold_id)).await;

        let current = self
            .get(hold_id)
            .await
            .ok_or_else(|| RetentionError::not_found("Legal hold", hold_id))?;

        let actor = self.gate.actor();
        let released = current.released(reason, &actor.id, Utc::now())?;

        let request = ReleaseRequest {
            release_reason: reason.to_string(),
        };
        self.backend
            .release_hold(hold_id, &request)
            .await
            .map_err(|e| {
                warn!(hold_id = %hold_id, error = %e, "Failed to release legal hold");
                e
            })?;

        self.holds
            .write()
            .await
            .insert(hold_id.to_string(), released.clone());

        info!(
            hold_id = %hold_id,
            evidence_count = released.evidence_count(),
            "Legal hold released"
        );

        let none_after = BTreeSet::new();
        let evidence_sync_errors = self
            .sync_evidence_holds(&released.evidence_ids, &none_after, hold_id)
            .await;
        let notification = self
            .notifier
            .notify_hold_event(&released, HoldEvent::Released)
            .await;
        let audit_recorded = self
            .audit
            .log(
                AdminAction::LegalHoldReleased,
                Some(hold_id),
                serde_json::json!({
                    "releaseReason": reason,
                    "evidenceCount": released.evidence_count(),
                }),
            )
            .await;

        Ok(HoldOutcome {
            hold: released,
            side_effects: SideEffectReport {
                evidence_sync_errors,
                notification,
                audit_recorded,
            },
        })
    }

    /// Bring evidence records in line with a hold's new evidence list.
    ///
    /// Issues at most one removal call (ids only in `old`) and one
    /// application call (ids only in `new`). Returns the failures, which
    /// are logged but not raised. Callers must already hold the
    /// privileged gate and the hold's lock.
    async fn sync_evidence_holds(
        &self,
        old: &BTreeSet<String>,
        new: &BTreeSet<String>,
        hold_id: &str,
    ) -> Vec<String> {
        let delta = EvidenceDelta::between(old, new);
        let actor_id = self.gate.actor().id.clone();
        let mut errors = Vec::new();

        if !delta.removed.is_empty() {
            let removal = HoldRemoval {
                evidence_ids: delta.removed.iter().cloned().collect(),
                hold_id: hold_id.to_string(),
                removed_by: actor_id.clone(),
            };
            if let Err(e) = self.backend.remove_legal_hold(&removal).await {
                warn!(
                    hold_id = %hold_id,
                    evidence_count = removal.evidence_ids.len(),
                    error = %e,
                    "Failed to remove legal hold from evidence"
                );
                errors.push(e.to_string());
            }
        }

        if !delta.added.is_empty() {
            let application = HoldApplication {
                evidence_ids: delta.added.iter().cloned().collect(),
                hold_id: hold_id.to_string(),
                applied_by: actor_id,
            };
            if let Err(e) = self.backend.apply_legal_hold(&application).await {
                warn!(
                    hold_id = %hold_id,
                    evidence_count = application.evidence_ids.len(),
                    error = %e,
                    "Failed to apply legal hold to evidence"
                );
                errors.push(e.to_string());
            }
        }

        errors
    }
}
