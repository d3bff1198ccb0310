//! Retention Lifecycle Manager
//!
//! Retention-policy and legal-hold lifecycle for evidence-management
//! systems: policy CRUD, legal holds, deletion/modification guards,
//! expiry warnings and auto-archival.
//!
//! # Components
//!
//! - **PolicyStore**: admin-only retention policies, session cached
//! - **LegalHoldStore**: legal holds and their evidence bookkeeping
//! - **DeletionGuard**: advisory checks against live evidence status
//! - **ExpiryScheduler**: periodic warnings and auto-archival
//! - **AuditLogger** / **NotificationDispatcher**: best-effort side channels
//!
//! All persistence goes through a [`RetentionBackend`]; [`HttpBackend`]
//! talks to the evidence-management REST API.
//!
//! # Usage
//!
//! ```ignore
//! use rlm_core::{Actor, ManagerConfig, PolicyDraft, RetentionLifecycleManager, Role};
//!
//! async fn example() -> rlm_core::RetentionResult<()> {
//!     let actor = Actor::new("0xadmin", Role::Admin);
//!     let manager = RetentionLifecycleManager::connect(actor, ManagerConfig::from_env())?;
//!     manager.initialize().await?;
//!
//!     let policy = manager
//!         .policies()
//!         .create(PolicyDraft {
//!             name: "Case Files 1yr".to_string(),
//!             retention_days: 365,
//!             ..Default::default()
//!         })
//!         .await?;
//!     manager
//!         .policies()
//!         .apply(&["EV-1".to_string()], &policy.id)
//!         .await?;
//!
//!     let scheduler = manager.start_scheduler();
//!     // ...
//!     if let Some(handle) = scheduler {
//!         handle.shutdown().await;
//!     }
//!     Ok(())
//! }
//! ```

pub mod access;
pub mod archive;
pub mod audit;
pub mod backend;
pub mod config;
pub mod error;
pub mod guard;
pub mod hold_store;
pub mod locks;
pub mod manager;
pub mod notify;
pub mod policy_store;
pub mod scheduler;
pub mod telemetry;
#[cfg(test)]
mod testing;
pub mod types;

pub use access::{AccessGate, AccessLevel};
pub use archive::EvidenceArchiver;
pub use audit::{AdminAction, AuditLogger, AuditRecord, JournalEntry};
pub use backend::{HttpBackend, RetentionBackend};
pub use config::{ManagerConfig, SchedulerConfig};
pub use error::{RetentionError, RetentionResult};
pub use guard::{DeletionGuard, GuardVerdict};
pub use hold_store::{HoldOutcome, LegalHoldStats, LegalHoldStore, SideEffectReport};
pub use locks::EntityLocks;
pub use manager::RetentionLifecycleManager;
pub use notify::{DeliveryStatus, HoldEvent, Notification, NotificationDispatcher, NotificationKind};
pub use policy_store::PolicyStore;
pub use scheduler::{ExpiryScheduler, SchedulerCommand, SchedulerHandle, TickReport};
pub use types::{
    Actor, ArchiveRequest, DeletionCheck, EvidenceRecord, LegalHold, LegalHoldDraft,
    LegalHoldUpdate, ModificationCheck, NotificationFrequency, PolicyDraft, PolicyUpdate,
    RetentionAssignment, RetentionPolicy, Role,
};
