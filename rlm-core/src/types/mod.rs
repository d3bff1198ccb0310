//! Domain types

pub mod actor;
pub mod evidence;
pub mod hold;
pub mod ids;
pub mod policy;

pub use actor::{Actor, Role};
pub use evidence::{
    ArchiveRequest, DeletionCheck, EvidenceRecord, HoldApplication, HoldRemoval,
    ModificationCheck, ReleaseRequest, RetentionAssignment,
};
pub use hold::{
    EvidenceDelta, HoldNotifications, LegalHold, LegalHoldDraft, LegalHoldUpdate,
    NotificationFrequency,
};
pub use ids::{IdGenerator, HOLD_ID_PREFIX, POLICY_ID_PREFIX};
pub use policy::{PolicyDraft, PolicyUpdate, RetentionPolicy, MAX_RETENTION_DAYS};
