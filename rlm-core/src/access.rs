//! Access Gate
//!
//! Single role check consulted by every mutating operation before any lock,
//! state change or network call.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

use crate::error::{RetentionError, RetentionResult};
use crate::types::{Actor, Role};

/// Access level required by an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    /// Administrators only (policies, archival)
    Admin,
    /// Roles allowed to manage legal holds
    Privileged,
}

impl AccessLevel {
    /// Whether `role` satisfies this level
    pub fn permits(&self, role: Role) -> bool {
        match self {
            AccessLevel::Admin => role == Role::Admin,
            AccessLevel::Privileged => matches!(
                role,
                Role::Admin | Role::LegalProfessional | Role::CourtOfficial | Role::EvidenceManager
            ),
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessLevel::Admin => write!(f, "admin"),
            AccessLevel::Privileged => write!(f, "privileged"),
        }
    }
}

/// Role-based gate bound to the session actor
#[derive(Debug, Clone)]
pub struct AccessGate {
    actor: Actor,
}

impl AccessGate {
    pub fn new(actor: Actor) -> Self {
        Self { actor }
    }

    /// Session actor
    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    /// Check the actor against a level
    pub fn authorize(&self, level: AccessLevel) -> bool {
        level.permits(self.actor.role)
    }

    /// Check the actor against a level, failing with `Authorization`
    pub fn require(&self, level: AccessLevel, operation: &str) -> RetentionResult<()> {
        if self.authorize(level) {
            return Ok(());
        }

        warn!(
            actor = %self.actor.id,
            role = %self.actor.role,
            required = %level,
            operation = operation,
            "Access denied"
        );

        Err(RetentionError::Authorization {
            operation: operation.to_string(),
            required: level,
            role: self.actor.role,
        })
    }
}
