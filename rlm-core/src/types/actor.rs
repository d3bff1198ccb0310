//! Actor and role model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role of the current user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// System administrator
    Admin,
    /// Case investigator
    Investigator,
    /// Forensic analyst
    ForensicAnalyst,
    /// Legal professional (counsel)
    LegalProfessional,
    /// Court official
    CourtOfficial,
    /// Evidence custodian
    EvidenceManager,
    /// Read-only auditor
    Auditor,
    /// Public viewer (minimal access)
    PublicViewer,
}

impl Role {
    /// Every role, in declaration order
    pub const ALL: [Role; 8] = [
        Role::Admin,
        Role::Investigator,
        Role::ForensicAnalyst,
        Role::LegalProfessional,
        Role::CourtOfficial,
        Role::EvidenceManager,
        Role::Auditor,
        Role::PublicViewer,
    ];

    /// Wire name of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Investigator => "investigator",
            Role::ForensicAnalyst => "forensic_analyst",
            Role::LegalProfessional => "legal_professional",
            Role::CourtOfficial => "court_official",
            Role::EvidenceManager => "evidence_manager",
            Role::Auditor => "auditor",
            Role::PublicViewer => "public_viewer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s.trim())
            .ok_or_else(|| format!("unknown role: {}", s))
    }
}

/// The user on whose behalf the manager acts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Wallet address or user identifier
    pub id: String,
    /// Role
    pub role: Role,
}

impl Actor {
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }
}
