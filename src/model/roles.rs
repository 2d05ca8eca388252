use serde::{Deserialize, Serialize};
use std::fmt;

const DIRECTOR_ROLES: &[&str] = &[
    "director",
    "corporate-director",
    "nominee-director",
    "corporate-nominee-director",
];

const SECRETARIAL_ROLES: &[&str] = &[
    "secretary",
    "corporate-secretary",
    "nominee-secretary",
    "corporate-nominee-secretary",
];

const LLP_ROLES: &[&str] = &[
    "llp-member",
    "corporate-llp-member",
    "llp-designated-member",
    "corporate-llp-designated-member",
    "limited-partner-in-a-limited-partnership",
];

/// Statutory register classes a company may hold publicly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegisterType {
    Directors,
    Secretaries,
    LlpMembers,
}

impl RegisterType {
    /// Parses the request parameter; anything outside the three classes is
    /// a client error handled by the caller.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "directors" => Some(Self::Directors),
            "secretaries" => Some(Self::Secretaries),
            "llp_members" => Some(Self::LlpMembers),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Directors => "directors",
            Self::Secretaries => "secretaries",
            Self::LlpMembers => "llp_members",
        }
    }

    /// Returns true when `officer_role` belongs to this register class.
    pub fn matches_role(&self, officer_role: &str) -> bool {
        match self {
            Self::Directors => is_director(officer_role),
            Self::Secretaries => is_secretary(officer_role),
            Self::LlpMembers => is_llp_member(officer_role),
        }
    }
}

impl fmt::Display for RegisterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn is_director(officer_role: &str) -> bool {
    DIRECTOR_ROLES.contains(&officer_role)
}

pub fn is_secretary(officer_role: &str) -> bool {
    SECRETARIAL_ROLES.contains(&officer_role)
}

pub fn is_llp_member(officer_role: &str) -> bool {
    LLP_ROLES.contains(&officer_role)
}
