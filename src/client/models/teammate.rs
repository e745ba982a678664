//! Teammate models

use serde::{Deserialize, Serialize};

/// Role preset constraining a teammate's default permission set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    /// Billing and account management access
    Accountant,
    /// API keys, mail settings, and integration access
    Developer,
    /// Campaign and contact management access
    Marketer,
    /// Read-only access
    Observer,
}

impl std::fmt::Display for Persona {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Persona::Accountant => write!(f, "accountant"),
            Persona::Developer => write!(f, "developer"),
            Persona::Marketer => write!(f, "marketer"),
            Persona::Observer => write!(f, "observer"),
        }
    }
}

/// Teammate account record, identified externally by email
///
/// `email`, `first_name`, and `last_name` are required when decoding a
/// response body; a body missing any of them fails to parse rather than
/// producing a partially populated record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Teammate {
    /// Server-assigned username; empty until the account exists
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub username: String,

    /// Email address, used to route read/update/delete requests
    pub email: String,

    /// First name
    pub first_name: String,

    /// Last name
    pub last_name: String,

    /// Whether the teammate has administrator access
    #[serde(default)]
    pub is_admin: bool,

    /// Role preset; admins have no persona
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persona: Option<Persona>,

    /// Permission scope tokens; duplicates are not deduplicated by this layer
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scopes: Vec<String>,
}

/// Write-side field set for create and update calls
///
/// The full field set is always sent; the server assigns the username.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeammateRequest {
    /// Email address of the teammate
    pub email: String,

    /// First name
    pub first_name: String,

    /// Last name
    pub last_name: String,

    /// Whether to grant administrator access
    #[serde(default)]
    pub is_admin: bool,

    /// Role preset; omitted from the body when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persona: Option<Persona>,

    /// Permission scope tokens; omitted from the body when empty
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scopes: Vec<String>,
}

impl From<&Teammate> for TeammateRequest {
    fn from(teammate: &Teammate) -> Self {
        TeammateRequest {
            email: teammate.email.clone(),
            first_name: teammate.first_name.clone(),
            last_name: teammate.last_name.clone(),
            is_admin: teammate.is_admin,
            persona: teammate.persona,
            scopes: teammate.scopes.clone(),
        }
    }
}
