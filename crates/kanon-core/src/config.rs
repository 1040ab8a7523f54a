use serde::{Deserialize, Serialize};
use std::fmt;

/// What happens when a write targets a key that is already registered.
///
/// Credentials are exempt: a credential id can never be re-issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReregistrationPolicy {
    /// Existing records are append-only; conflicting writes fail.
    #[default]
    Reject,
    /// Later writes replace earlier ones.
    Overwrite,
}

/// Whether issuer approval is checked by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthorizationPolicy {
    /// No issuer checks: any caller may register definitions, issue and revoke.
    #[default]
    Open,
    /// Credential definitions require an approved issuer, and only that
    /// issuer may issue or revoke credentials under the definition.
    Enforced,
}

impl fmt::Display for ReregistrationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reject => write!(f, "reject"),
            Self::Overwrite => write!(f, "overwrite"),
        }
    }
}

impl fmt::Display for AuthorizationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Enforced => write!(f, "enforced"),
        }
    }
}

/// Policy knobs for a Kanon registry instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Re-registration behaviour for DIDs, schemas and credential definitions.
    #[serde(default)]
    pub reregistration: ReregistrationPolicy,
    /// Issuer authorization behaviour.
    #[serde(default)]
    pub authorization: AuthorizationPolicy,
}

impl RegistryConfig {
    /// Whether an existing record may be replaced.
    pub fn allows_overwrite(&self) -> bool {
        self.reregistration == ReregistrationPolicy::Overwrite
    }

    /// Whether issuer checks are enforced.
    pub fn enforces_authorization(&self) -> bool {
        self.authorization == AuthorizationPolicy::Enforced
    }
}
