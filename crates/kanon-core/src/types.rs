use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

/// Declares an opaque, non-empty string identifier.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Create an identifier, rejecting the empty string.
            pub fn new(id: impl Into<String>) -> Result<Self, CoreError> {
                let id = id.into();
                if id.is_empty() {
                    return Err(CoreError::MissingField($field.into()));
                }
                Ok(Self(id))
            }

            /// Get the identifier string.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the identifier, returning the inner string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Decentralized Identifier key. The method prefix is a caller convention
    /// and is not enforced.
    Did,
    "did"
);

string_id!(
    /// Identifier for a credential schema.
    SchemaId,
    "schemaId"
);

string_id!(
    /// Identifier for a credential definition.
    CredDefId,
    "credDefId"
);

string_id!(
    /// Identifier for an issued credential.
    CredentialId,
    "credId"
);

/// A ledger account address: `0x` followed by 40 hex digits, kept lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// Length of an address in bytes.
    pub const BYTES: usize = 20;

    /// Parse and normalize an address string.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let digits = raw
            .strip_prefix("0x")
            .or_else(|| raw.strip_prefix("0X"))
            .ok_or_else(|| CoreError::InvalidAddress(format!("missing 0x prefix: {}", raw)))?;

        if digits.len() != Self::BYTES * 2 {
            return Err(CoreError::InvalidAddress(format!(
                "expected {} hex digits, got {}: {}",
                Self::BYTES * 2,
                digits.len(),
                raw
            )));
        }

        let bytes = hex::decode(digits)
            .map_err(|e| CoreError::InvalidAddress(format!("{}: {}", raw, e)))?;

        Ok(Self(format!("0x{}", hex::encode(bytes))))
    }

    /// Get the normalized address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Address {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The attested identity submitting a call.
///
/// Attestation happens outside the registry; the value is opaque here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Caller(String);

impl Caller {
    /// Identity used when the transport attests nobody.
    pub const ANONYMOUS: &'static str = "anonymous";

    pub fn new(identity: impl Into<String>) -> Self {
        Self(identity.into())
    }

    pub fn anonymous() -> Self {
        Self(Self::ANONYMOUS.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this caller is the holder of `address`.
    pub fn is(&self, address: &Address) -> bool {
        self.0.eq_ignore_ascii_case(address.as_str())
    }
}

impl Default for Caller {
    fn default() -> Self {
        Self::anonymous()
    }
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
