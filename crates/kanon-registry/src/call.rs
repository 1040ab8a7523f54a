//! The wire shape of registry calls and their results.
//!
//! Calls are tagged by `op` with the operation names of the registry surface
//! (`registerDID`, `getSchema`, ...). Query results serialize as JSON arrays
//! mirroring the getter tuples, so an unknown key comes back as `["", ""]`
//! rather than an error.

use serde::{Deserialize, Serialize};

use crate::cred_def::CredentialDefinition;
use crate::did::DidDocument;
use crate::revocation::Credential;
use crate::schema::Schema;

/// A single request against the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Call {
    #[serde(rename = "registerDID")]
    RegisterDid {
        did: String,
        context: String,
        metadata: String,
    },
    #[serde(rename = "getDID")]
    GetDid { did: String },
    RegisterSchema {
        schema_id: String,
        details: String,
    },
    AddApprovedIssuer {
        schema_id: String,
        issuer_address: String,
    },
    RemoveApprovedIssuer {
        schema_id: String,
        issuer_address: String,
    },
    GetSchema { schema_id: String },
    IsApprovedIssuer {
        schema_id: String,
        issuer_address: String,
    },
    RegisterCredentialDefinition {
        cred_def_id: String,
        schema_id: String,
        issuer_address: String,
    },
    GetCredentialDefinition { cred_def_id: String },
    IssueCredential {
        cred_id: String,
        cred_def_id: String,
        issuer: String,
        subject: String,
        issuance_date: String,
        expiry_date: String,
        metadata: String,
    },
    RevokeCredential { cred_id: String },
    GetCredential { cred_id: String },
    CredentialStatus { cred_id: String },
}

impl Call {
    /// Operation name as it appears on the wire.
    pub fn op(&self) -> &'static str {
        match self {
            Self::RegisterDid { .. } => "registerDID",
            Self::GetDid { .. } => "getDID",
            Self::RegisterSchema { .. } => "registerSchema",
            Self::AddApprovedIssuer { .. } => "addApprovedIssuer",
            Self::RemoveApprovedIssuer { .. } => "removeApprovedIssuer",
            Self::GetSchema { .. } => "getSchema",
            Self::IsApprovedIssuer { .. } => "isApprovedIssuer",
            Self::RegisterCredentialDefinition { .. } => "registerCredentialDefinition",
            Self::GetCredentialDefinition { .. } => "getCredentialDefinition",
            Self::IssueCredential { .. } => "issueCredential",
            Self::RevokeCredential { .. } => "revokeCredential",
            Self::GetCredential { .. } => "getCredential",
            Self::CredentialStatus { .. } => "credentialStatus",
        }
    }

    /// Whether the call can change registry state.
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Self::RegisterDid { .. }
                | Self::RegisterSchema { .. }
                | Self::AddApprovedIssuer { .. }
                | Self::RemoveApprovedIssuer { .. }
                | Self::RegisterCredentialDefinition { .. }
                | Self::IssueCredential { .. }
                | Self::RevokeCredential { .. }
        )
    }
}

/// `getDID` result: `(context, metadata)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DidView(pub String, pub String);

/// `getSchema` result: `(details, approvedIssuers)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaView(pub String, pub Vec<String>);

/// `getCredentialDefinition` result: `(schemaId, issuerAddress)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredDefView(pub String, pub String);

/// `getCredential` result. All fields empty and `revoked == false` when the
/// credential is unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialView {
    pub cred_def_id: String,
    pub issuer: String,
    pub subject: String,
    pub issuance_date: String,
    pub expiry_date: String,
    pub metadata: String,
    pub revoked: bool,
}

/// Verifier-facing validity of a credential id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialStatus {
    Unknown,
    Active,
    Revoked,
}

impl From<Option<&DidDocument>> for DidView {
    fn from(doc: Option<&DidDocument>) -> Self {
        doc.map(|d| Self(d.context.clone(), d.metadata.clone()))
            .unwrap_or_default()
    }
}

impl From<Option<&Schema>> for SchemaView {
    fn from(schema: Option<&Schema>) -> Self {
        schema
            .map(|s| {
                Self(
                    s.details.clone(),
                    s.approved_issuers.iter().map(|a| a.to_string()).collect(),
                )
            })
            .unwrap_or_default()
    }
}

impl From<Option<&CredentialDefinition>> for CredDefView {
    fn from(def: Option<&CredentialDefinition>) -> Self {
        def.map(|d| Self(d.schema_id.to_string(), d.issuer.to_string()))
            .unwrap_or_default()
    }
}

impl From<Option<&Credential>> for CredentialView {
    fn from(credential: Option<&Credential>) -> Self {
        credential
            .map(|c| Self {
                cred_def_id: c.cred_def_id.to_string(),
                issuer: c.issuer.clone(),
                subject: c.subject.clone(),
                issuance_date: c.issuance_date.clone(),
                expiry_date: c.expiry_date.clone(),
                metadata: c.metadata.clone(),
                revoked: c.is_revoked(),
            })
            .unwrap_or_default()
    }
}

impl From<Option<&Credential>> for CredentialStatus {
    fn from(credential: Option<&Credential>) -> Self {
        match credential {
            None => Self::Unknown,
            Some(c) if c.is_revoked() => Self::Revoked,
            Some(_) => Self::Active,
        }
    }
}

/// Result of a successful call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    /// A write was applied.
    Ack,
    Did(DidView),
    Schema(SchemaView),
    CredentialDefinition(CredDefView),
    Credential(CredentialView),
    Approved(bool),
    Status(CredentialStatus),
}
