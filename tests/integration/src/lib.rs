//! Fixtures shared by the integration scenarios.

use std::path::{Path, PathBuf};

use kanon_registry::Call;

/// The issuer address used throughout the scenarios.
pub const ISSUER: &str = "0x1234567890123456789012345678901234567890";

pub fn register_did(did: &str) -> Call {
    Call::RegisterDid {
        did: did.into(),
        context: "context".into(),
        metadata: "metadata".into(),
    }
}

pub fn register_schema(schema_id: &str) -> Call {
    Call::RegisterSchema {
        schema_id: schema_id.into(),
        details: "details".into(),
    }
}

pub fn approve(schema_id: &str, issuer: &str) -> Call {
    Call::AddApprovedIssuer {
        schema_id: schema_id.into(),
        issuer_address: issuer.into(),
    }
}

pub fn register_cred_def(cred_def_id: &str, schema_id: &str, issuer: &str) -> Call {
    Call::RegisterCredentialDefinition {
        cred_def_id: cred_def_id.into(),
        schema_id: schema_id.into(),
        issuer_address: issuer.into(),
    }
}

pub fn issue(cred_id: &str, cred_def_id: &str) -> Call {
    Call::IssueCredential {
        cred_id: cred_id.into(),
        cred_def_id: cred_def_id.into(),
        issuer: "issuer".into(),
        subject: "subject".into(),
        issuance_date: "issuanceDate".into(),
        expiry_date: "expiryDate".into(),
        metadata: "metadata".into(),
    }
}

pub fn revoke(cred_id: &str) -> Call {
    Call::RevokeCredential {
        cred_id: cred_id.into(),
    }
}

/// The calls that prepare `schemaId` and `credDefId` for issuance.
pub fn setup_calls() -> Vec<Call> {
    vec![
        register_schema("schemaId"),
        approve("schemaId", ISSUER),
        register_cred_def("credDefId", "schemaId", ISSUER),
    ]
}

/// A temporary data directory removed on drop.
pub struct TempDir(PathBuf);

impl TempDir {
    pub fn new(prefix: &str) -> Self {
        let path = std::env::temp_dir().join(format!("{}-{}", prefix, rand::random::<u64>()));
        tracing::debug!(path = %path.display(), "temp dir");
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        std::fs::remove_dir_all(&self.0).ok();
    }
}
