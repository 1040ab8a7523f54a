use serde::{Deserialize, Serialize};
use std::fmt;

use kanon_core::{Address, Caller, CredDefId, CredentialId, Did, RegistryConfig, SchemaId};

use crate::call::{
    Call, CredDefView, CredentialStatus, CredentialView, DidView, Outcome, SchemaView,
};
use crate::cred_def::{CredentialDefinition, CredentialDefinitionRegistry};
use crate::did::{DidDocument, DidRegistry};
use crate::error::RegistryError;
use crate::revocation::{Credential, NewCredential, RevocationRegistry};
use crate::schema::{Schema, SchemaRegistry};

/// The four keyed namespaces of the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Namespace {
    Dids,
    Schemas,
    CredDefs,
    Credentials,
}

impl Namespace {
    pub const ALL: [Namespace; 4] = [
        Namespace::Dids,
        Namespace::Schemas,
        Namespace::CredDefs,
        Namespace::Credentials,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dids => "dids",
            Self::Schemas => "schemas",
            Self::CredDefs => "cred_defs",
            Self::Credentials => "credentials",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single keyed record, as persisted by a ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Did(String, DidDocument),
    Schema(String, Schema),
    CredDef(String, CredentialDefinition),
    Credential(String, Credential),
}

impl Record {
    pub fn namespace(&self) -> Namespace {
        match self {
            Self::Did(..) => Namespace::Dids,
            Self::Schema(..) => Namespace::Schemas,
            Self::CredDef(..) => Namespace::CredDefs,
            Self::Credential(..) => Namespace::Credentials,
        }
    }

    pub fn key(&self) -> &str {
        match self {
            Self::Did(key, _)
            | Self::Schema(key, _)
            | Self::CredDef(key, _)
            | Self::Credential(key, _) => key,
        }
    }

    /// Serialize the record value (without its key) as JSON.
    pub fn value_json(&self) -> serde_json::Result<Vec<u8>> {
        match self {
            Self::Did(_, v) => serde_json::to_vec(v),
            Self::Schema(_, v) => serde_json::to_vec(v),
            Self::CredDef(_, v) => serde_json::to_vec(v),
            Self::Credential(_, v) => serde_json::to_vec(v),
        }
    }

    /// Decode a record value stored under `key` in `namespace`.
    pub fn from_json(namespace: Namespace, key: String, value: &[u8]) -> serde_json::Result<Self> {
        Ok(match namespace {
            Namespace::Dids => Self::Did(key, serde_json::from_slice(value)?),
            Namespace::Schemas => Self::Schema(key, serde_json::from_slice(value)?),
            Namespace::CredDefs => Self::CredDef(key, serde_json::from_slice(value)?),
            Namespace::Credentials => Self::Credential(key, serde_json::from_slice(value)?),
        })
    }
}

/// The Kanon trust registry: the single entry surface over the DID, schema,
/// credential definition and revocation registries.
///
/// Every write takes `&mut self`; callers that share an instance must
/// serialize access to it.
pub struct Kanon {
    config: RegistryConfig,
    dids: DidRegistry,
    schemas: SchemaRegistry,
    cred_defs: CredentialDefinitionRegistry,
    credentials: RevocationRegistry,
}

impl Kanon {
    /// Create an empty registry.
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            dids: DidRegistry::new(config),
            schemas: SchemaRegistry::new(config),
            cred_defs: CredentialDefinitionRegistry::new(config),
            credentials: RevocationRegistry::new(config),
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Execute one call on behalf of `caller`.
    ///
    /// Either the whole call applies or nothing changes.
    pub fn execute(&mut self, caller: &Caller, call: Call) -> Result<Outcome, RegistryError> {
        let op = call.op();
        let result = self.dispatch(caller, call);
        match &result {
            Ok(_) => tracing::debug!(op, caller = %caller, "call executed"),
            Err(e) => {
                tracing::warn!(op, caller = %caller, kind = e.kind(), error = %e, "call rejected")
            }
        }
        result
    }

    fn dispatch(&mut self, caller: &Caller, call: Call) -> Result<Outcome, RegistryError> {
        let outcome = match call {
            Call::RegisterDid {
                did,
                context,
                metadata,
            } => {
                self.register_did(&did, context, metadata)?;
                Outcome::Ack
            }
            Call::GetDid { did } => Outcome::Did(self.get_did(&did)),
            Call::RegisterSchema { schema_id, details } => {
                self.register_schema(&schema_id, details)?;
                Outcome::Ack
            }
            Call::AddApprovedIssuer {
                schema_id,
                issuer_address,
            } => {
                self.add_approved_issuer(&schema_id, &issuer_address)?;
                Outcome::Ack
            }
            Call::RemoveApprovedIssuer {
                schema_id,
                issuer_address,
            } => {
                self.remove_approved_issuer(&schema_id, &issuer_address)?;
                Outcome::Ack
            }
            Call::GetSchema { schema_id } => Outcome::Schema(self.get_schema(&schema_id)),
            Call::IsApprovedIssuer {
                schema_id,
                issuer_address,
            } => Outcome::Approved(self.is_approved_issuer(&schema_id, &issuer_address)?),
            Call::RegisterCredentialDefinition {
                cred_def_id,
                schema_id,
                issuer_address,
            } => {
                self.register_credential_definition(&cred_def_id, &schema_id, &issuer_address)?;
                Outcome::Ack
            }
            Call::GetCredentialDefinition { cred_def_id } => {
                Outcome::CredentialDefinition(self.get_credential_definition(&cred_def_id))
            }
            Call::IssueCredential {
                cred_id,
                cred_def_id,
                issuer,
                subject,
                issuance_date,
                expiry_date,
                metadata,
            } => {
                let new = NewCredential {
                    cred_id: CredentialId::new(cred_id)?,
                    cred_def_id: CredDefId::new(cred_def_id)?,
                    issuer,
                    subject,
                    issuance_date,
                    expiry_date,
                    metadata,
                };
                self.issue_credential(caller, new)?;
                Outcome::Ack
            }
            Call::RevokeCredential { cred_id } => {
                self.revoke_credential(caller, &cred_id)?;
                Outcome::Ack
            }
            Call::GetCredential { cred_id } => Outcome::Credential(self.get_credential(&cred_id)),
            Call::CredentialStatus { cred_id } => {
                Outcome::Status(self.credential_status(&cred_id))
            }
        };
        Ok(outcome)
    }

    // --- DID registry ---

    pub fn register_did(
        &mut self,
        did: &str,
        context: String,
        metadata: String,
    ) -> Result<(), RegistryError> {
        let did = Did::new(did)?;
        self.dids.register(&did, context, metadata)
    }

    /// `(context, metadata)`, or empty strings for an unknown DID.
    pub fn get_did(&self, did: &str) -> DidView {
        DidView::from(self.dids.get(did))
    }

    /// Unambiguous DID lookup.
    pub fn resolve_did(&self, did: &str) -> Option<&DidDocument> {
        self.dids.get(did)
    }

    // --- Schema registry ---

    pub fn register_schema(
        &mut self,
        schema_id: &str,
        details: String,
    ) -> Result<(), RegistryError> {
        let schema_id = SchemaId::new(schema_id)?;
        self.schemas.register(&schema_id, details)
    }

    pub fn add_approved_issuer(
        &mut self,
        schema_id: &str,
        issuer_address: &str,
    ) -> Result<(), RegistryError> {
        let schema_id = SchemaId::new(schema_id)?;
        let issuer = Address::parse(issuer_address)?;
        self.schemas.add_approved_issuer(&schema_id, issuer);
        Ok(())
    }

    pub fn remove_approved_issuer(
        &mut self,
        schema_id: &str,
        issuer_address: &str,
    ) -> Result<(), RegistryError> {
        let schema_id = SchemaId::new(schema_id)?;
        let issuer = Address::parse(issuer_address)?;
        self.schemas.remove_approved_issuer(&schema_id, &issuer)?;
        Ok(())
    }

    /// `(details, approvedIssuers)`, or `("", [])` for an unknown schema.
    pub fn get_schema(&self, schema_id: &str) -> SchemaView {
        SchemaView::from(self.schemas.get(schema_id))
    }

    pub fn is_approved_issuer(
        &self,
        schema_id: &str,
        issuer_address: &str,
    ) -> Result<bool, RegistryError> {
        let issuer = Address::parse(issuer_address)?;
        Ok(self.schemas.is_approved(schema_id, &issuer))
    }

    // --- Credential definition registry ---

    pub fn register_credential_definition(
        &mut self,
        cred_def_id: &str,
        schema_id: &str,
        issuer_address: &str,
    ) -> Result<(), RegistryError> {
        let cred_def_id = CredDefId::new(cred_def_id)?;
        let schema_id = SchemaId::new(schema_id)?;
        let issuer = Address::parse(issuer_address)?;
        self.cred_defs
            .register(&self.schemas, &cred_def_id, schema_id, issuer)
    }

    /// `(schemaId, issuerAddress)`, or empty strings for an unknown definition.
    pub fn get_credential_definition(&self, cred_def_id: &str) -> CredDefView {
        CredDefView::from(self.cred_defs.get(cred_def_id))
    }

    // --- Revocation registry ---

    pub fn issue_credential(
        &mut self,
        caller: &Caller,
        new: NewCredential,
    ) -> Result<(), RegistryError> {
        self.credentials.issue(&self.cred_defs, caller, new)
    }

    pub fn revoke_credential(
        &mut self,
        caller: &Caller,
        cred_id: &str,
    ) -> Result<(), RegistryError> {
        let cred_id =
            CredentialId::new(cred_id).map_err(|_| RegistryError::CredentialNotFound {
                cred_id: cred_id.to_string(),
            })?;
        self.credentials.revoke(&self.cred_defs, caller, &cred_id)
    }

    /// Full credential record, or a zero-value record for an unknown id.
    pub fn get_credential(&self, cred_id: &str) -> CredentialView {
        CredentialView::from(self.credentials.get(cred_id))
    }

    pub fn credential_status(&self, cred_id: &str) -> CredentialStatus {
        CredentialStatus::from(self.credentials.get(cred_id))
    }

    // --- Persistence support ---

    /// The record stored under `key` in `namespace`, if any.
    pub fn record(&self, namespace: Namespace, key: &str) -> Option<Record> {
        let key_owned = key.to_string();
        match namespace {
            Namespace::Dids => self.dids.get(key).cloned().map(|v| Record::Did(key_owned, v)),
            Namespace::Schemas => self
                .schemas
                .get(key)
                .cloned()
                .map(|v| Record::Schema(key_owned, v)),
            Namespace::CredDefs => self
                .cred_defs
                .get(key)
                .cloned()
                .map(|v| Record::CredDef(key_owned, v)),
            Namespace::Credentials => self
                .credentials
                .get(key)
                .cloned()
                .map(|v| Record::Credential(key_owned, v)),
        }
    }

    /// Every record in `namespace`, ordered by key.
    pub fn records(&self, namespace: Namespace) -> Vec<Record> {
        let mut records: Vec<Record> = match namespace {
            Namespace::Dids => self
                .dids
                .iter()
                .map(|(k, v)| Record::Did(k.clone(), v.clone()))
                .collect(),
            Namespace::Schemas => self
                .schemas
                .iter()
                .map(|(k, v)| Record::Schema(k.clone(), v.clone()))
                .collect(),
            Namespace::CredDefs => self
                .cred_defs
                .iter()
                .map(|(k, v)| Record::CredDef(k.clone(), v.clone()))
                .collect(),
            Namespace::Credentials => self
                .credentials
                .iter()
                .map(|(k, v)| Record::Credential(k.clone(), v.clone()))
                .collect(),
        };
        records.sort_by(|a, b| a.key().cmp(b.key()));
        records
    }

    /// Put back a committed record, bypassing policy checks.
    pub fn restore(&mut self, record: Record) {
        match record {
            Record::Did(key, v) => self.dids.restore(key, v),
            Record::Schema(key, v) => self.schemas.restore(key, v),
            Record::CredDef(key, v) => self.cred_defs.restore(key, v),
            Record::Credential(key, v) => self.credentials.restore(key, v),
        }
    }

    /// Drop a record that was never committed.
    pub fn evict(&mut self, namespace: Namespace, key: &str) {
        match namespace {
            Namespace::Dids => self.dids.evict(key),
            Namespace::Schemas => self.schemas.evict(key),
            Namespace::CredDefs => self.cred_defs.evict(key),
            Namespace::Credentials => self.credentials.evict(key),
        }
    }

    /// The namespace and key a write call touches.
    pub fn touched(call: &Call) -> Option<(Namespace, &str)> {
        match call {
            Call::RegisterDid { did, .. } => Some((Namespace::Dids, did.as_str())),
            Call::RegisterSchema { schema_id, .. }
            | Call::AddApprovedIssuer { schema_id, .. }
            | Call::RemoveApprovedIssuer { schema_id, .. } => {
                Some((Namespace::Schemas, schema_id.as_str()))
            }
            Call::RegisterCredentialDefinition { cred_def_id, .. } => {
                Some((Namespace::CredDefs, cred_def_id.as_str()))
            }
            Call::IssueCredential { cred_id, .. } | Call::RevokeCredential { cred_id } => {
                Some((Namespace::Credentials, cred_id.as_str()))
            }
            _ => None,
        }
    }

    /// Number of records in a namespace.
    pub fn count(&self, namespace: Namespace) -> usize {
        match namespace {
            Namespace::Dids => self.dids.len(),
            Namespace::Schemas => self.schemas.len(),
            Namespace::CredDefs => self.cred_defs.len(),
            Namespace::Credentials => self.credentials.len(),
        }
    }

    pub fn revoked_count(&self) -> usize {
        self.credentials.revoked_count()
    }

    pub fn dids(&self) -> &DidRegistry {
        &self.dids
    }

    pub fn schemas(&self) -> &SchemaRegistry {
        &self.schemas
    }

    pub fn cred_defs(&self) -> &CredentialDefinitionRegistry {
        &self.cred_defs
    }

    pub fn credentials(&self) -> &RevocationRegistry {
        &self.credentials
    }
}

impl Default for Kanon {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}
