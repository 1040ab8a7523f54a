use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use kanon_core::{
    Caller, CoreError, CredDefId, CredentialEvent, CredentialId, CredentialState,
    CredentialStateMachine, RegistryConfig,
};

use crate::cred_def::CredentialDefinitionRegistry;
use crate::error::RegistryError;

/// An issued credential. Never deleted; revocation is a permanent tombstone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub cred_def_id: CredDefId,
    pub issuer: String,
    pub subject: String,
    pub issuance_date: String,
    /// Stored for verifiers; the registry never enforces it.
    pub expiry_date: String,
    pub metadata: String,
    pub state: CredentialState,
}

impl Credential {
    pub fn is_revoked(&self) -> bool {
        self.state == CredentialState::Revoked
    }
}

/// Arguments of an `issueCredential` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCredential {
    pub cred_id: CredentialId,
    pub cred_def_id: CredDefId,
    pub issuer: String,
    pub subject: String,
    pub issuance_date: String,
    pub expiry_date: String,
    pub metadata: String,
}

/// Registry of issued credentials and their revocation status.
pub struct RevocationRegistry {
    config: RegistryConfig,
    credentials: HashMap<String, Credential>,
}

impl RevocationRegistry {
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            credentials: HashMap::new(),
        }
    }

    /// Issue a credential under an existing credential definition.
    ///
    /// Credential ids are never reused, whatever the re-registration policy.
    pub fn issue(
        &mut self,
        definitions: &CredentialDefinitionRegistry,
        caller: &Caller,
        new: NewCredential,
    ) -> Result<(), RegistryError> {
        self.authorize(definitions, caller, &new.cred_def_id)?;

        if self.credentials.contains_key(new.cred_id.as_str()) {
            return Err(RegistryError::CredentialAlreadyExists(new.cred_id.to_string()));
        }

        tracing::info!(
            cred_id = %new.cred_id,
            cred_def_id = %new.cred_def_id,
            subject = %new.subject,
            "credential issued"
        );

        self.credentials.insert(
            new.cred_id.into_inner(),
            Credential {
                cred_def_id: new.cred_def_id,
                issuer: new.issuer,
                subject: new.subject,
                issuance_date: new.issuance_date,
                expiry_date: new.expiry_date,
                metadata: new.metadata,
                state: CredentialState::Active,
            },
        );
        Ok(())
    }

    /// Permanently revoke a credential.
    pub fn revoke(
        &mut self,
        definitions: &CredentialDefinitionRegistry,
        caller: &Caller,
        cred_id: &CredentialId,
    ) -> Result<(), RegistryError> {
        let (cred_def_id, current) = match self.credentials.get(cred_id.as_str()) {
            Some(credential) => (credential.cred_def_id.clone(), credential.state),
            None => {
                return Err(RegistryError::CredentialNotFound {
                    cred_id: cred_id.to_string(),
                })
            }
        };

        self.authorize(definitions, caller, &cred_def_id)?;

        let next = CredentialStateMachine::transition(current, CredentialEvent::Revoke)
            .map_err(|e| match e {
                CoreError::InvalidStateTransition { .. } => {
                    RegistryError::CredentialAlreadyRevoked {
                        cred_id: cred_id.to_string(),
                    }
                }
                other => RegistryError::Invalid(other),
            })?;

        if let Some(credential) = self.credentials.get_mut(cred_id.as_str()) {
            credential.state = next;
        }
        tracing::info!(cred_id = %cred_id, caller = %caller, "credential revoked");
        Ok(())
    }

    /// Check that the definition exists and, when enforced, that the caller
    /// is its issuer.
    fn authorize(
        &self,
        definitions: &CredentialDefinitionRegistry,
        caller: &Caller,
        cred_def_id: &CredDefId,
    ) -> Result<(), RegistryError> {
        let definition = definitions.get(cred_def_id.as_str()).ok_or_else(|| {
            RegistryError::CredentialDefinitionNotFound(cred_def_id.to_string())
        })?;

        if self.config.enforces_authorization() && !caller.is(&definition.issuer) {
            return Err(RegistryError::UnauthorizedCaller {
                caller: caller.to_string(),
                cred_def_id: cred_def_id.to_string(),
            });
        }
        Ok(())
    }

    /// Get a credential by ID.
    pub fn get(&self, cred_id: &str) -> Option<&Credential> {
        self.credentials.get(cred_id)
    }

    /// Put back a previously committed credential, bypassing policy checks.
    pub fn restore(&mut self, cred_id: String, credential: Credential) {
        self.credentials.insert(cred_id, credential);
    }

    pub fn evict(&mut self, cred_id: &str) {
        self.credentials.remove(cred_id);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Credential)> {
        self.credentials.iter()
    }

    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }

    /// Number of revoked credentials.
    pub fn revoked_count(&self) -> usize {
        self.credentials.values().filter(|c| c.is_revoked()).count()
    }
}

impl Default for RevocationRegistry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}
