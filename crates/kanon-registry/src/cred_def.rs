use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use kanon_core::{Address, CredDefId, RegistryConfig, SchemaId};

use crate::error::RegistryError;
use crate::schema::SchemaRegistry;

/// Binding of an issuer to a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialDefinition {
    pub schema_id: SchemaId,
    pub issuer: Address,
}

/// Registry of credential definitions.
pub struct CredentialDefinitionRegistry {
    config: RegistryConfig,
    definitions: HashMap<String, CredentialDefinition>,
}

impl CredentialDefinitionRegistry {
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            definitions: HashMap::new(),
        }
    }

    /// Register a credential definition against an existing schema.
    ///
    /// The schema must have been touched by either `registerSchema` or
    /// `addApprovedIssuer`. Issuer approval is only checked under the
    /// enforced authorization policy.
    pub fn register(
        &mut self,
        schemas: &SchemaRegistry,
        cred_def_id: &CredDefId,
        schema_id: SchemaId,
        issuer: Address,
    ) -> Result<(), RegistryError> {
        let schema = schemas
            .get(schema_id.as_str())
            .ok_or_else(|| RegistryError::SchemaNotFound(schema_id.to_string()))?;

        if self.definitions.contains_key(cred_def_id.as_str()) && !self.config.allows_overwrite()
        {
            return Err(RegistryError::CredDefAlreadyExists(cred_def_id.to_string()));
        }

        if self.config.enforces_authorization() && !schema.is_approved(&issuer) {
            return Err(RegistryError::IssuerNotApproved {
                schema_id: schema_id.to_string(),
                issuer: issuer.to_string(),
            });
        }

        tracing::info!(
            cred_def_id = %cred_def_id,
            schema_id = %schema_id,
            %issuer,
            "credential definition registered"
        );
        self.definitions.insert(
            cred_def_id.to_string(),
            CredentialDefinition { schema_id, issuer },
        );
        Ok(())
    }

    /// Get a credential definition by ID.
    pub fn get(&self, cred_def_id: &str) -> Option<&CredentialDefinition> {
        self.definitions.get(cred_def_id)
    }

    /// Put back a previously committed definition, bypassing policy checks.
    pub fn restore(&mut self, cred_def_id: String, definition: CredentialDefinition) {
        self.definitions.insert(cred_def_id, definition);
    }

    pub fn evict(&mut self, cred_def_id: &str) {
        self.definitions.remove(cred_def_id);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &CredentialDefinition)> {
        self.definitions.iter()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl Default for CredentialDefinitionRegistry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}
