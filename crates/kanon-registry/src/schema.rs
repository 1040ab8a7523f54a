use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use kanon_core::{Address, RegistryConfig, SchemaId};

use crate::error::RegistryError;

/// A credential schema slot.
///
/// `details` and `approved_issuers` are set independently: approving an
/// issuer creates the slot with empty details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Opaque schema payload.
    pub details: String,
    /// Issuers approved for this schema, in approval order, without duplicates.
    pub approved_issuers: Vec<Address>,
}

impl Schema {
    /// Whether `issuer` is approved for this schema.
    pub fn is_approved(&self, issuer: &Address) -> bool {
        self.approved_issuers.contains(issuer)
    }
}

/// Registry of credential schemas and their approved issuers.
pub struct SchemaRegistry {
    config: RegistryConfig,
    schemas: HashMap<String, Schema>,
}

impl SchemaRegistry {
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            schemas: HashMap::new(),
        }
    }

    /// Set the details of a schema, creating the slot if needed.
    ///
    /// Repeating a call with the same details is a no-op. Replacing
    /// non-empty details with different ones needs the overwrite policy.
    pub fn register(&mut self, schema_id: &SchemaId, details: String) -> Result<(), RegistryError> {
        let allows_overwrite = self.config.allows_overwrite();
        let schema = self.schemas.entry(schema_id.to_string()).or_default();

        if !schema.details.is_empty() && schema.details != details && !allows_overwrite {
            return Err(RegistryError::SchemaAlreadyExists(schema_id.to_string()));
        }

        schema.details = details;
        tracing::info!(schema_id = %schema_id, "schema registered");
        Ok(())
    }

    /// Approve an issuer for a schema, creating the slot if needed.
    ///
    /// Returns `false` when the issuer was already approved.
    pub fn add_approved_issuer(&mut self, schema_id: &SchemaId, issuer: Address) -> bool {
        let schema = self.schemas.entry(schema_id.to_string()).or_default();
        if schema.is_approved(&issuer) {
            tracing::debug!(schema_id = %schema_id, %issuer, "issuer already approved");
            return false;
        }

        tracing::info!(schema_id = %schema_id, %issuer, "issuer approved");
        schema.approved_issuers.push(issuer);
        true
    }

    /// Withdraw an issuer's approval. Returns whether it was approved.
    pub fn remove_approved_issuer(
        &mut self,
        schema_id: &SchemaId,
        issuer: &Address,
    ) -> Result<bool, RegistryError> {
        let schema = self
            .schemas
            .get_mut(schema_id.as_str())
            .ok_or_else(|| RegistryError::SchemaNotFound(schema_id.to_string()))?;

        let before = schema.approved_issuers.len();
        schema.approved_issuers.retain(|a| a != issuer);
        let removed = schema.approved_issuers.len() != before;
        if removed {
            tracing::info!(schema_id = %schema_id, %issuer, "issuer approval withdrawn");
        }
        Ok(removed)
    }

    /// Get a schema slot by ID.
    pub fn get(&self, schema_id: &str) -> Option<&Schema> {
        self.schemas.get(schema_id)
    }

    /// Whether the schema slot has ever been touched.
    pub fn contains(&self, schema_id: &str) -> bool {
        self.schemas.contains_key(schema_id)
    }

    /// Whether `issuer` is approved for `schema_id`. False for unknown schemas.
    pub fn is_approved(&self, schema_id: &str, issuer: &Address) -> bool {
        self.get(schema_id)
            .map(|schema| schema.is_approved(issuer))
            .unwrap_or(false)
    }

    /// Put back a previously committed schema, bypassing policy checks.
    pub fn restore(&mut self, schema_id: String, schema: Schema) {
        self.schemas.insert(schema_id, schema);
    }

    pub fn evict(&mut self, schema_id: &str) {
        self.schemas.remove(schema_id);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Schema)> {
        self.schemas.iter()
    }

    /// Number of schema slots.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}
