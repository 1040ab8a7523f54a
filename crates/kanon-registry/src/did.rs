use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use kanon_core::{CoreError, Did, RegistryConfig};

use crate::error::RegistryError;

/// The stored document a DID resolves to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DidDocument {
    pub context: String,
    pub metadata: String,
}

/// Registry of DID documents.
pub struct DidRegistry {
    config: RegistryConfig,
    documents: HashMap<String, DidDocument>,
}

impl DidRegistry {
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            documents: HashMap::new(),
        }
    }

    /// Register a DID document.
    ///
    /// Both `context` and `metadata` must be non-empty. An existing DID is
    /// rejected unless the registry allows overwrites.
    pub fn register(
        &mut self,
        did: &Did,
        context: String,
        metadata: String,
    ) -> Result<(), RegistryError> {
        if context.is_empty() {
            return Err(CoreError::MissingField("context".into()).into());
        }
        if metadata.is_empty() {
            return Err(CoreError::MissingField("metadata".into()).into());
        }
        if self.documents.contains_key(did.as_str()) && !self.config.allows_overwrite() {
            return Err(RegistryError::DidAlreadyExists(did.to_string()));
        }

        self.documents
            .insert(did.to_string(), DidDocument { context, metadata });
        tracing::info!(did = %did, "DID registered");
        Ok(())
    }

    /// Resolve a DID to its document.
    pub fn get(&self, did: &str) -> Option<&DidDocument> {
        self.documents.get(did)
    }

    /// Put back a previously committed document, bypassing policy checks.
    pub fn restore(&mut self, did: String, document: DidDocument) {
        self.documents.insert(did, document);
    }

    pub fn evict(&mut self, did: &str) {
        self.documents.remove(did);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &DidDocument)> {
        self.documents.iter()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl Default for DidRegistry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kanon_core::ReregistrationPolicy;

    fn did(s: &str) -> Did {
        Did::new(s).unwrap()
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = DidRegistry::default();
        registry
            .register(&did("did:example:123"), "context".into(), "metadata".into())
            .unwrap();

        let doc = registry.get("did:example:123").unwrap();
        assert_eq!(doc.context, "context");
        assert_eq!(doc.metadata, "metadata");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unknown_did() {
        let registry = DidRegistry::default();
        assert!(registry.get("did:example:missing").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_reregistration_rejected_by_default() {
        let mut registry = DidRegistry::default();
        let id = did("did:example:123");
        registry.register(&id, "a".into(), "b".into()).unwrap();

        let result = registry.register(&id, "c".into(), "d".into());
        assert_eq!(
            result,
            Err(RegistryError::DidAlreadyExists("did:example:123".into()))
        );
        assert_eq!(registry.get("did:example:123").unwrap().context, "a");
    }

    #[test]
    fn test_reregistration_overwrites_when_allowed() {
        let mut registry = DidRegistry::new(RegistryConfig {
            reregistration: ReregistrationPolicy::Overwrite,
            ..Default::default()
        });
        let id = did("did:example:123");
        registry.register(&id, "a".into(), "b".into()).unwrap();
        registry.register(&id, "c".into(), "d".into()).unwrap();

        let doc = registry.get("did:example:123").unwrap();
        assert_eq!(doc.context, "c");
        assert_eq!(doc.metadata, "d");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_empty_context_or_metadata_rejected() {
        let mut registry = DidRegistry::default();
        let id = did("did:example:empty");

        assert_eq!(
            registry.register(&id, String::new(), "metadata".into()),
            Err(RegistryError::Invalid(CoreError::MissingField(
                "context".into()
            )))
        );
        assert_eq!(
            registry.register(&id, "context".into(), String::new()),
            Err(RegistryError::Invalid(CoreError::MissingField(
                "metadata".into()
            )))
        );
        assert!(registry.get("did:example:empty").is_none());
        assert!(registry.is_empty());
    }
}
