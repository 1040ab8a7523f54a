//! Kanon Core: Identifiers, errors, configuration, and the credential
//! state machine shared by the Kanon trust registry.

pub mod config;
pub mod credential_state;
pub mod error;
pub mod types;

pub use config::{AuthorizationPolicy, RegistryConfig, ReregistrationPolicy};
pub use credential_state::{CredentialEvent, CredentialState, CredentialStateMachine};
pub use error::CoreError;
pub use types::{Address, Caller, CredDefId, CredentialId, Did, SchemaId};
