//! Kanon Registry: the four coupled registries of the Kanon trust layer
//! and the single entry surface that dispatches calls to them.
//!
//! - DID registry: DID → document
//! - Schema registry: schema → details and approved issuers
//! - Credential definition registry: definition → schema and issuer
//! - Revocation registry: credential → record and revocation flag
//!
//! Dependencies only point downwards: definitions read schemas, credentials
//! read definitions. Nothing calls back up.

pub mod call;
pub mod cred_def;
pub mod did;
pub mod error;
pub mod kanon;
pub mod revocation;
pub mod schema;

pub use call::{Call, CredDefView, CredentialStatus, CredentialView, DidView, Outcome, SchemaView};
pub use cred_def::{CredentialDefinition, CredentialDefinitionRegistry};
pub use did::{DidDocument, DidRegistry};
pub use error::RegistryError;
pub use kanon::{Kanon, Namespace, Record};
pub use revocation::{Credential, NewCredential, RevocationRegistry};
pub use schema::{Schema, SchemaRegistry};
