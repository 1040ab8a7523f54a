use kanon_core::CoreError;

/// Registry call failures.
///
/// Every variant aborts the call without touching state. Display strings are
/// stable and meant for humans; [`RegistryError::kind`] is meant for code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("DID is already registered: {0}")]
    DidAlreadyExists(String),

    #[error("Schema is already registered with different details: {0}")]
    SchemaAlreadyExists(String),

    #[error("Schema does not exist: {0}")]
    SchemaNotFound(String),

    #[error("Credential definition already exists: {0}")]
    CredDefAlreadyExists(String),

    #[error("Credential definition does not exist: {0}")]
    CredentialDefinitionNotFound(String),

    #[error("Issuer {issuer} is not approved for schema {schema_id}")]
    IssuerNotApproved { schema_id: String, issuer: String },

    #[error("Credential already exists: {0}")]
    CredentialAlreadyExists(String),

    #[error("Credential does not exist")]
    CredentialNotFound { cred_id: String },

    #[error("Credential is already revoked")]
    CredentialAlreadyRevoked { cred_id: String },

    #[error("Caller {caller} is not the issuer of credential definition {cred_def_id}")]
    UnauthorizedCaller { caller: String, cred_def_id: String },

    #[error(transparent)]
    Invalid(#[from] CoreError),
}

impl RegistryError {
    /// Stable machine-readable error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DidAlreadyExists(_) => "did_already_exists",
            Self::SchemaAlreadyExists(_) => "schema_already_exists",
            Self::SchemaNotFound(_) => "schema_not_found",
            Self::CredDefAlreadyExists(_) => "cred_def_already_exists",
            Self::CredentialDefinitionNotFound(_) => "credential_definition_not_found",
            Self::IssuerNotApproved { .. } => "issuer_not_approved",
            Self::CredentialAlreadyExists(_) => "credential_already_exists",
            Self::CredentialNotFound { .. } => "credential_not_found",
            Self::CredentialAlreadyRevoked { .. } => "credential_already_revoked",
            Self::UnauthorizedCaller { .. } => "unauthorized_caller",
            Self::Invalid(CoreError::MissingField(_)) => "missing_field",
            Self::Invalid(CoreError::InvalidAddress(_)) => "invalid_address",
            Self::Invalid(CoreError::InvalidStateTransition { .. }) => "invalid_state_transition",
        }
    }
}
