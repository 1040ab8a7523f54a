use crate::credential_state::CredentialState;

/// Core validation and state errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("invalid state transition from {from} to {to}")]
    InvalidStateTransition {
        from: CredentialState,
        to: CredentialState,
    },

    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),
}
