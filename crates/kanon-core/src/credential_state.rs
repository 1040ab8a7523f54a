use std::fmt;

use crate::error::CoreError;

/// Lifecycle states of an issued credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialState {
    /// Credential is issued and not revoked.
    #[default]
    Active,
    /// Credential has been permanently revoked. Final state.
    Revoked,
}

impl CredentialState {
    /// Whether this is a final (terminal) state.
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Revoked)
    }
}

impl fmt::Display for CredentialState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "Active"),
            Self::Revoked => write!(f, "Revoked"),
        }
    }
}

/// Events that trigger credential state transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialEvent {
    /// The credential is permanently revoked.
    Revoke,
}

/// Manages credential state transitions.
///
/// Valid transitions:
/// - Active → Revoked (Revoke)
///
/// Issuance creates a credential directly in `Active`; there is no way back
/// from `Revoked`.
pub struct CredentialStateMachine;

impl CredentialStateMachine {
    /// Attempt a state transition based on an event.
    /// Returns the new state on success, or an error for invalid transitions.
    pub fn transition(
        current: CredentialState,
        event: CredentialEvent,
    ) -> Result<CredentialState, CoreError> {
        let new_state = match (current, event) {
            (CredentialState::Active, CredentialEvent::Revoke) => CredentialState::Revoked,
            (CredentialState::Revoked, CredentialEvent::Revoke) => {
                return Err(CoreError::InvalidStateTransition {
                    from: current,
                    to: CredentialState::Revoked,
                });
            }
        };

        tracing::debug!(
            from = %current,
            to = %new_state,
            event = ?event,
            "credential state transition"
        );

        Ok(new_state)
    }

    /// Check if a transition is valid without performing it.
    pub fn can_transition(current: CredentialState, event: CredentialEvent) -> bool {
        Self::transition(current, event).is_ok()
    }
}
