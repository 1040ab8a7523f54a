//! Commands dispatched from the HTTP API to the ledger event loop.

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use kanon_core::Caller;
use kanon_registry::{Call, Outcome, RegistryError};

/// A command sent from the HTTP API to the node's main event loop.
pub enum NodeCommand {
    /// Execute a registry call on behalf of an attested caller.
    Execute {
        caller: Caller,
        call: Call,
        reply: oneshot::Sender<Result<CallReceipt, CallFailure>>,
    },
    /// Report ledger status.
    Status {
        reply: oneshot::Sender<LedgerStatus>,
    },
}

/// Response after a successful call.
#[derive(Debug, Clone, Serialize)]
pub struct CallReceipt {
    pub op: String,
    /// Journal sequence number; absent for reads.
    pub seq: Option<u64>,
    pub result: Outcome,
}

/// Response after a failed call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallFailure {
    pub kind: String,
    pub error: String,
}

impl CallFailure {
    pub fn internal(error: impl std::fmt::Display) -> Self {
        Self {
            kind: "internal".into(),
            error: error.to_string(),
        }
    }
}

impl From<&RegistryError> for CallFailure {
    fn from(err: &RegistryError) -> Self {
        Self {
            kind: err.kind().into(),
            error: err.to_string(),
        }
    }
}

/// Snapshot of the ledger for the status endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct LedgerStatus {
    pub journal_seq: u64,
    pub journal_hash: String,
    pub dids: usize,
    pub schemas: usize,
    pub cred_defs: usize,
    pub credentials: usize,
    pub revoked: usize,
    pub reregistration: String,
    pub authorization: String,
}
