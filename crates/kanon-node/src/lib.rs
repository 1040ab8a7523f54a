//! Kanon node: a single-writer ledger around the trust registry, with
//! RocksDB persistence, a hash-chained journal and an HTTP API.

pub mod api;
pub mod commands;
pub mod config;
pub mod journal;
pub mod ledger;
pub mod node;
pub mod state;
pub mod storage;

pub use commands::{CallFailure, CallReceipt, LedgerStatus, NodeCommand};
pub use config::KanonConfig;
pub use ledger::Ledger;
pub use node::KanonNode;
