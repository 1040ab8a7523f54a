//! The single-writer ledger: owns the registry, orders calls, and commits
//! every successful write to storage before answering.

use anyhow::{bail, Result};
use std::path::Path;

use kanon_core::{AuthorizationPolicy, Caller, RegistryConfig, ReregistrationPolicy};
use kanon_registry::{Call, Kanon, Namespace};

use crate::commands::{CallFailure, CallReceipt, LedgerStatus};
use crate::journal::{self, JournalEntry, JournalHead};
use crate::storage::Storage;

pub struct Ledger {
    kanon: Kanon,
    storage: Storage,
    head: JournalHead,
}

impl Ledger {
    /// Open storage, verify the journal, and rebuild the registry from
    /// committed records.
    ///
    /// The stored records must equal the state obtained by replaying the
    /// journal, otherwise opening fails.
    pub fn open(data_dir: &Path, config: RegistryConfig) -> Result<Self> {
        let storage = Storage::open(data_dir)?;

        let entries = storage.load_journal()?;
        let head = journal::verify_chain(&entries)?;
        let stored_head = storage.journal_head()?;
        if head != stored_head {
            bail!(
                "journal head mismatch: chain ends at seq {} but stored head is seq {}",
                head.seq,
                stored_head.seq
            );
        }

        let replayed = replay(&entries)?;

        let mut kanon = Kanon::new(config);
        for namespace in Namespace::ALL {
            let mut records = storage.load_records(namespace)?;
            records.sort_by(|a, b| a.key().cmp(b.key()));
            if records != replayed.records(namespace) {
                bail!(
                    "stored {} records do not match the journal at seq {}",
                    namespace,
                    head.seq
                );
            }
            tracing::debug!(%namespace, count = records.len(), "records loaded");
            for record in records {
                kanon.restore(record);
            }
        }

        tracing::info!(
            seq = head.seq,
            hash = %head.hash_hex(),
            dids = kanon.count(Namespace::Dids),
            schemas = kanon.count(Namespace::Schemas),
            cred_defs = kanon.count(Namespace::CredDefs),
            credentials = kanon.count(Namespace::Credentials),
            "ledger opened"
        );

        Ok(Self {
            kanon,
            storage,
            head,
        })
    }

    /// Execute a call and, for writes, commit it.
    ///
    /// If the commit fails the in-memory write is undone, so the registry
    /// never runs ahead of storage.
    pub fn submit(&mut self, caller: &Caller, call: Call) -> Result<CallReceipt, CallFailure> {
        let op = call.op().to_string();

        let touched = Kanon::touched(&call).map(|(ns, key)| (ns, key.to_string()));
        let Some((namespace, key)) = touched else {
            let result = self.kanon.execute(caller, call).map_err(|e| CallFailure::from(&e))?;
            return Ok(CallReceipt {
                op,
                seq: None,
                result,
            });
        };

        let before = self.kanon.record(namespace, &key);
        let entry = JournalEntry::next(&self.head, caller, &call).map_err(CallFailure::internal)?;
        let result = self
            .kanon
            .execute(caller, call)
            .map_err(|e| CallFailure::from(&e))?;

        let Some(after) = self.kanon.record(namespace, &key) else {
            return Err(CallFailure::internal(format!(
                "{} succeeded without a {} record for {}",
                op, namespace, key
            )));
        };

        if let Err(e) = self.storage.commit(&after, &entry) {
            tracing::error!(
                op = %op,
                %namespace,
                key = %key,
                error = %e,
                "commit failed, undoing write"
            );
            match before {
                Some(record) => self.kanon.restore(record),
                None => self.kanon.evict(namespace, &key),
            }
            return Err(CallFailure::internal(e));
        }

        self.head = entry.head();
        tracing::info!(seq = self.head.seq, op = %op, caller = %caller, "call committed");

        Ok(CallReceipt {
            op,
            seq: Some(self.head.seq),
            result,
        })
    }

    pub fn status(&self) -> LedgerStatus {
        let config = self.kanon.config();
        LedgerStatus {
            journal_seq: self.head.seq,
            journal_hash: self.head.hash_hex(),
            dids: self.kanon.count(Namespace::Dids),
            schemas: self.kanon.count(Namespace::Schemas),
            cred_defs: self.kanon.count(Namespace::CredDefs),
            credentials: self.kanon.count(Namespace::Credentials),
            revoked: self.kanon.revoked_count(),
            reregistration: config.reregistration.to_string(),
            authorization: config.authorization.to_string(),
        }
    }

    pub fn head(&self) -> JournalHead {
        self.head
    }

    pub fn registry(&self) -> &Kanon {
        &self.kanon
    }
}

/// Rebuild registry state by re-executing every journaled call.
///
/// Replay runs under the most permissive policy, which accepts every call
/// that any policy accepts.
fn replay(entries: &[JournalEntry]) -> Result<Kanon> {
    let mut kanon = Kanon::new(RegistryConfig {
        reregistration: ReregistrationPolicy::Overwrite,
        authorization: AuthorizationPolicy::Open,
    });
    for entry in entries {
        let caller = Caller::new(entry.caller.clone());
        if let Err(e) = kanon.execute(&caller, entry.call.clone()) {
            bail!("journal entry {} ({}) does not replay: {}", entry.seq, entry.op, e);
        }
    }
    Ok(kanon)
}
