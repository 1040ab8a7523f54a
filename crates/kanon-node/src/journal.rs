//! Hash-chained journal of committed registry writes.
//!
//! Each entry commits to its predecessor:
//! `hash = BLAKE3(prev_hash || seq || op || caller || committed_at || call_json)`.
//! Rewriting any committed entry breaks every hash after it.

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use kanon_core::Caller;
use kanon_registry::Call;

/// BLAKE3 hash (32 bytes).
pub type Hash = [u8; 32];

/// Hash the chain starts from.
pub const GENESIS_HASH: Hash = [0u8; 32];

/// The latest committed position of the journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalHead {
    /// Sequence number of the last entry; 0 before the first commit.
    pub seq: u64,
    #[serde(with = "hex_hash")]
    pub hash: Hash,
}

impl Default for JournalHead {
    fn default() -> Self {
        Self {
            seq: 0,
            hash: GENESIS_HASH,
        }
    }
}

impl JournalHead {
    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }
}

/// One committed write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub seq: u64,
    pub op: String,
    pub caller: String,
    pub call: Call,
    pub committed_at: DateTime<Utc>,
    #[serde(with = "hex_hash")]
    pub prev_hash: Hash,
    #[serde(with = "hex_hash")]
    pub hash: Hash,
}

impl JournalEntry {
    /// Build the entry that follows `head`.
    pub fn next(head: &JournalHead, caller: &Caller, call: &Call) -> Result<Self> {
        let seq = head.seq + 1;
        let committed_at = Utc::now();
        let hash = compute_hash(&head.hash, seq, call.op(), caller.as_str(), &committed_at, call)?;

        Ok(Self {
            seq,
            op: call.op().to_string(),
            caller: caller.as_str().to_string(),
            call: call.clone(),
            committed_at,
            prev_hash: head.hash,
            hash,
        })
    }

    /// The head after this entry.
    pub fn head(&self) -> JournalHead {
        JournalHead {
            seq: self.seq,
            hash: self.hash,
        }
    }

    /// Check that this entry directly follows `prev` and that its hash is intact.
    pub fn verify(&self, prev: &JournalHead) -> Result<()> {
        if self.seq != prev.seq + 1 {
            bail!(
                "journal gap: expected seq {}, found {}",
                prev.seq + 1,
                self.seq
            );
        }
        if self.prev_hash != prev.hash {
            bail!("journal entry {} does not link to its predecessor", self.seq);
        }
        if self.op != self.call.op() {
            bail!(
                "journal entry {} op {} does not match its call",
                self.seq,
                self.op
            );
        }
        let expected = compute_hash(
            &self.prev_hash,
            self.seq,
            &self.op,
            &self.caller,
            &self.committed_at,
            &self.call,
        )?;
        if expected != self.hash {
            bail!("journal entry {} hash mismatch", self.seq);
        }
        Ok(())
    }
}

/// Verify a journal from genesis and return its head.
pub fn verify_chain(entries: &[JournalEntry]) -> Result<JournalHead> {
    let mut head = JournalHead::default();
    for entry in entries {
        entry.verify(&head)?;
        head = entry.head();
    }
    Ok(head)
}

fn compute_hash(
    prev_hash: &Hash,
    seq: u64,
    op: &str,
    caller: &str,
    committed_at: &DateTime<Utc>,
    call: &Call,
) -> Result<Hash> {
    let call_json = serde_json::to_vec(call)?;

    let mut hasher = blake3::Hasher::new();
    hasher.update(prev_hash);
    hasher.update(&seq.to_be_bytes());
    hasher.update(op.as_bytes());
    hasher.update(&[0]);
    hasher.update(caller.as_bytes());
    hasher.update(&[0]);
    hasher.update(committed_at.to_rfc3339().as_bytes());
    hasher.update(&[0]);
    hasher.update(&call_json);
    Ok(*hasher.finalize().as_bytes())
}

mod hex_hash {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    use super::Hash;

    pub fn serialize<S: Serializer>(hash: &Hash, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(hash))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Hash, D::Error> {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(D::Error::custom)?;
        bytes
            .try_into()
            .map_err(|_| D::Error::custom("hash must be 32 bytes"))
    }
}
