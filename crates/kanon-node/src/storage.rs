//! RocksDB storage backend for the Kanon node.
//!
//! One column family per registry namespace plus the journal. A committed
//! call lands as a single `WriteBatch`: the touched record, its journal
//! entry and the new journal head.

use anyhow::Result;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, IteratorMode, Options, WriteBatch, DB};
use std::path::Path;

use kanon_registry::{Namespace, Record};

use crate::journal::{JournalEntry, JournalHead};

/// Column family names beyond the registry namespaces.
const CF_JOURNAL: &str = "journal";
const CF_META: &str = "meta";

const HEAD_KEY: &[u8] = b"journal_head";

/// RocksDB-backed storage for the Kanon node.
pub struct Storage {
    db: DB,
}

impl Storage {
    /// Open or create a RocksDB database at the given path with column families.
    pub fn open(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)?;

        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors = Namespace::ALL
            .iter()
            .map(|ns| ns.as_str())
            .chain([CF_JOURNAL, CF_META])
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect::<Vec<_>>();

        let db = DB::open_cf_descriptors(&opts, path, cf_descriptors)?;

        Ok(Self { db })
    }

    fn cf(&self, cf_name: &str) -> Result<&ColumnFamily> {
        self.db
            .cf_handle(cf_name)
            .ok_or_else(|| anyhow::anyhow!("column family '{}' not found", cf_name))
    }

    /// Put a value into a column family.
    pub fn put(&self, cf_name: &str, key: &[u8], value: &[u8]) -> Result<()> {
        let cf = self.cf(cf_name)?;
        self.db.put_cf(&cf, key, value)?;
        Ok(())
    }

    /// Get a value from a column family.
    pub fn get(&self, cf_name: &str, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let cf = self.cf(cf_name)?;
        let value = self.db.get_cf(&cf, key)?;
        Ok(value)
    }

    /// Atomically write a record together with the journal entry that produced it.
    pub fn commit(&self, record: &Record, entry: &JournalEntry) -> Result<()> {
        let record_cf = self.cf(record.namespace().as_str())?;
        let journal_cf = self.cf(CF_JOURNAL)?;
        let meta_cf = self.cf(CF_META)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(&record_cf, record.key().as_bytes(), record.value_json()?);
        batch.put_cf(&journal_cf, entry.seq.to_be_bytes(), serde_json::to_vec(entry)?);
        batch.put_cf(&meta_cf, HEAD_KEY, serde_json::to_vec(&entry.head())?);
        self.db.write(batch)?;
        Ok(())
    }

    /// Get a single registry record.
    pub fn get_record(&self, namespace: Namespace, key: &str) -> Result<Option<Record>> {
        self.get(namespace.as_str(), key.as_bytes())?
            .map(|value| Record::from_json(namespace, key.to_string(), &value))
            .transpose()
            .map_err(Into::into)
    }

    /// Load every record of a namespace.
    pub fn load_records(&self, namespace: Namespace) -> Result<Vec<Record>> {
        let cf = self.cf(namespace.as_str())?;
        let mut records = Vec::new();
        for item in self.db.iterator_cf(&cf, IteratorMode::Start) {
            let (key, value) = item?;
            let key = String::from_utf8(key.to_vec())?;
            records.push(Record::from_json(namespace, key, &value)?);
        }
        Ok(records)
    }

    /// Load the journal in sequence order.
    pub fn load_journal(&self) -> Result<Vec<JournalEntry>> {
        let cf = self.cf(CF_JOURNAL)?;
        let mut entries = Vec::new();
        for item in self.db.iterator_cf(&cf, IteratorMode::Start) {
            let (_, value) = item?;
            entries.push(serde_json::from_slice(&value)?);
        }
        Ok(entries)
    }

    /// The stored journal head, or genesis for a fresh database.
    pub fn journal_head(&self) -> Result<JournalHead> {
        match self.get(CF_META, HEAD_KEY)? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Ok(JournalHead::default()),
        }
    }
}
