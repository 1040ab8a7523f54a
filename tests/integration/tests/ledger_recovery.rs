//! Integration test: a ledger restarts from RocksDB with identical state and
//! refuses to open over a tampered journal or tampered records.

use kanon_core::{Caller, RegistryConfig};
use kanon_integration_tests::*;
use kanon_node::journal::JournalEntry;
use kanon_node::storage::Storage;
use kanon_node::Ledger;
use kanon_registry::{Call, Namespace, Record};

fn populated(dir: &TempDir) {
    let mut ledger = Ledger::open(dir.path(), RegistryConfig::default()).unwrap();
    let caller = Caller::new(ISSUER);
    ledger.submit(&caller, register_did("did:example:123")).unwrap();
    for call in setup_calls() {
        ledger.submit(&caller, call).unwrap();
    }
    ledger.submit(&caller, issue("credId", "credDefId")).unwrap();
    ledger.submit(&caller, issue("credId2", "credDefId")).unwrap();
    ledger.submit(&caller, revoke("credId")).unwrap();
    // Rejected calls leave no trace.
    ledger.submit(&caller, revoke("credId")).unwrap_err();
    ledger.submit(&caller, issue("credId3", "missing")).unwrap_err();
}

fn open_error(dir: &TempDir) -> String {
    match Ledger::open(dir.path(), RegistryConfig::default()) {
        Ok(_) => panic!("ledger opened over tampered storage"),
        Err(e) => e.to_string(),
    }
}

#[test]
fn test_reopened_ledger_answers_identically() {
    let dir = TempDir::new("kanon-recovery");
    populated(&dir);

    let mut ledger = Ledger::open(dir.path(), RegistryConfig::default()).unwrap();
    assert_eq!(ledger.head().seq, 7);

    let reads = [
        Call::GetDid {
            did: "did:example:123".into(),
        },
        Call::GetSchema {
            schema_id: "schemaId".into(),
        },
        Call::GetCredentialDefinition {
            cred_def_id: "credDefId".into(),
        },
        Call::CredentialStatus {
            cred_id: "credId".into(),
        },
        Call::CredentialStatus {
            cred_id: "credId2".into(),
        },
        Call::CredentialStatus {
            cred_id: "credId3".into(),
        },
    ];
    let got: Vec<serde_json::Value> = reads
        .into_iter()
        .map(|call| {
            let receipt = ledger.submit(&Caller::anonymous(), call).unwrap();
            assert_eq!(receipt.seq, None);
            serde_json::to_value(receipt.result).unwrap()
        })
        .collect();

    assert_eq!(
        got,
        vec![
            serde_json::json!(["context", "metadata"]),
            serde_json::json!(["details", [ISSUER]]),
            serde_json::json!(["schemaId", ISSUER]),
            serde_json::json!("revoked"),
            serde_json::json!("active"),
            serde_json::json!("unknown"),
        ]
    );

    let status = ledger.status();
    assert_eq!(status.credentials, 2);
    assert_eq!(status.revoked, 1);
}

#[test]
fn test_journal_continues_after_reopen() {
    let dir = TempDir::new("kanon-recovery");
    populated(&dir);

    let first_head = Ledger::open(dir.path(), RegistryConfig::default())
        .unwrap()
        .head();

    {
        let mut ledger = Ledger::open(dir.path(), RegistryConfig::default()).unwrap();
        let receipt = ledger
            .submit(&Caller::anonymous(), register_did("did:example:456"))
            .unwrap();
        assert_eq!(receipt.seq, Some(first_head.seq + 1));
    }

    let storage = Storage::open(dir.path()).unwrap();
    let journal = storage.load_journal().unwrap();
    assert_eq!(journal.len(), 8);
    assert_eq!(journal[7].prev_hash, first_head.hash);
    assert_eq!(journal[7].op, "registerDID");
}

#[test]
fn test_tampered_journal_refuses_to_open() {
    let dir = TempDir::new("kanon-recovery");
    populated(&dir);

    {
        let storage = Storage::open(dir.path()).unwrap();
        let mut journal = storage.load_journal().unwrap();
        let forged: &mut JournalEntry = &mut journal[0];
        forged.caller = "0x9999999999999999999999999999999999999999".into();
        storage
            .put(
                "journal",
                &forged.seq.to_be_bytes(),
                &serde_json::to_vec(forged).unwrap(),
            )
            .unwrap();
    }

    assert!(open_error(&dir).contains("hash mismatch"));
}

#[test]
fn test_tampered_credential_record_refuses_to_open() {
    let dir = TempDir::new("kanon-recovery");
    populated(&dir);

    {
        let storage = Storage::open(dir.path()).unwrap();
        let record = storage
            .get_record(Namespace::Credentials, "credId")
            .unwrap()
            .unwrap();
        let mut value: serde_json::Value =
            serde_json::from_slice(&record.value_json().unwrap()).unwrap();
        assert_eq!(value["state"], "revoked");
        value["state"] = serde_json::json!("active");

        let forged = Record::from_json(
            Namespace::Credentials,
            "credId".into(),
            &serde_json::to_vec(&value).unwrap(),
        )
        .unwrap();
        storage
            .put(
                Namespace::Credentials.as_str(),
                forged.key().as_bytes(),
                &forged.value_json().unwrap(),
            )
            .unwrap();
    }

    assert!(open_error(&dir).contains("stored credentials records do not match the journal"));
}

#[test]
fn test_tampered_schema_record_refuses_to_open() {
    let dir = TempDir::new("kanon-recovery");
    populated(&dir);

    {
        let storage = Storage::open(dir.path()).unwrap();
        let schemas = storage.load_records(Namespace::Schemas).unwrap();
        assert_eq!(schemas.len(), 1);
        let mut value: serde_json::Value =
            serde_json::from_slice(&schemas[0].value_json().unwrap()).unwrap();
        value["approved_issuers"] = serde_json::json!([]);
        storage
            .put(
                Namespace::Schemas.as_str(),
                schemas[0].key().as_bytes(),
                &serde_json::to_vec(&value).unwrap(),
            )
            .unwrap();
    }

    assert!(open_error(&dir).contains("stored schemas records do not match the journal"));
}

#[test]
fn test_records_are_stored_per_namespace() {
    let dir = TempDir::new("kanon-recovery");
    populated(&dir);

    let storage = Storage::open(dir.path()).unwrap();
    assert_eq!(storage.load_records(Namespace::Dids).unwrap().len(), 1);
    assert_eq!(storage.load_records(Namespace::Schemas).unwrap().len(), 1);
    assert_eq!(storage.load_records(Namespace::CredDefs).unwrap().len(), 1);
    assert_eq!(storage.load_records(Namespace::Credentials).unwrap().len(), 2);
}
