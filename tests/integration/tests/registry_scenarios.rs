//! Integration test: the registry call surface, end to end.
//!
//! Drives `Kanon` only through `execute`, the way a ledger would, and checks
//! results in their wire shape.

use kanon_core::Caller;
use kanon_integration_tests::*;
use kanon_registry::{Call, CredentialStatus, Kanon, Outcome, RegistryError};

fn run(kanon: &mut Kanon, call: Call) -> Result<Outcome, RegistryError> {
    kanon.execute(&Caller::anonymous(), call)
}

fn json(kanon: &mut Kanon, call: Call) -> serde_json::Value {
    serde_json::to_value(run(kanon, call).expect("read should succeed")).unwrap()
}

// =========================================================================
// DID registry
// =========================================================================

#[test]
fn test_register_did_then_get() {
    let mut kanon = Kanon::default();
    run(&mut kanon, register_did("did:example:123")).unwrap();

    let got = json(
        &mut kanon,
        Call::GetDid {
            did: "did:example:123".into(),
        },
    );
    assert_eq!(got, serde_json::json!(["context", "metadata"]));
}

#[test]
fn test_unknown_did_is_zero_value() {
    let mut kanon = Kanon::default();
    let got = json(
        &mut kanon,
        Call::GetDid {
            did: "did:example:unknown".into(),
        },
    );
    assert_eq!(got, serde_json::json!(["", ""]));
}

// =========================================================================
// Schema registry
// =========================================================================

#[test]
fn test_register_schema_then_get() {
    let mut kanon = Kanon::default();
    run(&mut kanon, register_schema("schemaId")).unwrap();
    let got = json(
        &mut kanon,
        Call::GetSchema {
            schema_id: "schemaId".into(),
        },
    );
    assert_eq!(got, serde_json::json!(["details", []]));
}

#[test]
fn test_approve_issuer_on_untouched_schema() {
    let mut kanon = Kanon::default();
    run(&mut kanon, approve("schemaId", ISSUER)).unwrap();
    let got = json(
        &mut kanon,
        Call::GetSchema {
            schema_id: "schemaId".into(),
        },
    );
    assert_eq!(got, serde_json::json!(["", [ISSUER]]));
}

#[test]
fn test_approve_issuer_is_idempotent_and_case_insensitive() {
    let lower = "0xabcdefabcdefabcdefabcdefabcdefabcdefabcd";
    let mixed = "0xABCDEFabcdefABCDEFabcdefABCDEFabcdefABCD";

    let mut kanon = Kanon::default();
    run(&mut kanon, register_schema("schemaId")).unwrap();
    run(&mut kanon, approve("schemaId", lower)).unwrap();
    run(&mut kanon, approve("schemaId", mixed)).unwrap();

    let got = json(
        &mut kanon,
        Call::GetSchema {
            schema_id: "schemaId".into(),
        },
    );
    assert_eq!(got, serde_json::json!(["details", [lower]]));

    let approved = run(
        &mut kanon,
        Call::IsApprovedIssuer {
            schema_id: "schemaId".into(),
            issuer_address: mixed.into(),
        },
    )
    .unwrap();
    assert_eq!(approved, Outcome::Approved(true));
}

#[test]
fn test_remove_issuer() {
    let mut kanon = Kanon::default();
    for call in setup_calls() {
        run(&mut kanon, call).unwrap();
    }
    run(
        &mut kanon,
        Call::RemoveApprovedIssuer {
            schema_id: "schemaId".into(),
            issuer_address: ISSUER.into(),
        },
    )
    .unwrap();
    assert_eq!(
        json(
            &mut kanon,
            Call::GetSchema {
                schema_id: "schemaId".into()
            }
        ),
        serde_json::json!(["details", []])
    );

    // Existing definitions keep their binding.
    assert_eq!(
        json(
            &mut kanon,
            Call::GetCredentialDefinition {
                cred_def_id: "credDefId".into()
            }
        ),
        serde_json::json!(["schemaId", ISSUER])
    );
}

// =========================================================================
// Credential definitions and revocation
// =========================================================================

#[test]
fn test_register_cred_def_then_get() {
    let mut kanon = Kanon::default();
    for call in setup_calls() {
        run(&mut kanon, call).unwrap();
    }
    let got = json(
        &mut kanon,
        Call::GetCredentialDefinition {
            cred_def_id: "credDefId".into(),
        },
    );
    assert_eq!(got, serde_json::json!(["schemaId", ISSUER]));
}

#[test]
fn test_cred_def_on_untouched_schema_fails() {
    let mut kanon = Kanon::default();
    let err = run(&mut kanon, register_cred_def("credDefId", "schemaId", ISSUER)).unwrap_err();
    assert_eq!(err.kind(), "schema_not_found");
}

#[test]
fn test_issue_without_cred_def_fails() {
    let mut kanon = Kanon::default();
    let err = run(&mut kanon, issue("credId", "credDefId")).unwrap_err();
    assert_eq!(err.kind(), "credential_definition_not_found");
    assert_eq!(kanon.credential_status("credId"), CredentialStatus::Unknown);
}

#[test]
fn test_issue_and_revoke() {
    let mut kanon = Kanon::default();
    for call in setup_calls() {
        run(&mut kanon, call).unwrap();
    }
    run(&mut kanon, issue("credId", "credDefId")).unwrap();
    run(&mut kanon, revoke("credId")).unwrap();

    let err = run(&mut kanon, revoke("credId")).unwrap_err();
    assert_eq!(err.to_string(), "Credential is already revoked");

    let got = json(
        &mut kanon,
        Call::GetCredential {
            cred_id: "credId".into(),
        },
    );
    assert_eq!(got["revoked"], true);
    assert_eq!(got["subject"], "subject");
    assert_eq!(
        json(
            &mut kanon,
            Call::CredentialStatus {
                cred_id: "credId".into()
            }
        ),
        serde_json::json!("revoked")
    );
}

#[test]
fn test_revoke_unknown_credential() {
    let mut kanon = Kanon::default();
    let err = run(&mut kanon, revoke("credId")).unwrap_err();
    assert_eq!(err.to_string(), "Credential does not exist");
}

#[test]
fn test_revoked_credential_cannot_be_reissued() {
    let mut kanon = Kanon::default();
    for call in setup_calls() {
        run(&mut kanon, call).unwrap();
    }
    run(&mut kanon, issue("credId", "credDefId")).unwrap();
    run(&mut kanon, revoke("credId")).unwrap();

    let err = run(&mut kanon, issue("credId", "credDefId")).unwrap_err();
    assert_eq!(err.kind(), "credential_already_exists");
    assert_eq!(kanon.credential_status("credId"), CredentialStatus::Revoked);
}

#[test]
fn test_calls_from_wire_json() {
    let mut kanon = Kanon::default();
    let calls = [
        r#"{"op":"registerSchema","schemaId":"schemaId","details":"details"}"#,
        concat!(
            r#"{"op":"addApprovedIssuer","schemaId":"schemaId","#,
            r#""issuerAddress":"0x1234567890123456789012345678901234567890"}"#
        ),
        concat!(
            r#"{"op":"registerCredentialDefinition","credDefId":"credDefId","#,
            r#""schemaId":"schemaId","#,
            r#""issuerAddress":"0x1234567890123456789012345678901234567890"}"#
        ),
        concat!(
            r#"{"op":"issueCredential","credId":"credId","credDefId":"credDefId","#,
            r#""issuer":"issuer","subject":"subject","issuanceDate":"issuanceDate","#,
            r#""expiryDate":"expiryDate","metadata":"metadata"}"#
        ),
    ];
    for raw in calls {
        let call: Call = serde_json::from_str(raw).unwrap();
        assert!(call.is_write());
        run(&mut kanon, call).unwrap();
    }
    assert_eq!(kanon.credential_status("credId"), CredentialStatus::Active);
}
