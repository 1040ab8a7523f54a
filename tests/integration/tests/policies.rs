//! Integration test: reregistration and authorization policies.

use kanon_core::{AuthorizationPolicy, Caller, RegistryConfig, ReregistrationPolicy};
use kanon_integration_tests::*;
use kanon_registry::{Call, DidView, Kanon};

fn enforced() -> Kanon {
    Kanon::new(RegistryConfig {
        authorization: AuthorizationPolicy::Enforced,
        ..Default::default()
    })
}

#[test]
fn test_reject_policy_keeps_first_registration() {
    let mut kanon = Kanon::default();
    let anyone = Caller::anonymous();
    kanon.execute(&anyone, register_did("did:example:123")).unwrap();

    let err = kanon
        .execute(
            &anyone,
            Call::RegisterDid {
                did: "did:example:123".into(),
                context: "other".into(),
                metadata: "other".into(),
            },
        )
        .unwrap_err();
    assert_eq!(err.kind(), "did_already_exists");
    assert_eq!(
        kanon.get_did("did:example:123"),
        DidView("context".into(), "metadata".into())
    );

    kanon.execute(&anyone, register_cred_def("credDefId", "schemaId", ISSUER)).unwrap_err();
    for call in setup_calls() {
        kanon.execute(&anyone, call).unwrap();
    }
    let err = kanon
        .execute(&anyone, register_cred_def("credDefId", "schemaId", ISSUER))
        .unwrap_err();
    assert_eq!(err.kind(), "cred_def_already_exists");
}

#[test]
fn test_overwrite_policy_replaces_records() {
    let mut kanon = Kanon::new(RegistryConfig {
        reregistration: ReregistrationPolicy::Overwrite,
        ..Default::default()
    });
    let anyone = Caller::anonymous();
    kanon.execute(&anyone, register_did("did:example:123")).unwrap();
    kanon
        .execute(
            &anyone,
            Call::RegisterDid {
                did: "did:example:123".into(),
                context: "other".into(),
                metadata: "other".into(),
            },
        )
        .unwrap();
    assert_eq!(
        kanon.get_did("did:example:123"),
        DidView("other".into(), "other".into())
    );

    for call in setup_calls() {
        kanon.execute(&anyone, call).unwrap();
    }
    kanon.execute(&anyone, issue("credId", "credDefId")).unwrap();
    let err = kanon.execute(&anyone, issue("credId", "credDefId")).unwrap_err();
    assert_eq!(err.kind(), "credential_already_exists");
}

#[test]
fn test_enforced_requires_approved_issuer_for_cred_def() {
    let mut kanon = enforced();
    let anyone = Caller::anonymous();
    kanon.execute(&anyone, register_schema("schemaId")).unwrap();

    let err = kanon
        .execute(&anyone, register_cred_def("credDefId", "schemaId", ISSUER))
        .unwrap_err();
    assert_eq!(err.kind(), "issuer_not_approved");
    assert!(kanon.cred_defs().is_empty());
}

#[test]
fn test_enforced_requires_definition_issuer_as_caller() {
    let mut kanon = enforced();
    let issuer = Caller::new(ISSUER);
    let stranger = Caller::new("0x9999999999999999999999999999999999999999");
    for call in setup_calls() {
        kanon.execute(&issuer, call).unwrap();
    }

    let err = kanon.execute(&stranger, issue("credId", "credDefId")).unwrap_err();
    assert_eq!(err.kind(), "unauthorized_caller");

    kanon.execute(&issuer, issue("credId", "credDefId")).unwrap();

    let err = kanon.execute(&stranger, revoke("credId")).unwrap_err();
    assert_eq!(err.kind(), "unauthorized_caller");
    assert!(!kanon.get_credential("credId").revoked);

    kanon.execute(&issuer, revoke("credId")).unwrap();
    assert!(kanon.get_credential("credId").revoked);
}

#[test]
fn test_enforced_unknown_revoke_still_reports_missing() {
    let mut kanon = enforced();
    let err = kanon.execute(&Caller::anonymous(), revoke("credId")).unwrap_err();
    assert_eq!(err.to_string(), "Credential does not exist");
}
