//! Serde tests for the wire-facing core types.

use crate::{ProbeKind, ProbeOutcome, ProbeRequest};

#[test]
fn test_outcome_uses_camel_case() {
    let outcome = ProbeOutcome::ok("LookupIP: localhost -> 127.0.0.1 ");
    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["statusCode"], 200);
    assert_eq!(json["message"], "LookupIP: localhost -> 127.0.0.1 ");
}

#[test]
fn test_request_deserialize() {
    let json = r#"{"kind":"storage","connectionString":"AccountName=a;AccountKey=b"}"#;
    let req: ProbeRequest = serde_json::from_str(json).unwrap();
    assert_eq!(req.probe_kind(), ProbeKind::Storage);
    assert_eq!(req.connection_string(), "AccountName=a;AccountKey=b");
}

#[test]
fn test_kind_serde_names() {
    let cases = [
        (ProbeKind::KeyVault, r#""keyvault""#),
        (ProbeKind::Nslookup, r#""nslookup""#),
        (ProbeKind::Insights, r#""insights""#),
    ];
    for (kind, expected) in cases {
        assert_eq!(serde_json::to_string(&kind).unwrap(), expected);
    }
}
