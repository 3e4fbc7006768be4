use clap::Parser;
use clinwire_cli::{CliConfig, run_with_input};
use serde_json::{Value, json};

const MEDIA: &str = r##"{
  "resourceType": "Media",
  "id": "m1",
  "contained": [
    {"resourceType": "Binary", "id": "b1", "contentType": "text/plain", "content": "aGk="}
  ],
  "type": {"text": "photo"},
  "_occurrenceDateTime": {},
  "content": {"url": "#b1"}
}"##;

fn output(args: &[&str], input: &str) -> anyhow::Result<String> {
    let config = CliConfig::try_parse_from(args)?;
    let mut out = Vec::new();
    run_with_input(&config, input, &mut out)?;
    Ok(String::from_utf8(out)?)
}

#[test]
fn test_check_reports_summary() {
    let out = output(&["clinwire", "check", "-"], MEDIA).unwrap();
    assert_eq!(out, "Media id=m1 contained=1 [Binary]\n");
}

#[test]
fn test_roundtrip_reencodes() {
    let out = output(&["clinwire", "roundtrip", "-"], MEDIA).unwrap();
    let value: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(
        value,
        json!({
            "resourceType": "Media",
            "id": "m1",
            "contained": [
                {"resourceType": "Binary", "id": "b1", "contentType": "text/plain", "content": "aGk="}
            ],
            "type": {"text": "photo"},
            "content": {"url": "#b1"}
        })
    );
    assert_eq!(out.lines().count(), 1);
}

#[test]
fn test_roundtrip_pretty() {
    let out = output(&["clinwire", "roundtrip", "--pretty", "-"], MEDIA).unwrap();
    assert!(out.lines().count() > 1);
    assert!(out.starts_with("{\n  \"resourceType\": \"Media\""));
}

#[test]
fn test_reject_policy_fails() {
    let err = output(&["clinwire", "--empty-choice", "reject", "check", "-"], MEDIA).unwrap_err();
    assert!(err.to_string().contains("occurrenceDateTime"), "{err}");
}

#[test]
fn test_unknown_resource_type_fails() {
    let err = output(&["clinwire", "check", "-"], r#"{"resourceType": "Patient"}"#).unwrap_err();
    assert!(err.to_string().contains("Patient"), "{err}");
}
