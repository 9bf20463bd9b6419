//! Config loader error-message and parsing integration tests.

use assert_fs::prelude::*;
use herald_core::{
    config::{self, DEFAULT_API_URL},
    ConfigError, OpsgenieSpec, Recipient,
};
use predicates::prelude::predicate;

// ---------------------------------------------------------------------------
// 1. Load error messages
// ---------------------------------------------------------------------------

#[test]
fn load_missing_template_returns_not_found() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let path = dir.path().join("alert.yaml");
    let err = config::load_template_at(&path).unwrap_err();
    assert!(matches!(err, ConfigError::NotFound { .. }), "got: {err}");
    assert!(err.to_string().contains("alert.yaml"));
}

#[test]
fn load_corrupt_yaml_returns_parse_error_with_path() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("alert.yaml");
    file.write_str(": : corrupt : yaml : !!!\n  - broken: [unclosed")
        .expect("write");

    let err = config::load_template_at(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }), "got: {err}");
    assert!(err.to_string().contains("alert.yaml"), "must contain file path, got: {err}");
}

#[test]
fn template_without_schema_is_a_parse_error() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("alert.yaml");
    file.write_str("message: hi\nopsgenie:\n  alias: a\n").expect("write");

    let err = config::load_template_at(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }), "got: {err}");
}

#[test]
fn template_with_unknown_top_level_key_is_rejected() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("alert.yaml");
    file.write_str("message: hi\nslack: {}\n").expect("write");

    assert!(config::load_template_at(file.path()).is_err());
}

#[test]
fn template_with_misspelled_opsgenie_field_is_a_parse_error() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("alert.yaml");
    file.write_str("message: hi\nopsgenie:\n  schema: structured\n  prority: P1\n")
        .expect("write");

    let err = config::load_template_at(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }), "got: {err}");
    assert!(err.to_string().contains("alert.yaml"), "got: {err}");
}

// ---------------------------------------------------------------------------
// 2. Successful loads
// ---------------------------------------------------------------------------

#[test]
fn load_template_reads_both_parts() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("alert.yaml");
    file.write_str(
        "message: \"{{ app }} is degraded\"\n\
         opsgenie:\n  schema: templated\n  alias: \"svc-{{ name }}\"\n  tags: \"{{ env }},web\"\n",
    )
    .expect("write");
    file.assert(predicate::path::exists());

    let tpl = config::load_template_at(file.path()).expect("load");
    assert_eq!(tpl.message, "{{ app }} is degraded");
    match tpl.opsgenie.expect("opsgenie") {
        OpsgenieSpec::Templated(s) => {
            assert_eq!(s.alias, "svc-{{ name }}");
            assert_eq!(s.tags, "{{ env }},web");
        }
        other => panic!("expected templated schema, got {}", other.schema()),
    }
}

#[test]
fn load_service_config_applies_defaults() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("config.yaml");
    file.write_str("opsgenie:\n  apiKeys:\n    team-x: abc123\n")
        .expect("write");

    let cfg = config::load_service_config_at(file.path()).expect("load");
    assert_eq!(cfg.opsgenie.api_url, DEFAULT_API_URL);
    assert_eq!(cfg.opsgenie.timeout_secs, 30);
    assert!(cfg.opsgenie.api_keys.contains_key(&Recipient::from("team-x")));
}

#[test]
fn load_service_config_validates() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("config.yaml");
    file.write_str("opsgenie:\n  apiUrl: \"\"\n").expect("write");

    let err = config::load_service_config_at(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)), "got: {err}");
}

#[test]
fn load_vars_accepts_json_and_yaml() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let json = dir.child("vars.json");
    json.write_str(r#"{"name": "checkout", "replicas": 3}"#).expect("write");
    let yaml = dir.child("vars.yaml");
    yaml.write_str("name: checkout\nreplicas: 3\n").expect("write");

    let a = config::load_vars_at(json.path()).expect("json");
    let b = config::load_vars_at(yaml.path()).expect("yaml");
    assert_eq!(a, b);
    assert_eq!(a["name"], "checkout");
}

#[test]
fn load_vars_rejects_non_mapping() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("vars.yaml");
    file.write_str("- a\n- b\n").expect("write");

    let err = config::load_vars_at(file.path()).unwrap_err();
    assert!(err.to_string().contains("must contain a mapping"), "got: {err}");
}
