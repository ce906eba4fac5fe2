//! Config-file layer of credential resolution.

use std::collections::HashMap;

use repolens_core::config::{AuthConfig, load_config_file, resolve_auth};

#[test]
fn missing_file_resolves_to_none() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");

    assert!(load_config_file(&path).unwrap().is_none());
}

#[test]
fn file_auth_is_parsed_and_used_as_last_resort() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "[auth]\nuser = \"file-user\"\ntoken = \"file-token\"\n",
    )
    .unwrap();

    let file = load_config_file(&path).unwrap().unwrap();
    let auth = resolve_auth(&AuthConfig::default(), &HashMap::new(), Some(&file));

    assert_eq!(auth.user.as_deref(), Some("file-user"));
    assert_eq!(auth.token.as_deref(), Some("file-token"));
}

#[test]
fn file_without_auth_table_is_valid_and_anonymous() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "# nothing configured yet\n").unwrap();

    let file = load_config_file(&path).unwrap().unwrap();
    let auth = resolve_auth(&AuthConfig::default(), &HashMap::new(), Some(&file));
    assert!(auth.is_anonymous());
}

#[test]
fn malformed_file_is_an_error_not_a_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[auth\ntoken = ").unwrap();

    let err = load_config_file(&path).unwrap_err();
    assert!(err.to_string().contains("config.toml"));
}
