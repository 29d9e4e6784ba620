use caphub::domain::config::ApiConfig;
use caphub::features::identity::hash_password;
use caphub::{InitError, init};
use std::fs;

fn config_with_users(dir: &std::path::Path) -> ApiConfig {
    let path = dir.join("users.json");
    let users = serde_json::json!({
        "users": [{
            "username": "practice.lead",
            "email": "lead@slalom.com",
            "role": "practice_lead",
            "password_hash": hash_password("LeadPass123!", 1_000).unwrap(),
            "practice_areas": ["*"],
        }]
    });
    fs::write(&path, users.to_string()).unwrap();

    let mut config = ApiConfig::default();
    config.security.credentials_file = path;
    config
}

#[test]
fn init_builds_every_slice() {
    let dir = tempfile::tempdir().unwrap();
    let slices = init(&config_with_users(dir.path())).unwrap();
    assert_eq!(slices.len(), 2);
}

#[test]
fn bad_catalog_file_stops_startup() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = dir.path().join("catalog.json");
    fs::write(&catalog, "{ not json").unwrap();

    let mut config = config_with_users(dir.path());
    config.catalog.seed_file = Some(catalog);

    let err = init(&config).unwrap_err();
    assert!(matches!(err, InitError::Capabilities { .. }));
}

#[test]
fn missing_credentials_stop_startup() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = ApiConfig::default();
    config.security.credentials_file = dir.path().join("nope.json");

    assert!(matches!(init(&config), Err(InitError::Identity { .. })));
}

#[test]
fn feature_registry_lists_slices() {
    assert!(caphub::features::is_enabled("identity"));
    assert!(caphub::features::is_enabled("capabilities"));
    assert!(!caphub::features::is_enabled("licensing"));
}
