// Draft storage and configuration tests
// Author: Gabriel Demetrios Lafis

use std::fs;

use serde::{Deserialize, Serialize};
use tempfile::tempdir;

use dashboard_config_engine::{
    format::DateFormat,
    storage::{load_draft, save_draft, DraftStorage, FileStorage, MemoryStorage, StorageError},
    utils::{AppError, Config, StorageType},
};

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Draft {
    title: String,
    widgets: Vec<String>,
}

fn exercise(storage: &dyn DraftStorage) {
    assert!(storage.get("dashboard-draft").unwrap().is_none());

    storage.set("widget-draft", "{}").unwrap();
    storage.set("dashboard-draft", "first").unwrap();
    storage.set("dashboard-draft", "second").unwrap();

    assert_eq!(storage.get("dashboard-draft").unwrap().as_deref(), Some("second"));
    assert_eq!(storage.keys().unwrap(), vec!["dashboard-draft", "widget-draft"]);

    storage.remove("widget-draft").unwrap();
    storage.remove("widget-draft").unwrap();
    assert_eq!(storage.keys().unwrap(), vec!["dashboard-draft"]);
}

#[test]
fn test_memory_storage() {
    let storage = MemoryStorage::new();
    exercise(&storage);

    // Clones share the same entries
    let other = storage.clone();
    other.set("shared", "yes").unwrap();
    assert_eq!(storage.get("shared").unwrap().as_deref(), Some("yes"));
}

#[test]
fn test_file_storage() {
    let dir = tempdir().unwrap();
    let storage = FileStorage::new(dir.path().join("drafts")).unwrap();
    exercise(&storage);

    // Unrelated files are not listed
    fs::write(dir.path().join("drafts").join("notes.txt"), "x").unwrap();
    assert_eq!(storage.keys().unwrap(), vec!["dashboard-draft"]);

    // Survives reopening
    let reopened = FileStorage::new(dir.path().join("drafts")).unwrap();
    assert_eq!(reopened.get("dashboard-draft").unwrap().as_deref(), Some("second"));
}

#[test]
fn test_file_storage_rejects_unsafe_keys() {
    let dir = tempdir().unwrap();
    let storage = FileStorage::new(dir.path()).unwrap();

    for key in ["", "../escape", "a/b", "with space"] {
        assert!(matches!(storage.set(key, "x"), Err(StorageError::InvalidKey(_))));
    }
}

#[test]
fn test_typed_drafts() {
    let storage = MemoryStorage::new();
    let draft = Draft {
        title: "Ops".to_string(),
        widgets: vec!["w1".to_string(), "w2".to_string()],
    };

    save_draft(&storage, "dashboard-draft", &draft).unwrap();
    let loaded: Option<Draft> = load_draft(&storage, "dashboard-draft").unwrap();
    assert_eq!(loaded, Some(draft));

    let missing: Option<Draft> = load_draft(&storage, "nothing").unwrap();
    assert!(missing.is_none());

    storage.set("dashboard-draft", "[1, 2").unwrap();
    let corrupt: Option<Draft> = load_draft(&storage, "dashboard-draft").unwrap();
    assert!(corrupt.is_none());
}

#[test]
fn test_config_from_yaml() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    fs::write(
        &path,
        "server:\n  port: 9090\nstorage:\n  type: file\n  path: /tmp/drafts\nformat:\n  currency: EUR\n  dateFormat: iso\n",
    )
    .unwrap();

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.server.port, 9090);
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.storage.type_, StorageType::File);
    assert_eq!(config.storage.path.as_deref(), Some("/tmp/drafts"));
    assert_eq!(config.format.currency, "EUR");
    assert_eq!(config.format.date_format, DateFormat::Iso);
    assert_eq!(config.format.locale, "en-US");
    assert_eq!(config.preferences.debounce_ms, 1000);
}

#[test]
fn test_config_from_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{ "logging": { "level": "DEBUG" }, "preferences": { "debounce_ms": 250 } }"#)
        .unwrap();

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.log_level_filter(), log::LevelFilter::Debug);
    assert_eq!(config.preferences.debounce().as_millis(), 250);
    assert_eq!(config.storage.type_, StorageType::Memory);
}

#[test]
fn test_config_errors() {
    let dir = tempdir().unwrap();

    let toml = dir.path().join("config.toml");
    fs::write(&toml, "port = 1").unwrap();
    assert!(matches!(Config::from_file(&toml), Err(AppError::Config(_))));

    let broken = dir.path().join("config.json");
    fs::write(&broken, "{").unwrap();
    assert!(matches!(Config::from_file(&broken), Err(AppError::Config(_))));

    assert!(matches!(
        Config::from_file(dir.path().join("missing.yaml")),
        Err(AppError::Io(_))
    ));
}
