mod common;

use common::{open, read_file, sample_defaults, Recorder};
use json_prefs::{Error, PrefsEvent, PrefsStore, PREFS_FILE_NAME};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

#[test]
fn missing_file_starts_empty_without_errors() {
    let dir = tempfile::tempdir().unwrap();
    let (prefs, log) = open(&dir.path().join("does").join("not").join("exist"));
    assert!(prefs.get_all().is_empty());
    assert!(log.entries().is_empty());
}

#[test]
fn path_is_data_dir_plus_file_name() {
    let dir = tempfile::tempdir().unwrap();
    let (prefs, _) = open(dir.path());
    assert_eq!(prefs.path(), Some(dir.path().join(PREFS_FILE_NAME)));

    let custom = PrefsStore::builder()
        .data_dir(dir.path())
        .file_name("settings.json")
        .build()
        .unwrap();
    assert_eq!(custom.path(), Some(dir.path().join("settings.json")));
}

#[test]
fn set_sync_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    {
        let (prefs, _) = open(dir.path());
        prefs.set_sync("a", 1);
        prefs.set_sync("theme", "dark");
    }
    let (prefs, log) = open(dir.path());
    assert_eq!(prefs.get("a"), json!(1));
    assert_eq!(prefs.get("theme"), json!("dark"));
    assert_eq!(
        log.infos(),
        vec![PrefsEvent::Restored {
            path: dir.path().join(PREFS_FILE_NAME)
        }]
    );
}

#[test]
fn every_write_is_the_whole_mapping() {
    let dir = tempfile::tempdir().unwrap();
    let (prefs, _) = open(dir.path());
    prefs.set_sync("a", 1);
    prefs.set_sync("b", json!([1, 2, 3]));
    assert_eq!(read_file(dir.path()), json!({ "a": 1, "b": [1, 2, 3] }));

    prefs.unset_sync("a");
    assert_eq!(read_file(dir.path()), json!({ "b": [1, 2, 3] }));

    prefs.clear_sync();
    assert_eq!(read_file(dir.path()), json!({}));
}

#[test]
fn clear_persists_empty_document() {
    let dir = tempfile::tempdir().unwrap();
    {
        let (prefs, _) = open(dir.path());
        prefs.set_sync("theme", "dark");
        prefs.clear().wait().unwrap();
    }
    let (prefs, _) = open(dir.path());
    assert!(prefs.get_all().is_empty());
    assert_eq!(prefs.get("theme"), json!("light"));
}

#[test]
fn file_is_read_lazily() {
    let dir = tempfile::tempdir().unwrap();
    let (prefs, _) = open(dir.path());
    // written after the store was built but before first use
    std::fs::write(dir.path().join(PREFS_FILE_NAME), r#"{"theme":"dark"}"#).unwrap();
    assert_eq!(prefs.get("theme"), json!("dark"));
}

#[test]
fn file_is_read_at_most_once() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join(PREFS_FILE_NAME);
    std::fs::write(&file, r#"{"theme":"dark"}"#).unwrap();

    let (prefs, log) = open(dir.path());
    prefs.load();
    let first = prefs.get_all();
    std::fs::write(&file, r#"{"theme":"changed-behind-our-back"}"#).unwrap();
    prefs.load();

    assert_eq!(prefs.get_all(), first);
    assert_eq!(prefs.get("theme"), json!("dark"));
    assert_eq!(log.infos().len(), 1);
}

#[test]
fn corrupted_file_degrades_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(PREFS_FILE_NAME), "{ not json").unwrap();

    let (prefs, log) = open(dir.path());
    assert!(prefs.get_all().is_empty());
    assert_eq!(prefs.get("theme"), json!("light"));

    let errors = log.errors();
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], Error::Deserialize(_)));
}

#[test]
fn non_object_document_degrades_to_empty() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(PREFS_FILE_NAME), "[1, 2, 3]").unwrap();
    let (prefs, log) = open(dir.path());
    assert!(prefs.is_empty());
    assert_eq!(log.errors().len(), 1);
}

#[test]
fn write_after_corrupted_load_replaces_the_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(PREFS_FILE_NAME), "garbage").unwrap();
    let (prefs, _) = open(dir.path());
    prefs.set_sync("a", true);
    assert_eq!(read_file(dir.path()), json!({ "a": true }));
}

#[test]
fn empty_file_reads_as_empty_mapping() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(PREFS_FILE_NAME), "").unwrap();
    let (prefs, log) = open(dir.path());
    assert!(prefs.get_all().is_empty());
    assert!(log.errors().is_empty());
}

#[test]
fn flush_writes_current_mapping_and_reports_errors() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(PREFS_FILE_NAME), r#"{"a":1}"#).unwrap();
    let (prefs, _) = open(dir.path());
    prefs.load();
    std::fs::remove_file(dir.path().join(PREFS_FILE_NAME)).unwrap();
    prefs.flush().unwrap();
    assert_eq!(read_file(dir.path()), json!({ "a": 1 }));

    let broken = PrefsStore::builder()
        .path_provider(|| -> json_prefs::Result<PathBuf> { Err(Error::NoDataDir) })
        .build()
        .unwrap();
    assert_eq!(broken.flush(), Err(Error::NoDataDir));
}

#[test]
fn pretty_and_compact_output() {
    let dir = tempfile::tempdir().unwrap();
    let pretty = PrefsStore::builder()
        .data_dir(dir.path())
        .file_name("pretty.json")
        .pretty(true)
        .build()
        .unwrap();
    pretty.set_sync("hello", 1);
    let raw = std::fs::read_to_string(dir.path().join("pretty.json")).unwrap();
    assert!(raw.contains('\n'));
    assert!(raw.contains("  "));

    let compact = PrefsStore::builder()
        .data_dir(dir.path())
        .file_name("compact.json")
        .build()
        .unwrap();
    compact.set_sync("hello", 1);
    let raw = std::fs::read_to_string(dir.path().join("compact.json")).unwrap();
    assert_eq!(raw, r#"{"hello":1}"#);
}

#[test]
fn atomic_mode_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let log = Recorder::new();
    {
        let prefs = PrefsStore::builder()
            .data_dir(dir.path())
            .defaults(sample_defaults())
            .logger(Arc::clone(&log))
            .atomic(true)
            .build()
            .unwrap();
        prefs.set_sync("zoom-level", 2.5);
    }
    assert!(!dir.path().join("prefs.json.tmp").exists());
    assert_eq!(read_file(dir.path()), json!({ "zoom-level": 2.5 }));
    assert!(log.errors().is_empty());
}

#[test]
fn unavailable_data_dir_degrades_and_logs() {
    let log = Recorder::new();
    let prefs = PrefsStore::builder()
        .path_provider(|| -> json_prefs::Result<PathBuf> { Err(Error::NoDataDir) })
        .defaults(sample_defaults())
        .logger(Arc::clone(&log))
        .build()
        .unwrap();

    assert_eq!(prefs.path(), None);
    assert!(prefs.get_all().is_empty());
    assert_eq!(prefs.get("theme"), json!("light"));
    assert_eq!(log.errors(), vec![Error::NoDataDir]);

    // the write can't land but the value still holds in memory
    assert_eq!(prefs.set("theme", "dark").wait(), Err(Error::NoDataDir));
    assert_eq!(prefs.get("theme"), json!("dark"));
    assert_eq!(log.errors().len(), 2);
}
