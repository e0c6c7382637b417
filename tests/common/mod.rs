#![allow(dead_code)]

use json_prefs::{DefaultTable, Error, PrefsEvent, PrefsLog, PrefsStore};
use parking_lot::Mutex;
use serde_json::json;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Info(PrefsEvent),
    Error(Error),
    Fatal(String),
}

/// Log sink that remembers everything it was handed.
#[derive(Debug, Default)]
pub struct Recorder {
    entries: Mutex<Vec<Entry>>,
}

impl Recorder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn entries(&self) -> Vec<Entry> {
        self.entries.lock().clone()
    }

    pub fn errors(&self) -> Vec<Error> {
        self.entries()
            .into_iter()
            .filter_map(|e| match e {
                Entry::Error(err) => Some(err),
                _ => None,
            })
            .collect()
    }

    pub fn fatals(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter_map(|e| match e {
                Entry::Fatal(key) => Some(key),
                _ => None,
            })
            .collect()
    }

    pub fn infos(&self) -> Vec<PrefsEvent> {
        self.entries()
            .into_iter()
            .filter_map(|e| match e {
                Entry::Info(ev) => Some(ev),
                _ => None,
            })
            .collect()
    }
}

impl PrefsLog for Recorder {
    fn info(&self, event: &PrefsEvent) {
        self.entries.lock().push(Entry::Info(event.clone()));
    }

    fn error(&self, err: &Error) {
        self.entries.lock().push(Entry::Error(err.clone()));
    }

    fn fatal(&self, key: &str) {
        self.entries.lock().push(Entry::Fatal(key.to_owned()));
    }
}

pub fn sample_defaults() -> DefaultTable {
    DefaultTable::new()
        .with("theme", "light")
        .with("zoom-level", 1.0)
        .with("launch-on-startup", false)
        .with("spell-checker-language", json!(null))
}

/// Store over `dir` with the sample defaults and a fresh recorder.
pub fn open(dir: &Path) -> (PrefsStore, Arc<Recorder>) {
    let log = Recorder::new();
    let prefs = PrefsStore::builder()
        .data_dir(dir)
        .defaults(sample_defaults())
        .logger(Arc::clone(&log))
        .build()
        .unwrap();
    (prefs, log)
}

pub fn read_file(dir: &Path) -> serde_json::Value {
    let raw = std::fs::read_to_string(dir.join(json_prefs::PREFS_FILE_NAME)).unwrap();
    serde_json::from_str(&raw).unwrap()
}
