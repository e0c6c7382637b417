//! Core store type and builder.

use crate::backend::MapBackend;
use crate::defaults::{Defaults, NoDefaults};
use crate::error::{Error, Result};
use crate::log::{PrefsEvent, PrefsLog, TracingLog};
use crate::paths::{FixedDir, PathProvider, UserDataDir, PREFS_FILE_NAME};
use crate::persist::{self, Loaded};
use crate::serializer::{JsonSerializer, Serializer};
use crate::writer::{PendingWrite, WriteJob, WriteWorker};
use crate::DefaultBackend;
use once_cell::sync::OnceCell;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Result of resolving a key against the mapping and the default table.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    /// The user's value, or the registered default when unset.
    Found(Value),
    /// Not set and no default registered.
    MissingDefault,
}

/// JSON-backed preference store with default fallback.
///
/// The file path and the mapping are both resolved lazily: nothing touches
/// the disk until the first operation, and the file is read at most once per
/// store. Mutations update memory first and then write the whole mapping
/// back, either on the background writer (`set`, `unset`, `clear`) or before
/// returning (`*_sync`). Write failures are logged, never returned.
///
/// ```rust,no_run
/// use json_prefs::{DefaultTable, PrefsStore};
///
/// let prefs = PrefsStore::builder()
///     .app_name("my-app")
///     .defaults(DefaultTable::new().with("theme", "light"))
///     .build()
///     .unwrap();
///
/// assert_eq!(prefs.get("theme"), "light");
/// prefs.set("theme", "dark");
/// ```
pub struct PrefsStore<M = DefaultBackend> {
    path: OnceCell<PathBuf>,
    map: OnceCell<M>,
    provider: Box<dyn PathProvider>,
    file_name: String,
    defaults: Box<dyn Defaults>,
    log: Arc<dyn PrefsLog>,
    serializer: JsonSerializer,
    atomic: bool,
    writer: WriteWorker,
}

impl PrefsStore<DefaultBackend> {
    /// Start configuring a store on the default (ShardMap) backend.
    pub fn builder() -> PrefsBuilder<DefaultBackend> {
        PrefsBuilder::new()
    }
}

impl<M: MapBackend> PrefsStore<M> {
    /// Start configuring a store on a specific map backend.
    pub fn builder_with_backend() -> PrefsBuilder<M> {
        PrefsBuilder::new()
    }

    // ---- loading ----

    /// Resolve the path and read the file if that hasn't happened yet.
    /// Every other operation does this on its own; calling it again is a no-op.
    pub fn load(&self) {
        let _ = self.mapping();
    }

    fn mapping(&self) -> &M {
        self.map.get_or_init(|| self.read_mapping())
    }

    fn read_mapping(&self) -> M {
        let map = M::default();
        let path = match self.resolve_path() {
            Ok(p) => p,
            Err(e) => {
                self.log.error(&e);
                return map;
            }
        };
        match persist::load(path, &self.serializer) {
            Ok(Loaded::Missing) => {}
            Ok(Loaded::Found(data)) => {
                for (k, v) in data {
                    map.insert(k, v);
                }
                self.log.info(&PrefsEvent::Restored {
                    path: path.to_path_buf(),
                });
            }
            Err(e) => self.log.error(&e),
        }
        map
    }

    // Not cached on failure, so a later write retries the provider.
    fn resolve_path(&self) -> Result<&Path> {
        self.path
            .get_or_try_init(|| {
                self.provider
                    .data_dir()
                    .map(|dir| dir.join(&self.file_name))
            })
            .map(PathBuf::as_path)
    }

    // ---- reads ----

    /// Value for `key`: the user's if set, otherwise the registered default.
    ///
    /// # Panics
    ///
    /// When `key` is unset and has no default. That is a wiring bug in the
    /// application; the log sink's `fatal` hook runs first. Use
    /// [`lookup`](Self::lookup) or [`try_get`](Self::try_get) to handle it
    /// yourself.
    pub fn get(&self, key: &str) -> Value {
        match self.lookup(key) {
            Lookup::Found(v) => v,
            Lookup::MissingDefault => {
                self.log.fatal(key);
                panic!("default value for `{key}` is undefined");
            }
        }
    }

    /// Resolve `key` without escalating a missing default.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Lookup {
        match self.mapping().get(key).or_else(|| self.defaults.get(key)) {
            Some(v) => Lookup::Found(v),
            None => Lookup::MissingDefault,
        }
    }

    /// Like [`get`](Self::get) but reports a missing default as
    /// [`Error::MissingDefault`].
    pub fn try_get(&self, key: &str) -> Result<Value> {
        match self.lookup(key) {
            Lookup::Found(v) => Ok(v),
            Lookup::MissingDefault => Err(Error::MissingDefault(key.to_owned())),
        }
    }

    /// Typed read. Fails on a missing default or when the stored JSON does not
    /// fit `T`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let value = self.try_get(key)?;
        serde_json::from_value(value)
            .map_err(|e| Error::Deserialize(format!("preference `{key}`: {e}")))
    }

    /// Snapshot of everything the user has set. Defaults are not included.
    #[must_use]
    pub fn get_all(&self) -> Map<String, Value> {
        self.mapping().snapshot().into_iter().collect()
    }

    /// The registered default for `key`, ignoring whatever the user set.
    #[must_use]
    pub fn get_default(&self, key: &str) -> Option<Value> {
        self.defaults.get(key)
    }

    /// `true` if the user has set `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.mapping().contains_key(key)
    }

    /// Number of keys the user has set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mapping().map_len()
    }

    /// `true` when nothing has been set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the keys the user has set.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.mapping().snapshot().into_iter().map(|(k, _)| k).collect()
    }

    /// Path to the backing JSON file, or `None` if the provider can't supply
    /// a data directory.
    #[must_use]
    pub fn path(&self) -> Option<PathBuf> {
        self.resolve_path().ok().map(Path::to_path_buf)
    }

    // ---- writes ----

    /// Set `key` and hand the write to the background writer. Returns at once.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) -> PendingWrite {
        let event = self.apply_set(key.into(), value.into());
        self.persist(event)
    }

    /// Set `key` and write the file before returning. A failed write is logged.
    pub fn set_sync(&self, key: impl Into<String>, value: impl Into<Value>) {
        let event = self.apply_set(key.into(), value.into());
        let _ = self.persist(event).wait();
    }

    /// Remove `key` (no-op if unset) and persist in the background.
    pub fn unset(&self, key: &str) -> PendingWrite {
        self.mapping().remove(key);
        self.persist(PrefsEvent::Unset {
            key: key.to_owned(),
        })
    }

    /// Remove `key` and write the file before returning.
    pub fn unset_sync(&self, key: &str) {
        self.mapping().remove(key);
        let _ = self
            .persist(PrefsEvent::Unset {
                key: key.to_owned(),
            })
            .wait();
    }

    /// Drop every user value and persist the empty mapping in the background.
    pub fn clear(&self) -> PendingWrite {
        self.mapping().clear();
        self.persist(PrefsEvent::Cleared)
    }

    /// Drop every user value and write the file before returning.
    pub fn clear_sync(&self) {
        self.mapping().clear();
        let _ = self.persist(PrefsEvent::Cleared).wait();
    }

    /// Write the current mapping now and return the outcome. Unlike the
    /// write-through paths this reports failure to the caller and logs
    /// nothing.
    pub fn flush(&self) -> Result<()> {
        let path = self.resolve_path()?;
        let bytes = self.encode()?;
        persist::write(path, &bytes, self.atomic)
    }

    // ---- internal ----

    fn apply_set(&self, key: String, value: Value) -> PrefsEvent {
        self.mapping().insert(key.clone(), value.clone());
        PrefsEvent::Saved { key, value }
    }

    fn encode(&self) -> Result<Vec<u8>> {
        let data: Map<String, Value> = self.mapping().snapshot().into_iter().collect();
        self.serializer.serialize(&data)
    }

    // Sync and async writes share the one queue, so the file always ends up
    // with the last snapshot taken.
    fn persist(&self, event: PrefsEvent) -> PendingWrite {
        let job = self.resolve_path().and_then(|path| {
            Ok(WriteJob {
                path: path.to_path_buf(),
                bytes: self.encode()?,
                atomic: self.atomic,
                event,
            })
        });
        match job {
            Ok(job) => self.writer.submit(job),
            Err(e) => {
                self.log.error(&e);
                PendingWrite::ready(Err(e))
            }
        }
    }
}

impl<M> std::fmt::Debug for PrefsStore<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrefsStore")
            .field("path", &self.path.get())
            .field("loaded", &self.map.get().is_some())
            .field("file_name", &self.file_name)
            .field("atomic", &self.atomic)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Configures a [`PrefsStore`].
///
/// A path source is required: [`app_name`](Self::app_name),
/// [`data_dir`](Self::data_dir), or [`path_provider`](Self::path_provider).
/// Everything else has a default: `prefs.json`, no defaults registered,
/// [`TracingLog`], compact JSON, plain (non-renaming) writes.
pub struct PrefsBuilder<M> {
    provider: Option<Box<dyn PathProvider>>,
    file_name: String,
    defaults: Box<dyn Defaults>,
    log: Arc<dyn PrefsLog>,
    pretty: bool,
    atomic: bool,
    _marker: PhantomData<M>,
}

impl<M: MapBackend> PrefsBuilder<M> {
    fn new() -> Self {
        Self {
            provider: None,
            file_name: PREFS_FILE_NAME.to_owned(),
            defaults: Box::new(NoDefaults),
            log: Arc::new(TracingLog),
            pretty: false,
            atomic: false,
            _marker: PhantomData,
        }
    }

    /// Keep the file in the platform's per-user data directory under
    /// `app_name`.
    pub fn app_name(mut self, app_name: impl Into<String>) -> Self {
        self.provider = Some(Box::new(UserDataDir::new(app_name)));
        self
    }

    /// Keep the file in `dir`.
    pub fn data_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.provider = Some(Box::new(FixedDir(dir.as_ref().to_path_buf())));
        self
    }

    /// Custom source for the data directory. Consulted lazily, on first use.
    pub fn path_provider(mut self, provider: impl PathProvider + 'static) -> Self {
        self.provider = Some(Box::new(provider));
        self
    }

    /// File name inside the data directory (default: `prefs.json`).
    pub fn file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = name.into();
        self
    }

    /// Fallback values for keys the user never set.
    pub fn defaults(mut self, defaults: impl Defaults + 'static) -> Self {
        self.defaults = Box::new(defaults);
        self
    }

    /// Where events and failures go (default: [`TracingLog`]).
    pub fn logger(mut self, log: impl PrefsLog + 'static) -> Self {
        self.log = Arc::new(log);
        self
    }

    /// Write indented JSON (default: compact).
    pub fn pretty(mut self, yes: bool) -> Self {
        self.pretty = yes;
        self
    }

    /// Write to a temp file and rename over the target (default: off).
    pub fn atomic(mut self, yes: bool) -> Self {
        self.atomic = yes;
        self
    }

    /// Validate the configuration and start the background writer. Does not
    /// touch the preference file.
    pub fn build(self) -> Result<PrefsStore<M>> {
        let provider = self.provider.ok_or_else(|| {
            Error::Config("no data directory configured (app_name, data_dir or path_provider)".into())
        })?;
        if self.file_name.trim().is_empty() {
            return Err(Error::Config("file name is empty".into()));
        }

        let serializer = if self.pretty {
            JsonSerializer::pretty()
        } else {
            JsonSerializer::new()
        };
        let writer = WriteWorker::start(Arc::clone(&self.log))?;

        Ok(PrefsStore {
            path: OnceCell::new(),
            map: OnceCell::new(),
            provider,
            file_name: self.file_name,
            defaults: self.defaults,
            log: self.log,
            serializer,
            atomic: self.atomic,
            writer,
        })
    }
}

impl<M> std::fmt::Debug for PrefsBuilder<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrefsBuilder")
            .field("has_path_source", &self.provider.is_some())
            .field("file_name", &self.file_name)
            .field("pretty", &self.pretty)
            .field("atomic", &self.atomic)
            .finish_non_exhaustive()
    }
}
