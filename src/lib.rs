//! JSON-backed user preference store with default fallback.
//!
//! Preferences live in one JSON object on disk (`<data dir>/prefs.json` by
//! default). The file is read lazily on first use, every mutation rewrites the
//! whole document, and keys the user never set fall back to a default table.
//!
//! ```rust,no_run
//! use json_prefs::{DefaultTable, PrefsStore};
//!
//! let prefs = PrefsStore::builder()
//!     .app_name("my-app")
//!     .defaults(DefaultTable::new().with("zoom-level", 1.0))
//!     .build()
//!     .unwrap();
//!
//! prefs.set_sync("zoom-level", 1.25);
//! assert_eq!(prefs.get("zoom-level"), 1.25);
//!
//! // fire-and-forget: returns before the write lands, failures are logged
//! prefs.set("launch-minimized", true);
//! ```
//!
//! **Single-process only.** Two processes pointed at the same file will
//! clobber each other.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod defaults;
pub mod error;
pub mod log;
pub mod paths;
pub mod persist;
pub mod serializer;
pub mod store;
pub mod writer;

pub use defaults::{DefaultTable, Defaults, NoDefaults};
pub use error::{Error, Result};
pub use log::{PrefsEvent, PrefsLog, TracingLog};
pub use paths::{FixedDir, PathProvider, UserDataDir, PREFS_FILE_NAME};
pub use store::{Lookup, PrefsBuilder, PrefsStore};
pub use writer::PendingWrite;

/// Default backend: ShardMap.
pub type DefaultBackend = shardmap::ShardMap<String, serde_json::Value>;
