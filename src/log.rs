//! Logging collaborator.
//!
//! The store never returns write-through failures to the caller; it hands
//! them to a [`PrefsLog`] sink. [`TracingLog`] forwards everything to
//! `tracing`; swap in your own sink to route or capture events.

use crate::error::Error;
use serde_json::Value;
use std::path::PathBuf;

/// Informational events the store reports.
#[derive(Debug, Clone, PartialEq)]
pub enum PrefsEvent {
    /// A `set` reached disk.
    Saved {
        /// Preference name.
        key: String,
        /// Value that was written.
        value: Value,
    },
    /// An `unset` reached disk.
    Unset {
        /// Preference name.
        key: String,
    },
    /// A `clear` reached disk.
    Cleared,
    /// The mapping was read back from an existing file.
    Restored {
        /// File the mapping came from.
        path: PathBuf,
    },
}

/// Sink for store events, non-fatal failures, and missing defaults.
pub trait PrefsLog: Send + Sync {
    /// Something worth noting happened.
    fn info(&self, event: &PrefsEvent);

    /// A read, parse, or write failed. The store carries on.
    fn error(&self, err: &Error);

    /// `key` was read with nothing set and no default registered. Called right
    /// before the store escalates.
    fn fatal(&self, key: &str);
}

/// Default sink: structured `tracing` events under the `json_prefs` target.
///
/// Saved values are only emitted at `debug` so they stay out of normal logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl PrefsLog for TracingLog {
    fn info(&self, event: &PrefsEvent) {
        match event {
            PrefsEvent::Saved { key, value } => {
                tracing::info!(key = %key, "preference saved");
                tracing::debug!(key = %key, value = %value, "saved value");
            }
            PrefsEvent::Unset { key } => tracing::info!(key = %key, "preference unset"),
            PrefsEvent::Cleared => tracing::info!("all preferences cleared"),
            PrefsEvent::Restored { path } => {
                tracing::info!(path = %path.display(), "preferences restored")
            }
        }
    }

    fn error(&self, err: &Error) {
        tracing::error!(error = %err, "preference store failure");
    }

    fn fatal(&self, key: &str) {
        tracing::error!(key = %key, "default value for preference is undefined");
    }
}

impl<T: PrefsLog + ?Sized> PrefsLog for std::sync::Arc<T> {
    fn info(&self, event: &PrefsEvent) {
        (**self).info(event)
    }

    fn error(&self, err: &Error) {
        (**self).error(err)
    }

    fn fatal(&self, key: &str) {
        (**self).fatal(key)
    }
}
