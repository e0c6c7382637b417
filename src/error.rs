//! Unified error type for all store operations.

use thiserror::Error;

/// Things that can go wrong when using the store.
///
/// Most of these never reach the caller: write-through failures are handed to
/// the [`PrefsLog`](crate::log::PrefsLog) sink instead. The type is `Clone` so
/// one failure can be logged and also delivered to a
/// [`PendingWrite`](crate::writer::PendingWrite).
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// File system problem (read, write, rename, create dir).
    #[error("i/o error: {0}")]
    Io(String),
    /// Failed to serialize the mapping to bytes.
    #[error("serialization error: {0}")]
    Serialize(String),
    /// Failed to deserialize the file back into a mapping.
    #[error("deserialization error: {0}")]
    Deserialize(String),
    /// Bad configuration (no path source, empty file name, etc.).
    #[error("config error: {0}")]
    Config(String),
    /// The platform has no per-user data directory.
    #[error("no per-user data directory available on this platform")]
    NoDataDir,
    /// A key was read that is neither set nor has a registered default.
    #[error("default value for `{0}` is undefined")]
    MissingDefault(String),
    /// The background writer went away before reporting a result.
    #[error("background writer stopped before the write completed")]
    WorkerGone,
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            Error::Io(err.to_string())
        } else if err.is_syntax() || err.is_eof() || err.is_data() {
            Error::Deserialize(err.to_string())
        } else {
            Error::Serialize(err.to_string())
        }
    }
}

/// Result alias using our [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;
