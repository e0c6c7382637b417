//! Where the preference file lives.

use crate::error::{Error, Result};
use std::path::PathBuf;

/// Fixed file name of the preference document inside the data directory.
pub const PREFS_FILE_NAME: &str = "prefs.json";

/// Supplies the per-user data directory the preference file is placed in.
pub trait PathProvider: Send + Sync {
    /// Directory that will contain the preference file.
    fn data_dir(&self) -> Result<PathBuf>;
}

/// The platform's per-user data directory plus an application subdirectory,
/// e.g. `~/.local/share/<app>` on Linux.
#[derive(Debug, Clone)]
pub struct UserDataDir {
    app_name: String,
}

impl UserDataDir {
    /// Data directory for the application called `app_name`.
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
        }
    }
}

impl PathProvider for UserDataDir {
    fn data_dir(&self) -> Result<PathBuf> {
        if self.app_name.trim().is_empty() {
            return Err(Error::Config("application name is empty".into()));
        }
        dirs::data_dir()
            .map(|base| base.join(&self.app_name))
            .ok_or(Error::NoDataDir)
    }
}

/// An explicit directory, handy for tests and portable installs.
#[derive(Debug, Clone)]
pub struct FixedDir(pub PathBuf);

impl PathProvider for FixedDir {
    fn data_dir(&self) -> Result<PathBuf> {
        Ok(self.0.clone())
    }
}

impl<F> PathProvider for F
where
    F: Fn() -> Result<PathBuf> + Send + Sync,
{
    fn data_dir(&self) -> Result<PathBuf> {
        self()
    }
}
