//! Common-password denylist.
//!
//! Holds the fixed set of overly common passwords, optionally extended from
//! an external file.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming an extra denylist file.
pub const DENYLIST_PATH_ENV: &str = "PWD_DENYLIST_PATH";

const BUILTIN_ENTRIES: [&str; 6] = ["password", "123456", "12345678", "qwerty", "111111", "abc123"];

#[derive(Error, Debug)]
pub enum DenylistError {
    #[error("Denylist file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Failed to read denylist file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Denylist file is empty")]
    EmptyFile,
}

/// A case-folded set of rejected passwords.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denylist {
    entries: BTreeSet<String>,
}

impl Default for Denylist {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Denylist {
    /// The six built-in entries.
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN_ENTRIES.iter().map(|e| e.to_string()).collect(),
        }
    }

    /// Returns the denylist file path from `PWD_DENYLIST_PATH`, if set.
    pub fn env_path() -> Option<PathBuf> {
        std::env::var_os(DENYLIST_PATH_ENV).map(PathBuf::from)
    }

    /// Built-in entries, extended from `PWD_DENYLIST_PATH` when it is set.
    ///
    /// # Errors
    ///
    /// Same as [`Denylist::from_path`] when the variable is set.
    pub fn load() -> Result<Self, DenylistError> {
        match Self::env_path() {
            Some(path) => Self::from_path(path),
            None => Ok(Self::builtin()),
        }
    }

    /// Built-in entries plus one entry per non-blank line of `path`.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File does not exist
    /// - File cannot be read
    /// - File has no non-blank line
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DenylistError> {
        let path = path.as_ref();

        if !path.exists() {
            #[cfg(feature = "tracing")]
            tracing::error!("Denylist loading FAILED: FileNotFound {:?}", path);
            return Err(DenylistError::FileNotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;

        if content.trim().is_empty() {
            #[cfg(feature = "tracing")]
            tracing::error!("Denylist loading FAILED: Empty file {:?}", path);
            return Err(DenylistError::EmptyFile);
        }

        let mut denylist = Self::builtin();
        denylist.extend(content.lines());

        #[cfg(feature = "tracing")]
        tracing::info!("Denylist loaded: {} passwords from {:?}", denylist.len(), path);

        Ok(denylist)
    }

    fn extend<'a>(&mut self, lines: impl Iterator<Item = &'a str>) {
        self.entries.extend(
            lines
                .map(|l| l.trim().to_lowercase())
                .filter(|l| !l.is_empty()),
        );
    }

    /// Exact match after lower-casing `password`.
    pub fn contains(&self, password: &str) -> bool {
        self.entries.contains(&password.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
