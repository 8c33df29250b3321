//! Read-only credential directory.
//!
//! The login handler only needs `lookup(identifier) -> Option<secret>`. Anything that can answer
//! that (a map, a database, a secrets engine) can be plugged in through [`CredentialStore`]
//! without touching the decision logic.

use secrecy::SecretString;
use std::{collections::HashMap, fmt, fs, path::Path};
use thiserror::Error;

/// Exact-key, case-sensitive lookup of the expected secret for an identifier.
pub trait CredentialStore: Send + Sync {
    fn lookup(&self, identifier: &str) -> Option<SecretString>;
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read credentials file {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    // serde_json errors point at a line/column, never echo the input.
    #[error("invalid credentials file {path}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// In-memory credential map fixed at process start.
#[derive(Clone, Default)]
pub struct StaticCredentialStore {
    entries: HashMap<String, SecretString>,
}

impl StaticCredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_entry(mut self, identifier: impl Into<String>, secret: impl Into<String>) -> Self {
        self.entries
            .insert(identifier.into(), SecretString::from(secret.into()));
        self
    }

    /// Demo accounts used when no credentials file is configured.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new()
            .with_entry("user1@example.com", "password12345")
            .with_entry("user2@example.com", "B7rx9OkWVdx13$QF6Imq")
            .with_entry("user3@example.com", "hoxnNT4g&ER0&9Nz0pLO")
            .with_entry("user4@example.com", "Log4Fun")
    }

    /// Load a JSON object of `{"identifier": "secret", ...}` from `path`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not a flat string-to-string object.
    pub fn from_json<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| StoreError::Read {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_json_str(&raw).map_err(|source| StoreError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        let entries: HashMap<String, String> = serde_json::from_str(raw)?;

        Ok(Self {
            entries: entries
                .into_iter()
                .map(|(identifier, secret)| (identifier, SecretString::from(secret)))
                .collect(),
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CredentialStore for StaticCredentialStore {
    fn lookup(&self, identifier: &str) -> Option<SecretString> {
        self.entries.get(identifier).cloned()
    }
}

impl fmt::Debug for StaticCredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticCredentialStore")
            .field("entries", &self.entries.len())
            .finish()
    }
}
