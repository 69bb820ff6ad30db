//! Session context.
//!
//! The authentication token lives in an explicit [`Session`] handed to the
//! client, never in global state. [`SessionStore`] persists it between runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::error::ConsoleError;

/// In-memory session shared by the client and the screens using it.
///
/// Clones share the same token.
#[derive(Debug, Clone, Default)]
pub struct Session {
    token: Arc<RwLock<Option<String>>>,
}

impl Session {
    /// A session with no token.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let session = Self::default();
        session.set_token(token);
        session
    }

    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn set_token(&self, token: impl Into<String>) {
        let mut guard = self
            .token
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Some(token.into());
    }

    pub fn clear(&self) {
        let mut guard = self
            .token
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = None;
    }
}

/// Session as written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSession {
    pub token: String,
    pub email: String,
    pub logged_in_at: DateTime<Utc>,
}

/// File-backed store for the session credential.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored session, if any.
    ///
    /// A missing file means nobody is logged in. A corrupt file is reported
    /// as an error rather than silently discarded.
    pub async fn load(&self) -> Result<Option<StoredSession>, ConsoleError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(ConsoleError::Session(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        serde_json::from_slice(&bytes).map(Some).map_err(|e| {
            ConsoleError::Session(format!("Invalid session file {}: {}", self.path.display(), e))
        })
    }

    /// Restores the stored token into a fresh [`Session`].
    pub async fn restore(&self) -> Result<Session, ConsoleError> {
        Ok(match self.load().await? {
            Some(stored) => Session::with_token(stored.token),
            None => Session::anonymous(),
        })
    }

    pub async fn save(&self, stored: &StoredSession) -> Result<(), ConsoleError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                ConsoleError::Session(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let json = serde_json::to_vec_pretty(stored)
            .map_err(|e| ConsoleError::Session(format!("Failed to encode session: {}", e)))?;

        tokio::fs::write(&self.path, json).await.map_err(|e| {
            ConsoleError::Session(format!("Failed to write {}: {}", self.path.display(), e))
        })
    }

    /// Removes the stored session. Succeeds when nothing was stored.
    pub async fn clear(&self) -> Result<(), ConsoleError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ConsoleError::Session(format!(
                "Failed to remove {}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}
