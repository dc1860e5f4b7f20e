//! Persisted authentication session
//!
//! The token pair lives in a [`Session`] owned by the API client and is
//! persisted through a [`SessionStore`]. Serialized keys are `token` and
//! `refreshToken`, matching the web admin's local storage entries.

use std::fmt;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// Access/refresh token pair
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "token", default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(
        rename = "refreshToken",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    refresh_token: Option<String>,
}

fn clean(token: &str) -> Option<String> {
    let trimmed = token.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl Session {
    pub fn new(access: &str, refresh: &str) -> Self {
        Self {
            token: clean(access),
            refresh_token: clean(refresh),
        }
    }

    pub fn access_token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    /// Replace the access token, keeping the refresh token.
    pub fn set_access_token(&mut self, access: &str) {
        self.token = clean(access);
    }

    pub fn clear(&mut self) {
        self.token = None;
        self.refresh_token = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.token.is_none() && self.refresh_token.is_none()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("has_token", &self.token.is_some())
            .field("has_refresh_token", &self.refresh_token.is_some())
            .finish()
    }
}

/// Storage backend for the session
#[async_trait]
pub trait SessionStore: Send + Sync + fmt::Debug {
    /// Load the persisted session; an absent session is an empty one.
    async fn load(&self) -> Result<Session, SessionError>;

    async fn save(&self, session: &Session) -> Result<(), SessionError>;

    async fn clear(&self) -> Result<(), SessionError>;
}

/// Process-local store, used by tests and one-shot tools
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    inner: Mutex<Session>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            inner: Mutex::new(session),
        }
    }

    /// Snapshot of what has been persisted so far
    pub fn snapshot(&self) -> Session {
        self.inner.lock().clone()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self) -> Result<Session, SessionError> {
        Ok(self.inner.lock().clone())
    }

    async fn save(&self, session: &Session) -> Result<(), SessionError> {
        *self.inner.lock() = session.clone();
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionError> {
        self.inner.lock().clear();
        Ok(())
    }
}

/// JSON file store
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn display_path(&self) -> String {
        self.path.display().to_string()
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> Result<Session, SessionError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Session::default());
            }
            Err(source) => {
                return Err(SessionError::Read {
                    path: self.display_path(),
                    source,
                });
            }
        };

        match serde_json::from_str::<Session>(&raw) {
            Ok(session) => Ok(session),
            Err(e) => {
                log::warn!(
                    "[SessionStore] Ignoring unreadable session file {}: {}",
                    self.display_path(),
                    e
                );
                Ok(Session::default())
            }
        }
    }

    async fn save(&self, session: &Session) -> Result<(), SessionError> {
        let body =
            serde_json::to_vec_pretty(session).map_err(SessionError::Encode)?;
        let write_err = |source| SessionError::Write {
            path: self.display_path(),
            source,
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
        }

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &body).await.map_err(write_err)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(
                &tmp,
                std::fs::Permissions::from_mode(0o600),
            )
            .await
            .map_err(write_err)?;
        }
        tokio::fs::rename(&tmp, &self.path).await.map_err(write_err)?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(SessionError::Write {
                path: self.display_path(),
                source,
            }),
        }
    }
}
