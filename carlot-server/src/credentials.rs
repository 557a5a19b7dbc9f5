//! Connection descriptor loading
//!
//! The descriptor (a Postgres connection string) is mounted as a file by the
//! deployment. It is read on demand, never cached here: the pool decides
//! when to ask again.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

/// Opaque connection string. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionDescriptor(String);

impl ConnectionDescriptor {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ConnectionDescriptor(<redacted>)")
    }
}

/// Credential source failures. All of them mean "not ready yet".
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("credentials unavailable: cannot read {path}: {source}")]
    Unreadable { path: PathBuf, source: io::Error },

    #[error("credentials unavailable: {path} is empty")]
    Empty { path: PathBuf },
}

/// Somewhere a connection descriptor can be read from
#[async_trait]
pub trait CredentialSource: Send + Sync {
    async fn load(&self) -> Result<ConnectionDescriptor, CredentialError>;
}

/// Reads the descriptor from a single file, trimming surrounding whitespace.
#[derive(Debug, Clone)]
pub struct FileCredentialSource {
    path: PathBuf,
}

impl FileCredentialSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CredentialSource for FileCredentialSource {
    async fn load(&self) -> Result<ConnectionDescriptor, CredentialError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| CredentialError::Unreadable {
                path: self.path.clone(),
                source,
            })?;

        let value = raw.trim();
        if value.is_empty() {
            return Err(CredentialError::Empty {
                path: self.path.clone(),
            });
        }

        tracing::debug!(path = %self.path.display(), "connection descriptor loaded");
        Ok(ConnectionDescriptor::new(value))
    }
}
