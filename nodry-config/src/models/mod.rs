pub mod sources;

use std::path::PathBuf;
use std::time::Duration;

use crate::constants::BYTES_PER_MB;

/// Effective configuration for talking to the backend.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub uploads: UploadConfig,
    pub metadata: ConfigMetadata,
}

impl ClientConfig {
    pub fn base_url(&self) -> &str {
        &self.api.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.api.timeout
    }

    pub fn session_path(&self) -> &PathBuf {
        &self.session.path
    }

    pub fn max_attachment_bytes(&self) -> u64 {
        self.uploads.max_attachment_bytes
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Normalized: no trailing slash, always carries a scheme.
    pub base_url: String,
    pub timeout: Duration,
    pub accept_invalid_certs: bool,
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// JSON file holding the persisted token pair
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub max_attachment_bytes: u64,
}

impl UploadConfig {
    pub fn from_megabytes(mb: u64) -> Self {
        Self {
            max_attachment_bytes: mb.saturating_mul(BYTES_PER_MB),
        }
    }
}

/// Where the effective values came from.
#[derive(Debug, Clone, Default)]
pub struct ConfigMetadata {
    pub config_path: Option<PathBuf>,
    pub env_file_path: Option<PathBuf>,
}
