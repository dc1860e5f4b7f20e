pub mod error;

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use url::Url;

use crate::constants::{
    CONFIG_FILE_NAME, DEFAULT_API_URL, DEFAULT_MAX_ATTACHMENT_MB,
    DEFAULT_TIMEOUT_SECS, ENV_CONFIG_FILE, FALLBACK_SESSION_FILE,
    SESSION_FILE_NAME,
};
use crate::models::sources::{EnvConfig, FileConfig};
use crate::models::{
    ApiConfig, ClientConfig, ConfigMetadata, SessionConfig, UploadConfig,
};
use error::ConfigError;

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "nodrystarts", "nodry")
}

/// `<config dir>/nodry/config.toml` on the current platform.
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

/// `<data dir>/nodry/session.json`, or a dotfile in the working directory
/// when the platform has no data directory.
pub fn default_session_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().join(SESSION_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(FALLBACK_SESSION_FILE))
}

/// Normalize a user-supplied API base URL.
///
/// Whitespace and trailing slashes are stripped and `http://` is assumed
/// when no scheme is given, so `localhost:8000/api/` becomes
/// `http://localhost:8000/api`. The scheme is matched case-insensitively
/// and written in lower case.
pub fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let with_scheme = match trimmed.split_once("://") {
        Some((scheme, rest))
            if scheme.eq_ignore_ascii_case("http")
                || scheme.eq_ignore_ascii_case("https") =>
        {
            format!("{}://{rest}", scheme.to_ascii_lowercase())
        }
        _ => format!("http://{trimmed}"),
    };

    Url::parse(&with_scheme).map_err(|source| ConfigError::InvalidBaseUrl {
        value: raw.to_string(),
        source,
    })?;

    if with_scheme != raw {
        log::debug!(
            "[ConfigLoader] Normalized base URL from '{}' to '{}'",
            raw,
            with_scheme
        );
    }
    Ok(with_scheme)
}

/// Builds a [`ClientConfig`] from defaults, a TOML file, an optional `.env`
/// file and the process environment, in increasing order of precedence.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
    env_file_path: Option<PathBuf>,
    api_url_override: Option<String>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an explicit config file. Unlike the default location it must
    /// exist.
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Load a specific `.env` file instead of searching for one.
    pub fn with_env_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.env_file_path = Some(path.into());
        self
    }

    /// Highest-precedence base URL, e.g. from a command-line flag.
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url_override = Some(url.into());
        self
    }

    pub fn load(&self) -> Result<ClientConfig, ConfigError> {
        let env_file_path = self.load_env_file()?;
        let env = EnvConfig::gather()?;

        let config_path = self
            .config_path
            .clone()
            .or_else(|| std::env::var(ENV_CONFIG_FILE).ok().map(PathBuf::from));
        let (file, config_path) = match config_path {
            Some(path) => (read_file_config(&path)?, Some(path)),
            None => match default_config_path().filter(|p| p.exists()) {
                Some(path) => (read_file_config(&path)?, Some(path)),
                None => (FileConfig::default(), None),
            },
        };

        let mut env = env;
        if let Some(url) = self.api_url_override.clone() {
            env.api_url = Some(url);
        }

        compose(
            file,
            env,
            ConfigMetadata {
                config_path,
                env_file_path,
            },
        )
    }

    fn load_env_file(&self) -> Result<Option<PathBuf>, ConfigError> {
        match &self.env_file_path {
            Some(path) => {
                dotenvy::from_path(path).map_err(|source| {
                    ConfigError::EnvFile {
                        path: path.clone(),
                        source,
                    }
                })?;
                Ok(Some(path.clone()))
            }
            None => Ok(dotenvy::dotenv().ok()),
        }
    }
}

/// Parse a TOML config file.
pub fn read_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let raw =
        std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Merge the layers: environment over file over defaults.
pub fn compose(
    file: FileConfig,
    env: EnvConfig,
    metadata: ConfigMetadata,
) -> Result<ClientConfig, ConfigError> {
    let raw_url = env
        .api_url
        .or(file.api.base_url)
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());
    let base_url = normalize_base_url(&raw_url)?;

    let timeout_secs = env
        .timeout_secs
        .or(file.api.timeout_secs)
        .unwrap_or(DEFAULT_TIMEOUT_SECS);
    if timeout_secs == 0 {
        return Err(ConfigError::Zero {
            field: "api.timeout_secs",
        });
    }

    let accept_invalid_certs = env
        .accept_invalid_certs
        .or(file.api.accept_invalid_certs)
        .unwrap_or(false);

    let session_path = env
        .session_file
        .or(file.session.path)
        .unwrap_or_else(default_session_path);

    let max_attachment_mb = env
        .max_attachment_mb
        .or(file.uploads.max_attachment_mb)
        .unwrap_or(DEFAULT_MAX_ATTACHMENT_MB);
    if max_attachment_mb == 0 {
        return Err(ConfigError::Zero {
            field: "uploads.max_attachment_mb",
        });
    }

    Ok(ClientConfig {
        api: ApiConfig {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
            accept_invalid_certs,
        },
        session: SessionConfig { path: session_path },
        uploads: UploadConfig::from_megabytes(max_attachment_mb),
        metadata,
    })
}
