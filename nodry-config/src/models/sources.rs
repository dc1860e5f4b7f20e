use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::{
    ENV_ACCEPT_INVALID_CERTS, ENV_API_URL, ENV_MAX_ATTACHMENT_MB,
    ENV_SESSION_FILE, ENV_TIMEOUT_SECS,
};
use crate::loader::error::ConfigError;
use crate::util::{non_blank, parse_bool};

/// Raw configuration as defined in a TOML file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub api: FileApiConfig,
    #[serde(default)]
    pub session: FileSessionConfig,
    #[serde(default)]
    pub uploads: FileUploadConfig,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileApiConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accept_invalid_certs: Option<bool>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileSessionConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileUploadConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_attachment_mb: Option<u64>,
}

/// Environment-derived configuration values.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub api_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub accept_invalid_certs: Option<bool>,
    pub session_file: Option<PathBuf>,
    pub max_attachment_mb: Option<u64>,
}

impl EnvConfig {
    /// Read overrides from the process environment.
    pub fn gather() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read overrides through an arbitrary lookup. Blank values count as
    /// unset; malformed values are rejected rather than ignored.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| non_blank(lookup(key));

        let parse_u64 = |key: &'static str| -> Result<Option<u64>, ConfigError> {
            read(key)
                .map(|raw| {
                    raw.parse::<u64>().map_err(|_| ConfigError::InvalidEnv {
                        key,
                        value: raw,
                        expected: "a non-negative integer",
                    })
                })
                .transpose()
        };

        let accept_invalid_certs = read(ENV_ACCEPT_INVALID_CERTS)
            .map(|raw| {
                parse_bool(&raw).ok_or(ConfigError::InvalidEnv {
                    key: ENV_ACCEPT_INVALID_CERTS,
                    value: raw,
                    expected: "a boolean",
                })
            })
            .transpose()?;

        Ok(Self {
            api_url: read(ENV_API_URL),
            timeout_secs: parse_u64(ENV_TIMEOUT_SECS)?,
            accept_invalid_certs,
            session_file: read(ENV_SESSION_FILE).map(PathBuf::from),
            max_attachment_mb: parse_u64(ENV_MAX_ATTACHMENT_MB)?,
        })
    }
}
