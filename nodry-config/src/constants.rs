//! Defaults and environment variable names shared by every config layer.

/// Matches the site's `NEXT_PUBLIC_API_URL` fallback.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_ATTACHMENT_MB: u64 = 10;
pub const BYTES_PER_MB: u64 = 1024 * 1024;

pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const SESSION_FILE_NAME: &str = "session.json";
/// Used when no platform data directory can be determined.
pub const FALLBACK_SESSION_FILE: &str = ".nodry-session.json";

pub const ENV_API_URL: &str = "NODRY_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "NODRY_HTTP_TIMEOUT_SECS";
pub const ENV_ACCEPT_INVALID_CERTS: &str = "NODRY_ACCEPT_INVALID_CERTS";
pub const ENV_SESSION_FILE: &str = "NODRY_SESSION_FILE";
pub const ENV_MAX_ATTACHMENT_MB: &str = "NODRY_MAX_ATTACHMENT_MB";
pub const ENV_CONFIG_FILE: &str = "NODRY_CONFIG";
