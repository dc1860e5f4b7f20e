//! Client configuration for No Dry Starts tools.
//!
//! Values are layered: compiled defaults, then an optional TOML file, then a
//! `.env` file and the process environment, then explicit overrides such as
//! command-line flags. The resulting [`ClientConfig`] carries everything the
//! API client needs (base URL, timeout, session file, upload limit).

pub mod constants;
pub mod loader;
pub mod models;
pub mod util;

pub use loader::{
    ConfigLoader, compose, default_config_path, default_session_path,
    error::ConfigError, normalize_base_url, read_file_config,
};
pub use models::sources::{EnvConfig, FileConfig};
pub use models::{
    ApiConfig, ClientConfig, ConfigMetadata, SessionConfig, UploadConfig,
};
