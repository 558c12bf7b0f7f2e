// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub listing: ListingConfig,
    pub logging: LoggingConfig,
}

/// Listener configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Directory listing and file serving configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ListingConfig {
    /// Directory whose contents are listed and served
    pub root: PathBuf,
    /// The one caller address permitted to see listings
    pub allowed_caller: String,
    /// Public mount point of `root` (e.g. `/videos/`)
    pub static_prefix: String,
    /// List nested directories, not only the root
    pub allow_subpaths: bool,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common or json)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            listing: ListingConfig {
                root: PathBuf::from("./videos"),
                allowed_caller: "192.168.65.1".to_string(),
                static_prefix: "/videos/".to_string(),
                allow_subpaths: true,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                access_log: true,
                access_log_format: default_access_log_format(),
                access_log_file: None,
                error_log_file: None,
            },
        }
    }
}
