// Configuration module entry point
// Loads startup configuration and builds the shared runtime state

mod state;
mod types;

use crate::logger::Level;
use std::net::{IpAddr, SocketAddr};

// Re-export public types
pub use state::{AllowedCaller, AppState, CallerPolicy};
pub use types::{Config, ListingConfig, LoggingConfig, ServerConfig};

/// Environment variable prefix, e.g. `VIDEO_PAGE_LISTING__ROOT`
pub const ENV_PREFIX: &str = "VIDEO_PAGE";

impl Config {
    /// Load configuration from process environment variables
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(env_source())
    }

    /// Load configuration from the given environment source on top of defaults
    pub fn load_from(env: config::Environment) -> Result<Self, config::ConfigError> {
        let defaults = Self::default();
        let settings = config::Config::builder()
            .add_source(env)
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", i64::from(defaults.server.port))?
            .set_default(
                "listing.root",
                defaults.listing.root.to_string_lossy().into_owned(),
            )?
            .set_default("listing.allowed_caller", defaults.listing.allowed_caller)?
            .set_default("listing.static_prefix", defaults.listing.static_prefix)?
            .set_default("listing.allow_subpaths", defaults.listing.allow_subpaths)?
            .set_default("logging.level", defaults.logging.level)?
            .set_default("logging.access_log", defaults.logging.access_log)?
            .set_default("logging.access_log_format", defaults.logging.access_log_format)?
            .build()?;

        settings.try_deserialize()
    }

    /// Reject values that would only fail later, at request time
    pub fn validate(&self) -> Result<(), String> {
        self.get_socket_addr()?;

        if self.listing.allowed_caller.parse::<IpAddr>().is_err() {
            return Err(format!(
                "Invalid allowed caller address: '{}'",
                self.listing.allowed_caller
            ));
        }

        let prefix = &self.listing.static_prefix;
        if prefix.len() < 2 || !prefix.starts_with('/') || !prefix.ends_with('/') {
            return Err(format!(
                "Static prefix must look like '/name/', got '{prefix}'"
            ));
        }

        if Level::parse(&self.logging.level).is_none() {
            return Err(format!("Unknown log level: '{}'", self.logging.level));
        }

        Ok(())
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

fn env_source() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn load_with(vars: &[(&str, &str)]) -> Result<Config, config::ConfigError> {
        let map: config::Map<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Config::load_from(env_source().source(Some(map)))
    }

    #[test]
    fn test_defaults() {
        let cfg = load_with(&[]).unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.listing.root, Path::new("./videos"));
        assert_eq!(cfg.listing.allowed_caller, "192.168.65.1");
        assert_eq!(cfg.listing.static_prefix, "/videos/");
        assert!(cfg.listing.allow_subpaths);
        assert_eq!(cfg.logging.access_log_format, "combined");
        assert!(cfg.logging.access_log_file.is_none());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_environment_overrides() {
        let cfg = load_with(&[
            ("VIDEO_PAGE_SERVER__PORT", "9090"),
            ("VIDEO_PAGE_LISTING__ROOT", "/srv/media"),
            ("VIDEO_PAGE_LISTING__ALLOWED_CALLER", "10.0.0.7"),
            ("VIDEO_PAGE_LISTING__ALLOW_SUBPATHS", "false"),
        ])
        .unwrap();
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.listing.root, Path::new("/srv/media"));
        assert_eq!(cfg.listing.allowed_caller, "10.0.0.7");
        assert!(!cfg.listing.allow_subpaths);
    }

    #[test]
    fn test_validate_rejects_bad_caller() {
        let mut cfg = Config::default();
        cfg.listing.allowed_caller = "not-an-ip".to_string();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_prefix() {
        for prefix in ["/", "videos/", "/videos", ""] {
            let mut cfg = Config::default();
            cfg.listing.static_prefix = prefix.to_string();
            assert!(cfg.validate().is_err(), "prefix {prefix:?} accepted");
        }
    }

    #[test]
    fn test_validate_rejects_bad_level() {
        let mut cfg = Config::default();
        cfg.logging.level = "verbose".to_string();
        assert!(cfg.validate().is_err());
    }
}
