// Application state module
// Immutable runtime state shared by every request

use super::types::Config;

/// Decides whether a caller address may use the listing endpoint
pub trait CallerPolicy: Send + Sync {
    fn allows(&self, caller: &str) -> bool;
}

/// Single literal address allow-list (exact string comparison)
#[derive(Debug, Clone)]
pub struct AllowedCaller(pub String);

impl CallerPolicy for AllowedCaller {
    fn allows(&self, caller: &str) -> bool {
        caller == self.0
    }
}

impl<F> CallerPolicy for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn allows(&self, caller: &str) -> bool {
        self(caller)
    }
}

/// Application state
pub struct AppState {
    pub config: Config,
    pub policy: Box<dyn CallerPolicy>,
}

impl AppState {
    /// Create state with the configured single-address policy
    pub fn new(config: Config) -> Self {
        let policy = AllowedCaller(config.listing.allowed_caller.clone());
        Self::with_policy(config, policy)
    }

    /// Create state with a custom authorization policy
    pub fn with_policy(config: Config, policy: impl CallerPolicy + 'static) -> Self {
        Self {
            config,
            policy: Box::new(policy),
        }
    }

    pub fn access_log(&self) -> bool {
        self.config.logging.access_log
    }
}
