use tracing::debug;

use crate::shared::AppError;
use crate::websockets::RejoinPolicy;

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
pub const DEFAULT_ALLOWED_ORIGIN: &str = "https://askbitsians.netlify.app";

/// Process configuration, read from the environment
#[derive(Debug, Clone, PartialEq)]
pub struct RelayConfig {
    pub bind_address: String,
    pub port: u16,
    /// Origin allowed to make cross-origin HTTP requests
    pub allowed_origin: String,
    pub rejoin_policy: RejoinPolicy,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            allowed_origin: DEFAULT_ALLOWED_ORIGIN.to_string(),
            rejoin_policy: RejoinPolicy::default(),
        }
    }
}

impl RelayConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup. Unset or blank keys use defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let port = match get("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| {
                AppError::InvalidConfig(format!("PORT '{}' is not a valid port: {}", raw, e))
            })?,
            None => defaults.port,
        };

        let rejoin_policy = match get("REJOIN_POLICY") {
            Some(raw) => raw
                .parse::<RejoinPolicy>()
                .map_err(AppError::InvalidConfig)?,
            None => defaults.rejoin_policy,
        };

        // Browsers send origins without a trailing slash
        let allowed_origin = get("ALLOWED_ORIGIN")
            .map(|origin| origin.trim().trim_end_matches('/').to_string())
            .unwrap_or(defaults.allowed_origin);

        let bind_address = get("BIND_ADDRESS")
            .map(|address| address.trim().to_string())
            .unwrap_or(defaults.bind_address);

        let config = Self {
            bind_address,
            port,
            allowed_origin,
            rejoin_policy,
        };
        debug!(config = ?config, "Loaded configuration");
        Ok(config)
    }

    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}
