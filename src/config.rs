use std::env;
use thiserror::Error;

pub const DATABASE_URL_VAR: &str = "DATABASE_URL";
pub const API_BASE_URL_VAR: &str = "API_BASE_URL";

/// Default address for the (unimplemented) gRPC file service.
pub const DEFAULT_GRPC_SERVER: &str = "localhost:50051";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set (export it or add it to .env)")]
    Missing(&'static str),
}

/// Centralized application configuration.
/// Values come from the environment (after `.env` is loaded) and can be
/// overridden per command on the command line.
///
/// Empty values count as unset, and nothing is validated until a command
/// asks for it, so `file-client --backend grpc` works without a database
/// configured.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    pub database_url: Option<String>,
    pub api_base_url: Option<String>,
}

impl AppConfig {
    /// Read the process environment. Call `dotenvy::dotenv()` first if a
    /// `.env` file should be honoured.
    pub fn from_env() -> Self {
        Self::from_vars(
            env::var(DATABASE_URL_VAR).ok(),
            env::var(API_BASE_URL_VAR).ok(),
        )
    }

    pub fn from_vars(database_url: Option<String>, api_base_url: Option<String>) -> Self {
        Self {
            database_url: non_empty(database_url),
            api_base_url: non_empty(api_base_url),
        }
    }

    /// Apply a `--base-url` flag, which wins over `API_BASE_URL`.
    pub fn with_api_base_url(mut self, base_url: Option<String>) -> Self {
        if let Some(url) = non_empty(base_url) {
            self.api_base_url = Some(url);
        }
        self
    }

    pub fn require_database_url(&self) -> Result<&str, ConfigError> {
        self.database_url
            .as_deref()
            .ok_or(ConfigError::Missing(DATABASE_URL_VAR))
    }

    pub fn require_api_base_url(&self) -> Result<&str, ConfigError> {
        self.api_base_url
            .as_deref()
            .ok_or(ConfigError::Missing(API_BASE_URL_VAR))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
