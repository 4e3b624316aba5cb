//! Web configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; a bare `homehaven-web` starts an in-memory
//! deployment bound to localhost.
//!
//! - `HH_HOST` - Bind address (default: 127.0.0.1)
//! - `HH_PORT` - Listen port (default: 3000)
//! - `HH_DATA_DIR` - Directory for durable JSON collections (default: in-memory)
//! - `HH_CONTENT_FILE` - JSON file to seed the content catalog from
//!   (default: the bundled starter catalog)
//! - `HH_JURISDICTION` - Deployment jurisdiction code (default: NG)
//! - `HH_STORE_POLICY` - Policy name shown in restriction notices
//! - `HH_DISABLED_REQUEST_TYPES` - Comma-separated request types to disable
//!   (e.g. `escort,other`)
//! - `HH_CONSENT_REGIONS` - Comma-separated jurisdictions where under-13
//!   users need parental consent

use std::collections::HashSet;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;

use homehaven_core::policy::PolicyContext;
use homehaven_core::taxonomy::RequestType;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Web application configuration.
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Data directory for the durable store; `None` runs in memory
    pub data_dir: Option<PathBuf>,
    /// Content catalog file to seed from; `None` uses the bundled catalog
    pub content_file: Option<PathBuf>,
    /// Jurisdiction the deployment operates in
    pub jurisdiction: String,
    /// Policy name behind any request-type restrictions
    pub store_policy: String,
    /// Request types disabled in this jurisdiction
    pub disabled_request_types: HashSet<RequestType>,
    /// Jurisdictions where under-13 users need parental consent
    pub consent_regions: HashSet<String>,
}

impl WebConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a set variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("HH_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("HH_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("HH_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("HH_PORT".to_string(), e.to_string()))?;

        let data_dir = get_optional_env("HH_DATA_DIR").map(PathBuf::from);
        let content_file = get_optional_env("HH_CONTENT_FILE").map(PathBuf::from);

        let jurisdiction = get_env_or_default("HH_JURISDICTION", "NG");
        let store_policy = get_env_or_default("HH_STORE_POLICY", "local service regulations");
        let disabled_request_types =
            parse_request_types(&get_env_or_default("HH_DISABLED_REQUEST_TYPES", ""))
                .map_err(|e| ConfigError::InvalidEnvVar("HH_DISABLED_REQUEST_TYPES".into(), e))?;
        let consent_regions = parse_regions(&get_env_or_default("HH_CONSENT_REGIONS", ""));

        Ok(Self {
            host,
            port,
            data_dir,
            content_file,
            jurisdiction,
            store_policy,
            disabled_request_types,
            consent_regions,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Build the policy context the facade enforces.
    #[must_use]
    pub fn policy_context(&self) -> PolicyContext {
        PolicyContext {
            jurisdiction: self.jurisdiction.clone(),
            store_policy: self.store_policy.clone(),
            disabled_request_types: self.disabled_request_types.clone(),
            parental_consent_required_regions: self.consent_regions.clone(),
        }
    }
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a comma-separated request-type list (e.g. `"escort,other"`).
fn parse_request_types(raw: &str) -> Result<HashSet<RequestType>, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            serde_json::from_value::<RequestType>(serde_json::Value::String(token.to_owned()))
                .map_err(|_| format!("unknown request type \"{token}\""))
        })
        .collect()
}

/// Parse a comma-separated jurisdiction list, uppercased.
fn parse_regions(raw: &str) -> HashSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_uppercase)
        .collect()
}
