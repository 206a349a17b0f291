//! Configuration management for the analytics server

use analytics_store::{StoreLimits, DEFAULT_RECENT_VIEWS, DEFAULT_RETENTION_CAP, DEFAULT_TOP_PAGES};
use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Older deployments set the dashboard code through this variable
pub const LEGACY_ACCESS_CODE_VAR: &str = "ANALYTICS_CODE";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Analytics store and dashboard configuration
    pub analytics: AnalyticsConfig,
}

/// Server-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
}

/// Analytics-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Bearer code the dashboard must present. There is no fallback value.
    #[serde(default)]
    pub access_code: Option<String>,
    /// Maximum number of page views kept in memory
    pub retention_cap: usize,
    /// Number of entries in `topPages`
    pub top_pages: usize,
    /// Number of entries in `recentPageViews`
    pub recent_views: usize,
    /// Paths starting with any of these are acknowledged but not recorded
    #[serde(default)]
    pub ignored_path_prefixes: Vec<String>,
}

impl AppConfig {
    /// Load configuration from file, on top of the defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Self::defaults()?
            .add_source(config::File::from(path.as_ref()))
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Self::defaults()?
            // Configuration file
            .add_source(config::File::with_name("config/analytics").required(false))
            // Environment variables, e.g. DOCS_ANALYTICS__SERVER__PORT
            .add_source(config::Environment::with_prefix("DOCS_ANALYTICS").separator("__"));

        if let Ok(code) = std::env::var(LEGACY_ACCESS_CODE_VAR) {
            builder = builder.set_override("analytics.access_code", code)?;
        }

        builder.build()?.try_deserialize()
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3048)?
            .set_default("analytics.retention_cap", DEFAULT_RETENTION_CAP as i64)?
            .set_default("analytics.top_pages", DEFAULT_TOP_PAGES as i64)?
            .set_default("analytics.recent_views", DEFAULT_RECENT_VIEWS as i64)?
            .set_default(
                "analytics.ignored_path_prefixes",
                vec!["/analytics-dashboard"],
            )
    }

    /// Reject configurations the server must not start with.
    ///
    /// A missing access code is an error rather than a reason to fall back
    /// to a guessable default.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.access_code().is_none() {
            return Err(ConfigError::Message(
                "analytics.access_code must be set (or ANALYTICS_CODE in the environment)"
                    .to_string(),
            ));
        }
        if self.analytics.retention_cap == 0 {
            return Err(ConfigError::Message(
                "analytics.retention_cap must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Configured access code, if any non-empty one is set
    pub fn access_code(&self) -> Option<&str> {
        self.analytics
            .access_code
            .as_deref()
            .filter(|code| !code.trim().is_empty())
    }

    /// Get the socket address for the server
    pub fn socket_addr(&self) -> Result<std::net::SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.server.host, self.server.port).parse()
    }

    /// Limits for the in-memory store
    pub fn store_limits(&self) -> StoreLimits {
        StoreLimits {
            retention_cap: self.analytics.retention_cap,
            top_pages: self.analytics.top_pages,
            recent_views: self.analytics.recent_views,
        }
    }

    /// Whether views of `path` are left out of the analytics
    pub fn is_ignored_path(&self, path: &str) -> bool {
        self.analytics
            .ignored_path_prefixes
            .iter()
            .any(|prefix| !prefix.is_empty() && path.starts_with(prefix.as_str()))
    }
}

impl Default for AppConfig {
    /// Defaults without an access code; `validate` rejects this until one is set
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3048,
            },
            analytics: AnalyticsConfig {
                access_code: None,
                retention_cap: DEFAULT_RETENTION_CAP,
                top_pages: DEFAULT_TOP_PAGES,
                recent_views: DEFAULT_RECENT_VIEWS,
                ignored_path_prefixes: vec!["/analytics-dashboard".to_string()],
            },
        }
    }
}
