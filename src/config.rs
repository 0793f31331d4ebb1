//! Configuration loading and constants.
//!
//! Loads application configuration from TOML files and defines constants for
//! HTTP cache headers, the probed health path, environment variable names and
//! default paths. `AppConfig` is the root configuration struct containing all settings.

use const_format::formatcp;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// =============================================================================
// HTTP Response Cache Control
// =============================================================================
// Check results must reflect live upstream state, so API responses and the
// rendered check page are never stored by intermediaries.

/// Static assets (CSS, JS) - long cache
pub const HTTP_CACHE_STATIC_MAX_AGE: u32 = 3600;

pub const CACHE_CONTROL_NO_STORE: &str = "no-store, max-age=0";

pub const CACHE_CONTROL_STATIC: &str = formatcp!("public, max-age={}", HTTP_CACHE_STATIC_MAX_AGE);

// =============================================================================
// Upstream Probe Constants
// =============================================================================

/// Path of the auth service health endpoint, resolved against the project URL
pub const HEALTH_PATH: &str = "/auth/v1/health";

/// Environment variable holding the default project URL
pub const ENV_SUPABASE_URL: &str = "SUPABASE_URL";

/// Environment variable holding the default anon API key
pub const ENV_SUPABASE_ANON_KEY: &str = "SUPABASE_ANON_KEY";

/// User agent sent with every probe
pub const PROBE_USER_AGENT: &str = formatcp!("supacheck/{}", env!("CARGO_PKG_VERSION"));

// =============================================================================
// Default Paths and Strings
// =============================================================================

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Default directory for template files
pub const DEFAULT_TEMPLATES_DIR: &str = "templates";

/// Default directory for static files
pub const DEFAULT_STATIC_DIR: &str = "static";

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = "supacheck=debug,tower_http=info";

/// Default log format (text or json)
pub const DEFAULT_LOG_FORMAT: &str = "text";

/// Default page title
pub const DEFAULT_SITE_NAME: &str = "Supabase Connection Check";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration
    pub http: HttpServerConfig,
    /// Default project credentials and probe settings
    #[serde(default)]
    pub supabase: SupabaseConfig,
    #[serde(default)]
    pub ui: UiConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub tls: TlsConfig,
}

/// TLS mode for the check page and API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TlsMode {
    /// Plain HTTP, e.g. behind a reverse proxy
    #[default]
    None,
    /// User-provided certificate and key files
    Manual,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TlsConfig {
    #[serde(default)]
    pub mode: TlsMode,
    pub cert_path: Option<String>,
    pub key_path: Option<String>,
}

/// Default project credentials used when a check does not supply its own.
///
/// Both values are also shown in the check form, so they are never treated as
/// secret. Environment variables take precedence and are read on every check.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://your-project.supabase.co`
    pub url: Option<String>,
    /// Public anon API key
    pub anon_key: Option<String>,
    /// Probe timeout in seconds. Unset means the probe waits for the upstream.
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UiConfig {
    /// Title shown in the page header
    #[serde(default = "UiConfig::default_site_name")]
    pub site_name: String,
    /// Directory containing Tera templates
    #[serde(default = "UiConfig::default_templates_dir")]
    pub templates_dir: String,
    /// Directory containing CSS and JS assets
    #[serde(default = "UiConfig::default_static_dir")]
    pub static_dir: String,
    /// Version string, populated at runtime
    #[serde(skip_deserializing, default = "UiConfig::default_version")]
    pub version: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            site_name: Self::default_site_name(),
            templates_dir: Self::default_templates_dir(),
            static_dir: Self::default_static_dir(),
            version: Self::default_version(),
        }
    }
}

impl UiConfig {
    fn default_site_name() -> String {
        DEFAULT_SITE_NAME.to_string()
    }

    fn default_templates_dir() -> String {
        DEFAULT_TEMPLATES_DIR.to_string()
    }

    fn default_static_dir() -> String {
        DEFAULT_STATIC_DIR.to_string()
    }

    fn default_version() -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }

    /// Glob matching every template file
    pub fn template_glob(&self) -> String {
        PathBuf::from(&self.templates_dir)
            .join("**")
            .join("*")
            .to_string_lossy()
            .into_owned()
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log format: "text" (human-readable, default) or "json" (structured)
    #[serde(default = "LoggingConfig::default_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: DEFAULT_LOG_FORMAT.to_string(),
        }
    }
}

impl LoggingConfig {
    fn default_format() -> String {
        DEFAULT_LOG_FORMAT.to_string()
    }

    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl AppConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.http.tls.mode == TlsMode::Manual
            && (self.http.tls.cert_path.is_none() || self.http.tls.key_path.is_none())
        {
            return Err(ConfigError::Validation(
                "http.tls.mode = \"manual\" requires cert_path and key_path".to_string(),
            ));
        }

        if !matches!(self.logging.format.to_ascii_lowercase().as_str(), "text" | "json") {
            return Err(ConfigError::Validation(format!(
                "Unknown logging.format '{}', expected \"text\" or \"json\"",
                self.logging.format
            )));
        }

        if self.supabase.timeout_seconds == Some(0) {
            return Err(ConfigError::Validation(
                "supabase.timeout_seconds must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
}
