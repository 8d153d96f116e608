//! Configuration schema types
//!
//! This module defines the configuration structure for the prefill service.

use crate::config::SecretString;
use serde::{Deserialize, Serialize};

/// Runtime environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment
    #[default]
    Development,
    /// Staging environment
    Staging,
    /// Production environment
    Production,
}

/// Main prefill configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrefillConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Runtime environment (development, staging, production)
    #[serde(default)]
    pub environment: Environment,

    /// Konnektor connection and default session context
    pub connector: ConnectorConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl PrefillConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.connector.validate(&self.environment)?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Konnektor configuration
///
/// The context ids are the defaults every run uses unless the request brings
/// its own runtime overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorConfig {
    /// Base URL of the Konnektor, e.g. `https://konnektor.praxis.local`
    pub base_url: String,

    /// Path of the EventService endpoint
    #[serde(default = "default_event_service_path")]
    pub event_service_path: String,

    /// Path of the VSDService endpoint
    #[serde(default = "default_vsd_service_path")]
    pub vsd_service_path: String,

    /// Path of the CertificateService endpoint
    #[serde(default = "default_certificate_service_path")]
    pub certificate_service_path: String,

    /// Mandant id of the session context
    pub mandant_id: String,

    /// Client system id of the session context
    pub client_system_id: String,

    /// Workplace id of the session context
    pub workplace_id: String,

    /// User id of the session context (optional)
    #[serde(default)]
    pub user_id: Option<String>,

    /// Username for HTTP basic authentication (optional)
    #[serde(default)]
    pub username: Option<String>,

    /// Password for HTTP basic authentication (optional)
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub password: Option<SecretString>,

    /// TLS certificate verification enabled
    ///
    /// **SECURITY WARNING**: Konnektors commonly ship self-signed certificates.
    /// Prefer `tls_ca_cert` over disabling verification. Disabling is rejected
    /// in production environments.
    #[serde(default = "default_true")]
    pub tls_verify: bool,

    /// Optional PEM CA certificate path for the Konnektor's TLS certificate
    #[serde(default)]
    pub tls_ca_cert: Option<String>,

    /// Timeout in seconds for each Konnektor call
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl ConnectorConfig {
    fn validate(&self, environment: &Environment) -> Result<(), String> {
        use secrecy::ExposeSecret;

        if self.base_url.is_empty() {
            return Err("connector.base_url cannot be empty".to_string());
        }

        let url = url::Url::parse(&self.base_url)
            .map_err(|e| format!("connector.base_url is not a valid URL: {e}"))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err("connector.base_url must start with http:// or https://".to_string());
        }

        for (name, path) in [
            ("event_service_path", &self.event_service_path),
            ("vsd_service_path", &self.vsd_service_path),
            ("certificate_service_path", &self.certificate_service_path),
        ] {
            if !path.starts_with('/') {
                return Err(format!("connector.{name} must start with '/'"));
            }
        }

        if self.mandant_id.trim().is_empty() {
            return Err("connector.mandant_id cannot be empty".to_string());
        }
        if self.client_system_id.trim().is_empty() {
            return Err("connector.client_system_id cannot be empty".to_string());
        }
        if self.workplace_id.trim().is_empty() {
            return Err("connector.workplace_id cannot be empty".to_string());
        }

        // Basic auth needs both halves
        let has_username = self.username.as_ref().is_some_and(|s| !s.is_empty());
        let has_password = self
            .password
            .as_ref()
            .is_some_and(|s| !s.expose_secret().is_empty());
        if has_username != has_password {
            return Err(
                "connector.username and connector.password must be set together".to_string(),
            );
        }

        if self.timeout_seconds == 0 {
            return Err("connector.timeout_seconds must be > 0".to_string());
        }

        if *environment == Environment::Production && !self.tls_verify {
            return Err(
                "TLS certificate verification cannot be disabled in production environments. \
                Either set 'tls_verify = true' or provide the Konnektor CA using 'tls_ca_cert'."
                    .to_string(),
            );
        }

        Ok(())
    }

    /// Full URL of a service endpoint
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            base_url: "https://konnektor.praxis.local".to_string(),
            event_service_path: default_event_service_path(),
            vsd_service_path: default_vsd_service_path(),
            certificate_service_path: default_certificate_service_path(),
            mandant_id: "Mandant1".to_string(),
            client_system_id: "ClientID1".to_string(),
            workplace_id: "Workplace1".to_string(),
            user_id: None,
            username: None,
            password: None,
            tls_verify: true,
            tls_ca_cert: None,
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default = "default_true")]
    pub local_enabled: bool,

    /// Local log file path
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,

    /// Number of rotated log files to keep
    #[serde(default = "default_local_max_files")]
    pub local_max_files: usize,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_max_files == 0 {
            return Err("logging.local_max_files must be > 0".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: true,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
            local_max_files: default_local_max_files(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_event_service_path() -> String {
    "/ws/EventService".to_string()
}

fn default_vsd_service_path() -> String {
    "/ws/VSDService".to_string()
}

fn default_certificate_service_path() -> String {
    "/ws/CertificateService".to_string()
}

fn default_local_path() -> String {
    "/var/log/prefill".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

fn default_local_max_files() -> usize {
    7
}
