//! Configuration management.
//!
//! TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! The configuration file supports:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `PREFILL_*` environment overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use prefill::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("prefill.toml")?;
//! println!("Konnektor: {}", config.connector.base_url);
//! # Ok(())
//! # }
//! ```
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [connector]
//! base_url = "https://konnektor.praxis.local"
//! mandant_id = "Mandant1"
//! client_system_id = "ClientID1"
//! workplace_id = "Workplace1"
//! username = "praxis"
//! password = "${PREFILL_KONNEKTOR_PASSWORD}"
//! tls_ca_cert = "/etc/prefill/konnektor-ca.pem"
//!
//! [logging]
//! local_path = "/var/log/prefill"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{ApplicationConfig, ConnectorConfig, Environment, LoggingConfig, PrefillConfig};
pub use secret::{secret_string, secret_string_opt, SecretString, SecretValue};
