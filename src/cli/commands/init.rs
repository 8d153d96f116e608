//! Init command implementation
//!
//! Generates a sample configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "prefill.toml")]
    pub output: String,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        if Path::new(&self.output).exists() && !self.force {
            println!("Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Set base_url and the context ids in [connector]");
                println!("  2. If the Konnektor requires basic auth, set");
                println!("     PREFILL_CONNECTOR_USERNAME and PREFILL_CONNECTOR_PASSWORD in .env");
                println!("  3. Validate configuration: prefill validate-config");
                println!("  4. Insert cards and run: prefill prefill");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }

    fn generate_minimal_config() -> String {
        r#"# Prefill Configuration File

environment = "development"

[application]
log_level = "info"

[connector]
base_url = "https://konnektor.praxis.local"
mandant_id = "Mandant1"
client_system_id = "ClientID1"
workplace_id = "Workplace1"
tls_verify = true
timeout_seconds = 30

[logging]
local_enabled = true
local_path = "/var/log/prefill"
local_rotation = "daily"
local_max_files = 7
"#
        .to_string()
    }

    fn generate_config_with_examples() -> String {
        r#"# Prefill Configuration File
#
# Reads the cards inserted at a workplace through the Konnektor and assembles
# a KBV e-prescription bundle from them.
#
# Values of the form ${VAR} are substituted from the environment. Any setting
# can also be overridden with a PREFILL_<SECTION>_<KEY> environment variable.

# Runtime environment (development, staging, production)
# Production refuses to run with tls_verify = false.
environment = "development"

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# ============================================================================
# Konnektor
# ============================================================================
[connector]
# Base URL of the Konnektor
base_url = "https://konnektor.praxis.local"

# Service endpoint paths, relative to base_url
event_service_path = "/ws/EventService"
vsd_service_path = "/ws/VSDService"
certificate_service_path = "/ws/CertificateService"

# Default session context. A request may override these.
mandant_id = "Mandant1"
client_system_id = "ClientID1"
workplace_id = "Workplace1"
# user_id = "Dr. Alexander Fuchs"

# HTTP basic authentication (set both or neither)
# username = "${PREFILL_CONNECTOR_USERNAME}"
# password = "${PREFILL_CONNECTOR_PASSWORD}"

# TLS: verify the Konnektor's certificate, optionally against a private CA
tls_verify = true
# tls_ca_cert = "/etc/prefill/konnektor-ca.pem"

# Request timeout in seconds
timeout_seconds = 30

# ============================================================================
# Logging
# ============================================================================
[logging]
# JSON log files next to the console output
local_enabled = true
local_path = "/var/log/prefill"

# Rotation: daily, hourly or never
local_rotation = "daily"

# Rotated files to keep
local_max_files = 7
"#
        .to_string()
    }
}
