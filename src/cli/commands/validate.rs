//! Validate config command implementation

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("Validating configuration file: {config_path}");
        println!();

        // load_config validates as well; a failure here covers both
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("Configuration is invalid");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        let connector = &config.connector;
        println!("Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Environment: {:?}", config.environment);
        println!("  Log Level: {}", config.application.log_level);
        println!("  Konnektor: {}", connector.base_url);
        println!(
            "  EventService: {}",
            connector.endpoint(&connector.event_service_path)
        );
        println!(
            "  VSDService: {}",
            connector.endpoint(&connector.vsd_service_path)
        );
        println!(
            "  CertificateService: {}",
            connector.endpoint(&connector.certificate_service_path)
        );
        println!(
            "  Context: {} / {} / {}",
            connector.mandant_id, connector.client_system_id, connector.workplace_id
        );
        println!(
            "  Basic Auth: {}",
            if connector.username.is_some() { "enabled" } else { "disabled" }
        );
        println!("  TLS Verify: {}", connector.tls_verify);
        println!(
            "  File Logging: {}",
            if config.logging.local_enabled {
                config.logging.local_path.as_str()
            } else {
                "disabled"
            }
        );
        println!();
        Ok(0)
    }
}
