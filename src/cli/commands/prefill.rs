//! Prefill command implementation
//!
//! Runs one prefill request against the configured Konnektor and prints the
//! resulting bundle.

use crate::adapters::connector::{ConnectorServices, RuntimeConfig};
use crate::config::load_config;
use crate::core::{Notification, PrefillPipeline, PrefillRequest, PrefillService};
use crate::domain::{CorrelationId, ErrorKind, ReplyTo};
use clap::Args;
use tokio::sync::mpsc;

/// Arguments for the prefill command
#[derive(Args, Debug, Default)]
pub struct PrefillArgs {
    /// Write the bundle to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,

    /// Override the configured mandant id
    #[arg(long)]
    pub mandant_id: Option<String>,

    /// Override the configured client system id
    #[arg(long)]
    pub client_system_id: Option<String>,

    /// Override the configured workplace id
    #[arg(long)]
    pub workplace_id: Option<String>,

    /// User id to send with the Konnektor context
    #[arg(long)]
    pub user_id: Option<String>,

    /// Correlation id for the request (generated if omitted)
    #[arg(long)]
    pub correlation_id: Option<String>,
}

impl PrefillArgs {
    /// Per-request context overrides given on the command line
    pub fn runtime_config(&self) -> Option<RuntimeConfig> {
        let runtime = RuntimeConfig {
            mandant_id: self.mandant_id.clone(),
            client_system_id: self.client_system_id.clone(),
            workplace_id: self.workplace_id.clone(),
            user_id: self.user_id.clone(),
        };
        (!runtime.is_empty()).then_some(runtime)
    }

    /// Execute the prefill command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting prefill command");

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2);
            }
        };

        let services = match ConnectorServices::from_config(&config.connector) {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Failed to set up Konnektor client");
                eprintln!("Failed to set up Konnektor client: {e}");
                return Ok(2);
            }
        };

        let correlation_id = self
            .correlation_id
            .as_deref()
            .map(CorrelationId::new)
            .unwrap_or_else(CorrelationId::generate);
        let mut request = PrefillRequest::new(correlation_id, ReplyTo::new("cli"));
        if let Some(runtime) = self.runtime_config() {
            request = request.with_runtime_config(runtime);
        }

        let (tx, mut rx) = mpsc::channel(1);
        let service = PrefillService::new(PrefillPipeline::new(services), tx);
        let run = service.submit(request);
        drop(service);

        let exit_code = match rx.recv().await {
            Some(Notification::BundlesReady { bundles }) => {
                let mut json = String::new();
                for bundle in &bundles {
                    json.push_str(&bundle.to_json_pretty()?);
                    json.push('\n');
                }
                match self.output {
                    Some(ref path) => {
                        std::fs::write(path, json)?;
                        eprintln!("Bundle written to {path}");
                    }
                    None => print!("{json}"),
                }
                0
            }
            Some(Notification::Failed(failure)) => {
                eprintln!("Prefill failed: {}", failure.error);
                exit_code_for(failure.kind())
            }
            None => {
                eprintln!("Prefill run ended without a result");
                5
            }
        };

        if let Err(e) = run.await {
            tracing::error!(error = %e, "Prefill task did not finish cleanly");
        }

        Ok(exit_code)
    }
}

/// Process exit code for a failed run
pub fn exit_code_for(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::Configuration => 2,
        ErrorKind::MissingPrerequisite => 3,
        ErrorKind::Connectivity | ErrorKind::Decode | ErrorKind::Cryptographic => 4,
        ErrorKind::Internal => 5,
    }
}
