//! Konnektor session context
//!
//! Every Konnektor call carries a context naming the mandant, client system,
//! workplace and optionally the user. Defaults come from configuration; a
//! request may override any of them through its [`RuntimeConfig`].

use crate::config::ConnectorConfig;
use crate::domain::{PrefillError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Session context sent with every Konnektor call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorContext {
    pub mandant_id: String,
    pub client_system_id: String,
    pub workplace_id: String,
    pub user_id: Option<String>,
}

/// Per-request overrides of the configured context
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeConfig {
    #[serde(default)]
    pub mandant_id: Option<String>,
    #[serde(default)]
    pub client_system_id: Option<String>,
    #[serde(default)]
    pub workplace_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl RuntimeConfig {
    /// Returns true if no field is overridden
    pub fn is_empty(&self) -> bool {
        self.mandant_id.is_none()
            && self.client_system_id.is_none()
            && self.workplace_id.is_none()
            && self.user_id.is_none()
    }
}

/// Source of the session context for one run
#[async_trait]
pub trait ContextProvider: Send + Sync {
    /// Acquires the context for a run, applying the request's overrides
    async fn acquire(&self, runtime: Option<&RuntimeConfig>) -> Result<ConnectorContext>;
}

/// Context provider backed by the `[connector]` configuration section
#[derive(Debug, Clone)]
pub struct ConfiguredContextProvider {
    defaults: ConnectorContext,
}

impl ConfiguredContextProvider {
    pub fn new(defaults: ConnectorContext) -> Self {
        Self { defaults }
    }

    pub fn from_config(config: &ConnectorConfig) -> Self {
        Self::new(ConnectorContext {
            mandant_id: config.mandant_id.clone(),
            client_system_id: config.client_system_id.clone(),
            workplace_id: config.workplace_id.clone(),
            user_id: config.user_id.clone(),
        })
    }
}

#[async_trait]
impl ContextProvider for ConfiguredContextProvider {
    async fn acquire(&self, runtime: Option<&RuntimeConfig>) -> Result<ConnectorContext> {
        let mut ctx = self.defaults.clone();

        if let Some(runtime) = runtime {
            if let Some(ref v) = runtime.mandant_id {
                ctx.mandant_id = v.clone();
            }
            if let Some(ref v) = runtime.client_system_id {
                ctx.client_system_id = v.clone();
            }
            if let Some(ref v) = runtime.workplace_id {
                ctx.workplace_id = v.clone();
            }
            if runtime.user_id.is_some() {
                ctx.user_id = runtime.user_id.clone();
            }
        }

        for (name, value) in [
            ("mandant_id", &ctx.mandant_id),
            ("client_system_id", &ctx.client_system_id),
            ("workplace_id", &ctx.workplace_id),
        ] {
            if value.trim().is_empty() {
                return Err(PrefillError::Configuration(format!(
                    "Konnektor context field {name} is empty"
                )));
            }
        }

        tracing::debug!(
            mandant_id = %ctx.mandant_id,
            client_system_id = %ctx.client_system_id,
            workplace_id = %ctx.workplace_id,
            overridden = runtime.is_some_and(|r| !r.is_empty()),
            "Acquired Konnektor context"
        );

        Ok(ctx)
    }
}
