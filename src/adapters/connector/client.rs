//! Konnektor service bundle
//!
//! The pipeline depends on four seams: the context provider and the three
//! Konnektor services. [`ConnectorServices`] holds one implementation of each
//! so a run can be wired against a real Konnektor or against test fakes.

use super::context::{ConfiguredContextProvider, ContextProvider};
use super::konnektor::KonnektorClient;
use super::traits::{CertificateService, EventService, VsdService};
use crate::config::ConnectorConfig;
use crate::domain::Result;
use std::sync::Arc;

/// The Konnektor-facing services a prefill run uses
#[derive(Clone)]
pub struct ConnectorServices {
    context: Arc<dyn ContextProvider>,
    events: Arc<dyn EventService>,
    vsd: Arc<dyn VsdService>,
    certificates: Arc<dyn CertificateService>,
}

impl ConnectorServices {
    /// Wire explicit implementations
    pub fn new(
        context: Arc<dyn ContextProvider>,
        events: Arc<dyn EventService>,
        vsd: Arc<dyn VsdService>,
        certificates: Arc<dyn CertificateService>,
    ) -> Self {
        Self {
            context,
            events,
            vsd,
            certificates,
        }
    }

    /// Create services backed by a single [`KonnektorClient`]
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use prefill::adapters::connector::ConnectorServices;
    /// use prefill::config::ConnectorConfig;
    ///
    /// # fn example() -> prefill::domain::Result<()> {
    /// let services = ConnectorServices::from_config(&ConnectorConfig::default())?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_config(config: &ConnectorConfig) -> Result<Self> {
        let client = Arc::new(KonnektorClient::new(config)?);
        tracing::info!(base_url = %config.base_url, "Konnektor client initialized");

        Ok(Self::new(
            Arc::new(ConfiguredContextProvider::from_config(config)),
            client.clone(),
            client.clone(),
            client,
        ))
    }

    pub fn context(&self) -> &Arc<dyn ContextProvider> {
        &self.context
    }

    pub fn events(&self) -> &Arc<dyn EventService> {
        &self.events
    }

    pub fn vsd(&self) -> &Arc<dyn VsdService> {
        &self.vsd
    }

    pub fn certificates(&self) -> &Arc<dyn CertificateService> {
        &self.certificates
    }
}

impl std::fmt::Debug for ConnectorServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectorServices").finish_non_exhaustive()
    }
}
