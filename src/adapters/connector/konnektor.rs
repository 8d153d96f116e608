//! Konnektor SOAP client
//!
//! Implements the event, VSD and certificate service traits against a
//! Konnektor's SOAP endpoints.

use super::context::ConnectorContext;
use super::soap::{self, Operation};
use super::traits::{CertificateService, EventService, RawInsuranceData, VsdService};
use crate::config::{ConnectorConfig, SecretString};
use crate::domain::card::{CardHandle, CardInfo, CardType, CertRef};
use crate::domain::{ConnectorError, PrefillError, Result};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use secrecy::ExposeSecret;
use std::time::Duration;

/// SOAP client for a single Konnektor
///
/// # Example
///
/// ```no_run
/// use prefill::adapters::connector::{ConnectorContext, EventService, KonnektorClient};
/// use prefill::config::ConnectorConfig;
/// use prefill::domain::CardType;
///
/// # async fn example() -> prefill::domain::Result<()> {
/// let client = KonnektorClient::new(&ConnectorConfig::default())?;
/// let ctx = ConnectorContext {
///     mandant_id: "Mandant1".to_string(),
///     client_system_id: "ClientID1".to_string(),
///     workplace_id: "Workplace1".to_string(),
///     user_id: None,
/// };
/// let cards = client.get_cards(&ctx, CardType::Hba).await?;
/// # Ok(())
/// # }
/// ```
pub struct KonnektorClient {
    client: Client,
    event_service_url: String,
    vsd_service_url: String,
    certificate_service_url: String,
    credentials: Option<(String, SecretString)>,
}

impl KonnektorClient {
    /// Create a client from the `[connector]` configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the CA certificate cannot be read or
    /// the HTTP client cannot be built.
    pub fn new(config: &ConnectorConfig) -> Result<Self> {
        let mut client_builder = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.timeout_seconds.min(30)));

        if let Some(ref ca_path) = config.tls_ca_cert {
            let pem = std::fs::read(ca_path).map_err(|e| {
                PrefillError::Configuration(format!(
                    "Failed to read Konnektor CA certificate {ca_path}: {e}"
                ))
            })?;
            let certificate = reqwest::Certificate::from_pem(&pem).map_err(|e| {
                PrefillError::Configuration(format!(
                    "Invalid Konnektor CA certificate {ca_path}: {e}"
                ))
            })?;
            client_builder = client_builder.add_root_certificate(certificate);
        }

        if !config.tls_verify {
            tracing::warn!("TLS certificate verification is disabled for the Konnektor");
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        let client = client_builder.build().map_err(|e| {
            PrefillError::Configuration(format!("Failed to build HTTP client: {e}"))
        })?;

        let credentials = match (&config.username, &config.password) {
            (Some(username), Some(password)) => Some((username.clone(), password.clone())),
            _ => None,
        };

        Ok(Self {
            client,
            event_service_url: config.endpoint(&config.event_service_path),
            vsd_service_url: config.endpoint(&config.vsd_service_path),
            certificate_service_url: config.endpoint(&config.certificate_service_path),
            credentials,
        })
    }

    /// Posts an envelope and returns the response body
    ///
    /// SOAP faults are reported before the HTTP status is looked at, since
    /// Konnektors answer faults with status 500.
    async fn call(&self, url: &str, operation: Operation, envelope: String) -> Result<String> {
        tracing::debug!(operation = operation.name, url = %url, "Calling Konnektor");

        let mut request = self
            .client
            .post(url)
            .header("Content-Type", "text/xml; charset=utf-8")
            .header("SOAPAction", format!("\"{}\"", operation.soap_action))
            .body(envelope);

        if let Some((ref username, ref password)) = self.credentials {
            request = request.basic_auth(username, Some(password.expose_secret().as_ref()));
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ConnectorError::Timeout(format!("{} timed out: {e}", operation.name))
            } else {
                ConnectorError::ConnectionFailed(format!("{}: {e}", operation.name))
            }
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            ConnectorError::InvalidResponse(format!(
                "Failed to read {} response body: {e}",
                operation.name
            ))
        })?;

        if let Some(fault) = soap::find_fault(operation, &body) {
            tracing::warn!(operation = operation.name, error = %fault, "Konnektor returned a SOAP fault");
            return Err(fault.into());
        }

        if status.is_server_error() {
            return Err(ConnectorError::ServerError {
                status: status.as_u16(),
                message: format!("{} failed: {}", operation.name, truncate(&body)),
            }
            .into());
        }
        if !status.is_success() {
            return Err(ConnectorError::ClientError {
                status: status.as_u16(),
                message: format!("{} rejected: {}", operation.name, truncate(&body)),
            }
            .into());
        }

        Ok(body)
    }
}

fn truncate(body: &str) -> &str {
    match body.char_indices().nth(200) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

#[async_trait]
impl EventService for KonnektorClient {
    async fn get_cards(
        &self,
        ctx: &ConnectorContext,
        card_type: CardType,
    ) -> Result<Vec<CardInfo>> {
        let body = self
            .call(
                &self.event_service_url,
                soap::GET_CARDS,
                soap::get_cards_request(ctx, card_type),
            )
            .await?;
        let cards = soap::parse_get_cards(&body)?;

        // The Konnektor filters by type already; drop anything it let through.
        Ok(cards
            .into_iter()
            .filter(|card| card.card_type == card_type)
            .collect())
    }
}

#[async_trait]
impl VsdService for KonnektorClient {
    async fn read_vsd(
        &self,
        egk: &CardHandle,
        smcb: Option<&CardHandle>,
        ctx: &ConnectorContext,
    ) -> Result<RawInsuranceData> {
        let body = self
            .call(
                &self.vsd_service_url,
                soap::READ_VSD,
                soap::read_vsd_request(egk, smcb, ctx),
            )
            .await?;
        Ok(soap::parse_read_vsd(&body)?)
    }
}

#[async_trait]
impl CertificateService for KonnektorClient {
    async fn read_card_certificate(
        &self,
        card: &CardHandle,
        cert_ref: CertRef,
        ctx: &ConnectorContext,
    ) -> Result<Vec<u8>> {
        let body = self
            .call(
                &self.certificate_service_url,
                soap::READ_CARD_CERTIFICATE,
                soap::read_card_certificate_request(card, cert_ref, ctx),
            )
            .await?;
        Ok(soap::parse_read_card_certificate(&body, cert_ref)?)
    }
}
