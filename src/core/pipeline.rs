//! Smart-card-to-record assembly pipeline
//!
//! One run: acquire a Konnektor context, find the inserted cards, read what
//! each card contributes and compose the prescription bundle.

use crate::adapters::connector::{ConnectorServices, RuntimeConfig};
use crate::core::bundle::BundleParts;
use crate::core::certificate::extract_attributes;
use crate::core::discovery::first_card_of_type;
use crate::core::synthesize::{
    coverage_from_vsd, organization_from_certificate, patient_from_vsd, placeholder_medication,
    practitioner_from_certificate,
};
use crate::core::vsd::decode_insurance_data;
use crate::domain::card::{CardType, CertRef};
use crate::domain::context::ResultExt;
use crate::domain::fhir::Bundle;
use crate::domain::Result;

/// Assembles prescription bundles from the cards inserted at a workplace
///
/// # Example
///
/// ```no_run
/// use prefill::adapters::connector::ConnectorServices;
/// use prefill::config::ConnectorConfig;
/// use prefill::core::PrefillPipeline;
///
/// # async fn example() -> prefill::domain::Result<()> {
/// let services = ConnectorServices::from_config(&ConnectorConfig::default())?;
/// let pipeline = PrefillPipeline::new(services);
/// let bundle = pipeline.assemble(None).await?;
/// println!("{}", bundle.to_json_pretty()?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PrefillPipeline {
    services: ConnectorServices,
}

impl PrefillPipeline {
    pub fn new(services: ConnectorServices) -> Self {
        Self { services }
    }

    /// Runs the pipeline once
    ///
    /// # Errors
    ///
    /// Any Konnektor, decode or certificate failure aborts the run, as does
    /// a missing insurance or professional card.
    pub async fn assemble(&self, runtime: Option<&RuntimeConfig>) -> Result<Bundle> {
        let ctx = self.services.context().acquire(runtime).await?;
        let events = self.services.events().as_ref();

        let egk = first_card_of_type(events, CardType::Egk, &ctx).await?;
        let smcb = first_card_of_type(events, CardType::SmcB, &ctx).await?;
        let hba = first_card_of_type(events, CardType::Hba, &ctx).await?;

        tracing::info!(
            egk = egk.is_some(),
            smcb = smcb.is_some(),
            hba = hba.is_some(),
            "Cards discovered"
        );

        let (patient, coverage) = match egk {
            Some(ref egk) => {
                let raw = self
                    .services
                    .vsd()
                    .read_vsd(egk, smcb.as_ref(), &ctx)
                    .await
                    .context("Reading insurance data")?;
                let decoded = decode_insurance_data(&raw)?;

                let patient = patient_from_vsd(&decoded.personal);
                let coverage = coverage_from_vsd(&decoded.general, &decoded.protected, &patient.id);
                (Some(patient), Some(coverage))
            }
            None => (None, None),
        };

        let certificates = self.services.certificates().as_ref();

        let practitioner = match hba {
            Some(ref hba) => {
                let attributes = extract_attributes(certificates, hba, CertRef::Qes, &ctx)
                    .await
                    .context("Reading professional card certificate")?;
                Some(practitioner_from_certificate(&attributes))
            }
            None => None,
        };

        let organization = match smcb {
            Some(ref smcb) => {
                let attributes = extract_attributes(certificates, smcb, CertRef::Aut, &ctx)
                    .await
                    .context("Reading institution card certificate")?;
                Some(organization_from_certificate(&attributes))
            }
            None => None,
        };

        BundleParts {
            patient,
            coverage,
            practitioner,
            organization,
            medication: placeholder_medication(),
        }
        .compose()
    }
}
