//! Bundle composer
//!
//! Turns the records of a run into the prescription bundle. This is where a
//! missing card stops the run: without an insurance card there is no
//! Patient or Coverage, without a professional card no Practitioner.

use crate::core::synthesize::constants::{NS_PRESCRIPTION_ID, PROFILE_BUNDLE};
use crate::core::synthesize::medication_request;
use crate::domain::card::CardType;
use crate::domain::fhir::{
    Bundle, BundleEntry, Coverage, Identifier, Medication, Organization, Patient, Practitioner,
    Resource,
};
use crate::domain::{PrefillError, Result};
use chrono::{DateTime, Local, NaiveDate, Utc};

/// Records gathered during one run
#[derive(Debug, Clone)]
pub struct BundleParts {
    pub patient: Option<Patient>,
    pub coverage: Option<Coverage>,
    pub practitioner: Option<Practitioner>,
    pub organization: Option<Organization>,
    pub medication: Medication,
}

impl BundleParts {
    /// Composes the bundle, timestamped now and authored today
    ///
    /// # Errors
    ///
    /// [`PrefillError::MissingPrerequisite`] if Patient, Coverage or
    /// Practitioner is absent.
    pub fn compose(self) -> Result<Bundle> {
        self.compose_at(Utc::now(), Local::now().date_naive())
    }

    /// Composes the bundle with an explicit timestamp and authoring date
    pub fn compose_at(self, timestamp: DateTime<Utc>, authored_on: NaiveDate) -> Result<Bundle> {
        let patient = self.patient.ok_or(PrefillError::MissingPrerequisite {
            card_type: CardType::Egk,
            record: "Patient",
        })?;
        let coverage = self.coverage.ok_or(PrefillError::MissingPrerequisite {
            card_type: CardType::Egk,
            record: "Coverage",
        })?;
        let practitioner = self.practitioner.ok_or(PrefillError::MissingPrerequisite {
            card_type: CardType::Hba,
            record: "Practitioner",
        })?;

        let order = medication_request(
            &self.medication,
            &patient,
            &practitioner,
            &coverage,
            authored_on,
        );

        let mut resources = vec![
            Resource::MedicationRequest(order),
            Resource::Medication(self.medication),
            Resource::Patient(patient),
            Resource::Practitioner(practitioner),
        ];
        if let Some(organization) = self.organization {
            resources.push(Resource::Organization(organization));
        }
        resources.push(Resource::Coverage(coverage));

        let entries: Vec<BundleEntry> = resources.into_iter().map(BundleEntry::new).collect();

        Ok(Bundle::document(
            PROFILE_BUNDLE,
            Identifier::new(NS_PRESCRIPTION_ID, ""),
            timestamp,
            entries,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::certificate::{CertificateAttributes, DnAttribute};
    use crate::core::synthesize::{
        organization_from_certificate, placeholder_medication, practitioner_from_certificate,
    };
    use crate::domain::fhir::{CodeableConcept, Coding, Meta, Reference};
    use crate::domain::{ErrorKind, ResourceId};

    fn patient() -> Patient {
        Patient {
            id: ResourceId::generate(),
            meta: Meta::with_profile("p"),
            identifier: Vec::new(),
            name: Vec::new(),
            gender: None,
            gender_ext: None,
            birth_date: None,
            address: Vec::new(),
        }
    }

    fn coverage(patient: &Patient) -> Coverage {
        Coverage {
            id: ResourceId::generate(),
            meta: Meta::with_profile("c"),
            extension: Vec::new(),
            status: "active".to_string(),
            type_: CodeableConcept::from_coding(Coding::new("s", "GKV")),
            beneficiary: Reference::to("Patient", &patient.id),
            period: None,
            payor: Vec::new(),
        }
    }

    fn parts(with_organization: bool) -> BundleParts {
        let patient = patient();
        let coverage = coverage(&patient);
        BundleParts {
            patient: Some(patient),
            coverage: Some(coverage),
            practitioner: Some(practitioner_from_certificate(&CertificateAttributes::from([
                (DnAttribute::GivenName, "Alexander"),
                (DnAttribute::Surname, "Fuchs"),
            ]))),
            organization: with_organization
                .then(|| organization_from_certificate(&CertificateAttributes::default())),
            medication: placeholder_medication(),
        }
    }

    fn order_of(bundle: &Bundle) -> Vec<&'static str> {
        bundle.resources().map(Resource::resource_type).collect()
    }

    #[test]
    fn test_entry_order_with_organization() {
        let bundle = parts(true).compose().unwrap();
        assert_eq!(
            order_of(&bundle),
            vec![
                "MedicationRequest",
                "Medication",
                "Patient",
                "Practitioner",
                "Organization",
                "Coverage"
            ]
        );
    }

    #[test]
    fn test_organization_is_optional() {
        let bundle = parts(false).compose().unwrap();
        assert_eq!(bundle.count_of("Organization"), 0);
        assert_eq!(bundle.entries().len(), 5);
    }

    #[test]
    fn test_references_resolve() {
        let bundle = parts(true).compose().unwrap();
        let Some(Resource::MedicationRequest(order)) = bundle.resources().next() else {
            panic!("first entry must be the MedicationRequest");
        };
        let references = order.references();
        assert_eq!(references.len(), 4);
        for reference in references {
            assert!(bundle.resolves(reference), "{reference} does not resolve");
        }
    }

    #[test]
    fn test_full_urls() {
        let bundle = parts(false).compose().unwrap();
        for entry in bundle.entries() {
            assert_eq!(
                entry.full_url,
                format!("http://pvs.praxis.local/fhir/{}", entry.resource.reference())
            );
        }
    }

    #[test]
    fn test_bundle_header() {
        let timestamp = DateTime::parse_from_rfc3339("2026-10-19T08:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let authored_on = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let bundle = parts(false).compose_at(timestamp, authored_on).unwrap();
        let json = serde_json::to_value(&bundle).unwrap();

        assert_eq!(json["resourceType"], "Bundle");
        assert_eq!(json["type"], "document");
        assert_eq!(json["meta"]["profile"][0], PROFILE_BUNDLE);
        assert_eq!(json["identifier"]["system"], NS_PRESCRIPTION_ID);
        assert_eq!(json["identifier"]["value"], "");
        assert_eq!(json["timestamp"], "2026-10-19T08:30:00Z");
        assert_eq!(json["entry"][0]["resource"]["authoredOn"], "2026-10-19");
    }

    #[test]
    fn test_missing_patient() {
        let mut parts = parts(true);
        parts.patient = None;
        let err = parts.compose().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingPrerequisite);
        assert!(matches!(
            err,
            PrefillError::MissingPrerequisite {
                card_type: CardType::Egk,
                record: "Patient"
            }
        ));
    }

    #[test]
    fn test_missing_coverage() {
        let mut parts = parts(true);
        parts.coverage = None;
        let err = parts.compose().unwrap_err();
        assert!(matches!(
            err,
            PrefillError::MissingPrerequisite {
                card_type: CardType::Egk,
                ..
            }
        ));
    }

    #[test]
    fn test_missing_practitioner() {
        let mut parts = parts(true);
        parts.practitioner = None;
        let err = parts.compose().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Practitioner cannot be created: no HBA card present"
        );
    }
}
