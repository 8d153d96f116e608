//! Coverage from the general and protected data segments

use super::constants::*;
use crate::core::vsd::model::{GeneralData, ProtectedData};
use crate::domain::fhir::{CodeableConcept, Coding, Coverage, Extension, Identifier, Meta, Period, Reference};
use crate::domain::ResourceId;

const DEFAULT_PERSONENGRUPPE: &str = "00";
const DEFAULT_DMP: &str = "00";
const DEFAULT_VERSICHERTENART: &str = "1";
const DEFAULT_WOP: &str = "00";

/// Builds the statutory insurance Coverage of `patient_id`
pub fn coverage_from_vsd(
    general: &GeneralData,
    protected: &ProtectedData,
    patient_id: &ResourceId,
) -> Coverage {
    let protection = &general.insured.protection;
    let payor = &protection.payor;

    let extension = vec![
        Extension::coding(
            EX_BESONDERE_PERSONENGRUPPE,
            CS_PERSONENGRUPPE,
            or_default(protected.special_group.as_deref(), DEFAULT_PERSONENGRUPPE),
        ),
        Extension::coding(
            EX_DMP_KENNZEICHEN,
            CS_DMP,
            or_default(protected.dmp_marker.as_deref(), DEFAULT_DMP),
        ),
        Extension::coding(
            EX_VERSICHERTENART,
            CS_VERSICHERTENSTATUS,
            or_default(general.insurant_type(), DEFAULT_VERSICHERTENART),
        ),
        Extension::coding(EX_WOP, CS_WOP, or_default(general.wop(), DEFAULT_WOP)),
    ];

    let period = protection
        .end
        .as_deref()
        .and_then(super::fhir_date)
        .map(|end| Period {
            start: None,
            end: Some(end),
        });

    Coverage {
        id: ResourceId::generate(),
        meta: Meta::with_profile(PROFILE_COVERAGE),
        extension,
        status: "active".to_string(),
        type_: CodeableConcept::from_coding(Coding::new(CS_VERSICHERUNGSART, "GKV")),
        beneficiary: Reference::to("Patient", patient_id),
        period,
        payor: vec![Reference {
            identifier: Some(Identifier::new(NS_IKNR, payor.id.trim())),
            display: Some(payor.name.clone()),
            ..Default::default()
        }],
    }
}

fn or_default<'a>(value: Option<&'a str>, default: &'a str) -> &'a str {
    value.map(str::trim).filter(|v| !v.is_empty()).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vsd::model::{InsuranceProtection, InsuredCoverage, Payor};

    fn general(end: Option<&str>) -> GeneralData {
        GeneralData {
            cdm_version: None,
            insured: InsuredCoverage {
                protection: InsuranceProtection {
                    start: "20210101".to_string(),
                    end: end.map(str::to_string),
                    payor: Payor {
                        id: "109500969".to_string(),
                        country_code: "D".to_string(),
                        name: "Test GKV-SV".to_string(),
                    },
                },
                additional: None,
            },
        }
    }

    fn protected() -> ProtectedData {
        ProtectedData {
            cdm_version: None,
            co_payment: None,
            special_group: Some("04".to_string()),
            dmp_marker: None,
        }
    }

    #[test]
    fn test_coverage_references_patient() {
        let patient_id = ResourceId::new("patient-1").unwrap();
        let coverage = coverage_from_vsd(&general(None), &protected(), &patient_id);

        assert_eq!(coverage.beneficiary.reference.as_deref(), Some("Patient/patient-1"));
        assert_eq!(coverage.status, "active");
        assert!(coverage.period.is_none());

        let json = serde_json::to_value(&coverage).unwrap();
        assert_eq!(json["type"]["coding"][0]["system"], CS_VERSICHERUNGSART);
        assert_eq!(json["type"]["coding"][0]["code"], "GKV");
        assert_eq!(json["payor"][0]["identifier"]["system"], NS_IKNR);
        assert_eq!(json["payor"][0]["identifier"]["value"], "109500969");
        assert_eq!(json["payor"][0]["display"], "Test GKV-SV");
    }

    #[test]
    fn test_coverage_extensions_and_defaults() {
        let patient_id = ResourceId::generate();
        let coverage = coverage_from_vsd(&general(None), &protected(), &patient_id);
        let json = serde_json::to_value(&coverage).unwrap();

        let codes: Vec<(&str, &str)> = json["extension"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| {
                (
                    e["url"].as_str().unwrap(),
                    e["valueCoding"]["code"].as_str().unwrap(),
                )
            })
            .collect();

        assert_eq!(
            codes,
            vec![
                (EX_BESONDERE_PERSONENGRUPPE, "04"),
                (EX_DMP_KENNZEICHEN, "00"),
                (EX_VERSICHERTENART, "1"),
                (EX_WOP, "00"),
            ]
        );
    }

    #[test]
    fn test_coverage_period_end() {
        let coverage = coverage_from_vsd(
            &general(Some("20251231")),
            &protected(),
            &ResourceId::generate(),
        );
        assert_eq!(
            coverage.period.and_then(|p| p.end).as_deref(),
            Some("2025-12-31")
        );
    }
}
