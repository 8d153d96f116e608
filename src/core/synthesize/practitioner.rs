//! Practitioner from the professional card's signature certificate

use super::constants::*;
use super::patient::official_name;
use crate::core::certificate::{CertificateAttributes, DnAttribute};
use crate::domain::fhir::{CodeableConcept, Coding, Identifier, Meta, Practitioner, Qualification};
use crate::domain::ResourceId;

/// Builds the prescribing Practitioner
///
/// The LANR isn't on the card and is left empty for the signer to fill in.
pub fn practitioner_from_certificate(attributes: &CertificateAttributes) -> Practitioner {
    Practitioner {
        id: ResourceId::generate(),
        meta: Meta::with_profile(PROFILE_PRACTITIONER),
        identifier: vec![Identifier::typed(Coding::new(CS_V2_0203, "LANR"), NS_LANR, "")],
        name: vec![official_name(
            attributes.get(DnAttribute::Surname),
            attributes.get(DnAttribute::GivenName),
            None,
            None,
            None,
        )],
        qualification: vec![
            Qualification {
                code: CodeableConcept::from_coding(Coding::new(CS_QUALIFICATION_TYPE, "00")),
            },
            Qualification {
                code: CodeableConcept::from_text("Arzt"),
            },
        ],
    }
}
