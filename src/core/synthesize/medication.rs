//! Placeholder medication
//!
//! Every field carries a fixed default for the prescriber to edit before
//! signing.

use super::constants::*;
use crate::domain::fhir::{CodeableConcept, Coding, Extension, Meta, Medication};
use crate::domain::ResourceId;

pub const DEFAULT_CATEGORY: &str = "00";
pub const DEFAULT_PACKAGE_SIZE: &str = "N1";
pub const DEFAULT_DOSAGE_FORM: &str = "TAB";

pub fn placeholder_medication() -> Medication {
    Medication {
        id: ResourceId::generate(),
        meta: Meta::with_profile(PROFILE_MEDICATION),
        extension: vec![
            Extension::coding(EX_MEDICATION_CATEGORY, CS_MEDICATION_CATEGORY, DEFAULT_CATEGORY),
            Extension::boolean(EX_MEDICATION_VACCINE, false),
            Extension::code(EX_NORMGROESSE, DEFAULT_PACKAGE_SIZE),
        ],
        code: CodeableConcept {
            coding: vec![Coding::new(CS_PZN, "")],
            text: Some(String::new()),
        },
        form: CodeableConcept::from_coding(
            Coding::new(CS_DARREICHUNGSFORM, DEFAULT_DOSAGE_FORM).with_display(""),
        ),
    }
}
