//! Prescription order

use super::constants::*;
use crate::domain::fhir::{
    Annotation, Coverage, DispenseRequest, Dosage, Extension, Medication, MedicationRequest, Meta,
    Patient, Practitioner, Quantity, Reference, Substitution,
};
use crate::domain::ResourceId;
use chrono::NaiveDate;

/// Builds the order referencing the other records of the bundle
///
/// Callers pass the records themselves so a reference can't point at
/// something that doesn't exist.
pub fn medication_request(
    medication: &Medication,
    patient: &Patient,
    practitioner: &Practitioner,
    coverage: &Coverage,
    authored_on: NaiveDate,
) -> MedicationRequest {
    MedicationRequest {
        id: ResourceId::generate(),
        meta: Meta::with_profile(PROFILE_MEDICATION_REQUEST),
        extension: vec![
            Extension::coding(EX_STATUS_CO_PAYMENT, CS_STATUS_CO_PAYMENT, "0"),
            Extension::boolean(EX_EMERGENCY_SERVICES_FEE, false),
            Extension::boolean(EX_BVG, false),
            Extension::nested(
                EX_MULTIPLE_PRESCRIPTION,
                vec![Extension::boolean("Kennzeichen", false)],
            ),
        ],
        status: "active".to_string(),
        intent: "order".to_string(),
        medication_reference: Reference::to("Medication", &medication.id),
        subject: Reference::to("Patient", &patient.id),
        authored_on,
        requester: Reference::to("Practitioner", &practitioner.id),
        insurance: vec![Reference::to("Coverage", &coverage.id)],
        note: vec![Annotation {
            text: String::new(),
        }],
        dosage_instruction: vec![Dosage {
            extension: vec![Extension::boolean(EX_DOSAGE_FLAG, true)],
            text: Some(String::new()),
        }],
        dispense_request: DispenseRequest {
            quantity: Quantity {
                value: 1,
                system: Some(CS_UCUM.to_string()),
                code: Some("{Package}".to_string()),
            },
        },
        substitution: Substitution {
            allowed_boolean: true,
        },
    }
}
