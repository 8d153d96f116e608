//! FHIR resources populated by the prefill pipeline

use super::datatypes::{
    Address, Annotation, CodeableConcept, ContactPoint, Dosage, Extension, HumanName,
    Identifier, Meta, Period, PrimitiveExtension, Quantity, Reference,
};
use crate::domain::ids::ResourceId;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: ResourceId,
    pub meta: Meta,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub identifier: Vec<Identifier>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub name: Vec<HumanName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(rename = "_gender", skip_serializing_if = "Option::is_none")]
    pub gender_ext: Option<PrimitiveExtension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub address: Vec<Address>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Coverage {
    pub id: ResourceId,
    pub meta: Meta,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,
    pub status: String,
    #[serde(rename = "type")]
    pub type_: CodeableConcept,
    pub beneficiary: Reference,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,
    pub payor: Vec<Reference>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Qualification {
    pub code: CodeableConcept,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Practitioner {
    pub id: ResourceId,
    pub meta: Meta,
    pub identifier: Vec<Identifier>,
    pub name: Vec<HumanName>,
    pub qualification: Vec<Qualification>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Organization {
    pub id: ResourceId,
    pub meta: Meta,
    pub identifier: Vec<Identifier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub telecom: Vec<ContactPoint>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub address: Vec<Address>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Medication {
    pub id: ResourceId,
    pub meta: Meta,
    pub extension: Vec<Extension>,
    pub code: CodeableConcept,
    pub form: CodeableConcept,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispenseRequest {
    pub quantity: Quantity,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Substitution {
    pub allowed_boolean: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicationRequest {
    pub id: ResourceId,
    pub meta: Meta,
    pub extension: Vec<Extension>,
    pub status: String,
    pub intent: String,
    pub medication_reference: Reference,
    pub subject: Reference,
    pub authored_on: NaiveDate,
    pub requester: Reference,
    pub insurance: Vec<Reference>,
    pub note: Vec<Annotation>,
    pub dosage_instruction: Vec<Dosage>,
    pub dispense_request: DispenseRequest,
    pub substitution: Substitution,
}

impl MedicationRequest {
    /// All literal references held by the order
    pub fn references(&self) -> Vec<&str> {
        std::iter::once(&self.medication_reference)
            .chain(std::iter::once(&self.subject))
            .chain(std::iter::once(&self.requester))
            .chain(self.insurance.iter())
            .filter_map(|r| r.reference.as_deref())
            .collect()
    }
}

/// Any resource that can appear in a prefill bundle
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "resourceType")]
pub enum Resource {
    MedicationRequest(MedicationRequest),
    Medication(Medication),
    Patient(Patient),
    Practitioner(Practitioner),
    Organization(Organization),
    Coverage(Coverage),
}

impl Resource {
    pub fn resource_type(&self) -> &'static str {
        match self {
            Resource::MedicationRequest(_) => "MedicationRequest",
            Resource::Medication(_) => "Medication",
            Resource::Patient(_) => "Patient",
            Resource::Practitioner(_) => "Practitioner",
            Resource::Organization(_) => "Organization",
            Resource::Coverage(_) => "Coverage",
        }
    }

    pub fn id(&self) -> &ResourceId {
        match self {
            Resource::MedicationRequest(r) => &r.id,
            Resource::Medication(r) => &r.id,
            Resource::Patient(r) => &r.id,
            Resource::Practitioner(r) => &r.id,
            Resource::Organization(r) => &r.id,
            Resource::Coverage(r) => &r.id,
        }
    }

    /// Relative reference `"<ResourceType>/<id>"` to this resource
    pub fn reference(&self) -> String {
        format!("{}/{}", self.resource_type(), self.id())
    }
}
