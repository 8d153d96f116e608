//! FHIR R4 model of the prescription bundle
//!
//! Serialization-only structures. Nothing in the pipeline reads FHIR back in.

pub mod bundle;
pub mod datatypes;
pub mod resources;

pub use bundle::{Bundle, BundleEntry, FULL_URL_BASE};
pub use datatypes::{
    Address, Annotation, CodeableConcept, Coding, ContactPoint, Dosage, Extension,
    ExtensionValue, HumanName, Identifier, Meta, Period, PrimitiveExtension, Quantity, Reference,
};
pub use resources::{
    Coverage, DispenseRequest, Medication, MedicationRequest, Organization, Patient,
    Practitioner, Qualification, Resource, Substitution,
};
