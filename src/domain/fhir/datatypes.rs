//! FHIR R4 complex datatypes
//!
//! Only the elements the prefill bundle populates are modelled. Empty
//! optional elements are skipped on serialization so the JSON matches what a
//! FHIR server would render.

use serde::Serialize;

/// Resource metadata
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Meta {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub profile: Vec<String>,
}

impl Meta {
    /// Meta carrying a single profile URL
    pub fn with_profile(profile: &str) -> Self {
        Self {
            profile: vec![profile.to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Coding {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

impl Coding {
    pub fn new(system: &str, code: &str) -> Self {
        Self {
            system: Some(system.to_string()),
            code: Some(code.to_string()),
            display: None,
        }
    }

    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CodeableConcept {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub coding: Vec<Coding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl CodeableConcept {
    /// Concept with exactly one coding
    pub fn from_coding(coding: Coding) -> Self {
        Self {
            coding: vec![coding],
            text: None,
        }
    }

    /// Concept carrying only free text
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            coding: Vec::new(),
            text: Some(text.into()),
        }
    }
}

/// Value of an extension
///
/// Flattened into the surrounding extension object under the `value[x]` key
/// matching its type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ExtensionValue {
    #[serde(rename = "valueBoolean")]
    Boolean(bool),
    #[serde(rename = "valueCode")]
    Code(String),
    #[serde(rename = "valueCoding")]
    Coding(Coding),
    #[serde(rename = "valueString")]
    String(String),
    #[serde(rename = "valueIdentifier")]
    Identifier(Identifier),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Extension {
    pub url: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub value: Option<ExtensionValue>,
}

impl Extension {
    pub fn new(url: &str, value: ExtensionValue) -> Self {
        Self {
            url: url.to_string(),
            extension: Vec::new(),
            value: Some(value),
        }
    }

    /// Complex extension holding only nested extensions
    pub fn nested(url: &str, extension: Vec<Extension>) -> Self {
        Self {
            url: url.to_string(),
            extension,
            value: None,
        }
    }

    pub fn boolean(url: &str, value: bool) -> Self {
        Self::new(url, ExtensionValue::Boolean(value))
    }

    pub fn code(url: &str, value: &str) -> Self {
        Self::new(url, ExtensionValue::Code(value.to_string()))
    }

    pub fn coding(url: &str, system: &str, code: &str) -> Self {
        Self::new(url, ExtensionValue::Coding(Coding::new(system, code)))
    }

    pub fn string(url: &str, value: impl Into<String>) -> Self {
        Self::new(url, ExtensionValue::String(value.into()))
    }
}

/// Extension holder for a primitive value (`_family`, `_line`, ...)
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PrimitiveExtension {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,
}

impl PrimitiveExtension {
    pub fn new(extension: Vec<Extension>) -> Self {
        Self { extension }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Identifier {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<CodeableConcept>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    pub value: String,
}

impl Identifier {
    /// Identifier with a single-coding type
    pub fn typed(type_coding: Coding, system: &str, value: impl Into<String>) -> Self {
        Self {
            type_: Some(CodeableConcept::from_coding(type_coding)),
            system: Some(system.to_string()),
            value: value.into(),
        }
    }

    pub fn new(system: &str, value: impl Into<String>) -> Self {
        Self {
            type_: None,
            system: Some(system.to_string()),
            value: value.into(),
        }
    }
}

/// Literal reference `"<ResourceType>/<id>"`
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Reference {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<Identifier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

impl Reference {
    pub fn to(resource_type: &str, id: &impl std::fmt::Display) -> Self {
        Self {
            reference: Some(format!("{resource_type}/{id}")),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct HumanName {
    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub use_: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(rename = "_family", skip_serializing_if = "Option::is_none")]
    pub family_ext: Option<PrimitiveExtension>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub given: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub prefix: Vec<String>,
    #[serde(rename = "_prefix", skip_serializing_if = "Vec::is_empty")]
    pub prefix_ext: Vec<PrimitiveExtension>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub line: Vec<String>,
    #[serde(rename = "_line", skip_serializing_if = "Vec::is_empty")]
    pub line_ext: Vec<PrimitiveExtension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ContactPoint {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Quantity {
    pub value: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Period {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Annotation {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Dosage {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}
