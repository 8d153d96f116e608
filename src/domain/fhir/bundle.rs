//! FHIR document bundle

use super::datatypes::{Identifier, Meta};
use super::resources::Resource;
use crate::domain::ids::ResourceId;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Base of the `fullUrl` assigned to every bundle entry
pub const FULL_URL_BASE: &str = "http://pvs.praxis.local/fhir";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleEntry {
    pub full_url: String,
    pub resource: Resource,
}

impl BundleEntry {
    /// Wraps a resource, deriving its `fullUrl`
    pub fn new(resource: Resource) -> Self {
        Self {
            full_url: format!("{FULL_URL_BASE}/{}", resource.reference()),
            resource,
        }
    }
}

/// Composed prescription bundle
///
/// Fields are private: a bundle is immutable once composed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    resource_type: &'static str,
    id: ResourceId,
    meta: Meta,
    identifier: Identifier,
    #[serde(rename = "type")]
    type_: &'static str,
    timestamp: DateTime<Utc>,
    entry: Vec<BundleEntry>,
}

impl Bundle {
    /// Creates a document bundle from entries in their final order
    pub fn document(
        profile: &str,
        identifier: Identifier,
        timestamp: DateTime<Utc>,
        entry: Vec<BundleEntry>,
    ) -> Self {
        Self {
            resource_type: "Bundle",
            id: ResourceId::generate(),
            meta: Meta::with_profile(profile),
            identifier,
            type_: "document",
            timestamp,
            entry,
        }
    }

    pub fn id(&self) -> &ResourceId {
        &self.id
    }

    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn entries(&self) -> &[BundleEntry] {
        &self.entry
    }

    /// Resources in entry order
    pub fn resources(&self) -> impl Iterator<Item = &Resource> {
        self.entry.iter().map(|e| &e.resource)
    }

    /// Number of entries of the given resource type
    pub fn count_of(&self, resource_type: &str) -> usize {
        self.resources()
            .filter(|r| r.resource_type() == resource_type)
            .count()
    }

    /// Returns true if a resource with this relative reference is in the bundle
    pub fn resolves(&self, reference: &str) -> bool {
        self.resources().any(|r| r.reference() == reference)
    }

    /// Serializes the bundle to pretty FHIR JSON
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
