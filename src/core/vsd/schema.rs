//! VSD schema registry
//!
//! Built once per process on first use and read-only afterwards. Maps each
//! segment to the root element it must carry and the VSD schema namespaces
//! the decoder understands.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

pub const NS_VSD_V5_1: &str = "http://ws.gematik.de/fa/vsdm/vsd/v5.1";
pub const NS_VSD_V5_2: &str = "http://ws.gematik.de/fa/vsdm/vsd/v5.2";

/// The three VSD segments stored on an insurance card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Segment {
    Personal,
    General,
    Protected,
}

impl Segment {
    pub const ALL: [Segment; 3] = [Segment::Personal, Segment::General, Segment::Protected];

    /// Name of the segment as used by `ReadVSD`
    pub fn wire_name(&self) -> &'static str {
        match self {
            Segment::Personal => "PersoenlicheVersichertendaten",
            Segment::General => "AllgemeineVersicherungsdaten",
            Segment::Protected => "GeschuetzteVersichertendaten",
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Expected shape of one segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentSchema {
    pub root_element: &'static str,
    pub namespaces: &'static [&'static str],
}

impl SegmentSchema {
    /// Checks a document's root element and namespace against this schema
    ///
    /// A document without a namespace is accepted; some card generations
    /// omit it.
    pub fn check(&self, root: &str, namespace: Option<&str>) -> Result<(), String> {
        if root != self.root_element {
            return Err(format!(
                "unexpected root element {root}, expected {}",
                self.root_element
            ));
        }
        match namespace {
            Some(ns) if !self.namespaces.contains(&ns) => {
                Err(format!("unsupported VSD schema namespace {ns}"))
            }
            _ => Ok(()),
        }
    }
}

/// Registry of segment schemas
#[derive(Debug)]
pub struct SchemaRegistry {
    segments: HashMap<Segment, SegmentSchema>,
}

impl SchemaRegistry {
    fn build() -> Self {
        const NAMESPACES: &[&str] = &[NS_VSD_V5_1, NS_VSD_V5_2];

        let segments = HashMap::from([
            (
                Segment::Personal,
                SegmentSchema {
                    root_element: "UC_PersoenlicheVersichertendatenXML",
                    namespaces: NAMESPACES,
                },
            ),
            (
                Segment::General,
                SegmentSchema {
                    root_element: "UC_AllgemeineVersicherungsdatenXML",
                    namespaces: NAMESPACES,
                },
            ),
            (
                Segment::Protected,
                SegmentSchema {
                    root_element: "UC_GeschuetzteVersichertendatenXML",
                    namespaces: NAMESPACES,
                },
            ),
        ]);

        tracing::debug!(segments = segments.len(), "VSD schema registry built");
        Self { segments }
    }

    /// Schema of one segment
    pub fn schema(&self, segment: Segment) -> Option<&SegmentSchema> {
        self.segments.get(&segment)
    }
}

static REGISTRY: LazyLock<SchemaRegistry> = LazyLock::new(SchemaRegistry::build);

/// The process-wide registry
pub fn registry() -> &'static SchemaRegistry {
    &REGISTRY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_covers_all_segments() {
        for segment in Segment::ALL {
            assert!(registry().schema(segment).is_some(), "{segment}");
        }
    }

    #[test]
    fn test_registry_is_shared() {
        assert!(std::ptr::eq(registry(), registry()));
    }

    #[test]
    fn test_check_accepts_known_namespaces() {
        let schema = registry().schema(Segment::Personal).unwrap();
        assert!(schema
            .check("UC_PersoenlicheVersichertendatenXML", Some(NS_VSD_V5_2))
            .is_ok());
        assert!(schema
            .check("UC_PersoenlicheVersichertendatenXML", Some(NS_VSD_V5_1))
            .is_ok());
        assert!(schema
            .check("UC_PersoenlicheVersichertendatenXML", None)
            .is_ok());
    }

    #[test]
    fn test_check_rejects_mismatch() {
        let schema = registry().schema(Segment::General).unwrap();
        assert!(schema
            .check("UC_PersoenlicheVersichertendatenXML", Some(NS_VSD_V5_2))
            .is_err());
        assert!(schema
            .check(
                "UC_AllgemeineVersicherungsdatenXML",
                Some("http://ws.gematik.de/fa/vsdm/vsd/v4.0")
            )
            .is_err());
    }
}
