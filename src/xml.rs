//! XML helpers shared by the SOAP adapter and the insurance data decoder
//!
//! Konnektor responses and VSD documents use whatever namespace prefixes the
//! producer picked. [`normalize`] rewrites a document into prefix-free form so
//! serde structs can match on local names, and reports the root element with
//! its resolved namespace.

use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;
use quick_xml::writer::Writer;

/// A namespace-stripped XML document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedXml {
    /// Local name of the root element
    pub root: String,
    /// Namespace URI of the root element, if bound
    pub namespace: Option<String>,
    /// Document with prefixes and `xmlns` declarations removed
    pub xml: String,
}

/// Strips namespace prefixes and declarations from a document
///
/// The XML declaration, comments and processing instructions are dropped.
///
/// # Errors
///
/// Returns a description of the first syntax error, or an error if the
/// document has no root element.
pub fn normalize(xml: &str) -> Result<NormalizedXml, String> {
    let mut reader = NsReader::from_str(xml);
    let mut writer = Writer::new(Vec::new());
    let mut root: Option<(String, Option<String>)> = None;

    loop {
        let (ns, event) = reader
            .read_resolved_event()
            .map_err(|e| format!("malformed XML: {e}"))?;

        match event {
            Event::Start(e) => {
                let stripped = strip_element(&e)?;
                if root.is_none() {
                    root = Some((element_name(&stripped)?, namespace_of(ns)));
                }
                writer
                    .write_event(Event::Start(stripped))
                    .map_err(|e| e.to_string())?;
            }
            Event::Empty(e) => {
                let stripped = strip_element(&e)?;
                if root.is_none() {
                    root = Some((element_name(&stripped)?, namespace_of(ns)));
                }
                writer
                    .write_event(Event::Empty(stripped))
                    .map_err(|e| e.to_string())?;
            }
            Event::End(e) => {
                let name = utf8(e.local_name().as_ref())?;
                writer
                    .write_event(Event::End(BytesEnd::new(name)))
                    .map_err(|e| e.to_string())?;
            }
            Event::Text(_) | Event::CData(_) => {
                writer.write_event(event).map_err(|e| e.to_string())?;
            }
            Event::Decl(_) | Event::PI(_) | Event::DocType(_) | Event::Comment(_) => {}
            Event::Eof => break,
        }
    }

    let (root, namespace) = root.ok_or_else(|| "document has no root element".to_string())?;
    let xml = String::from_utf8(writer.into_inner()).map_err(|e| e.to_string())?;

    Ok(NormalizedXml {
        root,
        namespace,
        xml,
    })
}

/// Reads the `encoding` pseudo-attribute of the XML declaration, if any
pub fn declared_encoding(bytes: &[u8]) -> Option<String> {
    let head = &bytes[..bytes.len().min(200)];
    let head = String::from_utf8_lossy(head);
    let decl_end = head.find("?>")?;
    let decl = head.get(..decl_end)?.strip_prefix("<?xml")?;
    let start = decl.find("encoding")? + "encoding".len();
    let rest = decl[start..].trim_start().strip_prefix('=')?.trim_start();
    let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let value = &rest[1..];
    let end = value.find(quote)?;
    Some(value[..end].to_ascii_uppercase())
}

/// Decodes ISO-8859-15 bytes to a String
///
/// ISO-8859-1 input decodes identically apart from the eight code points
/// ISO-8859-15 reassigned.
pub fn decode_latin9(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| match b {
            0xA4 => '\u{20AC}',
            0xA6 => '\u{0160}',
            0xA8 => '\u{0161}',
            0xB4 => '\u{017D}',
            0xB8 => '\u{017E}',
            0xBC => '\u{0152}',
            0xBD => '\u{0153}',
            0xBE => '\u{0178}',
            other => char::from(other),
        })
        .collect()
}

fn strip_element(e: &BytesStart<'_>) -> Result<BytesStart<'static>, String> {
    let mut stripped = BytesStart::new(utf8(e.local_name().as_ref())?);
    for attr in e.attributes() {
        let attr = attr.map_err(|e| e.to_string())?;
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }
        let key = utf8(attr.key.local_name().as_ref())?;
        let value = attr.unescape_value().map_err(|e| e.to_string())?;
        stripped.push_attribute((key.as_str(), value.as_ref()));
    }
    Ok(stripped)
}

fn element_name(e: &BytesStart<'_>) -> Result<String, String> {
    utf8(e.name().as_ref())
}

fn namespace_of(ns: ResolveResult<'_>) -> Option<String> {
    match ns {
        ResolveResult::Bound(ns) => Some(String::from_utf8_lossy(ns.as_ref()).into_owned()),
        _ => None,
    }
}

fn utf8(bytes: &[u8]) -> Result<String, String> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|e| e.to_string())
}
