//! Insurance payload decoder
//!
//! Turns the three gzip-compressed VSD segments read from an insurance card
//! into typed structures. Either all three decode or none is returned.

pub mod model;
pub mod schema;

pub use model::{GeneralData, PersonalData, ProtectedData};
pub use schema::{registry, Segment};

use crate::adapters::connector::RawInsuranceData;
use crate::domain::{PrefillError, Result};
use flate2::read::GzDecoder;
use serde::de::DeserializeOwned;
use std::io::Read;

/// Upper bound on the inflated size of one segment
pub const MAX_SEGMENT_BYTES: u64 = 1024 * 1024;

/// The three VSD segments, decoded
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedInsuranceData {
    pub personal: PersonalData,
    pub general: GeneralData,
    pub protected: ProtectedData,
}

/// Decodes all three segments
///
/// # Errors
///
/// Returns [`PrefillError::InsuranceDataUnreadable`] naming the first segment
/// that is missing, not gzip, in an unsupported encoding, of an unknown
/// schema or structurally invalid.
pub fn decode_insurance_data(raw: &RawInsuranceData) -> Result<DecodedInsuranceData> {
    let personal = decode_segment(Segment::Personal, &raw.personal)?;
    let general = decode_segment(Segment::General, &raw.general)?;
    let protected = decode_segment(Segment::Protected, &raw.protected)?;

    Ok(DecodedInsuranceData {
        personal,
        general,
        protected,
    })
}

fn decode_segment<T: DeserializeOwned>(segment: Segment, compressed: &[u8]) -> Result<T> {
    let unreadable = |reason: String| PrefillError::InsuranceDataUnreadable(format!("{segment}: {reason}"));

    if compressed.is_empty() {
        return Err(unreadable("segment missing from card read".to_string()));
    }

    let mut bytes = Vec::new();
    GzDecoder::new(compressed)
        .take(MAX_SEGMENT_BYTES + 1)
        .read_to_end(&mut bytes)
        .map_err(|e| unreadable(format!("not valid gzip: {e}")))?;
    if bytes.len() as u64 > MAX_SEGMENT_BYTES {
        return Err(unreadable(format!(
            "inflates beyond {MAX_SEGMENT_BYTES} bytes"
        )));
    }

    let xml = to_text(&bytes).map_err(unreadable)?;
    let normalized = crate::xml::normalize(&xml).map_err(unreadable)?;

    let schema = registry()
        .schema(segment)
        .ok_or_else(|| unreadable("no schema registered".to_string()))?;
    schema
        .check(&normalized.root, normalized.namespace.as_deref())
        .map_err(unreadable)?;

    let decoded = quick_xml::de::from_str(&normalized.xml)
        .map_err(|e| unreadable(format!("does not match schema: {e}")))?;

    tracing::debug!(
        segment = %segment,
        compressed_bytes = compressed.len(),
        xml_bytes = bytes.len(),
        "VSD segment decoded"
    );

    Ok(decoded)
}

fn to_text(bytes: &[u8]) -> std::result::Result<String, String> {
    match crate::xml::declared_encoding(bytes).as_deref() {
        None | Some("UTF-8") | Some("UTF8") => String::from_utf8(bytes.to_vec())
            .map_err(|e| format!("invalid UTF-8: {e}")),
        Some("ISO-8859-15") | Some("LATIN-9") => Ok(crate::xml::decode_latin9(bytes)),
        Some("ISO-8859-1") | Some("LATIN1") => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
        Some(other) => Err(format!("unsupported encoding {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorKind;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    const PERSONAL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<vsdp:UC_PersoenlicheVersichertendatenXML xmlns:vsdp="http://ws.gematik.de/fa/vsdm/vsd/v5.2" CDM_VERSION="5.2.0">
  <vsdp:Versicherter>
    <vsdp:Versicherten_ID>X110485291</vsdp:Versicherten_ID>
    <vsdp:Person>
      <vsdp:Geburtsdatum>19640409</vsdp:Geburtsdatum>
      <vsdp:Vorname>Heinz</vsdp:Vorname>
      <vsdp:Nachname>Schaumberg</vsdp:Nachname>
      <vsdp:Geschlecht>M</vsdp:Geschlecht>
      <vsdp:Titel>Dr.</vsdp:Titel>
      <vsdp:StrassenAdresse>
        <vsdp:Postleitzahl>79114</vsdp:Postleitzahl>
        <vsdp:Ort>Freiburg</vsdp:Ort>
        <vsdp:Land><vsdp:Wohnsitzlaendercode>D</vsdp:Wohnsitzlaendercode></vsdp:Land>
        <vsdp:Strasse>Sundgauallee</vsdp:Strasse>
        <vsdp:Hausnummer>59</vsdp:Hausnummer>
      </vsdp:StrassenAdresse>
    </vsdp:Person>
  </vsdp:Versicherter>
</vsdp:UC_PersoenlicheVersichertendatenXML>"#;

    const GENERAL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<UC_AllgemeineVersicherungsdatenXML xmlns="http://ws.gematik.de/fa/vsdm/vsd/v5.2" CDM_VERSION="5.2.0">
  <Versicherter>
    <Versicherungsschutz>
      <Beginn>20210101</Beginn>
      <Kostentraeger>
        <Kostentraegerkennung>109500969</Kostentraegerkennung>
        <Kostentraegerlaendercode>D</Kostentraegerlaendercode>
        <Name>Test GKV-SV</Name>
      </Kostentraeger>
    </Versicherungsschutz>
    <Zusatzinfos>
      <ZusatzinfosGKV>
        <Versichertenart>1</Versichertenart>
        <Zusatzinfos_Abrechnung_GKV><WOP>71</WOP></Zusatzinfos_Abrechnung_GKV>
      </ZusatzinfosGKV>
    </Zusatzinfos>
  </Versicherter>
</UC_AllgemeineVersicherungsdatenXML>"#;

    const PROTECTED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<UC_GeschuetzteVersichertendatenXML xmlns="http://ws.gematik.de/fa/vsdm/vsd/v5.2" CDM_VERSION="5.2.0">
  <Zuzahlungsstatus><Status>0</Status></Zuzahlungsstatus>
  <Besondere_Personengruppe>00</Besondere_Personengruppe>
  <DMP_Kennzeichnung>00</DMP_Kennzeichnung>
</UC_GeschuetzteVersichertendatenXML>"#;

    fn gzip(bytes: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(bytes).unwrap();
        encoder.finish().unwrap()
    }

    fn raw() -> RawInsuranceData {
        RawInsuranceData {
            personal: gzip(PERSONAL.as_bytes()),
            general: gzip(GENERAL.as_bytes()),
            protected: gzip(PROTECTED.as_bytes()),
        }
    }

    #[test]
    fn test_decode_all_segments() {
        let decoded = decode_insurance_data(&raw()).unwrap();

        let person = &decoded.personal.insured.person;
        assert_eq!(decoded.personal.insured.insurant_id, "X110485291");
        assert_eq!(person.family_name, "Schaumberg");
        assert_eq!(person.title.as_deref(), Some("Dr."));
        let street = person.street_address.as_ref().unwrap();
        assert_eq!(street.house_number.as_deref(), Some("59"));
        assert_eq!(street.country.code, "D");

        assert_eq!(decoded.general.insured.protection.payor.id, "109500969");
        assert_eq!(decoded.general.insurant_type(), Some("1"));
        assert_eq!(decoded.general.wop(), Some("71"));

        assert_eq!(decoded.protected.special_group.as_deref(), Some("00"));
        assert_eq!(decoded.protected.co_payment.unwrap().status, "0");
    }

    #[test]
    fn test_decode_latin9_segment() {
        let xml = PERSONAL
            .replace("UTF-8", "ISO-8859-15")
            .replace("Schaumberg", "M\u{fc}ller");
        let bytes: Vec<u8> = xml.chars().map(|c| c as u32 as u8).collect();

        let mut input = raw();
        input.personal = gzip(&bytes);

        let decoded = decode_insurance_data(&input).unwrap();
        assert_eq!(decoded.personal.insured.person.family_name, "Müller");
    }

    #[test]
    fn test_missing_segment() {
        let mut input = raw();
        input.protected.clear();
        let err = decode_insurance_data(&input).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert!(err.to_string().contains("GeschuetzteVersichertendaten"));
    }

    #[test]
    fn test_not_gzip() {
        let mut input = raw();
        input.general = GENERAL.as_bytes().to_vec();
        let err = decode_insurance_data(&input).unwrap_err();
        assert!(matches!(err, PrefillError::InsuranceDataUnreadable(_)));
        assert!(err.to_string().contains("gzip"));
    }

    #[test]
    fn test_oversized_segment_rejected() {
        let mut input = raw();
        input.protected = gzip(&vec![b' '; MAX_SEGMENT_BYTES as usize + 1]);
        let err = decode_insurance_data(&input).unwrap_err();
        assert_eq!(err.kind(), crate::domain::ErrorKind::Decode);
        assert!(err.to_string().contains("GeschuetzteVersichertendaten"));
        assert!(err.to_string().contains("inflates beyond"));
    }

    #[test]
    fn test_segments_swapped() {
        let mut input = raw();
        std::mem::swap(&mut input.general, &mut input.protected);
        let err = decode_insurance_data(&input).unwrap_err();
        assert!(err.to_string().contains("unexpected root element"));
    }

    #[test]
    fn test_unknown_namespace() {
        let mut input = raw();
        input.protected = gzip(
            PROTECTED
                .replace("vsd/v5.2", "vsd/v9.9")
                .as_bytes(),
        );
        let err = decode_insurance_data(&input).unwrap_err();
        assert!(err.to_string().contains("unsupported VSD schema namespace"));
    }

    #[test]
    fn test_structural_mismatch() {
        let mut input = raw();
        input.personal = gzip(
            PERSONAL
                .replace("<vsdp:Versicherten_ID>X110485291</vsdp:Versicherten_ID>", "")
                .as_bytes(),
        );
        let err = decode_insurance_data(&input).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[test]
    fn test_unsupported_encoding() {
        let mut input = raw();
        input.general = gzip(GENERAL.replace("UTF-8", "UTF-16").as_bytes());
        let err = decode_insurance_data(&input).unwrap_err();
        assert!(err.to_string().contains("unsupported encoding UTF-16"));
    }
}
