//! Attribute extractor
//!
//! Reads a card certificate through the Konnektor and exposes the subject
//! distinguished name as named fields.

use crate::adapters::connector::{CertificateService, ConnectorContext};
use crate::domain::card::{CardHandle, CertRef};
use crate::domain::{ConnectorError, PrefillError, Result};
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;
use x509_parser::prelude::*;

/// Subject DN attributes the prefill reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DnAttribute {
    CommonName,
    Surname,
    SerialNumber,
    Country,
    Locality,
    Street,
    Title,
    PostalCode,
    GivenName,
}

impl DnAttribute {
    pub const ALL: [DnAttribute; 9] = [
        DnAttribute::CommonName,
        DnAttribute::Surname,
        DnAttribute::SerialNumber,
        DnAttribute::Country,
        DnAttribute::Locality,
        DnAttribute::Street,
        DnAttribute::Title,
        DnAttribute::PostalCode,
        DnAttribute::GivenName,
    ];

    /// Dotted object identifier
    pub fn oid(&self) -> &'static str {
        match self {
            DnAttribute::CommonName => "2.5.4.3",
            DnAttribute::Surname => "2.5.4.4",
            DnAttribute::SerialNumber => "2.5.4.5",
            DnAttribute::Country => "2.5.4.6",
            DnAttribute::Locality => "2.5.4.7",
            DnAttribute::Street => "2.5.4.9",
            DnAttribute::Title => "2.5.4.12",
            DnAttribute::PostalCode => "2.5.4.17",
            DnAttribute::GivenName => "2.5.4.42",
        }
    }

    fn from_oid(oid: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.oid() == oid)
    }
}

impl fmt::Display for DnAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DnAttribute::CommonName => "CN",
            DnAttribute::Surname => "SURNAME",
            DnAttribute::SerialNumber => "SERIALNUMBER",
            DnAttribute::Country => "C",
            DnAttribute::Locality => "L",
            DnAttribute::Street => "STREET",
            DnAttribute::Title => "T",
            DnAttribute::PostalCode => "PostalCode",
            DnAttribute::GivenName => "GIVENNAME",
        };
        f.write_str(name)
    }
}

/// Subject attributes of one certificate
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CertificateAttributes {
    values: HashMap<DnAttribute, String>,
}

impl CertificateAttributes {
    /// Parses a DER certificate and collects its subject attributes
    ///
    /// When an attribute occurs more than once, the first occurrence is kept.
    /// Values that are not decodable as strings are skipped.
    pub fn from_der(der: &[u8]) -> Result<Self> {
        let (_, certificate) = X509Certificate::from_der(der)
            .map_err(|e| PrefillError::Certificate(format!("Undecodable certificate: {e}")))?;

        let mut values = HashMap::new();
        for attribute in certificate.subject().iter_attributes() {
            let oid = attribute.attr_type().to_id_string();
            let Some(known) = DnAttribute::from_oid(&oid) else {
                continue;
            };
            if values.contains_key(&known) {
                continue;
            }
            match attribute.as_str() {
                Ok(value) => {
                    values.insert(known, value.to_string());
                }
                Err(e) => {
                    tracing::warn!(
                        attribute = %known,
                        error = %e,
                        "Certificate subject attribute is not a string, ignoring"
                    );
                }
            }
        }

        Ok(Self { values })
    }

    /// Value of `attribute`, or `""` if the subject lacks it
    pub fn get(&self, attribute: DnAttribute) -> &str {
        self.values.get(&attribute).map(String::as_str).unwrap_or("")
    }

    pub fn contains(&self, attribute: DnAttribute) -> bool {
        self.values.contains_key(&attribute)
    }

    /// Street attribute split into street name and house number
    pub fn street_address(&self) -> StreetAddress {
        split_street_and_number(self.get(DnAttribute::Street))
    }
}

impl<const N: usize> From<[(DnAttribute, &str); N]> for CertificateAttributes {
    fn from(pairs: [(DnAttribute, &str); N]) -> Self {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k, v.to_string()))
                .collect(),
        }
    }
}

/// Street name and house number
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreetAddress {
    pub street_name: String,
    pub house_number: String,
}

const STREET_AND_NUMBER_PATTERN: &str = r"^(.*) ([^ ]*)$";

static STREET_AND_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(STREET_AND_NUMBER_PATTERN).expect("street pattern is a valid regex"));

/// Splits `"Sundgauallee 59"` into `("Sundgauallee", "59")`
///
/// The house number is the token after the last space. Without a space the
/// whole value is the street name.
pub fn split_street_and_number(street: &str) -> StreetAddress {
    match STREET_AND_NUMBER.captures(street) {
        Some(caps) => StreetAddress {
            street_name: caps[1].to_string(),
            house_number: caps[2].to_string(),
        },
        None => StreetAddress {
            street_name: street.to_string(),
            house_number: String::new(),
        },
    }
}

/// Reads the certificate for `cert_ref` from `card` and extracts its subject
///
/// # Errors
///
/// Connectivity errors propagate; an empty or undecodable certificate is a
/// [`PrefillError::Certificate`].
pub async fn extract_attributes(
    certificates: &dyn CertificateService,
    card: &CardHandle,
    cert_ref: CertRef,
    ctx: &ConnectorContext,
) -> Result<CertificateAttributes> {
    let der = certificates
        .read_card_certificate(card, cert_ref, ctx)
        .await
        .map_err(|e| match e {
            PrefillError::Connector(ConnectorError::CertificateUnavailable(reason)) => {
                PrefillError::Certificate(format!("Card {card}: {reason}"))
            }
            other => other,
        })?;
    if der.is_empty() {
        return Err(PrefillError::Certificate(format!(
            "No {cert_ref} certificate returned for card {card}"
        )));
    }

    let attributes = CertificateAttributes::from_der(&der)?;
    tracing::debug!(
        card = %card,
        cert_ref = %cert_ref,
        attributes = attributes.values.len(),
        "Certificate subject read"
    );
    Ok(attributes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("Sundgauallee 59", "Sundgauallee", "59"; "name and number")]
    #[test_case("Sundgauallee", "Sundgauallee", ""; "no number")]
    #[test_case("Am Alten Markt 3a", "Am Alten Markt", "3a"; "multi word street")]
    #[test_case("", "", ""; "empty")]
    #[test_case("Hauptstr. ", "Hauptstr.", ""; "trailing space")]
    fn test_split_street_and_number(input: &str, street: &str, number: &str) {
        let split = split_street_and_number(input);
        assert_eq!(split.street_name, street);
        assert_eq!(split.house_number, number);
    }

    #[test]
    fn test_street_pattern_compiles() {
        assert!(Regex::new(STREET_AND_NUMBER_PATTERN).is_ok());
    }

    #[test]
    fn test_missing_attribute_is_empty() {
        let attributes = CertificateAttributes::from([(DnAttribute::CommonName, "Praxis")]);
        assert_eq!(attributes.get(DnAttribute::CommonName), "Praxis");
        assert_eq!(attributes.get(DnAttribute::Locality), "");
        assert!(!attributes.contains(DnAttribute::Locality));
    }

    #[test]
    fn test_from_der_rejects_garbage() {
        let err = CertificateAttributes::from_der(&[0x30, 0x03, 0x01]).unwrap_err();
        assert!(matches!(err, PrefillError::Certificate(_)));
    }

    #[test]
    fn test_from_der_reads_subject() {
        let mut params = rcgen::CertificateParams::default();
        let mut dn = rcgen::DistinguishedName::new();
        dn.push(rcgen::DnType::CountryName, "DE");
        dn.push(rcgen::DnType::LocalityName, "Freiburg");
        dn.push(rcgen::DnType::CustomDnType(vec![2, 5, 4, 17]), "79114");
        dn.push(rcgen::DnType::CustomDnType(vec![2, 5, 4, 9]), "Sundgauallee 59");
        dn.push(rcgen::DnType::CommonName, "VincenzkrankenhausTEST-ONLY");
        params.distinguished_name = dn;

        let key = rcgen::KeyPair::generate().unwrap();
        let cert = params.self_signed(&key).unwrap();

        let attributes = CertificateAttributes::from_der(cert.der()).unwrap();
        assert_eq!(attributes.get(DnAttribute::Locality), "Freiburg");
        assert_eq!(attributes.get(DnAttribute::PostalCode), "79114");
        assert_eq!(
            attributes.get(DnAttribute::CommonName),
            "VincenzkrankenhausTEST-ONLY"
        );
        assert_eq!(attributes.street_address().house_number, "59");
        assert_eq!(attributes.get(DnAttribute::GivenName), "");
    }
}
