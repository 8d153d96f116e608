//! Organization from the institution card's authentication certificate

use super::constants::*;
use crate::core::certificate::{CertificateAttributes, DnAttribute};
use crate::domain::fhir::{
    Address, Coding, ContactPoint, Extension, Identifier, Meta, Organization, PrimitiveExtension,
};
use crate::domain::ResourceId;

/// Builds the prescribing institution
///
/// BSNR and phone number are not on the card and stay empty.
pub fn organization_from_certificate(attributes: &CertificateAttributes) -> Organization {
    let street = attributes.street_address();

    let address = Address {
        type_: Some("both".to_string()),
        line: vec![format!("{} {}", street.street_name, street.house_number)],
        line_ext: vec![PrimitiveExtension::new(vec![
            Extension::string(EX_STREET_NAME, street.street_name.as_str()),
            Extension::string(EX_HOUSE_NUMBER, street.house_number.as_str()),
        ])],
        city: Some(attributes.get(DnAttribute::Locality).to_string()),
        postal_code: Some(attributes.get(DnAttribute::PostalCode).to_string()),
        country: Some("D".to_string()),
    };

    Organization {
        id: ResourceId::generate(),
        meta: Meta::with_profile(PROFILE_ORGANIZATION),
        identifier: vec![Identifier::typed(Coding::new(CS_V2_0203, "BSNR"), NS_BSNR, "")],
        name: Some(attributes.get(DnAttribute::CommonName).to_string()),
        telecom: vec![ContactPoint {
            system: Some("phone".to_string()),
            value: String::new(),
        }],
        address: vec![address],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_organization_from_certificate() {
        let attributes = CertificateAttributes::from([
            (DnAttribute::Country, "DE"),
            (DnAttribute::Locality, "Freiburg"),
            (DnAttribute::PostalCode, "79114"),
            (DnAttribute::Street, "Sundgauallee 59"),
            (DnAttribute::SerialNumber, "80276883110000118001"),
            (DnAttribute::CommonName, "VincenzkrankenhausTEST-ONLY"),
        ]);
        let organization = organization_from_certificate(&attributes);
        let json = serde_json::to_value(&organization).unwrap();

        assert_eq!(json["meta"]["profile"][0], PROFILE_ORGANIZATION);
        assert_eq!(json["identifier"][0]["type"]["coding"][0]["code"], "BSNR");
        assert_eq!(json["identifier"][0]["system"], NS_BSNR);
        assert_eq!(json["name"], "VincenzkrankenhausTEST-ONLY");
        assert_eq!(json["telecom"][0]["system"], "phone");
        assert_eq!(json["telecom"][0]["value"], "");

        let address = &json["address"][0];
        assert_eq!(address["type"], "both");
        assert_eq!(address["line"][0], "Sundgauallee 59");
        assert_eq!(address["_line"][0]["extension"][0]["valueString"], "Sundgauallee");
        assert_eq!(address["_line"][0]["extension"][1]["valueString"], "59");
        assert_eq!(address["city"], "Freiburg");
        assert_eq!(address["postalCode"], "79114");
        assert_eq!(address["country"], "D");
    }

    #[test]
    fn test_organization_street_without_number() {
        let attributes = CertificateAttributes::from([(DnAttribute::Street, "Sundgauallee")]);
        let organization = organization_from_certificate(&attributes);
        assert_eq!(organization.address[0].line[0], "Sundgauallee ");
        assert_eq!(organization.name.as_deref(), Some(""));
    }
}
