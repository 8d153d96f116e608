//! Patient from the personal data segment

use super::constants::*;
use crate::core::vsd::model::{PersonalData, PostBoxAddress, StreetAddressData};
use crate::domain::fhir::{
    Address, Coding, Extension, ExtensionValue, HumanName, Identifier, Meta, Patient,
    PrimitiveExtension,
};
use crate::domain::ResourceId;

/// Builds the Patient for the insured person
pub fn patient_from_vsd(personal: &PersonalData) -> Patient {
    let insured = &personal.insured;
    let person = &insured.person;
    let (gender, gender_ext) = map_gender(&person.gender);

    let address = match (&person.street_address, &person.post_box_address) {
        (Some(street), _) => vec![street_address(street)],
        (None, Some(post_box)) => vec![post_box_address(post_box)],
        (None, None) => Vec::new(),
    };

    Patient {
        id: ResourceId::generate(),
        meta: Meta::with_profile(PROFILE_PATIENT),
        identifier: vec![Identifier::typed(
            Coding::new(CS_IDENTIFIER_TYPE_DE, "GKV"),
            NS_KVID,
            insured.insurant_id.trim(),
        )],
        name: vec![official_name(
            &person.family_name,
            &person.given_name,
            non_empty(&person.name_prefix),
            non_empty(&person.name_suffix),
            non_empty(&person.title),
        )],
        gender,
        gender_ext,
        birth_date: super::fhir_date(&person.birth_date),
        address,
    }
}

/// Official name with the German name part extensions
///
/// `family` is assembled as "<Namenszusatz> <Vorsatzwort> <Nachname>".
pub(super) fn official_name(
    family_name: &str,
    given_name: &str,
    prefix_word: Option<&str>,
    name_suffix: Option<&str>,
    title: Option<&str>,
) -> HumanName {
    let mut family_ext = Vec::new();
    if let Some(suffix) = name_suffix {
        family_ext.push(Extension::string(EX_NAMENSZUSATZ, suffix));
    }
    family_ext.push(Extension::string(EX_OWN_NAME, family_name));
    if let Some(prefix) = prefix_word {
        family_ext.push(Extension::string(EX_OWN_PREFIX, prefix));
    }

    let family = [name_suffix, prefix_word, Some(family_name)]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");

    let (prefix, prefix_ext) = match title {
        Some(title) => (
            vec![title.to_string()],
            vec![PrimitiveExtension::new(vec![Extension::code(
                EX_EN_QUALIFIER,
                "AC",
            )])],
        ),
        None => (Vec::new(), Vec::new()),
    };

    HumanName {
        use_: Some("official".to_string()),
        family: Some(family),
        family_ext: Some(PrimitiveExtension::new(family_ext)),
        given: vec![given_name.to_string()],
        prefix,
        prefix_ext,
    }
}

fn map_gender(code: &str) -> (Option<String>, Option<PrimitiveExtension>) {
    match code.trim() {
        "M" => (Some("male".to_string()), None),
        "W" => (Some("female".to_string()), None),
        "D" => (
            Some("other".to_string()),
            Some(PrimitiveExtension::new(vec![Extension::new(
                EX_GENDER_AMTLICH,
                ExtensionValue::Coding(Coding::new(CS_GENDER_AMTLICH, "D")),
            )])),
        ),
        "X" => (Some("unknown".to_string()), None),
        other => {
            tracing::warn!(gender = %other, "Unknown gender code on insurance card, omitting");
            (None, None)
        }
    }
}

fn street_address(street: &StreetAddressData) -> Address {
    let street_name = non_empty(&street.street).unwrap_or_default();
    let house_number = non_empty(&street.house_number).unwrap_or_default();

    let mut line_ext = Vec::new();
    if !street_name.is_empty() {
        line_ext.push(Extension::string(EX_STREET_NAME, street_name));
    }
    if !house_number.is_empty() {
        line_ext.push(Extension::string(EX_HOUSE_NUMBER, house_number));
    }
    if let Some(locator) = non_empty(&street.additional_locator) {
        line_ext.push(Extension::string(EX_ADDITIONAL_LOCATOR, locator));
    }

    let line = format!("{street_name} {house_number}").trim().to_string();

    Address {
        type_: Some("both".to_string()),
        line: vec![line],
        line_ext: vec![PrimitiveExtension::new(line_ext)],
        city: Some(street.city.clone()),
        postal_code: street.postal_code.clone(),
        country: Some(street.country.code.clone()),
    }
}

fn post_box_address(post_box: &PostBoxAddress) -> Address {
    Address {
        type_: Some("postal".to_string()),
        line: vec![post_box.post_box.clone()],
        line_ext: vec![PrimitiveExtension::new(vec![Extension::string(
            EX_POST_BOX,
            post_box.post_box.as_str(),
        )])],
        city: Some(post_box.city.clone()),
        postal_code: post_box.postal_code.clone(),
        country: Some(post_box.country.code.clone()),
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
