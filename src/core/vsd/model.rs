//! Typed VSD segments
//!
//! Field names follow the VSD XML schema. Elements the prefill doesn't use
//! are ignored during deserialization.

use serde::Deserialize;

/// `UC_PersoenlicheVersichertendatenXML`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PersonalData {
    #[serde(rename = "@CDM_VERSION", default)]
    pub cdm_version: Option<String>,
    #[serde(rename = "Versicherter")]
    pub insured: InsuredPerson,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InsuredPerson {
    /// KVNR, the ten-character insurance number
    #[serde(rename = "Versicherten_ID")]
    pub insurant_id: String,
    #[serde(rename = "Person")]
    pub person: Person,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Person {
    /// `YYYYMMDD`
    #[serde(rename = "Geburtsdatum")]
    pub birth_date: String,
    #[serde(rename = "Vorname")]
    pub given_name: String,
    #[serde(rename = "Nachname")]
    pub family_name: String,
    /// `M`, `W`, `D` or `X`
    #[serde(rename = "Geschlecht")]
    pub gender: String,
    #[serde(rename = "Vorsatzwort", default)]
    pub name_prefix: Option<String>,
    #[serde(rename = "Namenszusatz", default)]
    pub name_suffix: Option<String>,
    #[serde(rename = "Titel", default)]
    pub title: Option<String>,
    #[serde(rename = "PostfachAdresse", default)]
    pub post_box_address: Option<PostBoxAddress>,
    #[serde(rename = "StrassenAdresse", default)]
    pub street_address: Option<StreetAddressData>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Country {
    #[serde(rename = "Wohnsitzlaendercode")]
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PostBoxAddress {
    #[serde(rename = "Postleitzahl", default)]
    pub postal_code: Option<String>,
    #[serde(rename = "Ort")]
    pub city: String,
    #[serde(rename = "Postfach")]
    pub post_box: String,
    #[serde(rename = "Land")]
    pub country: Country,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StreetAddressData {
    #[serde(rename = "Postleitzahl", default)]
    pub postal_code: Option<String>,
    #[serde(rename = "Ort")]
    pub city: String,
    #[serde(rename = "Land")]
    pub country: Country,
    #[serde(rename = "Strasse", default)]
    pub street: Option<String>,
    #[serde(rename = "Hausnummer", default)]
    pub house_number: Option<String>,
    #[serde(rename = "Anschriftenzusatz", default)]
    pub additional_locator: Option<String>,
}

/// `UC_AllgemeineVersicherungsdatenXML`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeneralData {
    #[serde(rename = "@CDM_VERSION", default)]
    pub cdm_version: Option<String>,
    #[serde(rename = "Versicherter")]
    pub insured: InsuredCoverage,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InsuredCoverage {
    #[serde(rename = "Versicherungsschutz")]
    pub protection: InsuranceProtection,
    #[serde(rename = "Zusatzinfos", default)]
    pub additional: Option<AdditionalInfo>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InsuranceProtection {
    /// `YYYYMMDD`
    #[serde(rename = "Beginn")]
    pub start: String,
    #[serde(rename = "Ende", default)]
    pub end: Option<String>,
    #[serde(rename = "Kostentraeger")]
    pub payor: Payor,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Payor {
    /// Institution code (IK number)
    #[serde(rename = "Kostentraegerkennung")]
    pub id: String,
    #[serde(rename = "Kostentraegerlaendercode")]
    pub country_code: String,
    #[serde(rename = "Name")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AdditionalInfo {
    #[serde(rename = "ZusatzinfosGKV", default)]
    pub statutory: Option<StatutoryInfo>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StatutoryInfo {
    #[serde(rename = "Versichertenart", default)]
    pub insurant_type: Option<String>,
    #[serde(rename = "Zusatzinfos_Abrechnung_GKV", default)]
    pub billing: Option<BillingInfo>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BillingInfo {
    /// Residence region code
    #[serde(rename = "WOP", default)]
    pub wop: Option<String>,
}

/// `UC_GeschuetzteVersichertendatenXML`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProtectedData {
    #[serde(rename = "@CDM_VERSION", default)]
    pub cdm_version: Option<String>,
    #[serde(rename = "Zuzahlungsstatus", default)]
    pub co_payment: Option<CoPaymentStatus>,
    #[serde(rename = "Besondere_Personengruppe", default)]
    pub special_group: Option<String>,
    #[serde(rename = "DMP_Kennzeichnung", default)]
    pub dmp_marker: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CoPaymentStatus {
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Gueltig_bis", default)]
    pub valid_until: Option<String>,
}

impl GeneralData {
    /// Versichertenart, if recorded
    pub fn insurant_type(&self) -> Option<&str> {
        self.statutory().and_then(|s| s.insurant_type.as_deref())
    }

    /// WOP region code, if recorded
    pub fn wop(&self) -> Option<&str> {
        self.statutory()
            .and_then(|s| s.billing.as_ref())
            .and_then(|b| b.wop.as_deref())
    }

    fn statutory(&self) -> Option<&StatutoryInfo> {
        self.insured
            .additional
            .as_ref()
            .and_then(|a| a.statutory.as_ref())
    }
}
