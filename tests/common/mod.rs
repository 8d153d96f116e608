//! Shared fixtures for the integration tests
//!
//! An in-memory Konnektor with scripted card inventory, VSD segments and
//! card certificates, plus builders for realistic payloads.

#![allow(dead_code)]

use async_trait::async_trait;
use flate2::write::GzEncoder;
use flate2::Compression;
use prefill::adapters::connector::{
    CertificateService, ConfiguredContextProvider, ConnectorContext, ConnectorServices,
    EventService, RawInsuranceData, VsdService,
};
use prefill::config::ConnectorConfig;
use prefill::domain::{CardHandle, CardInfo, CardType, CertRef, ConnectorError, Result};
use std::collections::HashMap;
use std::io::Write;
use std::sync::{Arc, Mutex};

pub const EGK_HANDLE: &str = "EGK-127";
pub const SMCB_HANDLE: &str = "SMC-B-4";
pub const HBA_HANDLE: &str = "HBA-11";

pub const PERSONAL_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<vsdp:UC_PersoenlicheVersichertendatenXML xmlns:vsdp="http://ws.gematik.de/fa/vsdm/vsd/v5.2" CDM_VERSION="5.2.0">
  <vsdp:Versicherter>
    <vsdp:Versicherten_ID>X110485291</vsdp:Versicherten_ID>
    <vsdp:Person>
      <vsdp:Geburtsdatum>19640409</vsdp:Geburtsdatum>
      <vsdp:Vorname>Heinz</vsdp:Vorname>
      <vsdp:Nachname>Schaumberg</vsdp:Nachname>
      <vsdp:Geschlecht>M</vsdp:Geschlecht>
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

pub const GENERAL_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
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

pub const PROTECTED_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<UC_GeschuetzteVersichertendatenXML xmlns="http://ws.gematik.de/fa/vsdm/vsd/v5.2" CDM_VERSION="5.2.0">
  <Zuzahlungsstatus><Status>0</Status></Zuzahlungsstatus>
  <Besondere_Personengruppe>00</Besondere_Personengruppe>
  <DMP_Kennzeichnung>00</DMP_Kennzeichnung>
</UC_GeschuetzteVersichertendatenXML>"#;

pub fn gzip(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes).unwrap();
    encoder.finish().unwrap()
}

/// VSD segments for the insured person Heinz Schaumberg
pub fn insurance_data() -> RawInsuranceData {
    RawInsuranceData {
        personal: gzip(PERSONAL_XML.as_bytes()),
        general: gzip(GENERAL_XML.as_bytes()),
        protected: gzip(PROTECTED_XML.as_bytes()),
    }
}

fn self_signed(attributes: &[(Vec<u64>, &str)]) -> Vec<u8> {
    let mut params = rcgen::CertificateParams::default();
    let mut dn = rcgen::DistinguishedName::new();
    dn.push(rcgen::DnType::CountryName, "DE");
    for (oid, value) in attributes {
        dn.push(rcgen::DnType::CustomDnType(oid.clone()), *value);
    }
    params.distinguished_name = dn;

    let key = rcgen::KeyPair::generate().unwrap();
    params.self_signed(&key).unwrap().der().to_vec()
}

/// QES certificate of a professional card issued to Dr. Alexander Fischer
pub fn hba_certificate() -> Vec<u8> {
    self_signed(&[
        (vec![2, 5, 4, 42], "Alexander"),
        (vec![2, 5, 4, 4], "Fischer"),
        (vec![2, 5, 4, 3], "Alexander Fischer"),
        (vec![2, 5, 4, 5], "80276001011699901102"),
    ])
}

/// AUT certificate of a practice's institution card
pub fn smcb_certificate() -> Vec<u8> {
    self_signed(&[
        (vec![2, 5, 4, 3], "Hausarztpraxis Dr. Fischer"),
        (vec![2, 5, 4, 7], "Freiburg"),
        (vec![2, 5, 4, 17], "79098"),
        (vec![2, 5, 4, 9], "Kaiser-Joseph-Straße 12a"),
    ])
}

/// A Konnektor call the fake observed
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    GetCards(CardType, ConnectorContext),
    ReadVsd {
        egk: CardHandle,
        smcb: Option<CardHandle>,
    },
    ReadCertificate(CardHandle, CertRef),
}

/// In-memory Konnektor
#[derive(Default)]
pub struct FakeKonnektor {
    cards: Vec<CardInfo>,
    vsd: RawInsuranceData,
    certificates: HashMap<(CardHandle, CertRef), Vec<u8>>,
    unreachable: bool,
    panicking: bool,
    calls: Mutex<Vec<Call>>,
}

impl FakeKonnektor {
    pub fn new() -> Self {
        Self::default()
    }

    /// A workplace with all three cards inserted
    pub fn fully_equipped() -> Self {
        Self::new().with_egk().with_smcb().with_hba()
    }

    pub fn with_card(mut self, card_type: CardType, handle: &str) -> Self {
        self.cards
            .push(CardInfo::new(CardHandle::new(handle).unwrap(), card_type));
        self
    }

    pub fn with_egk(self) -> Self {
        self.with_card(CardType::Egk, EGK_HANDLE)
            .with_insurance_data(insurance_data())
    }

    pub fn with_smcb(self) -> Self {
        self.with_card(CardType::SmcB, SMCB_HANDLE)
            .with_certificate(SMCB_HANDLE, CertRef::Aut, smcb_certificate())
    }

    pub fn with_hba(self) -> Self {
        self.with_card(CardType::Hba, HBA_HANDLE)
            .with_certificate(HBA_HANDLE, CertRef::Qes, hba_certificate())
    }

    pub fn with_insurance_data(mut self, vsd: RawInsuranceData) -> Self {
        self.vsd = vsd;
        self
    }

    pub fn with_certificate(mut self, handle: &str, cert_ref: CertRef, der: Vec<u8>) -> Self {
        self.certificates
            .insert((CardHandle::new(handle).unwrap(), cert_ref), der);
        self
    }

    /// Every call fails as if the Konnektor were down
    pub fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }

    /// Every call panics, as a bug in a service implementation would
    pub fn panicking(mut self) -> Self {
        self.panicking = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        if self.panicking {
            panic!("Konnektor fake told to panic");
        }
        if self.unreachable {
            return Err(ConnectorError::ConnectionFailed("connection refused".to_string()).into());
        }
        Ok(())
    }
}

#[async_trait]
impl EventService for FakeKonnektor {
    async fn get_cards(&self, ctx: &ConnectorContext, card_type: CardType) -> Result<Vec<CardInfo>> {
        self.record(Call::GetCards(card_type, ctx.clone()))?;
        Ok(self
            .cards
            .iter()
            .filter(|c| c.card_type == card_type)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl VsdService for FakeKonnektor {
    async fn read_vsd(
        &self,
        egk: &CardHandle,
        smcb: Option<&CardHandle>,
        _ctx: &ConnectorContext,
    ) -> Result<RawInsuranceData> {
        self.record(Call::ReadVsd {
            egk: egk.clone(),
            smcb: smcb.cloned(),
        })?;
        Ok(self.vsd.clone())
    }
}

#[async_trait]
impl CertificateService for FakeKonnektor {
    async fn read_card_certificate(
        &self,
        card: &CardHandle,
        cert_ref: CertRef,
        _ctx: &ConnectorContext,
    ) -> Result<Vec<u8>> {
        self.record(Call::ReadCertificate(card.clone(), cert_ref))?;
        self.certificates
            .get(&(card.clone(), cert_ref))
            .cloned()
            .ok_or_else(|| {
                ConnectorError::Fault {
                    operation: "ReadCardCertificate".to_string(),
                    message: format!("no {cert_ref} certificate on {card}"),
                }
                .into()
            })
    }
}

/// Wires a fake Konnektor behind the default configured context
pub fn services(fake: Arc<FakeKonnektor>) -> ConnectorServices {
    ConnectorServices::new(
        Arc::new(ConfiguredContextProvider::from_config(
            &ConnectorConfig::default(),
        )),
        fake.clone(),
        fake.clone(),
        fake,
    )
}
