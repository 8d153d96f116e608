//! SOAP 1.1 envelopes for the Konnektor services
//!
//! Requests are rendered as strings with escaped values. Responses are
//! normalized with [`crate::xml::normalize`] and deserialized by local name,
//! so the Konnektor's choice of namespace prefixes doesn't matter.

use super::context::ConnectorContext;
use super::traits::RawInsuranceData;
use crate::domain::card::{CardHandle, CardInfo, CardType, CertRef};
use crate::domain::ConnectorError;
use base64::{engine::general_purpose, Engine as _};
use quick_xml::escape::escape;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::str::FromStr;

pub const NS_SOAP_ENVELOPE: &str = "http://schemas.xmlsoap.org/soap/envelope/";
pub const NS_CONNECTOR_CONTEXT: &str = "http://ws.gematik.de/conn/ConnectorContext/v2.0";
pub const NS_CONNECTOR_COMMON: &str = "http://ws.gematik.de/conn/ConnectorCommon/v5.0";
pub const NS_CARD_SERVICE_COMMON: &str = "http://ws.gematik.de/conn/CardServiceCommon/v2.0";
pub const NS_EVENT_SERVICE: &str = "http://ws.gematik.de/conn/EventService/v7.2";
pub const NS_VSD_SERVICE: &str = "http://ws.gematik.de/conn/vsds/VSDService/v5.2";
pub const NS_CERTIFICATE_SERVICE: &str = "http://ws.gematik.de/conn/CertificateService/v6.0";
pub const NS_CERTIFICATE_SERVICE_COMMON: &str =
    "http://ws.gematik.de/conn/CertificateServiceCommon/v2.0";

/// A Konnektor operation: its name and SOAPAction header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    pub name: &'static str,
    pub soap_action: &'static str,
}

pub const GET_CARDS: Operation = Operation {
    name: "GetCards",
    soap_action: "http://ws.gematik.de/conn/EventService/v7.2#GetCards",
};

pub const READ_VSD: Operation = Operation {
    name: "ReadVSD",
    soap_action: "http://ws.gematik.de/conn/vsds/VSDService/v5.2#ReadVSD",
};

pub const READ_CARD_CERTIFICATE: Operation = Operation {
    name: "ReadCardCertificate",
    soap_action: "http://ws.gematik.de/conn/CertificateService/v6.0#ReadCardCertificate",
};

fn envelope(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><soapenv:Envelope xmlns:soapenv="{NS_SOAP_ENVELOPE}" xmlns:CCTX="{NS_CONNECTOR_CONTEXT}" xmlns:CONN="{NS_CONNECTOR_COMMON}"><soapenv:Header/><soapenv:Body>{body}</soapenv:Body></soapenv:Envelope>"#
    )
}

fn context_element(ctx: &ConnectorContext) -> String {
    let user = ctx
        .user_id
        .as_deref()
        .map(|u| format!("<CONN:UserId>{}</CONN:UserId>", escape(u)))
        .unwrap_or_default();
    format!(
        "<CCTX:Context><CONN:MandantId>{}</CONN:MandantId><CONN:ClientSystemId>{}</CONN:ClientSystemId><CONN:WorkplaceId>{}</CONN:WorkplaceId>{user}</CCTX:Context>",
        escape(&ctx.mandant_id),
        escape(&ctx.client_system_id),
        escape(&ctx.workplace_id),
    )
}

/// `EventService.GetCards` request for one card type
pub fn get_cards_request(ctx: &ConnectorContext, card_type: CardType) -> String {
    envelope(&format!(
        r#"<EVT:GetCards xmlns:EVT="{NS_EVENT_SERVICE}" xmlns:CARDCMN="{NS_CARD_SERVICE_COMMON}" mandant-wide="false">{}<CARDCMN:CardType>{}</CARDCMN:CardType></EVT:GetCards>"#,
        context_element(ctx),
        card_type.as_str(),
    ))
}

/// `VSDService.ReadVSD` request without online check
pub fn read_vsd_request(
    egk: &CardHandle,
    smcb: Option<&CardHandle>,
    ctx: &ConnectorContext,
) -> String {
    let hpc = smcb
        .map(|h| format!("<VSD:HpcHandle>{}</VSD:HpcHandle>", escape(h.as_str())))
        .unwrap_or_default();
    envelope(&format!(
        r#"<VSD:ReadVSD xmlns:VSD="{NS_VSD_SERVICE}"><VSD:EhcHandle>{}</VSD:EhcHandle>{hpc}<VSD:PerformOnlineCheck>false</VSD:PerformOnlineCheck><VSD:ReadOnlineReceipt>false</VSD:ReadOnlineReceipt>{}</VSD:ReadVSD>"#,
        escape(egk.as_str()),
        context_element(ctx),
    ))
}

/// `CertificateService.ReadCardCertificate` request for a single role
pub fn read_card_certificate_request(
    card: &CardHandle,
    cert_ref: CertRef,
    ctx: &ConnectorContext,
) -> String {
    envelope(&format!(
        r#"<CERT:ReadCardCertificate xmlns:CERT="{NS_CERTIFICATE_SERVICE}" xmlns:CERTCMN="{NS_CERTIFICATE_SERVICE_COMMON}"><CONN:CardHandle>{}</CONN:CardHandle>{}<CERT:CertRefList><CERT:CertRef>{}</CERT:CertRef></CERT:CertRefList></CERT:ReadCardCertificate>"#,
        escape(card.as_str()),
        context_element(ctx),
        cert_ref.as_str(),
    ))
}

#[derive(Debug, Deserialize)]
struct Envelope<B> {
    #[serde(rename = "Body")]
    body: B,
}

#[derive(Debug, Deserialize)]
struct FaultBody {
    #[serde(rename = "Fault")]
    fault: Option<Fault>,
}

#[derive(Debug, Deserialize)]
struct Fault {
    faultcode: Option<String>,
    faultstring: Option<String>,
    detail: Option<FaultDetail>,
}

#[derive(Debug, Deserialize)]
struct FaultDetail {
    #[serde(rename = "Error")]
    error: Option<GematikError>,
}

#[derive(Debug, Deserialize)]
struct GematikError {
    #[serde(rename = "Trace", default)]
    trace: Vec<Trace>,
}

#[derive(Debug, Deserialize)]
struct Trace {
    #[serde(rename = "Code")]
    code: Option<String>,
    #[serde(rename = "ErrorText")]
    error_text: Option<String>,
}

impl Fault {
    fn message(&self) -> String {
        let trace = self
            .detail
            .as_ref()
            .and_then(|d| d.error.as_ref())
            .and_then(|e| e.trace.first());

        match (trace, &self.faultstring) {
            (Some(t), _) => format!(
                "{} (code {})",
                t.error_text.as_deref().unwrap_or("no error text"),
                t.code.as_deref().unwrap_or("unknown")
            ),
            (None, Some(s)) => s.trim().to_string(),
            (None, None) => self
                .faultcode
                .clone()
                .unwrap_or_else(|| "unspecified fault".to_string()),
        }
    }
}

/// Extracts a SOAP fault from a response body, if it carries one
pub fn find_fault(operation: Operation, body: &str) -> Option<ConnectorError> {
    let normalized = crate::xml::normalize(body).ok()?;
    let envelope: Envelope<FaultBody> = quick_xml::de::from_str(&normalized.xml).ok()?;
    envelope.body.fault.map(|fault| ConnectorError::Fault {
        operation: operation.name.to_string(),
        message: fault.message(),
    })
}

fn parse_body<B: DeserializeOwned>(operation: Operation, body: &str) -> Result<B, ConnectorError> {
    if let Some(fault) = find_fault(operation, body) {
        return Err(fault);
    }

    let normalized = crate::xml::normalize(body).map_err(|e| {
        ConnectorError::InvalidResponse(format!("{} response: {e}", operation.name))
    })?;
    if normalized.root != "Envelope" {
        return Err(ConnectorError::InvalidResponse(format!(
            "{} response is not a SOAP envelope (root element {})",
            operation.name, normalized.root
        )));
    }

    let envelope: Envelope<B> = quick_xml::de::from_str(&normalized.xml).map_err(|e| {
        ConnectorError::InvalidResponse(format!("{} response: {e}", operation.name))
    })?;
    Ok(envelope.body)
}

fn decode_base64(operation: Operation, field: &str, value: &str) -> Result<Vec<u8>, ConnectorError> {
    let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    general_purpose::STANDARD.decode(compact).map_err(|e| {
        ConnectorError::InvalidResponse(format!(
            "{} response field {field} is not valid base64: {e}",
            operation.name
        ))
    })
}

#[derive(Debug, Deserialize)]
struct GetCardsBody {
    #[serde(rename = "GetCardsResponse")]
    response: GetCardsResponse,
}

#[derive(Debug, Deserialize)]
struct GetCardsResponse {
    #[serde(rename = "Cards", default)]
    cards: Option<Cards>,
}

#[derive(Debug, Deserialize)]
struct Cards {
    #[serde(rename = "Card", default)]
    card: Vec<CardElement>,
}

#[derive(Debug, Deserialize)]
struct CardElement {
    #[serde(rename = "CardHandle")]
    card_handle: String,
    #[serde(rename = "CardType")]
    card_type: String,
    #[serde(rename = "Iccsn")]
    iccsn: Option<String>,
    #[serde(rename = "CardHolderName")]
    card_holder_name: Option<String>,
}

/// Parses a `GetCardsResponse` into the card inventory
pub fn parse_get_cards(body: &str) -> Result<Vec<CardInfo>, ConnectorError> {
    let parsed: GetCardsBody = parse_body(GET_CARDS, body)?;
    let cards = parsed.response.cards.map(|c| c.card).unwrap_or_default();

    cards
        .into_iter()
        .map(|card| {
            let handle = CardHandle::new(card.card_handle.trim())
                .map_err(|e| ConnectorError::InvalidResponse(format!("GetCards response: {e}")))?;
            let card_type = CardType::from_str(card.card_type.trim())
                .map_err(|e| ConnectorError::InvalidResponse(format!("GetCards response: {e}")))?;
            Ok(CardInfo {
                handle,
                card_type,
                iccsn: card.iccsn,
                card_holder_name: card.card_holder_name,
            })
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct ReadVsdBody {
    #[serde(rename = "ReadVSDResponse")]
    response: ReadVsdResponse,
}

#[derive(Debug, Deserialize)]
struct ReadVsdResponse {
    #[serde(rename = "PersoenlicheVersichertendaten")]
    personal: Option<String>,
    #[serde(rename = "AllgemeineVersicherungsdaten")]
    general: Option<String>,
    #[serde(rename = "GeschuetzteVersichertendaten")]
    protected: Option<String>,
}

/// Parses a `ReadVSDResponse` into the three compressed segments
///
/// Missing segments come back empty; the decoder rejects them.
pub fn parse_read_vsd(body: &str) -> Result<RawInsuranceData, ConnectorError> {
    let parsed: ReadVsdBody = parse_body(READ_VSD, body)?;
    let segment = |field: &str, value: Option<String>| match value {
        Some(v) => decode_base64(READ_VSD, field, &v),
        None => Ok(Vec::new()),
    };

    Ok(RawInsuranceData {
        personal: segment("PersoenlicheVersichertendaten", parsed.response.personal)?,
        general: segment("AllgemeineVersicherungsdaten", parsed.response.general)?,
        protected: segment("GeschuetzteVersichertendaten", parsed.response.protected)?,
    })
}

#[derive(Debug, Deserialize)]
struct ReadCardCertificateBody {
    #[serde(rename = "ReadCardCertificateResponse")]
    response: ReadCardCertificateResponse,
}

#[derive(Debug, Deserialize)]
struct ReadCardCertificateResponse {
    #[serde(rename = "X509DataInfoList", default)]
    list: Option<X509DataInfoList>,
}

#[derive(Debug, Deserialize)]
struct X509DataInfoList {
    #[serde(rename = "X509DataInfo", default)]
    info: Vec<X509DataInfo>,
}

#[derive(Debug, Deserialize)]
struct X509DataInfo {
    #[serde(rename = "CertRef")]
    cert_ref: Option<String>,
    #[serde(rename = "X509Data")]
    data: Option<X509Data>,
}

#[derive(Debug, Deserialize)]
struct X509Data {
    #[serde(rename = "X509Certificate")]
    certificate: Option<String>,
}

/// Parses a `ReadCardCertificateResponse`, returning the DER certificate for `cert_ref`
///
/// An entry without a `CertRef` is accepted since only one role was requested.
/// A well-formed response without a usable certificate for the role is
/// [`ConnectorError::CertificateUnavailable`].
pub fn parse_read_card_certificate(
    body: &str,
    cert_ref: CertRef,
) -> Result<Vec<u8>, ConnectorError> {
    let parsed: ReadCardCertificateBody = parse_body(READ_CARD_CERTIFICATE, body)?;
    let infos = parsed.response.list.map(|l| l.info).unwrap_or_default();

    let certificate = infos
        .into_iter()
        .filter(|info| {
            info.cert_ref
                .as_deref()
                .map_or(true, |r| r.trim() == cert_ref.as_str())
        })
        .find_map(|info| info.data.and_then(|d| d.certificate))
        .ok_or_else(|| {
            ConnectorError::CertificateUnavailable(format!(
                "ReadCardCertificate response contains no {cert_ref} certificate"
            ))
        })?;

    decode_base64(READ_CARD_CERTIFICATE, "X509Certificate", &certificate)
        .map_err(|e| ConnectorError::CertificateUnavailable(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> ConnectorContext {
        ConnectorContext {
            mandant_id: "Mandant1".to_string(),
            client_system_id: "ClientID1".to_string(),
            workplace_id: "Workplace1".to_string(),
            user_id: None,
        }
    }

    #[test]
    fn test_get_cards_request_shape() {
        let xml = get_cards_request(&ctx(), CardType::SmcB);
        assert!(xml.contains("<CARDCMN:CardType>SMC-B</CARDCMN:CardType>"));
        assert!(xml.contains("<CONN:MandantId>Mandant1</CONN:MandantId>"));
        assert!(!xml.contains("UserId"));
        assert!(crate::xml::normalize(&xml).is_ok());
    }

    #[test]
    fn test_context_values_are_escaped() {
        let mut ctx = ctx();
        ctx.workplace_id = "A&B<1>".to_string();
        ctx.user_id = Some("dr.x".to_string());
        let xml = get_cards_request(&ctx, CardType::Egk);
        assert!(xml.contains("A&amp;B&lt;1&gt;"));
        assert!(xml.contains("<CONN:UserId>dr.x</CONN:UserId>"));
    }

    #[test]
    fn test_read_vsd_request_without_smcb() {
        let egk = CardHandle::new("EGK-1").unwrap();
        let xml = read_vsd_request(&egk, None, &ctx());
        assert!(xml.contains("<VSD:EhcHandle>EGK-1</VSD:EhcHandle>"));
        assert!(!xml.contains("HpcHandle"));
        assert!(xml.contains("<VSD:PerformOnlineCheck>false</VSD:PerformOnlineCheck>"));
        assert!(xml.contains("<VSD:ReadOnlineReceipt>false</VSD:ReadOnlineReceipt>"));
    }

    #[test]
    fn test_read_card_certificate_request() {
        let card = CardHandle::new("HBA-1").unwrap();
        let xml = read_card_certificate_request(&card, CertRef::Qes, &ctx());
        assert!(xml.contains("<CERT:CertRef>C.QES</CERT:CertRef>"));
        assert!(xml.contains("<CONN:CardHandle>HBA-1</CONN:CardHandle>"));
    }

    #[test]
    fn test_parse_get_cards() {
        let body = r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
  <soap:Body>
    <ns4:GetCardsResponse xmlns:ns4="http://ws.gematik.de/conn/EventService/v7.2" xmlns:ns2="http://ws.gematik.de/conn/CardService/v8.1" xmlns:ns3="http://ws.gematik.de/conn/CardServiceCommon/v2.0">
      <ns5:Status xmlns:ns5="http://ws.gematik.de/conn/ConnectorCommon/v5.0"><ns5:Result>OK</ns5:Result></ns5:Status>
      <ns2:Cards>
        <ns2:Card><ns6:CardHandle xmlns:ns6="http://ws.gematik.de/conn/ConnectorCommon/v5.0">EGK-127</ns6:CardHandle><ns3:CardType>EGK</ns3:CardType><ns3:Iccsn>80276883110000113311</ns3:Iccsn><ns2:CardHolderName>Schaumberg</ns2:CardHolderName></ns2:Card>
        <ns2:Card><ns6:CardHandle xmlns:ns6="http://ws.gematik.de/conn/ConnectorCommon/v5.0">EGK-128</ns6:CardHandle><ns3:CardType>EGK</ns3:CardType></ns2:Card>
      </ns2:Cards>
    </ns4:GetCardsResponse>
  </soap:Body>
</soap:Envelope>"#;

        let cards = parse_get_cards(body).unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].handle.as_str(), "EGK-127");
        assert_eq!(cards[0].card_type, CardType::Egk);
        assert_eq!(cards[0].card_holder_name.as_deref(), Some("Schaumberg"));
        assert_eq!(cards[1].handle.as_str(), "EGK-128");
    }

    #[test]
    fn test_parse_get_cards_empty_inventory() {
        let body = r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/"><soap:Body><GetCardsResponse><Status><Result>OK</Result></Status><Cards/></GetCardsResponse></soap:Body></soap:Envelope>"#;
        assert!(parse_get_cards(body).unwrap().is_empty());
    }

    #[test]
    fn test_parse_fault() {
        let body = r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/"><soap:Body><soap:Fault><faultcode>soap:Server</faultcode><faultstring>Ungültige Mandanten-ID</faultstring><detail><ns2:Error xmlns:ns2="http://ws.gematik.de/tel/error/v2.0"><ns2:MessageID>1</ns2:MessageID><ns2:Timestamp>2026-10-19T10:00:00</ns2:Timestamp><ns2:Trace><ns2:EventID>1</ns2:EventID><ns2:Instance>1</ns2:Instance><ns2:LogReference>1</ns2:LogReference><ns2:CompType>KON</ns2:CompType><ns2:Code>4004</ns2:Code><ns2:Severity>Error</ns2:Severity><ns2:ErrorType>Technical</ns2:ErrorType><ns2:ErrorText>Ungültige Mandanten-ID</ns2:ErrorText></ns2:Trace></ns2:Error></detail></soap:Fault></soap:Body></soap:Envelope>"#;

        let err = parse_get_cards(body).unwrap_err();
        match err {
            ConnectorError::Fault { operation, message } => {
                assert_eq!(operation, "GetCards");
                assert!(message.contains("Ungültige Mandanten-ID"));
                assert!(message.contains("4004"));
            }
            other => panic!("expected fault, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_read_vsd() {
        let body = format!(
            r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/"><soap:Body><ReadVSDResponse><PersoenlicheVersichertendaten>{}</PersoenlicheVersichertendaten><AllgemeineVersicherungsdaten>{}</AllgemeineVersicherungsdaten><GeschuetzteVersichertendaten>{}</GeschuetzteVersichertendaten><VSD_Status><Status>0</Status></VSD_Status></ReadVSDResponse></soap:Body></soap:Envelope>"#,
            general_purpose::STANDARD.encode(b"one"),
            general_purpose::STANDARD.encode(b"two"),
            general_purpose::STANDARD.encode(b"three"),
        );

        let raw = parse_read_vsd(&body).unwrap();
        assert_eq!(raw.personal, b"one");
        assert_eq!(raw.general, b"two");
        assert_eq!(raw.protected, b"three");
    }

    #[test]
    fn test_parse_read_vsd_bad_base64() {
        let body = r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/"><soap:Body><ReadVSDResponse><PersoenlicheVersichertendaten>!!!</PersoenlicheVersichertendaten></ReadVSDResponse></soap:Body></soap:Envelope>"#;
        assert!(matches!(
            parse_read_vsd(body),
            Err(ConnectorError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_parse_read_card_certificate() {
        let body = r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/"><soap:Body><ReadCardCertificateResponse><Status><Result>OK</Result></Status><X509DataInfoList><X509DataInfo><CertRef>C.QES</CertRef><X509Data><X509IssuerSerial><X509IssuerName>CN=CA</X509IssuerName><X509SerialNumber>1</X509SerialNumber></X509IssuerSerial><X509SubjectName>CN=Test</X509SubjectName><X509Certificate>
AQID
BA==</X509Certificate></X509Data></X509DataInfo></X509DataInfoList></ReadCardCertificateResponse></soap:Body></soap:Envelope>"#;

        let der = parse_read_card_certificate(body, CertRef::Qes).unwrap();
        assert_eq!(der, vec![1, 2, 3, 4]);

        let err = parse_read_card_certificate(body, CertRef::Aut).unwrap_err();
        assert!(matches!(err, ConnectorError::CertificateUnavailable(_)));
        assert!(err.to_string().contains("no C.AUT certificate"));
    }

    #[test]
    fn test_parse_read_card_certificate_bad_base64() {
        let body = r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/"><soap:Body><ReadCardCertificateResponse><Status><Result>OK</Result></Status><X509DataInfoList><X509DataInfo><CertRef>C.QES</CertRef><X509Data><X509Certificate>not*base64!</X509Certificate></X509Data></X509DataInfo></X509DataInfoList></ReadCardCertificateResponse></soap:Body></soap:Envelope>"#;

        let err = parse_read_card_certificate(body, CertRef::Qes).unwrap_err();
        assert!(matches!(err, ConnectorError::CertificateUnavailable(_)));
        assert!(err.to_string().contains("not valid base64"));
    }

    #[test]
    fn test_parse_non_envelope() {
        assert!(matches!(
            parse_get_cards("<html><body>502 Bad Gateway</body></html>"),
            Err(ConnectorError::InvalidResponse(_))
        ));
    }
}
