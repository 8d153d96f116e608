//! Health card types
//!
//! Card types, handles and certificate roles as the Konnektor names them on
//! the wire.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Type of a health card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardType {
    /// Electronic health insurance card of the patient
    #[serde(rename = "EGK")]
    Egk,
    /// Institution card of the practice
    #[serde(rename = "SMC-B")]
    SmcB,
    /// Health professional card of the prescriber
    #[serde(rename = "HBA")]
    Hba,
}

impl CardType {
    /// Wire name used in Konnektor requests
    pub fn as_str(&self) -> &'static str {
        match self {
            CardType::Egk => "EGK",
            CardType::SmcB => "SMC-B",
            CardType::Hba => "HBA",
        }
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CardType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EGK" => Ok(CardType::Egk),
            "SMC-B" => Ok(CardType::SmcB),
            "HBA" => Ok(CardType::Hba),
            other => Err(format!("Unknown card type: {other}")),
        }
    }
}

/// Opaque handle of an inserted card
///
/// Valid only for the Konnektor session it was obtained in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardHandle(String);

impl CardHandle {
    /// Creates a new CardHandle
    ///
    /// # Returns
    ///
    /// Returns `Ok(CardHandle)` if the handle is non-empty, `Err` otherwise
    pub fn new(handle: impl Into<String>) -> Result<Self, String> {
        let handle = handle.into();
        if handle.trim().is_empty() {
            return Err("Card handle cannot be empty".to_string());
        }
        Ok(Self(handle))
    }

    /// Returns the handle as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for CardHandle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Certificate role on a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CertRef {
    /// Authentication certificate
    #[serde(rename = "C.AUT")]
    Aut,
    /// Encryption certificate
    #[serde(rename = "C.ENC")]
    Enc,
    /// Signature certificate
    #[serde(rename = "C.SIG")]
    Sig,
    /// Qualified electronic signature certificate
    #[serde(rename = "C.QES")]
    Qes,
}

impl CertRef {
    /// Wire name used in `CertRefList`
    pub fn as_str(&self) -> &'static str {
        match self {
            CertRef::Aut => "C.AUT",
            CertRef::Enc => "C.ENC",
            CertRef::Sig => "C.SIG",
            CertRef::Qes => "C.QES",
        }
    }
}

impl fmt::Display for CertRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Card as reported by the event service inventory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardInfo {
    pub handle: CardHandle,
    pub card_type: CardType,
    pub iccsn: Option<String>,
    pub card_holder_name: Option<String>,
}

impl CardInfo {
    /// Creates a card entry with only handle and type known
    pub fn new(handle: CardHandle, card_type: CardType) -> Self {
        Self {
            handle,
            card_type,
            iccsn: None,
            card_holder_name: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(CardType::Egk, "EGK")]
    #[test_case(CardType::SmcB, "SMC-B")]
    #[test_case(CardType::Hba, "HBA")]
    fn test_card_type_wire_names(card_type: CardType, wire: &str) {
        assert_eq!(card_type.as_str(), wire);
        assert_eq!(CardType::from_str(wire).unwrap(), card_type);
        assert_eq!(
            serde_json::to_string(&card_type).unwrap(),
            format!("\"{wire}\"")
        );
    }

    #[test]
    fn test_card_type_unknown() {
        assert!(CardType::from_str("KVK").is_err());
    }

    #[test]
    fn test_card_handle_empty() {
        assert!(CardHandle::new("  ").is_err());
        assert_eq!(CardHandle::new("EGK-1").unwrap().as_str(), "EGK-1");
    }

    #[test]
    fn test_cert_ref_wire_names() {
        assert_eq!(CertRef::Aut.to_string(), "C.AUT");
        assert_eq!(CertRef::Qes.to_string(), "C.QES");
    }
}
