//! Record synthesizer
//!
//! Pure functions turning decoded card data into KBV profiled FHIR records.
//! Each call mints a fresh resource id.

pub mod constants;
pub mod coverage;
pub mod medication;
pub mod medication_request;
pub mod organization;
pub mod patient;
pub mod practitioner;

pub use coverage::coverage_from_vsd;
pub use medication::placeholder_medication;
pub use medication_request::medication_request;
pub use organization::organization_from_certificate;
pub use patient::patient_from_vsd;
pub use practitioner::practitioner_from_certificate;

use chrono::NaiveDate;

/// Converts a VSD date (`YYYYMMDD`) to a FHIR date
///
/// VSD marks an unknown month or day with `00`; the FHIR date is truncated
/// to the known precision. Returns `None` for anything else unparseable.
pub(crate) fn fhir_date(vsd_date: &str) -> Option<String> {
    let value = vsd_date.trim();
    if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
        tracing::warn!(date = %value, "Malformed VSD date, omitting");
        return None;
    }

    let (year, month, day) = (&value[..4], &value[4..6], &value[6..8]);
    match (month, day) {
        ("00", _) => Some(year.to_string()),
        (_, "00") => Some(format!("{year}-{month}")),
        _ => match NaiveDate::parse_from_str(value, "%Y%m%d") {
            Ok(date) => Some(date.format("%Y-%m-%d").to_string()),
            Err(e) => {
                tracing::warn!(date = %value, error = %e, "Invalid VSD date, omitting");
                None
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("19640409", Some("1964-04-09"); "full date")]
    #[test_case("19640400", Some("1964-04"); "unknown day")]
    #[test_case("19640000", Some("1964"); "unknown month")]
    #[test_case("19640231", None; "impossible date")]
    #[test_case("1964-04-09", None; "wrong format")]
    #[test_case("", None; "empty")]
    fn test_fhir_date(input: &str, expected: Option<&str>) {
        assert_eq!(fhir_date(input).as_deref(), expected);
    }
}
