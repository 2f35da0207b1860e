//! Wire types for the IamGround listing and the Kakao Local keyword search.
//!
//! ## IamGround `POST /futsal/s/_f.php` (`from=full_info`)
//!
//! The body is `{"list": [...]}`. Each entry is a venue with its reservable
//! slots bundled under `reserv`. The provider is loose with scalar types:
//!
//! - `fIdx` arrives as a number on some pages and a string on others.
//! - `fLat` / `fLng` are usually numeric strings (`"37.5133"`).
//! - `unit_price` shows up as `80000`, `"80000"`, or `"80,000"`.
//! - `start_time` / `end_time` are `HH:MM:SS`; older records carry a full
//!   `YYYY-MM-DD HH:MM:SS` timestamp instead of a separate `date`.
//!
//! A missing `list` key is treated as a malformed payload. Anything inside a
//! venue that has an unexpected type degrades to `None` rather than failing
//! the page.
//!
//! ## Kakao `GET /v2/local/search/keyword.json`
//!
//! `{"documents": [{"place_name": "...", "x": "127.10", "y": "37.51"}], "meta": {...}}`
//! where `x` is longitude and `y` latitude, both as strings.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

/// Top-level response from the IamGround listing endpoint.
#[derive(Debug, Deserialize)]
pub struct VenueListResponse {
    pub list: Vec<RawVenue>,
}

/// A venue record as returned by IamGround.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawVenue {
    #[serde(rename = "fIdx", default, deserialize_with = "loose_string")]
    pub id: Option<String>,

    #[serde(rename = "fName", default, deserialize_with = "loose_string")]
    pub name: Option<String>,

    #[serde(rename = "fAddress", default, deserialize_with = "loose_string")]
    pub address: Option<String>,

    #[serde(rename = "fLat", default, deserialize_with = "loose_f64")]
    pub latitude: Option<f64>,

    #[serde(rename = "fLng", default, deserialize_with = "loose_f64")]
    pub longitude: Option<f64>,

    /// `"in"` / `"out"` (sometimes Korean `실내` / `실외`).
    #[serde(rename = "fInOut", default, deserialize_with = "loose_string")]
    pub in_out: Option<String>,

    #[serde(default)]
    pub reserv: Vec<RawReservation>,
}

/// One reservable slot inside a venue record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawReservation {
    #[serde(default, deserialize_with = "loose_string")]
    pub date: Option<String>,

    #[serde(default, deserialize_with = "loose_string")]
    pub start_time: Option<String>,

    #[serde(default, deserialize_with = "loose_string")]
    pub end_time: Option<String>,

    #[serde(default, deserialize_with = "loose_decimal")]
    pub unit_price: Option<Decimal>,
}

/// Top-level response from Kakao keyword search.
#[derive(Debug, Deserialize)]
pub struct KakaoKeywordResponse {
    pub documents: Vec<KakaoDocument>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KakaoDocument {
    #[serde(default)]
    pub place_name: Option<String>,

    #[serde(default, deserialize_with = "loose_f64")]
    pub x: Option<f64>,

    #[serde(default, deserialize_with = "loose_f64")]
    pub y: Option<f64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Text(String),
    Number(serde_json::Number),
    Other(IgnoredAny),
}

fn loose_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Loose>::deserialize(deserializer)? {
        Some(Loose::Text(s)) => Some(s),
        Some(Loose::Number(n)) => Some(n.to_string()),
        Some(Loose::Other(_)) | None => None,
    })
}

fn loose_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Loose>::deserialize(deserializer)? {
        Some(Loose::Text(s)) => s.trim().parse::<f64>().ok(),
        Some(Loose::Number(n)) => n.as_f64(),
        Some(Loose::Other(_)) | None => None,
    })
}

fn loose_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Loose>::deserialize(deserializer)? {
        Some(Loose::Text(s)) => parse_price(&s),
        Some(Loose::Number(n)) => Decimal::from_str(&n.to_string())
            .ok()
            .or_else(|| n.as_f64().and_then(|f| Decimal::try_from(f).ok())),
        Some(Loose::Other(_)) | None => None,
    })
}

/// Parses a price string, tolerating thousands separators and a trailing `원`.
fn parse_price(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .trim()
        .trim_end_matches('원')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    Decimal::from_str(cleaned.trim()).ok()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn venue_accepts_numeric_and_string_scalars() {
        let venue: RawVenue = serde_json::from_value(json!({
            "fIdx": 1024,
            "fName": "Jamsil Futsal Park",
            "fAddress": "Seoul Songpa-gu",
            "fLat": "37.5133",
            "fLng": 127.1001,
            "fInOut": "in",
            "reserv": [
                {"date": "2025-07-21", "start_time": "20:00:00", "end_time": "22:00:00", "unit_price": "80,000"},
                {"start_time": "2025-07-21 22:00:00", "end_time": "24:00:00", "unit_price": 60000}
            ]
        }))
        .expect("venue should deserialize");

        assert_eq!(venue.id.as_deref(), Some("1024"));
        assert_eq!(venue.latitude, Some(37.5133));
        assert_eq!(venue.longitude, Some(127.1001));
        assert_eq!(venue.reserv.len(), 2);
        assert_eq!(venue.reserv[0].unit_price, Some(Decimal::new(80_000, 0)));
        assert_eq!(venue.reserv[1].unit_price, Some(Decimal::new(60_000, 0)));
        assert!(venue.reserv[1].date.is_none());
    }

    #[test]
    fn unexpected_scalar_types_degrade_to_none() {
        let venue: RawVenue = serde_json::from_value(json!({
            "fName": "Court",
            "fLat": true,
            "fLng": null,
            "reserv": [{"start_time": "20:00", "unit_price": {"amount": 1}}]
        }))
        .expect("venue should deserialize");
        assert!(venue.latitude.is_none());
        assert!(venue.longitude.is_none());
        assert!(venue.id.is_none());
        assert!(venue.reserv[0].unit_price.is_none());
    }

    #[test]
    fn nested_values_in_scalar_fields_are_discarded() {
        let venue: RawVenue = serde_json::from_value(json!({
            "fIdx": [1, 2],
            "fName": {"ko": "잠실 풋살장"},
            "fLat": ["37.5"],
            "fLng": {"value": 127.1},
            "reserv": []
        }))
        .expect("venue should deserialize");
        assert!(venue.id.is_none());
        assert!(venue.name.is_none());
        assert!(venue.latitude.is_none());
        assert!(venue.longitude.is_none());
    }

    #[test]
    fn list_key_is_required() {
        let result = serde_json::from_value::<VenueListResponse>(json!({"items": []}));
        assert!(result.is_err());
    }

    #[test]
    fn kakao_document_parses_string_coordinates() {
        let response: KakaoKeywordResponse = serde_json::from_value(json!({
            "documents": [{"place_name": "잠실역", "x": "127.100196", "y": "37.513294"}],
            "meta": {"total_count": 1}
        }))
        .unwrap();
        assert_eq!(response.documents[0].x, Some(127.100_196));
        assert_eq!(response.documents[0].y, Some(37.513_294));
    }

    #[test]
    fn price_parser_strips_separators_and_currency() {
        assert_eq!(parse_price("55,000원"), Some(Decimal::new(55_000, 0)));
        assert_eq!(parse_price("free"), None);
    }
}
