//! Normalization from IamGround wire records to [`futsal_core`] venue types.

use chrono::NaiveDate;
use futsal_core::{Coordinate, RawSlot, VenueInfo, VenueKey};
use rust_decimal::Decimal;

use crate::error::ScraperError;
use crate::types::{RawReservation, RawVenue};

/// A provider venue converted into domain types, before any distance check.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedVenue {
    pub venue: VenueInfo,
    pub slots: Vec<RawSlot>,
}

/// Converts a raw venue into a [`NormalizedVenue`].
///
/// `search_date` (`YYYY-MM-DD`) is used as the slot date when the provider
/// gives neither a `date` field nor a dated start timestamp. Slots without a
/// start time are dropped. A missing price becomes zero.
///
/// # Errors
///
/// Returns [`ScraperError::Normalization`] when the venue has no name or no
/// usable coordinates; such a venue cannot be placed or displayed.
pub fn normalize_venue(raw: RawVenue, search_date: &str) -> Result<NormalizedVenue, ScraperError> {
    let name = raw
        .name
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ScraperError::Normalization {
            venue: raw.id.clone().unwrap_or_else(|| "<unnamed>".to_string()),
            reason: "venue has no name".into(),
        })?
        .to_string();

    let coordinate = match (raw.latitude, raw.longitude) {
        (Some(lat), Some(lng)) => Coordinate::new(lat, lng),
        _ => {
            return Err(ScraperError::Normalization {
                venue: name,
                reason: "venue has no coordinates".into(),
            })
        }
    };
    if !coordinate.is_valid() {
        return Err(ScraperError::Normalization {
            venue: name,
            reason: format!(
                "coordinates out of range ({}, {})",
                coordinate.latitude, coordinate.longitude
            ),
        });
    }

    let address = raw.address.as_deref().map(str::trim).unwrap_or_default().to_string();
    let key = VenueKey::from_parts(raw.id.as_deref(), &name, &address);

    let slots = raw
        .reserv
        .into_iter()
        .filter_map(|reservation| normalize_slot(reservation, search_date))
        .collect();

    Ok(NormalizedVenue {
        venue: VenueInfo {
            key,
            name,
            address,
            coordinate,
            indoor: parse_indoor(raw.in_out.as_deref()),
        },
        slots,
    })
}

fn normalize_slot(reservation: RawReservation, search_date: &str) -> Option<RawSlot> {
    let start_time = reservation
        .start_time
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())?;

    let date = reservation
        .date
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
        .or_else(|| date_prefix(&start_time))
        .unwrap_or_else(|| search_date.to_string());

    Some(RawSlot {
        date,
        start_time,
        end_time: reservation
            .end_time
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
        price: reservation.unit_price.unwrap_or(Decimal::ZERO),
    })
}

/// Returns the `YYYY-MM-DD` prefix of a timestamp such as `2025-07-21 20:00:00`.
fn date_prefix(timestamp: &str) -> Option<String> {
    let prefix = timestamp.get(..10)?;
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d")
        .ok()
        .map(|d| d.format("%Y-%m-%d").to_string())
}

fn parse_indoor(raw: Option<&str>) -> Option<bool> {
    match raw?.trim().to_lowercase().as_str() {
        "in" | "indoor" | "실내" | "y" => Some(true),
        "out" | "outdoor" | "실외" | "n" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
