//! Domain types flowing through the search pipeline.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const DEFAULT_RADIUS_KM: f64 = 5.0;
pub const DEFAULT_TOLERANCE_MINUTES: u32 = 30;

/// A WGS84 point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// `true` when both components are finite and inside the valid degree ranges.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Decides whether two provider records describe the same physical court.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VenueKey {
    ById(String),
    ByNameAddress { name: String, address: String },
}

impl VenueKey {
    /// Prefers a non-blank provider ID, falling back to the name/address pair.
    #[must_use]
    pub fn from_parts(id: Option<&str>, name: &str, address: &str) -> Self {
        match id.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => VenueKey::ById(id.to_string()),
            None => VenueKey::ByNameAddress {
                name: name.to_string(),
                address: address.to_string(),
            },
        }
    }
}

/// Descriptive attributes of a venue as reported by the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct VenueInfo {
    pub key: VenueKey,
    pub name: String,
    pub address: String,
    pub coordinate: Coordinate,
    pub indoor: Option<bool>,
}

/// One bookable slot as bundled inside a provider venue record.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSlot {
    /// `YYYY-MM-DD`.
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub price: Decimal,
}

/// An in-radius venue returned by the reservation provider, with its slots.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateVenue {
    pub venue: VenueInfo,
    pub distance_km: f64,
    pub slots: Vec<RawSlot>,
}

impl CandidateVenue {
    /// Flattens the candidate into one record per bundled slot.
    pub fn slot_records(&self) -> impl Iterator<Item = RawSlotRecord> + '_ {
        self.slots.iter().map(|slot| RawSlotRecord {
            venue: self.venue.clone(),
            date: slot.date.clone(),
            start_time: slot.start_time.clone(),
            end_time: slot.end_time.clone(),
            price: slot.price,
        })
    }
}

/// A single reservation entry paired with the venue it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSlotRecord {
    pub venue: VenueInfo,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub price: Decimal,
}

/// Verdict of comparing a slot's start time against the requested time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    Exact,
    Nearby,
    None,
    /// No target time was requested.
    Any,
}

impl MatchKind {
    #[must_use]
    pub fn is_match(self) -> bool {
        !matches!(self, MatchKind::None)
    }
}

impl std::fmt::Display for MatchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchKind::Exact => write!(f, "exact"),
            MatchKind::Nearby => write!(f, "nearby"),
            MatchKind::None => write!(f, "none"),
            MatchKind::Any => write!(f, "any"),
        }
    }
}

/// A retained slot. Equality and hashing cover all four fields, which is
/// what per-venue deduplication relies on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TimeSlot {
    pub date: String,
    /// `"HH:MM - HH:MM"`.
    pub time: String,
    pub price: Decimal,
    pub match_type: MatchKind,
}

/// Aggregated availability for one venue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VenueAvailability {
    #[serde(skip)]
    pub key: VenueKey,
    pub name: String,
    pub address: String,
    #[serde(flatten)]
    pub coordinate: Coordinate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indoor: Option<bool>,
    pub available_times: Vec<TimeSlot>,
}

impl VenueAvailability {
    #[must_use]
    pub fn from_info(info: &VenueInfo) -> Self {
        Self {
            key: info.key.clone(),
            name: info.name.clone(),
            address: info.address.clone(),
            coordinate: info.coordinate,
            indoor: info.indoor,
            available_times: Vec::new(),
        }
    }
}

/// Input to a single search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub region: Option<String>,
    /// Overrides region geocoding when present.
    pub center: Option<Coordinate>,
    pub radius_km: f64,
    pub tolerance_minutes: u32,
}

impl SearchQuery {
    #[must_use]
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            time: None,
            region: None,
            center: None,
            radius_km: DEFAULT_RADIUS_KM,
            tolerance_minutes: DEFAULT_TOLERANCE_MINUTES,
        }
    }

    #[must_use]
    pub fn with_time(mut self, time: NaiveTime) -> Self {
        self.time = Some(time);
        self
    }

    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    #[must_use]
    pub fn with_center(mut self, center: Coordinate) -> Self {
        self.center = Some(center);
        self
    }

    #[must_use]
    pub fn with_radius_km(mut self, radius_km: f64) -> Self {
        self.radius_km = radius_km;
        self
    }

    #[must_use]
    pub fn with_tolerance_minutes(mut self, tolerance_minutes: u32) -> Self {
        self.tolerance_minutes = tolerance_minutes;
        self
    }

    /// The query date as the provider formats it (`YYYY-MM-DD`).
    #[must_use]
    pub fn date_key(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}
