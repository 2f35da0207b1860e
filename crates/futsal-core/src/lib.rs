//! Domain types, distance math, time classification, and configuration
//! shared by every crate in the futsal court finder workspace.

pub mod app_config;
pub mod config;
pub mod geo;
pub mod time_match;
pub mod types;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use geo::{haversine_km, within_radius, EARTH_RADIUS_KM};
pub use time_match::{classify, format_hhmm, parse_time_of_day, time_range_label, TimeParseError};
pub use types::{
    CandidateVenue, Coordinate, MatchKind, RawSlot, RawSlotRecord, SearchQuery, TimeSlot,
    VenueAvailability, VenueInfo, VenueKey, DEFAULT_RADIUS_KM, DEFAULT_TOLERANCE_MINUTES,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
