//! Seams between the pipeline and its HTTP collaborators.

use std::future::Future;

use chrono::NaiveDate;
use futsal_core::{CandidateVenue, Coordinate};
use futsal_scraper::{GeocodeError, KakaoGeocoder, ReservationClient, ScraperError};

/// Maps a free-text place name to a coordinate.
pub trait GeoResolver {
    fn resolve(&self, place: &str) -> impl Future<Output = Result<Coordinate, GeocodeError>> + Send;
}

/// Supplies in-radius venues (with their bundled slots) for a date.
pub trait SlotSource {
    fn fetch_candidates(
        &self,
        date: NaiveDate,
        center: Coordinate,
        radius_km: f64,
    ) -> impl Future<Output = Result<Vec<CandidateVenue>, ScraperError>> + Send;
}

impl GeoResolver for KakaoGeocoder {
    fn resolve(&self, place: &str) -> impl Future<Output = Result<Coordinate, GeocodeError>> + Send {
        KakaoGeocoder::resolve(self, place)
    }
}

impl SlotSource for ReservationClient {
    fn fetch_candidates(
        &self,
        date: NaiveDate,
        center: Coordinate,
        radius_km: f64,
    ) -> impl Future<Output = Result<Vec<CandidateVenue>, ScraperError>> + Send {
        ReservationClient::fetch_candidates(self, date, center, radius_km)
    }
}
