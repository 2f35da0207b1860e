use futsal_scraper::{GeocodeError, ScraperError};
use thiserror::Error;

use crate::pipeline::SearchStatus;

/// Pipeline-level failures. None of these reach a caller of
/// [`crate::SearchPipeline::search`]; they are logged and turned into an
/// empty result.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("no search location: neither coordinates nor a region were given")]
    NoLocation,

    #[error("geocoding failed: {0}")]
    Geocode(#[from] GeocodeError),

    #[error("reservation listing failed: {0}")]
    Upstream(#[from] ScraperError),
}

impl SearchError {
    #[must_use]
    pub fn status(&self) -> SearchStatus {
        match self {
            SearchError::NoLocation => SearchStatus::NoLocation,
            SearchError::Geocode(_) => SearchStatus::GeocodeFailed,
            SearchError::Upstream(_) => SearchStatus::UpstreamFailed,
        }
    }
}
