//! Search orchestration.
//!
//! A search runs five steps in order and short-circuits on the first failure:
//!
//! 1. Resolve the center: the query's coordinate override, else the geocoded
//!    region. Neither present means there is nothing to search around.
//! 2. Fetch in-radius candidates for the date from the [`SlotSource`].
//! 3. Keep only slots whose date equals the query date. Provider venue
//!    records can bundle slots from neighbouring days.
//! 4. Classify each kept slot against the target time.
//! 5. Group into one [`VenueAvailability`] per venue, in insertion order.
//!
//! Any failure becomes an empty result. [`SearchPipeline::search_with_status`]
//! additionally reports which step failed.

use futsal_core::{classify, CandidateVenue, Coordinate, SearchQuery, VenueAvailability};
use serde::Serialize;

use crate::aggregate::Aggregator;
use crate::error::SearchError;
use crate::source::{GeoResolver, SlotSource};

/// How a search ended. Only `Ok` carries meaningful venues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    Ok,
    NoLocation,
    GeocodeFailed,
    UpstreamFailed,
}

impl std::fmt::Display for SearchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchStatus::Ok => write!(f, "ok"),
            SearchStatus::NoLocation => write!(f, "no_location"),
            SearchStatus::GeocodeFailed => write!(f, "geocode_failed"),
            SearchStatus::UpstreamFailed => write!(f, "upstream_failed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub venues: Vec<VenueAvailability>,
    pub status: SearchStatus,
}

impl SearchOutcome {
    fn empty(status: SearchStatus) -> Self {
        Self {
            venues: Vec::new(),
            status,
        }
    }
}

/// Availability search over a geocoder and a reservation listing.
///
/// Holds no mutable state, so one instance can serve concurrent requests
/// behind an `Arc`.
pub struct SearchPipeline<G, S> {
    geocoder: G,
    source: S,
}

impl<G, S> SearchPipeline<G, S>
where
    G: GeoResolver + Sync,
    S: SlotSource + Sync,
{
    pub fn new(geocoder: G, source: S) -> Self {
        Self { geocoder, source }
    }

    /// Runs a search. Failures yield an empty list and are logged.
    pub async fn search(&self, query: &SearchQuery) -> Vec<VenueAvailability> {
        self.search_with_status(query).await.venues
    }

    /// Runs a search and reports whether it completed or which step failed.
    pub async fn search_with_status(&self, query: &SearchQuery) -> SearchOutcome {
        match self.try_search(query).await {
            Ok(venues) => SearchOutcome {
                venues,
                status: SearchStatus::Ok,
            },
            Err(e) => {
                let status = e.status();
                tracing::warn!(
                    date = %query.date,
                    region = query.region.as_deref().unwrap_or(""),
                    status = %status,
                    error = %e,
                    "search failed; returning empty result"
                );
                SearchOutcome::empty(status)
            }
        }
    }

    /// Runs a search, returning the first failing step's error.
    ///
    /// # Errors
    ///
    /// - [`SearchError::NoLocation`] when the query has neither a center nor
    ///   a non-blank region.
    /// - [`SearchError::Geocode`] when the region cannot be resolved.
    /// - [`SearchError::Upstream`] when the reservation listing fails.
    pub async fn try_search(
        &self,
        query: &SearchQuery,
    ) -> Result<Vec<VenueAvailability>, SearchError> {
        let center = self.resolve_center(query).await?;
        let candidates = self
            .source
            .fetch_candidates(query.date, center, query.radius_km)
            .await?;

        let venues = assemble(query, &candidates);
        tracing::info!(
            date = %query.date,
            candidates = candidates.len(),
            venues = venues.len(),
            "search complete"
        );
        Ok(venues)
    }

    async fn resolve_center(&self, query: &SearchQuery) -> Result<Coordinate, SearchError> {
        if let Some(center) = query.center {
            return Ok(center);
        }

        let region = query
            .region
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .ok_or(SearchError::NoLocation)?;

        let center = self.geocoder.resolve(region).await?;
        tracing::debug!(
            region,
            latitude = center.latitude,
            longitude = center.longitude,
            "resolved search center"
        );
        Ok(center)
    }
}

/// Filters, classifies and groups fetched candidates for `query`.
///
/// Without a target time every candidate appears, even one with no slot on
/// the query date. With a target time only venues holding at least one
/// exact or nearby slot appear.
#[must_use]
pub fn assemble(query: &SearchQuery, candidates: &[CandidateVenue]) -> Vec<VenueAvailability> {
    let date_key = query.date_key();
    let mut aggregator = Aggregator::new();

    for candidate in candidates {
        if query.time.is_none() {
            aggregator.observe_venue(&candidate.venue);
        }

        for record in candidate.slot_records() {
            if record.date != date_key {
                continue;
            }
            let verdict = classify(query.time, &record.start_time, query.tolerance_minutes);
            aggregator.push(&record, verdict);
        }
    }

    aggregator.finish()
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
