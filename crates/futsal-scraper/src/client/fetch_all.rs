//! Multi-page candidate fetch for `ReservationClient`.

use chrono::NaiveDate;
use futsal_core::{haversine_km, within_radius, CandidateVenue, Coordinate};

use crate::error::ScraperError;
use crate::normalize::normalize_venue;
use crate::pagination::PageScan;

use super::ReservationClient;
use super::MAX_PAGES;

impl ReservationClient {
    /// Fetches every venue within `radius_km` of `center` that has listings
    /// on `date`, walking pages until [`PageScan::has_next`] says to stop.
    ///
    /// Venues that cannot be normalized (no name, no coordinates) count as
    /// returned-but-out-of-radius for the stop rule and are otherwise skipped.
    ///
    /// **All-or-nothing semantics**: if any page fails, candidates gathered
    /// from earlier pages are discarded and the error is returned. A partial
    /// list would present an availability picture that looks complete but
    /// is not.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::fetch_page`].
    /// Returns [`ScraperError::PaginationLimit`] if more than [`MAX_PAGES`]
    /// pages would be needed.
    pub async fn fetch_candidates(
        &self,
        date: NaiveDate,
        center: Coordinate,
        radius_km: f64,
    ) -> Result<Vec<CandidateVenue>, ScraperError> {
        let date_key = date.format("%Y-%m-%d").to_string();
        let mut candidates: Vec<CandidateVenue> = Vec::new();
        let mut page = 0usize;

        loop {
            if page >= MAX_PAGES {
                return Err(ScraperError::PaginationLimit {
                    max_pages: MAX_PAGES,
                });
            }

            let venues = self.fetch_page(date, center, page).await?;
            let returned = venues.len();
            let mut in_radius = 0usize;

            for raw in venues {
                let normalized = match normalize_venue(raw, &date_key) {
                    Ok(n) => n,
                    Err(e) => {
                        tracing::debug!(page, error = %e, "skipping unusable venue record");
                        continue;
                    }
                };

                let coordinate = normalized.venue.coordinate;
                if within_radius(center, coordinate, radius_km) {
                    in_radius += 1;
                    candidates.push(CandidateVenue {
                        venue: normalized.venue,
                        distance_km: haversine_km(center, coordinate),
                        slots: normalized.slots,
                    });
                }
            }

            let scan = PageScan {
                returned,
                in_radius,
            };
            tracing::debug!(page, returned, in_radius, "scanned reservation page");

            if !scan.has_next() {
                break;
            }
            page += 1;
        }

        tracing::info!(
            date = %date_key,
            pages = page + 1,
            candidates = candidates.len(),
            "reservation listing fetched"
        );
        Ok(candidates)
    }
}
