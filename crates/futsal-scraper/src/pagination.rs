//! Offset pagination and the page-level stop rule for the reservation listing.
//!
//! IamGround pages by `limit`/`offset` and does not say how many pages exist.
//! Results come back roughly ordered by distance from the `lat`/`lng` sent
//! with the request, so once a whole page falls outside the search radius the
//! remaining pages are assumed to be farther still.
//!
//! That ordering is observed behaviour, not a documented guarantee. If the
//! provider ever reorders its listing, in-radius venues on later pages would
//! be silently missed.

/// What one page contributed, as far as the stop rule is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageScan {
    /// Venue records returned by the provider on this page.
    pub returned: usize,
    /// How many of them were within the search radius.
    pub in_radius: usize,
}

impl PageScan {
    /// Whether another page should be requested.
    ///
    /// An empty page means the listing is exhausted; a page with no venue
    /// inside the radius means the listing has moved past the search area.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.returned > 0 && self.in_radius > 0
    }
}

/// Offset of the first record on the zero-based `page`.
#[must_use]
pub fn page_offset(page: usize, page_size: u32) -> u64 {
    u64::try_from(page)
        .unwrap_or(u64::MAX)
        .saturating_mul(u64::from(page_size))
}
