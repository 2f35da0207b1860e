//! HTTP client for IamGround's futsal reservation listing.

mod fetch_all;

use std::time::Duration;

use chrono::NaiveDate;
use futsal_core::{AppConfig, Coordinate};
use reqwest::{Client, Url};

use crate::error::ScraperError;
use crate::pagination::page_offset;
use crate::types::{RawVenue, VenueListResponse};

const DEFAULT_BASE_URL: &str = "https://www.iamground.kr/";
const LISTING_PATH: &str = "futsal/s/_f.php";

/// Maximum number of pages to fetch before returning an error.
/// Guards against a provider that never returns an empty or out-of-radius page.
pub(super) const MAX_PAGES: usize = 200;

/// Client for the IamGround reservation listing.
///
/// Each page is a single form-encoded POST with no retry. Non-2xx responses
/// and bodies that are not the expected JSON surface as typed errors.
pub struct ReservationClient {
    client: Client,
    listing_url: Url,
    page_size: u32,
}

impl ReservationClient {
    /// Creates a client pointed at the production IamGround host.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str, page_size: u32) -> Result<Self, ScraperError> {
        Self::with_base_url(timeout_secs, user_agent, page_size, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the `reqwest::Client` cannot be
    /// constructed, or [`ScraperError::InvalidBaseUrl`] if `base_url` is not a
    /// valid URL.
    pub fn with_base_url(
        timeout_secs: u64,
        user_agent: &str,
        page_size: u32,
        base_url: &str,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Normalise to exactly one trailing slash so `join` appends the
        // listing path instead of replacing the last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let listing_url = Url::parse(&normalised)
            .and_then(|base| base.join(LISTING_PATH))
            .map_err(|e| ScraperError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            listing_url,
            page_size: page_size.max(1),
        })
    }

    /// Builds a client from the process configuration.
    ///
    /// # Errors
    ///
    /// Same as [`Self::with_base_url`].
    pub fn from_app_config(config: &AppConfig) -> Result<Self, ScraperError> {
        Self::with_base_url(
            config.request_timeout_secs,
            &config.user_agent,
            config.upstream_page_size,
            &config.upstream_base_url,
        )
    }

    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    #[must_use]
    pub fn listing_url(&self) -> &Url {
        &self.listing_url
    }

    /// Fetches one zero-based page of venues for `date` around `center`.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::Http`]: network failure or timeout.
    /// - [`ScraperError::UnexpectedStatus`]: any non-2xx status.
    /// - [`ScraperError::Deserialize`]: body is not the expected JSON.
    pub async fn fetch_page(
        &self,
        date: NaiveDate,
        center: Coordinate,
        page: usize,
    ) -> Result<Vec<RawVenue>, ScraperError> {
        let form = Self::page_form(date, center, page, self.page_size);
        let url = self.listing_url.to_string();

        let response = self
            .client
            .post(self.listing_url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        let parsed = serde_json::from_str::<VenueListResponse>(&body).map_err(|e| {
            ScraperError::Deserialize {
                context: format!("venue listing page {page} for {date}"),
                source: e,
            }
        })?;

        Ok(parsed.list)
    }

    /// Form fields for one listing page. The provider filters to the
    /// `[date 00:00, date+1 00:00)` window itself.
    fn page_form(
        date: NaiveDate,
        center: Coordinate,
        page: usize,
        page_size: u32,
    ) -> Vec<(&'static str, String)> {
        let next_day = date.succ_opt().unwrap_or(date);
        vec![
            ("from", "full_info".to_string()),
            ("stadium_type", "futsal".to_string()),
            ("search_date", date.format("%Y-%m-%d").to_string()),
            ("start_date", format!("{} 00:00:00", date.format("%Y-%m-%d"))),
            ("end_date", format!("{} 00:00:00", next_day.format("%Y-%m-%d"))),
            ("lat", center.latitude.to_string()),
            ("lng", center.longitude.to_string()),
            ("limit", page_size.to_string()),
            // Kept last so request matchers can anchor on the offset.
            ("offset", page_offset(page, page_size).to_string()),
        ]
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
