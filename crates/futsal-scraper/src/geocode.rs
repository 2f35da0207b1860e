//! Place-name geocoding through Kakao Local keyword search.

use std::time::Duration;

use futsal_core::{AppConfig, Coordinate};
use reqwest::{Client, Url};

use crate::error::GeocodeError;
use crate::types::KakaoKeywordResponse;

const DEFAULT_BASE_URL: &str = "https://dapi.kakao.com/";
const KEYWORD_PATH: &str = "v2/local/search/keyword.json";

/// Resolves free-text place names (`"잠실"`, `"Gangnam Station"`) to a
/// coordinate using the first Kakao keyword-search hit.
///
/// The REST key is optional at construction so the rest of the service can
/// run without it; every lookup then fails with
/// [`GeocodeError::MissingApiKey`].
pub struct KakaoGeocoder {
    client: Client,
    api_key: Option<String>,
    keyword_url: Url,
}

impl KakaoGeocoder {
    /// Creates a geocoder pointed at the production Kakao API.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(api_key: Option<&str>, timeout_secs: u64) -> Result<Self, GeocodeError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a geocoder with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`GeocodeError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        api_key: Option<&str>,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let keyword_url = Url::parse(&normalised)
            .and_then(|base| base.join(KEYWORD_PATH))
            .map_err(|e| GeocodeError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            api_key: api_key
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_owned),
            keyword_url,
        })
    }

    /// Builds a geocoder from the process configuration.
    ///
    /// # Errors
    ///
    /// Same as [`Self::with_base_url`].
    pub fn from_app_config(config: &AppConfig) -> Result<Self, GeocodeError> {
        Self::with_base_url(
            config.kakao_api_key.as_deref(),
            config.request_timeout_secs,
            &config.geocoder_base_url,
        )
    }

    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Resolves `place` to the coordinate of the first keyword-search hit.
    ///
    /// # Errors
    ///
    /// - [`GeocodeError::MissingApiKey`]: no key configured (no request made).
    /// - [`GeocodeError::NoCandidates`]: blank `place` (no request made) or
    ///   an empty `documents` list.
    /// - [`GeocodeError::Http`]: network failure or timeout.
    /// - [`GeocodeError::UnexpectedStatus`]: any non-2xx status.
    /// - [`GeocodeError::Deserialize`]: body is not the expected JSON.
    /// - [`GeocodeError::InvalidCoordinate`]: first hit lacks usable `x`/`y`.
    pub async fn resolve(&self, place: &str) -> Result<Coordinate, GeocodeError> {
        let api_key = self.api_key.as_deref().ok_or(GeocodeError::MissingApiKey)?;
        let place = place.trim();
        if place.is_empty() {
            return Err(GeocodeError::NoCandidates {
                query: place.to_owned(),
            });
        }

        let response = self
            .client
            .get(self.keyword_url.clone())
            .query(&[("query", place)])
            .header(reqwest::header::AUTHORIZATION, format!("KakaoAK {api_key}"))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.keyword_url.to_string(),
            });
        }

        let body = response.text().await?;
        let parsed = serde_json::from_str::<KakaoKeywordResponse>(&body).map_err(|e| {
            GeocodeError::Deserialize {
                context: format!("keyword search for \"{place}\""),
                source: e,
            }
        })?;

        let first = parsed
            .documents
            .into_iter()
            .next()
            .ok_or_else(|| GeocodeError::NoCandidates {
                query: place.to_owned(),
            })?;

        let (Some(longitude), Some(latitude)) = (first.x, first.y) else {
            return Err(GeocodeError::InvalidCoordinate {
                query: place.to_owned(),
                reason: "first document has no x/y".into(),
            });
        };

        let coordinate = Coordinate::new(latitude, longitude);
        if !coordinate.is_valid() {
            return Err(GeocodeError::InvalidCoordinate {
                query: place.to_owned(),
                reason: format!("({latitude}, {longitude}) is out of range"),
            });
        }

        tracing::debug!(
            place,
            matched = first.place_name.as_deref().unwrap_or(""),
            latitude,
            longitude,
            "geocoded place"
        );
        Ok(coordinate)
    }
}
