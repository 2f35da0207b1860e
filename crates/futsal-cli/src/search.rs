//! Command handlers for `search` and `geocode`.

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveTime};
use clap::Args;
use futsal_core::{parse_time_of_day, AppConfig, Coordinate, SearchQuery};
use futsal_scraper::{KakaoGeocoder, ReservationClient};
use futsal_search::{SearchPipeline, SearchStatus};

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Day to search (YYYY-MM-DD)
    #[arg(long)]
    pub date: NaiveDate,
    /// Place name to search around (geocoded)
    #[arg(long)]
    pub region: Option<String>,
    /// Target start time (HH:MM); omit to list every slot
    #[arg(long, value_parser = parse_time_arg)]
    pub time: Option<NaiveTime>,
    /// Search center latitude; overrides --region
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,
    /// Search center longitude; overrides --region
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,
    /// Search radius in km (defaults to FUTSAL_DEFAULT_RADIUS_KM)
    #[arg(long, allow_negative_numbers = true)]
    pub radius: Option<f64>,
    /// Minutes either side of --time counted as nearby
    #[arg(long)]
    pub tolerance: Option<u32>,
    /// Write the JSON result to this file instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,
}

fn parse_time_arg(raw: &str) -> Result<NaiveTime, String> {
    parse_time_of_day(raw).map_err(|e| e.to_string())
}

impl SearchArgs {
    pub(crate) fn to_query(&self, config: &AppConfig) -> anyhow::Result<SearchQuery> {
        let mut query = SearchQuery::new(self.date)
            .with_radius_km(self.radius.unwrap_or(config.default_radius_km))
            .with_tolerance_minutes(self.tolerance.unwrap_or(config.default_tolerance_minutes));

        if query.radius_km < 0.0 || !query.radius_km.is_finite() {
            anyhow::bail!("--radius must be a non-negative number");
        }
        if let Some(time) = self.time {
            query = query.with_time(time);
        }
        if let Some(region) = self.region.as_deref() {
            query = query.with_region(region);
        }
        if let (Some(lat), Some(lon)) = (self.lat, self.lon) {
            let center = Coordinate::new(lat, lon);
            if !center.is_valid() {
                anyhow::bail!("({lat}, {lon}) is not a valid coordinate");
            }
            query = query.with_center(center);
        }
        Ok(query)
    }
}

/// Runs one search and prints (or writes) the venues as pretty JSON.
///
/// A failed search still prints an empty list; the failing step is reported
/// on stderr.
///
/// # Errors
///
/// Returns an error if the arguments are invalid, a client cannot be built,
/// or the output file cannot be written.
pub(crate) async fn run_search(config: &AppConfig, args: &SearchArgs) -> anyhow::Result<()> {
    let query = args.to_query(config)?;
    let pipeline = SearchPipeline::new(
        KakaoGeocoder::from_app_config(config)?,
        ReservationClient::from_app_config(config)?,
    );

    let outcome = pipeline.search_with_status(&query).await;
    if outcome.status != SearchStatus::Ok {
        tracing::warn!(status = %outcome.status, "search ended early");
    }

    let json = serde_json::to_string_pretty(&outcome.venues)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, json)?;
            tracing::info!(
                path = %path.display(),
                venues = outcome.venues.len(),
                "wrote search results"
            );
        }
        None => println!("{json}"),
    }

    Ok(())
}

/// Resolves `place` and prints `latitude, longitude`.
///
/// # Errors
///
/// Returns an error if the geocoder cannot be built or the lookup fails.
pub(crate) async fn run_geocode(config: &AppConfig, place: &str) -> anyhow::Result<()> {
    let geocoder = KakaoGeocoder::from_app_config(config)?;
    let coordinate = geocoder.resolve(place).await?;
    println!("{}, {}", coordinate.latitude, coordinate.longitude);
    Ok(())
}
