use axum::{
    extract::{Form, Query, State},
    Extension, Json,
};
use chrono::NaiveDate;
use futsal_core::{parse_time_of_day, Coordinate, SearchQuery, VenueAvailability};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta, SearchDefaults};

/// Raw search fields as sent by the client, either as a query string or as
/// a urlencoded form. Everything arrives as text so that empty values can be
/// treated as absent and parse failures reported as `validation_error`.
#[derive(Debug, Default, Deserialize)]
pub(super) struct SearchParams {
    pub search_date: Option<String>,
    pub region: Option<String>,
    pub time: Option<String>,
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub distance_limit: Option<String>,
    pub time_range_minutes: Option<String>,
}

pub(super) async fn search_query(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<SearchParams>,
) -> Result<Json<ApiResponse<Vec<VenueAvailability>>>, ApiError> {
    run_search(&state, req_id, &params).await
}

pub(super) async fn search_form(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Form(params): Form<SearchParams>,
) -> Result<Json<ApiResponse<Vec<VenueAvailability>>>, ApiError> {
    run_search(&state, req_id, &params).await
}

async fn run_search(
    state: &AppState,
    req_id: RequestId,
    params: &SearchParams,
) -> Result<Json<ApiResponse<Vec<VenueAvailability>>>, ApiError> {
    let query = build_query(params, state.defaults)
        .map_err(|message| ApiError::new(req_id.0.clone(), "validation_error", message))?;

    let outcome = state.pipeline.search_with_status(&query).await;
    tracing::info!(
        request_id = %req_id.0,
        date = %query.date,
        venues = outcome.venues.len(),
        status = %outcome.status,
        "search served"
    );

    Ok(Json(ApiResponse {
        data: outcome.venues,
        meta: ResponseMeta::new(req_id.0).with_status(outcome.status),
    }))
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Validates request fields into a [`SearchQuery`], filling omitted radius
/// and tolerance from `defaults`.
fn build_query(params: &SearchParams, defaults: SearchDefaults) -> Result<SearchQuery, String> {
    let raw_date = present(params.search_date.as_deref())
        .ok_or_else(|| "search_date is required".to_string())?;
    let date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d")
        .map_err(|_| format!("search_date must be YYYY-MM-DD, got {raw_date:?}"))?;

    let mut query = SearchQuery::new(date)
        .with_radius_km(defaults.radius_km)
        .with_tolerance_minutes(defaults.tolerance_minutes);

    if let Some(raw) = present(params.time.as_deref()) {
        let time = parse_time_of_day(raw).map_err(|e| e.to_string())?;
        query = query.with_time(time);
    }

    if let Some(region) = present(params.region.as_deref()) {
        query = query.with_region(region);
    }

    match (present(params.lat.as_deref()), present(params.lon.as_deref())) {
        (Some(lat), Some(lon)) => {
            let center = Coordinate::new(parse_number("lat", lat)?, parse_number("lon", lon)?);
            if !center.is_valid() {
                return Err(format!("({lat}, {lon}) is not a valid coordinate"));
            }
            query = query.with_center(center);
        }
        (None, None) => {}
        _ => return Err("lat and lon must be given together".to_string()),
    }

    if let Some(raw) = present(params.distance_limit.as_deref()) {
        let radius_km = parse_number("distance_limit", raw)?;
        if radius_km < 0.0 {
            return Err("distance_limit must not be negative".to_string());
        }
        query = query.with_radius_km(radius_km);
    }

    if let Some(raw) = present(params.time_range_minutes.as_deref()) {
        let minutes = raw
            .parse::<u32>()
            .map_err(|_| format!("time_range_minutes must be a whole number, got {raw:?}"))?;
        query = query.with_tolerance_minutes(minutes);
    }

    Ok(query)
}

fn parse_number(field: &str, raw: &str) -> Result<f64, String> {
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("{field} must be a number, got {raw:?}"))
}
