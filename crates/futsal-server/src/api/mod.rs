mod search;

use std::sync::Arc;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use futsal_core::AppConfig;
use futsal_scraper::{KakaoGeocoder, ReservationClient};
use futsal_search::{SearchPipeline, SearchStatus};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, RequestId, REQUEST_ID_HEADER};

pub type FutsalPipeline = SearchPipeline<KakaoGeocoder, ReservationClient>;

/// Values applied when a search request omits radius or tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchDefaults {
    pub radius_km: f64,
    pub tolerance_minutes: u32,
}

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<FutsalPipeline>,
    pub defaults: SearchDefaults,
}

impl AppState {
    /// Builds both HTTP clients from config and wraps them in a pipeline.
    pub fn from_app_config(config: &AppConfig) -> anyhow::Result<Self> {
        let geocoder = KakaoGeocoder::from_app_config(config)?;
        if !geocoder.has_api_key() {
            tracing::warn!("KAKAO_REST_API_KEY not set; region searches will return no venues");
        }
        let listing = ReservationClient::from_app_config(config)?;
        Ok(Self {
            pipeline: Arc::new(SearchPipeline::new(geocoder, listing)),
            defaults: SearchDefaults {
                radius_km: config.default_radius_km,
                tolerance_minutes: config.default_tolerance_minutes,
            },
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_status: Option<SearchStatus>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
            search_status: None,
        }
    }

    pub(super) fn with_status(mut self, status: SearchStatus) -> Self {
        self.search_status = Some(status);
        self
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route(
            "/api/v1/search",
            get(search::search_query).post(search::search_form),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(Extension(req_id): Extension<RequestId>) -> impl IntoResponse {
    Json(ApiResponse {
        data: HealthData { status: "ok" },
        meta: ResponseMeta::new(req_id.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use futsal_core::{Coordinate, VenueAvailability, VenueKey};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const LISTING: &str = "/futsal/s/_f.php";

    fn test_state(base_url: &str, api_key: Option<&str>) -> AppState {
        let geocoder =
            KakaoGeocoder::with_base_url(api_key, 5, base_url).expect("geocoder construction");
        let listing = ReservationClient::with_base_url(5, "futsal-test/0.1", 10, base_url)
            .expect("listing client construction");
        AppState {
            pipeline: Arc::new(SearchPipeline::new(geocoder, listing)),
            defaults: SearchDefaults {
                radius_km: 5.0,
                tolerance_minutes: 30,
            },
        }
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.expect("response");
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: Value = serde_json::from_slice(&body).expect("json parse");
        (status, json)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).expect("request")
    }

    fn one_venue_page() -> Value {
        json!({
            "list": [{
                "fIdx": 9,
                "fName": "Olympic Park Futsal",
                "fAddress": "Seoul Songpa-gu Olympic-ro 424",
                "fLat": "37.5206",
                "fLng": "127.1214",
                "reserv": [
                    {"date": "2025-07-21", "start_time": "19:30:00", "end_time": "21:30:00", "unit_price": 70000},
                    {"date": "2025-07-21", "start_time": "08:00:00", "end_time": "10:00:00", "unit_price": 50000}
                ]
            }]
        })
    }

    #[test]
    fn api_error_validation_error_maps_to_bad_request() {
        let response = ApiError::new("req-1", "validation_error", "invalid input").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn api_error_unknown_code_maps_to_internal_error() {
        let response = ApiError::new("req-1", "boom", "unexpected").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn response_meta_omits_absent_search_status() {
        let meta = serde_json::to_value(ResponseMeta::new("req-1".into())).expect("serialize");
        assert!(meta.get("search_status").is_none());

        let meta = serde_json::to_value(
            ResponseMeta::new("req-1".into()).with_status(SearchStatus::GeocodeFailed),
        )
        .expect("serialize");
        assert_eq!(meta["search_status"], "geocode_failed");
    }

    #[test]
    fn venue_availability_serializes_flat_coordinates() {
        let venue = VenueAvailability {
            key: VenueKey::ById("1".into()),
            name: "Court".into(),
            address: "Seoul".into(),
            coordinate: Coordinate::new(37.5, 127.0),
            indoor: None,
            available_times: vec![],
        };
        let json = serde_json::to_value(&venue).expect("serialize");
        assert_eq!(json["latitude"], json!(37.5));
        assert_eq!(json["longitude"], json!(127.0));
        assert!(json.get("indoor").is_none());
        assert!(json.get("key").is_none());
    }

    #[tokio::test]
    async fn health_returns_ok_and_echoes_request_id() {
        let app = build_app(test_state("http://127.0.0.1:9", None));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .header("x-request-id", "abc-123")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get("x-request-id")
                .and_then(|v| v.to_str().ok()),
            Some("abc-123")
        );
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: Value = serde_json::from_slice(&body).expect("json parse");
        assert_eq!(json["data"]["status"], "ok");
        assert_eq!(json["meta"]["request_id"], "abc-123");
    }

    #[tokio::test]
    async fn search_with_coordinates_returns_matching_venue() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(LISTING))
            .respond_with(ResponseTemplate::new(200).set_body_json(&one_venue_page()))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(LISTING))
            .respond_with(ResponseTemplate::new(200).set_body_json(&json!({"list": []})))
            .mount(&server)
            .await;

        let app = build_app(test_state(&server.uri(), None));
        let (status, json) = send(
            app,
            get("/api/v1/search?search_date=2025-07-21&time=20:00&lat=37.5133&lon=127.1001&region="),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["meta"]["search_status"], "ok");
        let data = json["data"].as_array().expect("data array");
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["name"], "Olympic Park Futsal");
        let times = data[0]["available_times"].as_array().expect("times");
        assert_eq!(times.len(), 1);
        assert_eq!(times[0]["time"], "19:30 - 21:30");
        assert_eq!(times[0]["match_type"], "nearby");
    }

    #[tokio::test]
    async fn search_accepts_form_post() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(LISTING))
            .respond_with(ResponseTemplate::new(200).set_body_json(&one_venue_page()))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(LISTING))
            .respond_with(ResponseTemplate::new(200).set_body_json(&json!({"list": []})))
            .mount(&server)
            .await;

        let app = build_app(test_state(&server.uri(), None));
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/search")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(
                "search_date=2025-07-21&lat=37.5133&lon=127.1001&time=&distance_limit=5",
            ))
            .expect("request");
        let (status, json) = send(app, request).await;

        assert_eq!(status, StatusCode::OK);
        let times = json["data"][0]["available_times"]
            .as_array()
            .expect("times");
        assert_eq!(times.len(), 2);
        assert!(times.iter().all(|t| t["match_type"] == "any"));
    }

    #[tokio::test]
    async fn upstream_failure_is_ok_with_empty_data() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(LISTING))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let app = build_app(test_state(&server.uri(), None));
        let (status, json) = send(
            app,
            get("/api/v1/search?search_date=2025-07-21&lat=37.5133&lon=127.1001"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"], json!([]));
        assert_eq!(json["meta"]["search_status"], "upstream_failed");
    }

    #[tokio::test]
    async fn region_without_api_key_is_geocode_failed() {
        let app = build_app(test_state("http://127.0.0.1:9", None));
        let (status, json) = send(
            app,
            get("/api/v1/search?search_date=2025-07-21&region=%EC%9E%A0%EC%8B%A4"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"], json!([]));
        assert_eq!(json["meta"]["search_status"], "geocode_failed");
    }

    #[tokio::test]
    async fn missing_location_is_no_location() {
        let app = build_app(test_state("http://127.0.0.1:9", None));
        let (status, json) = send(app, get("/api/v1/search?search_date=2025-07-21")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["meta"]["search_status"], "no_location");
    }

    #[tokio::test]
    async fn invalid_input_is_validation_error() {
        for uri in [
            "/api/v1/search",
            "/api/v1/search?search_date=21-07-2025&lat=37.5&lon=127.0",
            "/api/v1/search?search_date=2025-07-21&time=8pm&lat=37.5&lon=127.0",
            "/api/v1/search?search_date=2025-07-21&lat=37.5",
            "/api/v1/search?search_date=2025-07-21&lat=37.5&lon=127.0&distance_limit=-1",
        ] {
            let app = build_app(test_state("http://127.0.0.1:9", None));
            let (status, json) = send(app, get(uri)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(json["error"]["code"], "validation_error", "{uri}");
            assert!(json["meta"]["request_id"].is_string(), "{uri}");
        }
    }
}
