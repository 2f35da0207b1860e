//! Integration tests for `KakaoGeocoder` using wiremock HTTP mocks.

use futsal_scraper::{GeocodeError, KakaoGeocoder};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const KEYWORD: &str = "/v2/local/search/keyword.json";

fn test_geocoder(base_url: &str) -> KakaoGeocoder {
    KakaoGeocoder::with_base_url(Some("test-key"), 5, base_url)
        .expect("geocoder construction should not fail")
}

#[tokio::test]
async fn resolve_returns_first_document_coordinate() {
    let server = MockServer::start().await;

    let body = json!({
        "documents": [
            {"place_name": "잠실역 2호선", "x": "127.100196", "y": "37.513294"},
            {"place_name": "잠실새내역", "x": "127.086162", "y": "37.511687"}
        ],
        "meta": {"total_count": 2, "is_end": true}
    });

    Mock::given(method("GET"))
        .and(path(KEYWORD))
        .and(query_param("query", "잠실"))
        .and(header("authorization", "KakaoAK test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let coordinate = test_geocoder(&server.uri())
        .resolve("잠실")
        .await
        .expect("should resolve");

    assert!((coordinate.latitude - 37.513_294).abs() < 1e-9);
    assert!((coordinate.longitude - 127.100_196).abs() < 1e-9);
}

#[tokio::test]
async fn resolve_trims_place_before_querying() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(KEYWORD))
        .and(query_param("query", "강남역"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({
            "documents": [{"x": "127.027621", "y": "37.497942"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let coordinate = test_geocoder(&server.uri())
        .resolve("  강남역 ")
        .await
        .expect("should resolve");
    assert!((coordinate.latitude - 37.497_942).abs() < 1e-9);
}

#[tokio::test]
async fn empty_documents_is_no_candidates() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(KEYWORD))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({
            "documents": [],
            "meta": {"total_count": 0}
        })))
        .mount(&server)
        .await;

    let err = test_geocoder(&server.uri())
        .resolve("Nowhere123")
        .await
        .unwrap_err();

    assert!(
        matches!(err, GeocodeError::NoCandidates { ref query } if query == "Nowhere123"),
        "got {err:?}"
    );
}

#[tokio::test]
async fn unauthorized_is_unexpected_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(KEYWORD))
        .respond_with(ResponseTemplate::new(401).set_body_json(&json!({
            "errorType": "AccessDeniedError",
            "message": "wrong appKey"
        })))
        .mount(&server)
        .await;

    let err = test_geocoder(&server.uri()).resolve("잠실").await.unwrap_err();
    assert!(
        matches!(err, GeocodeError::UnexpectedStatus { status: 401, .. }),
        "got {err:?}"
    );
}

#[tokio::test]
async fn garbage_body_is_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(KEYWORD))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = test_geocoder(&server.uri()).resolve("잠실").await.unwrap_err();
    assert!(matches!(err, GeocodeError::Deserialize { .. }), "got {err:?}");
}

#[tokio::test]
async fn document_without_coordinates_is_invalid_coordinate() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(KEYWORD))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({
            "documents": [{"place_name": "Somewhere", "x": "", "y": "37.5"}]
        })))
        .mount(&server)
        .await;

    let err = test_geocoder(&server.uri()).resolve("Somewhere").await.unwrap_err();
    assert!(
        matches!(err, GeocodeError::InvalidCoordinate { .. }),
        "got {err:?}"
    );
}
