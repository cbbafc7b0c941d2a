//! Integration tests for `PlacesClient` using wiremock HTTP mocks.

use medspa_core::Coordinate;
use medspa_places::{ApiStatus, PlacesClient, PlacesError, DETAIL_FIELDS};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> PlacesClient {
    PlacesClient::with_base_url("test-key", 5, "medspa-test/0.1", base_url)
        .expect("client construction should not fail")
}

const ORIGIN: Coordinate = Coordinate::new(33.1581, -117.3506);

#[tokio::test]
async fn geocode_returns_first_result_location() {
    let server = MockServer::start().await;

    let body = json!({
        "status": "OK",
        "results": [
            {
                "formatted_address": "Oceanside, CA 92054, USA",
                "geometry": { "location": { "lat": 33.1959, "lng": -117.3795 } }
            },
            {
                "formatted_address": "Somewhere else",
                "geometry": { "location": { "lat": 1.0, "lng": 2.0 } }
            }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/geocode/json"))
        .and(query_param("address", "92054"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let coordinate = client.geocode("92054").await.expect("should geocode");

    assert_eq!(coordinate, Coordinate::new(33.1959, -117.3795));
}

#[tokio::test]
async fn geocode_zero_results_is_no_match() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geocode/json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": "ZERO_RESULTS", "results": []})),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.geocode("00000").await.unwrap_err();

    assert!(
        matches!(err, PlacesError::NoMatch { ref address } if address == "00000"),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn geocode_request_denied_is_api_error_with_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geocode/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid.",
            "results": []
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.geocode("92054").await.unwrap_err();

    match err {
        PlacesError::Api {
            operation,
            status,
            message,
        } => {
            assert_eq!(operation, "geocode");
            assert_eq!(status, ApiStatus::RequestDenied);
            assert_eq!(message, "The provided API key is invalid.");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn nearby_search_sends_location_radius_and_keyword() {
    let server = MockServer::start().await;

    let body = json!({
        "status": "OK",
        "results": [
            {
                "place_id": "p1",
                "name": "Glow Med Spa",
                "vicinity": "123 Coast Hwy, Oceanside",
                "geometry": { "location": { "lat": 33.2, "lng": -117.35 } }
            },
            {
                "name": "Missing place id",
                "geometry": { "location": { "lat": 33.3, "lng": -117.3 } }
            },
            {
                "place_id": "p2",
                "name": "Coast Dermatology",
                "vicinity": "9 Mission Ave",
                "geometry": { "location": { "lat": 33.25, "lng": -117.30 } }
            }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/place/nearbysearch/json"))
        .and(query_param("location", "33.1581,-117.3506"))
        .and(query_param("radius", "40233.5"))
        .and(query_param("keyword", "med spa"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let places = client
        .nearby_search(ORIGIN, 25.0 * 1609.34, "med spa")
        .await
        .expect("should parse nearby results");

    assert_eq!(places.len(), 2, "malformed entry should be skipped");
    assert_eq!(places[0].place_id, "p1");
    assert_eq!(places[0].vicinity, "123 Coast Hwy, Oceanside");
    assert_eq!(places[1].place_id, "p2");
    assert_eq!(places[1].location, Coordinate::new(33.25, -117.30));
}

#[tokio::test]
async fn nearby_search_zero_results_is_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/place/nearbysearch/json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": "ZERO_RESULTS", "results": []})),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let places = client
        .nearby_search(ORIGIN, 16_093.4, "lip filler")
        .await
        .expect("ZERO_RESULTS is not an error");

    assert!(places.is_empty());
}

#[tokio::test]
async fn nearby_search_over_query_limit_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/place/nearbysearch/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OVER_QUERY_LIMIT",
            "results": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri()).with_retries(3, 0);
    let err = client
        .nearby_search(ORIGIN, 16_093.4, "botox")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PlacesError::Api {
            status: ApiStatus::OverQueryLimit,
            ..
        }
    ));
}

#[tokio::test]
async fn server_error_is_retried_until_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/place/nearbysearch/json"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/place/nearbysearch/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "results": [{
                "place_id": "p9",
                "name": "Retry Spa",
                "vicinity": "1 Main St",
                "geometry": { "location": { "lat": 33.16, "lng": -117.35 } }
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri()).with_retries(2, 0);
    let places = client
        .nearby_search(ORIGIN, 8_046.7, "facial spa")
        .await
        .expect("second attempt should succeed");

    assert_eq!(places.len(), 1);
    assert_eq!(places[0].place_id, "p9");
}

#[tokio::test]
async fn http_error_without_retries_surfaces_as_http() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/place/details/json"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.place_details("p1").await.unwrap_err();

    assert!(matches!(err, PlacesError::Http(_)), "got: {err:?}");
    assert!(
        !err.to_string().contains("test-key"),
        "API key must not leak into error text: {err}"
    );
}

#[tokio::test]
async fn place_details_requests_three_fields() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/place/details/json"))
        .and(query_param("place_id", "p1"))
        .and(query_param("fields", DETAIL_FIELDS))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "result": {
                "formatted_phone_number": "(760) 555-0100",
                "website": "https://www.glowspa.example/",
                "url": "https://maps.google.com/?cid=123"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let details = client.place_details("p1").await.expect("should parse details");

    assert_eq!(details.phone.as_deref(), Some("(760) 555-0100"));
    assert_eq!(details.website.as_deref(), Some("https://www.glowspa.example/"));
    assert_eq!(details.url.as_deref(), Some("https://maps.google.com/?cid=123"));
}

#[tokio::test]
async fn place_details_with_missing_fields_leaves_them_absent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/place/details/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "result": { "url": "https://maps.google.com/?cid=9" }
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let details = client.place_details("p2").await.unwrap();

    assert!(details.phone.is_none());
    assert!(details.website.is_none());
    assert_eq!(details.url.as_deref(), Some("https://maps.google.com/?cid=9"));
}

#[tokio::test]
async fn place_details_not_found_is_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/place/details/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "NOT_FOUND"})))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.place_details("gone").await.unwrap_err();

    assert!(matches!(
        err,
        PlacesError::Api {
            status: ApiStatus::NotFound,
            ..
        }
    ));
}

#[tokio::test]
async fn malformed_body_is_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geocode/json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.geocode("92054").await.unwrap_err();

    assert!(matches!(err, PlacesError::Deserialize { .. }), "got: {err:?}");
}
