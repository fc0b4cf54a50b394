mod common;

use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::*;
use ticket_storefront::api::ApiClient;
use ticket_storefront::error::{ApiError, ErrorCode};
use ticket_storefront::models::User;

#[tokio::test]
async fn occurrences_decode_into_typed_models() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/events/7/occurrences"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([occurrence_json(1), occurrence_json(2)])),
        )
        .mount(&server)
        .await;

    let api = ApiClient::from_config(&test_config(&server.uri()));
    let occurrences = api.occurrences(7).await.unwrap();

    assert_eq!(occurrences.len(), 2);
    assert_eq!(occurrences[0].language, "en");
    assert!(!occurrences[0].is_sold_out());
}

#[tokio::test]
async fn quote_delete_treats_204_as_empty_success() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v3/quotes/q-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let api = ApiClient::from_config(&test_config(&server.uri()));
    api.delete_quote("q-1").await.unwrap();
}

#[tokio::test]
async fn structured_conflict_body_surfaces_the_seat() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v3/occurrences/1/quote"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "error": {"code": "SEAT_ALREADY_TAKEN", "seat": "R5C12", "message": "seat conflict"}
        })))
        .mount(&server)
        .await;

    let api = ApiClient::from_config(&test_config(&server.uri()));
    let err = api
        .create_quote(
            1,
            &ticket_storefront::api::quotes::QuoteRequest::from_selections(
                &[],
                Default::default(),
            ),
        )
        .await
        .unwrap_err();

    assert!(err.is_seat_conflict());
    assert_eq!(
        err.code(),
        Some(&ErrorCode::SeatAlreadyTaken {
            seat_id: "R5C12".to_string()
        })
    );
}

#[tokio::test]
async fn legacy_message_only_body_still_detects_the_conflict() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v3/occurrences/1/quote"))
        .respond_with(
            ResponseTemplate::new(409)
                .set_body_json(json!({"message": "Seat R5C12 is already taken"})),
        )
        .mount(&server)
        .await;

    let api = ApiClient::from_config(&test_config(&server.uri()));
    let err = api
        .create_quote(
            1,
            &ticket_storefront::api::quotes::QuoteRequest::from_selections(
                &[],
                Default::default(),
            ),
        )
        .await
        .unwrap_err();

    assert_eq!(
        err.code(),
        Some(&ErrorCode::SeatAlreadyTaken {
            seat_id: "R5C12".to_string()
        })
    );
}

#[tokio::test]
async fn circuit_breaker_opens_after_repeated_transport_failures() {
    // Nothing listens here; every request is a connection failure.
    let mut config = test_config("http://127.0.0.1:1");
    config.circuit_breaker.failure_threshold = 2;
    let api = ApiClient::from_config(&config);

    for _ in 0..2 {
        let err = api.tickets("pay-1").await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
    }

    let err = api.tickets("pay-1").await.unwrap_err();
    assert!(matches!(err, ApiError::CircuitOpen));
}

#[tokio::test]
async fn login_attaches_the_bearer_token_to_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/payments/pay-1/tickets"))
        .and(header("authorization", "Bearer business-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let storefront = storefront(&server.uri());
    storefront.login(
        "business-token".to_string(),
        User {
            id: 1,
            email: "buyer@example.com".to_string(),
            first_name: "Greta".to_string(),
            surname: "Buyer".to_string(),
            company: Some("Example GmbH".to_string()),
        },
    );
    assert!(storefront.auth().is_authenticated());

    let tickets = storefront.api.tickets("pay-1").await.unwrap();
    assert!(tickets.is_empty());
}
