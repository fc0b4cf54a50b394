mod common;

use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::*;
use ticket_storefront::error::{SafeStep, StorefrontError};
use ticket_storefront::models::{BuyerDetails, HolderDetails, TicketType};
use ticket_storefront::services::quote::QuotePhase;

fn buyer() -> BuyerDetails {
    BuyerDetails {
        first_name: "Ada".to_string(),
        surname: "Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        phone: "+4912345678".to_string(),
    }
}

fn holder(seat_id: &str) -> HolderDetails {
    HolderDetails {
        seat_id: seat_id.to_string(),
        full_name: "Ada Lovelace".to_string(),
    }
}

async fn active_order(
    storefront: &ticket_storefront::Storefront,
    server: &MockServer,
) -> ticket_storefront::services::order::TicketBuilder {
    mount_occurrence_endpoints(server, 1).await;
    Mock::given(method("POST"))
        .and(path("/api/v3/occurrences/1/quote"))
        .respond_with(ResponseTemplate::new(200).set_body_json(quote_json(
            "q-1",
            1,
            expiry_in(600),
            json!([{"seatId": "R1C1", "ticketType": "senior", "amount": 40.0}]),
            40.0,
        )))
        .mount(server)
        .await;

    let mut builder = storefront.ticket_builder();
    builder.enter_occurrence(occurrence(1)).await.unwrap();
    builder.select_seat("R1C1", TicketType::Senior).unwrap();
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(storefront.quotes.snapshot().phase, QuotePhase::Active);
    builder
}

#[tokio::test]
async fn checkout_hands_off_the_client_secret_and_records_the_order() {
    let server = MockServer::start().await;
    let storefront = storefront(&server.uri());

    Mock::given(method("POST"))
        .and(path("/api/v3/checkout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "paymentId": "pay-1",
            "clientSecret": "cs_secret",
            "amountCents": 4000
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v3/payments/pay-1/tickets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "t-1", "seatId": "R1C1", "holderName": "Ada Lovelace"}
        ])))
        .mount(&server)
        .await;

    let mut builder = active_order(&storefront, &server).await;
    let data = builder.prepare_checkout().unwrap();
    assert_eq!(data.quote_id, "q-1");
    assert_eq!(data.total, 40.0);

    let checkout = storefront.checkout();
    let handoff = checkout.submit(&buyer(), &[holder("R1C1")]).await.unwrap();
    assert_eq!(handoff.client_secret, "cs_secret");
    assert_eq!(handoff.public_key, "pk_test");
    assert_eq!(handoff.widget_element_id, "payment-widget");

    // The order record is already readable, as the success page expects.
    let record = storefront.session.order_record().unwrap();
    assert_eq!(record.payment_id, "pay-1");
    assert_eq!(record.total, 40.0);

    let (record, tickets) = checkout.complete_success("pay-1").await.unwrap();
    assert_eq!(tickets.len(), 1);
    assert_eq!(record.buyer_email, "ada@example.com");

    // The order flow is reset; the record stays for the confirmation.
    assert!(storefront.session.quote().is_none());
    assert!(storefront.session.selections().is_empty());
    assert!(storefront.session.checkout_data().is_none());
    assert!(storefront.session.order_record().is_some());
}

#[tokio::test]
async fn checkout_without_prepared_data_redirects_to_seat_selection() {
    let server = MockServer::start().await;
    let storefront = storefront(&server.uri());

    let err = storefront.checkout().begin().unwrap_err();
    assert!(matches!(err, StorefrontError::MissingCheckoutData));
    assert_eq!(err.redirect_step(), Some(SafeStep::SeatSelection));
}

#[tokio::test]
async fn invalid_buyer_details_never_reach_the_wire() {
    let server = MockServer::start().await;
    let storefront = storefront(&server.uri());

    let mut builder = active_order(&storefront, &server).await;
    builder.prepare_checkout().unwrap();

    let mut bad_buyer = buyer();
    bad_buyer.email = "not-an-email".to_string();

    let err = storefront
        .checkout()
        .submit(&bad_buyer, &[holder("R1C1")])
        .await
        .unwrap_err();
    assert!(matches!(err, StorefrontError::InvalidDetails(_)));
    assert!(requests_for(&server, "/checkout").await.is_empty());
}

#[tokio::test]
async fn every_seat_needs_exactly_one_holder() {
    let server = MockServer::start().await;
    let storefront = storefront(&server.uri());

    let mut builder = active_order(&storefront, &server).await;
    builder.prepare_checkout().unwrap();

    let err = storefront.checkout().submit(&buyer(), &[]).await.unwrap_err();
    assert!(matches!(err, StorefrontError::HolderMismatch));

    let err = storefront
        .checkout()
        .submit(&buyer(), &[holder("R9C9")])
        .await
        .unwrap_err();
    assert!(matches!(err, StorefrontError::HolderMismatch));
}

#[tokio::test]
async fn addons_ride_the_checkout_payload_and_price() {
    let server = MockServer::start().await;
    let storefront = storefront(&server.uri());

    Mock::given(method("POST"))
        .and(path("/api/v3/checkout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "paymentId": "pay-2",
            "clientSecret": "cs_secret",
            "amountCents": 4500
        })))
        .mount(&server)
        .await;

    let mut builder = active_order(&storefront, &server).await;
    builder
        .attach_addon(
            "R1C1",
            &ticket_storefront::models::Addon {
                id: "translation-de".to_string(),
                language: "de".to_string(),
                price: 5.0,
            },
        )
        .unwrap();
    builder.prepare_checkout().unwrap();

    storefront
        .checkout()
        .submit(&buyer(), &[holder("R1C1")])
        .await
        .unwrap();

    let calls = requests_for(&server, "/checkout").await;
    let body: serde_json::Value = serde_json::from_slice(&calls[0].body).unwrap();
    assert_eq!(body["addons"].as_array().unwrap().len(), 1);
    assert_eq!(body["addons"][0]["language"], "de");
    // Seat total 40.00 plus the 5.00 translation add-on, in cents.
    assert_eq!(body["amountCents"], 4500);
    assert_eq!(
        storefront.session.translation_preference().as_deref(),
        Some("de")
    );
}
