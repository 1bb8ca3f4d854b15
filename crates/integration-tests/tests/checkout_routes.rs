//! Checkout field validation endpoint.

use axum::http::StatusCode;
use saudi_address_integration_tests::{TestContext, verifying_checkout};
use saudi_address_service::national_address::TransportError;
use saudi_address_service::national_address::testing::MockTransport;
use saudi_address_service::nonce::NonceAction;
use serde_json::{Value, json};

fn complete(nonce: &str) -> Value {
    json!({
        "nonce": nonce,
        "saudi_region": "منطقة الرياض",
        "saudi_city": "الرياض",
        "saudi_district": "العليا",
        "saudi_building_number": "8228",
        "saudi_postal_code": "12643",
        "saudi_additional_number": " 2121 "
    })
}

#[tokio::test]
async fn test_valid_address_is_returned_for_storage() {
    let ctx = TestContext::new(MockTransport::new());
    let nonce = ctx.nonce(NonceAction::Checkout);

    let (status, body) = ctx.post("/api/checkout/validate", &complete(&nonce)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["order_meta"]["_saudi_postal_code"], json!("12643"));
    assert_eq!(body["data"]["order_meta"]["_saudi_additional_number"], json!("2121"));
    assert_eq!(body["data"]["customer_meta"]["saudi_city"], json!("الرياض"));
    assert!(body["data"]["order_meta"].get("_saudi_street").is_none());
    assert_eq!(body["data"]["verified"], Value::Null);
    assert_eq!(ctx.transport.calls(), 0);
}

#[tokio::test]
async fn test_all_field_errors_are_reported() {
    let ctx = TestContext::new(MockTransport::new());
    let nonce = ctx.nonce(NonceAction::Checkout);

    let (status, body) = ctx
        .post(
            "/api/checkout/validate",
            &json!({
                "nonce": nonce,
                "saudi_region": "منطقة الرياض",
                "saudi_building_number": "82a8",
                "saudi_postal_code": "1264"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], json!(false));
    assert_eq!(
        body["data"]["errors"],
        json!([
            {"field": "saudi_city", "message": "City is a required field."},
            {"field": "saudi_district", "message": "District is a required field."},
            {"field": "saudi_postal_code", "message": "Postal code must be 5 digits."},
            {"field": "saudi_building_number", "message": "Building number must be numeric."}
        ])
    );
}

#[tokio::test]
async fn test_saved_address_fills_blanks() {
    let ctx = TestContext::new(MockTransport::new());
    let nonce = ctx.nonce(NonceAction::Checkout);

    let (status, body) = ctx
        .post(
            "/api/checkout/validate",
            &json!({
                "nonce": nonce,
                "saudi_building_number": "8228",
                "saved": {
                    "saudi_region": "منطقة الرياض",
                    "saudi_city": "الرياض",
                    "saudi_district": "العليا",
                    "saudi_building_number": "1111",
                    "saudi_postal_code": "12643"
                }
            }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["order_meta"]["_saudi_building_number"], json!("8228"));
    assert_eq!(body["data"]["order_meta"]["_saudi_district"], json!("العليا"));
}

#[tokio::test]
async fn test_verification_rejects_unknown_address() {
    let ctx = TestContext::with_settings(
        MockTransport::new().respond_json("/Address/address-verify", r#"{"addressfound":false}"#),
        "K",
        verifying_checkout(),
    );
    let nonce = ctx.nonce(NonceAction::Checkout);

    let (status, body) = ctx.post("/api/checkout/validate", &complete(&nonce)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["data"]["errors"],
        json!([{"field": "saudi_building_number", "message": "Address verification failed"}])
    );
}

#[tokio::test]
async fn test_verification_marks_known_address() {
    let ctx = TestContext::with_settings(
        MockTransport::new().respond_json("/Address/address-verify", r#"{"addressfound":true}"#),
        "K",
        verifying_checkout(),
    );
    let nonce = ctx.nonce(NonceAction::Checkout);

    let (status, body) = ctx.post("/api/checkout/validate", &complete(&nonce)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["verified"], json!(true));
}

#[tokio::test]
async fn test_provider_outage_does_not_block_checkout() {
    let ctx = TestContext::with_settings(
        MockTransport::new().fail("/Address/address-verify", TransportError::Timeout),
        "K",
        verifying_checkout(),
    );
    let nonce = ctx.nonce(NonceAction::Checkout);

    let (status, body) = ctx.post("/api/checkout/validate", &complete(&nonce)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["verified"], Value::Null);
    assert_eq!(ctx.transport.calls(), 1);
}

#[tokio::test]
async fn test_zero_numbers_are_field_errors() {
    let ctx = TestContext::with_settings(
        MockTransport::new().respond_json("/Address/address-verify", r#"{"addressfound":false}"#),
        "K",
        verifying_checkout(),
    );
    let nonce = ctx.nonce(NonceAction::Checkout);
    let mut form = complete(&nonce);
    form["saudi_building_number"] = json!("0000");
    form["saudi_postal_code"] = json!("00000");

    let (status, body) = ctx.post("/api/checkout/validate", &form).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], json!(false));
    assert_eq!(
        body["data"]["errors"],
        json!([
            {"field": "saudi_postal_code", "message": "Postal Code must be greater than zero."},
            {"field": "saudi_building_number", "message": "Building Number must be greater than zero."}
        ])
    );
    assert_eq!(ctx.transport.calls(), 0);
}

#[tokio::test]
async fn test_zero_numbers_rejected_when_fields_are_optional() {
    let mut settings = verifying_checkout();
    settings.rules.required = false;
    let ctx = TestContext::with_settings(
        MockTransport::new().respond_json("/Address/address-verify", r#"{"addressfound":true}"#),
        "K",
        settings,
    );
    let nonce = ctx.nonce(NonceAction::Checkout);
    let mut form = complete(&nonce);
    form["saudi_building_number"] = json!("0");

    let (status, body) = ctx.post("/api/checkout/validate", &form).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["data"]["errors"],
        json!([{"field": "saudi_building_number", "message": "Building Number must be greater than zero."}])
    );
    assert_eq!(ctx.transport.calls(), 0);
}

#[tokio::test]
async fn test_blank_optional_numbers_skip_verification() {
    let mut settings = verifying_checkout();
    settings.rules.required = false;
    let ctx = TestContext::with_settings(MockTransport::new(), "K", settings);
    let nonce = ctx.nonce(NonceAction::Checkout);
    let mut form = complete(&nonce);
    form["saudi_building_number"] = json!("");

    let (status, body) = ctx.post("/api/checkout/validate", &form).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["verified"], Value::Null);
    assert_eq!(ctx.transport.calls(), 0);
}
