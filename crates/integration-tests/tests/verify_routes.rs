//! Address verification endpoint.

use axum::http::StatusCode;
use saudi_address_integration_tests::TestContext;
use saudi_address_service::national_address::testing::MockTransport;
use saudi_address_service::nonce::NonceAction;
use serde_json::json;

fn answering(found: bool) -> TestContext {
    TestContext::new(MockTransport::new().respond_json(
        "/Address/address-verify",
        &format!(r#"{{"addressfound":{found}}}"#),
    ))
}

#[tokio::test]
async fn test_verified_address() {
    let ctx = answering(true);
    let nonce = ctx.nonce(NonceAction::Checkout);

    let (status, body) = ctx
        .post(
            "/api/verify",
            &json!({
                "nonce": nonce,
                "building_number": "8228",
                "postal_code": 12643,
                "additional_number": "2121"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"success": true, "data": {"message": "Address verified successfully"}})
    );
    let urls = ctx.transport.requested_urls();
    assert!(urls.first().is_some_and(|url| url.as_str().ends_with(
        "/Address/address-verify?buildingnumber=8228&zipcode=12643&additionalnumber=2121&language=A&format=JSON&api_key=K"
    )));
}

#[tokio::test]
async fn test_unknown_address() {
    let ctx = answering(false);
    let nonce = ctx.nonce(NonceAction::Checkout);

    let (status, body) = ctx
        .post(
            "/api/verify",
            &json!({ "nonce": nonce, "building_number": "100", "postal_code": "12345" }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"success": false, "data": {"message": "Address verification failed"}})
    );
}

#[tokio::test]
async fn test_missing_numbers_never_reach_the_provider() {
    let ctx = answering(true);
    let nonce = ctx.nonce(NonceAction::Checkout);

    for body in [
        json!({ "nonce": nonce, "postal_code": "12345" }),
        json!({ "nonce": nonce, "building_number": "0", "postal_code": "12345" }),
        json!({ "nonce": nonce, "building_number": "100", "postal_code": "-5" }),
    ] {
        let (status, reply) = ctx.post("/api/verify", &body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(
            reply["data"]["message"],
            json!("Building number and postal code are required for verification")
        );
    }

    let (status, reply) = ctx
        .post(
            "/api/verify",
            &json!({ "nonce": nonce, "building_number": "12b", "postal_code": "12345" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(reply["data"]["message"], json!("Building number must be numeric"));

    assert_eq!(ctx.transport.calls(), 0);
}

#[tokio::test]
async fn test_malformed_provider_reply() {
    let ctx = TestContext::new(MockTransport::new().respond_json("/Address/address-verify", "{}"));
    let nonce = ctx.nonce(NonceAction::Checkout);

    let (status, body) = ctx
        .post(
            "/api/verify",
            &json!({ "nonce": nonce, "building_number": "100", "postal_code": "12345" }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["data"]["message"], json!("Address verification failed"));
}
