//! The submission contract: only validation can fail the request. Store and
//! notifier health must not influence the response or its latency.

mod common;

use std::time::Instant;

use axum::http::StatusCode;
use common::{bare_app, bare_config, body_json, json_request};
use portfolio::config::MailConfig;
use serde_json::json;
use tower::ServiceExt;

fn valid_submission() -> serde_json::Value {
    json!({
        "name": "Ada Lovelace",
        "email": "ada@example.com",
        "subject": "Collaboration",
        "message": "I have a project you might find interesting.",
    })
}

#[tokio::test]
async fn valid_submission_succeeds_with_store_unavailable() {
    // No MONGODB_URI: every persistence attempt fails internally.
    let app = bare_app();

    let response = app
        .oneshot(json_request("POST", "/contact", &valid_submission()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(true));
}

#[tokio::test]
async fn missing_fields_are_rejected() {
    for missing in ["name", "email", "subject", "message"] {
        let mut submission = valid_submission();
        submission[missing] = json!("   ");

        let response = bare_app()
            .oneshot(json_request("POST", "/contact", &submission))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "field: {missing}");
        let body = body_json(response).await;
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["message"], json!("All fields are required"));
    }
}

#[tokio::test]
async fn absent_fields_count_as_missing() {
    let response = bare_app()
        .oneshot(json_request("POST", "/contact", &json!({ "name": "Ada" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_email_is_rejected() {
    for email in ["not-an-email", "a@b", "a@b.c"] {
        let mut submission = valid_submission();
        submission["email"] = json!(email);

        let response = bare_app()
            .oneshot(json_request("POST", "/contact", &submission))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "email: {email}");
        let body = body_json(response).await;
        assert_eq!(body["message"], json!("Invalid email format"));
    }
}

#[tokio::test]
async fn two_letter_tld_is_accepted() {
    let mut submission = valid_submission();
    submission["email"] = json!("a@b.co");

    let response = bare_app()
        .oneshot(json_request("POST", "/contact", &submission))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn response_is_not_gated_on_notification() {
    // Fully "configured" mail pointing at a host that will never answer.
    // The send attempt is dispatched after the response, so the request
    // must come back immediately and still report success.
    let mut config = bare_config();
    config.mail = MailConfig {
        server: Some("smtp.invalid".to_string()),
        port: 587,
        username: Some("user".to_string()),
        password: Some("pass".to_string()),
        sender: Some("owner@example.com".to_string()),
    };
    let app = common::app_with(config);

    let started = Instant::now();
    let response = app
        .oneshot(json_request("POST", "/contact", &valid_submission()))
        .await
        .unwrap();
    let elapsed = started.elapsed();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(true));
    assert!(
        elapsed.as_secs() < 5,
        "response waited on mail delivery: {elapsed:?}"
    );
}

#[tokio::test]
async fn oversized_fields_are_capped_not_rejected() {
    let mut submission = valid_submission();
    submission["message"] = json!("x".repeat(50_000));

    let response = bare_app()
        .oneshot(json_request("POST", "/contact", &submission))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
