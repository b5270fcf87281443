//! Admin gate: shared-credential login issues the session token that is the
//! only way past the protected endpoints.

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use common::{app_with, bare_config, body_json, json_request};
use serde_json::json;
use tower::ServiceExt;

fn admin_config() -> portfolio::config::Config {
    let mut config = bare_config();
    config.admin_password = Some("correct horse".to_string());
    config
}

fn authed_request(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

async fn login(app: &axum::Router) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/admin/login",
            &json!({ "username": "admin", "password": "correct horse" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    body["data"]["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn login_impossible_without_configured_password() {
    let app = app_with(bare_config());

    let response = app
        .oneshot(json_request(
            "POST",
            "/admin/login",
            &json!({ "username": "admin", "password": "" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn wrong_credentials_are_rejected() {
    let app = app_with(admin_config());

    let response = app
        .oneshot(json_request(
            "POST",
            "/admin/login",
            &json!({ "username": "admin", "password": "wrong" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn protected_endpoints_require_token() {
    let app = app_with(admin_config());

    for uri in ["/admin/messages", "/admin/analytics"] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "uri: {uri}");
    }

    let response = app
        .oneshot(authed_request("GET", "/admin/messages", "forged-token"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_unlocks_message_listing() {
    let app = app_with(admin_config());
    let token = login(&app).await;

    let response = app
        .oneshot(authed_request("GET", "/admin/messages", &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    // Store unconfigured: degraded empty listing, not an error.
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn malformed_pagination_stays_in_json_envelope() {
    let app = app_with(admin_config());
    let token = login(&app).await;

    let response = app
        .oneshot(authed_request(
            "GET",
            "/admin/messages?limit=abc&offset=-",
            &token,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("Invalid query parameters"));
}

#[tokio::test]
async fn mark_read_reports_false_for_unknown_id() {
    let app = app_with(admin_config());
    let token = login(&app).await;

    let response = app
        .oneshot(authed_request(
            "POST",
            "/admin/messages/0123456789abcdef01234567/read",
            &token,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["updated"], json!(false));
}

#[tokio::test]
async fn analytics_degrade_to_zeros() {
    let app = app_with(admin_config());
    let token = login(&app).await;

    let response = app
        .oneshot(authed_request("GET", "/admin/analytics", &token))
        .await
        .unwrap();

    let body = body_json(response).await;
    assert_eq!(body["data"]["total_page_views"], json!(0));
    assert_eq!(body["data"]["total_messages"], json!(0));
    assert_eq!(body["data"]["unread_messages"], json!(0));
    assert_eq!(body["data"]["views_by_page"], json!([]));
}

#[tokio::test]
async fn logout_revokes_the_token() {
    let app = app_with(admin_config());
    let token = login(&app).await;

    let response = app
        .clone()
        .oneshot(authed_request("POST", "/admin/logout", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["revoked"], json!(true));

    let response = app
        .oneshot(authed_request("GET", "/admin/messages", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
