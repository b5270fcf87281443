#![allow(dead_code)]

use axum::{Router, body::Body, http::Request, response::Response};
use http_body_util::BodyExt;
use portfolio::{
    app,
    config::{Config, MailConfig},
    state::AppState,
};
use serde_json::Value;

/// Config with nothing external wired up: no database, no mail server,
/// no admin password. The server is expected to run fine like this.
pub fn bare_config() -> Config {
    Config {
        port: 0,
        mongodb_uri: None,
        mongodb_db: "portfolio_test".to_string(),
        mail: MailConfig {
            server: None,
            port: 587,
            username: None,
            password: None,
            sender: None,
        },
        admin_username: "admin".to_string(),
        admin_password: None,
        static_dir: "static/react".to_string(),
    }
}

pub fn bare_app() -> Router {
    app(AppState::from_config(bare_config()))
}

pub fn app_with(config: Config) -> Router {
    app(AppState::from_config(config))
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}
