//! # Portfolio backend
//!
//! Serves a single-page portfolio app plus a small JSON API:
//! - `POST /contact` — contact-form pipeline: validate, persist (best
//!   effort), notify by email (best effort, fire-and-forget)
//! - `GET /api/*` — hard-coded project/skill catalog, stats, health
//! - `/admin/*` — shared-credential login issuing a session token that
//!   gates the message inbox and analytics
//!
//! The MongoDB store and the SMTP notifier are both optional at runtime:
//! with neither configured the server still answers every request, it just
//! stops remembering and stops emailing.

use std::{path::Path, sync::Arc, time::Duration};

use axum::{
    Router,
    http::{Method, header::{AUTHORIZATION, CONTENT_TYPE}},
    middleware,
    routing::{get, post},
};
use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod catalog;
pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod notifier;
pub mod routes;
pub mod session;
pub mod state;
pub mod validator;

use routes::{
    admin_analytics, admin_login, admin_logout, admin_mark_read, admin_messages, api_not_found,
    get_project, get_projects, get_skills, get_stats, health, require_admin, submit_contact,
    track_page_view,
};
use state::AppState;

/// Full router over the given state. Split out from [`start_server`] so
/// tests can drive it without binding a socket.
pub fn app(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/projects", get(get_projects))
        .route("/projects/{id}", get(get_project))
        .route("/skills", get(get_skills))
        .route("/stats", get(get_stats))
        .route("/health", get(health))
        .fallback(api_not_found);

    let protected = Router::new()
        .route("/messages", get(admin_messages))
        .route("/messages/{id}/read", post(admin_mark_read))
        .route("/analytics", get(admin_analytics))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    let admin = Router::new()
        .route("/login", post(admin_login))
        .route("/logout", post(admin_logout))
        .merge(protected)
        .fallback(api_not_found);

    let static_dir = Path::new(&state.config.static_dir);
    let spa = ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/contact", post(submit_contact))
        .nest("/api", api)
        .nest("/admin", admin)
        .fallback_service(spa)
        .layer(middleware::from_fn_with_state(state.clone(), track_page_view))
        .layer(cors)
        .with_state(state)
}

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = AppState::new();

    info!("Starting server...");
    info!(
        "Database: {}",
        if state.store.is_connected().await {
            "Connected"
        } else {
            "Offline"
        }
    );

    let address = format!("0.0.0.0:{}", state.config.port);
    let router = app(state);

    info!("Binding to {address}");
    let listener = TcpListener::bind(&address).await.unwrap();
    info!("Server running on {address}");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    println!("Server shutting down...");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
