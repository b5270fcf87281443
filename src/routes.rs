//! HTTP handlers and middleware.
//!
//! The contact pipeline lives in [`submit_contact`]; everything under `/api`
//! is read-only, and everything under `/admin` (past login) sits behind the
//! session-token gate in [`require_admin`].

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, Request, State, rejection::QueryRejection},
    http::{HeaderMap, Method, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::{
    catalog,
    error::AppError,
    models::{ContactMessage, MessageView, PageViewEvent},
    session::SESSION_TTL_HOURS,
    state::AppState,
    validator::{ContactFields, validate},
};

/// Standard `/api` envelope.
fn json_response<T: Serialize>(data: T) -> Json<Value> {
    Json(json!({
        "success": true,
        "data": data,
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

// Best-effort client address; this runs behind a reverse proxy, so the
// forwarded header is the authoritative one when present.
fn client_ip(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn user_agent(headers: &HeaderMap) -> String {
    headers
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

// ============== Contact submission ==============

#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

/// Validation is the only step that can fail this request. Persistence and
/// notification are attempted afterwards, and their failures are logged and
/// absorbed: the submitter sees success as soon as the message is accepted.
pub async fn submit_contact(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<ContactRequest>,
) -> Result<Json<Value>, AppError> {
    let fields = ContactFields::normalize(
        &request.name,
        &request.email,
        &request.subject,
        &request.message,
    );
    validate(&fields)?;

    let message = ContactMessage::new(fields, client_ip(&headers), user_agent(&headers));

    match state.store.save_message(&message).await {
        Ok(id) => debug!("Saved contact message {id}"),
        Err(e) => warn!("Failed to save contact message: {e}"),
    }

    // Fire-and-forget: the notifier gets its own snapshot of the message and
    // runs after this handler has answered. Its outcome never reaches the
    // submitter.
    let notifier = state.notifier.clone();
    let snapshot = message.clone();
    tokio::spawn(async move {
        notifier.notify(&snapshot).await;
    });

    info!("Contact submission accepted from {}", message.email);

    Ok(Json(json!({
        "success": true,
        "message": "Message sent successfully!",
    })))
}

// ============== Read-only catalog API ==============

#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    pub category: Option<String>,
}

pub async fn get_projects(Query(query): Query<CategoryQuery>) -> Json<Value> {
    match query.category.as_deref() {
        Some(category) => json_response(catalog::projects_in_category(category)),
        None => json_response(catalog::PROJECTS),
    }
}

pub async fn get_project(Path(id): Path<String>) -> Result<Json<Value>, AppError> {
    catalog::project_by_id(&id)
        .map(json_response)
        .ok_or(AppError::NotFound("Project"))
}

pub async fn get_skills(Query(query): Query<CategoryQuery>) -> Json<Value> {
    match query.category.as_deref() {
        Some(category) => match catalog::skills_in_category(category) {
            Some(skills) => json_response(skills),
            None => json_response(&catalog::SKILLS),
        },
        None => json_response(&catalog::SKILLS),
    }
}

pub async fn get_stats() -> Json<Value> {
    json_response(&*catalog::STATS)
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    let connected = state.store.is_connected().await;
    let stats = if connected {
        Some(state.store.stats().await)
    } else {
        None
    };

    let uptime = Utc::now() - state.started_at;
    let hours = uptime.num_hours();
    let minutes = uptime.num_minutes() % 60;

    json_response(json!({
        "status": "healthy",
        "uptime": format!("{hours}h {minutes}m"),
        "version": env!("CARGO_PKG_VERSION"),
        "database": {
            "connected": connected,
            "stats": stats,
        },
    }))
}

// ============== Admin ==============

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Shared-credential check. With no `ADMIN_PASSWORD` configured, login is
/// impossible rather than open.
pub async fn admin_login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<Value>, AppError> {
    let Some(expected) = state.config.admin_password.as_deref() else {
        warn!("Admin login attempted but ADMIN_PASSWORD is not set");
        return Err(AppError::Unauthorized);
    };

    if request.username != state.config.admin_username || request.password != expected {
        warn!("Failed admin login for '{}'", request.username);
        return Err(AppError::Unauthorized);
    }

    let token = state.sessions.issue(&request.username);
    info!("Admin '{}' logged in", request.username);

    Ok(json_response(json!({
        "token": token,
        "expires_in": SESSION_TTL_HOURS * 3600,
    })))
}

pub async fn admin_logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Json<Value> {
    let revoked = bearer_token(&headers)
        .map(|token| state.sessions.revoke(token))
        .unwrap_or(false);

    json_response(json!({ "revoked": revoked }))
}

/// Gate in front of the admin-only store operations: a live session token is
/// the capability, nothing else is consulted.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let authorized = bearer_token(request.headers())
        .map(|token| state.sessions.verify(token))
        .unwrap_or(false);

    if !authorized {
        return Err(AppError::Unauthorized);
    }

    Ok(next.run(request).await)
}

#[derive(Debug, Deserialize)]
pub struct MessagesQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub unread: bool,
}

fn default_limit() -> i64 {
    20
}

pub async fn admin_messages(
    State(state): State<Arc<AppState>>,
    query: Result<Query<MessagesQuery>, QueryRejection>,
) -> Result<Json<Value>, AppError> {
    // Keep malformed pagination inside the JSON envelope instead of axum's
    // plain-text rejection.
    let Query(query) = query.map_err(|_| AppError::InvalidQuery)?;

    let messages: Vec<MessageView> = state
        .store
        .list_messages(query.limit, query.offset, query.unread)
        .await
        .into_iter()
        .map(MessageView::from)
        .collect();

    Ok(json_response(messages))
}

pub async fn admin_mark_read(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Json<Value> {
    let updated = state.store.mark_read(&id).await;
    json_response(json!({ "updated": updated }))
}

pub async fn admin_analytics(State(state): State<Arc<AppState>>) -> Json<Value> {
    json_response(state.store.analytics_summary().await)
}

// ============== Page-view analytics middleware ==============

const UNTRACKED_PREFIXES: &[&str] = &["/api", "/admin", "/contact", "/assets", "/favicon.ico"];

/// Records successful GETs against the analytics collection. The write runs
/// on a detached task with its own copy of the request data, so the response
/// is never delayed and a dead store costs nothing but a debug line.
pub async fn track_page_view(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let referrer = request
        .headers()
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let agent = user_agent(request.headers());
    let ip = client_ip(request.headers());

    let response = next.run(request).await;

    if method == Method::GET
        && response.status() == StatusCode::OK
        && !UNTRACKED_PREFIXES.iter().any(|p| path.starts_with(p))
    {
        let event = PageViewEvent::new(page_name(&path), path, referrer, agent, ip);
        let store = state.store.clone();
        tokio::spawn(async move {
            if let Err(e) = store.log_page_view(&event).await {
                debug!("Page view not recorded: {e}");
            }
        });
    }

    response
}

// Logical route name: first path segment, with the root mapped to "home".
fn page_name(path: &str) -> String {
    match path.trim_start_matches('/').split('/').next() {
        Some("") | None => "home".to_string(),
        Some(segment) => segment.to_string(),
    }
}

// ============== SPA fallback guard ==============

/// Unmatched `/api` and `/admin` paths must answer 404 JSON instead of
/// falling through to the SPA's index.html.
pub async fn api_not_found() -> impl IntoResponse {
    AppError::NotFound("Resource")
}
