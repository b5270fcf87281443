//! Environment-driven configuration.
//!
//! Only the port has a hard default. The database and mail settings are
//! deliberately optional: the server must come up and answer requests with
//! neither configured, degrading the store and notifier instead of refusing
//! to start.

use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub mongodb_uri: Option<String>,
    pub mongodb_db: String,
    pub mail: MailConfig,
    pub admin_username: String,
    pub admin_password: Option<String>,
    pub static_dir: String,
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub server: Option<String>,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub sender: Option<String>,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("PORT", "5000"),
            mongodb_uri: maybe("MONGODB_URI"),
            mongodb_db: var_or("MONGODB_DB_NAME", "portfolio"),
            mail: MailConfig {
                server: maybe("MAIL_SERVER"),
                port: try_load("MAIL_PORT", "587"),
                username: maybe("MAIL_USERNAME"),
                password: maybe("MAIL_PASSWORD"),
                sender: maybe("MAIL_DEFAULT_SENDER"),
            },
            admin_username: var_or("ADMIN_USERNAME", "admin"),
            admin_password: maybe("ADMIN_PASSWORD"),
            static_dir: var_or("STATIC_DIR", "static/react"),
        }
    }
}

fn maybe(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.is_empty())
}

fn var_or(key: &str, default: &str) -> String {
    maybe(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var_or(key, default)
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}
