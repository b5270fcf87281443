use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{config::Config, database::Store, notifier::Notifier, session::Sessions};

pub struct AppState {
    pub config: Config,
    pub store: Arc<Store>,
    pub notifier: Arc<Notifier>,
    pub sessions: Sessions,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new() -> Arc<Self> {
        Self::from_config(Config::load())
    }

    /// Construction from an explicit config, so tests can run against an
    /// unconfigured store/notifier without touching the environment.
    pub fn from_config(config: Config) -> Arc<Self> {
        let store = Arc::new(Store::new(
            config.mongodb_uri.clone(),
            config.mongodb_db.clone(),
        ));
        let notifier = Arc::new(Notifier::new(config.mail.clone()));

        Arc::new(Self {
            config,
            store,
            notifier,
            sessions: Sessions::new(),
            started_at: Utc::now(),
        })
    }
}
