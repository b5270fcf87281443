//! # MongoDB store
//!
//! Two collections back the whole system:
//! - `contacts`: contact-form submissions, mutable only through mark-read
//! - `analytics`: write-once page-view events
//!
//! The connection is lazy and self-healing. Nothing here is allowed to fail
//! the caller: with no `MONGODB_URI` configured, or the server unreachable,
//! reads come back empty/zero and writes report [`StoreError::Unavailable`].
//! A failed liveness probe drops the cached handle so the next call dials
//! again instead of staying dark forever.

use std::time::Duration;

use futures::TryStreamExt;
use mongodb::{
    Client, Collection, Database,
    bson::{Bson, Document, doc, oid::ObjectId},
    options::ClientOptions,
};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::{
    error::StoreError,
    models::{AnalyticsSummary, ContactMessage, PageViewEvent, PageViews, StoreStats},
};

const CONTACTS: &str = "contacts";
const ANALYTICS: &str = "analytics";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const TOP_PAGES: i64 = 10;

pub struct Store {
    uri: Option<String>,
    db_name: String,
    handle: RwLock<Option<Database>>,
}

impl Store {
    pub fn new(uri: Option<String>, db_name: impl Into<String>) -> Self {
        if uri.is_none() {
            warn!("MONGODB_URI not set, database features disabled");
        }

        Self {
            uri,
            db_name: db_name.into(),
            handle: RwLock::new(None),
        }
    }

    /// Cached handle when healthy, otherwise a fresh connection attempt.
    /// Concurrent callers may dial redundantly; each attempt is independent
    /// and the last writer wins, which is harmless.
    async fn database(&self) -> Option<Database> {
        if let Some(db) = self.handle.read().await.as_ref() {
            return Some(db.clone());
        }

        let uri = self.uri.as_deref()?;

        match connect(uri, &self.db_name).await {
            Ok(db) => {
                info!("Connected to MongoDB: {}", self.db_name);
                *self.handle.write().await = Some(db.clone());
                Some(db)
            }
            Err(e) => {
                warn!("Failed to connect to MongoDB: {e}");
                None
            }
        }
    }

    async fn contacts(&self) -> Option<Collection<ContactMessage>> {
        Some(self.database().await?.collection(CONTACTS))
    }

    async fn analytics(&self) -> Option<Collection<PageViewEvent>> {
        Some(self.database().await?.collection(ANALYTICS))
    }

    pub async fn save_message(&self, message: &ContactMessage) -> Result<ObjectId, StoreError> {
        let collection = self.contacts().await.ok_or(StoreError::Unavailable)?;
        let result = collection.insert_one(message).await?;

        result
            .inserted_id
            .as_object_id()
            .ok_or(StoreError::Unavailable)
    }

    /// Newest-first page of messages. Degrades to an empty list.
    pub async fn list_messages(
        &self,
        limit: i64,
        offset: u64,
        unread_only: bool,
    ) -> Vec<ContactMessage> {
        let Some(collection) = self.contacts().await else {
            return Vec::new();
        };

        let filter = if unread_only {
            doc! { "read": false }
        } else {
            doc! {}
        };

        let cursor = collection
            .find(filter)
            .sort(doc! { "created_at": -1 })
            .skip(offset)
            .limit(limit)
            .await;

        match cursor {
            Ok(cursor) => cursor.try_collect().await.unwrap_or_else(|e| {
                warn!("Failed to read contact messages: {e}");
                Vec::new()
            }),
            Err(e) => {
                warn!("Failed to query contact messages: {e}");
                Vec::new()
            }
        }
    }

    /// Sets `read`/`read_at` on one message. Unknown and unparseable ids are
    /// both reported as `false`, never as an error.
    pub async fn mark_read(&self, id: &str) -> bool {
        let Ok(object_id) = ObjectId::parse_str(id) else {
            return false;
        };
        let Some(collection) = self.contacts().await else {
            return false;
        };

        let update = doc! {
            "$set": { "read": true, "read_at": mongodb::bson::DateTime::now() }
        };

        match collection.update_one(doc! { "_id": object_id }, update).await {
            Ok(result) => result.modified_count > 0,
            Err(e) => {
                warn!("Failed to mark message {id} read: {e}");
                false
            }
        }
    }

    pub async fn count_unread(&self) -> u64 {
        let Some(collection) = self.contacts().await else {
            return 0;
        };

        collection
            .count_documents(doc! { "read": false })
            .await
            .unwrap_or_else(|e| {
                warn!("Failed to count unread messages: {e}");
                0
            })
    }

    pub async fn log_page_view(&self, event: &PageViewEvent) -> Result<ObjectId, StoreError> {
        let collection = self.analytics().await.ok_or(StoreError::Unavailable)?;
        let result = collection.insert_one(event).await?;

        result
            .inserted_id
            .as_object_id()
            .ok_or(StoreError::Unavailable)
    }

    /// Totals plus the all-time top pages, aggregated server-side.
    pub async fn analytics_summary(&self) -> AnalyticsSummary {
        let Some(db) = self.database().await else {
            return AnalyticsSummary::default();
        };

        let analytics: Collection<PageViewEvent> = db.collection(ANALYTICS);
        let contacts: Collection<ContactMessage> = db.collection(CONTACTS);

        let mut summary = AnalyticsSummary {
            total_page_views: analytics.count_documents(doc! {}).await.unwrap_or(0),
            total_messages: contacts.count_documents(doc! {}).await.unwrap_or(0),
            unread_messages: contacts
                .count_documents(doc! { "read": false })
                .await
                .unwrap_or(0),
            views_by_page: Vec::new(),
        };

        let pipeline = vec![
            doc! { "$group": { "_id": "$page", "count": { "$sum": 1 } } },
            doc! { "$sort": { "count": -1 } },
            doc! { "$limit": TOP_PAGES },
        ];

        match analytics.aggregate(pipeline).await {
            Ok(cursor) => {
                let rows: Vec<Document> = cursor.try_collect().await.unwrap_or_default();
                summary.views_by_page = rows
                    .iter()
                    .filter_map(|row| {
                        let page = row.get_str("_id").ok()?.to_string();
                        let views = to_i64(row.get("count")).max(0) as u64;
                        Some(PageViews { page, views })
                    })
                    .collect();
            }
            Err(e) => warn!("Analytics aggregation failed: {e}"),
        }

        summary
    }

    /// Fresh round-trip to the server. A failed ping evicts the cached
    /// handle so the next operation re-dials.
    pub async fn is_connected(&self) -> bool {
        let Some(db) = self.database().await else {
            return false;
        };

        match db.run_command(doc! { "ping": 1 }).await {
            Ok(_) => true,
            Err(e) => {
                warn!("Database ping failed: {e}");
                *self.handle.write().await = None;
                false
            }
        }
    }

    pub async fn stats(&self) -> StoreStats {
        let Some(db) = self.database().await else {
            return StoreStats::default();
        };

        let collections = db.list_collection_names().await.unwrap_or_default();

        match db.run_command(doc! { "dbStats": 1 }).await {
            Ok(stats) => StoreStats {
                connected: true,
                database: Some(db.name().to_string()),
                collections,
                storage_size: to_i64(stats.get("storageSize")),
                data_size: to_i64(stats.get("dataSize")),
            },
            Err(e) => {
                warn!("dbStats failed: {e}");
                StoreStats::default()
            }
        }
    }
}

async fn connect(uri: &str, db_name: &str) -> Result<Database, mongodb::error::Error> {
    let mut options = ClientOptions::parse(uri).await?;
    options.server_selection_timeout = Some(CONNECT_TIMEOUT);

    let client = Client::with_options(options)?;
    // Round-trip before caching so a bad URI fails here, not on first use.
    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await?;

    Ok(client.database(db_name))
}

// dbStats and $sum results come back as whatever width the server picked.
fn to_i64(value: Option<&Bson>) -> i64 {
    match value {
        Some(Bson::Int32(v)) => i64::from(*v),
        Some(Bson::Int64(v)) => *v,
        Some(Bson::Double(v)) => *v as i64,
        _ => 0,
    }
}
