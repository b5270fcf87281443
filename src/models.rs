//! Stored document shapes for the two Mongo collections, plus the JSON
//! views the admin endpoints return.

use mongodb::bson::{self, oid::ObjectId};
use serde::{Deserialize, Serialize};

use crate::validator::ContactFields;

/// A contact-form submission as stored in the `contacts` collection.
///
/// Everything except `read`/`read_at` is immutable once inserted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactMessage {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub body: String,
    pub created_at: bson::DateTime,
    pub read: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_at: Option<bson::DateTime>,
    pub source_ip: String,
    pub user_agent: String,
}

impl ContactMessage {
    pub fn new(fields: ContactFields, source_ip: String, user_agent: String) -> Self {
        Self {
            id: None,
            name: fields.name,
            email: fields.email,
            subject: fields.subject,
            body: fields.body,
            created_at: bson::DateTime::now(),
            read: false,
            read_at: None,
            source_ip,
            user_agent,
        }
    }
}

/// One page view in the `analytics` collection. Write-once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageViewEvent {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub page: String,
    pub path: String,
    pub referrer: Option<String>,
    pub user_agent: String,
    pub source_ip: String,
    pub timestamp: bson::DateTime,
}

impl PageViewEvent {
    pub fn new(
        page: String,
        path: String,
        referrer: Option<String>,
        user_agent: String,
        source_ip: String,
    ) -> Self {
        Self {
            id: None,
            page,
            path,
            referrer,
            user_agent,
            source_ip,
            timestamp: bson::DateTime::now(),
        }
    }
}

/// View counts for a single logical page, ordered slot in the top-10 list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageViews {
    pub page: String,
    pub views: u64,
}

/// Derived on demand from the two collections, never stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    pub total_page_views: u64,
    pub total_messages: u64,
    pub unread_messages: u64,
    pub views_by_page: Vec<PageViews>,
}

/// Backend-reported database info. `connected: false` with zeroed fields is
/// the degraded value returned when the store is unreachable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreStats {
    pub connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(default)]
    pub collections: Vec<String>,
    #[serde(default)]
    pub storage_size: i64,
    #[serde(default)]
    pub data_size: i64,
}

/// JSON shape of a message as served to the admin dashboard. Ids are hex
/// `ObjectId` strings, timestamps RFC 3339.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub body: String,
    pub created_at: String,
    pub read: bool,
    pub read_at: Option<String>,
    pub source_ip: String,
    pub user_agent: String,
}

impl From<ContactMessage> for MessageView {
    fn from(message: ContactMessage) -> Self {
        Self {
            id: message.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: message.name,
            email: message.email,
            subject: message.subject,
            body: message.body,
            created_at: rfc3339(message.created_at),
            read: message.read,
            read_at: message.read_at.map(rfc3339),
            source_ip: message.source_ip,
            user_agent: message.user_agent,
        }
    }
}

fn rfc3339(datetime: bson::DateTime) -> String {
    datetime.try_to_rfc3339_string().unwrap_or_default()
}
