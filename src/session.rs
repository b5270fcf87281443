//! Admin session tokens.
//!
//! A successful credential check mints an opaque token; the token is the
//! capability that unlocks the admin endpoints. Sessions live in process
//! memory only and expire after [`SESSION_TTL_HOURS`].

use std::{collections::HashMap, sync::RwLock};

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

pub const SESSION_TTL_HOURS: i64 = 8;

#[derive(Debug)]
struct Session {
    username: String,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct Sessions {
    inner: RwLock<HashMap<String, Session>>,
}

impl Sessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self, username: &str) -> String {
        let token = Uuid::new_v4().to_string();
        let now = Utc::now();
        let session = Session {
            username: username.to_string(),
            expires_at: now + Duration::hours(SESSION_TTL_HOURS),
        };

        let mut sessions = self.inner.write().expect("session table poisoned");
        // Abandoned logins would otherwise pile up forever.
        sessions.retain(|_, session| session.expires_at > now);
        sessions.insert(token.clone(), session);

        token
    }

    /// True for a live token. Expired tokens are removed on sight.
    pub fn verify(&self, token: &str) -> bool {
        let mut sessions = self.inner.write().expect("session table poisoned");

        match sessions.get(token) {
            Some(session) if session.expires_at > Utc::now() => true,
            Some(_) => {
                sessions.remove(token);
                false
            }
            None => false,
        }
    }

    pub fn revoke(&self, token: &str) -> bool {
        self.inner
            .write()
            .expect("session table poisoned")
            .remove(token)
            .is_some()
    }

    pub fn username(&self, token: &str) -> Option<String> {
        self.inner
            .read()
            .expect("session table poisoned")
            .get(token)
            .map(|s| s.username.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_verifies_until_revoked() {
        let sessions = Sessions::new();
        let token = sessions.issue("admin");

        assert!(sessions.verify(&token));
        assert_eq!(sessions.username(&token).as_deref(), Some("admin"));

        assert!(sessions.revoke(&token));
        assert!(!sessions.verify(&token));
        assert!(!sessions.revoke(&token));
    }

    #[test]
    fn unknown_token_is_rejected() {
        let sessions = Sessions::new();
        assert!(!sessions.verify("made-up"));
    }

    #[test]
    fn tokens_are_unique() {
        let sessions = Sessions::new();
        assert_ne!(sessions.issue("admin"), sessions.issue("admin"));
    }

    #[test]
    fn issue_sweeps_expired_sessions() {
        let sessions = Sessions::new();
        sessions.inner.write().unwrap().insert(
            "stale".to_string(),
            Session {
                username: "admin".to_string(),
                expires_at: Utc::now() - Duration::hours(1),
            },
        );

        let token = sessions.issue("admin");

        let table = sessions.inner.read().unwrap();
        assert!(!table.contains_key("stale"));
        assert!(table.contains_key(&token));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn expired_token_is_rejected_and_removed() {
        let sessions = Sessions::new();
        sessions.inner.write().unwrap().insert(
            "stale".to_string(),
            Session {
                username: "admin".to_string(),
                expires_at: Utc::now() - Duration::hours(1),
            },
        );

        assert!(!sessions.verify("stale"));
        assert!(sessions.inner.read().unwrap().is_empty());
    }
}
