//! Live sessions, one per phone number.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use crate::error::DatabaseError;
use crate::store::UserStore;

use super::state::Session;

/// Shared handle to one user's session.
///
/// Holding the lock for a whole exchange keeps two messages from the same
/// user from interleaving.
pub type SessionHandle = Arc<Mutex<Session>>;

struct SessionEntry {
    handle: SessionHandle,
    last_used: Instant,
}

/// Keeps sessions for users the bot is talking to.
pub struct SessionRegistry {
    store: Arc<dyn UserStore>,
    sessions: RwLock<HashMap<String, SessionEntry>>,
}

impl SessionRegistry {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self {
            store,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Session for `phone`, loading the record on first contact.
    ///
    /// Returns `None` when no registered user has this phone.
    pub async fn get_or_load(&self, phone: &str) -> Result<Option<SessionHandle>, DatabaseError> {
        if let Some(entry) = self.sessions.write().await.get_mut(phone) {
            entry.last_used = Instant::now();
            return Ok(Some(Arc::clone(&entry.handle)));
        }

        let Some(user) = self.store.find_by_phone(phone).await? else {
            return Ok(None);
        };

        let mut sessions = self.sessions.write().await;
        // Another request may have loaded it while the store was queried.
        let entry = sessions.entry(phone.to_string()).or_insert_with(|| {
            debug!(phone, "Session created");
            SessionEntry {
                handle: Arc::new(Mutex::new(Session::new(user))),
                last_used: Instant::now(),
            }
        });
        entry.last_used = Instant::now();
        Ok(Some(Arc::clone(&entry.handle)))
    }

    /// Drop the session; the next message starts fresh from the store.
    pub async fn end(&self, phone: &str) -> bool {
        self.sessions.write().await.remove(phone).is_some()
    }

    /// Drop sessions untouched for at least `idle`. Returns how many went.
    ///
    /// A session whose handle is still held by a request is kept.
    pub async fn prune_idle(&self, idle: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| {
            entry.last_used.elapsed() < idle || Arc::strong_count(&entry.handle) > 1
        });
        let pruned = before - sessions.len();
        if pruned > 0 {
            info!(pruned, remaining = sessions.len(), "Pruned idle sessions");
        }
        pruned
    }

    pub async fn active_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::UserRecord;
    use crate::store::InMemoryUserStore;

    fn registry() -> SessionRegistry {
        let store = InMemoryUserStore::with_users([UserRecord::new("91", "Asha", "a@x.com")]);
        SessionRegistry::new(Arc::new(store))
    }

    #[tokio::test]
    async fn unknown_phone_has_no_session() {
        let registry = registry();
        assert!(registry.get_or_load("00").await.unwrap().is_none());
        assert_eq!(registry.active_count().await, 0);
    }

    #[tokio::test]
    async fn sessions_are_shared_per_phone() {
        let registry = registry();
        let a = registry.get_or_load("91").await.unwrap().unwrap();
        a.lock().await.profile_skipped = true;

        let b = registry.get_or_load("91").await.unwrap().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(b.lock().await.profile_skipped);

        assert!(registry.end("91").await);
        let c = registry.get_or_load("91").await.unwrap().unwrap();
        assert!(!c.lock().await.profile_skipped);
    }

    #[tokio::test]
    async fn idle_sessions_are_pruned() {
        let store = InMemoryUserStore::with_users([
            UserRecord::new("91", "Asha", "a@x.com"),
            UserRecord::new("92", "Ravi", "r@x.com"),
        ]);
        let registry = SessionRegistry::new(Arc::new(store));
        drop(registry.get_or_load("91").await.unwrap());
        drop(registry.get_or_load("92").await.unwrap());
        assert_eq!(registry.active_count().await, 2);

        assert_eq!(registry.prune_idle(Duration::from_secs(3600)).await, 0);
        assert_eq!(registry.active_count().await, 2);

        assert_eq!(registry.prune_idle(Duration::ZERO).await, 2);
        assert_eq!(registry.active_count().await, 0);
    }

    #[tokio::test]
    async fn held_session_survives_pruning() {
        let registry = registry();
        let held = registry.get_or_load("91").await.unwrap().unwrap();
        held.lock().await.profile_skipped = true;

        assert_eq!(registry.prune_idle(Duration::ZERO).await, 0);
        let again = registry.get_or_load("91").await.unwrap().unwrap();
        assert!(Arc::ptr_eq(&held, &again));
        assert!(again.lock().await.profile_skipped);
    }

    #[tokio::test]
    async fn pruned_session_reloads_from_store() {
        let registry = registry();
        let first = registry.get_or_load("91").await.unwrap().unwrap();
        first.lock().await.profile_skipped = true;
        drop(first);

        registry.prune_idle(Duration::ZERO).await;
        let fresh = registry.get_or_load("91").await.unwrap().unwrap();
        assert!(!fresh.lock().await.profile_skipped);
    }
}
