//! Process-Wide Session Registry
//!
//! Keyed store holding live sessions between requests. Lookups share
//! the map's read lock while inserts take it exclusively; each entry
//! carries its own mutex so advancing one session never blocks work on
//! another. The table stays bounded: inserts sweep out idle sessions
//! and evict the oldest past a hard cap.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use uuid::Uuid;

use super::Session;

/// Sessions idle longer than this are dropped at the next sweep.
const DEFAULT_TTL_MINUTES: i64 = 120;

/// Hard cap on live sessions; the least recently touched are evicted
/// past this.
const DEFAULT_CAPACITY: usize = 4096;

struct Entry {
    session: Session,
    touched_at: DateTime<Utc>,
}

/// Bounded, thread-safe store of live sessions keyed by session id.
pub struct SessionRegistry {
    ttl: Duration,
    capacity: usize,
    entries: RwLock<HashMap<String, Arc<Mutex<Entry>>>>,
}

impl SessionRegistry {
    /// Registry with the default idle TTL and capacity.
    pub fn new() -> Self {
        Self::with_limits(Duration::minutes(DEFAULT_TTL_MINUTES), DEFAULT_CAPACITY)
    }

    /// Registry with explicit bounds.
    pub fn with_limits(ttl: Duration, capacity: usize) -> Self {
        Self {
            ttl,
            capacity,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Store a session and hand back its id.
    pub fn insert(&self, session: Session) -> String {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        // A poisoned lock still guards consistent data; recover it
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        Self::sweep(&mut entries, now, self.ttl, self.capacity);
        entries.insert(
            id.clone(),
            Arc::new(Mutex::new(Entry {
                session,
                touched_at: now,
            })),
        );

        tracing::debug!(session_id = %id, live = entries.len(), "session stored");
        id
    }

    /// Run `f` against the named session, refreshing its idle clock.
    /// Returns `None` for unknown or expired ids.
    pub fn with_session<T>(&self, id: &str, f: impl FnOnce(&mut Session) -> T) -> Option<T> {
        let entry = {
            let entries = self
                .entries
                .read()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            entries.get(id).cloned()
        }?;

        let mut entry = entry
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let now = Utc::now();
        if now - entry.touched_at > self.ttl {
            // Expired but not yet swept; report it gone
            return None;
        }
        entry.touched_at = now;
        Some(f(&mut entry.session))
    }

    /// Number of stored sessions, expired stragglers included.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// Whether the registry holds no sessions.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop expired entries, then evict the least recently touched
    /// until one slot is free.
    fn sweep(
        entries: &mut HashMap<String, Arc<Mutex<Entry>>>,
        now: DateTime<Utc>,
        ttl: Duration,
        capacity: usize,
    ) {
        let touched = |entry: &Arc<Mutex<Entry>>| {
            entry
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .touched_at
        };

        entries.retain(|_, entry| now - touched(entry) <= ttl);

        while entries.len() >= capacity {
            let oldest = entries
                .iter()
                .min_by_key(|(_, entry)| touched(entry))
                .map(|(id, _)| id.clone());
            match oldest {
                Some(id) => {
                    tracing::debug!(session_id = %id, "evicting oldest session");
                    entries.remove(&id);
                }
                None => break,
            }
        }
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::ReviewType;
    use crate::session::SessionItem;

    fn session(user_id: &str, items: usize) -> Session {
        let items = (0..items)
            .map(|i| SessionItem {
                word_id: format!("w{i}"),
                review_type: ReviewType::Mcq,
                priority_score: 70.0,
                reason: "test".to_string(),
            })
            .collect();
        Session::new(user_id, items)
    }

    #[test]
    fn test_insert_and_lookup() {
        let registry = SessionRegistry::new();
        let id = registry.insert(session("u1", 2));

        let user = registry.with_session(&id, |s| s.user_id().to_string());
        assert_eq!(user.as_deref(), Some("u1"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unknown_id_is_none() {
        let registry = SessionRegistry::new();
        assert!(registry.with_session("missing", |_| ()).is_none());
    }

    #[test]
    fn test_cursor_mutations_persist_between_lookups() {
        let registry = SessionRegistry::new();
        let id = registry.insert(session("u1", 2));

        assert!(registry.with_session(&id, |s| s.advance()).is_some());
        let position = registry.with_session(&id, |s| s.position());
        assert_eq!(position, Some(1));

        assert!(registry.with_session(&id, |s| s.advance()).is_some());
        let done = registry.with_session(&id, |s| s.done());
        assert_eq!(done, Some(true));
    }

    #[test]
    fn test_expired_sessions_are_gone() {
        let registry = SessionRegistry::with_limits(Duration::zero(), 16);
        let id = registry.insert(session("u1", 1));

        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(registry.with_session(&id, |_| ()).is_none());

        // The next insert sweeps the stale entry out
        registry.insert(session("u2", 1));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_capacity_is_enforced() {
        let registry = SessionRegistry::with_limits(Duration::minutes(60), 2);
        registry.insert(session("u1", 1));
        registry.insert(session("u2", 1));
        let newest = registry.insert(session("u3", 1));

        assert!(registry.len() <= 2);
        assert!(registry.with_session(&newest, |_| ()).is_some());
    }

    #[test]
    fn test_sessions_are_independent() {
        let registry = SessionRegistry::new();
        let first = registry.insert(session("u1", 3));
        let second = registry.insert(session("u2", 3));

        assert!(registry
            .with_session(&first, |s| {
                s.advance();
                s.advance();
            })
            .is_some());

        assert_eq!(registry.with_session(&first, |s| s.position()), Some(2));
        assert_eq!(registry.with_session(&second, |s| s.position()), Some(0));
    }
}
