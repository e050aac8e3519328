//! Single-use flash messages with time-based expiry.
//!
//! A mutating request stores one message per session; the next list page
//! takes it. Messages older than the TTL are treated as absent and purged
//! by [`FlashStore::purge_expired`].

use super::SessionId;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};
use tracing::warn;

type Slots = HashMap<SessionId, FlashEntry>;

#[derive(Debug, Clone)]
struct FlashEntry {
    message: String,
    set_at: Instant,
}

/// Server-side flash slots keyed by session.
///
/// Each session has exactly one slot (`msg`); setting it again replaces the
/// pending message. Clones share the same slots.
#[derive(Clone)]
pub struct FlashStore {
    slots: Arc<RwLock<Slots>>,
    ttl: Duration,
}

impl FlashStore {
    /// Create a store whose messages live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            slots: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Write access to the slots.
    ///
    /// Each critical section is one map operation; a poisoned lock is logged
    /// and recovered.
    fn write(&self) -> RwLockWriteGuard<'_, Slots> {
        self.slots.write().unwrap_or_else(|poisoned| {
            warn!("flash store lock was poisoned; recovering");
            PoisonError::into_inner(poisoned)
        })
    }

    fn read(&self) -> RwLockReadGuard<'_, Slots> {
        self.slots.read().unwrap_or_else(|poisoned| {
            warn!("flash store lock was poisoned; recovering");
            PoisonError::into_inner(poisoned)
        })
    }

    /// Put `message` in the session's slot.
    pub fn set(&self, session: &SessionId, message: impl Into<String>) {
        let entry = FlashEntry {
            message: message.into(),
            set_at: Instant::now(),
        };
        self.write().insert(session.clone(), entry);
    }

    /// Remove and return the session's message if it has not expired.
    ///
    /// An expired message is discarded and `None` is returned.
    pub fn take(&self, session: &SessionId) -> Option<String> {
        let entry = self.write().remove(session)?;

        if entry.set_at.elapsed() < self.ttl {
            Some(entry.message)
        } else {
            None
        }
    }

    /// Drop every expired message. Returns how many were dropped.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut slots = self.write();
        let before = slots.len();
        slots.retain(|_, entry| now.duration_since(entry.set_at) < self.ttl);
        before - slots.len()
    }

    /// Number of pending messages (including expired ones).
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for FlashStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlashStore")
            .field("ttl", &self.ttl)
            .field("pending", &self.len())
            .finish()
    }
}
