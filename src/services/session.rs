//! Per-session conversation storage.
//!
//! Each browser session owns one [`ConversationLog`]. A session ends once it
//! has been idle for longer than the configured TTL; its log is dropped at
//! that point and a later request starts a fresh session.

use crate::models::{ChatMessage, ConversationLog};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::{Duration, Instant},
};
use tracing::debug;
use uuid::Uuid;

/// Cookie carrying the session id
pub const SESSION_COOKIE: &str = "wx_session";

struct SessionEntry {
    log: ConversationLog,
    last_seen: Instant,
}

/// In-memory session store shared by all workers
///
/// The lock is only held for map operations, never across provider calls.
#[derive(Clone)]
pub struct SessionStore {
    ttl: Duration,
    sessions: Arc<Mutex<HashMap<Uuid, SessionEntry>>>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Idle time after which a session ends
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, SessionEntry>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn purge_expired(&self, sessions: &mut HashMap<Uuid, SessionEntry>, now: Instant) {
        let before = sessions.len();
        sessions.retain(|_, entry| now.duration_since(entry.last_seen) < self.ttl);
        let ended = before - sessions.len();
        if ended > 0 {
            debug!(ended, "Expired idle sessions");
        }
    }

    /// Resume the given session or start a new one.
    ///
    /// Returns the live session id and whether it was newly created. Unknown
    /// or expired ids get a fresh session.
    pub fn open(&self, requested: Option<Uuid>) -> (Uuid, bool) {
        let now = Instant::now();
        let mut sessions = self.lock();
        self.purge_expired(&mut sessions, now);

        if let Some(id) = requested
            && let Some(entry) = sessions.get_mut(&id)
        {
            entry.last_seen = now;
            return (id, false);
        }

        let id = Uuid::new_v4();
        sessions.insert(
            id,
            SessionEntry {
                log: ConversationLog::new(),
                last_seen: now,
            },
        );
        debug!(session_id = %id, "Started session");
        (id, true)
    }

    /// Snapshot of a session's conversation; empty once the session ended
    pub fn transcript(&self, id: Uuid) -> Vec<ChatMessage> {
        let mut sessions = self.lock();
        self.purge_expired(&mut sessions, Instant::now());
        sessions
            .get(&id)
            .map(|entry| entry.log.messages().to_vec())
            .unwrap_or_default()
    }

    /// Append a user/assistant exchange to a session's conversation.
    ///
    /// A session that ended while its turn was in flight is recreated so
    /// the exchange is not lost.
    pub fn record_turn(&self, id: Uuid, user_text: &str, reply: &str) -> Vec<ChatMessage> {
        let now = Instant::now();
        let mut sessions = self.lock();
        let entry = sessions.entry(id).or_insert_with(|| SessionEntry {
            log: ConversationLog::new(),
            last_seen: now,
        });
        entry.last_seen = now;
        entry.log.record_turn(user_text, reply);
        entry.log.messages().to_vec()
    }

    /// Number of live sessions
    pub fn active_sessions(&self) -> usize {
        let mut sessions = self.lock();
        self.purge_expired(&mut sessions, Instant::now());
        sessions.len()
    }
}
