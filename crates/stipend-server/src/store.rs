//! In-memory session store
//!
//! Each session sits behind its own async mutex so a slow advice call on one
//! session never blocks the map or other sessions.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use stipend_core::Session;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

/// Idle time after which a session is dropped
pub const SESSION_TIMEOUT: Duration = Duration::from_secs(60 * 60);

/// Shared handle to one session
pub type SessionHandle = Arc<Mutex<Session>>;

struct Entry {
    session: SessionHandle,
    last_activity: Instant,
}

impl Entry {
    fn is_expired(&self, timeout: Duration) -> bool {
        self.last_activity.elapsed() > timeout
    }
}

pub struct SessionStore {
    sessions: RwLock<HashMap<String, Entry>>,
    timeout: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_timeout(SESSION_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            timeout,
        }
    }

    /// Store a session and return its handle
    pub async fn insert(&self, session: Session) -> SessionHandle {
        let id = session.id().to_string();
        let handle = Arc::new(Mutex::new(session));

        let mut sessions = self.sessions.write().await;
        purge_expired(&mut sessions, self.timeout);
        sessions.insert(
            id,
            Entry {
                session: handle.clone(),
                last_activity: Instant::now(),
            },
        );
        handle
    }

    /// Look up a live session, refreshing its idle timer
    pub async fn get(&self, id: &str) -> Option<SessionHandle> {
        let mut sessions = self.sessions.write().await;
        purge_expired(&mut sessions, self.timeout);
        let entry = sessions.get_mut(id)?;
        entry.last_activity = Instant::now();
        Some(entry.session.clone())
    }

    pub async fn remove(&self, id: &str) -> bool {
        let mut sessions = self.sessions.write().await;
        purge_expired(&mut sessions, self.timeout);
        sessions.remove(id).is_some()
    }

    /// Number of live sessions
    pub async fn len(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        purge_expired(&mut sessions, self.timeout);
        sessions.len()
    }
}

/// Drop every session idle for longer than `timeout`
fn purge_expired(sessions: &mut HashMap<String, Entry>, timeout: Duration) {
    let before = sessions.len();
    sessions.retain(|_, entry| !entry.is_expired(timeout));
    let purged = before - sessions.len();
    if purged > 0 {
        debug!(purged, "Dropped expired sessions");
    }
}
