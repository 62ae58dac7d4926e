// src/quiz/registry.rs

use std::{collections::HashMap, sync::Arc, time::Duration};

use tokio::{sync::RwLock, time::Instant};
use uuid::Uuid;

use crate::{error::AppError, models::user::UserIdentity, quiz::session::QuizSession};

/// A running session together with the identity it was started for.
#[derive(Debug, Clone)]
pub struct ActiveSession {
    pub session: QuizSession,
    /// `None` for anonymous play. Progress is then never reported.
    pub identity: Option<UserIdentity>,
    last_touched: Instant,
}

/// In-memory store of the sessions of this server process.
///
/// The lock is never held across I/O. Callers mutate through closures.
#[derive(Debug, Clone)]
pub struct SessionRegistry {
    inner: Arc<RwLock<HashMap<Uuid, ActiveSession>>>,
    ttl: Duration,
}

impl SessionRegistry {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Registers a session and purges idle ones.
    pub async fn insert(&self, session: QuizSession, identity: Option<UserIdentity>) -> Uuid {
        let id = Uuid::new_v4();
        let now = Instant::now();
        let mut sessions = self.inner.write().await;

        let before = sessions.len();
        sessions.retain(|_, s| now.duration_since(s.last_touched) < self.ttl);
        let purged = before - sessions.len();
        if purged > 0 {
            tracing::debug!("Purged {} idle quiz sessions", purged);
        }

        sessions.insert(
            id,
            ActiveSession {
                session,
                identity,
                last_touched: now,
            },
        );
        id
    }

    /// Runs `f` against the session, marking it as recently used.
    pub async fn update<T, F>(&self, id: Uuid, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut ActiveSession) -> Result<T, AppError>,
    {
        let mut sessions = self.inner.write().await;
        let active = sessions
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Quiz session {} not found", id)))?;
        active.last_touched = Instant::now();
        f(active)
    }

    pub async fn view<T, F>(&self, id: Uuid, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&ActiveSession) -> T,
    {
        let sessions = self.inner.read().await;
        sessions
            .get(&id)
            .map(f)
            .ok_or_else(|| AppError::NotFound(format!("Quiz session {} not found", id)))
    }

    /// Drops the session. Returns whether it existed.
    pub async fn remove(&self, id: Uuid) -> bool {
        self.inner.write().await.remove(&id).is_some()
    }

    /// Stores resolved verse text if the session is still alive.
    pub async fn attach_verse_text(&self, id: Uuid, question_id: i64, text: String) -> bool {
        let mut sessions = self.inner.write().await;
        match sessions.get_mut(&id) {
            Some(active) => active.session.attach_verse_text(question_id, text),
            None => false,
        }
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}
