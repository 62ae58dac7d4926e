// src/quiz/dispatch.rs

//! Routes session events to the I/O adapters as detached tasks.
//!
//! Neither kind of task can fail the session: answers are reported best
//! effort and verse lookups fall back to empty text.

use std::sync::Arc;

use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::{
    models::{progress::AnswerRecord, user::UserIdentity},
    quiz::{registry::SessionRegistry, session::SessionEvent},
    services::{
        progress_store::ProgressStore,
        verse_lookup::{VerseLookup, resolve_verse_text},
    },
};

#[derive(Clone)]
pub struct EventDispatcher {
    pub progress: Arc<dyn ProgressStore>,
    pub verses: Arc<dyn VerseLookup>,
    pub sessions: SessionRegistry,
}

impl EventDispatcher {
    /// Spawns one task per event. Handles are returned for callers that
    /// want to wait; request handlers drop them.
    pub fn dispatch(
        &self,
        session_id: Uuid,
        identity: Option<&UserIdentity>,
        events: Vec<SessionEvent>,
    ) -> Vec<JoinHandle<()>> {
        let mut handles = Vec::with_capacity(events.len());

        for event in events {
            match event {
                SessionEvent::AnswerSubmitted {
                    book,
                    question_id,
                    is_correct,
                } => {
                    // Anonymous play keeps everything local.
                    let Some(identity) = identity else {
                        continue;
                    };
                    let record = AnswerRecord {
                        user_id: identity.user_id,
                        question_id,
                        username: identity.display_name(),
                        is_correct,
                        book,
                    };
                    let store = Arc::clone(&self.progress);
                    handles.push(tokio::spawn(async move {
                        report_answer(store.as_ref(), record).await;
                    }));
                }
                SessionEvent::VerseRequested {
                    question_id,
                    reference,
                } => {
                    let lookup = Arc::clone(&self.verses);
                    let sessions = self.sessions.clone();
                    handles.push(tokio::spawn(async move {
                        let text = resolve_verse_text(lookup.as_ref(), &reference).await;
                        if !sessions
                            .attach_verse_text(session_id, question_id, text)
                            .await
                        {
                            tracing::debug!(
                                "Session {} ended before verse text for question {} arrived",
                                session_id,
                                question_id
                            );
                        }
                    }));
                }
            }
        }

        handles
    }
}

/// Writes the answer, then bumps the user's aggregate counter.
/// Failures are logged and never retried.
pub async fn report_answer(store: &dyn ProgressStore, record: AnswerRecord) {
    if let Err(e) = store.record_answer(&record).await {
        tracing::warn!(
            "Failed to record answer to question {} ({}) for user {}: {}",
            record.question_id,
            record.book,
            record.user_id,
            e
        );
    }

    match store.increment_answered(record.user_id).await {
        Ok(total) => tracing::debug!("User {} has answered {} questions", record.user_id, total),
        Err(e) => tracing::warn!(
            "Failed to update answered counter for user {}: {}",
            record.user_id,
            e
        ),
    }
}
