// src/models/session.rs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    models::{book::BookId, question::PublicQuestion},
    quiz::{
        grade::FinalScore,
        session::{Phase, QuizSession},
    },
};

/// DTO returned when a session starts.
#[derive(Debug, Serialize, Deserialize)]
pub struct StartSessionResponse {
    pub session_id: Uuid,
    pub book: BookId,
    /// In the order they will be asked.
    pub questions: Vec<PublicQuestion>,
}

/// DTO for answering the current question.
#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    /// Option label, e.g. "B".
    pub label: char,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    InProgress,
    Completed,
}

/// What the client shows after answering.
#[derive(Debug, Serialize, Deserialize)]
pub struct Reveal {
    pub selected: char,
    pub correct: char,
    pub is_correct: bool,
    pub explanation: String,
    /// `None` while the lookup is still in flight; empty if it failed.
    pub verse_text: Option<String>,
}

/// Snapshot of a session for the client.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub book: BookId,
    pub status: SessionStatus,
    pub position: usize,
    pub total: usize,
    pub score: usize,
    pub current: Option<PublicQuestion>,
    pub reveal: Option<Reveal>,
    pub result: Option<FinalScore>,
}

impl SessionView {
    pub fn new(session_id: Uuid, session: &QuizSession) -> Self {
        let current = session.current_question();

        let reveal = match (session.phase(), current, session.selected_answer()) {
            (Phase::Revealed, Some(q), Some(selected)) => Some(Reveal {
                selected,
                correct: q.correct,
                is_correct: q.is_correct(selected),
                explanation: q.explanation.clone(),
                verse_text: q.verse_text.clone(),
            }),
            _ => None,
        };

        let status = if session.is_completed() {
            SessionStatus::Completed
        } else {
            SessionStatus::InProgress
        };

        Self {
            session_id,
            book: session.book(),
            status,
            position: session.position(),
            total: session.len(),
            score: session.score(),
            current: current.map(PublicQuestion::from),
            reveal,
            result: session.is_completed().then(|| session.final_score()),
        }
    }
}
