// src/models/progress.rs

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::book::BookId;

/// One stored answer, as read back from the 'quiz_results' table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct QuestionResult {
    pub question_id: i64,
    pub is_correct: bool,
}

/// A single answer to be persisted. Emitted once per answered question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub user_id: i64,
    pub question_id: i64,
    pub username: String,
    pub is_correct: bool,
    pub book: BookId,
}

/// Question ids a user has answered correctly for one book.
/// Fetched once when a session starts and never refreshed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressSnapshot {
    correct: HashSet<i64>,
}

impl ProgressSnapshot {
    /// Folds stored results into a snapshot. Incorrect attempts are ignored.
    pub fn from_results<I>(results: I) -> Self
    where
        I: IntoIterator<Item = QuestionResult>,
    {
        Self {
            correct: results
                .into_iter()
                .filter(|r| r.is_correct)
                .map(|r| r.question_id)
                .collect(),
        }
    }

    pub fn from_ids<I: IntoIterator<Item = i64>>(ids: I) -> Self {
        Self {
            correct: ids.into_iter().collect(),
        }
    }

    pub fn answered_correctly(&self, question_id: i64) -> bool {
        self.correct.contains(&question_id)
    }

    pub fn len(&self) -> usize {
        self.correct.len()
    }

    pub fn is_empty(&self) -> bool {
        self.correct.is_empty()
    }
}

/// Aggregated struct for displaying the leaderboard.
/// Represents a row joined from `users` and `user_stats`.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct LeaderboardEntry {
    pub username: String,
    pub questions_answered: i64,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Per-book mastery for the current user.
#[derive(Debug, Serialize, Deserialize)]
pub struct BookProgress {
    pub book: BookId,
    /// Distinct bank questions answered correctly at least once.
    pub mastered: usize,
    pub total: usize,
}
