// src/services/progress_store.rs

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    error::AppError,
    models::{
        book::BookId,
        progress::{AnswerRecord, LeaderboardEntry, ProgressSnapshot, QuestionResult},
    },
};

/// Remote record of what users have answered.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Every stored attempt of `user_id` for `book`.
    async fn fetch_results(&self, user_id: i64, book: BookId)
    -> Result<Vec<QuestionResult>, AppError>;

    async fn fetch_snapshot(&self, user_id: i64, book: BookId) -> Result<ProgressSnapshot, AppError> {
        Ok(ProgressSnapshot::from_results(
            self.fetch_results(user_id, book).await?,
        ))
    }

    async fn record_answer(&self, record: &AnswerRecord) -> Result<(), AppError>;

    /// Bumps the user's "questions answered" counter and returns the new value.
    async fn increment_answered(&self, user_id: i64) -> Result<i64, AppError>;

    async fn answered_count(&self, user_id: i64) -> Result<i64, AppError>;

    async fn leaderboard(&self, limit: i64) -> Result<Vec<LeaderboardEntry>, AppError>;
}

/// PostgreSQL backed store ('quiz_results' and 'user_stats' tables).
#[derive(Clone)]
pub struct PgProgressStore {
    pool: PgPool,
}

impl PgProgressStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProgressStore for PgProgressStore {
    async fn fetch_results(
        &self,
        user_id: i64,
        book: BookId,
    ) -> Result<Vec<QuestionResult>, AppError> {
        let results = sqlx::query_as::<_, QuestionResult>(
            r#"
            SELECT question_id, is_correct
            FROM quiz_results
            WHERE user_id = $1 AND book = $2
            "#,
        )
        .bind(user_id)
        .bind(book.slug())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch quiz results: {:?}", e);
            AppError::from(e)
        })?;

        Ok(results)
    }

    async fn record_answer(&self, record: &AnswerRecord) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO quiz_results (user_id, question_id, username, is_correct, book)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(record.user_id)
        .bind(record.question_id)
        .bind(&record.username)
        .bind(record.is_correct)
        .bind(record.book.slug())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn increment_answered(&self, user_id: i64) -> Result<i64, AppError> {
        // Single statement upsert, so concurrent answers never lose an increment.
        let (count,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO user_stats (user_id, questions_answered)
            VALUES ($1, 1)
            ON CONFLICT (user_id) DO UPDATE SET
                questions_answered = user_stats.questions_answered + 1,
                updated_at = CURRENT_TIMESTAMP
            RETURNING questions_answered
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn answered_count(&self, user_id: i64) -> Result<i64, AppError> {
        let count: Option<(i64,)> =
            sqlx::query_as("SELECT questions_answered FROM user_stats WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(count.map(|(n,)| n).unwrap_or(0))
    }

    async fn leaderboard(&self, limit: i64) -> Result<Vec<LeaderboardEntry>, AppError> {
        let entries = sqlx::query_as::<_, LeaderboardEntry>(
            r#"
            SELECT
                u.username,
                s.questions_answered,
                s.updated_at
            FROM user_stats s
            JOIN users u ON s.user_id = u.id
            ORDER BY s.questions_answered DESC, s.updated_at ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch leaderboard: {:?}", e);
            AppError::from(e)
        })?;

        Ok(entries)
    }
}
