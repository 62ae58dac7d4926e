// src/handlers/progress.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::{
    error::AppError,
    models::{book::BookId, progress::BookProgress, user::MeResponse},
    state::AppState,
    utils::jwt::Claims,
};

/// Get the current user's aggregate answer counter.
pub async fn get_me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let identity = claims.identity()?;
    let questions_answered = state.progress.answered_count(identity.user_id).await?;

    Ok(Json(MeResponse {
        user_id: identity.user_id,
        display_name: identity.display_name(),
        questions_answered,
    }))
}

/// How much of one book's bank the current user has answered correctly.
pub async fn get_book_progress(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(book): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let book: BookId = book.parse()?;
    let bank = state.library.bank(book)?;
    let user_id = claims.user_id()?;

    let snapshot = state.progress.fetch_snapshot(user_id, book).await?;
    // Ids dropped from the bank since they were answered do not count.
    let mastered = bank
        .questions()
        .iter()
        .filter(|q| snapshot.answered_correctly(q.id))
        .count();

    Ok(Json(BookProgress {
        book,
        mastered,
        total: bank.len(),
    }))
}
