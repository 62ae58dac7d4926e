// src/handlers/books.rs

use axum::{Json, extract::State, response::IntoResponse};

use crate::{models::book::BookSummary, state::AppState};

/// Lists the books that have a quiz, with the size of each bank.
pub async fn list_books(State(state): State<AppState>) -> impl IntoResponse {
    let books: Vec<BookSummary> = state
        .library
        .banks()
        .into_iter()
        .map(BookSummary::from)
        .collect();

    Json(books)
}
