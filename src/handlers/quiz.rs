// src/handlers/quiz.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use crate::{
    config::{LEADERBOARD_SIZE, SESSION_QUESTION_COUNT},
    error::AppError,
    models::{
        book::BookId,
        progress::ProgressSnapshot,
        question::PublicQuestion,
        session::{AnswerRequest, SessionView, StartSessionResponse},
        user::UserIdentity,
    },
    quiz::{
        registry::ActiveSession,
        selector::select_questions,
        session::{Advance, QuizSession},
    },
    state::AppState,
    utils::jwt::Viewer,
};

/// Starts a quiz session for a book.
///
/// * Signed-in callers get questions they have not yet answered correctly first.
/// * The snapshot fetch is bounded; on timeout or failure the whole bank is used.
/// * Returns the session id and the questions in order, without answers.
pub async fn start_session(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Path(book): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let book: BookId = book.parse()?;
    let bank = state.library.bank(book)?;

    let snapshot = match &viewer.0 {
        Some(identity) => load_snapshot(&state, identity, book).await,
        None => None,
    };

    let questions = {
        let mut rng = rand::thread_rng();
        select_questions(
            bank.questions(),
            snapshot.as_ref(),
            SESSION_QUESTION_COUNT,
            &mut rng,
        )?
    };

    let mut session = QuizSession::new(book);
    session.start(questions)?;
    let public: Vec<PublicQuestion> = session.questions().iter().map(PublicQuestion::from).collect();

    let user_id = viewer.0.as_ref().map(|i| i.user_id);
    let session_id = state.sessions.insert(session, viewer.0).await;
    tracing::info!(
        "Started {} quiz session {} with {} questions (user: {:?})",
        book,
        session_id,
        public.len(),
        user_id
    );

    Ok((
        StatusCode::CREATED,
        Json(StartSessionResponse {
            session_id,
            book,
            questions: public,
        }),
    ))
}

/// Returns the current state of a session.
pub async fn get_session(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let view = state
        .sessions
        .view(session_id, |active| {
            ensure_owner(session_id, active, &viewer)?;
            Ok::<_, AppError>(SessionView::new(session_id, &active.session))
        })
        .await??;

    Ok(Json(view))
}

/// Answers the current question and reveals the result.
///
/// Only the first answer to a question counts; repeats return the same reveal.
/// Progress reporting and verse lookup run in the background.
pub async fn answer_question(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Path(session_id): Path<Uuid>,
    Json(req): Json<AnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (view, events, identity) = state
        .sessions
        .update(session_id, |active| {
            ensure_owner(session_id, active, &viewer)?;
            let events = active.session.select_answer(req.label)?;
            Ok((
                SessionView::new(session_id, &active.session),
                events,
                active.identity.clone(),
            ))
        })
        .await?;

    state
        .dispatcher()
        .dispatch(session_id, identity.as_ref(), events);

    Ok(Json(view))
}

/// Moves to the next question, or completes the session after the last one.
pub async fn advance_session(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let (step, view) = state
        .sessions
        .update(session_id, |active| {
            ensure_owner(session_id, active, &viewer)?;
            let step = active.session.advance()?;
            Ok((step, SessionView::new(session_id, &active.session)))
        })
        .await?;

    if let Advance::Completed(score) = step {
        tracing::info!(
            "Quiz session {} completed: {}/{} ({:?})",
            session_id,
            score.correct,
            score.total,
            score.band
        );
    }

    Ok(Json(view))
}

/// Discards a session (the client left the quiz).
pub async fn end_session(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    state
        .sessions
        .view(session_id, |active| ensure_owner(session_id, active, &viewer))
        .await??;

    state.sessions.remove(session_id).await;
    Ok(StatusCode::NO_CONTENT)
}

/// Retrieves the users who answered the most questions.
pub async fn get_leaderboard(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let leaderboard = state.progress.leaderboard(LEADERBOARD_SIZE).await?;
    Ok(Json(leaderboard))
}

/// Fetches what the user already mastered, giving up after the configured wait.
async fn load_snapshot(
    state: &AppState,
    identity: &UserIdentity,
    book: BookId,
) -> Option<ProgressSnapshot> {
    let fetch = state.progress.fetch_snapshot(identity.user_id, book);
    match tokio::time::timeout(state.config.snapshot_timeout, fetch).await {
        Ok(Ok(snapshot)) => Some(snapshot),
        Ok(Err(e)) => {
            tracing::warn!(
                "Progress snapshot for user {} ({}) unavailable: {}",
                identity.user_id,
                book,
                e
            );
            None
        }
        Err(_) => {
            tracing::warn!(
                "Progress snapshot for user {} ({}) timed out after {:?}",
                identity.user_id,
                book,
                state.config.snapshot_timeout
            );
            None
        }
    }
}

/// Sessions started while signed in belong to that user.
/// Others get the same answer as for a missing session.
fn ensure_owner(session_id: Uuid, active: &ActiveSession, viewer: &Viewer) -> Result<(), AppError> {
    match &active.identity {
        None => Ok(()),
        Some(owner) if viewer.0.as_ref().map(|v| v.user_id) == Some(owner.user_id) => Ok(()),
        Some(_) => Err(AppError::NotFound(format!(
            "Quiz session {} not found",
            session_id
        ))),
    }
}
