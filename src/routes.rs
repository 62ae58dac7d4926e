// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{auth, books, progress, quiz},
    state::AppState,
    utils::jwt::{auth_middleware, identity_middleware},
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (auth, books, quiz, progress).
/// * Quiz sessions accept anonymous callers; progress requires a token.
/// * Applies global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        HeaderValue::from_static("http://localhost:3000"),
        HeaderValue::from_static("http://127.0.0.1:3000"),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    let book_routes = Router::new().route("/", get(books::list_books));

    let quiz_routes = Router::new()
        .route("/leaderboard", get(quiz::get_leaderboard))
        // Sessions: signing in is optional
        .merge(
            Router::new()
                .route("/{book}/sessions", post(quiz::start_session))
                .route(
                    "/sessions/{id}",
                    get(quiz::get_session).delete(quiz::end_session),
                )
                .route("/sessions/{id}/answer", post(quiz::answer_question))
                .route("/sessions/{id}/advance", post(quiz::advance_session))
                .route_layer(middleware::from_fn_with_state(
                    state.clone(),
                    identity_middleware,
                )),
        );

    let progress_routes = Router::new()
        .route("/me", get(progress::get_me))
        .route("/{book}", get(progress::get_book_progress))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/books", book_routes)
        .nest("/api/quiz", quiz_routes)
        .nest("/api/progress", progress_routes)
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
