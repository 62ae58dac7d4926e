use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::{
    config::Config,
    error::AppError,
    models::book::Library,
    quiz::{dispatch::EventDispatcher, registry::SessionRegistry},
    services::{
        progress_store::{PgProgressStore, ProgressStore},
        verse_lookup::{HttpVerseLookup, VerseLookup},
    },
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
    pub library: Arc<Library>,
    pub sessions: SessionRegistry,
    pub progress: Arc<dyn ProgressStore>,
    pub verses: Arc<dyn VerseLookup>,
}

impl AppState {
    /// Wires the production adapters: PostgreSQL progress and HTTP verse lookup.
    pub fn new(pool: PgPool, config: Config, library: Library) -> Result<Self, AppError> {
        let verses = HttpVerseLookup::new(&config.verse_api_url, config.verse_timeout)?;
        Ok(Self {
            progress: Arc::new(PgProgressStore::new(pool.clone())),
            verses: Arc::new(verses),
            sessions: SessionRegistry::new(config.session_ttl),
            library: Arc::new(library),
            pool,
            config,
        })
    }

    pub fn dispatcher(&self) -> EventDispatcher {
        EventDispatcher {
            progress: Arc::clone(&self.progress),
            verses: Arc::clone(&self.verses),
            sessions: self.sessions.clone(),
        }
    }
}

impl FromRef<AppState> for PgPool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
