// src/config.rs

use std::env;
use std::time::Duration;

use dotenvy::dotenv;

/// Number of questions drawn for a single quiz session.
pub const SESSION_QUESTION_COUNT: usize = 10;

/// Number of entries returned by the leaderboard.
pub const LEADERBOARD_SIZE: i64 = 5;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    /// Token lifetime in seconds.
    pub jwt_expiration: u64,
    pub rust_log: String,
    /// Base URL of the verse lookup service (bible-api.com compatible).
    pub verse_api_url: String,
    /// Upper bound on the progress snapshot fetch at session start.
    pub snapshot_timeout: Duration,
    /// HTTP timeout for a single verse lookup.
    pub verse_timeout: Duration,
    /// Idle sessions older than this are purged.
    pub session_ttl: Duration,
}

impl Config {
    /// Log filter from `RUST_LOG`. Read on its own so logging can start
    /// before the rest of the settings are parsed.
    pub fn log_filter() -> String {
        dotenv().ok();
        env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string())
    }

    /// Reads every setting. Invalid numeric values are logged and replaced by
    /// their defaults, so install the subscriber first.
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set");

        let jwt_secret = env::var("JWT_SECRET")
            .expect("JWT_SECRET must be set");

        let jwt_expiration = parse_or("JWT_EXPIRATION", 86_400);

        let rust_log = Self::log_filter();

        let verse_api_url = env::var("VERSE_API_URL")
            .unwrap_or_else(|_| "https://bible-api.com/".to_string());

        Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            rust_log,
            verse_api_url,
            snapshot_timeout: Duration::from_millis(parse_or("SNAPSHOT_TIMEOUT_MS", 3_000)),
            verse_timeout: Duration::from_millis(parse_or("VERSE_TIMEOUT_MS", 5_000)),
            session_ttl: Duration::from_secs(parse_or("SESSION_TTL_SECS", 3_600)),
        }
    }
}

fn parse_or(key: &str, default: u64) -> u64 {
    parse_setting(key, env::var(key).ok().as_deref(), default)
}

fn parse_setting(key: &str, raw: Option<&str>, default: u64) -> u64 {
    match raw {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring invalid {}={:?}, using {}", key, raw, default);
            default
        }),
        None => default,
    }
}
