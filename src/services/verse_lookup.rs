// src/services/verse_lookup.rs

use std::{sync::LazyLock, time::Duration};

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use url::Url;

use crate::{error::AppError, quiz::reference::normalize_reference};

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static regex"));

/// Fetches display text for a single scripture reference.
#[async_trait]
pub trait VerseLookup: Send + Sync {
    async fn fetch(&self, reference: &str) -> Result<String, AppError>;
}

/// Client for a bible-api.com style service: `GET {base}/{reference}`.
#[derive(Clone)]
pub struct HttpVerseLookup {
    client: reqwest::Client,
    base_url: Url,
}

#[derive(Deserialize)]
struct VersePayload {
    text: String,
}

impl HttpVerseLookup {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AppError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| AppError::InternalServerError(format!("Invalid verse API URL: {}", e)))?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::InternalServerError(format!(
                "Verse API URL cannot be a base: {}",
                base_url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::InternalServerError(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// Request URL for `reference`, percent-encoded as one path segment.
    pub fn url_for(&self, reference: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(reference);
        }
        url
    }
}

#[async_trait]
impl VerseLookup for HttpVerseLookup {
    #[tracing::instrument(skip(self))]
    async fn fetch(&self, reference: &str) -> Result<String, AppError> {
        let response = self
            .client
            .get(self.url_for(reference))
            .send()
            .await?
            .error_for_status()?;

        let payload: VersePayload = response.json().await?;
        Ok(WHITESPACE.replace_all(payload.text.trim(), " ").into_owned())
    }
}

/// Looks up the first passage of `raw_reference`.
///
/// Verse text is decorative. Any failure is logged and yields an empty string.
pub async fn resolve_verse_text(lookup: &dyn VerseLookup, raw_reference: &str) -> String {
    let reference = normalize_reference(raw_reference);
    if reference.is_empty() {
        return String::new();
    }

    match lookup.fetch(&reference).await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("Verse lookup for '{}' failed: {}", reference, e);
            String::new()
        }
    }
}
