// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! PlantNet client for species recognition.
//!
//! Handles:
//! - Multipart image upload with a fixed "leaf" organ hint
//! - Mapping transport errors, timeouts and 5xx/429 to retryable failures
//! - An offline mock backend for tests

use crate::models::SpeciesMatch;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Organ hint sent with every image.
const ORGAN_HINT: &str = "leaf";
/// Language for common names.
const RESULT_LANG: &str = "en";

/// Recognition failures surfaced to the engine.
///
/// An empty result is not an error here: it is returned as an empty list
/// and the caller decides what "no match" means.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RecognitionError {
    #[error("Recognition request timed out")]
    Timeout,

    #[error("Recognition service unavailable: {0}")]
    Unavailable(String),

    /// The upload itself is unusable. Retrying the same request cannot help.
    #[error("Invalid image content type: {0}")]
    InvalidContentType(String),
}

impl RecognitionError {
    /// Whether the same request may succeed later.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, RecognitionError::InvalidContentType(_))
    }
}

/// Check that `content_type` is a media type the multipart upload accepts.
pub fn check_content_type(content_type: &str) -> Result<(), RecognitionError> {
    Part::bytes(Vec::new())
        .mime_str(content_type)
        .map(|_| ())
        .map_err(|_| RecognitionError::InvalidContentType(content_type.to_string()))
}

/// Canned reply for the mock backend.
#[derive(Debug, Clone)]
pub enum MockReply {
    Matches(Vec<SpeciesMatch>),
    Fail(RecognitionError),
}

/// Species recognition service.
#[derive(Clone)]
pub struct RecognitionService {
    backend: Backend,
}

#[derive(Clone)]
enum Backend {
    PlantNet(PlantNetClient),
    Mock(Arc<Mutex<MockReply>>),
}

impl RecognitionService {
    /// Create a service backed by the PlantNet API.
    pub fn new(
        base_url: String,
        project: String,
        api_key: String,
        timeout: Duration,
    ) -> Result<Self, RecognitionError> {
        let client = PlantNetClient::new(base_url, project, api_key, timeout)?;
        Ok(Self {
            backend: Backend::PlantNet(client),
        })
    }

    /// Create an offline service that answers with `reply` until changed.
    pub fn new_mock(reply: MockReply) -> Self {
        Self {
            backend: Backend::Mock(Arc::new(Mutex::new(reply))),
        }
    }

    /// Replace the mock reply. No-op for the PlantNet backend.
    pub async fn set_mock_reply(&self, reply: MockReply) {
        if let Backend::Mock(current) = &self.backend {
            *current.lock().await = reply;
        }
    }

    /// Identify the species in an image. Results are ranked best first.
    pub async fn identify(
        &self,
        image: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<Vec<SpeciesMatch>, RecognitionError> {
        match &self.backend {
            Backend::PlantNet(client) => client.identify(image, content_type).await,
            Backend::Mock(reply) => match reply.lock().await.clone() {
                MockReply::Matches(matches) => Ok(matches),
                MockReply::Fail(err) => Err(err),
            },
        }
    }
}

/// PlantNet v2 API client.
#[derive(Clone)]
struct PlantNetClient {
    http: reqwest::Client,
    base_url: String,
    project: String,
    api_key: String,
}

impl PlantNetClient {
    fn new(
        base_url: String,
        project: String,
        api_key: String,
        timeout: Duration,
    ) -> Result<Self, RecognitionError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RecognitionError::Unavailable(format!("HTTP client setup: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            project,
            api_key,
        })
    }

    async fn identify(
        &self,
        image: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<Vec<SpeciesMatch>, RecognitionError> {
        let url = format!(
            "{}/v2/identify/{}",
            self.base_url,
            urlencoding::encode(&self.project)
        );

        let mut part = Part::bytes(image).file_name("upload");
        if let Some(ct) = content_type {
            part = part
                .mime_str(ct)
                .map_err(|_| RecognitionError::InvalidContentType(ct.to_string()))?;
        }
        let form = Form::new().text("organs", ORGAN_HINT).part("images", part);

        let response = self
            .http
            .post(&url)
            .query(&[
                ("api-key", self.api_key.as_str()),
                ("include-related-images", "true"),
                ("lang", RESULT_LANG),
            ])
            .multipart(form)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();

        // PlantNet answers 404 when no species matched the image
        if status.as_u16() == 404 {
            tracing::debug!("PlantNet returned 404 (no species found)");
            return Ok(Vec::new());
        }

        if status.as_u16() == 429 {
            tracing::warn!("PlantNet rate limit hit (429)");
            return Err(RecognitionError::Unavailable("rate limited".to_string()));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, "PlantNet request failed");
            return Err(RecognitionError::Unavailable(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let body: PlantNetResponse = response
            .json()
            .await
            .map_err(|e| RecognitionError::Unavailable(format!("JSON parse error: {}", e)))?;

        Ok(body.into_matches())
    }
}

fn map_transport_error(e: reqwest::Error) -> RecognitionError {
    if e.is_timeout() {
        tracing::warn!("PlantNet request timed out");
        RecognitionError::Timeout
    } else {
        // Strip the URL, it carries the API key
        RecognitionError::Unavailable(e.without_url().to_string())
    }
}

/// PlantNet identify response.
#[derive(Debug, Deserialize)]
struct PlantNetResponse {
    #[serde(default)]
    results: Vec<PlantNetResult>,
}

#[derive(Debug, Deserialize)]
struct PlantNetResult {
    score: f64,
    species: PlantNetSpecies,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlantNetSpecies {
    scientific_name: String,
    #[serde(default)]
    common_names: Vec<String>,
}

impl PlantNetResponse {
    fn into_matches(self) -> Vec<SpeciesMatch> {
        self.results
            .into_iter()
            .map(|r| SpeciesMatch {
                scientific_name: r.species.scientific_name,
                common_names: r.species.common_names,
                score: r.score,
            })
            .collect()
    }
}
