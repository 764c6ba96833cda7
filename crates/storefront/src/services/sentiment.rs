//! Sentiment scoring for review comments.
//!
//! Scoring itself is an external model served over HTTP. This module only
//! knows its wire contract:
//!
//! ```text
//! POST {SENTIMENT_API_URL}
//! { "text": "..." }
//! -> { "label": "POS" | "NEU" | "NEG", "score": 87.5 }
//! ```
//!
//! When no endpoint is configured every comment scores neutral.

use std::future::Future;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use glowmart_core::Sentiment;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Confidence reported when the classifier cannot be consulted.
pub const FALLBACK_CONFIDENCE: f32 = 50.0;

/// Errors from the sentiment backend.
#[derive(Debug, Error)]
pub enum SentimentError {
    /// Transport or decoding failure.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("sentiment API error ({status}): {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The backend answered with something we cannot use.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The API key cannot be sent as a header.
    #[error("invalid API key")]
    InvalidApiKey,
}

/// A sentiment label with its confidence in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentScore {
    pub label: Sentiment,
    pub confidence: f32,
}

impl SentimentScore {
    /// Neutral with [`FALLBACK_CONFIDENCE`].
    #[must_use]
    pub const fn neutral() -> Self {
        Self {
            label: Sentiment::Neutral,
            confidence: FALLBACK_CONFIDENCE,
        }
    }
}

/// Scores free text.
pub trait SentimentClassifier {
    /// Score `text`. The label is never [`Sentiment::Spam`].
    fn classify(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<SentimentScore, SentimentError>> + Send;
}

/// Client for a remote sentiment endpoint.
#[derive(Clone)]
pub struct HttpSentimentClassifier {
    client: reqwest::Client,
    url: String,
}

impl HttpSentimentClassifier {
    /// Create a client for `url`, sending `api_key` as a bearer token if set.
    ///
    /// # Errors
    ///
    /// Returns `SentimentError::InvalidApiKey` if the key contains invalid
    /// header characters, or `SentimentError::Request` if the client cannot
    /// be built.
    pub fn new(url: String, api_key: Option<&SecretString>) -> Result<Self, SentimentError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = api_key {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", key.expose_secret()))
                .map_err(|_| SentimentError::InvalidApiKey)?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self { client, url })
    }
}

impl SentimentClassifier for HttpSentimentClassifier {
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    async fn classify(&self, text: &str) -> Result<SentimentScore, SentimentError> {
        let response = self
            .client
            .post(&self.url)
            .json(&ClassifyRequest { text })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SentimentError::Api { status, body });
        }

        let response: ClassifyResponse = response.json().await?;
        let score = response.into_score()?;
        debug!(label = %score.label, confidence = score.confidence, "Scored comment");
        Ok(score)
    }
}

/// The classifier selected by configuration.
#[derive(Clone)]
pub enum SentimentBackend {
    Http(HttpSentimentClassifier),
    /// Scores everything neutral without a network call.
    Neutral,
}

impl SentimentClassifier for SentimentBackend {
    async fn classify(&self, text: &str) -> Result<SentimentScore, SentimentError> {
        match self {
            Self::Http(client) => client.classify(text).await,
            Self::Neutral => Ok(SentimentScore::neutral()),
        }
    }
}

#[derive(Debug, Serialize)]
struct ClassifyRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct ClassifyResponse {
    label: String,
    score: f32,
}

impl ClassifyResponse {
    fn into_score(self) -> Result<SentimentScore, SentimentError> {
        let label = match self.label.trim().to_uppercase().as_str() {
            "POS" => Sentiment::Positive,
            "NEU" => Sentiment::Neutral,
            "NEG" => Sentiment::Negative,
            other => {
                return Err(SentimentError::InvalidResponse(format!(
                    "unknown label {other:?}"
                )));
            }
        };

        if !self.score.is_finite() {
            return Err(SentimentError::InvalidResponse("score is not finite".to_owned()));
        }

        Ok(SentimentScore {
            label,
            confidence: self.score.clamp(0.0, 100.0),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn response(label: &str, score: f32) -> ClassifyResponse {
        ClassifyResponse {
            label: label.to_string(),
            score,
        }
    }

    #[test]
    fn test_response_labels() {
        assert_eq!(
            response("POS", 91.0).into_score().unwrap().label,
            Sentiment::Positive
        );
        assert_eq!(
            response("neg", 60.0).into_score().unwrap().label,
            Sentiment::Negative
        );
        assert!(response("SPAM", 99.0).into_score().is_err());
    }

    #[test]
    fn test_response_score_clamped() {
        let score = response("NEU", 140.0).into_score().unwrap();
        assert!((score.confidence - 100.0).abs() < f32::EPSILON);
        assert!(response("NEU", f32::NAN).into_score().is_err());
    }

    #[test]
    fn test_response_deserializes() {
        let parsed: ClassifyResponse =
            serde_json::from_str(r#"{"label":"POS","score":87.5}"#).unwrap();
        assert_eq!(parsed.label, "POS");
    }

    #[tokio::test]
    async fn test_neutral_backend() {
        let score = SentimentBackend::Neutral.classify("tuyệt vời").await.unwrap();
        assert_eq!(score, SentimentScore::neutral());
    }

    #[test]
    fn test_http_client_rejects_bad_key() {
        let key = SecretString::from("bad\nkey");
        let result = HttpSentimentClassifier::new("http://localhost:9000".to_string(), Some(&key));
        assert!(matches!(result, Err(SentimentError::InvalidApiKey)));
    }
}
