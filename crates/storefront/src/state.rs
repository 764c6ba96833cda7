//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::StorefrontConfig;
use crate::services::sentiment::{HttpSentimentClassifier, SentimentBackend, SentimentError};
use crate::services::spam::KeywordSpamFilter;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    sentiment: SentimentBackend,
    spam: KeywordSpamFilter,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the sentiment client cannot be built.
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Result<Self, SentimentError> {
        let sentiment = match &config.sentiment {
            Some(api) => SentimentBackend::Http(HttpSentimentClassifier::new(
                api.url.clone(),
                api.api_key.as_ref(),
            )?),
            None => {
                tracing::warn!("SENTIMENT_API_URL not set, reviews will score neutral");
                SentimentBackend::Neutral
            }
        };
        let spam = KeywordSpamFilter::new(pool.clone());

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                sentiment,
                spam,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get the configured sentiment classifier.
    #[must_use]
    pub fn sentiment(&self) -> &SentimentBackend {
        &self.inner.sentiment
    }

    /// Get the spam filter.
    #[must_use]
    pub fn spam(&self) -> &KeywordSpamFilter {
        &self.inner.spam
    }
}
