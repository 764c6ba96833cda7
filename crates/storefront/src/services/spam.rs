//! Spam checks for review comments, backed by the keyword table.
//!
//! Active keywords are cached for 5 minutes. If the table cannot be read the
//! heuristic rules still run, just without keywords.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;
use tracing::{debug, instrument, warn};

use glowmart_core::moderation::{SpamKeyword, SpamVerdict, check_review};

use crate::db::SpamKeywordRepository;

const KEYWORD_TTL: Duration = Duration::from_secs(300);

/// Decides whether a comment is spam.
pub trait SpamClassifier {
    /// Check `text` posted with `rating`.
    fn check(&self, text: &str, rating: i16) -> impl Future<Output = SpamVerdict> + Send;
}

/// Spam filter over the keywords maintained in the back-office.
#[derive(Clone)]
pub struct KeywordSpamFilter {
    pool: PgPool,
    keywords: Cache<(), Arc<Vec<SpamKeyword>>>,
}

impl KeywordSpamFilter {
    /// Create a new filter reading keywords from `pool`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        let keywords = Cache::builder()
            .max_capacity(1)
            .time_to_live(KEYWORD_TTL)
            .build();

        Self { pool, keywords }
    }

    /// Active keywords, from cache when fresh.
    async fn active_keywords(&self) -> Arc<Vec<SpamKeyword>> {
        if let Some(cached) = self.keywords.get(&()).await {
            debug!("Cache hit for spam keywords");
            return cached;
        }

        match SpamKeywordRepository::new(&self.pool).active().await {
            Ok(loaded) => {
                let loaded = Arc::new(loaded);
                self.keywords.insert((), Arc::clone(&loaded)).await;
                loaded
            }
            Err(e) => {
                warn!(error = %e, "Failed to load spam keywords, checking without them");
                Arc::new(Vec::new())
            }
        }
    }
}

impl SpamClassifier for KeywordSpamFilter {
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    async fn check(&self, text: &str, rating: i16) -> SpamVerdict {
        let keywords = self.active_keywords().await;
        let verdict = check_review(text, rating, &keywords);
        if verdict.is_spam {
            debug!(reason = %verdict.reason, "Comment flagged as spam");
        }
        verdict
    }
}
