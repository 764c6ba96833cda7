//! Cached active spam keywords for the review rescan.
//!
//! Every keyword write in the back-office calls [`KeywordCache::invalidate`],
//! so the next rescan sees the change straight away.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;
use tracing::debug;

use glowmart_core::moderation::SpamKeyword;

use crate::db::{RepositoryError, SpamKeywordRepository};

const KEYWORD_TTL: Duration = Duration::from_secs(300);

/// Active keyword list, loaded lazily.
#[derive(Clone)]
pub struct KeywordCache {
    pool: PgPool,
    keywords: Cache<(), Arc<Vec<SpamKeyword>>>,
}

impl KeywordCache {
    /// Create an empty cache reading from `pool`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        let keywords = Cache::builder()
            .max_capacity(1)
            .time_to_live(KEYWORD_TTL)
            .build();

        Self { pool, keywords }
    }

    /// Active keywords, from cache when fresh.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the keyword table cannot be read.
    pub async fn active(&self) -> Result<Arc<Vec<SpamKeyword>>, RepositoryError> {
        if let Some(cached) = self.keywords.get(&()).await {
            debug!("Cache hit for spam keywords");
            return Ok(cached);
        }

        let loaded = Arc::new(SpamKeywordRepository::new(&self.pool).active_rules().await?);
        self.keywords.insert((), Arc::clone(&loaded)).await;
        Ok(loaded)
    }

    /// Drop the cached list.
    pub async fn invalidate(&self) {
        self.keywords.invalidate(&()).await;
    }
}
