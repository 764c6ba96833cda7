//! Review moderation reads and spam annotations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use glowmart_core::{ProductId, ReviewId, Sentiment, UserId};

use super::RepositoryError;
use crate::models::ReviewRecord;

#[derive(Debug, sqlx::FromRow)]
struct ReviewRow {
    id: ReviewId,
    user_id: UserId,
    username: String,
    product_id: ProductId,
    product_name: String,
    comment: String,
    rating: i16,
    sentiment: String,
    confidence_score: f32,
    is_approved: bool,
    is_spam: bool,
    spam_reason: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ReviewRow> for ReviewRecord {
    type Error = RepositoryError;

    fn try_from(row: ReviewRow) -> Result<Self, Self::Error> {
        let sentiment = row
            .sentiment
            .parse()
            .map_err(|e| RepositoryError::DataCorruption(format!("review {}: {e}", row.id)))?;

        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            username: row.username,
            product_id: row.product_id,
            product_name: row.product_name,
            comment: row.comment,
            rating: row.rating,
            sentiment,
            confidence_score: row.confidence_score,
            is_approved: row.is_approved,
            is_spam: row.is_spam,
            spam_reason: row.spam_reason,
            created_at: row.created_at,
        })
    }
}

/// Repository for review moderation.
pub struct ReviewRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReviewRepository<'a> {
    /// Create a new review repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Every review, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored sentiment is unknown.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<ReviewRecord>, RepositoryError> {
        let rows = sqlx::query_as::<_, ReviewRow>(
            "SELECT r.id, r.user_id, u.username, r.product_id, p.name AS product_name,
                    r.comment, r.rating, r.sentiment, r.confidence_score,
                    r.is_approved, r.is_spam, r.spam_reason, r.created_at
             FROM shop.review r
             JOIN shop.app_user u ON u.id = r.user_id
             JOIN shop.product p ON p.id = r.product_id
             ORDER BY r.created_at DESC",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Flag a review as spam and relabel its sentiment.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no review has this ID.
    #[instrument(skip(self, reason), fields(review_id = %id))]
    pub async fn mark_spam(&self, id: ReviewId, reason: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE shop.review
             SET is_spam = TRUE, spam_reason = $2, sentiment = $3
             WHERE id = $1",
        )
        .bind(id)
        .bind(reason)
        .bind(Sentiment::Spam.to_string())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
