//! Product reviews.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use glowmart_core::{ProductId, ReviewId, Sentiment, UserId};

use super::RepositoryError;
use crate::models::{NewReview, Review};

#[derive(sqlx::FromRow)]
struct ReviewRow {
    id: ReviewId,
    user_id: UserId,
    username: String,
    product_id: ProductId,
    comment: String,
    rating: i16,
    sentiment: String,
    confidence_score: f32,
    created_at: DateTime<Utc>,
}

impl TryFrom<ReviewRow> for Review {
    type Error = RepositoryError;

    fn try_from(row: ReviewRow) -> Result<Self, Self::Error> {
        let sentiment = row.sentiment.parse::<Sentiment>().map_err(|e| {
            RepositoryError::DataCorruption(format!("review {}: {e}", row.id))
        })?;

        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            username: row.username,
            product_id: row.product_id,
            comment: row.comment,
            rating: row.rating,
            sentiment,
            confidence_score: row.confidence_score,
            created_at: row.created_at,
        })
    }
}

/// Repository for product reviews.
pub struct ReviewRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReviewRepository<'a> {
    /// Create a new review repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Approved reviews for a product, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored sentiment is unknown.
    pub async fn approved_for_product(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<Review>, RepositoryError> {
        let rows = sqlx::query_as::<_, ReviewRow>(
            "SELECT r.id, r.user_id, u.username, r.product_id, r.comment, r.rating,
                    r.sentiment, r.confidence_score, r.created_at
             FROM shop.review r
             JOIN shop.app_user u ON u.id = r.user_id
             WHERE r.product_id = $1 AND r.is_approved
             ORDER BY r.created_at DESC",
        )
        .bind(product_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Persist a review with its moderation annotations.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert(&self, review: &NewReview) -> Result<ReviewId, RepositoryError> {
        let id = sqlx::query_scalar(
            "INSERT INTO shop.review (
                 user_id, product_id, comment, rating, sentiment, confidence_score,
                 is_approved, is_spam, spam_reason
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING id",
        )
        .bind(review.user_id)
        .bind(review.product_id)
        .bind(&review.comment)
        .bind(review.rating)
        .bind(review.sentiment.to_string())
        .bind(review.confidence_score)
        .bind(review.is_approved)
        .bind(review.is_spam)
        .bind(&review.spam_reason)
        .fetch_one(self.pool)
        .await?;

        Ok(id)
    }
}
