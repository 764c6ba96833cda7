//! Product review types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use glowmart_core::{ProductId, ReviewId, Sentiment, UserId};

/// A stored review, as shown on the product page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Review {
    pub id: ReviewId,
    pub user_id: UserId,
    pub username: String,
    pub product_id: ProductId,
    pub comment: String,
    pub rating: i16,
    pub sentiment: Sentiment,
    pub confidence_score: f32,
    pub created_at: DateTime<Utc>,
}

/// A review ready to persist, with its moderation annotations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewReview {
    pub user_id: UserId,
    pub product_id: ProductId,
    pub comment: String,
    pub rating: i16,
    pub sentiment: Sentiment,
    pub confidence_score: f32,
    pub is_approved: bool,
    pub is_spam: bool,
    pub spam_reason: String,
}
