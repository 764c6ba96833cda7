//! Reviews as seen by moderators.

use chrono::{DateTime, Utc};
use serde::Serialize;

use glowmart_core::{ProductId, ReviewId, Sentiment, UserId};

/// A stored review with its moderation annotations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewRecord {
    pub id: ReviewId,
    pub user_id: UserId,
    pub username: String,
    pub product_id: ProductId,
    pub product_name: String,
    pub comment: String,
    pub rating: i16,
    pub sentiment: Sentiment,
    pub confidence_score: f32,
    pub is_approved: bool,
    pub is_spam: bool,
    pub spam_reason: String,
    pub created_at: DateTime<Utc>,
}
