//! Summary figures for the review moderation screen.

use serde::Serialize;

use glowmart_core::Sentiment;

use crate::models::ReviewRecord;

/// Aggregates over reviews not flagged as spam.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReviewStats {
    /// Non-spam reviews.
    pub total: usize,
    pub spam_count: usize,
    pub pos_percent: u32,
    pub neg_percent: u32,
    /// Mean rating, one decimal.
    pub avg_rating: f64,
}

impl ReviewStats {
    /// Figures over non-spam reviews. Halves round away from zero (12.5% reads 13%).
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_reviews(reviews: &[ReviewRecord]) -> Self {
        let spam_count = reviews.iter().filter(|r| r.is_spam).count();
        let valid: Vec<&ReviewRecord> = reviews.iter().filter(|r| !r.is_spam).collect();
        let total = valid.len();

        if total == 0 {
            return Self {
                spam_count,
                ..Self::default()
            };
        }

        let share = |sentiment: Sentiment| {
            let n = valid.iter().filter(|r| r.sentiment == sentiment).count();
            (n as f64 / total as f64 * 100.0).round() as u32
        };
        let rating_sum: i64 = valid.iter().map(|r| i64::from(r.rating)).sum();
        let avg_rating = (rating_sum as f64 / total as f64 * 10.0).round() / 10.0;

        Self {
            total,
            spam_count,
            pos_percent: share(Sentiment::Positive),
            neg_percent: share(Sentiment::Negative),
            avg_rating,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::Utc;
    use glowmart_core::{ProductId, ReviewId, UserId};

    pub(crate) fn review(id: i32, rating: i16, sentiment: Sentiment, is_spam: bool) -> ReviewRecord {
        ReviewRecord {
            id: ReviewId::new(id),
            user_id: UserId::new(1),
            username: "lan".to_string(),
            product_id: ProductId::new(1),
            product_name: "Serum".to_string(),
            comment: format!("comment {id}"),
            rating,
            sentiment,
            confidence_score: 90.0,
            is_approved: true,
            is_spam,
            spam_reason: String::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_spam_excluded_from_figures() {
        let reviews = vec![
            review(1, 5, Sentiment::Positive, false),
            review(2, 4, Sentiment::Positive, false),
            review(3, 1, Sentiment::Negative, false),
            review(4, 1, Sentiment::Spam, true),
        ];
        let stats = ReviewStats::from_reviews(&reviews);

        assert_eq!(stats.total, 3);
        assert_eq!(stats.spam_count, 1);
        assert_eq!(stats.pos_percent, 67);
        assert_eq!(stats.neg_percent, 33);
        assert!((stats.avg_rating - 3.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_halves_round_away_from_zero() {
        let ratings = [3, 3, 2, 2, 2, 2, 2, 2];
        let reviews: Vec<ReviewRecord> = (1..)
            .zip(ratings)
            .map(|(id, rating)| {
                let sentiment = if id == 1 { Sentiment::Positive } else { Sentiment::Neutral };
                review(id, rating, sentiment, false)
            })
            .collect();
        let stats = ReviewStats::from_reviews(&reviews);

        assert_eq!(stats.pos_percent, 13);
        assert!((stats.avg_rating - 2.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_no_reviews_is_all_zero() {
        let stats = ReviewStats::from_reviews(&[review(1, 2, Sentiment::Spam, true)]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.spam_count, 1);
        assert_eq!(stats.pos_percent, 0);
        assert!(stats.avg_rating.abs() < f64::EPSILON);
    }
}
