//! Review submission with advisory moderation.
//!
//! Every non-empty comment is stored and shown. Sentiment and spam checks only
//! annotate the record; a spam verdict replaces the sentiment label with
//! [`Sentiment::Spam`] so the back-office can filter on it.

use std::future::Future;

use tracing::{error, info, instrument};

use glowmart_core::{ProductId, ReviewId, Sentiment, UserId};

use super::sentiment::{SentimentClassifier, SentimentScore};
use super::spam::SpamClassifier;
use crate::db::{RepositoryError, ReviewRepository};
use crate::models::NewReview;

/// Rating used when the form omits it or sends garbage.
pub const DEFAULT_RATING: i16 = 5;

/// Stores reviews.
pub trait ReviewSink {
    fn store(
        &self,
        review: &NewReview,
    ) -> impl Future<Output = Result<ReviewId, RepositoryError>> + Send;
}

impl ReviewSink for ReviewRepository<'_> {
    async fn store(&self, review: &NewReview) -> Result<ReviewId, RepositoryError> {
        self.insert(review).await
    }
}

/// What happened to a submission.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The comment was blank; nothing was stored.
    Skipped,
    /// The review was stored with these annotations.
    Stored { id: ReviewId, review: NewReview },
}

/// Parse the rating form field.
#[must_use]
pub fn parse_rating(raw: Option<&str>) -> i16 {
    raw.and_then(|r| r.trim().parse().ok())
        .unwrap_or(DEFAULT_RATING)
}

/// Run the moderation gate for one comment and store the result.
///
/// # Errors
///
/// Returns `RepositoryError` only if storing the review fails. Classifier
/// failures fall back to a neutral score.
#[instrument(skip(comment, sentiment, spam, sink), fields(comment_len = comment.len()))]
pub async fn submit_review<S, P, K>(
    user_id: UserId,
    product_id: ProductId,
    comment: &str,
    rating: i16,
    sentiment: &S,
    spam: &P,
    sink: &K,
) -> Result<SubmitOutcome, RepositoryError>
where
    S: SentimentClassifier + Sync,
    P: SpamClassifier + Sync,
    K: ReviewSink + Sync,
{
    let comment = comment.trim();
    if comment.is_empty() {
        info!("Ignoring empty review");
        return Ok(SubmitOutcome::Skipped);
    }

    let score = match sentiment.classify(comment).await {
        Ok(score) => score,
        Err(e) => {
            error!(error = %e, "Sentiment scoring failed, using neutral");
            SentimentScore::neutral()
        }
    };

    let verdict = spam.check(comment, rating).await;

    let review = NewReview {
        user_id,
        product_id,
        comment: comment.to_owned(),
        rating,
        sentiment: if verdict.is_spam {
            Sentiment::Spam
        } else {
            score.label
        },
        confidence_score: score.confidence,
        is_approved: true,
        is_spam: verdict.is_spam,
        spam_reason: verdict.reason,
    };

    let id = sink.store(&review).await?;
    info!(review_id = %id, sentiment = %review.sentiment, is_spam = review.is_spam, "Review stored");

    Ok(SubmitOutcome::Stored { id, review })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use glowmart_core::moderation::{SpamVerdict, check_review};

    use super::*;
    use crate::services::sentiment::SentimentError;

    struct FixedSentiment(Sentiment, f32);

    impl SentimentClassifier for FixedSentiment {
        async fn classify(&self, _text: &str) -> Result<SentimentScore, SentimentError> {
            Ok(SentimentScore {
                label: self.0,
                confidence: self.1,
            })
        }
    }

    struct BrokenSentiment;

    impl SentimentClassifier for BrokenSentiment {
        async fn classify(&self, _text: &str) -> Result<SentimentScore, SentimentError> {
            Err(SentimentError::InvalidResponse("model offline".to_string()))
        }
    }

    struct RulesOnly;

    impl SpamClassifier for RulesOnly {
        async fn check(&self, text: &str, rating: i16) -> SpamVerdict {
            check_review(text, rating, &[])
        }
    }

    #[derive(Default)]
    struct MemorySink(Mutex<Vec<NewReview>>);

    impl ReviewSink for MemorySink {
        async fn store(&self, review: &NewReview) -> Result<ReviewId, RepositoryError> {
            let mut stored = self.0.lock().unwrap();
            stored.push(review.clone());
            Ok(ReviewId::new(i32::try_from(stored.len()).unwrap()))
        }
    }

    async fn submit<S: SentimentClassifier + Sync>(
        comment: &str,
        rating: i16,
        sentiment: &S,
        sink: &MemorySink,
    ) -> SubmitOutcome {
        submit_review(
            UserId::new(1),
            ProductId::new(2),
            comment,
            rating,
            sentiment,
            &RulesOnly,
            sink,
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_blank_comment_stores_nothing() {
        let sink = MemorySink::default();
        let outcome = submit("   ", 5, &FixedSentiment(Sentiment::Positive, 90.0), &sink).await;
        assert_eq!(outcome, SubmitOutcome::Skipped);
        assert!(sink.0.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clean_review_keeps_classifier_label() {
        let sink = MemorySink::default();
        let outcome = submit(
            "  Son lên màu chuẩn, giữ lâu.  ",
            5,
            &FixedSentiment(Sentiment::Positive, 92.5),
            &sink,
        )
        .await;

        let SubmitOutcome::Stored { review, .. } = outcome else {
            panic!("expected stored review");
        };
        assert_eq!(review.comment, "Son lên màu chuẩn, giữ lâu.");
        assert_eq!(review.sentiment, Sentiment::Positive);
        assert!((review.confidence_score - 92.5).abs() < f32::EPSILON);
        assert!(review.is_approved);
        assert!(!review.is_spam);
        assert!(review.spam_reason.is_empty());
    }

    #[tokio::test]
    async fn test_classifier_failure_falls_back_to_neutral() {
        let sink = MemorySink::default();
        submit("Bình thường thôi", 3, &BrokenSentiment, &sink).await;

        let stored = sink.0.lock().unwrap();
        assert_eq!(stored[0].sentiment, Sentiment::Neutral);
        assert!((stored[0].confidence_score - 50.0).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_spam_overrides_sentiment() {
        let sink = MemorySink::default();
        submit(
            "Mua ngay tại https://deal.example",
            5,
            &FixedSentiment(Sentiment::Positive, 80.0),
            &sink,
        )
        .await;

        let stored = sink.0.lock().unwrap();
        assert_eq!(stored[0].sentiment, Sentiment::Spam);
        assert!(stored[0].is_spam);
        assert!(stored[0].is_approved);
        assert_eq!(stored[0].spam_reason, "contains link");
    }

    #[test]
    fn test_parse_rating_defaults() {
        assert_eq!(parse_rating(Some("4")), 4);
        assert_eq!(parse_rating(Some(" 2 ")), 2);
        assert_eq!(parse_rating(Some("")), DEFAULT_RATING);
        assert_eq!(parse_rating(Some("five")), DEFAULT_RATING);
        assert_eq!(parse_rating(None), DEFAULT_RATING);
    }
}
