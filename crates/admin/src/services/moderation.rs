//! Re-scan of stored reviews against the current spam rules.
//!
//! Keywords change after reviews are written, so the moderation screen runs
//! every unflagged review through the engine again.

use glowmart_core::moderation::{SpamKeyword, check_review};
use glowmart_core::{ReviewId, Sentiment};

use crate::models::ReviewRecord;

/// A review the rescan has just flagged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewlyFlagged {
    pub id: ReviewId,
    pub reason: String,
}

/// Flag reviews that now count as spam.
///
/// Already flagged reviews and blank comments are skipped. Flagged records
/// are updated in place and returned so the caller can persist them.
#[must_use]
pub fn rescan(reviews: &mut [ReviewRecord], keywords: &[SpamKeyword]) -> Vec<NewlyFlagged> {
    let mut flagged = Vec::new();

    for review in reviews
        .iter_mut()
        .filter(|r| !r.is_spam && !r.comment.trim().is_empty())
    {
        let verdict = check_review(&review.comment, review.rating, keywords);
        if !verdict.is_spam {
            continue;
        }
        review.is_spam = true;
        review.sentiment = Sentiment::Spam;
        review.spam_reason.clone_from(&verdict.reason);
        flagged.push(NewlyFlagged {
            id: review.id,
            reason: verdict.reason,
        });
    }

    flagged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::review_stats::tests::review;
    use glowmart_core::SpamCategory;

    fn keyword(word: &str, severity: i32) -> SpamKeyword {
        SpamKeyword {
            keyword: word.to_string(),
            category: SpamCategory::Advertising,
            severity,
            is_active: true,
        }
    }

    #[test]
    fn test_rescan_flags_new_keyword_hits() {
        let mut reviews = vec![
            review(1, 5, Sentiment::Positive, false),
            review(2, 4, Sentiment::Neutral, false),
        ];
        reviews[1].comment = "Mua hàng giá sỉ tại shop khác".to_string();

        let flagged = rescan(&mut reviews, &[keyword("giá sỉ", 100)]);

        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].id, ReviewId::new(2));
        assert!(reviews[1].is_spam);
        assert_eq!(reviews[1].sentiment, Sentiment::Spam);
        assert!(!reviews[0].is_spam);
    }

    #[test]
    fn test_rescan_skips_flagged_and_blank() {
        let mut reviews = vec![
            review(1, 5, Sentiment::Spam, true),
            review(2, 5, Sentiment::Neutral, false),
        ];
        reviews[0].comment = "www.spam.example".to_string();
        reviews[1].comment = "   ".to_string();

        assert!(rescan(&mut reviews, &[]).is_empty());
        assert!(reviews[0].spam_reason.is_empty());
    }
}
