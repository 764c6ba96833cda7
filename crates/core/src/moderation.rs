//! Rule-based spam detection for review comments.
//!
//! The engine is a pure function over the comment, its star rating and the
//! set of keywords maintained in the back-office. Rules are checked in a fixed
//! order and the first one that fires supplies the reason:
//!
//! 1. rating outside 1-5
//! 2. blocked keywords whose severities add up to [`KEYWORD_SPAM_THRESHOLD`]
//! 3. links
//! 4. phone numbers
//! 5. one character repeated [`MAX_CHAR_RUN`] or more times
//! 6. shouting (mostly capital letters)

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::types::SpamCategory;

/// Accumulated keyword severity at which a comment counts as spam.
pub const KEYWORD_SPAM_THRESHOLD: i32 = 100;

/// Length of a single-character run that counts as spam.
pub const MAX_CHAR_RUN: usize = 6;

/// Minimum number of letters before the capitals rule applies.
const CAPS_MIN_LETTERS: usize = 20;

/// Share of uppercase letters (in percent) that counts as shouting.
const CAPS_PERCENT: usize = 80;

static LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(https?://|www\.)\S+|\b[a-z0-9-]+\.(com|net|vn|shop|xyz)\b")
        .expect("link pattern is valid")
});

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d(?:[\s.\-]?\d){8,}").expect("phone pattern is valid")
});

/// A blocked word or phrase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpamKeyword {
    pub keyword: String,
    pub category: SpamCategory,
    pub severity: i32,
    pub is_active: bool,
}

/// Outcome of a spam check.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SpamVerdict {
    pub is_spam: bool,
    /// Human-readable explanation. Empty when not spam.
    pub reason: String,
}

impl SpamVerdict {
    /// A clean verdict.
    #[must_use]
    pub fn clean() -> Self {
        Self::default()
    }

    fn spam(reason: impl Into<String>) -> Self {
        Self {
            is_spam: true,
            reason: reason.into(),
        }
    }
}

/// Classify a review comment.
///
/// Inactive keywords are ignored. Keyword matching is a case-insensitive
/// substring test.
#[must_use]
pub fn check_review(text: &str, rating: i16, keywords: &[SpamKeyword]) -> SpamVerdict {
    if !(1..=5).contains(&rating) {
        return SpamVerdict::spam(format!("invalid rating {rating}"));
    }

    let lowered = text.to_lowercase();
    let mut severity: i32 = 0;
    let mut matched = Vec::new();
    for keyword in keywords.iter().filter(|k| k.is_active) {
        let needle = keyword.keyword.trim().to_lowercase();
        if !needle.is_empty() && lowered.contains(&needle) {
            severity = severity.saturating_add(keyword.severity);
            matched.push(keyword.keyword.trim());
        }
    }
    if severity >= KEYWORD_SPAM_THRESHOLD {
        return SpamVerdict::spam(format!("blocked keywords: {}", matched.join(", ")));
    }

    if LINK_RE.is_match(text) {
        return SpamVerdict::spam("contains link");
    }

    if PHONE_RE.is_match(text) {
        return SpamVerdict::spam("contains phone number");
    }

    if longest_char_run(text) >= MAX_CHAR_RUN {
        return SpamVerdict::spam("repeated characters");
    }

    if is_shouting(text) {
        return SpamVerdict::spam("excessive capitals");
    }

    SpamVerdict::clean()
}

/// Longest run of one repeated non-whitespace character.
fn longest_char_run(text: &str) -> usize {
    let mut longest = 0;
    let mut current = 0;
    let mut previous = None;

    for ch in text.chars() {
        if ch.is_whitespace() {
            previous = None;
            current = 0;
            continue;
        }
        if previous == Some(ch) {
            current += 1;
        } else {
            previous = Some(ch);
            current = 1;
        }
        longest = longest.max(current);
    }

    longest
}

fn is_shouting(text: &str) -> bool {
    let (letters, upper) = text
        .chars()
        .filter(|c| c.is_alphabetic())
        .fold((0_usize, 0_usize), |(letters, upper), c| {
            (letters + 1, upper + usize::from(c.is_uppercase()))
        });

    letters > CAPS_MIN_LETTERS && upper * 100 >= letters * CAPS_PERCENT
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyword(word: &str, severity: i32) -> SpamKeyword {
        SpamKeyword {
            keyword: word.to_string(),
            category: SpamCategory::Advertising,
            severity,
            is_active: true,
        }
    }

    #[test]
    fn test_ordinary_review_is_clean() {
        let verdict = check_review("Kem dưỡng rất mịn, da mình đỡ khô hẳn.", 5, &[]);
        assert_eq!(verdict, SpamVerdict::clean());
    }

    #[test]
    fn test_single_severe_keyword() {
        let keywords = [keyword("hàng fake", 100)];
        let verdict = check_review("Shop bán HÀNG FAKE nhé mọi người", 1, &keywords);
        assert!(verdict.is_spam);
        assert_eq!(verdict.reason, "blocked keywords: hàng fake");
    }

    #[test]
    fn test_keyword_severity_accumulates() {
        let keywords = [keyword("giảm giá", 50), keyword("inbox", 50)];
        assert!(!check_review("giảm giá sâu", 4, &keywords).is_spam);

        let verdict = check_review("giảm giá sâu, inbox mình", 4, &keywords);
        assert!(verdict.is_spam);
        assert_eq!(verdict.reason, "blocked keywords: giảm giá, inbox");
    }

    #[test]
    fn test_severity_total_saturates() {
        let keywords = [keyword("mua sỉ", i32::MAX), keyword("inbox", i32::MAX)];
        let verdict = check_review("mua sỉ thì inbox", 5, &keywords);
        assert!(verdict.is_spam);
        assert_eq!(verdict.reason, "blocked keywords: mua sỉ, inbox");
    }

    #[test]
    fn test_inactive_keyword_ignored() {
        let mut word = keyword("lừa đảo", 100);
        word.is_active = false;
        assert!(!check_review("không phải lừa đảo đâu", 3, &[word]).is_spam);
    }

    #[test]
    fn test_link_detected() {
        let verdict = check_review("Xem thêm tại https://spam.example/deal", 5, &[]);
        assert_eq!(verdict.reason, "contains link");
        assert!(check_review("ghé www.banhang.vn nha", 5, &[]).is_spam);
    }

    #[test]
    fn test_phone_number_detected() {
        let verdict = check_review("Liên hệ 0912 345 678 để mua sỉ", 5, &[]);
        assert_eq!(verdict.reason, "contains phone number");
    }

    #[test]
    fn test_short_numbers_not_phone() {
        assert!(!check_review("Dùng 2 tuần, giá 350 nghìn là ok", 4, &[]).is_spam);
    }

    #[test]
    fn test_repeated_characters() {
        let verdict = check_review("tốttttttt quá", 5, &[]);
        assert_eq!(verdict.reason, "repeated characters");
        assert!(!check_review("good!!!", 5, &[]).is_spam);
    }

    #[test]
    fn test_shouting() {
        let verdict = check_review("SAN PHAM NAY QUA TUYET VOI MUA NGAY DI", 5, &[]);
        assert_eq!(verdict.reason, "excessive capitals");
        assert!(!check_review("OK TOT", 5, &[]).is_spam);
    }

    #[test]
    fn test_invalid_rating() {
        let verdict = check_review("bình thường", 0, &[]);
        assert!(verdict.is_spam);
        assert_eq!(verdict.reason, "invalid rating 0");
    }

    #[test]
    fn test_longest_char_run_resets_on_whitespace() {
        assert_eq!(longest_char_run("aaa aaa"), 3);
        assert_eq!(longest_char_run(""), 0);
        assert_eq!(longest_char_run("abbbc"), 3);
    }
}
