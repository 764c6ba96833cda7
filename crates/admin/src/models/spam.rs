//! Spam keyword records.

use chrono::{DateTime, Utc};
use serde::Serialize;

use glowmart_core::moderation::SpamKeyword;
use glowmart_core::{SpamCategory, SpamKeywordId};

/// A keyword row as managed in the back-office.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpamKeywordRecord {
    pub id: SpamKeywordId,
    pub keyword: String,
    pub category: SpamCategory,
    pub severity: i32,
    pub description: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SpamKeywordRecord {
    /// The part the rule engine needs.
    #[must_use]
    pub fn to_rule(&self) -> SpamKeyword {
        SpamKeyword {
            keyword: self.keyword.clone(),
            category: self.category,
            severity: self.severity,
            is_active: self.is_active,
        }
    }
}

/// Editable keyword fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpamKeywordInput {
    pub keyword: String,
    pub category: SpamCategory,
    pub severity: i32,
    pub description: String,
    pub is_active: bool,
}
