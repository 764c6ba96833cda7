//! Spam keyword management.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use tracing::instrument;

use glowmart_core::moderation::SpamKeyword;
use glowmart_core::{SpamCategory, SpamKeywordId};

use super::{RepositoryError, map_constraint};
use crate::models::{SpamKeywordInput, SpamKeywordRecord};

const KEYWORD_COLUMNS: &str =
    "id, keyword, category, severity, description, is_active, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct KeywordRow {
    id: SpamKeywordId,
    keyword: String,
    category: String,
    severity: i32,
    description: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<KeywordRow> for SpamKeywordRecord {
    type Error = RepositoryError;

    fn try_from(row: KeywordRow) -> Result<Self, Self::Error> {
        let category = row
            .category
            .parse()
            .map_err(|e| RepositoryError::DataCorruption(format!("keyword {}: {e}", row.id)))?;

        Ok(Self {
            id: row.id,
            keyword: row.keyword,
            category,
            severity: row.severity,
            description: row.description,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Keyword list totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct KeywordStats {
    pub total: i64,
    pub active: i64,
    pub inactive: i64,
}

/// Repository for spam keywords.
pub struct SpamKeywordRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SpamKeywordRepository<'a> {
    /// Create a new spam keyword repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Keywords by descending severity, then keyword, optionally in one category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored category is unknown.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        category: Option<SpamCategory>,
    ) -> Result<Vec<SpamKeywordRecord>, RepositoryError> {
        let rows = sqlx::query_as::<_, KeywordRow>(&format!(
            "SELECT {KEYWORD_COLUMNS} FROM shop.spam_keyword
             WHERE ($1::TEXT IS NULL OR category = $1)
             ORDER BY severity DESC, keyword"
        ))
        .bind(category.map(|c| c.to_string()))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Active keywords in the shape the rule engine takes.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored category is unknown.
    pub async fn active_rules(&self) -> Result<Vec<SpamKeyword>, RepositoryError> {
        let rows = sqlx::query_as::<_, KeywordRow>(&format!(
            "SELECT {KEYWORD_COLUMNS} FROM shop.spam_keyword
             WHERE is_active
             ORDER BY severity DESC, keyword"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter()
            .map(|row| SpamKeywordRecord::try_from(row).map(|record| record.to_rule()))
            .collect()
    }

    /// Totals across all categories.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn stats(&self) -> Result<KeywordStats, RepositoryError> {
        let stats = sqlx::query_as::<_, KeywordStats>(
            "SELECT COUNT(*) AS total,
                    COUNT(*) FILTER (WHERE is_active) AS active,
                    COUNT(*) FILTER (WHERE NOT is_active) AS inactive
             FROM shop.spam_keyword",
        )
        .fetch_one(self.pool)
        .await?;

        Ok(stats)
    }

    /// Get a keyword by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: SpamKeywordId) -> Result<Option<SpamKeywordRecord>, RepositoryError> {
        let row = sqlx::query_as::<_, KeywordRow>(&format!(
            "SELECT {KEYWORD_COLUMNS} FROM shop.spam_keyword WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Insert a keyword.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the keyword already exists.
    #[instrument(skip(self, input), fields(keyword = %input.keyword))]
    pub async fn create(&self, input: &SpamKeywordInput) -> Result<SpamKeywordId, RepositoryError> {
        let id = sqlx::query_scalar(
            "INSERT INTO shop.spam_keyword (keyword, category, severity, description, is_active)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
        )
        .bind(&input.keyword)
        .bind(input.category.to_string())
        .bind(input.severity)
        .bind(&input.description)
        .bind(input.is_active)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_constraint(e, "keyword"))?;

        Ok(id)
    }

    /// Replace a keyword's fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no keyword has this ID.
    /// Returns `RepositoryError::Conflict` if the new text collides with another keyword.
    #[instrument(skip(self, input), fields(keyword_id = %id))]
    pub async fn update(
        &self,
        id: SpamKeywordId,
        input: &SpamKeywordInput,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE shop.spam_keyword
             SET keyword = $2, category = $3, severity = $4, description = $5,
                 is_active = $6, updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(&input.keyword)
        .bind(input.category.to_string())
        .bind(input.severity)
        .bind(&input.description)
        .bind(input.is_active)
        .execute(self.pool)
        .await
        .map_err(|e| map_constraint(e, "keyword"))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Flip `is_active`, returning the keyword text and its new state.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no keyword has this ID.
    #[instrument(skip(self), fields(keyword_id = %id))]
    pub async fn toggle(&self, id: SpamKeywordId) -> Result<(String, bool), RepositoryError> {
        let row: Option<(String, bool)> = sqlx::query_as(
            "UPDATE shop.spam_keyword
             SET is_active = NOT is_active, updated_at = NOW()
             WHERE id = $1
             RETURNING keyword, is_active",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.ok_or(RepositoryError::NotFound)
    }

    /// Delete a keyword, returning its text.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no keyword has this ID.
    #[instrument(skip(self), fields(keyword_id = %id))]
    pub async fn delete(&self, id: SpamKeywordId) -> Result<String, RepositoryError> {
        let keyword: Option<String> =
            sqlx::query_scalar("DELETE FROM shop.spam_keyword WHERE id = $1 RETURNING keyword")
                .bind(id)
                .fetch_optional(self.pool)
                .await?;

        keyword.ok_or(RepositoryError::NotFound)
    }
}
