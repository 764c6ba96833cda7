//! Blocked keywords, read side.

use sqlx::PgPool;

use glowmart_core::SpamCategory;
use glowmart_core::moderation::SpamKeyword;

use super::RepositoryError;

#[derive(sqlx::FromRow)]
struct SpamKeywordRow {
    keyword: String,
    category: String,
    severity: i32,
    is_active: bool,
}

impl TryFrom<SpamKeywordRow> for SpamKeyword {
    type Error = RepositoryError;

    fn try_from(row: SpamKeywordRow) -> Result<Self, Self::Error> {
        let category = row
            .category
            .parse::<SpamCategory>()
            .map_err(|e| RepositoryError::DataCorruption(e.to_string()))?;

        Ok(Self {
            keyword: row.keyword,
            category,
            severity: row.severity,
            is_active: row.is_active,
        })
    }
}

/// Repository for spam keywords maintained in the back-office.
pub struct SpamKeywordRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SpamKeywordRepository<'a> {
    /// Create a new spam keyword repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All active keywords.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored category is unknown.
    pub async fn active(&self) -> Result<Vec<SpamKeyword>, RepositoryError> {
        let rows = sqlx::query_as::<_, SpamKeywordRow>(
            "SELECT keyword, category, severity, is_active
             FROM shop.spam_keyword
             WHERE is_active
             ORDER BY severity DESC, keyword",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}
