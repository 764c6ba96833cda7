//! Spam keyword management routes.
//!
//! Every write drops the cached keyword list so the next review scan uses
//! the new rules.

use axum::{
    Form, Json,
    extract::{Path, Query, State},
    response::Redirect,
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::{info, instrument};

use glowmart_core::{SpamCategory, SpamKeywordId};

use super::{Page, checkbox, flash_redirect, page, write_failed};
use crate::db::{KeywordStats, SpamKeywordRepository};
use crate::error::{AppError, Result};
use crate::flash::FlashLevel;
use crate::middleware::RequireAdminAuth;
use crate::models::{SpamKeywordInput, SpamKeywordRecord};
use crate::state::AppState;

const KEYWORDS: &str = "/spam-keywords";

/// Severity of a new keyword when the form leaves it out.
const DEFAULT_SEVERITY: i32 = 100;

/// `?category=` filter.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryQuery {
    pub category: Option<String>,
}

/// Keyword listing body.
#[derive(Debug, Serialize)]
pub struct KeywordsView {
    pub keywords: Vec<SpamKeywordRecord>,
    pub category: Option<SpamCategory>,
    pub stats: KeywordStats,
}

/// Keyword form as posted.
#[derive(Debug, Default, Deserialize)]
pub struct KeywordForm {
    pub keyword: Option<String>,
    pub category: Option<String>,
    pub severity: Option<String>,
    #[serde(default)]
    pub description: String,
    pub is_active: Option<String>,
}

impl KeywordForm {
    /// Validate against `existing` values; a new keyword has none.
    fn into_input(
        self,
        existing: Option<&SpamKeywordRecord>,
    ) -> std::result::Result<SpamKeywordInput, String> {
        let keyword = self
            .keyword
            .as_deref()
            .map(str::trim)
            .map(String::from)
            .or_else(|| existing.map(|k| k.keyword.clone()))
            .unwrap_or_default();
        if keyword.is_empty() {
            return Err("Please enter a keyword".to_string());
        }

        let category = match self.category.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => raw
                .parse()
                .map_err(|_| format!("Unknown keyword category: {raw}"))?,
            _ => existing.map_or_else(SpamCategory::default, |k| k.category),
        };

        let severity = match self.severity.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => raw
                .parse::<i32>()
                .map_err(|_| "Severity must be a whole number".to_string())?,
            _ => existing.map_or(DEFAULT_SEVERITY, |k| k.severity),
        };
        if severity < 0 {
            return Err("Severity cannot be negative".to_string());
        }

        Ok(SpamKeywordInput {
            keyword,
            category,
            severity,
            description: self.description.trim().to_string(),
            is_active: checkbox(self.is_active.as_deref()),
        })
    }
}

/// Keywords ordered by severity, optionally for one category.
#[instrument(skip(state, session, _admin, query))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Query(query): Query<CategoryQuery>,
) -> Result<Json<Page<KeywordsView>>> {
    // An unknown category shows everything rather than failing.
    let category = query
        .category
        .as_deref()
        .and_then(|c| c.trim().parse::<SpamCategory>().ok());

    let repo = SpamKeywordRepository::new(state.pool());
    let keywords = repo.list(category).await?;
    let stats = repo.stats().await?;

    Ok(page(
        &session,
        KeywordsView {
            keywords,
            category,
            stats,
        },
    )
    .await)
}

/// Add a keyword.
#[instrument(skip(state, session, admin, form), fields(admin = %admin.username))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(admin): RequireAdminAuth,
    Form(form): Form<KeywordForm>,
) -> Result<Redirect> {
    let input = match form.into_input(None) {
        Ok(input) => input,
        Err(msg) => return flash_redirect(&session, FlashLevel::Error, msg, KEYWORDS).await,
    };

    match SpamKeywordRepository::new(state.pool()).create(&input).await {
        Ok(id) => {
            state.keywords().invalidate().await;
            info!(keyword_id = %id, "Spam keyword created");
            let msg = format!("Added keyword \"{}\"", input.keyword);
            flash_redirect(&session, FlashLevel::Success, msg, KEYWORDS).await
        }
        Err(e) => write_failed(&session, e, KEYWORDS).await,
    }
}

/// Edit a keyword; omitted fields keep their stored values.
#[instrument(skip(state, session, admin, form), fields(admin = %admin.username, keyword_id = %id))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<SpamKeywordId>,
    Form(form): Form<KeywordForm>,
) -> Result<Redirect> {
    let repo = SpamKeywordRepository::new(state.pool());
    let existing = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("spam keyword {id}")))?;

    let input = match form.into_input(Some(&existing)) {
        Ok(input) => input,
        Err(msg) => return flash_redirect(&session, FlashLevel::Error, msg, KEYWORDS).await,
    };

    match repo.update(id, &input).await {
        Ok(()) => {
            state.keywords().invalidate().await;
            info!("Spam keyword updated");
            let msg = format!("Updated keyword \"{}\"", input.keyword);
            flash_redirect(&session, FlashLevel::Success, msg, KEYWORDS).await
        }
        Err(e) => write_failed(&session, e, KEYWORDS).await,
    }
}

/// Flip a keyword between active and inactive.
#[instrument(skip(state, session, admin), fields(admin = %admin.username, keyword_id = %id))]
pub async fn toggle(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<SpamKeywordId>,
) -> Result<Redirect> {
    let (keyword, is_active) = SpamKeywordRepository::new(state.pool()).toggle(id).await?;
    state.keywords().invalidate().await;

    let status = if is_active { "Enabled" } else { "Disabled" };
    info!(is_active, "Spam keyword toggled");
    flash_redirect(
        &session,
        FlashLevel::Success,
        format!("{status} keyword \"{keyword}\""),
        KEYWORDS,
    )
    .await
}

/// Delete a keyword.
#[instrument(skip(state, session, admin), fields(admin = %admin.username, keyword_id = %id))]
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<SpamKeywordId>,
) -> Result<Redirect> {
    match SpamKeywordRepository::new(state.pool()).delete(id).await {
        Ok(keyword) => {
            state.keywords().invalidate().await;
            info!("Spam keyword deleted");
            let msg = format!("Deleted keyword \"{keyword}\"");
            flash_redirect(&session, FlashLevel::Success, msg, KEYWORDS).await
        }
        Err(e) => write_failed(&session, e, KEYWORDS).await,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn stored() -> SpamKeywordRecord {
        SpamKeywordRecord {
            id: SpamKeywordId::new(7),
            keyword: "hàng fake".to_string(),
            category: SpamCategory::Scam,
            severity: 60,
            description: "old".to_string(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_keyword_rejected() {
        let form = KeywordForm {
            keyword: Some("   ".to_string()),
            ..KeywordForm::default()
        };
        assert_eq!(form.into_input(None), Err("Please enter a keyword".to_string()));
    }

    #[test]
    fn test_new_keyword_defaults() {
        let form = KeywordForm {
            keyword: Some(" mua ngay ".to_string()),
            is_active: Some("on".to_string()),
            ..KeywordForm::default()
        };
        let input = form.into_input(None).unwrap();
        assert_eq!(input.keyword, "mua ngay");
        assert_eq!(input.category, SpamCategory::Other);
        assert_eq!(input.severity, DEFAULT_SEVERITY);
        assert!(input.is_active);
    }

    #[test]
    fn test_edit_keeps_omitted_fields() {
        let existing = stored();
        let form = KeywordForm {
            severity: Some("80".to_string()),
            ..KeywordForm::default()
        };
        let input = form.into_input(Some(&existing)).unwrap();
        assert_eq!(input.keyword, "hàng fake");
        assert_eq!(input.category, SpamCategory::Scam);
        assert_eq!(input.severity, 80);
        // unticked checkbox
        assert!(!input.is_active);
    }
}
