//! Staff login and logout.

use axum::{Form, Json, extract::State, response::Redirect};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::{info, instrument, warn};

use super::{Page, flash_redirect, page};
use crate::error::{Result, clear_sentry_user, login_message, set_sentry_user};
use crate::flash::FlashLevel;
use crate::middleware::{clear_session, set_current_admin};
use crate::models::{CurrentAdmin, session_keys};
use crate::services::AdminAuthService;
use crate::state::AppState;

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Login page body.
#[derive(Debug, Serialize)]
pub struct LoginPageView {
    /// Staff member already signed in on this session, if any.
    pub current_admin: Option<CurrentAdmin>,
}

/// Login page: pending messages and the current session identity.
pub async fn login_page(session: Session) -> Json<Page<LoginPageView>> {
    let current_admin = session
        .get::<CurrentAdmin>(session_keys::CURRENT_ADMIN)
        .await
        .ok()
        .flatten();

    page(&session, LoginPageView { current_admin }).await
}

/// Handle staff login.
#[instrument(skip(state, session, form), fields(username = %form.username))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Redirect> {
    let admin = match AdminAuthService::new(state.pool())
        .login(&form.username, &form.password)
        .await
    {
        Ok(admin) => admin,
        Err(e) => {
            warn!(error = %e, "Admin login failed");
            return flash_redirect(&session, FlashLevel::Error, login_message(&e), "/login").await;
        }
    };

    set_current_admin(&session, &admin).await?;
    set_sentry_user(&admin.id, &admin.username);
    info!(user_id = %admin.id, role = %admin.role, "Admin logged in");

    Ok(Redirect::to("/"))
}

/// Handle logout.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Redirect> {
    clear_session(&session).await?;
    clear_sentry_user();

    Ok(Redirect::to("/login"))
}
