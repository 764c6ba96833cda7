//! Authentication route handlers.
//!
//! Username and password accounts stored locally. Login cycles the session
//! ID; logout drops the whole session, cart included.

use axum::{
    Form, Json,
    extract::{Query, State},
    response::Redirect,
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::{info, instrument, warn};

use super::{Page, flash_redirect, page};
use crate::error::{Result, clear_sentry_user, set_sentry_user, user_message};
use crate::flash::FlashLevel;
use crate::middleware::{OptionalAuth, clear_session, set_current_user};
use crate::models::CurrentUser;
use crate::services::auth::{AuthService, Registration};
use crate::state::AppState;

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub next: Option<String>,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub fullname: String,
    pub email: Option<String>,
}

/// Query parameters for the login page.
#[derive(Debug, Default, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

/// Body of the login and registration pages.
#[derive(Debug, Serialize)]
pub struct AuthPageView {
    pub current_user: Option<CurrentUser>,
    pub next: Option<String>,
}

/// Login page: pending messages and the `next` target.
pub async fn login_page(
    session: Session,
    OptionalAuth(current_user): OptionalAuth,
    Query(query): Query<NextQuery>,
) -> Json<Page<AuthPageView>> {
    let next = query.next.as_deref().and_then(local_path).map(String::from);
    page(&session, AuthPageView { current_user, next }).await
}

/// Registration page.
pub async fn register_page(
    session: Session,
    OptionalAuth(current_user): OptionalAuth,
) -> Json<Page<AuthPageView>> {
    page(
        &session,
        AuthPageView {
            current_user,
            next: None,
        },
    )
    .await
}

/// Handle registration.
#[instrument(skip(state, session, form), fields(username = %form.username))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Redirect> {
    let registration = Registration {
        username: &form.username,
        password: &form.password,
        fullname: &form.fullname,
        email: form.email.as_deref(),
    };

    match AuthService::new(state.pool()).register(&registration).await {
        Ok(user) => {
            info!(user_id = %user.id, "Customer registered");
            flash_redirect(
                &session,
                FlashLevel::Success,
                "Account created, please log in",
                "/login",
            )
            .await
        }
        Err(e) => {
            warn!(error = %e, "Registration failed");
            flash_redirect(&session, FlashLevel::Error, user_message(&e), "/register").await
        }
    }
}

/// Handle login.
///
/// Goes to `next` when it is a local path, otherwise to the back-office for
/// staff and home for everybody else.
#[instrument(skip(state, session, form), fields(username = %form.username))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Redirect> {
    let next = form.next.as_deref().and_then(local_path);

    let user = match AuthService::new(state.pool())
        .login(&form.username, &form.password)
        .await
    {
        Ok(user) => user,
        Err(e) => {
            warn!(error = %e, "Login failed");
            let back = next.map_or_else(|| "/login".to_string(), login_url_with_next);
            return flash_redirect(&session, FlashLevel::Error, user_message(&e), &back).await;
        }
    };

    set_current_user(&session, &user).await?;
    set_sentry_user(&user.id, &user.username);
    info!(user_id = %user.id, "User logged in");

    let target = match (next, state.config().admin_base_url.as_deref()) {
        (Some(next), _) => next.to_string(),
        (None, Some(admin)) if user.is_back_office() => admin.to_string(),
        (None, _) => "/".to_string(),
    };

    Ok(Redirect::to(&target))
}

/// Handle logout.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Redirect> {
    clear_session(&session).await?;
    clear_sentry_user();

    Ok(Redirect::to("/"))
}

/// Accept `next` only when it stays on this site.
fn local_path(next: &str) -> Option<&str> {
    let next = next.trim();
    (next.starts_with('/') && !next.starts_with("//") && !next.contains('\\')).then_some(next)
}

fn login_url_with_next(next: &str) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("next", next)
        .finish();
    format!("/login?{query}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_path_rejects_offsite_targets() {
        assert_eq!(local_path("/checkout"), Some("/checkout"));
        assert_eq!(local_path(" /cart "), Some("/cart"));
        assert_eq!(local_path("https://evil.example"), None);
        assert_eq!(local_path("//evil.example"), None);
        assert_eq!(local_path("/\\evil.example"), None);
        assert_eq!(local_path(""), None);
    }

    #[test]
    fn test_login_url_encodes_next() {
        assert_eq!(login_url_with_next("/product/3"), "/login?next=%2Fproduct%2F3");
    }
}
