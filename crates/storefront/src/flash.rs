//! One-shot messages carried across a redirect.
//!
//! Handlers push a message before redirecting; the next read handler takes
//! all pending messages out of the session and includes them in its response.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tower_sessions::session::Error as SessionError;

use crate::models::session_keys;

/// Severity of a flash message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// A message shown once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub level: FlashLevel,
    pub text: String,
}

/// Queue a message for the next page view.
///
/// # Errors
///
/// Returns the session store error if the session cannot be written.
pub async fn push(
    session: &Session,
    level: FlashLevel,
    text: impl Into<String>,
) -> Result<(), SessionError> {
    let mut pending: Vec<FlashMessage> = session
        .get(session_keys::FLASH)
        .await
        .ok()
        .flatten()
        .unwrap_or_default();
    pending.push(FlashMessage {
        level,
        text: text.into(),
    });
    session.insert(session_keys::FLASH, pending).await
}

/// Take every pending message, leaving none behind.
///
/// Unreadable entries are dropped.
pub async fn take(session: &Session) -> Vec<FlashMessage> {
    match session.remove::<Vec<FlashMessage>>(session_keys::FLASH).await {
        Ok(messages) => messages.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(error = %e, "Discarding unreadable flash messages");
            let _ = session.remove_value(session_keys::FLASH).await;
            Vec::new()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cart::tests::memory_session;

    #[tokio::test]
    async fn test_push_then_take_once() {
        let session = memory_session();
        push(&session, FlashLevel::Warning, "Giỏ hàng trống").await.unwrap();
        push(&session, FlashLevel::Info, "second").await.unwrap();

        let messages = take(&session).await;
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].level, FlashLevel::Warning);
        assert_eq!(messages[0].text, "Giỏ hàng trống");

        assert!(take(&session).await.is_empty());
    }

    #[test]
    fn test_level_serializes_lowercase() {
        let json = serde_json::to_string(&FlashLevel::Success).unwrap();
        assert_eq!(json, "\"success\"");
    }
}
