//! One-shot messages for the back-office.
//!
//! Every mutating screen answers with a redirect; the message it pushes is
//! returned by the next read.

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

/// Take every pending message.
pub async fn take(session: &Session) -> Vec<FlashMessage> {
    session
        .remove::<Vec<FlashMessage>>(session_keys::FLASH)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;

    #[tokio::test]
    async fn test_messages_are_taken_once() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        push(&session, FlashLevel::Success, "Đã thêm thương hiệu").await.unwrap();

        let messages = take(&session).await;
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].level, FlashLevel::Success);
        assert!(take(&session).await.is_empty());
    }
}
