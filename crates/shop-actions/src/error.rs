//! Action errors and the message shape shown to users.

use serde::Serialize;
use shop_auth::AuthError;
use shop_commerce::CommerceError;
use shop_db::DbError;
use thiserror::Error;
use tracing::error;

pub type ActionResult<T> = Result<T, ActionError>;

#[derive(Debug, Error)]
pub enum ActionError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Commerce(#[from] CommerceError),

    #[error(transparent)]
    Db(#[from] DbError),

    #[error("Payment provider error: {0}")]
    Payment(String),

    #[error("Image storage error: {0}")]
    Image(String),
}

impl ActionError {
    /// Errors caused by the caller's identity rather than the request.
    pub fn is_permission_error(&self) -> bool {
        matches!(self, ActionError::Auth(e) if e.is_permission_error())
    }

    pub fn is_not_found(&self) -> bool {
        match self {
            ActionError::Commerce(e) => e.is_not_found(),
            ActionError::Db(DbError::NotFound { .. }) => true,
            _ => false,
        }
    }
}

/// Outcome text for a form submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionMessage {
    pub message: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub error: bool,
}

impl ActionMessage {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: false,
        }
    }
}

/// Log an action failure and turn it into a message for the user.
pub fn render_error(err: &ActionError) -> ActionMessage {
    error!(error = %err, "action failed");
    ActionMessage {
        message: err.to_string(),
        error: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_error_keeps_message() {
        let err = ActionError::from(AuthError::MissingEmail);
        let msg = render_error(&err);
        assert!(msg.error);
        assert_eq!(msg.message, "User does not have an email address.");
    }

    #[test]
    fn test_classification() {
        assert!(ActionError::from(AuthError::Forbidden).is_permission_error());
        assert!(ActionError::from(CommerceError::ProductNotFound("p".into())).is_not_found());
        assert!(ActionError::from(DbError::not_found("Cart", "c")).is_not_found());
        assert!(!ActionError::Payment("down".into()).is_not_found());
    }

    #[test]
    fn test_ok_message_serializes_without_error_flag() {
        let json = serde_json::to_string(&ActionMessage::ok("cart updated")).unwrap();
        assert_eq!(json, r#"{"message":"cart updated"}"#);
    }
}
