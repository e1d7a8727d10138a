//! Authorization errors.

use thiserror::Error;

/// Authorization error type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The action needs a signed-in user.
    #[error("sign in required")]
    Unauthenticated,

    /// Signed in, but the role is not allowed to do this.
    #[error("insufficient permissions")]
    Forbidden,

    /// The identity has no email address on file.
    #[error("User does not have an email address.")]
    MissingEmail,
}

impl AuthError {
    /// Check if this is a permission error.
    pub fn is_permission_error(&self) -> bool {
        matches!(self, AuthError::Forbidden)
    }
}
