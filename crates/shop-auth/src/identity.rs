//! The classified identity attached to a request.

use serde::{Deserialize, Serialize};
use shop_commerce::UserId;

use crate::error::AuthError;
use crate::role::{classify, AdminRegistry, Role};

/// Who is making a request, as far as the storefront cares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    user_id: Option<UserId>,
    email: Option<String>,
    role: Role,
}

impl Identity {
    /// An anonymous visitor.
    pub fn guest() -> Self {
        Self {
            user_id: None,
            email: None,
            role: Role::Guest,
        }
    }

    /// A signed-in user; the role is classified against `admins`.
    pub fn signed_in(user_id: UserId, email: Option<String>, admins: &AdminRegistry) -> Self {
        let role = classify(Some(&user_id), admins);
        Self {
            user_id: Some(user_id),
            email,
            role,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn user_id(&self) -> Option<&UserId> {
        self.user_id.as_ref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// The user id, or `Unauthenticated` for guests.
    pub fn require_user(&self) -> Result<&UserId, AuthError> {
        self.user_id.as_ref().ok_or(AuthError::Unauthenticated)
    }

    /// The user id of an admin.
    pub fn require_admin(&self) -> Result<&UserId, AuthError> {
        let id = self.require_user()?;
        if self.role.is_admin() {
            Ok(id)
        } else {
            Err(AuthError::Forbidden)
        }
    }

    /// The first email address on file.
    pub fn require_email(&self) -> Result<&str, AuthError> {
        self.require_user()?;
        self.email
            .as_deref()
            .filter(|e| !e.is_empty())
            .ok_or(AuthError::MissingEmail)
    }
}

impl Default for Identity {
    fn default() -> Self {
        Self::guest()
    }
}
