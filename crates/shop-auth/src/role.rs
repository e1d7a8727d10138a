//! Roles and admin classification.

use std::collections::HashSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use shop_commerce::UserId;
use tracing::error;

/// What a request is allowed to see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Not signed in.
    #[default]
    Guest,
    /// Signed-in customer.
    User,
    /// Store administrator.
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Guest => "guest",
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    pub fn is_signed_in(&self) -> bool {
        !matches!(self, Role::Guest)
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Check if this role has at least the given permission level.
    pub fn has_permission(&self, required: Role) -> bool {
        *self >= required
    }
}

impl FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "guest" => Ok(Role::Guest),
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The set of user ids with admin rights. Built once at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminRegistry {
    ids: HashSet<UserId>,
}

impl AdminRegistry {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: ids.into_iter().map(UserId::new).collect(),
        }
    }

    /// Parse a JSON array of strings. Anything else is logged and yields an
    /// empty registry.
    pub fn from_json(raw: &str) -> Self {
        match serde_json::from_str::<Vec<String>>(raw) {
            Ok(ids) => Self::new(ids),
            Err(e) => {
                error!(error = %e, "admin user id list is not a valid string array");
                Self::default()
            }
        }
    }

    pub fn contains(&self, user_id: &UserId) -> bool {
        self.ids.contains(user_id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// The only place a role is derived.
pub fn classify(user_id: Option<&UserId>, admins: &AdminRegistry) -> Role {
    match user_id {
        None => Role::Guest,
        Some(id) if admins.contains(id) => Role::Admin,
        Some(_) => Role::User,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        let admins = AdminRegistry::new(["user_admin"]);
        assert_eq!(classify(None, &admins), Role::Guest);
        assert_eq!(classify(Some(&UserId::new("user_admin")), &admins), Role::Admin);
        assert_eq!(classify(Some(&UserId::new("user_other")), &admins), Role::User);
    }

    #[test]
    fn test_registry_from_json() {
        let admins = AdminRegistry::from_json(r#"["a", "b"]"#);
        assert_eq!(admins.len(), 2);
        assert!(admins.contains(&UserId::new("b")));
    }

    #[test]
    fn test_registry_from_bad_json_is_empty() {
        assert!(AdminRegistry::from_json("not json").is_empty());
        assert!(AdminRegistry::from_json(r#"[1, 2]"#).is_empty());
        assert!(AdminRegistry::from_json(r#"{"a": 1}"#).is_empty());
    }

    #[test]
    fn test_role_permissions() {
        assert!(Role::Admin.has_permission(Role::User));
        assert!(Role::User.has_permission(Role::User));
        assert!(!Role::Guest.has_permission(Role::User));
        assert!(!Role::User.has_permission(Role::Admin));
    }

    #[test]
    fn test_role_round_trip_str() {
        for role in [Role::Guest, Role::User, Role::Admin] {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
        assert!("root".parse::<Role>().is_err());
    }
}
