//! Authorization for the storefront.
//!
//! The identity provider tells us who a request belongs to (a user id and
//! maybe an email). This crate turns that into one of three roles, in one
//! place:
//!
//! ```rust
//! use shop_auth::{classify, AdminRegistry, Role};
//! use shop_commerce::UserId;
//!
//! let admins = AdminRegistry::from_json(r#"["user_admin"]"#);
//! assert_eq!(classify(None, &admins), Role::Guest);
//! assert_eq!(classify(Some(&UserId::new("user_admin")), &admins), Role::Admin);
//! assert_eq!(classify(Some(&UserId::new("user_42")), &admins), Role::User);
//! ```

mod error;
mod identity;
mod links;
mod role;

pub use error::AuthError;
pub use identity::Identity;
pub use links::{admin_sidebar_links, nav_links, NavLink};
pub use role::{classify, AdminRegistry, Role};
