//! Newtype IDs for type-safe identifiers.
//!
//! A `CartItemId` can never be handed to something expecting a `ProductId`.
//! `UserId` values come from the identity provider and are opaque strings.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create an ID from an existing string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Generate a fresh random ID.
            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(
    /// Catalog product.
    ProductId
);
define_id!(
    /// A user's cart.
    CartId
);
define_id!(
    /// One product entry inside a cart.
    CartItemId
);
define_id!(
    /// Placed order.
    OrderId
);
define_id!(
    /// One product entry inside an order.
    OrderedItemId
);
define_id!(
    /// Product review.
    ReviewId
);
define_id!(
    /// Favorited product marker.
    FavoriteId
);
define_id!(
    /// User id issued by the identity provider.
    UserId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_creation() {
        let id = ProductId::new("prod-123");
        assert_eq!(id.as_str(), "prod-123");
        assert_eq!(id.to_string(), "prod-123");
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = CartItemId::generate();
        let b = CartItemId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let id = UserId::new("user_2abc");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"user_2abc\"");
    }
}
