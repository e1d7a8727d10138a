//! Favorited products.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{FavoriteId, ProductId, UserId};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Favorite {
    pub id: FavoriteId,
    pub product_id: ProductId,
    pub owner: UserId,
    pub created_at: DateTime<Utc>,
}

impl Favorite {
    pub fn new(product_id: ProductId, owner: UserId) -> Self {
        Self {
            id: FavoriteId::generate(),
            product_id,
            owner,
            created_at: Utc::now(),
        }
    }
}

/// Result of toggling a favorite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FavoriteToggle {
    Added(FavoriteId),
    Removed,
}

impl FavoriteToggle {
    pub fn message(&self) -> &'static str {
        match self {
            FavoriteToggle::Added(_) => "Added to Faves",
            FavoriteToggle::Removed => "Removed from Faves",
        }
    }
}
