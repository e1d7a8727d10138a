//! The storage interface.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shop_commerce::prelude::*;

use crate::error::DbResult;

/// Product listing filter. Results are newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    /// Case-insensitive substring on name or company.
    pub search: Option<String>,
    pub featured_only: bool,
}

impl ProductQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn featured() -> Self {
        Self {
            search: None,
            featured_only: true,
        }
    }

    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: Some(term.into()),
            featured_only: false,
        }
    }

    pub fn matches(&self, product: &Product) -> bool {
        if self.featured_only && !product.featured {
            return false;
        }
        self.search
            .as_deref()
            .map_or(true, |term| product.matches_search(term))
    }
}

/// Order listing filter. Results are newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderQuery {
    pub owner: Option<UserId>,
    pub paid: Option<bool>,
}

impl OrderQuery {
    pub fn matches(&self, order: &Order) -> bool {
        self.owner.as_ref().map_or(true, |o| &order.owner == o)
            && self.paid.map_or(true, |p| order.is_paid == p)
    }
}

/// Review listing filter. Results are newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewQuery {
    pub product: Option<ProductId>,
    pub author: Option<UserId>,
}

impl ReviewQuery {
    pub fn matches(&self, review: &Review) -> bool {
        self.product.as_ref().map_or(true, |p| &review.product_id == p)
            && self.author.as_ref().map_or(true, |a| &review.author == a)
    }
}

/// Everything the storefront persists.
///
/// Multi-row writes (`insert_order`, `delete_cart`, `delete_product`,
/// `delete_unpaid_orders_before`, `refresh_cart_summary`) are atomic: either every row changes or
/// none does.
#[async_trait]
pub trait Store: Send + Sync {
    // --- products ---

    async fn insert_product(&self, product: Product) -> DbResult<()>;

    async fn get_product(&self, id: &ProductId) -> DbResult<Option<Product>>;

    async fn update_product(&self, product: Product) -> DbResult<()>;

    /// Delete a product together with the cart items, reviews and favorites
    /// that reference it.
    async fn delete_product(&self, id: &ProductId) -> DbResult<Product>;

    async fn list_products(&self, query: &ProductQuery) -> DbResult<Vec<Product>>;

    // --- carts ---

    async fn find_cart_by_owner(&self, owner: &UserId) -> DbResult<Option<Cart>>;

    async fn get_cart(&self, id: &CartId) -> DbResult<Option<Cart>>;

    /// Fails with `Conflict` if the owner already has a cart.
    async fn insert_cart(&self, cart: Cart) -> DbResult<()>;

    async fn update_cart(&self, cart: Cart) -> DbResult<()>;

    /// Delete a cart and all of its items.
    async fn delete_cart(&self, id: &CartId) -> DbResult<()>;

    /// Recompute a cart's summary from its current items and the products'
    /// current prices, and persist it, as one atomic step. Items whose
    /// product no longer exists are left out of the totals.
    async fn refresh_cart_summary(&self, id: &CartId) -> DbResult<Cart>;

    /// Carts holding at least one item of `product_id`.
    async fn carts_containing(&self, product_id: &ProductId) -> DbResult<Vec<CartId>>;

    // --- cart items ---

    async fn find_cart_item(&self, cart_id: &CartId, product_id: &ProductId) -> DbResult<Option<CartItem>>;

    async fn get_cart_item(&self, cart_id: &CartId, item_id: &CartItemId) -> DbResult<Option<CartItem>>;

    /// Fails with `Conflict` if the cart already holds this product.
    async fn insert_cart_item(&self, item: CartItem) -> DbResult<()>;

    async fn update_cart_item(&self, item: CartItem) -> DbResult<()>;

    async fn delete_cart_item(&self, cart_id: &CartId, item_id: &CartItemId) -> DbResult<()>;

    /// Items of a cart, newest first.
    async fn list_cart_items(&self, cart_id: &CartId) -> DbResult<Vec<CartItem>>;

    // --- orders ---

    /// Insert an order and its items atomically.
    async fn insert_order(&self, order: Order, items: Vec<OrderedItem>) -> DbResult<()>;

    async fn get_order(&self, id: &OrderId) -> DbResult<Option<Order>>;

    async fn update_order(&self, order: Order) -> DbResult<()>;

    async fn list_orders(&self, query: &OrderQuery) -> DbResult<Vec<Order>>;

    async fn list_ordered_items(&self, order_id: &OrderId) -> DbResult<Vec<OrderedItem>>;

    /// Delete unpaid orders last updated before `cutoff`; returns how many.
    async fn delete_unpaid_orders_before(&self, cutoff: DateTime<Utc>) -> DbResult<u64>;

    // --- reviews ---

    async fn insert_review(&self, review: Review) -> DbResult<()>;

    async fn get_review(&self, id: &ReviewId) -> DbResult<Option<Review>>;

    async fn update_review(&self, review: Review) -> DbResult<()>;

    /// Delete a review written by `author`.
    async fn delete_review(&self, id: &ReviewId, author: &UserId) -> DbResult<()>;

    async fn list_reviews(&self, query: &ReviewQuery) -> DbResult<Vec<Review>>;

    // --- favorites ---

    async fn find_favorite(&self, owner: &UserId, product_id: &ProductId) -> DbResult<Option<Favorite>>;

    async fn insert_favorite(&self, favorite: Favorite) -> DbResult<()>;

    /// Delete a favorite belonging to `owner`.
    async fn delete_favorite(&self, id: &FavoriteId, owner: &UserId) -> DbResult<()>;

    /// Favorites of `owner`, newest first.
    async fn list_favorites(&self, owner: &UserId) -> DbResult<Vec<Favorite>>;
}
