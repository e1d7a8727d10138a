//! In-memory store.
//!
//! Tables are plain vectors in insertion order behind one `RwLock`, so every
//! trait method sees a consistent snapshot and multi-row writes are atomic.

use std::cmp::Reverse;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shop_commerce::prelude::*;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};
use crate::store::{OrderQuery, ProductQuery, ReviewQuery, Store};

#[derive(Debug, Default)]
struct Tables {
    products: Vec<Product>,
    carts: Vec<Cart>,
    cart_items: Vec<CartItem>,
    orders: Vec<Order>,
    ordered_items: Vec<OrderedItem>,
    reviews: Vec<Review>,
    favorites: Vec<Favorite>,
}

/// A `Store` kept entirely in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Newest first; among equal timestamps the later insertion wins.
fn newest_first<T: Clone>(rows: &[T], keep: impl Fn(&T) -> bool, created: impl Fn(&T) -> DateTime<Utc>) -> Vec<T> {
    let mut out: Vec<T> = rows.iter().rev().filter(|r| keep(r)).cloned().collect();
    out.sort_by_key(|r| Reverse(created(r)));
    out
}

fn replace<T>(rows: &mut [T], row: T, same: impl Fn(&T) -> bool, entity: &'static str, id: &str) -> DbResult<()> {
    match rows.iter_mut().find(|r| same(r)) {
        Some(slot) => {
            *slot = row;
            Ok(())
        }
        None => Err(DbError::not_found(entity, id)),
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_product(&self, product: Product) -> DbResult<()> {
        let mut t = self.tables.write().await;
        if t.products.iter().any(|p| p.id == product.id) {
            return Err(DbError::Conflict(format!("product {} already exists", product.id)));
        }
        t.products.push(product);
        Ok(())
    }

    async fn get_product(&self, id: &ProductId) -> DbResult<Option<Product>> {
        let t = self.tables.read().await;
        Ok(t.products.iter().find(|p| &p.id == id).cloned())
    }

    async fn update_product(&self, product: Product) -> DbResult<()> {
        let mut t = self.tables.write().await;
        let id = product.id.clone();
        replace(&mut t.products, product, |p| p.id == id, "Product", id.as_str())
    }

    async fn delete_product(&self, id: &ProductId) -> DbResult<Product> {
        let mut t = self.tables.write().await;
        let pos = t
            .products
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| DbError::not_found("Product", id))?;
        let product = t.products.remove(pos);
        t.cart_items.retain(|i| &i.product_id != id);
        t.reviews.retain(|r| &r.product_id != id);
        t.favorites.retain(|f| &f.product_id != id);
        debug!(product_id = %id, "deleted product and dependent rows");
        Ok(product)
    }

    async fn list_products(&self, query: &ProductQuery) -> DbResult<Vec<Product>> {
        let t = self.tables.read().await;
        Ok(newest_first(&t.products, |p| query.matches(p), |p| p.created_at))
    }

    async fn find_cart_by_owner(&self, owner: &UserId) -> DbResult<Option<Cart>> {
        let t = self.tables.read().await;
        Ok(t.carts.iter().find(|c| &c.owner == owner).cloned())
    }

    async fn get_cart(&self, id: &CartId) -> DbResult<Option<Cart>> {
        let t = self.tables.read().await;
        Ok(t.carts.iter().find(|c| &c.id == id).cloned())
    }

    async fn insert_cart(&self, cart: Cart) -> DbResult<()> {
        let mut t = self.tables.write().await;
        if t.carts.iter().any(|c| c.owner == cart.owner || c.id == cart.id) {
            return Err(DbError::Conflict(format!("user {} already has a cart", cart.owner)));
        }
        t.carts.push(cart);
        Ok(())
    }

    async fn update_cart(&self, cart: Cart) -> DbResult<()> {
        let mut t = self.tables.write().await;
        let id = cart.id.clone();
        replace(&mut t.carts, cart, |c| c.id == id, "Cart", id.as_str())
    }

    async fn delete_cart(&self, id: &CartId) -> DbResult<()> {
        let mut t = self.tables.write().await;
        let before = t.carts.len();
        t.carts.retain(|c| &c.id != id);
        if t.carts.len() == before {
            return Err(DbError::not_found("Cart", id));
        }
        t.cart_items.retain(|i| &i.cart_id != id);
        Ok(())
    }

    async fn refresh_cart_summary(&self, id: &CartId) -> DbResult<Cart> {
        let mut t = self.tables.write().await;
        let Tables {
            products,
            carts,
            cart_items,
            ..
        } = &mut *t;
        let cart = carts
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or_else(|| DbError::not_found("Cart", id))?;

        let mut lines = Vec::new();
        for item in cart_items.iter().filter(|i| &i.cart_id == id) {
            match products.iter().find(|p| p.id == item.product_id) {
                Some(product) => lines.push(item.priced(product.price)),
                None => warn!(cart_id = %id, product_id = %item.product_id, "cart item without product skipped"),
            }
        }
        let summary = cart.summarize(&lines);
        cart.apply_summary(summary);
        debug!(cart_id = %id, grand_total = summary.grand_total, "cart totals refreshed");
        Ok(cart.clone())
    }

    async fn carts_containing(&self, product_id: &ProductId) -> DbResult<Vec<CartId>> {
        let t = self.tables.read().await;
        let mut ids: Vec<CartId> = t
            .cart_items
            .iter()
            .filter(|i| &i.product_id == product_id)
            .map(|i| i.cart_id.clone())
            .collect();
        ids.dedup();
        Ok(ids)
    }

    async fn find_cart_item(&self, cart_id: &CartId, product_id: &ProductId) -> DbResult<Option<CartItem>> {
        let t = self.tables.read().await;
        Ok(t
            .cart_items
            .iter()
            .find(|i| &i.cart_id == cart_id && &i.product_id == product_id)
            .cloned())
    }

    async fn get_cart_item(&self, cart_id: &CartId, item_id: &CartItemId) -> DbResult<Option<CartItem>> {
        let t = self.tables.read().await;
        Ok(t
            .cart_items
            .iter()
            .find(|i| &i.cart_id == cart_id && &i.id == item_id)
            .cloned())
    }

    async fn insert_cart_item(&self, item: CartItem) -> DbResult<()> {
        let mut t = self.tables.write().await;
        if !t.carts.iter().any(|c| c.id == item.cart_id) {
            return Err(DbError::not_found("Cart", &item.cart_id));
        }
        if t
            .cart_items
            .iter()
            .any(|i| i.cart_id == item.cart_id && i.product_id == item.product_id)
        {
            return Err(DbError::Conflict(format!(
                "cart {} already holds product {}",
                item.cart_id, item.product_id
            )));
        }
        t.cart_items.push(item);
        Ok(())
    }

    async fn update_cart_item(&self, item: CartItem) -> DbResult<()> {
        let mut t = self.tables.write().await;
        let (id, cart_id) = (item.id.clone(), item.cart_id.clone());
        replace(
            &mut t.cart_items,
            item,
            |i| i.id == id && i.cart_id == cart_id,
            "CartItem",
            id.as_str(),
        )
    }

    async fn delete_cart_item(&self, cart_id: &CartId, item_id: &CartItemId) -> DbResult<()> {
        let mut t = self.tables.write().await;
        let before = t.cart_items.len();
        t.cart_items.retain(|i| !(&i.cart_id == cart_id && &i.id == item_id));
        if t.cart_items.len() == before {
            return Err(DbError::not_found("CartItem", item_id));
        }
        Ok(())
    }

    async fn list_cart_items(&self, cart_id: &CartId) -> DbResult<Vec<CartItem>> {
        let t = self.tables.read().await;
        Ok(newest_first(&t.cart_items, |i| &i.cart_id == cart_id, |i| i.created_at))
    }

    async fn insert_order(&self, order: Order, items: Vec<OrderedItem>) -> DbResult<()> {
        let mut t = self.tables.write().await;
        if t.orders.iter().any(|o| o.id == order.id) {
            return Err(DbError::Conflict(format!("order {} already exists", order.id)));
        }
        if let Some(stray) = items.iter().find(|i| i.order_id != order.id) {
            return Err(DbError::Conflict(format!(
                "ordered item {} belongs to order {}",
                stray.id, stray.order_id
            )));
        }
        t.orders.push(order);
        t.ordered_items.extend(items);
        Ok(())
    }

    async fn get_order(&self, id: &OrderId) -> DbResult<Option<Order>> {
        let t = self.tables.read().await;
        Ok(t.orders.iter().find(|o| &o.id == id).cloned())
    }

    async fn update_order(&self, order: Order) -> DbResult<()> {
        let mut t = self.tables.write().await;
        let id = order.id.clone();
        replace(&mut t.orders, order, |o| o.id == id, "Order", id.as_str())
    }

    async fn list_orders(&self, query: &OrderQuery) -> DbResult<Vec<Order>> {
        let t = self.tables.read().await;
        Ok(newest_first(&t.orders, |o| query.matches(o), |o| o.created_at))
    }

    async fn list_ordered_items(&self, order_id: &OrderId) -> DbResult<Vec<OrderedItem>> {
        let t = self.tables.read().await;
        Ok(t
            .ordered_items
            .iter()
            .filter(|i| &i.order_id == order_id)
            .cloned()
            .collect())
    }

    async fn delete_unpaid_orders_before(&self, cutoff: DateTime<Utc>) -> DbResult<u64> {
        let mut t = self.tables.write().await;
        let doomed: Vec<OrderId> = t
            .orders
            .iter()
            .filter(|o| !o.is_paid && o.updated_at < cutoff)
            .map(|o| o.id.clone())
            .collect();
        t.orders.retain(|o| !doomed.contains(&o.id));
        t.ordered_items.retain(|i| !doomed.contains(&i.order_id));
        Ok(doomed.len() as u64)
    }

    async fn insert_review(&self, review: Review) -> DbResult<()> {
        let mut t = self.tables.write().await;
        if t.reviews.iter().any(|r| r.id == review.id) {
            return Err(DbError::Conflict(format!("review {} already exists", review.id)));
        }
        t.reviews.push(review);
        Ok(())
    }

    async fn get_review(&self, id: &ReviewId) -> DbResult<Option<Review>> {
        let t = self.tables.read().await;
        Ok(t.reviews.iter().find(|r| &r.id == id).cloned())
    }

    async fn update_review(&self, review: Review) -> DbResult<()> {
        let mut t = self.tables.write().await;
        let (id, author) = (review.id.clone(), review.author.clone());
        replace(
            &mut t.reviews,
            review,
            |r| r.id == id && r.author == author,
            "Review",
            id.as_str(),
        )
    }

    async fn delete_review(&self, id: &ReviewId, author: &UserId) -> DbResult<()> {
        let mut t = self.tables.write().await;
        let before = t.reviews.len();
        t.reviews.retain(|r| !(&r.id == id && &r.author == author));
        if t.reviews.len() == before {
            return Err(DbError::not_found("Review", id));
        }
        Ok(())
    }

    async fn list_reviews(&self, query: &ReviewQuery) -> DbResult<Vec<Review>> {
        let t = self.tables.read().await;
        Ok(newest_first(&t.reviews, |r| query.matches(r), |r| r.created_at))
    }

    async fn find_favorite(&self, owner: &UserId, product_id: &ProductId) -> DbResult<Option<Favorite>> {
        let t = self.tables.read().await;
        Ok(t
            .favorites
            .iter()
            .find(|f| &f.owner == owner && &f.product_id == product_id)
            .cloned())
    }

    async fn insert_favorite(&self, favorite: Favorite) -> DbResult<()> {
        let mut t = self.tables.write().await;
        if t
            .favorites
            .iter()
            .any(|f| f.owner == favorite.owner && f.product_id == favorite.product_id)
        {
            return Err(DbError::Conflict(format!(
                "product {} is already a favorite",
                favorite.product_id
            )));
        }
        t.favorites.push(favorite);
        Ok(())
    }

    async fn delete_favorite(&self, id: &FavoriteId, owner: &UserId) -> DbResult<()> {
        let mut t = self.tables.write().await;
        let before = t.favorites.len();
        t.favorites.retain(|f| !(&f.id == id && &f.owner == owner));
        if t.favorites.len() == before {
            return Err(DbError::not_found("Favorite", id));
        }
        Ok(())
    }

    async fn list_favorites(&self, owner: &UserId) -> DbResult<Vec<Favorite>> {
        let t = self.tables.read().await;
        Ok(newest_first(&t.favorites, |f| &f.owner == owner, |f| f.created_at))
    }
}
