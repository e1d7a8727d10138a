//! Cart actions.

use std::sync::Arc;

use serde::Serialize;
use shop_auth::Identity;
use shop_commerce::format::pluralize;
use shop_commerce::prelude::*;
use shop_db::{DbError, Store};
use tracing::{debug, info};

use crate::error::{ActionError, ActionMessage, ActionResult};
use crate::settings::ShopSettings;

/// Result of a successful add-to-cart.
#[derive(Debug, Clone, PartialEq)]
pub struct AddedToCart {
    pub message: ActionMessage,
    /// Configured page to move to afterwards, if any.
    pub redirect: Option<String>,
    pub cart: Cart,
}

/// A cart with its items joined to their products, newest item first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartView {
    pub cart: Cart,
    pub items: Vec<(CartItem, Product)>,
}

pub struct CartService<S> {
    store: Arc<S>,
    settings: ShopSettings,
}

impl<S: Store> CartService<S> {
    pub fn new(store: Arc<S>, settings: ShopSettings) -> Self {
        Self { store, settings }
    }

    /// Stored item count of the caller's cart; zero for guests and empty carts.
    pub async fn number_of_items(&self, identity: &Identity) -> ActionResult<i64> {
        let Some(user) = identity.user_id() else {
            return Ok(0);
        };
        let cart = self.store.find_cart_by_owner(user).await?;
        Ok(cart.map_or(0, |c| c.item_count()))
    }

    /// The owner's cart, created on first use unless `error_if_none`.
    pub async fn fetch_or_create_cart(&self, owner: &UserId, error_if_none: bool) -> ActionResult<Cart> {
        if let Some(cart) = self.store.find_cart_by_owner(owner).await? {
            return Ok(cart);
        }
        if error_if_none {
            return Err(CommerceError::CartNotFound(owner.to_string()).into());
        }

        let cart = Cart::new(
            owner.clone(),
            self.settings.currency,
            self.settings.tax_rate,
            self.settings.shipping_fee,
        );
        match self.store.insert_cart(cart.clone()).await {
            Ok(()) => {
                debug!(owner = %owner, cart_id = %cart.id, "cart created");
                Ok(cart)
            }
            // Lost a creation race; use the winner's cart.
            Err(DbError::Conflict(_)) => self
                .store
                .find_cart_by_owner(owner)
                .await?
                .ok_or_else(|| CommerceError::CartNotFound(owner.to_string()).into()),
            Err(e) => Err(e.into()),
        }
    }

    /// Recompute and persist a cart's summary from its items and the
    /// products' current prices.
    pub async fn refresh_totals(&self, cart_id: &CartId) -> ActionResult<Cart> {
        Ok(self.store.refresh_cart_summary(cart_id).await?)
    }

    pub async fn add_to_cart(
        &self,
        identity: &Identity,
        product_id: &ProductId,
        amount: i64,
    ) -> ActionResult<AddedToCart> {
        let user = identity.require_user()?;
        validate_quantity(amount, self.settings.max_quantity)?;
        let product = self
            .store
            .get_product(product_id)
            .await?
            .ok_or_else(|| CommerceError::ProductNotFound(product_id.to_string()))?;

        let cart = self.fetch_or_create_cart(user, false).await?;
        self.upsert_item(&cart, product_id, amount).await?;
        let cart = self.refresh_totals(&cart.id).await?;

        let verb = if amount > 1 { "have" } else { "has" };
        let message = format!(
            "{amount} {} {verb} been added to your cart",
            pluralize(&product.name, amount)
        );
        info!(user = %user, product_id = %product_id, amount, "added to cart");

        Ok(AddedToCart {
            message: ActionMessage::ok(message),
            redirect: self.settings.redirect_after_add.clone(),
            cart,
        })
    }

    /// Add `amount` to an existing line or create one.
    async fn upsert_item(&self, cart: &Cart, product_id: &ProductId, amount: i64) -> ActionResult<()> {
        let limit = self.settings.max_quantity;
        if let Some(mut item) = self.store.find_cart_item(&cart.id, product_id).await? {
            let quantity = item.quantity.saturating_add(amount);
            validate_quantity(quantity, limit)?;
            item.set_quantity(quantity);
            self.store.update_cart_item(item).await?;
            return Ok(());
        }

        let item = CartItem::new(cart.id.clone(), product_id.clone(), amount);
        match self.store.insert_cart_item(item).await {
            Ok(()) => Ok(()),
            // Another request inserted the line first; add to it.
            Err(DbError::Conflict(_)) => {
                let mut item = self
                    .store
                    .find_cart_item(&cart.id, product_id)
                    .await?
                    .ok_or_else(|| CommerceError::CartItemNotFound(product_id.to_string()))?;
                let quantity = item.quantity.saturating_add(amount);
                validate_quantity(quantity, limit)?;
                item.set_quantity(quantity);
                self.store.update_cart_item(item).await?;
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn remove_cart_item(&self, identity: &Identity, item_id: &CartItemId) -> ActionResult<ActionMessage> {
        let user = identity.require_user()?;
        let cart = self.fetch_or_create_cart(user, true).await?;
        self.store
            .delete_cart_item(&cart.id, item_id)
            .await
            .map_err(|e| not_found_as_item(e, item_id))?;
        self.refresh_totals(&cart.id).await?;
        Ok(ActionMessage::ok("Item removed from cart"))
    }

    pub async fn update_cart_item(
        &self,
        identity: &Identity,
        item_id: &CartItemId,
        amount: i64,
    ) -> ActionResult<ActionMessage> {
        let user = identity.require_user()?;
        validate_quantity(amount, self.settings.max_quantity)?;
        let cart = self.fetch_or_create_cart(user, true).await?;
        let mut item = self
            .store
            .get_cart_item(&cart.id, item_id)
            .await?
            .ok_or_else(|| CommerceError::CartItemNotFound(item_id.to_string()))?;
        item.set_quantity(amount);
        self.store.update_cart_item(item).await?;
        self.refresh_totals(&cart.id).await?;
        Ok(ActionMessage::ok("cart updated"))
    }

    /// The caller's cart with products, creating an empty cart if needed.
    pub async fn cart_view(&self, identity: &Identity) -> ActionResult<CartView> {
        let user = identity.require_user()?;
        let cart = self.fetch_or_create_cart(user, false).await?;
        let items = self.store.list_cart_items(&cart.id).await?;
        let mut joined = Vec::with_capacity(items.len());
        for item in items {
            if let Some(product) = self.store.get_product(&item.product_id).await? {
                joined.push((item, product));
            }
        }
        Ok(CartView { cart, items: joined })
    }
}

fn not_found_as_item(err: DbError, item_id: &CartItemId) -> ActionError {
    match err {
        DbError::NotFound { .. } => CommerceError::CartItemNotFound(item_id.to_string()).into(),
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use shop_auth::AuthError;
    use shop_db::MemoryStore;

    fn service(store: &Arc<MemoryStore>) -> CartService<MemoryStore> {
        CartService::new(store.clone(), ShopSettings::default())
    }

    #[tokio::test]
    async fn test_guest_has_no_items() {
        let store = Arc::new(MemoryStore::new());
        let carts = service(&store);
        assert_eq!(carts.number_of_items(&Identity::guest()).await.unwrap(), 0);
        assert_eq!(carts.number_of_items(&customer("sam")).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_add_to_cart_totals() {
        let store = Arc::new(MemoryStore::new());
        let mug = seed_product(&store, "Mug", 500).await;
        let lamp = seed_product(&store, "Lamp", 1000).await;
        let carts = service(&store);
        let sam = customer("sam");

        let added = carts.add_to_cart(&sam, &mug.id, 2).await.unwrap();
        assert_eq!(added.message.message, "2 Mugs have been added to your cart");
        assert_eq!(added.redirect, None);

        let added = carts.add_to_cart(&sam, &lamp.id, 1).await.unwrap();
        assert_eq!(added.message.message, "1 Lamp has been added to your cart");

        let summary = added.cart.summary;
        assert_eq!(summary.item_count, 3);
        assert_eq!(summary.subtotal, 2000);
        assert_eq!(summary.tax_amount, 160);
        assert_eq!(summary.shipping_fee, 500);
        assert_eq!(summary.grand_total, 2660);
        assert_eq!(carts.number_of_items(&sam).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_add_merges_quantities() {
        let store = Arc::new(MemoryStore::new());
        let mug = seed_product(&store, "Mug", 500).await;
        let carts = service(&store);
        let sam = customer("sam");

        carts.add_to_cart(&sam, &mug.id, 2).await.unwrap();
        carts.add_to_cart(&sam, &mug.id, 3).await.unwrap();

        let view = carts.cart_view(&sam).await.unwrap();
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].0.quantity, 5);
        assert_eq!(view.cart.summary.subtotal, 2500);
    }

    #[tokio::test]
    async fn test_add_rejects_bad_input() {
        let store = Arc::new(MemoryStore::new());
        let mug = seed_product(&store, "Mug", 500).await;
        let carts = service(&store);
        let sam = customer("sam");

        assert!(matches!(
            carts.add_to_cart(&Identity::guest(), &mug.id, 1).await,
            Err(ActionError::Auth(AuthError::Unauthenticated))
        ));
        assert!(matches!(
            carts.add_to_cart(&sam, &mug.id, 0).await,
            Err(ActionError::Commerce(CommerceError::InvalidQuantity(0)))
        ));
        assert!(matches!(
            carts.add_to_cart(&sam, &ProductId::new("nope"), 1).await,
            Err(ActionError::Commerce(CommerceError::ProductNotFound(_)))
        ));

        carts.add_to_cart(&sam, &mug.id, MAX_QUANTITY_PER_ITEM).await.unwrap();
        assert!(matches!(
            carts.add_to_cart(&sam, &mug.id, 1).await,
            Err(ActionError::Commerce(CommerceError::QuantityExceedsLimit(_, _)))
        ));
    }

    #[tokio::test]
    async fn test_configured_redirect() {
        let store = Arc::new(MemoryStore::new());
        let mug = seed_product(&store, "Mug", 500).await;
        let settings = ShopSettings {
            redirect_after_add: Some("/cart".to_string()),
            ..ShopSettings::default()
        };
        let carts = CartService::new(store.clone(), settings);
        let added = carts.add_to_cart(&customer("sam"), &mug.id, 1).await.unwrap();
        assert_eq!(added.redirect.as_deref(), Some("/cart"));
    }

    #[tokio::test]
    async fn test_update_and_remove() {
        let store = Arc::new(MemoryStore::new());
        let mug = seed_product(&store, "Mug", 500).await;
        let carts = service(&store);
        let sam = customer("sam");
        carts.add_to_cart(&sam, &mug.id, 1).await.unwrap();
        let item_id = carts.cart_view(&sam).await.unwrap().items[0].0.id.clone();

        let msg = carts.update_cart_item(&sam, &item_id, 4).await.unwrap();
        assert_eq!(msg.message, "cart updated");
        assert_eq!(carts.number_of_items(&sam).await.unwrap(), 4);

        let msg = carts.remove_cart_item(&sam, &item_id).await.unwrap();
        assert_eq!(msg.message, "Item removed from cart");
        let view = carts.cart_view(&sam).await.unwrap();
        assert!(view.items.is_empty());
        assert!(view.cart.summary.is_empty());
        assert_eq!(view.cart.summary.grand_total, 0);

        assert!(matches!(
            carts.remove_cart_item(&sam, &item_id).await,
            Err(ActionError::Commerce(CommerceError::CartItemNotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_mutations_need_existing_cart() {
        let store = Arc::new(MemoryStore::new());
        let carts = service(&store);
        let err = carts
            .remove_cart_item(&customer("kim"), &CartItemId::new("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::Commerce(CommerceError::CartNotFound(_))));
    }

    #[tokio::test]
    async fn test_other_users_items_untouchable() {
        let store = Arc::new(MemoryStore::new());
        let mug = seed_product(&store, "Mug", 500).await;
        let carts = service(&store);
        let sam = customer("sam");
        let kim = customer("kim");
        carts.add_to_cart(&sam, &mug.id, 1).await.unwrap();
        carts.add_to_cart(&kim, &mug.id, 1).await.unwrap();
        let sams_item = carts.cart_view(&sam).await.unwrap().items[0].0.id.clone();

        assert!(carts.update_cart_item(&kim, &sams_item, 3).await.is_err());
        assert_eq!(carts.number_of_items(&sam).await.unwrap(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_adds_keep_summary_current() {
        for _ in 0..50 {
            let store = Arc::new(MemoryStore::new());
            let mut products = Vec::new();
            for n in 0..8 {
                products.push(seed_product(&store, &format!("Item {n}"), 100).await);
            }
            let carts = Arc::new(service(&store));
            let sam = customer("sam");
            carts.fetch_or_create_cart(&UserId::new("sam"), false).await.unwrap();

            let tasks: Vec<_> = products
                .into_iter()
                .map(|p| {
                    let carts = carts.clone();
                    let sam = sam.clone();
                    tokio::spawn(async move { carts.add_to_cart(&sam, &p.id, 1).await })
                })
                .collect();
            for task in tasks {
                task.await.unwrap().unwrap();
            }

            let view = carts.cart_view(&sam).await.unwrap();
            assert_eq!(view.items.len(), 8);
            assert_eq!(view.cart.summary.item_count, 8);
            assert_eq!(view.cart.summary.subtotal, 800);
        }
    }

    #[tokio::test]
    async fn test_refresh_unknown_cart() {
        let store = Arc::new(MemoryStore::new());
        let err = service(&store).refresh_totals(&CartId::new("gone")).await.unwrap_err();
        assert!(matches!(err, ActionError::Db(DbError::NotFound { .. })));
    }
}
