//! Orders and payment.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use shop_auth::Identity;
use shop_commerce::prelude::*;
use shop_db::{OrderQuery, Store};
use tracing::{info, warn};

use crate::cart::CartService;
use crate::error::{ActionMessage, ActionResult};
use crate::ports::{PaymentGateway, PaymentRequest, SessionStatus};
use crate::settings::ShopSettings;

/// Appended to the request origin to form the payment return URL. The
/// placeholder is filled in by the payment provider.
pub const CONFIRM_RETURN_PATH: &str = "/api/confirm?session_id={CHECKOUT_SESSION_ID}";

/// Where customers land after confirming payment.
const ORDERS_PATH: &str = "/orders";

pub struct OrderService<S, P> {
    store: Arc<S>,
    payments: Arc<P>,
    carts: CartService<S>,
    settings: ShopSettings,
}

impl<S: Store, P: PaymentGateway> OrderService<S, P> {
    pub fn new(store: Arc<S>, payments: Arc<P>, settings: ShopSettings) -> Self {
        Self {
            carts: CartService::new(store.clone(), settings.clone()),
            store,
            payments,
            settings,
        }
    }

    /// Turn the caller's cart into an unpaid order.
    pub async fn create_order(&self, identity: &Identity) -> ActionResult<CheckoutTicket> {
        let email = identity.require_email()?.to_string();
        let user = identity.require_user()?;
        let cart = self.carts.fetch_or_create_cart(user, true).await?;
        if cart.is_empty() {
            return Err(CommerceError::EmptyCart.into());
        }

        let order = Order::from_cart(&cart, email);
        let mut ordered = Vec::new();
        for item in self.store.list_cart_items(&cart.id).await? {
            let product = self
                .store
                .get_product(&item.product_id)
                .await?
                .ok_or_else(|| CommerceError::ProductNotFound(item.product_id.to_string()))?;
            ordered.push(OrderedItem::new(order.id.clone(), &item, product.price));
        }

        let ticket = CheckoutTicket {
            order_id: order.id.clone(),
            cart_id: cart.id.clone(),
        };
        self.store.insert_order(order, ordered).await?;
        info!(user = %user, order_id = %ticket.order_id, "order created");
        Ok(ticket)
    }

    /// Open a payment session for an order and return its client secret.
    pub async fn start_payment(&self, order_id: &OrderId, cart_id: &CartId, origin: &str) -> ActionResult<String> {
        let order = self
            .store
            .get_order(order_id)
            .await?
            .ok_or_else(|| CommerceError::OrderNotFound(order_id.to_string()))?;
        let cart = self
            .store
            .get_cart(cart_id)
            .await?
            .ok_or_else(|| CommerceError::CartNotFound(cart_id.to_string()))?;

        let mut line_items = Vec::new();
        for item in self.store.list_cart_items(&cart.id).await? {
            if let Some(product) = self.store.get_product(&item.product_id).await? {
                line_items.push(PaymentLineItem::new(&item, &product, order.currency));
            }
        }

        let request = PaymentRequest {
            order_id: order.id.clone(),
            cart_id: cart.id.clone(),
            line_items,
            return_url: format!("{}{}", origin.trim_end_matches('/'), CONFIRM_RETURN_PATH),
        };
        let session = self.payments.create_session(request).await?;
        info!(order_id = %order.id, session_id = %session.id, "payment started");
        Ok(session.client_secret)
    }

    /// Settle a finished payment session and return the page to show next.
    ///
    /// A complete session marks its order paid and deletes the cart. Any
    /// other status leaves everything as it was.
    pub async fn confirm_payment(&self, session_id: &str) -> ActionResult<String> {
        let session = self.payments.retrieve_session(session_id).await?;
        if session.status != SessionStatus::Complete {
            warn!(session_id, status = ?session.status, "payment not complete");
            return Ok(ORDERS_PATH.to_string());
        }

        let mut order = self
            .store
            .get_order(&session.order_id)
            .await?
            .ok_or_else(|| CommerceError::OrderNotFound(session.order_id.to_string()))?;
        if !order.is_paid {
            order.mark_paid();
            self.store.update_order(order).await?;
        }
        if self.store.get_cart(&session.cart_id).await?.is_some() {
            self.store.delete_cart(&session.cart_id).await?;
        }
        info!(session_id, order_id = %session.order_id, "payment confirmed");
        Ok(ORDERS_PATH.to_string())
    }

    /// The caller's paid orders, newest first.
    pub async fn user_orders(&self, identity: &Identity) -> ActionResult<Vec<Order>> {
        let user = identity.require_user()?;
        let query = OrderQuery {
            owner: Some(user.clone()),
            paid: Some(true),
        };
        Ok(self.store.list_orders(&query).await?)
    }

    /// Every order, newest first.
    pub async fn admin_orders(&self, identity: &Identity) -> ActionResult<Vec<Order>> {
        identity.require_admin()?;
        Ok(self.store.list_orders(&OrderQuery::default()).await?)
    }

    pub async fn ordered_items(&self, identity: &Identity, order_id: &OrderId) -> ActionResult<Vec<OrderedItem>> {
        let user = identity.require_user()?;
        let order = self
            .store
            .get_order(order_id)
            .await?
            .ok_or_else(|| CommerceError::OrderNotFound(order_id.to_string()))?;
        if &order.owner != user && !identity.role().is_admin() {
            return Err(CommerceError::OrderNotFound(order_id.to_string()).into());
        }
        Ok(self.store.list_ordered_items(order_id).await?)
    }

    /// Remove unpaid orders untouched for longer than the configured TTL.
    pub async fn delete_stale_unpaid_orders(
        &self,
        identity: &Identity,
        now: DateTime<Utc>,
    ) -> ActionResult<ActionMessage> {
        identity.require_admin()?;
        let cutoff = now - self.settings.unpaid_order_ttl;
        let count = self.store.delete_unpaid_orders_before(cutoff).await?;
        info!(count, %cutoff, "stale unpaid orders deleted");
        Ok(ActionMessage::ok(format!("{count} old unpaid orders deleted")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ActionError;
    use crate::ports::InMemoryPayments;
    use crate::testing::*;
    use chrono::Duration;
    use shop_auth::{AdminRegistry, AuthError};
    use shop_db::MemoryStore;

    struct Harness {
        store: Arc<MemoryStore>,
        payments: Arc<InMemoryPayments>,
        orders: OrderService<MemoryStore, InMemoryPayments>,
        carts: CartService<MemoryStore>,
    }

    fn harness() -> Harness {
        let store = Arc::new(MemoryStore::new());
        let payments = Arc::new(InMemoryPayments::new());
        Harness {
            orders: OrderService::new(store.clone(), payments.clone(), ShopSettings::default()),
            carts: CartService::new(store.clone(), ShopSettings::default()),
            store,
            payments,
        }
    }

    async fn filled(h: &Harness, who: &Identity) {
        let mug = seed_product(&h.store, "Mug", 500).await;
        let lamp = seed_product(&h.store, "Lamp", 1000).await;
        h.carts.add_to_cart(who, &mug.id, 2).await.unwrap();
        h.carts.add_to_cart(who, &lamp.id, 1).await.unwrap();
    }

    #[tokio::test]
    async fn test_create_order_snapshots_cart() {
        let h = harness();
        let sam = customer("sam");
        filled(&h, &sam).await;

        let ticket = h.orders.create_order(&sam).await.unwrap();
        assert_eq!(
            ticket.checkout_path(),
            format!("/checkout?orderId={}&cartId={}", ticket.order_id, ticket.cart_id)
        );

        let order = h.store.get_order(&ticket.order_id).await.unwrap().unwrap();
        assert_eq!(order.grand_total, 2660);
        assert_eq!(order.email, "sam@example.com");
        assert!(!order.is_paid);
        let items = h.orders.ordered_items(&sam, &ticket.order_id).await.unwrap();
        assert_eq!(items.len(), 2);
        assert!(items.iter().any(|i| i.unit_price == 500 && i.quantity == 2));
    }

    #[tokio::test]
    async fn test_create_order_requirements() {
        let h = harness();
        let no_email = Identity::signed_in(UserId::new("pat"), None, &AdminRegistry::default());
        assert!(matches!(
            h.orders.create_order(&no_email).await,
            Err(ActionError::Auth(AuthError::MissingEmail))
        ));

        let sam = customer("sam");
        assert!(matches!(
            h.orders.create_order(&sam).await,
            Err(ActionError::Commerce(CommerceError::CartNotFound(_)))
        ));

        h.carts.fetch_or_create_cart(&UserId::new("sam"), false).await.unwrap();
        assert!(matches!(
            h.orders.create_order(&sam).await,
            Err(ActionError::Commerce(CommerceError::EmptyCart))
        ));
    }

    #[tokio::test]
    async fn test_payment_round_trip() {
        let h = harness();
        let sam = customer("sam");
        filled(&h, &sam).await;
        let ticket = h.orders.create_order(&sam).await.unwrap();

        let secret = h
            .orders
            .start_payment(&ticket.order_id, &ticket.cart_id, "https://shop.example.com/")
            .await
            .unwrap();
        let session_id = secret.trim_end_matches("_secret").to_string();
        let request = h.payments.request(&session_id).await.unwrap();
        assert_eq!(
            request.return_url,
            "https://shop.example.com/api/confirm?session_id={CHECKOUT_SESSION_ID}"
        );
        assert_eq!(request.line_items.len(), 2);
        assert!(request.line_items.iter().any(|l| l.unit_amount == 1000));

        // Not yet paid: nothing changes.
        assert_eq!(h.orders.confirm_payment(&session_id).await.unwrap(), "/orders");
        assert!(h.orders.user_orders(&sam).await.unwrap().is_empty());

        h.payments.complete(&session_id).await.unwrap();
        assert_eq!(h.orders.confirm_payment(&session_id).await.unwrap(), "/orders");

        let paid = h.orders.user_orders(&sam).await.unwrap();
        assert_eq!(paid.len(), 1);
        assert!(paid[0].is_paid);
        assert!(h.store.get_cart(&ticket.cart_id).await.unwrap().is_none());
        assert_eq!(h.carts.number_of_items(&sam).await.unwrap(), 0);

        // Confirming twice is harmless.
        assert!(h.orders.confirm_payment(&session_id).await.is_ok());
    }

    #[tokio::test]
    async fn test_start_payment_unknown_ids() {
        let h = harness();
        let err = h
            .orders
            .start_payment(&OrderId::new("o"), &CartId::new("c"), "https://x")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_stale_cleanup_is_admin_only() {
        let h = harness();
        let sam = customer("sam");
        filled(&h, &sam).await;
        h.orders.create_order(&sam).await.unwrap();

        assert!(matches!(
            h.orders.delete_stale_unpaid_orders(&sam, Utc::now()).await,
            Err(ActionError::Auth(AuthError::Forbidden))
        ));

        let msg = h
            .orders
            .delete_stale_unpaid_orders(&admin(), Utc::now())
            .await
            .unwrap();
        assert_eq!(msg.message, "0 old unpaid orders deleted");

        let later = Utc::now() + Duration::minutes(31);
        let msg = h.orders.delete_stale_unpaid_orders(&admin(), later).await.unwrap();
        assert_eq!(msg.message, "1 old unpaid orders deleted");
        assert!(h.orders.admin_orders(&admin()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_orders_hidden_from_other_users() {
        let h = harness();
        let sam = customer("sam");
        filled(&h, &sam).await;
        let ticket = h.orders.create_order(&sam).await.unwrap();

        assert!(h.orders.ordered_items(&customer("kim"), &ticket.order_id).await.is_err());
        assert!(h.orders.ordered_items(&admin(), &ticket.order_id).await.is_ok());
    }
}
