//! Order types.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::{Cart, CartItem};
use crate::catalog::Product;
use crate::ids::{CartId, OrderId, OrderedItemId, ProductId, UserId};
use crate::money::{Currency, Money};

/// A placed order.
///
/// Totals are copied from the cart summary when the order is created and
/// never recomputed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: OrderId,
    pub owner: UserId,
    /// Contact email from the identity provider.
    pub email: String,
    pub item_count: i64,
    pub subtotal: i64,
    pub tax: i64,
    pub shipping: i64,
    pub grand_total: i64,
    pub currency: Currency,
    pub is_paid: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Snapshot a cart's summary into a new unpaid order.
    pub fn from_cart(cart: &Cart, email: impl Into<String>) -> Self {
        let now = Utc::now();
        let summary = &cart.summary;
        Self {
            id: OrderId::generate(),
            owner: cart.owner.clone(),
            email: email.into(),
            item_count: summary.item_count,
            subtotal: summary.subtotal,
            tax: summary.tax_amount,
            shipping: summary.shipping_fee,
            grand_total: summary.grand_total,
            currency: cart.currency,
            is_paid: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn mark_paid(&mut self) {
        self.is_paid = true;
        self.updated_at = Utc::now();
    }

    /// Unpaid and untouched for longer than `ttl`.
    pub fn is_stale_unpaid(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        !self.is_paid && self.updated_at < now - ttl
    }

    pub fn total_money(&self) -> Money {
        Money::new(self.grand_total, self.currency)
    }
}

/// One product entry of an order, with the price paid per unit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderedItem {
    pub id: OrderedItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: i64,
    pub unit_price: i64,
}

impl OrderedItem {
    pub fn new(order_id: OrderId, item: &CartItem, unit_price: i64) -> Self {
        Self {
            id: OrderedItemId::generate(),
            order_id,
            product_id: item.product_id.clone(),
            quantity: item.quantity,
            unit_price,
        }
    }
}

/// A line handed to the payment provider when opening a checkout session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentLineItem {
    pub name: String,
    pub image: String,
    pub quantity: i64,
    /// Unit amount in minor units.
    pub unit_amount: i64,
    pub currency: Currency,
}

impl PaymentLineItem {
    pub fn new(item: &CartItem, product: &Product, currency: Currency) -> Self {
        Self {
            name: product.name.clone(),
            image: product.image.clone(),
            quantity: item.quantity,
            unit_amount: product.price,
            currency,
        }
    }
}

/// Where to send the customer after an order is created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckoutTicket {
    pub order_id: OrderId,
    pub cart_id: CartId,
}

impl CheckoutTicket {
    pub fn checkout_path(&self) -> String {
        format!("/checkout?orderId={}&cartId={}", self.order_id, self.cart_id)
    }
}
