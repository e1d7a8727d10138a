//! Cart and line item types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::{compute_summary, CartSummary, TaxRate};
use crate::error::CommerceError;
use crate::ids::{CartId, CartItemId, ProductId, UserId};
use crate::money::{Currency, Money};

/// Maximum quantity allowed per line item.
pub const MAX_QUANTITY_PER_ITEM: i64 = 9999;

/// Check a requested quantity against `1..=limit`.
pub fn validate_quantity(quantity: i64, limit: i64) -> Result<(), CommerceError> {
    if quantity <= 0 {
        return Err(CommerceError::InvalidQuantity(quantity));
    }
    if quantity > limit {
        return Err(CommerceError::QuantityExceedsLimit(quantity, limit));
    }
    Ok(())
}

/// A user's cart record.
///
/// One cart per owner. The summary is never edited directly; it is replaced
/// wholesale by [`Cart::apply_summary`] after every item mutation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    pub id: CartId,
    pub owner: UserId,
    pub currency: Currency,
    pub tax_rate: TaxRate,
    /// Configured shipping fee; the charged amount lives in `summary`.
    pub shipping_fee: i64,
    pub summary: CartSummary,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    /// Create an empty cart for `owner`.
    pub fn new(owner: UserId, currency: Currency, tax_rate: TaxRate, shipping_fee: i64) -> Self {
        let now = Utc::now();
        Self {
            id: CartId::generate(),
            owner,
            currency,
            tax_rate,
            shipping_fee,
            summary: compute_summary(&[], tax_rate, shipping_fee),
            created_at: now,
            updated_at: now,
        }
    }

    /// Recompute the summary from `items` using this cart's rate and fee.
    pub fn summarize(&self, items: &[CartLineItem]) -> CartSummary {
        compute_summary(items, self.tax_rate, self.shipping_fee)
    }

    pub fn apply_summary(&mut self, summary: CartSummary) {
        self.summary = summary;
        self.updated_at = Utc::now();
    }

    pub fn item_count(&self) -> i64 {
        self.summary.item_count
    }

    pub fn is_empty(&self) -> bool {
        self.summary.is_empty()
    }

    /// Wrap a minor-unit amount in this cart's currency for display.
    pub fn money(&self, amount: i64) -> Money {
        Money::new(amount, self.currency)
    }
}

/// A persisted product entry inside a cart.
///
/// The unit price is not stored here; it is read from the product whenever
/// totals are recomputed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    pub id: CartItemId,
    pub cart_id: CartId,
    pub product_id: ProductId,
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CartItem {
    pub fn new(cart_id: CartId, product_id: ProductId, quantity: i64) -> Self {
        let now = Utc::now();
        Self {
            id: CartItemId::generate(),
            cart_id,
            product_id,
            quantity,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_quantity(&mut self, quantity: i64) {
        self.quantity = quantity;
        self.updated_at = Utc::now();
    }

    /// Pair this item with its product's current price.
    pub fn priced(&self, unit_price: i64) -> CartLineItem {
        CartLineItem::new(self.product_id.clone(), unit_price, self.quantity)
    }
}

/// A priced line: the input to [`compute_summary`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub product_id: ProductId,
    /// Price per unit in minor units.
    pub unit_price: i64,
    pub quantity: i64,
}

impl CartLineItem {
    pub fn new(product_id: ProductId, unit_price: i64, quantity: i64) -> Self {
        Self {
            product_id,
            unit_price,
            quantity,
        }
    }

    /// `unit_price × quantity`, saturating.
    pub fn line_total(&self) -> i64 {
        self.unit_price.saturating_mul(self.quantity)
    }
}
