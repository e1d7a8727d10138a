//! Shopping cart module.
//!
//! Contains the cart record, its items, and the totals computation.

#[allow(clippy::module_inception)]
mod cart;
mod totals;

pub use cart::{validate_quantity, Cart, CartItem, CartLineItem, MAX_QUANTITY_PER_ITEM};
pub use totals::{compute_summary, CartSummary, TaxRate};
