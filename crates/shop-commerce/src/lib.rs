//! Storefront domain types and pure logic.
//!
//! This crate holds everything the storefront computes without touching
//! storage or the network:
//!
//! - **Money**: integer minor-unit amounts, accounting display, price parsing
//! - **Cart**: cart records, line items, and the `compute_summary` totals
//! - **Catalog**: products and the admin product form
//! - **Reviews / Favorites**: customer feedback records
//! - **Checkout**: orders, ordered items, payment line items
//!
//! # Example
//!
//! ```rust
//! use shop_commerce::prelude::*;
//!
//! let items = vec![
//!     CartLineItem::new(ProductId::new("mug"), 500, 2),
//!     CartLineItem::new(ProductId::new("lamp"), 1000, 1),
//! ];
//! let summary = compute_summary(&items, TaxRate::from_fraction(0.08), 500);
//! assert_eq!(summary.grand_total, 2660);
//! ```

pub mod error;
pub mod format;
pub mod ids;
pub mod money;
pub mod validation;

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod favorite;
pub mod review;

pub use error::CommerceError;
pub use ids::*;
pub use money::{parse_price_to_cents, Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{parse_price_to_cents, Currency, Money};

    // Cart
    pub use crate::cart::{
        compute_summary, validate_quantity, Cart, CartItem, CartLineItem, CartSummary, TaxRate,
        MAX_QUANTITY_PER_ITEM,
    };

    // Catalog
    pub use crate::catalog::{ImageUpload, Product, ProductDetails, ProductForm};

    // Checkout
    pub use crate::checkout::{CheckoutTicket, Order, OrderedItem, PaymentLineItem};

    // Feedback
    pub use crate::favorite::{Favorite, FavoriteToggle};
    pub use crate::review::{ProductRating, Review, ReviewInput};
}
