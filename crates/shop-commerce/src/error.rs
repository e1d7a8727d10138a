//! Commerce error types.

use thiserror::Error;

/// Errors that can occur in storefront domain operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommerceError {
    /// Product not found.
    #[error("Product ID {0}, not found")]
    ProductNotFound(String),

    /// Cart not found for the given owner.
    #[error("Cart not found for userId: {0}")]
    CartNotFound(String),

    /// Item not in cart.
    #[error("Cart item not found: {0}")]
    CartItemNotFound(String),

    /// The cart has nothing to order.
    #[error("Cart is empty")]
    EmptyCart,

    /// Order not found.
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// Review not found.
    #[error("Review not found: {0}")]
    ReviewNotFound(String),

    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Quantity exceeds maximum allowed.
    #[error("Quantity {0} exceeds maximum allowed ({1})")]
    QuantityExceedsLimit(i64, i64),

    /// A price string could not be read as a currency amount.
    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Form validation failed; holds every failing rule's message.
    #[error("{0}")]
    Validation(String),
}

impl CommerceError {
    /// Check if this error means a record was missing.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CommerceError::ProductNotFound(_)
                | CommerceError::CartNotFound(_)
                | CommerceError::CartItemNotFound(_)
                | CommerceError::OrderNotFound(_)
                | CommerceError::ReviewNotFound(_)
        )
    }
}
