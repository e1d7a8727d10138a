//! Checkout module: orders and payment hand-off types.

mod order;

pub use order::{CheckoutTicket, Order, OrderedItem, PaymentLineItem};
