//! Persistence for the storefront.
//!
//! Components never reach for a global database client. The process entry
//! point builds one [`Store`] implementation, wraps it in an `Arc`, and hands
//! it to every service that needs persistence.
//!
//! ```rust,ignore
//! let store = Arc::new(MemoryStore::new());
//! let carts = CartService::new(store.clone(), settings);
//! ```

mod error;
mod memory;
mod store;

pub use error::{DbError, DbResult};
pub use memory::MemoryStore;
pub use store::{OrderQuery, ProductQuery, ReviewQuery, Store};
