//! Storefront actions.
//!
//! Each service wraps an injected [`Store`](shop_db::Store) and performs one
//! family of user-facing operations. Every operation takes the caller's
//! [`Identity`](shop_auth::Identity) and checks it before touching storage.
//!
//! ```rust,ignore
//! let store = Arc::new(MemoryStore::new());
//! let settings = ShopSettings::from_config(&config)?;
//! let carts = CartService::new(store.clone(), settings.clone());
//! let added = carts.add_to_cart(&identity, &product_id, 2).await?;
//! println!("{}", added.message);
//! ```

mod cart;
mod error;
mod favorite;
mod order;
mod ports;
mod product;
mod review;
mod settings;

#[cfg(test)]
mod testing;

pub use cart::{AddedToCart, CartService, CartView};
pub use error::{render_error, ActionError, ActionMessage, ActionResult};
pub use favorite::FavoriteService;
pub use order::{OrderService, CONFIRM_RETURN_PATH};
pub use ports::{
    ImageStore, InMemoryImages, InMemoryPayments, PaymentGateway, PaymentRequest, PaymentSession,
    SessionStatus,
};
pub use product::ProductService;
pub use review::ReviewService;
pub use settings::ShopSettings;
