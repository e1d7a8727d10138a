//! Request routing for the storefront.
//!
//! Two pieces run on every request:
//!
//! - [`resolve`] follows the fixed [`RedirectTable`] to its final target,
//!   refusing to loop.
//! - [`RequestGate`] decides whether a request continues, is redirected, or
//!   must sign in first, based on the visitor's [`Role`](shop_auth::Role).
//!
//! ```rust
//! use shop_router::{resolve, RedirectTable};
//!
//! let table = RedirectTable::from_iter([("/a", "/b"), ("/b", "/c")]);
//! assert_eq!(resolve("/a", &table).as_deref(), Some("/c"));
//! assert_eq!(resolve("/c", &table), None);
//! ```

mod error;
mod gate;
mod matcher;
mod redirect;

pub use error::{RouterError, RouterResult};
pub use gate::{GateDecision, RequestGate};
pub use matcher::RouteMatcher;
pub use redirect::{resolve, trace, RedirectTable, Resolution};

use shop_core::RoutingConfig;

/// Check a routing section beyond what serde can: every pattern compiles and
/// the redirect table has no cycles.
pub fn validate_routing(config: &RoutingConfig) -> RouterResult<()> {
    RequestGate::from_config(config)?;
    match RedirectTable::from_config(config).cycles().into_iter().next() {
        Some(cycle) => Err(RouterError::RedirectCycle(cycle)),
        None => Ok(()),
    }
}
