//! Observability for the storefront.
//!
//! All crates log through `tracing` macros with structured fields. This crate
//! installs the subscriber once, at process start:
//! - `init_logging` - `EnvFilter` from `SHOP_LOG`, JSON or human output
//! - `LogFormat` - re-exported from `shop-core` config

mod logging;

pub use logging::*;
pub use shop_core::{LogFormat, LoggingConfig};
