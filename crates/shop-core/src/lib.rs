//! Core configuration for the storefront.
//!
//! This crate provides:
//! - `ShopConfig` - File-backed configuration with environment overrides
//! - `ConfigError` - Loading and validation failures

mod config;
mod error;

pub use config::*;
pub use error::*;
