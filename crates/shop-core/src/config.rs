//! Storefront configuration.
//!
//! Loaded once at process start from `shop.toml` (or JSON), then adjusted by
//! `SHOP_*` environment variables. Everything here is immutable after
//! startup; components receive the pieces they need by value.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::ConfigError;

/// File names searched by [`ShopConfig::discover`], in order.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["shop.toml", ".shop.toml", "shop.json"];

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShopConfig {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub commerce: CommerceConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub routing: RoutingConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ShopConfig {
    /// Load config from a file; `.json` files are read as JSON, anything else as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: display.clone(),
            source,
        })?;

        let parse_err = |message: String| ConfigError::Parse {
            path: display.clone(),
            message,
        };
        if is_json(path) {
            serde_json::from_str(&content).map_err(|e| parse_err(e.to_string()))
        } else {
            toml::from_str(&content).map_err(|e| parse_err(e.to_string()))
        }
    }

    /// Save config to a file, choosing the format by extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = if is_json(path) {
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            self.to_toml()?
        };

        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Walk up from `start` looking for a config file.
    pub fn discover(start: &Path) -> Option<(PathBuf, ShopConfig)> {
        let mut current = start.to_path_buf();
        loop {
            for name in CONFIG_FILE_NAMES {
                let candidate = current.join(name);
                if candidate.exists() {
                    match ShopConfig::load(&candidate) {
                        Ok(config) => return Some((candidate, config)),
                        Err(e) => debug!(path = %candidate.display(), error = %e, "skipping config"),
                    }
                }
            }

            if !current.pop() {
                return None;
            }
        }
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply `SHOP_*` overrides from `lookup`.
    ///
    /// Unparseable numbers are ignored. A malformed admin list is logged and
    /// replaced by an empty list, so nobody is an admin by accident.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(raw) = lookup("SHOP_ADMIN_USER_IDS") {
            self.auth.admin_user_ids = match serde_json::from_str::<Vec<String>>(&raw) {
                Ok(ids) => ids,
                Err(e) => {
                    error!(error = %e, "SHOP_ADMIN_USER_IDS is not a valid string array");
                    Vec::new()
                }
            };
        }

        if let Some(rate) = lookup("SHOP_TAX_RATE").and_then(|v| v.parse::<f64>().ok()) {
            self.commerce.tax_rate = rate;
        }

        if let Some(fee) = lookup("SHOP_SHIPPING_FEE_CENTS").and_then(|v| v.parse::<i64>().ok()) {
            self.commerce.shipping_fee_cents = fee;
        }

        if let Some(path) = lookup("SHOP_REDIRECT_AFTER_ADD_TO_CART") {
            self.commerce.redirect_after_add_to_cart = if path.is_empty() { None } else { Some(path) };
        }
    }

    /// Check value ranges. Route patterns and redirect cycles are checked by
    /// the router when the gate is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.commerce;
        if !c.tax_rate.is_finite() || c.tax_rate < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "commerce.tax_rate must be a non-negative fraction, got {}",
                c.tax_rate
            )));
        }
        if c.shipping_fee_cents < 0 {
            return Err(ConfigError::Invalid(format!(
                "commerce.shipping_fee_cents must be non-negative, got {}",
                c.shipping_fee_cents
            )));
        }
        if c.max_quantity_per_item < 1 {
            return Err(ConfigError::Invalid(
                "commerce.max_quantity_per_item must be at least 1".to_string(),
            ));
        }
        if c.unpaid_order_ttl_minutes < 1 {
            return Err(ConfigError::Invalid(
                "commerce.unpaid_order_ttl_minutes must be at least 1".to_string(),
            ));
        }
        for (from, to) in &self.routing.redirects {
            if !from.starts_with('/') || !to.starts_with('/') {
                return Err(ConfigError::Invalid(format!(
                    "redirect {} -> {} must use absolute paths",
                    from, to
                )));
            }
        }
        Ok(())
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

/// Store metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_name")]
    pub name: String,

    /// ISO currency code for all prices.
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_store_name() -> String {
    "Shopfront".to_string()
}

fn default_currency() -> String {
    "USD".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            name: default_store_name(),
            currency: default_currency(),
        }
    }
}

/// Pricing and cart behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommerceConfig {
    /// Tax rate as a fraction (0.08 is 8%).
    #[serde(default = "default_tax_rate")]
    pub tax_rate: f64,

    /// Flat shipping fee in minor units, waived for empty carts.
    #[serde(default = "default_shipping_fee")]
    pub shipping_fee_cents: i64,

    #[serde(default = "default_max_quantity")]
    pub max_quantity_per_item: i64,

    /// Where to send the customer after adding to cart; stay on the page if unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_after_add_to_cart: Option<String>,

    /// Unpaid orders older than this are eligible for cleanup.
    #[serde(default = "default_unpaid_ttl")]
    pub unpaid_order_ttl_minutes: i64,
}

fn default_tax_rate() -> f64 {
    0.08
}

fn default_shipping_fee() -> i64 {
    500
}

fn default_max_quantity() -> i64 {
    9999
}

fn default_unpaid_ttl() -> i64 {
    30
}

impl Default for CommerceConfig {
    fn default() -> Self {
        Self {
            tax_rate: default_tax_rate(),
            shipping_fee_cents: default_shipping_fee(),
            max_quantity_per_item: default_max_quantity(),
            redirect_after_add_to_cart: None,
            unpaid_order_ttl_minutes: default_unpaid_ttl(),
        }
    }
}

/// Authorization settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Identity-provider user ids with admin rights.
    #[serde(default)]
    pub admin_user_ids: Vec<String>,
}

/// Request routing: static redirects and route classes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Source path -> target path.
    #[serde(default = "default_redirects")]
    pub redirects: BTreeMap<String, String>,

    /// Patterns reachable without signing in.
    #[serde(default = "default_public_routes")]
    pub public_routes: Vec<String>,

    /// Patterns reserved for admins.
    #[serde(default = "default_admin_routes")]
    pub admin_routes: Vec<String>,
}

fn default_redirects() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("/admin".to_string(), "/admin/dashboard".to_string()),
        ("/admin/dashboard".to_string(), "/admin/sales".to_string()),
    ])
}

fn default_public_routes() -> Vec<String> {
    vec!["/".to_string(), "/products(.*)".to_string(), "/about".to_string()]
}

fn default_admin_routes() -> Vec<String> {
    vec!["/admin(.*)".to_string()]
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            redirects: default_redirects(),
            public_routes: default_public_routes(),
            admin_routes: default_admin_routes(),
        }
    }
}

/// Output format for logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON lines (for production/log aggregation).
    Json,
    /// Human-readable (for development).
    #[default]
    Human,
}

/// Logging settings; `SHOP_LOG` takes precedence over `level`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
        }
    }
}

/// Default config file contents for `shop config init`.
pub fn generate_default_config() -> Result<String, ConfigError> {
    ShopConfig::default().to_toml()
}
