//! Runtime settings derived from the config file.

use chrono::Duration;
use shop_commerce::prelude::*;
use shop_core::{ConfigError, ShopConfig};

/// The slice of [`ShopConfig`] the actions need, in domain types.
#[derive(Debug, Clone, PartialEq)]
pub struct ShopSettings {
    pub currency: Currency,
    pub tax_rate: TaxRate,
    pub shipping_fee: i64,
    pub max_quantity: i64,
    /// Path to send the customer to after adding to cart.
    pub redirect_after_add: Option<String>,
    pub unpaid_order_ttl: Duration,
}

impl ShopSettings {
    pub fn from_config(config: &ShopConfig) -> Result<Self, ConfigError> {
        let currency = Currency::from_code(&config.store.currency).ok_or_else(|| {
            ConfigError::Invalid(format!("unknown currency code {:?}", config.store.currency))
        })?;
        let commerce = &config.commerce;
        Ok(Self {
            currency,
            tax_rate: TaxRate::from_fraction(commerce.tax_rate),
            shipping_fee: commerce.shipping_fee_cents,
            max_quantity: commerce.max_quantity_per_item.min(MAX_QUANTITY_PER_ITEM),
            redirect_after_add: commerce.redirect_after_add_to_cart.clone(),
            unpaid_order_ttl: Duration::minutes(commerce.unpaid_order_ttl_minutes),
        })
    }
}

impl Default for ShopSettings {
    fn default() -> Self {
        Self {
            currency: Currency::USD,
            tax_rate: TaxRate::from_fraction(0.08),
            shipping_fee: 500,
            max_quantity: MAX_QUANTITY_PER_ITEM,
            redirect_after_add: None,
            unpaid_order_ttl: Duration::minutes(30),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_config_defaults() {
        let settings = ShopSettings::from_config(&ShopConfig::default()).unwrap();
        assert_eq!(settings, ShopSettings::default());
    }

    #[test]
    fn test_unknown_currency_rejected() {
        let mut config = ShopConfig::default();
        config.store.currency = "XYZ".to_string();
        assert!(ShopSettings::from_config(&config).is_err());
    }

    #[test]
    fn test_max_quantity_capped() {
        let mut config = ShopConfig::default();
        config.commerce.max_quantity_per_item = 1_000_000;
        let settings = ShopSettings::from_config(&config).unwrap();
        assert_eq!(settings.max_quantity, MAX_QUANTITY_PER_ITEM);
    }
}
