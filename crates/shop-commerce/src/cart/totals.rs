//! Cart summary computation.
//!
//! `compute_summary` derives every summary field of a cart from its line
//! items, a tax rate and the configured shipping fee:
//!
//! ```text
//! subtotal    = Σ unit_price × quantity
//! tax_amount  = round_half_up(subtotal × tax_rate)
//! shipping    = 0 if subtotal == 0 else shipping_fee
//! grand_total = subtotal + tax_amount + shipping
//! ```
//!
//! All amounts are integer minor units. The function is pure; persisting
//! the result is the caller's job.

use serde::{Deserialize, Serialize};

use crate::cart::CartLineItem;

const PPM: i128 = 1_000_000;

/// A tax rate held as integer parts-per-million.
///
/// Built from a fraction (`0.08` is 8%) and serialized back as one, but all
/// arithmetic on it is integer arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct TaxRate(u32);

impl TaxRate {
    /// Rate from a fraction. Negative or non-finite input is treated as zero.
    ///
    /// The fraction is rounded to the nearest part per million (`0.07123456`
    /// becomes `0.071235`) and capped at `u32::MAX` ppm, roughly 4294x.
    pub fn from_fraction(fraction: f64) -> Self {
        if !fraction.is_finite() || fraction <= 0.0 {
            return Self(0);
        }
        Self((fraction * PPM as f64).round().min(u32::MAX as f64) as u32)
    }

    pub fn from_ppm(ppm: u32) -> Self {
        Self(ppm)
    }

    pub fn ppm(&self) -> u32 {
        self.0
    }

    pub fn as_fraction(&self) -> f64 {
        self.0 as f64 / PPM as f64
    }

    /// Tax owed on `subtotal`, rounded half-up to the nearest minor unit.
    pub fn tax_on(&self, subtotal: i64) -> i64 {
        let raw = (subtotal as i128 * self.0 as i128 + PPM / 2) / PPM;
        raw.clamp(i64::MIN as i128, i64::MAX as i128) as i64
    }
}

impl From<f64> for TaxRate {
    fn from(fraction: f64) -> Self {
        Self::from_fraction(fraction)
    }
}

impl From<TaxRate> for f64 {
    fn from(rate: TaxRate) -> Self {
        rate.as_fraction()
    }
}

/// Derived totals stored on a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CartSummary {
    /// Sum of quantities across all line items.
    pub item_count: i64,
    pub subtotal: i64,
    pub tax_rate: TaxRate,
    pub tax_amount: i64,
    /// Shipping actually charged; zero for an empty cart.
    pub shipping_fee: i64,
    pub grand_total: i64,
}

impl CartSummary {
    pub fn is_empty(&self) -> bool {
        self.item_count == 0
    }
}

/// Compute the summary for a cart's current line items.
///
/// Amounts saturate at `i64::MAX` rather than wrap; quantities are capped
/// upstream so this is never reached in practice.
pub fn compute_summary(items: &[CartLineItem], tax_rate: TaxRate, shipping_fee: i64) -> CartSummary {
    let (item_count, subtotal) = items.iter().fold((0_i64, 0_i64), |(count, total), item| {
        (
            count.saturating_add(item.quantity),
            total.saturating_add(item.line_total()),
        )
    });

    let tax_amount = tax_rate.tax_on(subtotal);
    let shipping_fee = if subtotal == 0 { 0 } else { shipping_fee };
    let grand_total = subtotal.saturating_add(tax_amount).saturating_add(shipping_fee);

    CartSummary {
        item_count,
        subtotal,
        tax_rate,
        tax_amount,
        shipping_fee,
        grand_total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::ProductId;
    use proptest::prelude::*;

    fn item(price: i64, qty: i64) -> CartLineItem {
        CartLineItem::new(ProductId::new(format!("p-{}-{}", price, qty)), price, qty)
    }

    #[test]
    fn test_mixed_cart_summary() {
        let items = vec![item(500, 2), item(1000, 1)];
        let summary = compute_summary(&items, TaxRate::from_fraction(0.08), 500);

        assert_eq!(summary.item_count, 3);
        assert_eq!(summary.subtotal, 2000);
        assert_eq!(summary.tax_amount, 160);
        assert_eq!(summary.shipping_fee, 500);
        assert_eq!(summary.grand_total, 2660);
    }

    #[test]
    fn test_empty_cart_waives_shipping() {
        let summary = compute_summary(&[], TaxRate::from_fraction(0.08), 500);

        assert_eq!(summary.item_count, 0);
        assert_eq!(summary.subtotal, 0);
        assert_eq!(summary.tax_amount, 0);
        assert_eq!(summary.shipping_fee, 0);
        assert_eq!(summary.grand_total, 0);
        assert!(summary.is_empty());
    }

    #[test]
    fn test_item_order_does_not_matter() {
        let forward = vec![item(199, 3), item(2500, 1), item(75, 7)];
        let mut reversed = forward.clone();
        reversed.reverse();
        let rate = TaxRate::from_fraction(0.0725);

        assert_eq!(
            compute_summary(&forward, rate, 999),
            compute_summary(&reversed, rate, 999)
        );
    }

    #[test]
    fn test_tax_rounds_half_up() {
        let rate = TaxRate::from_fraction(0.1);
        assert_eq!(rate.tax_on(25), 3); // 2.5
        assert_eq!(rate.tax_on(24), 2); // 2.4
        assert_eq!(rate.tax_on(26), 3); // 2.6

        let rate = TaxRate::from_fraction(0.07);
        assert_eq!(rate.tax_on(50), 4); // 3.5
        assert_eq!(rate.tax_on(150), 11); // 10.5
    }

    #[test]
    fn test_zero_rate_means_zero_tax() {
        let summary = compute_summary(&[item(1234, 1)], TaxRate::default(), 0);
        assert_eq!(summary.tax_amount, 0);
        assert_eq!(summary.grand_total, 1234);
    }

    #[test]
    fn test_tax_rate_from_fraction() {
        assert_eq!(TaxRate::from_fraction(0.08).ppm(), 80_000);
        assert_eq!(TaxRate::from_fraction(-0.5).ppm(), 0);
        assert_eq!(TaxRate::from_fraction(f64::NAN).ppm(), 0);
        assert!((TaxRate::from_ppm(62_500).as_fraction() - 0.0625).abs() < 1e-12);
    }

    #[test]
    fn test_tax_rate_keeps_six_decimals() {
        let rate = TaxRate::from_fraction(0.07123456);
        assert_eq!(rate.ppm(), 71_235);
        assert_eq!(rate.tax_on(1_000_000), 71_235);
        assert_eq!(TaxRate::from_fraction(1e9).ppm(), u32::MAX);
    }

    #[test]
    fn test_tax_rate_serializes_as_fraction() {
        let json = serde_json::to_string(&TaxRate::from_fraction(0.08)).unwrap();
        assert_eq!(json, "0.08");
        let back: TaxRate = serde_json::from_str("0.0825").unwrap();
        assert_eq!(back.ppm(), 82_500);
    }

    #[test]
    fn test_saturates_instead_of_wrapping() {
        let summary = compute_summary(&[item(i64::MAX, 2)], TaxRate::from_fraction(0.5), 500);
        assert_eq!(summary.subtotal, i64::MAX);
        assert_eq!(summary.grand_total, i64::MAX);
    }

    proptest! {
        #[test]
        fn prop_subtotal_is_exact_sum(
            lines in proptest::collection::vec((0_i64..100_000, 1_i64..1_000), 0..20),
            ppm in 0_u32..300_000,
            shipping in 0_i64..10_000,
        ) {
            let items: Vec<CartLineItem> = lines.iter().map(|(p, q)| item(*p, *q)).collect();
            let summary = compute_summary(&items, TaxRate::from_ppm(ppm), shipping);

            let expected: i64 = lines.iter().map(|(p, q)| p * q).sum();
            prop_assert_eq!(summary.subtotal, expected);
            prop_assert_eq!(summary.item_count, lines.iter().map(|(_, q)| q).sum::<i64>());
            prop_assert_eq!(
                summary.grand_total,
                summary.subtotal + summary.tax_amount + summary.shipping_fee
            );
            if expected == 0 {
                prop_assert_eq!(summary.shipping_fee, 0);
            } else {
                prop_assert_eq!(summary.shipping_fee, shipping);
            }
        }

        #[test]
        fn prop_tax_is_deterministic(subtotal in 0_i64..10_000_000, ppm in 0_u32..1_000_000) {
            let rate = TaxRate::from_ppm(ppm);
            prop_assert_eq!(rate.tax_on(subtotal), rate.tax_on(subtotal));
            let exact = subtotal as i128 * ppm as i128;
            let tax = rate.tax_on(subtotal) as i128;
            // round-half-up: tax*1e6 - 0.5e6 <= exact < tax*1e6 + 0.5e6
            prop_assert!(tax * PPM - PPM / 2 <= exact);
            prop_assert!(exact < tax * PPM + PPM / 2);
        }
    }
}
