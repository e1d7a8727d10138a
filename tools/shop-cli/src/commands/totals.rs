//! Compute a cart summary from the command line.

use anyhow::{bail, Context as _, Result};
use shop_commerce::prelude::*;

use super::TotalsArgs;
use crate::context::Context;

pub async fn run(args: TotalsArgs, ctx: &Context) -> Result<()> {
    let mut lines = Vec::with_capacity(args.items.len());
    for (i, raw) in args.items.iter().enumerate() {
        let (price, quantity) = parse_item(raw)?;
        lines.push(CartLineItem::new(ProductId::new(format!("item-{}", i + 1)), price, quantity));
    }

    let commerce = &ctx.config.commerce;
    let tax_rate = TaxRate::from_fraction(args.tax_rate.unwrap_or(commerce.tax_rate));
    let shipping = args.shipping.unwrap_or(commerce.shipping_fee_cents);
    if shipping < 0 {
        bail!("shipping fee must be non-negative");
    }

    let summary = compute_summary(&lines, tax_rate, shipping);

    if ctx.output.is_json() {
        ctx.output.json(&summary);
        return Ok(());
    }

    let currency = Currency::from_code(&ctx.config.store.currency).unwrap_or_default();
    let money = |amount: i64| Money::new(amount, currency).display();
    ctx.output.header("Cart summary");
    ctx.output.kv("items", &summary.item_count.to_string());
    ctx.output.kv("subtotal", &money(summary.subtotal));
    ctx.output.kv(
        &format!("tax ({:.2}%)", tax_rate.as_fraction() * 100.0),
        &money(summary.tax_amount),
    );
    ctx.output.kv("shipping", &money(summary.shipping_fee));
    ctx.output.kv("total", &money(summary.grand_total));
    Ok(())
}

/// Parse `PRICExQUANTITY`, both non-negative integers.
fn parse_item(raw: &str) -> Result<(i64, i64)> {
    let (price, quantity) = raw
        .split_once(['x', 'X'])
        .with_context(|| format!("item {raw:?} must look like PRICExQUANTITY"))?;
    let price: i64 = price
        .trim()
        .parse()
        .with_context(|| format!("bad price in {raw:?}"))?;
    let quantity: i64 = quantity
        .trim()
        .parse()
        .with_context(|| format!("bad quantity in {raw:?}"))?;
    if price < 0 || quantity < 0 {
        bail!("item {raw:?} must not be negative");
    }
    Ok((price, quantity))
}
