//! End-to-end purchase against the in-memory store and payment provider.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use chrono::Utc;
use serde_json::json;
use shop_actions::{
    CartService, FavoriteService, InMemoryImages, InMemoryPayments, OrderService, ProductService,
    ReviewService, ShopSettings,
};
use shop_auth::{AdminRegistry, Identity};
use shop_commerce::prelude::*;
use shop_db::MemoryStore;

use super::DemoArgs;
use crate::context::Context;

const DEMO_ADMIN: &str = "demo_admin";
const DEMO_CUSTOMER: &str = "demo_customer";
const STEPS: usize = 7;

pub async fn run(args: DemoArgs, ctx: &Context) -> Result<()> {
    let settings = ShopSettings::from_config(&ctx.config)?;
    let currency = settings.currency;
    let store = Arc::new(MemoryStore::new());
    let payments = Arc::new(InMemoryPayments::new());
    let images = Arc::new(InMemoryImages::default());

    let admins = AdminRegistry::new(
        ctx.config
            .auth
            .admin_user_ids
            .iter()
            .map(String::as_str)
            .chain([DEMO_ADMIN]),
    );
    let admin = Identity::signed_in(UserId::new(DEMO_ADMIN), None, &admins);
    let customer = Identity::signed_in(
        UserId::new(DEMO_CUSTOMER),
        Some("customer@example.com".to_string()),
        &admins,
    );

    let products = ProductService::new(store.clone(), images.clone(), settings.clone());
    let carts = CartService::new(store.clone(), settings.clone());
    let orders = OrderService::new(store.clone(), payments.clone(), settings.clone());
    let reviews = ReviewService::new(store.clone());
    let faves = FavoriteService::new(store.clone());
    let out = &ctx.output;

    out.step(1, STEPS, "Seeding catalog");
    let mut catalog = Vec::new();
    for (name, price) in [("Walnut Lamp", "49.99"), ("Stoneware Mug", "12"), ("Linen Throw", "$89.50")] {
        let form = ProductForm {
            name: name.to_string(),
            company: "Demo Goods".to_string(),
            price: price.to_string(),
            description: format!("{name} from the demo catalog, made to be bought twice."),
            featured: true,
        };
        let image = ImageUpload::new(format!("{}.png", name.to_lowercase().replace(' ', "-")), "image/png", vec![0]);
        let product = products.create_product(&admin, &form, &image).await?;
        out.list_item(&format!("{} {}", product.name, Money::new(product.price, currency)));
        catalog.push(product);
    }
    let (lamp, mug) = (&catalog[0], &catalog[1]);

    out.step(2, STEPS, "Filling the cart");
    out.info(&carts.add_to_cart(&customer, &lamp.id, 1).await?.message.message);
    let added = carts.add_to_cart(&customer, &mug.id, 3).await?;
    out.info(&added.message.message);
    let summary = &added.cart.summary;
    out.kv("items", &summary.item_count.to_string());
    out.kv("grand total", &Money::new(summary.grand_total, currency).to_string());

    out.step(3, STEPS, "Reviewing and favoriting");
    let review = ReviewInput {
        product_id: lamp.id.clone(),
        author_name: "Demo Customer".to_string(),
        author_image_url: "https://img.example.com/demo.png".to_string(),
        rating: 5,
        comment: "Warm light and a sturdy base.".to_string(),
    };
    out.info(&reviews.create_review(&customer, review).await?.message);
    let (_, fave) = faves.toggle_favorite(&customer, &mug.id, None).await?;
    out.info(&fave.message);
    let rating = reviews.product_rating(&lamp.id).await?;
    out.kv("lamp rating", &format!("{} ({} reviews)", rating.rating, rating.count));

    out.step(4, STEPS, "Creating the order");
    let ticket = orders.create_order(&customer).await?;
    out.kv("checkout", &ticket.checkout_path());

    out.step(5, STEPS, "Starting payment");
    let secret = orders.start_payment(&ticket.order_id, &ticket.cart_id, &args.origin).await?;
    let session_id = secret
        .strip_suffix("_secret")
        .ok_or_else(|| anyhow!("unexpected client secret {secret:?}"))?
        .to_string();
    out.debug(&format!("client secret {secret}"));

    if args.abandon {
        out.step(6, STEPS, "Abandoning payment");
        payments.expire(&session_id).await?;
        orders.confirm_payment(&session_id).await?;
        let later = Utc::now() + settings.unpaid_order_ttl + chrono::Duration::minutes(1);
        out.step(7, STEPS, "Cleaning up stale orders");
        let msg = orders.delete_stale_unpaid_orders(&admin, later).await?;
        out.success(&msg.message);
        return Ok(());
    }

    out.step(6, STEPS, "Completing payment");
    payments.complete(&session_id).await?;
    let next = orders.confirm_payment(&session_id).await?;
    out.kv("redirect", &next);

    out.step(7, STEPS, "Listing orders");
    let paid = orders.user_orders(&customer).await?;
    if out.is_json() {
        out.json(&json!({ "orders": paid, "cart_items": carts.number_of_items(&customer).await? }));
        return Ok(());
    }
    for order in &paid {
        let items = orders.ordered_items(&customer, &order.id).await?;
        out.list_item(&format!(
            "{} {} ({} lines, paid: {})",
            order.id,
            Money::new(order.grand_total, order.currency),
            items.len(),
            order.is_paid
        ));
    }
    out.success(&format!("Purchase complete; {} order(s) on file", paid.len()));
    Ok(())
}
