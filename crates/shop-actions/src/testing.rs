//! Shared fixtures for action tests.

use std::sync::Arc;

use shop_auth::{AdminRegistry, Identity};
use shop_commerce::prelude::*;
use shop_db::{MemoryStore, Store};

pub const ADMIN_ID: &str = "user_admin";

pub fn admins() -> AdminRegistry {
    AdminRegistry::new([ADMIN_ID])
}

pub fn customer(id: &str) -> Identity {
    Identity::signed_in(UserId::new(id), Some(format!("{id}@example.com")), &admins())
}

pub fn admin() -> Identity {
    Identity::signed_in(UserId::new(ADMIN_ID), Some("admin@example.com".to_string()), &admins())
}

pub fn details(name: &str, price: i64) -> ProductDetails {
    ProductDetails {
        name: name.to_string(),
        company: "Acme".to_string(),
        price,
        description: "solid and dependable for everyday use around the kitchen and house".to_string(),
        featured: false,
    }
}

pub async fn seed_product(store: &Arc<MemoryStore>, name: &str, price: i64) -> Product {
    let product = Product::new(
        details(name, price),
        format!("https://img.example.com/{}.png", name.to_lowercase()),
        UserId::new(ADMIN_ID),
    );
    store
        .insert_product(product.clone())
        .await
        .expect("seed product");
    product
}
