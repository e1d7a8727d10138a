//! Catalog queries and product administration.

use std::sync::Arc;

use shop_auth::Identity;
use shop_commerce::prelude::*;
use shop_db::{DbError, ProductQuery, Store};
use tracing::{info, warn};

use crate::cart::CartService;
use crate::error::{ActionError, ActionMessage, ActionResult};
use crate::ports::ImageStore;
use crate::settings::ShopSettings;

pub struct ProductService<S, I> {
    store: Arc<S>,
    images: Arc<I>,
    carts: CartService<S>,
}

impl<S: Store, I: ImageStore> ProductService<S, I> {
    pub fn new(store: Arc<S>, images: Arc<I>, settings: ShopSettings) -> Self {
        Self {
            carts: CartService::new(store.clone(), settings),
            store,
            images,
        }
    }

    pub async fn featured_products(&self) -> ActionResult<Vec<Product>> {
        Ok(self.store.list_products(&ProductQuery::featured()).await?)
    }

    /// Products whose name or company contains `term`, ignoring case. An
    /// empty term lists everything.
    pub async fn search_products(&self, term: &str) -> ActionResult<Vec<Product>> {
        let query = if term.trim().is_empty() {
            ProductQuery::all()
        } else {
            ProductQuery::search(term.trim())
        };
        Ok(self.store.list_products(&query).await?)
    }

    pub async fn product(&self, id: &ProductId) -> ActionResult<Product> {
        self.store
            .get_product(id)
            .await?
            .ok_or_else(|| CommerceError::ProductNotFound(id.to_string()).into())
    }

    pub async fn admin_products(&self, identity: &Identity) -> ActionResult<Vec<Product>> {
        identity.require_admin()?;
        Ok(self.store.list_products(&ProductQuery::all()).await?)
    }

    pub async fn create_product(
        &self,
        identity: &Identity,
        form: &ProductForm,
        image: &ImageUpload,
    ) -> ActionResult<Product> {
        let owner = identity.require_admin()?;
        let details = form.validate()?;
        image.validate()?;

        let url = self.images.upload(image).await?;
        let product = Product::new(details, url, owner.clone());
        self.store.insert_product(product.clone()).await?;
        info!(product_id = %product.id, name = %product.name, "product created");
        Ok(product)
    }

    pub async fn update_product(
        &self,
        identity: &Identity,
        id: &ProductId,
        form: &ProductForm,
    ) -> ActionResult<ActionMessage> {
        identity.require_admin()?;
        let details = form.validate()?;
        let mut product = self.product(id).await?;
        let price_changed = product.price != details.price;
        product.apply(details);
        self.store.update_product(product).await?;
        if price_changed {
            self.refresh_carts_with(id).await?;
        }
        Ok(ActionMessage::ok("Product updated successfully"))
    }

    /// Replace a product's image, then remove the old file.
    pub async fn update_product_image(
        &self,
        identity: &Identity,
        id: &ProductId,
        image: &ImageUpload,
        old_url: &str,
    ) -> ActionResult<ActionMessage> {
        identity.require_admin()?;
        image.validate()?;
        let mut product = self.product(id).await?;

        let url = self.images.upload(image).await?;
        self.discard_image(old_url).await;
        product.set_image(url);
        self.store.update_product(product).await?;
        Ok(ActionMessage::ok("Product image updated successfully"))
    }

    /// Delete a product, its stored image, and every row that references it.
    pub async fn delete_product(&self, identity: &Identity, id: &ProductId) -> ActionResult<ActionMessage> {
        identity.require_admin()?;
        let affected = self.store.carts_containing(id).await?;
        let product = self.store.delete_product(id).await?;
        self.discard_image(&product.image).await;
        self.refresh_carts(affected).await?;
        info!(product_id = %id, "product deleted");
        Ok(ActionMessage::ok("product removed"))
    }

    async fn refresh_carts_with(&self, id: &ProductId) -> ActionResult<()> {
        let affected = self.store.carts_containing(id).await?;
        self.refresh_carts(affected).await
    }

    /// Carts checked out or emptied in the meantime are skipped.
    async fn refresh_carts(&self, cart_ids: Vec<CartId>) -> ActionResult<()> {
        for cart_id in cart_ids {
            match self.carts.refresh_totals(&cart_id).await {
                Ok(_) | Err(ActionError::Db(DbError::NotFound { .. })) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    /// A file left behind is not worth failing the request over.
    async fn discard_image(&self, url: &str) {
        if let Err(e) = self.images.delete(url).await {
            warn!(url, error = %e, "could not delete image");
        }
    }
}
