//! Favorite products.

use std::sync::Arc;

use shop_auth::Identity;
use shop_commerce::prelude::*;
use shop_db::Store;

use crate::error::{ActionMessage, ActionResult};

pub struct FavoriteService<S> {
    store: Arc<S>,
}

impl<S: Store> FavoriteService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Id of the caller's favorite for `product_id`; `None` for guests.
    pub async fn favorite_id(&self, identity: &Identity, product_id: &ProductId) -> ActionResult<Option<FavoriteId>> {
        let Some(owner) = identity.user_id() else {
            return Ok(None);
        };
        let favorite = self.store.find_favorite(owner, product_id).await?;
        Ok(favorite.map(|f| f.id))
    }

    /// Remove the favorite if `favorite_id` is given, otherwise add one.
    pub async fn toggle_favorite(
        &self,
        identity: &Identity,
        product_id: &ProductId,
        favorite_id: Option<&FavoriteId>,
    ) -> ActionResult<(FavoriteToggle, ActionMessage)> {
        let owner = identity.require_user()?;
        let toggle = match favorite_id {
            Some(id) => {
                self.store.delete_favorite(id, owner).await?;
                FavoriteToggle::Removed
            }
            None => {
                let favorite = Favorite::new(product_id.clone(), owner.clone());
                let id = favorite.id.clone();
                self.store.insert_favorite(favorite).await?;
                FavoriteToggle::Added(id)
            }
        };
        let message = ActionMessage::ok(toggle.message());
        Ok((toggle, message))
    }

    /// The caller's favorites joined to their products, newest first.
    pub async fn user_favorites(&self, identity: &Identity) -> ActionResult<Vec<(Favorite, Product)>> {
        let owner = identity.require_user()?;
        let mut out = Vec::new();
        for favorite in self.store.list_favorites(owner).await? {
            if let Some(product) = self.store.get_product(&favorite.product_id).await? {
                out.push((favorite, product));
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use shop_db::MemoryStore;

    #[tokio::test]
    async fn test_toggle_round_trip() {
        let store = Arc::new(MemoryStore::new());
        let lamp = seed_product(&store, "Lamp", 1000).await;
        let faves = FavoriteService::new(store.clone());
        let sam = customer("sam");

        assert_eq!(faves.favorite_id(&sam, &lamp.id).await.unwrap(), None);

        let (toggle, msg) = faves.toggle_favorite(&sam, &lamp.id, None).await.unwrap();
        assert_eq!(msg.message, "Added to Faves");
        let FavoriteToggle::Added(id) = toggle else {
            panic!("expected an added favorite");
        };
        assert_eq!(faves.favorite_id(&sam, &lamp.id).await.unwrap(), Some(id.clone()));
        assert_eq!(faves.user_favorites(&sam).await.unwrap()[0].1.name, "Lamp");

        let (toggle, msg) = faves.toggle_favorite(&sam, &lamp.id, Some(&id)).await.unwrap();
        assert_eq!(toggle, FavoriteToggle::Removed);
        assert_eq!(msg.message, "Removed from Faves");
        assert!(faves.user_favorites(&sam).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_guest_and_foreign_favorites() {
        let store = Arc::new(MemoryStore::new());
        let lamp = seed_product(&store, "Lamp", 1000).await;
        let faves = FavoriteService::new(store.clone());

        assert_eq!(faves.favorite_id(&Identity::guest(), &lamp.id).await.unwrap(), None);
        assert!(faves.toggle_favorite(&Identity::guest(), &lamp.id, None).await.is_err());

        let (toggle, _) = faves.toggle_favorite(&customer("sam"), &lamp.id, None).await.unwrap();
        let FavoriteToggle::Added(id) = toggle else {
            panic!("expected an added favorite");
        };
        assert!(faves
            .toggle_favorite(&customer("kim"), &lamp.id, Some(&id))
            .await
            .is_err());
    }
}
