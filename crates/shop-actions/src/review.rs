//! Product reviews.

use std::sync::Arc;

use shop_auth::Identity;
use shop_commerce::prelude::*;
use shop_commerce::review::validate_review_edit;
use shop_db::{DbError, ReviewQuery, Store};
use tracing::info;

use crate::error::{ActionError, ActionMessage, ActionResult};

pub struct ReviewService<S> {
    store: Arc<S>,
}

impl<S: Store> ReviewService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn create_review(&self, identity: &Identity, input: ReviewInput) -> ActionResult<ActionMessage> {
        let author = identity.require_user()?;
        input.validate()?;
        let review = Review::new(input, author.clone());
        info!(review_id = %review.id, product_id = %review.product_id, "review submitted");
        self.store.insert_review(review).await?;
        Ok(ActionMessage::ok("review submitted successfully"))
    }

    /// Reviews of a product, newest first.
    pub async fn product_reviews(&self, product_id: &ProductId) -> ActionResult<Vec<Review>> {
        let query = ReviewQuery {
            product: Some(product_id.clone()),
            author: None,
        };
        Ok(self.store.list_reviews(&query).await?)
    }

    pub async fn product_rating(&self, product_id: &ProductId) -> ActionResult<ProductRating> {
        let reviews = self.product_reviews(product_id).await?;
        Ok(ProductRating::from_reviews(&reviews))
    }

    /// The caller's reviews, newest first.
    pub async fn user_reviews(&self, identity: &Identity) -> ActionResult<Vec<Review>> {
        let author = identity.require_user()?;
        let query = ReviewQuery {
            product: None,
            author: Some(author.clone()),
        };
        Ok(self.store.list_reviews(&query).await?)
    }

    pub async fn delete_review(&self, identity: &Identity, id: &ReviewId) -> ActionResult<ActionMessage> {
        let author = identity.require_user()?;
        self.store
            .delete_review(id, author)
            .await
            .map_err(|e| not_found_as_review(e, id))?;
        Ok(ActionMessage::ok("Review deleted successfully"))
    }

    /// Change rating and comment of one of the caller's reviews.
    pub async fn update_review(
        &self,
        identity: &Identity,
        id: &ReviewId,
        rating: u8,
        comment: &str,
    ) -> ActionResult<ActionMessage> {
        let author = identity.require_user()?;
        validate_review_edit(rating, comment)?;
        let mut review = self
            .store
            .get_review(id)
            .await?
            .filter(|r| &r.author == author)
            .ok_or_else(|| CommerceError::ReviewNotFound(id.to_string()))?;
        review.rating = rating;
        review.comment = comment.to_string();
        self.store.update_review(review).await?;
        Ok(ActionMessage::ok("Review updated successfully"))
    }

    /// The review `user` wrote for `product_id`, if any.
    pub async fn find_existing_review(&self, user: &UserId, product_id: &ProductId) -> ActionResult<Option<Review>> {
        let query = ReviewQuery {
            product: Some(product_id.clone()),
            author: Some(user.clone()),
        };
        Ok(self.store.list_reviews(&query).await?.into_iter().next())
    }
}

fn not_found_as_review(err: DbError, id: &ReviewId) -> ActionError {
    match err {
        DbError::NotFound { .. } => CommerceError::ReviewNotFound(id.to_string()).into(),
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use shop_db::MemoryStore;

    fn input(product: &str, rating: u8) -> ReviewInput {
        ReviewInput {
            product_id: ProductId::new(product),
            author_name: "Sam".to_string(),
            author_image_url: "https://img.example.com/sam.png".to_string(),
            rating,
            comment: "Exactly what the photos showed.".to_string(),
        }
    }

    #[tokio::test]
    async fn test_rating_average() {
        let reviews = ReviewService::new(Arc::new(MemoryStore::new()));
        let p = ProductId::new("p1");
        assert_eq!(reviews.product_rating(&p).await.unwrap(), ProductRating::default());

        reviews.create_review(&customer("a"), input("p1", 5)).await.unwrap();
        reviews.create_review(&customer("b"), input("p1", 4)).await.unwrap();
        reviews.create_review(&customer("c"), input("p1", 4)).await.unwrap();

        let rating = reviews.product_rating(&p).await.unwrap();
        assert_eq!(rating.count, 3);
        assert_eq!(rating.rating, 4.3);
    }

    #[tokio::test]
    async fn test_create_validates() {
        let reviews = ReviewService::new(Arc::new(MemoryStore::new()));
        let mut bad = input("p1", 6);
        bad.comment = "short".to_string();
        let err = reviews.create_review(&customer("a"), bad).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "max rating of 5, Comment must be at least 10 characters"
        );
        assert!(matches!(
            reviews.create_review(&Identity::guest(), input("p1", 3)).await,
            Err(ActionError::Auth(_))
        ));
    }

    #[tokio::test]
    async fn test_author_scoping() {
        let reviews = ReviewService::new(Arc::new(MemoryStore::new()));
        let sam = customer("sam");
        let kim = customer("kim");
        reviews.create_review(&sam, input("p1", 3)).await.unwrap();
        let review = reviews
            .find_existing_review(&UserId::new("sam"), &ProductId::new("p1"))
            .await
            .unwrap()
            .unwrap();
        assert!(reviews
            .find_existing_review(&UserId::new("kim"), &ProductId::new("p1"))
            .await
            .unwrap()
            .is_none());

        assert!(reviews
            .update_review(&kim, &review.id, 1, "not my review at all")
            .await
            .unwrap_err()
            .is_not_found());
        assert!(matches!(
            reviews.delete_review(&kim, &review.id).await,
            Err(ActionError::Commerce(CommerceError::ReviewNotFound(_)))
        ));

        reviews
            .update_review(&sam, &review.id, 5, "Better after a week of use")
            .await
            .unwrap();
        let mine = reviews.user_reviews(&sam).await.unwrap();
        assert_eq!(mine[0].rating, 5);

        let msg = reviews.delete_review(&sam, &review.id).await.unwrap();
        assert_eq!(msg.message, "Review deleted successfully");
        assert!(reviews.user_reviews(&sam).await.unwrap().is_empty());
    }
}
