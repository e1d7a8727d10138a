//! Product reviews and rating aggregation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CommerceError;
use crate::ids::{ProductId, ReviewId, UserId};
use crate::validation::{is_valid_url, Validator};

/// A customer review of a product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Review {
    pub id: ReviewId,
    pub product_id: ProductId,
    pub author: UserId,
    pub author_name: String,
    pub author_image_url: String,
    /// 1 to 5 stars.
    pub rating: u8,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl Review {
    /// Build a review from already-validated input.
    pub fn new(input: ReviewInput, author: UserId) -> Self {
        Self {
            id: ReviewId::generate(),
            product_id: input.product_id,
            author,
            author_name: input.author_name,
            author_image_url: input.author_image_url,
            rating: input.rating,
            comment: input.comment,
            created_at: Utc::now(),
        }
    }
}

/// Review form input.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReviewInput {
    pub product_id: ProductId,
    pub author_name: String,
    pub author_image_url: String,
    pub rating: u8,
    pub comment: String,
}

impl ReviewInput {
    pub fn validate(&self) -> Result<(), CommerceError> {
        let mut v = Validator::new();
        v.check(!self.product_id.as_str().is_empty(), "Product ID cannot be empty")
            .check(!self.author_name.is_empty(), "Author name cannot be empty")
            .check(is_valid_url(&self.author_image_url), "Must be a valid url");
        check_rating_and_comment(&mut v, self.rating, &self.comment);
        v.finish()
    }
}

/// Validate only the editable fields of an existing review.
pub fn validate_review_edit(rating: u8, comment: &str) -> Result<(), CommerceError> {
    let mut v = Validator::new();
    check_rating_and_comment(&mut v, rating, comment);
    v.finish()
}

fn check_rating_and_comment(v: &mut Validator, rating: u8, comment: &str) {
    let len = comment.chars().count();
    v.check(rating >= 1, "Min rating of 1")
        .check(rating <= 5, "max rating of 5")
        .check(len >= 10, "Comment must be at least 10 characters")
        .check(len <= 2000, "Comment must be at most 2000 characters");
}

/// Average rating for a product.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ProductRating {
    /// Mean rating rounded to one decimal; 0 when there are no reviews.
    pub rating: f64,
    pub count: usize,
}

impl ProductRating {
    pub fn from_reviews<'a>(reviews: impl IntoIterator<Item = &'a Review>) -> Self {
        let (sum, count) = reviews
            .into_iter()
            .fold((0_u64, 0_usize), |(sum, count), r| (sum + r.rating as u64, count + 1));
        if count == 0 {
            return Self::default();
        }
        let mean = sum as f64 / count as f64;
        Self {
            rating: (mean * 10.0).round() / 10.0,
            count,
        }
    }
}
