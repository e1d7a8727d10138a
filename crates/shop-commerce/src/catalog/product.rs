//! Product records and the admin product form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CommerceError;
use crate::ids::{ProductId, UserId};
use crate::money::{parse_price_to_cents, Currency, Money};
use crate::validation::Validator;

/// Largest accepted product image, in megabytes.
pub const MAX_IMAGE_UPLOAD_MB: u64 = 5;

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub company: String,
    pub description: String,
    pub featured: bool,
    /// Public URL of the product image.
    pub image: String,
    /// Price in minor units.
    pub price: i64,
    /// Admin who created the product.
    pub owner: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(details: ProductDetails, image: impl Into<String>, owner: UserId) -> Self {
        let now = Utc::now();
        Self {
            id: ProductId::generate(),
            name: details.name,
            company: details.company,
            description: details.description,
            featured: details.featured,
            image: image.into(),
            price: details.price,
            owner,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite the editable fields.
    pub fn apply(&mut self, details: ProductDetails) {
        self.name = details.name;
        self.company = details.company;
        self.description = details.description;
        self.featured = details.featured;
        self.price = details.price;
        self.updated_at = Utc::now();
    }

    pub fn set_image(&mut self, image: impl Into<String>) {
        self.image = image.into();
        self.updated_at = Utc::now();
    }

    /// Case-insensitive substring match on name or company. An empty term
    /// matches everything.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        term.is_empty()
            || self.name.to_lowercase().contains(&term)
            || self.company.to_lowercase().contains(&term)
    }

    pub fn price_money(&self, currency: Currency) -> Money {
        Money::new(self.price, currency)
    }
}

/// Product form as submitted by an admin; the price is still text.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProductForm {
    pub name: String,
    pub company: String,
    pub price: String,
    pub description: String,
    #[serde(default)]
    pub featured: bool,
}

/// Validated product fields with the price in minor units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDetails {
    pub name: String,
    pub company: String,
    pub price: i64,
    pub description: String,
    pub featured: bool,
}

impl ProductForm {
    /// Convert the price and check every product rule.
    pub fn validate(&self) -> Result<ProductDetails, CommerceError> {
        let price = parse_price_to_cents(&self.price)?;
        let words = self.description.split(' ').count();

        let mut v = Validator::new();
        v.check(self.name.chars().count() >= 3, "name must be at least 3 characters")
            .check(
                !self.company.is_empty(),
                "company name must be at least 1 character",
            )
            .check(price >= 0, "price must be positive")
            .check(
                (10..=1000).contains(&words),
                "description must be between 10 and 1000 words",
            );
        v.finish()?;

        Ok(ProductDetails {
            name: self.name.clone(),
            company: self.company.clone(),
            price,
            description: self.description.clone(),
            featured: self.featured,
        })
    }
}

/// An uploaded image file awaiting storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn validate(&self) -> Result<(), CommerceError> {
        let mut v = Validator::new();
        v.check(
            self.size_bytes() <= MAX_IMAGE_UPLOAD_MB * 1024 * 1024,
            format!("File size must be less than {}MB", MAX_IMAGE_UPLOAD_MB),
        )
        .check(self.content_type.starts_with("image/"), "File must be an image");
        v.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ProductForm {
        ProductForm {
            name: "Walnut Lamp".to_string(),
            company: "Luma".to_string(),
            price: "$129.99".to_string(),
            description: "A warm walnut lamp that softens any room with an amber glow".to_string(),
            featured: true,
        }
    }

    #[test]
    fn test_valid_form() {
        let details = form().validate().unwrap();
        assert_eq!(details.price, 12999);
        assert!(details.featured);
    }

    #[test]
    fn test_form_collects_all_messages() {
        let bad = ProductForm {
            name: "ab".to_string(),
            company: String::new(),
            price: "5".to_string(),
            description: "too short".to_string(),
            featured: false,
        };
        let err = bad.validate().unwrap_err();
        assert_eq!(
            err,
            CommerceError::Validation(
                "name must be at least 3 characters, company name must be at least 1 character, description must be between 10 and 1000 words"
                    .to_string()
            )
        );
    }

    #[test]
    fn test_form_rejects_unreadable_price() {
        let mut bad = form();
        bad.price = "twelve".to_string();
        assert!(matches!(bad.validate(), Err(CommerceError::InvalidPrice(_))));
    }

    #[test]
    fn test_matches_search() {
        let product = Product::new(form().validate().unwrap(), "https://img/x.png", UserId::new("admin"));
        assert!(product.matches_search("walnut"));
        assert!(product.matches_search("LUMA"));
        assert!(product.matches_search(""));
        assert!(!product.matches_search("sofa"));
    }

    #[test]
    fn test_image_validation() {
        let ok = ImageUpload::new("a.png", "image/png", vec![0; 1024]);
        assert!(ok.validate().is_ok());

        let big = ImageUpload::new("a.png", "image/png", vec![0; 6 * 1024 * 1024]);
        assert_eq!(
            big.validate(),
            Err(CommerceError::Validation("File size must be less than 5MB".to_string()))
        );

        let pdf = ImageUpload::new("a.pdf", "application/pdf", vec![0; 10]);
        assert_eq!(
            pdf.validate(),
            Err(CommerceError::Validation("File must be an image".to_string()))
        );
    }
}
