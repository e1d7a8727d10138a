//! Product catalog.

mod product;

pub use product::{ImageUpload, Product, ProductDetails, ProductForm, MAX_IMAGE_UPLOAD_MB};
