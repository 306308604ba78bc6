//! Catalog domain module: products and their customer reviews.
//!
//! This crate contains business rules for the catalog, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage).

pub mod product;
pub mod review;
mod rules;

pub use product::{NewProduct, Product, ProductPatch};
pub use review::{NewReview, Review, ReviewPatch, average_star};
