//! JSON mapping for catalog records.

use serde::Serialize;
use serde_json::{Value, json};

use shopfront_catalog::{Product, Review};
use shopfront_core::Entity;
use shopfront_infra::catalog::RatingSummary;

/// `{"data": ...}` envelope used for every success body.
#[derive(Debug, Serialize)]
pub struct Data<T> {
    pub data: T,
}

impl<T> Data<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

pub fn product_to_json(product: &Product, summary: RatingSummary) -> Value {
    json!({
        "id": product.id().to_string(),
        "name": product.name(),
        "detail": product.detail(),
        "price": product.price(),
        "stock": product.stock(),
        "discount": product.discount(),
        "total_price": product.total_price(),
        "rating": summary.rating,
        "review_count": summary.review_count,
        "created_at": product.created_at().to_rfc3339(),
        "updated_at": product.updated_at().to_rfc3339(),
    })
}

pub fn review_to_json(review: &Review) -> Value {
    json!({
        "id": review.id().to_string(),
        "product_id": review.product_id().to_string(),
        "customer": review.customer(),
        "star": review.star(),
        "review": review.review(),
        "created_at": review.created_at().to_rfc3339(),
        "updated_at": review.updated_at().to_rfc3339(),
    })
}
