use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::Utc;

use shopfront_catalog::{NewReview, ReviewPatch};
use shopfront_core::Entity;

use crate::app::dto::{self, Data};
use crate::app::errors::ApiError;
use crate::app::routes::common::{BoundProduct, BoundReview, Payload};
use crate::app::services::AppServices;

pub fn register(router: Router) -> Router {
    router
        .route("/product/:product/review", get(index).post(store))
        .route(
            "/product/:product/review/:review",
            get(show).put(update).patch(update).delete(destroy),
        )
}

pub async fn index(
    Extension(services): Extension<Arc<AppServices>>,
    BoundProduct(product): BoundProduct,
) -> Result<Response, ApiError> {
    let items = services
        .catalog()
        .list_reviews(product.id())?
        .iter()
        .map(dto::review_to_json)
        .collect::<Vec<_>>();
    Ok(Json(Data::new(items)).into_response())
}

pub async fn store(
    Extension(services): Extension<Arc<AppServices>>,
    BoundProduct(product): BoundProduct,
    Payload(body): Payload<NewReview>,
) -> Result<Response, ApiError> {
    let review = services
        .catalog()
        .create_review(product.id(), body, Utc::now())?;
    tracing::info!(product_id = %product.id(), review_id = %review.id(), "review created");

    Ok((StatusCode::CREATED, Json(Data::new(dto::review_to_json(&review)))).into_response())
}

pub async fn show(BoundReview { review, .. }: BoundReview) -> Response {
    Json(Data::new(dto::review_to_json(&review))).into_response()
}

pub async fn update(
    Extension(services): Extension<Arc<AppServices>>,
    BoundReview { product, review }: BoundReview,
    Payload(patch): Payload<ReviewPatch>,
) -> Result<Response, ApiError> {
    let review = services
        .catalog()
        .update_review(product.id(), review.id(), patch, Utc::now())?;

    Ok(Json(Data::new(dto::review_to_json(&review))).into_response())
}

pub async fn destroy(
    Extension(services): Extension<Arc<AppServices>>,
    BoundReview { product, review }: BoundReview,
) -> Result<StatusCode, ApiError> {
    services.catalog().delete_review(product.id(), review.id())?;
    tracing::info!(product_id = %product.id(), review_id = %review.id(), "review deleted");
    Ok(StatusCode::NO_CONTENT)
}
