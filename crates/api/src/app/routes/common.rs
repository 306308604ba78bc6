//! Extractors shared by the resource handlers.

use std::collections::HashMap;

use axum::{
    Json,
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use shopfront_catalog::{Product, Review};
use shopfront_core::{Entity, ProductId, ReviewId};

use crate::app::errors::ApiError;
use crate::app::services::AppServices;

/// JSON request body whose rejections go through [`ApiError`].
pub struct Payload<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// The product named by the `{product}` path segment.
pub struct BoundProduct(pub Product);

/// The review named by `{review}`, scoped to the product named by `{product}`.
pub struct BoundReview {
    pub product: Product,
    pub review: Review,
}

async fn path_params<S: Send + Sync>(
    parts: &mut Parts,
    state: &S,
    entity: &'static str,
) -> Result<HashMap<String, String>, ApiError> {
    let Path(params) = Path::<HashMap<String, String>>::from_request_parts(parts, state)
        .await
        .map_err(|rejection| {
            tracing::debug!(error = %rejection, "path segment could not be decoded");
            ApiError::ModelNotFound { entity }
        })?;
    Ok(params)
}

/// Parse the id in `params[key]`. Anything that is not an id names no record.
fn bind_id<I: core::str::FromStr>(
    params: &HashMap<String, String>,
    key: &str,
    entity: &'static str,
) -> Result<I, ApiError> {
    params
        .get(key)
        .and_then(|raw| raw.parse().ok())
        .ok_or(ApiError::ModelNotFound { entity })
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for BoundProduct {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let services = AppServices::from_parts(parts)?;
        let params = path_params(parts, state, "product").await?;

        let id: ProductId = bind_id(&params, "product", "product")?;
        Ok(Self(services.catalog().find_product(id)?))
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for BoundReview {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let services = AppServices::from_parts(parts)?;
        let params = path_params(parts, state, "review").await?;

        let product_id: ProductId = bind_id(&params, "product", "product")?;
        let product = services.catalog().find_product(product_id)?;

        let review_id: ReviewId = bind_id(&params, "review", "review")?;
        let review = services.catalog().find_review(product.id(), review_id)?;

        Ok(Self { product, review })
    }
}
