use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::Utc;
use serde_json::Value;

use shopfront_catalog::{NewProduct, Product, ProductPatch};
use shopfront_core::Entity;

use crate::app::dto::{self, Data};
use crate::app::errors::ApiError;
use crate::app::routes::common::{BoundProduct, Payload};
use crate::app::services::AppServices;

pub fn register(router: Router) -> Router {
    router
        .route("/product", get(index).post(store))
        .route(
            "/product/:product",
            get(show).put(update).patch(update).delete(destroy),
        )
}

fn product_json(services: &AppServices, product: &Product) -> Value {
    dto::product_to_json(product, services.catalog().rating_summary(product.id()))
}

pub async fn index(Extension(services): Extension<Arc<AppServices>>) -> Response {
    let catalog = services.catalog();
    let summaries = catalog.rating_summaries();
    let items = catalog
        .list_products()
        .iter()
        .map(|p| {
            let summary = summaries.get(&p.id()).copied().unwrap_or_default();
            dto::product_to_json(p, summary)
        })
        .collect::<Vec<_>>();
    Json(Data::new(items)).into_response()
}

pub async fn store(
    Extension(services): Extension<Arc<AppServices>>,
    Payload(body): Payload<NewProduct>,
) -> Result<Response, ApiError> {
    let product = services.catalog().create_product(body, Utc::now())?;
    tracing::info!(product_id = %product.id(), "product created");

    Ok((StatusCode::CREATED, Json(Data::new(product_json(&services, &product)))).into_response())
}

pub async fn show(
    Extension(services): Extension<Arc<AppServices>>,
    BoundProduct(product): BoundProduct,
) -> Response {
    Json(Data::new(product_json(&services, &product))).into_response()
}

pub async fn update(
    Extension(services): Extension<Arc<AppServices>>,
    BoundProduct(product): BoundProduct,
    Payload(patch): Payload<ProductPatch>,
) -> Result<Response, ApiError> {
    let product = services
        .catalog()
        .update_product(product.id(), patch, Utc::now())?;

    Ok(Json(Data::new(product_json(&services, &product))).into_response())
}

pub async fn destroy(
    Extension(services): Extension<Arc<AppServices>>,
    BoundProduct(product): BoundProduct,
) -> Result<StatusCode, ApiError> {
    services.catalog().delete_product(product.id())?;
    tracing::info!(product_id = %product.id(), "product deleted");
    Ok(StatusCode::NO_CONTENT)
}
