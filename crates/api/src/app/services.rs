//! Service wiring shared by every handler.

use std::sync::Arc;

use axum::http::request::Parts;

use shopfront_catalog::{Product, Review};
use shopfront_core::{ProductId, ReviewId};
use shopfront_infra::{Catalog, InMemoryStore};

use crate::app::errors::ApiError;

pub type InMemoryCatalog =
    Catalog<InMemoryStore<ProductId, Product>, InMemoryStore<ReviewId, Review>>;

#[derive(Debug)]
pub struct AppServices {
    catalog: InMemoryCatalog,
}

impl AppServices {
    pub fn catalog(&self) -> &InMemoryCatalog {
        &self.catalog
    }

    /// Services as installed on a request by the router's extension layer.
    pub fn from_parts(parts: &Parts) -> Result<Arc<Self>, ApiError> {
        parts
            .extensions
            .get::<Arc<Self>>()
            .cloned()
            .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("AppServices extension missing")))
    }
}

pub fn build_services() -> AppServices {
    // In-memory stores only; nothing survives a restart.
    AppServices {
        catalog: Catalog::new(InMemoryStore::new(), InMemoryStore::new()),
    }
}
