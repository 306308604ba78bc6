use chrono::{DateTime, Utc};
use serde::Deserialize;

use shopfront_core::{DomainResult, Entity, ProductId, ValidationErrors};

use crate::rules;

/// Largest allowed discount, in percent.
pub const MAX_DISCOUNT: u8 = 100;

/// Payload for creating a product.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub detail: String,
    /// Price in smallest currency unit (e.g. cents).
    pub price: u64,
    pub stock: u32,
    /// Percent off `price`, 0..=100.
    #[serde(default)]
    pub discount: u8,
}

impl NewProduct {
    pub fn validate(&self) -> DomainResult<()> {
        let mut errors = ValidationErrors::new();
        rules::short_text(&mut errors, "name", &self.name);
        rules::required(&mut errors, "detail", &self.detail);
        rules::max_value(&mut errors, "discount", self.discount.into(), MAX_DISCOUNT.into());
        errors.into_result()
    }
}

/// Partial update for a product; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub detail: Option<String>,
    pub price: Option<u64>,
    pub stock: Option<u32>,
    pub discount: Option<u8>,
}

impl ProductPatch {
    pub fn validate(&self) -> DomainResult<()> {
        let mut errors = ValidationErrors::new();
        if let Some(name) = &self.name {
            rules::short_text(&mut errors, "name", name);
        }
        if let Some(detail) = &self.detail {
            rules::required(&mut errors, "detail", detail);
        }
        if let Some(discount) = self.discount {
            rules::max_value(&mut errors, "discount", discount.into(), MAX_DISCOUNT.into());
        }
        errors.into_result()
    }
}

/// Catalog product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    id: ProductId,
    name: String,
    detail: String,
    price: u64,
    stock: u32,
    discount: u8,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Product {
    /// Validate `input` and build a new product.
    pub fn create(id: ProductId, input: NewProduct, now: DateTime<Utc>) -> DomainResult<Self> {
        input.validate()?;

        Ok(Self {
            id,
            name: input.name.trim().to_string(),
            detail: input.detail,
            price: input.price,
            stock: input.stock,
            discount: input.discount,
            created_at: now,
            updated_at: now,
        })
    }

    /// Validate `patch` and apply it. Nothing changes when validation fails.
    pub fn apply(&mut self, patch: ProductPatch, now: DateTime<Utc>) -> DomainResult<()> {
        patch.validate()?;

        if let Some(name) = patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(detail) = patch.detail {
            self.detail = detail;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(stock) = patch.stock {
            self.stock = stock;
        }
        if let Some(discount) = patch.discount {
            self.discount = discount;
        }
        self.updated_at = now;
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }

    pub fn price(&self) -> u64 {
        self.price
    }

    pub fn stock(&self) -> u32 {
        self.stock
    }

    pub fn discount(&self) -> u8 {
        self.discount
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Price after discount, rounded down to the smallest currency unit.
    pub fn total_price(&self) -> u64 {
        let off = u128::from(self.price) * u128::from(self.discount) / 100;
        // discount <= 100, so off <= price
        self.price - off as u64
    }

    /// Case-insensitive name comparison used for uniqueness checks.
    pub fn has_name(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name.trim())
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> ProductId {
        self.id
    }
}
