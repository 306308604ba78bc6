use chrono::{DateTime, Utc};
use serde::Deserialize;

use shopfront_core::{DomainResult, Entity, ProductId, ReviewId, ValidationErrors};

use crate::rules;

/// Highest star rating a review may give.
pub const MAX_STAR: u8 = 5;

/// Payload for posting a review on a product.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewReview {
    pub customer: String,
    pub star: u8,
    pub review: String,
}

impl NewReview {
    pub fn validate(&self) -> DomainResult<()> {
        let mut errors = ValidationErrors::new();
        rules::short_text(&mut errors, "customer", &self.customer);
        rules::max_value(&mut errors, "star", self.star.into(), MAX_STAR.into());
        rules::required(&mut errors, "review", &self.review);
        errors.into_result()
    }
}

/// Partial update for a review; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ReviewPatch {
    pub customer: Option<String>,
    pub star: Option<u8>,
    pub review: Option<String>,
}

impl ReviewPatch {
    pub fn validate(&self) -> DomainResult<()> {
        let mut errors = ValidationErrors::new();
        if let Some(customer) = &self.customer {
            rules::short_text(&mut errors, "customer", customer);
        }
        if let Some(star) = self.star {
            rules::max_value(&mut errors, "star", star.into(), MAX_STAR.into());
        }
        if let Some(review) = &self.review {
            rules::required(&mut errors, "review", review);
        }
        errors.into_result()
    }
}

/// A customer's review of one product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    id: ReviewId,
    product_id: ProductId,
    customer: String,
    star: u8,
    review: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Review {
    pub fn create(
        id: ReviewId,
        product_id: ProductId,
        input: NewReview,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        input.validate()?;

        Ok(Self {
            id,
            product_id,
            customer: input.customer.trim().to_string(),
            star: input.star,
            review: input.review,
            created_at: now,
            updated_at: now,
        })
    }

    /// Validate `patch` and apply it. Nothing changes when validation fails.
    pub fn apply(&mut self, patch: ReviewPatch, now: DateTime<Utc>) -> DomainResult<()> {
        patch.validate()?;

        if let Some(customer) = patch.customer {
            self.customer = customer.trim().to_string();
        }
        if let Some(star) = patch.star {
            self.star = star;
        }
        if let Some(review) = patch.review {
            self.review = review;
        }
        self.updated_at = now;
        Ok(())
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    /// Whether this review is attached to `product_id`.
    pub fn belongs_to(&self, product_id: ProductId) -> bool {
        self.product_id == product_id
    }

    pub fn customer(&self) -> &str {
        &self.customer
    }

    pub fn star(&self) -> u8 {
        self.star
    }

    pub fn review(&self) -> &str {
        &self.review
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl Entity for Review {
    type Id = ReviewId;

    fn id(&self) -> ReviewId {
        self.id
    }
}

/// Mean star rating rounded to two decimals, `None` without reviews.
pub fn average_star<'a>(reviews: impl IntoIterator<Item = &'a Review>) -> Option<f64> {
    let (sum, count) = reviews
        .into_iter()
        .fold((0u64, 0u64), |(sum, count), r| (sum + u64::from(r.star), count + 1));

    if count == 0 {
        return None;
    }

    let mean = sum as f64 / count as f64;
    Some((mean * 100.0).round() / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopfront_core::DomainError;

    fn review_with(star: u8) -> NewReview {
        NewReview {
            customer: "Ada".to_string(),
            star,
            review: "Does what it says".to_string(),
        }
    }

    #[test]
    fn create_attaches_review_to_product() {
        let product_id = ProductId::new();
        let review = Review::create(ReviewId::new(), product_id, review_with(4), Utc::now()).unwrap();

        assert!(review.belongs_to(product_id));
        assert!(!review.belongs_to(ProductId::new()));
        assert_eq!(review.star(), 4);
    }

    #[test]
    fn create_rejects_star_above_five() {
        let err = Review::create(ReviewId::new(), ProductId::new(), review_with(6), Utc::now())
            .unwrap_err();
        match err {
            DomainError::Validation(errors) => {
                assert_eq!(
                    errors.field("star"),
                    Some(&["The star may not be greater than 5.".to_string()][..])
                );
            }
            other => panic!("expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn create_rejects_blank_customer_and_body() {
        let input = NewReview {
            customer: " ".to_string(),
            star: 3,
            review: String::new(),
        };

        let err = Review::create(ReviewId::new(), ProductId::new(), input, Utc::now()).unwrap_err();
        match err {
            DomainError::Validation(errors) => {
                assert!(errors.field("customer").is_some());
                assert!(errors.field("review").is_some());
                assert!(errors.field("star").is_none());
            }
            other => panic!("expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn apply_keeps_product_link() {
        let product_id = ProductId::new();
        let mut review = Review::create(ReviewId::new(), product_id, review_with(2), Utc::now()).unwrap();

        review
            .apply(
                ReviewPatch {
                    star: Some(5),
                    ..ReviewPatch::default()
                },
                Utc::now(),
            )
            .unwrap();

        assert_eq!(review.star(), 5);
        assert_eq!(review.customer(), "Ada");
        assert_eq!(review.product_id(), product_id);
    }

    #[test]
    fn average_star_is_none_without_reviews() {
        assert_eq!(average_star(&Vec::<Review>::new()), None);
    }

    #[test]
    fn average_star_rounds_to_two_decimals() {
        let product_id = ProductId::new();
        let now = Utc::now();
        let reviews: Vec<Review> = [5, 4, 4]
            .into_iter()
            .map(|s| Review::create(ReviewId::new(), product_id, review_with(s), now).unwrap())
            .collect();

        assert_eq!(average_star(&reviews), Some(4.33));
    }
}
