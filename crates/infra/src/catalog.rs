//! Catalog repository: products and their reviews over two [`Store`]s.
//!
//! Lookups that miss return `DomainError::NotFound`; the API layer maps that
//! to its entity-not-found response.
//!
//! Every mutation runs its checks and its writes under one catalog-wide write
//! guard, so uniqueness and the product/review link hold across threads.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};

use shopfront_catalog::{
    NewProduct, NewReview, Product, ProductPatch, Review, ReviewPatch, average_star,
};
use shopfront_core::{DomainError, DomainResult, Entity, ProductId, ReviewId};

use crate::store::Store;

/// Aggregated review figures for one product.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RatingSummary {
    pub rating: Option<f64>,
    pub review_count: usize,
}

#[derive(Debug)]
pub struct Catalog<P, R> {
    products: P,
    reviews: R,
    writes: Mutex<()>,
}

impl<P, R> Catalog<P, R>
where
    P: Store<ProductId, Product>,
    R: Store<ReviewId, Review>,
{
    pub fn new(products: P, reviews: R) -> Self {
        Self {
            products,
            reviews,
            writes: Mutex::new(()),
        }
    }

    fn write_guard(&self) -> MutexGuard<'_, ()> {
        self.writes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn list_products(&self) -> Vec<Product> {
        self.products.list()
    }

    pub fn find_product(&self, id: ProductId) -> DomainResult<Product> {
        self.products
            .get(&id)
            .ok_or(DomainError::not_found("product"))
    }

    pub fn create_product(&self, input: NewProduct, now: DateTime<Utc>) -> DomainResult<Product> {
        input.validate()?;
        let _writes = self.write_guard();
        self.ensure_name_available(&input.name, None)?;

        let product = Product::create(ProductId::new(), input, now)?;
        self.products.upsert(product.id(), product.clone());
        tracing::debug!(product_id = %product.id(), "product created");
        Ok(product)
    }

    pub fn update_product(
        &self,
        id: ProductId,
        patch: ProductPatch,
        now: DateTime<Utc>,
    ) -> DomainResult<Product> {
        let _writes = self.write_guard();
        let mut product = self.find_product(id)?;
        patch.validate()?;
        if let Some(name) = &patch.name {
            self.ensure_name_available(name, Some(id))?;
        }

        product.apply(patch, now)?;
        self.products.upsert(id, product.clone());
        tracing::debug!(product_id = %id, "product updated");
        Ok(product)
    }

    /// Delete a product together with all of its reviews.
    pub fn delete_product(&self, id: ProductId) -> DomainResult<()> {
        let _writes = self.write_guard();
        self.products
            .remove(&id)
            .ok_or(DomainError::not_found("product"))?;
        let removed_reviews = self.reviews.retain(&|r: &Review| !r.belongs_to(id));
        tracing::debug!(product_id = %id, removed_reviews, "product deleted");
        Ok(())
    }

    pub fn rating_summary(&self, id: ProductId) -> RatingSummary {
        let reviews = self.reviews_of(id);
        RatingSummary {
            rating: average_star(&reviews),
            review_count: reviews.len(),
        }
    }

    /// Summaries for every product that has reviews, from one pass over the
    /// review store. Products without reviews are absent.
    pub fn rating_summaries(&self) -> HashMap<ProductId, RatingSummary> {
        let mut grouped: HashMap<ProductId, Vec<Review>> = HashMap::new();
        for review in self.reviews.list() {
            grouped.entry(review.product_id()).or_default().push(review);
        }
        grouped
            .into_iter()
            .map(|(id, reviews)| {
                let summary = RatingSummary {
                    rating: average_star(&reviews),
                    review_count: reviews.len(),
                };
                (id, summary)
            })
            .collect()
    }

    /// Reviews of an existing product; a missing product is a lookup miss.
    pub fn list_reviews(&self, product_id: ProductId) -> DomainResult<Vec<Review>> {
        self.find_product(product_id)?;
        Ok(self.reviews_of(product_id))
    }

    /// Find a review scoped to its product. A review attached to another
    /// product is reported as missing.
    pub fn find_review(&self, product_id: ProductId, review_id: ReviewId) -> DomainResult<Review> {
        self.find_product(product_id)?;
        self.reviews
            .get(&review_id)
            .filter(|r| r.belongs_to(product_id))
            .ok_or(DomainError::not_found("review"))
    }

    pub fn create_review(
        &self,
        product_id: ProductId,
        input: NewReview,
        now: DateTime<Utc>,
    ) -> DomainResult<Review> {
        let _writes = self.write_guard();
        self.find_product(product_id)?;

        let review = Review::create(ReviewId::new(), product_id, input, now)?;
        self.reviews.upsert(review.id(), review.clone());
        tracing::debug!(%product_id, review_id = %review.id(), "review created");
        Ok(review)
    }

    pub fn update_review(
        &self,
        product_id: ProductId,
        review_id: ReviewId,
        patch: ReviewPatch,
        now: DateTime<Utc>,
    ) -> DomainResult<Review> {
        let _writes = self.write_guard();
        let mut review = self.find_review(product_id, review_id)?;

        review.apply(patch, now)?;
        self.reviews.upsert(review_id, review.clone());
        tracing::debug!(%product_id, %review_id, "review updated");
        Ok(review)
    }

    pub fn delete_review(&self, product_id: ProductId, review_id: ReviewId) -> DomainResult<()> {
        let _writes = self.write_guard();
        self.find_review(product_id, review_id)?;
        self.reviews.remove(&review_id);
        tracing::debug!(%product_id, %review_id, "review deleted");
        Ok(())
    }

    fn reviews_of(&self, product_id: ProductId) -> Vec<Review> {
        self.reviews
            .list()
            .into_iter()
            .filter(|r| r.belongs_to(product_id))
            .collect()
    }

    fn ensure_name_available(&self, name: &str, except: Option<ProductId>) -> DomainResult<()> {
        let taken = self
            .products
            .list()
            .iter()
            .any(|p| Some(p.id()) != except && p.has_name(name));
        if taken {
            return Err(DomainError::validation("name", "The name has already been taken."));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Barrier};
    use std::thread;

    use super::*;
    use crate::store::InMemoryStore;

    type TestCatalog =
        Catalog<Arc<InMemoryStore<ProductId, Product>>, Arc<InMemoryStore<ReviewId, Review>>>;

    fn catalog() -> TestCatalog {
        Catalog::new(Arc::new(InMemoryStore::new()), Arc::new(InMemoryStore::new()))
    }

    fn new_product(name: &str) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            detail: "detail".to_string(),
            price: 500,
            stock: 3,
            discount: 0,
        }
    }

    fn new_review(star: u8) -> NewReview {
        NewReview {
            customer: "Grace".to_string(),
            star,
            review: "Solid".to_string(),
        }
    }

    #[test]
    fn find_missing_product_is_not_found() {
        let err = catalog().find_product(ProductId::new()).unwrap_err();
        assert_eq!(err, DomainError::NotFound { entity: "product" });
    }

    #[test]
    fn create_then_list_in_creation_order() {
        let catalog = catalog();
        let now = Utc::now();
        let a = catalog.create_product(new_product("Alpha"), now).unwrap();
        let b = catalog.create_product(new_product("Beta"), now).unwrap();

        let ids: Vec<ProductId> = catalog.list_products().iter().map(|p| p.id()).collect();
        assert_eq!(ids, vec![a.id(), b.id()]);
    }

    #[test]
    fn duplicate_product_name_is_rejected() {
        let catalog = catalog();
        catalog.create_product(new_product("Widget"), Utc::now()).unwrap();

        let err = catalog
            .create_product(new_product("WIDGET"), Utc::now())
            .unwrap_err();
        match err {
            DomainError::Validation(errors) => {
                assert_eq!(errors.first_message(), Some("The name has already been taken."));
            }
            other => panic!("expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn renaming_a_product_to_its_own_name_is_allowed() {
        let catalog = catalog();
        let p = catalog.create_product(new_product("Widget"), Utc::now()).unwrap();

        let patch = ProductPatch {
            name: Some("widget".to_string()),
            ..ProductPatch::default()
        };
        let updated = catalog.update_product(p.id(), patch, Utc::now()).unwrap();
        assert_eq!(updated.name(), "widget");
    }

    #[test]
    fn update_missing_product_is_not_found() {
        let err = catalog()
            .update_product(ProductId::new(), ProductPatch::default(), Utc::now())
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[test]
    fn delete_product_cascades_to_reviews() {
        let catalog = catalog();
        let now = Utc::now();
        let keep = catalog.create_product(new_product("Keep"), now).unwrap();
        let doomed = catalog.create_product(new_product("Drop"), now).unwrap();
        catalog.create_review(keep.id(), new_review(4), now).unwrap();
        let gone = catalog.create_review(doomed.id(), new_review(1), now).unwrap();

        catalog.delete_product(doomed.id()).unwrap();

        assert!(catalog.find_product(doomed.id()).is_err());
        assert!(catalog.reviews.get(&gone.id()).is_none());
        assert_eq!(catalog.list_reviews(keep.id()).unwrap().len(), 1);
        assert!(matches!(
            catalog.delete_product(doomed.id()),
            Err(DomainError::NotFound { entity: "product" })
        ));
    }

    #[test]
    fn reviews_are_scoped_to_their_product() {
        let catalog = catalog();
        let now = Utc::now();
        let a = catalog.create_product(new_product("A"), now).unwrap();
        let b = catalog.create_product(new_product("B"), now).unwrap();
        let review = catalog.create_review(a.id(), new_review(5), now).unwrap();

        assert!(catalog.find_review(a.id(), review.id()).is_ok());
        assert_eq!(
            catalog.find_review(b.id(), review.id()).unwrap_err(),
            DomainError::NotFound { entity: "review" }
        );
        assert!(catalog.list_reviews(b.id()).unwrap().is_empty());
    }

    #[test]
    fn review_on_missing_product_is_product_not_found() {
        let err = catalog()
            .create_review(ProductId::new(), new_review(3), Utc::now())
            .unwrap_err();
        assert_eq!(err, DomainError::NotFound { entity: "product" });
    }

    #[test]
    fn rating_summary_tracks_reviews() {
        let catalog = catalog();
        let now = Utc::now();
        let p = catalog.create_product(new_product("Rated"), now).unwrap();
        assert_eq!(
            catalog.rating_summary(p.id()),
            RatingSummary { rating: None, review_count: 0 }
        );

        catalog.create_review(p.id(), new_review(5), now).unwrap();
        let r = catalog.create_review(p.id(), new_review(2), now).unwrap();
        assert_eq!(
            catalog.rating_summary(p.id()),
            RatingSummary { rating: Some(3.5), review_count: 2 }
        );

        catalog.delete_review(p.id(), r.id()).unwrap();
        assert_eq!(
            catalog.rating_summary(p.id()),
            RatingSummary { rating: Some(5.0), review_count: 1 }
        );
    }

    #[test]
    fn rating_summaries_cover_reviewed_products_in_one_map() {
        let catalog = catalog();
        let now = Utc::now();
        let rated = catalog.create_product(new_product("Rated"), now).unwrap();
        let quiet = catalog.create_product(new_product("Quiet"), now).unwrap();
        catalog.create_review(rated.id(), new_review(4), now).unwrap();
        catalog.create_review(rated.id(), new_review(1), now).unwrap();

        let summaries = catalog.rating_summaries();
        assert_eq!(summaries.get(&rated.id()), Some(&catalog.rating_summary(rated.id())));
        assert_eq!(
            summaries.get(&rated.id()),
            Some(&RatingSummary { rating: Some(2.5), review_count: 2 })
        );
        assert!(!summaries.contains_key(&quiet.id()));
        assert_eq!(catalog.rating_summary(quiet.id()), RatingSummary::default());
    }

    #[test]
    fn concurrent_creates_keep_names_unique() {
        const THREADS: usize = 16;

        for _ in 0..200 {
            let catalog = catalog();
            let barrier = Barrier::new(THREADS);
            let (shared, gate) = (&catalog, &barrier);

            let created = thread::scope(|s| {
                let handles: Vec<_> = (0..THREADS)
                    .map(|_| {
                        s.spawn(move || {
                            gate.wait();
                            shared.create_product(new_product("Widget"), Utc::now()).is_ok()
                        })
                    })
                    .collect();
                handles
                    .into_iter()
                    .map(|h| h.join().unwrap())
                    .filter(|ok| *ok)
                    .count()
            });

            assert_eq!(created, 1);
            assert_eq!(catalog.list_products().len(), 1);
        }
    }

    #[test]
    fn concurrent_patches_to_different_fields_both_land() {
        for _ in 0..200 {
            let catalog = catalog();
            let id = catalog
                .create_product(new_product("Patched"), Utc::now())
                .unwrap()
                .id();
            let barrier = Barrier::new(2);

            thread::scope(|s| {
                s.spawn(|| {
                    barrier.wait();
                    let patch = ProductPatch {
                        stock: Some(77),
                        ..ProductPatch::default()
                    };
                    catalog.update_product(id, patch, Utc::now()).unwrap();
                });
                s.spawn(|| {
                    barrier.wait();
                    let patch = ProductPatch {
                        price: Some(12_345),
                        ..ProductPatch::default()
                    };
                    catalog.update_product(id, patch, Utc::now()).unwrap();
                });
            });

            let product = catalog.find_product(id).unwrap();
            assert_eq!(product.stock(), 77);
            assert_eq!(product.price(), 12_345);
        }
    }

    #[test]
    fn review_created_during_product_delete_is_never_orphaned() {
        for _ in 0..200 {
            let catalog = catalog();
            let now = Utc::now();
            let product = catalog.create_product(new_product("Doomed"), now).unwrap();
            let barrier = Barrier::new(2);

            thread::scope(|s| {
                s.spawn(|| {
                    barrier.wait();
                    let _ = catalog.create_review(product.id(), new_review(3), Utc::now());
                });
                s.spawn(|| {
                    barrier.wait();
                    catalog.delete_product(product.id()).unwrap();
                });
            });

            assert!(catalog.find_product(product.id()).is_err());
            assert!(catalog.reviews.list().is_empty());
        }
    }
}
