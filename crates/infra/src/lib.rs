//! Infrastructure layer: record storage and the catalog repository.

pub mod catalog;
pub mod store;

pub use catalog::Catalog;
pub use store::{InMemoryStore, Store};
