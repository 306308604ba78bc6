//! Keyed record storage abstractions.

pub mod memory;

pub use memory::{InMemoryStore, Store};
