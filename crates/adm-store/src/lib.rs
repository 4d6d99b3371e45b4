//! Client side of the mock record store.
//!
//! The store is a JSON-file-backed REST service exposing two collections,
//! `users` and `products`. This crate owns the record model, the fetch wrapper
//! that normalizes every HTTP exchange, and the repository functions built on
//! top of it.

pub mod error;
pub mod fetch;
pub mod lenient;
pub mod models;
pub mod repository;

pub use error::StoreError;
pub use fetch::{FetchResult, StoreClient};
pub use models::{
    Gender, Product, ProductCategory, Record, RecordId, Sale, Traffic, User, UserCategory,
};
