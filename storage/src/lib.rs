//! Storage crate: relational catalog and identity persistence on SQLite.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`models`] – Book, Part, Genre, UserRecord, AdminRecord, FeedbackRecord, BookView
//! - [`repository`] – CatalogStore and IdentityStore traits
//! - [`catalog_repo`] – CatalogRepository (books, parts, genres)
//! - [`identity_repo`] – IdentityRepository (users, admins, feedback, view counters)
//! - [`schema`] – table creation
//! - [`sqlite_pool`] – SqlitePoolManager

mod catalog_repo;
mod error;
mod identity_repo;
mod models;
mod repository;
mod schema;
mod sqlite_pool;

#[cfg(test)]
mod catalog_repo_test;

pub use catalog_repo::CatalogRepository;
pub use error::{Result, StorageError};
pub use identity_repo::IdentityRepository;
pub use models::{
    part_label, AdminRecord, Book, BookView, FeedbackRecord, Genre, Part, UserRecord,
};
pub use repository::{CatalogStore, IdentityStore};
pub use schema::init_schema;
pub use sqlite_pool::{PoolSettings, SqlitePoolManager};
