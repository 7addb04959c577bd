//! Catalog Domain
//!
//! Categories (`Categoria`), products (`Produto`) and stock records
//! (`Estoque`) with the reference rules that tie them together:
//!
//! - a product always points at an existing category
//! - a stock record always points at an existing product
//! - a row that is still referenced cannot be deleted
//! - updating a stock record's quantity sets the product's quantity to match
//!
//! ```text
//! handlers  →  service  →  CatalogStore (in-memory | Postgres)
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_catalog::{InMemoryCatalogStore, handlers};
//!
//! let router = handlers::router(InMemoryCatalogStore::new());
//! # let _: axum::Router = router;
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{CatalogError, CatalogResult, EntityKind};
pub use handlers::ApiDoc;
pub use models::{
    Category, CreateCategory, CreateProduct, CreateStock, Product, Stock, UpdateCategory,
    UpdateProduct, UpdateStock,
};
pub use postgres::PgCatalogStore;
pub use repository::{CatalogStore, InMemoryCatalogStore};
pub use service::{CategoryService, ProductService, StockService};
