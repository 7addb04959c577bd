//! Business rules for the catalog.
//!
//! Each service validates input, runs a cheap pre-check against the store so
//! the common failure cases get a precise error, and then calls the store
//! operation that enforces the same rule atomically.

mod category;
mod product;
mod stock;

pub use category::CategoryService;
pub use product::ProductService;
pub use stock::StockService;
