//! API routes module

pub mod health;

use axum::Router;
use domain_catalog::{CatalogStore, handlers};

/// Routes served under `/api`
pub fn routes<S: CatalogStore + 'static>(store: S) -> Router {
    handlers::router(store)
}
