//! HTTP surface of the catalog: `/categoria`, `/produto` and `/estoque`.

mod category;
mod product;
mod stock;

use axum::Router;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::repository::CatalogStore;
use crate::service::{CategoryService, ProductService, StockService};

pub use category::CategoryApi;
pub use product::ProductApi;
pub use stock::StockApi;

/// OpenAPI documentation for the catalog endpoints
#[derive(OpenApi)]
#[openapi(nest(
    (path = "/categoria", api = CategoryApi),
    (path = "/produto", api = ProductApi),
    (path = "/estoque", api = StockApi),
))]
pub struct ApiDoc;

/// Builds the catalog router over a single shared store.
pub fn router<S: CatalogStore + 'static>(store: S) -> Router {
    let store = Arc::new(store);

    Router::new()
        .nest(
            "/categoria",
            category::router(CategoryService::new(Arc::clone(&store))),
        )
        .nest(
            "/produto",
            product::router(ProductService::new(Arc::clone(&store))),
        )
        .nest("/estoque", stock::router(StockService::new(store)))
}
