//! Application state for routes outside the catalog domain

use database::postgres::DatabaseConnection;

#[derive(Clone)]
pub struct AppState {
    /// `None` when running on the in-memory store
    pub db: Option<DatabaseConnection>,
}
