use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use strum::Display;
use thiserror::Error;
use uuid::Uuid;

/// The three catalog entities, used to label errors and log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum EntityKind {
    #[strum(serialize = "Category")]
    Category,
    #[strum(serialize = "Product")]
    Product,
    #[strum(serialize = "Stock record")]
    Stock,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    /// Input failed schema validation (400)
    #[error("Invalid input: {0}")]
    Validation(String),

    /// A referenced parent row does not exist (400)
    #[error("{entity} {id} does not exist")]
    MissingReference { entity: EntityKind, id: Uuid },

    #[error("{entity} {id} not found")]
    NotFound { entity: EntityKind, id: Uuid },

    /// Delete vetoed because dependents still point at the row (409)
    #[error("{entity} {id} is still referenced by at least one {dependent}")]
    InUse {
        entity: EntityKind,
        id: Uuid,
        dependent: EntityKind,
    },

    /// The store failed or timed out; carries the store's own message (503)
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

impl CatalogError {
    pub fn not_found(entity: EntityKind, id: Uuid) -> Self {
        Self::NotFound { entity, id }
    }

    pub fn missing(entity: EntityKind, id: Uuid) -> Self {
        Self::MissingReference { entity, id }
    }

    pub fn in_use(entity: EntityKind, id: Uuid, dependent: EntityKind) -> Self {
        Self::InUse {
            entity,
            id,
            dependent,
        }
    }
}

impl From<validator::ValidationErrors> for CatalogError {
    fn from(err: validator::ValidationErrors) -> Self {
        CatalogError::Validation(err.to_string())
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        let message = err.to_string();
        match err {
            CatalogError::Validation(msg) => AppError::BadRequest(msg),
            CatalogError::MissingReference { .. } => AppError::InvalidReference(message),
            CatalogError::NotFound { .. } => AppError::NotFound(message),
            CatalogError::InUse { .. } => AppError::Conflict(message),
            CatalogError::StoreUnavailable(msg) => AppError::ServiceUnavailable(msg),
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn status_of(err: CatalogError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_mapping() {
        let id = Uuid::now_v7();
        assert_eq!(
            status_of(CatalogError::Validation("nome".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(CatalogError::missing(EntityKind::Category, id)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(CatalogError::not_found(EntityKind::Product, id)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(CatalogError::in_use(
                EntityKind::Category,
                id,
                EntityKind::Product
            )),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(CatalogError::StoreUnavailable("pool timed out".into())),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_messages_name_the_entity() {
        let id = Uuid::now_v7();
        let msg = CatalogError::in_use(EntityKind::Product, id, EntityKind::Stock).to_string();
        assert_eq!(
            msg,
            format!("Product {id} is still referenced by at least one Stock record")
        );
    }
}
