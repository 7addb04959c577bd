//! UUID path parameter extractor.

use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

/// Extracts a single `{id}` path segment as a [`Uuid`].
///
/// A segment that is not a UUID is rejected with `400 INVALID_UUID`.
///
/// ```ignore
/// async fn get_category(UuidPath(id): UuidPath) -> String {
///     format!("Category {id}")
/// }
///
/// let app = Router::new().route("/categoria/{id}", get(get_category));
/// ```
pub struct UuidPath(pub Uuid);

impl<S> FromRequestParts<S> for UuidPath
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| e.into_response())?;

        Uuid::parse_str(&id)
            .map(UuidPath)
            .map_err(|e| AppError::UuidError(e).into_response())
    }
}
