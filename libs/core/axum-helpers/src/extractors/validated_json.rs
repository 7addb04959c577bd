//! JSON extractor with validation through the validator crate.

use crate::errors::AppError;
use axum::{
    extract::{FromRequest, Json, Request},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON body extractor that runs [`Validate::validate`] after deserializing.
///
/// Malformed JSON, missing required fields and wrong field types are all
/// reported as `400 VALIDATION_ERROR`, the same as a failed validation rule.
/// Unknown fields are ignored.
///
/// ```ignore
/// #[derive(Deserialize, Validate)]
/// struct CreateCategory {
///     #[validate(length(min = 1))]
///     nome: String,
/// }
///
/// async fn create(ValidatedJson(input): ValidatedJson<CreateCategory>) -> String {
///     input.nome
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::JsonExtractorRejection(e).into_response())?;

        data.validate()
            .map_err(|e| AppError::ValidationError(e).into_response())?;

        Ok(ValidatedJson(data))
    }
}
