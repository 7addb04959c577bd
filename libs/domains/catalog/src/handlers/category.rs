use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, ConflictResponse, NotFoundResponse,
        ServiceUnavailableResponse,
    },
};
use utoipa::OpenApi;
use uuid::Uuid;

use crate::error::CatalogResult;
use crate::models::{Category, CreateCategory, UpdateCategory};
use crate::repository::CatalogStore;
use crate::service::CategoryService;

const TAG: &str = "Categoria";

#[derive(OpenApi)]
#[openapi(
    paths(
        list_categories,
        create_category,
        get_category,
        update_category,
        delete_category
    ),
    components(
        schemas(Category, CreateCategory, UpdateCategory),
        responses(
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            NotFoundResponse,
            ConflictResponse,
            ServiceUnavailableResponse
        )
    ),
    tags((name = TAG, description = "Product categories"))
)]
pub struct CategoryApi;

pub(super) fn router<S: CatalogStore + 'static>(service: CategoryService<S>) -> Router {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route(
            "/{id}",
            get(get_category)
                .put(update_category)
                .delete(delete_category),
        )
        .with_state(service)
}

/// List all categories
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    responses(
        (status = 200, description = "Categories in creation order", body = Vec<Category>),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn list_categories<S: CatalogStore>(
    State(service): State<CategoryService<S>>,
) -> CatalogResult<Json<Vec<Category>>> {
    Ok(Json(service.list().await?))
}

/// Create a category
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateCategory,
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 400, response = BadRequestValidationResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn create_category<S: CatalogStore>(
    State(service): State<CategoryService<S>>,
    ValidatedJson(input): ValidatedJson<CreateCategory>,
) -> CatalogResult<impl IntoResponse> {
    let category = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// Get a category by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category found", body = Category),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn get_category<S: CatalogStore>(
    State(service): State<CategoryService<S>>,
    UuidPath(id): UuidPath,
) -> CatalogResult<Json<Category>> {
    Ok(Json(service.get(id).await?))
}

/// Rename a category
#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Category ID")),
    request_body = UpdateCategory,
    responses(
        (status = 200, description = "Category updated", body = Category),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn update_category<S: CatalogStore>(
    State(service): State<CategoryService<S>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateCategory>,
) -> CatalogResult<Json<Category>> {
    Ok(Json(service.update(id, input).await?))
}

/// Delete a category that no product references
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse)
    )
)]
async fn delete_category<S: CatalogStore>(
    State(service): State<CategoryService<S>>,
    UuidPath(id): UuidPath,
) -> CatalogResult<StatusCode> {
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
