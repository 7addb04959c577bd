use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    ErrorResponse, UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, ConflictResponse,
        InvalidReferenceResponse, NotFoundResponse, ServiceUnavailableResponse,
    },
};
use utoipa::OpenApi;
use uuid::Uuid;

use crate::error::CatalogResult;
use crate::models::{CreateProduct, Product, UpdateProduct};
use crate::repository::CatalogStore;
use crate::service::ProductService;

const TAG: &str = "Produto";

#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        create_product,
        get_product,
        update_product,
        delete_product
    ),
    components(
        schemas(Product, CreateProduct, UpdateProduct, ErrorResponse),
        responses(
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            InvalidReferenceResponse,
            NotFoundResponse,
            ConflictResponse,
            ServiceUnavailableResponse
        )
    ),
    tags((name = TAG, description = "Products and their categories"))
)]
pub struct ProductApi;

pub(super) fn router<S: CatalogStore + 'static>(service: ProductService<S>) -> Router {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .with_state(service)
}

/// List all products
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    responses(
        (status = 200, description = "Products in creation order", body = Vec<Product>),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn list_products<S: CatalogStore>(
    State(service): State<ProductService<S>>,
) -> CatalogResult<Json<Vec<Product>>> {
    Ok(Json(service.list().await?))
}

/// Create a product under an existing category
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "VALIDATION_ERROR for invalid fields, INVALID_REFERENCE for an unknown categoriaId", body = ErrorResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn create_product<S: CatalogStore>(
    State(service): State<ProductService<S>>,
    ValidatedJson(input): ValidatedJson<CreateProduct>,
) -> CatalogResult<impl IntoResponse> {
    let product = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn get_product<S: CatalogStore>(
    State(service): State<ProductService<S>>,
    UuidPath(id): UuidPath,
) -> CatalogResult<Json<Product>> {
    Ok(Json(service.get(id).await?))
}

/// Partially update a product
#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = UpdateProduct,
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 400, description = "VALIDATION_ERROR for invalid fields, INVALID_UUID for a malformed id, INVALID_REFERENCE for an unknown categoriaId", body = ErrorResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn update_product<S: CatalogStore>(
    State(service): State<ProductService<S>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateProduct>,
) -> CatalogResult<Json<Product>> {
    Ok(Json(service.update(id, input).await?))
}

/// Delete a product that has no stock records
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse)
    )
)]
async fn delete_product<S: CatalogStore>(
    State(service): State<ProductService<S>>,
    UuidPath(id): UuidPath,
) -> CatalogResult<StatusCode> {
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
