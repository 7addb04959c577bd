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
        BadRequestUuidResponse, BadRequestValidationResponse, InvalidReferenceResponse,
        NotFoundResponse, ServiceUnavailableResponse,
    },
};
use utoipa::OpenApi;
use uuid::Uuid;

use crate::error::CatalogResult;
use crate::models::{CreateStock, Stock, UpdateStock};
use crate::repository::CatalogStore;
use crate::service::StockService;

const TAG: &str = "Estoque";

#[derive(OpenApi)]
#[openapi(
    paths(list_stock, create_stock, get_stock, update_stock, delete_stock),
    components(
        schemas(Stock, CreateStock, UpdateStock),
        responses(
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            InvalidReferenceResponse,
            NotFoundResponse,
            ServiceUnavailableResponse
        )
    ),
    tags((name = TAG, description = "Stock records; updates propagate to the product"))
)]
pub struct StockApi;

pub(super) fn router<S: CatalogStore + 'static>(service: StockService<S>) -> Router {
    Router::new()
        .route("/", get(list_stock).post(create_stock))
        .route(
            "/{id}",
            get(get_stock).put(update_stock).delete(delete_stock),
        )
        .with_state(service)
}

/// List all stock records
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    responses(
        (status = 200, description = "Stock records in creation order", body = Vec<Stock>),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn list_stock<S: CatalogStore>(
    State(service): State<StockService<S>>,
) -> CatalogResult<Json<Vec<Stock>>> {
    Ok(Json(service.list().await?))
}

/// Create a stock record for an existing product
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateStock,
    responses(
        (status = 201, description = "Stock record created", body = Stock),
        (status = 400, response = InvalidReferenceResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn create_stock<S: CatalogStore>(
    State(service): State<StockService<S>>,
    ValidatedJson(input): ValidatedJson<CreateStock>,
) -> CatalogResult<impl IntoResponse> {
    let stock = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(stock)))
}

/// Get a stock record by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Stock record ID")),
    responses(
        (status = 200, description = "Stock record found", body = Stock),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn get_stock<S: CatalogStore>(
    State(service): State<StockService<S>>,
    UuidPath(id): UuidPath,
) -> CatalogResult<Json<Stock>> {
    Ok(Json(service.get(id).await?))
}

/// Set the quantity; the owning product's quantity follows
#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Stock record ID")),
    request_body = UpdateStock,
    responses(
        (status = 200, description = "Stock record updated", body = Stock),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn update_stock<S: CatalogStore>(
    State(service): State<StockService<S>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateStock>,
) -> CatalogResult<Json<Stock>> {
    Ok(Json(service.update(id, input).await?))
}

/// Delete a stock record
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Stock record ID")),
    responses(
        (status = 204, description = "Stock record deleted"),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn delete_stock<S: CatalogStore>(
    State(service): State<StockService<S>>,
    UuidPath(id): UuidPath,
) -> CatalogResult<StatusCode> {
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
