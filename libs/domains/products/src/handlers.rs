//! HTTP handlers for products and bulk stock updates.

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use axum_helpers::{
    errors::responses::{
        BadGatewayResponse, BadRequestIdentifierResponse, BadRequestValidationResponse,
        ForbiddenResponse, InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
    AdminUser, AppError, AuthUser, ObjectIdPath, ValidatedJson, ValidatedQuery,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, CreateProductForm, ImageUpload, ProductResponse, UpdateProduct};
use crate::query::{Page, ProductQuery, SortField, SortOrder};
use crate::repository::{ProductRepository, StockRepository};
use crate::service::{ProductService, MAX_IMAGE_BYTES};
use crate::stock::{BulkStockUpdateRequest, StockService, StockUpdateItem, StockWriteSummary};

/// Room for the JSON part and multipart framing on top of the image.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        create_product,
        get_product,
        update_product,
        delete_product,
    ),
    components(
        schemas(
            ProductResponse, CreateProduct, CreateProductForm, UpdateProduct,
            SortField, SortOrder
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestIdentifierResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            BadGatewayResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Products", description = "Product catalog")
    )
)]
pub struct ApiDoc;

/// Stock routes live under their own prefix, so they get their own document.
#[derive(OpenApi)]
#[openapi(
    paths(bulk_update_stock),
    components(
        schemas(BulkStockUpdateRequest, StockUpdateItem, StockWriteSummary, StockUpdateResponse),
        responses(
            BadRequestIdentifierResponse,
            UnauthorizedResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Stock", description = "Bulk stock adjustment for internal services")
    )
)]
pub struct StockApiDoc;

/// Product routes. Every handler needs an authenticated caller, so mount
/// this behind `jwt_auth_middleware`.
pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route(
            "/",
            get(list_products).post(create_product).layer(DefaultBodyLimit::max(
                MAX_IMAGE_BYTES + FORM_OVERHEAD_BYTES,
            )),
        )
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .with_state(shared_service)
}

/// Stock routes. Mount behind `service_key_middleware`.
pub fn stock_router<S: StockRepository + 'static>(service: StockService<S>) -> Router {
    Router::new()
        .route("/bulk-update", post(bulk_update_stock))
        .with_state(Arc::new(service))
}

/// List products
#[utoipa::path(
    get,
    path = "",
    tag = "Products",
    params(ProductQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "One page of matching products", body = Page<ProductResponse>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    _user: AuthUser,
    ValidatedQuery(query): ValidatedQuery<ProductQuery>,
) -> ProductResult<Json<Page<ProductResponse>>> {
    let page = service.list_products(query).await?;
    Ok(Json(page))
}

/// Create a product with its image
#[utoipa::path(
    post,
    path = "",
    tag = "Products",
    request_body(content = CreateProductForm, content_type = "multipart/form-data"),
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 502, response = BadGatewayResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    _admin: AdminUser,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let (input, image) = read_create_form(multipart).await?;
    let product = service.create_product(input, image).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Products",
    params(("id" = String, Path, description = "Product ID (24 hex characters)")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Product found", body = ProductResponse),
        (status = 400, response = BadRequestIdentifierResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    _user: AuthUser,
    ObjectIdPath(id): ObjectIdPath,
) -> ProductResult<Json<ProductResponse>> {
    let product = service.get_product(id).await?;
    Ok(Json(product))
}

/// Update a product
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Products",
    params(("id" = String, Path, description = "Product ID (24 hex characters)")),
    request_body = UpdateProduct,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    _admin: AdminUser,
    ObjectIdPath(id): ObjectIdPath,
    ValidatedJson(input): ValidatedJson<UpdateProduct>,
) -> ProductResult<Json<ProductResponse>> {
    let product = service.update_product(id, input).await?;
    Ok(Json(product))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Products",
    params(("id" = String, Path, description = "Product ID (24 hex characters)")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 400, response = BadRequestIdentifierResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    _admin: AdminUser,
    ObjectIdPath(id): ObjectIdPath,
) -> ProductResult<impl IntoResponse> {
    service.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StockUpdateResponse {
    #[schema(example = "Stock updated successfully")]
    pub message: String,
    #[serde(flatten)]
    pub summary: StockWriteSummary,
}

/// Apply stock changes for many products in one call
#[utoipa::path(
    post,
    path = "/bulk-update",
    tag = "Stock",
    request_body = BulkStockUpdateRequest,
    security(("api_key" = [])),
    responses(
        (status = 200, description = "All adjustments submitted", body = StockUpdateResponse),
        (status = 400, response = BadRequestIdentifierResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn bulk_update_stock<S: StockRepository>(
    State(service): State<Arc<StockService<S>>>,
    ValidatedJson(request): ValidatedJson<BulkStockUpdateRequest>,
) -> ProductResult<Json<StockUpdateResponse>> {
    let summary = service.bulk_adjust(&request.products).await?;
    Ok(Json(StockUpdateResponse {
        message: "Stock updated successfully".to_string(),
        summary,
    }))
}

/// Pull the `product` JSON field and the `image` file out of the form.
async fn read_create_form(mut multipart: Multipart) -> Result<(CreateProduct, ImageUpload), AppError> {
    let mut product: Option<CreateProduct> = None;
    let mut image: Option<ImageUpload> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("product") => {
                let raw = field.text().await?;
                let input: CreateProduct = serde_json::from_str(&raw)
                    .map_err(|e| AppError::BadRequest(format!("Invalid product JSON: {e}")))?;
                input.validate()?;
                product = Some(input);
            }
            Some("image") => {
                let file_name = field.file_name().unwrap_or("image").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await?.to_vec();
                image = Some(ImageUpload {
                    file_name,
                    content_type,
                    bytes,
                });
            }
            _ => {}
        }
    }

    let product = product.ok_or_else(|| AppError::BadRequest("Missing 'product' field".into()))?;
    let image = image.ok_or_else(|| {
        AppError::from(ProductError::Validation("Missing 'image' file".into()))
    })?;
    Ok((product, image))
}
