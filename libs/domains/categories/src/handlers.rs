//! HTTP handlers for Categories API

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    AdminUser, AuthUser, ObjectIdPath, ValidatedJson,
    errors::responses::{
        BadRequestIdentifierResponse, BadRequestValidationResponse, ConflictResponse,
        ForbiddenResponse, InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::CategoryResult;
use crate::models::{CategoryResponse, CreateCategory, UpdateCategory};
use crate::repository::CategoryRepository;
use crate::service::CategoryService;

#[derive(OpenApi)]
#[openapi(
    paths(
        list_categories,
        create_category,
        get_category,
        update_category,
        delete_category,
    ),
    components(
        schemas(CategoryResponse, CreateCategory, UpdateCategory),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestIdentifierResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Categories", description = "Product categories")
    )
)]
pub struct ApiDoc;

/// Category routes; mount behind `jwt_auth_middleware`.
pub fn router<R: CategoryRepository + 'static>(service: CategoryService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route(
            "/{id}",
            get(get_category).put(update_category).delete(delete_category),
        )
        .with_state(shared_service)
}

/// List all categories
#[utoipa::path(
    get,
    path = "",
    tag = "Categories",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All categories ordered by name", body = Vec<CategoryResponse>),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_categories<R: CategoryRepository>(
    State(service): State<Arc<CategoryService<R>>>,
    _user: AuthUser,
) -> CategoryResult<Json<Vec<CategoryResponse>>> {
    Ok(Json(service.list_categories().await?))
}

/// Create a category
#[utoipa::path(
    post,
    path = "",
    tag = "Categories",
    request_body = CreateCategory,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_category<R: CategoryRepository>(
    State(service): State<Arc<CategoryService<R>>>,
    _admin: AdminUser,
    ValidatedJson(input): ValidatedJson<CreateCategory>,
) -> CategoryResult<impl IntoResponse> {
    let category = service.create_category(input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// Get a category by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Categories",
    params(("id" = String, Path, description = "Category ID (24 hex characters)")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Category found", body = CategoryResponse),
        (status = 400, response = BadRequestIdentifierResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_category<R: CategoryRepository>(
    State(service): State<Arc<CategoryService<R>>>,
    _user: AuthUser,
    ObjectIdPath(id): ObjectIdPath,
) -> CategoryResult<Json<CategoryResponse>> {
    Ok(Json(service.get_category(id).await?))
}

/// Update a category
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Categories",
    params(("id" = String, Path, description = "Category ID (24 hex characters)")),
    request_body = UpdateCategory,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Category updated", body = CategoryResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_category<R: CategoryRepository>(
    State(service): State<Arc<CategoryService<R>>>,
    _admin: AdminUser,
    ObjectIdPath(id): ObjectIdPath,
    ValidatedJson(input): ValidatedJson<UpdateCategory>,
) -> CategoryResult<Json<CategoryResponse>> {
    Ok(Json(service.update_category(id, input).await?))
}

/// Delete a category
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Categories",
    params(("id" = String, Path, description = "Category ID (24 hex characters)")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 400, response = BadRequestIdentifierResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_category<R: CategoryRepository>(
    State(service): State<Arc<CategoryService<R>>>,
    _admin: AdminUser,
    ObjectIdPath(id): ObjectIdPath,
) -> CategoryResult<impl IntoResponse> {
    service.delete_category(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
