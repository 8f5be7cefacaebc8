//! Catalog handlers. Reads are public; writes require an admin token.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::{FileUpload, ValidatedJson};
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{Category, NewProduct, Product, ProductFilter, ProductPatch};
use crate::errors::AppResult;
use crate::types::{Paginated, PaginatedProducts, PaginationParams};

/// Product listing query
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    /// Only products in this category
    pub category: Option<Uuid>,
    /// Case-insensitive name search
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Desk Lamp")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[schema(value_type = String, example = "499.00")]
    pub price: Decimal,
    pub category_id: Option<Uuid>,
    #[serde(default)]
    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub stock: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = Option<String>, example = "549.00")]
    pub price: Option<Decimal>,
    pub category_id: Option<Uuid>,
    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub stock: Option<i32>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CategoryRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Home Appliances")]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCategoryRequest {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Public product routes
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products))
        .route("/:id", get(get_product))
}

/// Admin product routes, merged onto the same paths behind authentication
pub fn product_admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_product))
        .route("/:id", put(update_product).delete(delete_product))
        .route("/:id/images", post(add_product_image))
        .route("/:id/images/*public_id", delete(remove_product_image))
}

pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories))
        .route("/:id", get(get_category))
}

pub fn category_admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_category))
        .route("/:id", put(update_category).delete(delete_category))
}

/// List products
#[utoipa::path(
    get,
    path = "/products",
    tag = "Catalog",
    params(ProductQuery),
    responses((status = 200, description = "One page of products", body = PaginatedProducts))
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> AppResult<Json<Paginated<Product>>> {
    let params = PaginationParams::new(query.page, query.per_page);
    let filter = ProductFilter {
        category_id: query.category,
        search: query.search,
    };

    let (products, total) = state
        .catalog_service
        .list_products(&filter, &params)
        .await?;

    Ok(Json(Paginated::new(products, &params, total)))
}

#[utoipa::path(
    get,
    path = "/products/{id}",
    tag = "Catalog",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product", body = Product),
        (status = 404, description = "Product not found")
    )
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Product>> {
    Ok(Json(state.catalog_service.get_product(id).await?))
}

/// Create a product (admin only)
#[utoipa::path(
    post,
    path = "/products",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Category not found")
    )
)]
pub async fn create_product(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateProductRequest>,
) -> AppResult<(StatusCode, Json<Product>)> {
    let input = NewProduct {
        name: payload.name.trim().to_string(),
        description: payload.description,
        price: payload.price,
        category_id: payload.category_id,
        stock: payload.stock,
    };
    let product = state
        .catalog_service
        .create_product(current_user.requester(), input)
        .await?;

    Ok((StatusCode::CREATED, Json(product)))
}

#[utoipa::path(
    put,
    path = "/products/{id}",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn update_product(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateProductRequest>,
) -> AppResult<Json<Product>> {
    let patch = ProductPatch {
        name: payload.name,
        description: payload.description,
        price: payload.price,
        category_id: payload.category_id,
        stock: payload.stock,
    };
    let product = state
        .catalog_service
        .update_product(current_user.requester(), id, patch)
        .await?;

    Ok(Json(product))
}

#[utoipa::path(
    delete,
    path = "/products/{id}",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn delete_product(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state
        .catalog_service
        .delete_product(current_user.requester(), id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Attach an image (multipart, first file part)
#[utoipa::path(
    post,
    path = "/products/{id}/images",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body(content_type = "multipart/form-data", description = "Image file"),
    responses(
        (status = 201, description = "Image added", body = Product),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 502, description = "Media host unavailable")
    )
)]
pub async fn add_product_image(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    upload: FileUpload,
) -> AppResult<(StatusCode, Json<Product>)> {
    let product = state
        .catalog_service
        .add_product_image(current_user.requester(), id, upload.bytes, upload.file_name)
        .await?;

    Ok((StatusCode::CREATED, Json(product)))
}

/// Detach an image; `public_id` may contain slashes
#[utoipa::path(
    delete,
    path = "/products/{id}/images/{public_id}",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Product ID"),
        ("public_id" = String, Path, description = "Media public ID")
    ),
    responses(
        (status = 200, description = "Image removed", body = Product),
        (status = 404, description = "Product or image not found")
    )
)]
pub async fn remove_product_image(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path((id, public_id)): Path<(Uuid, String)>,
) -> AppResult<Json<Product>> {
    let product = state
        .catalog_service
        .remove_product_image(current_user.requester(), id, public_id.trim_start_matches('/'))
        .await?;

    Ok(Json(product))
}

#[utoipa::path(
    get,
    path = "/categories",
    tag = "Catalog",
    responses((status = 200, description = "All categories", body = Vec<Category>))
)]
pub async fn list_categories(State(state): State<AppState>) -> AppResult<Json<Vec<Category>>> {
    Ok(Json(state.catalog_service.list_categories().await?))
}

#[utoipa::path(
    get,
    path = "/categories/{id}",
    tag = "Catalog",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category", body = Category),
        (status = 404, description = "Category not found")
    )
)]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Category>> {
    Ok(Json(state.catalog_service.get_category(id).await?))
}

#[utoipa::path(
    post,
    path = "/categories",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    request_body = CategoryRequest,
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 409, description = "Slug already taken")
    )
)]
pub async fn create_category(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CategoryRequest>,
) -> AppResult<(StatusCode, Json<Category>)> {
    let category = state
        .catalog_service
        .create_category(current_user.requester(), payload.name, payload.description)
        .await?;

    Ok((StatusCode::CREATED, Json(category)))
}

#[utoipa::path(
    put,
    path = "/categories/{id}",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Category ID")),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = Category),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Slug already taken")
    )
)]
pub async fn update_category(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateCategoryRequest>,
) -> AppResult<Json<Category>> {
    let category = state
        .catalog_service
        .update_category(current_user.requester(), id, payload.name, payload.description)
        .await?;

    Ok(Json(category))
}

#[utoipa::path(
    delete,
    path = "/categories/{id}",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 404, description = "Category not found")
    )
)]
pub async fn delete_category(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state
        .catalog_service
        .delete_category(current_user.requester(), id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
