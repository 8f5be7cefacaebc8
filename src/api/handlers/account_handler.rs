//! Account handlers: own profile, avatar, address book, and admin management.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, put},
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::{FileUpload, ValidatedJson};
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{
    AccountResponse, Address, AddressInput, AddressKind, AddressPatch, Gender, ProfileUpdate,
};
use crate::errors::AppResult;
use crate::types::{Paginated, PaginatedAccounts, PaginationParams};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    #[schema(example = "Jane Doe")]
    pub name: Option<String>,
    #[schema(example = "+8801700000000")]
    pub phone: Option<String>,
    pub gender: Option<Gender>,
    #[validate(range(max = 150, message = "Age is out of range"))]
    pub age: Option<u32>,
    #[schema(value_type = Option<String>, format = Date, example = "1994-07-21")]
    pub date_of_birth: Option<NaiveDate>,
}

impl From<UpdateProfileRequest> for ProfileUpdate {
    fn from(req: UpdateProfileRequest) -> Self {
        Self {
            name: req.name.map(|n| n.trim().to_string()),
            phone: req.phone,
            gender: req.gender,
            age: req.age,
            date_of_birth: req.date_of_birth,
        }
    }
}

/// New address-book entry
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddressRequest {
    #[serde(rename = "type", default)]
    pub kind: AddressKind,
    #[validate(length(min = 1, message = "Address is required"))]
    #[schema(example = "House 12, Road 4")]
    pub address: String,
    #[validate(length(min = 1, message = "City is required"))]
    #[schema(example = "Rajshahi")]
    pub city: String,
    pub landmark: Option<String>,
    pub district: Option<String>,
    pub division: Option<String>,
    pub zip_code: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

impl From<AddressRequest> for AddressInput {
    fn from(req: AddressRequest) -> Self {
        Self {
            kind: req.kind,
            address: req.address,
            city: req.city,
            landmark: req.landmark,
            district: req.district,
            division: req.division,
            zip_code: req.zip_code,
            is_default: req.is_default,
        }
    }
}

/// Partial address update
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAddressRequest {
    #[serde(rename = "type")]
    pub kind: Option<AddressKind>,
    #[validate(length(min = 1, message = "Address cannot be empty"))]
    pub address: Option<String>,
    #[validate(length(min = 1, message = "City cannot be empty"))]
    pub city: Option<String>,
    pub landmark: Option<String>,
    pub district: Option<String>,
    pub division: Option<String>,
    pub zip_code: Option<String>,
    pub is_default: Option<bool>,
}

impl From<UpdateAddressRequest> for AddressPatch {
    fn from(req: UpdateAddressRequest) -> Self {
        Self {
            kind: req.kind,
            address: req.address,
            city: req.city,
            landmark: req.landmark,
            district: req.district,
            division: req.division,
            zip_code: req.zip_code,
            is_default: req.is_default,
        }
    }
}

pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_accounts))
        .route("/me", get(get_current_account).put(update_current_account))
        .route("/me/avatar", put(upload_avatar))
        .route("/me/addresses", get(list_addresses).post(add_address))
        .route(
            "/me/addresses/:address_id",
            put(update_address).delete(remove_address),
        )
        .route("/me/addresses/:address_id/default", put(set_default_address))
        .route("/:id", delete(delete_account))
        .route("/:id/approve", put(approve_account))
}

/// Get the authenticated account
#[utoipa::path(
    get,
    path = "/accounts/me",
    tag = "Accounts",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current account", body = AccountResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_current_account(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<AccountResponse>> {
    if let Some(account) = state.cache.get_account(&current_user.id).await? {
        return Ok(Json(account));
    }

    let account = AccountResponse::from(state.account_service.get_account(current_user.id).await?);
    state.cache.set_account(&account).await?;

    Ok(Json(account))
}

/// Update profile fields of the authenticated account
#[utoipa::path(
    put,
    path = "/accounts/me",
    tag = "Accounts",
    security(("bearer_auth" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = AccountResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn update_current_account(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<UpdateProfileRequest>,
) -> AppResult<Json<AccountResponse>> {
    let account = state
        .account_service
        .update_profile(current_user.id, payload.into())
        .await?;

    let account = AccountResponse::from(account);
    state.cache.set_account(&account).await?;

    Ok(Json(account))
}

/// Replace the avatar (multipart, first file part)
#[utoipa::path(
    put,
    path = "/accounts/me/avatar",
    tag = "Accounts",
    security(("bearer_auth" = [])),
    request_body(content_type = "multipart/form-data", description = "Image file"),
    responses(
        (status = 200, description = "Avatar replaced", body = AccountResponse),
        (status = 400, description = "No file supplied"),
        (status = 502, description = "Media host unavailable")
    )
)]
pub async fn upload_avatar(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    upload: FileUpload,
) -> AppResult<Json<AccountResponse>> {
    let account = state
        .account_service
        .set_avatar(current_user.id, upload.bytes, upload.file_name)
        .await?;

    let account = AccountResponse::from(account);
    state.cache.set_account(&account).await?;

    Ok(Json(account))
}

/// List saved addresses
#[utoipa::path(
    get,
    path = "/accounts/me/addresses",
    tag = "Addresses",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Address book", body = Vec<Address>))
)]
pub async fn list_addresses(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Address>>> {
    let addresses = state.account_service.list_addresses(current_user.id).await?;
    Ok(Json(addresses))
}

/// Add an address; `isDefault` clears the other defaults
#[utoipa::path(
    post,
    path = "/accounts/me/addresses",
    tag = "Addresses",
    security(("bearer_auth" = [])),
    request_body = AddressRequest,
    responses(
        (status = 201, description = "Address added", body = Vec<Address>),
        (status = 400, description = "Validation error")
    )
)]
pub async fn add_address(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<AddressRequest>,
) -> AppResult<(StatusCode, Json<Vec<Address>>)> {
    let addresses = state
        .account_service
        .add_address(current_user.id, payload.into())
        .await?;

    state.cache.invalidate_account(&current_user.id).await?;
    Ok((StatusCode::CREATED, Json(addresses)))
}

#[utoipa::path(
    put,
    path = "/accounts/me/addresses/{address_id}",
    tag = "Addresses",
    security(("bearer_auth" = [])),
    params(("address_id" = Uuid, Path, description = "Address ID")),
    request_body = UpdateAddressRequest,
    responses(
        (status = 200, description = "Address updated", body = Vec<Address>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Address not found")
    )
)]
pub async fn update_address(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(address_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateAddressRequest>,
) -> AppResult<Json<Vec<Address>>> {
    let addresses = state
        .account_service
        .update_address(current_user.id, address_id, payload.into())
        .await?;

    state.cache.invalidate_account(&current_user.id).await?;
    Ok(Json(addresses))
}

#[utoipa::path(
    delete,
    path = "/accounts/me/addresses/{address_id}",
    tag = "Addresses",
    security(("bearer_auth" = [])),
    params(("address_id" = Uuid, Path, description = "Address ID")),
    responses(
        (status = 200, description = "Address removed", body = Vec<Address>),
        (status = 404, description = "Address not found")
    )
)]
pub async fn remove_address(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(address_id): Path<Uuid>,
) -> AppResult<Json<Vec<Address>>> {
    let addresses = state
        .account_service
        .remove_address(current_user.id, address_id)
        .await?;

    state.cache.invalidate_account(&current_user.id).await?;
    Ok(Json(addresses))
}

#[utoipa::path(
    put,
    path = "/accounts/me/addresses/{address_id}/default",
    tag = "Addresses",
    security(("bearer_auth" = [])),
    params(("address_id" = Uuid, Path, description = "Address ID")),
    responses(
        (status = 200, description = "Default address changed", body = Vec<Address>),
        (status = 404, description = "Address not found")
    )
)]
pub async fn set_default_address(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(address_id): Path<Uuid>,
) -> AppResult<Json<Vec<Address>>> {
    let addresses = state
        .account_service
        .set_default_address(current_user.id, address_id)
        .await?;

    state.cache.invalidate_account(&current_user.id).await?;
    Ok(Json(addresses))
}

/// List accounts (admin only)
#[utoipa::path(
    get,
    path = "/accounts",
    tag = "Accounts",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "One page of accounts", body = PaginatedAccounts),
        (status = 403, description = "Forbidden - Admin only")
    )
)]
pub async fn list_accounts(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<AccountResponse>>> {
    let (accounts, total) = state
        .account_service
        .list_accounts(current_user.requester(), &params)
        .await?;

    let page = Paginated::new(accounts, &params, total).map(AccountResponse::from);
    Ok(Json(page))
}

/// Approve an account (admin only)
#[utoipa::path(
    put,
    path = "/accounts/{id}/approve",
    tag = "Accounts",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Account approved", body = AccountResponse),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Account not found")
    )
)]
pub async fn approve_account(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<AccountResponse>> {
    let account = state
        .account_service
        .approve_account(current_user.requester(), id)
        .await?;

    let account = AccountResponse::from(account);
    state.cache.set_account(&account).await?;

    Ok(Json(account))
}

/// Delete an account (admin only, cannot delete self)
#[utoipa::path(
    delete,
    path = "/accounts/{id}",
    tag = "Accounts",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Account ID")),
    responses(
        (status = 204, description = "Account deleted"),
        (status = 400, description = "Cannot delete your own account"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Account not found")
    )
)]
pub async fn delete_account(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state
        .account_service
        .delete_account(current_user.requester(), id)
        .await?;

    state.cache.invalidate_account(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
