use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use lms_core::AppError;
use lms_models::ApiResponse;
use tracing::instrument;

use super::model::{AllocateDto, ClassAllocation, CreateUserDto, StaffIdentity, UserRoleData};
use super::service::UserService;
use crate::modules::auth::model::ErrorResponse;
use crate::state::AppState;
use crate::validator::{PathParams, ValidatedJson};

/// Register a staff account
#[utoipa::path(
    post,
    path = "/api/v1/createUser",
    request_body = CreateUserDto,
    responses(
        (status = 201, description = "Staff account created", body = ApiResponse<StaffIdentity>),
        (status = 400, description = "Malformed body or email already registered", body = ErrorResponse),
        (status = 401, description = "No token provided", body = ErrorResponse),
        (status = 403, description = "Caller is not a SuperAdmin", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state, dto))]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateUserDto>,
) -> Result<(StatusCode, Json<ApiResponse<StaffIdentity>>), AppError> {
    let user = UserService::create_user(state.directory.as_ref(), dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("User created successfully", user)),
    ))
}

/// List all staff accounts
#[utoipa::path(
    get,
    path = "/api/v1/getAllUsers",
    responses(
        (status = 200, description = "All staff", body = ApiResponse<Vec<StaffIdentity>>),
        (status = 401, description = "No token provided", body = ErrorResponse),
        (status = 403, description = "Caller is not a SuperAdmin", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_all_users(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<StaffIdentity>>>, AppError> {
    let users = UserService::get_all_users(state.directory.as_ref()).await?;
    Ok(Json(ApiResponse::ok("Users fetched successfully", users)))
}

/// Class allocations of one staff member in one role
#[utoipa::path(
    get,
    path = "/api/v1/GetUserDataByRole/{userId}/{role}",
    params(
        ("userId" = i64, Path, description = "Staff user id"),
        ("role" = String, Path, description = "Role name, e.g. ClassTeacher")
    ),
    responses(
        (status = 200, description = "Allocations", body = ApiResponse<UserRoleData>),
        (status = 400, description = "Unknown role or non-numeric user id", body = ErrorResponse),
        (status = 401, description = "No token provided", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_user_data_by_role(
    State(state): State<AppState>,
    PathParams((user_id, role)): PathParams<(i64, String)>,
) -> Result<Json<ApiResponse<UserRoleData>>, AppError> {
    let data = UserService::get_user_data_by_role(state.directory.as_ref(), user_id, &role).await?;
    Ok(Json(ApiResponse::ok("User data fetched successfully", data)))
}

/// Allocate a staff member to a class
#[utoipa::path(
    post,
    path = "/api/v1/allocate",
    request_body = AllocateDto,
    responses(
        (status = 201, description = "Allocation stored", body = ApiResponse<ClassAllocation>),
        (status = 400, description = "Role cannot be allocated or subject missing", body = ErrorResponse),
        (status = 403, description = "Caller is not a SuperAdmin", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn allocate(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<AllocateDto>,
) -> Result<(StatusCode, Json<ApiResponse<ClassAllocation>>), AppError> {
    let allocation = UserService::allocate(state.directory.as_ref(), dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Allocation saved", allocation)),
    ))
}
