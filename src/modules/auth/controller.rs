use axum::{Json, extract::State};
use axum_extra::extract::cookie::CookieJar;
use tracing::instrument;

use super::model::{
    ApiResponse, Claims, ErrorResponse, LoginRequest, MessageResponse, ParentLoginData,
    ParentLoginRequest, StaffLoginData,
};
use super::service::AuthService;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::ValidatedJson;
use lms_core::AppError;

/// Staff login
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful; token also set as the `token` cookie", body = ApiResponse<StaffLoginData>),
        (status = 400, description = "Email or password missing", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 404, description = "No account with that email", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, jar, dto))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<(CookieJar, Json<ApiResponse<StaffLoginData>>), AppError> {
    let data = AuthService::login_staff(state.directory.as_ref(), dto, &state.jwt_config).await?;
    let cookie =
        AuthService::session_cookie(data.token.clone(), &state.jwt_config, state.environment);

    Ok((
        jar.add(cookie),
        Json(ApiResponse::ok("Login successful", data)),
    ))
}

/// Parent login by guardian phone
#[utoipa::path(
    post,
    path = "/api/v1/parentLogin",
    request_body = ParentLoginRequest,
    responses(
        (status = 200, description = "Login successful; token also set as the `token` cookie", body = ApiResponse<ParentLoginData>),
        (status = 400, description = "Phone or password missing", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 404, description = "No student with that guardian phone", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, jar, dto))]
pub async fn parent_login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(dto): ValidatedJson<ParentLoginRequest>,
) -> Result<(CookieJar, Json<ApiResponse<ParentLoginData>>), AppError> {
    let data = AuthService::login_parent(state.directory.as_ref(), dto, &state.jwt_config).await?;
    let cookie =
        AuthService::session_cookie(data.token.clone(), &state.jwt_config, state.environment);

    Ok((
        jar.add(cookie),
        Json(ApiResponse::ok("Login successful", data)),
    ))
}

/// Expire the session cookie. Issued tokens stay valid until they expire.
#[utoipa::path(
    get,
    path = "/api/v1/logout",
    responses(
        (status = 200, description = "Cookie cleared", body = MessageResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, jar))]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    (
        jar.add(AuthService::expired_cookie(state.environment)),
        Json(MessageResponse::new("Logged out successfully")),
    )
}

/// Identity asserted by the caller's token
#[utoipa::path(
    get,
    path = "/api/v1/me",
    responses(
        (status = 200, description = "Decoded token claims", body = ApiResponse<Claims>),
        (status = 401, description = "No token provided", body = ErrorResponse),
        (status = 403, description = "Invalid or expired token", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Authentication"
)]
#[instrument(skip(auth_user), fields(user_id = auth_user.id()))]
pub async fn me(auth_user: AuthUser) -> Json<ApiResponse<Claims>> {
    Json(ApiResponse::ok("Authenticated", auth_user.0))
}
