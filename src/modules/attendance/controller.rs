use axum::{
    Json,
    extract::State,
};
use lms_core::AppError;
use lms_models::ApiResponse;
use tracing::instrument;

use super::model::{AttendanceFilter, AttendanceSummary, MarkAttendanceRequest, MarkAttendanceResult};
use super::service::AttendanceService;
use crate::middleware::auth::AuthUser;
use crate::modules::auth::model::ErrorResponse;
use crate::state::AppState;
use crate::validator::{QueryParams, ValidatedJson};

/// Mark one day's attendance for a class
#[utoipa::path(
    post,
    path = "/api/v1/markAttendance",
    request_body = MarkAttendanceRequest,
    responses(
        (status = 200, description = "Register recorded", body = ApiResponse<MarkAttendanceResult>),
        (status = 400, description = "A student is not in the class", body = ErrorResponse),
        (status = 401, description = "No token provided", body = ErrorResponse),
        (status = 403, description = "Caller may not mark this class", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
#[instrument(skip(state, auth_user, request), fields(user_id = auth_user.id()))]
pub async fn mark_attendance(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(request): ValidatedJson<MarkAttendanceRequest>,
) -> Result<Json<ApiResponse<MarkAttendanceResult>>, AppError> {
    let result = AttendanceService::mark_attendance(
        state.directory.as_ref(),
        auth_user.id(),
        auth_user.role(),
        request,
    )
    .await?;
    Ok(Json(ApiResponse::ok("Attendance marked successfully", result)))
}

/// Per-student attendance totals
#[utoipa::path(
    get,
    path = "/api/v1/getAllAttendanceReport",
    params(AttendanceFilter),
    responses(
        (status = 200, description = "Attendance report", body = ApiResponse<Vec<AttendanceSummary>>),
        (status = 400, description = "Malformed filter or invalid date range", body = ErrorResponse),
        (status = 401, description = "No token provided", body = ErrorResponse),
        (status = 403, description = "Invalid or expired token", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
#[instrument(skip(state))]
pub async fn get_all_attendance_report(
    State(state): State<AppState>,
    QueryParams(filter): QueryParams<AttendanceFilter>,
) -> Result<Json<ApiResponse<Vec<AttendanceSummary>>>, AppError> {
    let report = AttendanceService::get_report(state.directory.as_ref(), filter).await?;
    Ok(Json(ApiResponse::ok("Attendance report fetched successfully", report)))
}
