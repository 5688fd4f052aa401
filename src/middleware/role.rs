//! Role gates.
//!
//! Each gate expects [`require_auth`](super::auth::require_auth) to have
//! run first and compares the token's role against a fixed allow-list,
//! exactly and case-sensitively. Parent tokens carry no role and are
//! rejected by every gate.

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use lms_core::AppError;
use lms_models::Role;

use crate::middleware::auth::AuthUser;

/// Lets the request through only if the verified identity holds one of
/// `allowed`.
pub async fn require_roles(
    req: Request,
    next: Next,
    allowed: &[Role],
) -> Result<Response, AppError> {
    let Some(user) = req.extensions().get::<AuthUser>() else {
        return Err(AppError::forbidden("Access denied"));
    };

    let permitted = user
        .role()
        .is_some_and(|role| Role::matches_any(role, allowed));

    if !permitted {
        tracing::warn!(
            security.event = "role_denied",
            user_id = user.id(),
            role = user.role().unwrap_or("none"),
            path = %req.uri().path(),
            "Role gate rejected request"
        );
        return Err(AppError::forbidden(
            "Access denied. You do not have permission to access this resource",
        ));
    }

    Ok(next.run(req).await)
}

pub async fn require_super_admin(req: Request, next: Next) -> Response {
    require_roles(req, next, &[Role::SuperAdmin])
        .await
        .unwrap_or_else(IntoResponse::into_response)
}

/// Class teachers and super admins may mark attendance.
pub async fn require_attendance_marker(req: Request, next: Next) -> Response {
    require_roles(req, next, &[Role::ClassTeacher, Role::SuperAdmin])
        .await
        .unwrap_or_else(IntoResponse::into_response)
}
