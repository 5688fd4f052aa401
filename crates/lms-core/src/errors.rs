//! Application error type and its HTTP representation.
//!
//! Every failure in the server is funnelled into [`AppError`], which pairs an
//! HTTP status with an [`anyhow::Error`]. Its [`IntoResponse`] implementation
//! acts as the global error handler and renders the uniform envelope:
//!
//! ```json
//! { "success": false, "message": "Invalid credentials", "status": 401 }
//! ```
//!
//! Every error response also carries, as a response extension, an
//! [`ErrorBody`] whose `stack` holds the debug-formatted error chain. The
//! server's outer layer re-renders the body from it outside production, so
//! the rendered `stack` field depends on the app's environment alone.

use anyhow::{Error, anyhow};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
}

/// Wire shape of an error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, err)
    }

    pub fn unprocessable<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, err)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, anyhow!(message.into()))
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, anyhow!(message.into()))
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, anyhow!(message.into()))
    }

    /// Email/phone or password absent from a login request.
    pub fn missing_credentials(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, anyhow!(message.into()))
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            success: false,
            message: self.error.to_string(),
            status: self.status.as_u16(),
            stack: None,
        }
    }

    /// The envelope with the error chain filled in.
    pub fn body_with_stack(&self) -> ErrorBody {
        ErrorBody {
            stack: Some(format!("{:?}", self.error)),
            ..self.body()
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status.as_u16(), error = ?self.error, "Request failed");
        }

        let mut response = (self.status, Json(self.body())).into_response();
        response.extensions_mut().insert(self.body_with_stack());
        response
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}
