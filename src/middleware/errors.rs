//! Stack disclosure for error responses.

use axum::{
    Json,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use lms_core::ErrorBody;

use crate::state::AppState;

/// Outside production, re-renders error envelopes with the `stack` field
/// that [`AppError`](lms_core::AppError) attaches to its responses.
pub async fn expose_error_stack(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let response = next.run(req).await;
    if state.environment.is_production() {
        return response;
    }

    match response.extensions().get::<ErrorBody>().cloned() {
        Some(body) => {
            let (mut parts, _) = response.into_parts();
            parts.headers.remove(axum::http::header::CONTENT_LENGTH);
            let rendered = Json(body).into_response();
            Response::from_parts(parts, rendered.into_body())
        }
        None => response,
    }
}
