use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use lms_auth::{Claims, UserType, verify_token};
use lms_core::AppError;

use crate::state::AppState;

/// Name of the cookie carrying the session token.
pub const TOKEN_COOKIE: &str = "token";

/// Verified identity of the caller.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn id(&self) -> i64 {
        self.0.id
    }

    pub fn role(&self) -> Option<&str> {
        self.0.role.as_deref()
    }

    pub fn user_type(&self) -> UserType {
        self.0.user_type
    }
}

/// Pulls the session token from `Authorization: Bearer` or, when no
/// `Authorization` header is sent, from the `token` cookie.
pub fn extract_token(headers: &HeaderMap) -> Result<String, AppError> {
    if let Some(value) = headers.get(header::AUTHORIZATION) {
        let token = value
            .to_str()
            .ok()
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::unauthorized("Invalid authorization header format"))?;
        return Ok(token.to_string());
    }

    CookieJar::from_headers(headers)
        .get(TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::unauthorized("Access denied. No token provided"))
}

fn authenticate(headers: &HeaderMap, state: &AppState) -> Result<AuthUser, AppError> {
    let token = extract_token(headers)?;
    verify_token(&token, &state.jwt_config).map(AuthUser)
}

/// Token verifier. Rejects with 401 when no well-formed token is sent and
/// 403 when the token fails verification; otherwise stores [`AuthUser`] in
/// the request extensions.
pub async fn require_auth(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    match authenticate(req.headers(), &state) {
        Ok(user) => {
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        Err(err) => {
            tracing::warn!(
                security.event = "token_rejected",
                path = %req.uri().path(),
                status = err.status.as_u16(),
                reason = %err.error,
                "Rejected request token"
            );
            err.into_response()
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        authenticate(&parts.headers, state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(header::HeaderName, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(name.clone(), HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn test_bearer_header() {
        let map = headers(&[(header::AUTHORIZATION, "Bearer abc.def.ghi")]);
        assert_eq!(extract_token(&map).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_cookie_fallback() {
        let map = headers(&[(header::COOKIE, "theme=dark; token=from-cookie")]);
        assert_eq!(extract_token(&map).unwrap(), "from-cookie");
    }

    #[test]
    fn test_header_wins_over_cookie() {
        let map = headers(&[
            (header::AUTHORIZATION, "Bearer from-header"),
            (header::COOKIE, "token=from-cookie"),
        ]);
        assert_eq!(extract_token(&map).unwrap(), "from-header");
    }

    #[test]
    fn test_malformed_header_does_not_fall_back() {
        let map = headers(&[
            (header::AUTHORIZATION, "Basic dXNlcjpwYXNz"),
            (header::COOKIE, "token=from-cookie"),
        ]);
        assert_eq!(extract_token(&map).unwrap_err().status.as_u16(), 401);

        let map = headers(&[(header::AUTHORIZATION, "Bearer ")]);
        assert_eq!(extract_token(&map).unwrap_err().status.as_u16(), 401);
    }

    #[test]
    fn test_missing_token() {
        assert_eq!(
            extract_token(&HeaderMap::new()).unwrap_err().status.as_u16(),
            401
        );
        let map = headers(&[(header::COOKIE, "token=")]);
        assert_eq!(extract_token(&map).unwrap_err().status.as_u16(), 401);
    }
}
